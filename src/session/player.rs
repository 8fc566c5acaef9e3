//! Player for replaying recordings against a parameter sink
//!
//! Playback is slaved to the external transport: every [`Player::tick`]
//! converts the transport's current position into recording time through a
//! fixed anchor (`playback_start_time_ref`) and pushes every event that has
//! become due to the sink. The cursor only ever moves forward during a play
//! session, which is what makes replay idempotent: ticking twice at the same
//! transport time applies nothing the second time.
//!
//! Sink callbacks cannot reach the player directly. To pause or reset from
//! inside a callback, clone a [`PlaybackControl`] into the sink; requests made
//! through it are honored once the current frame's due events are applied.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::config::PlaybackConfig;
use crate::sink::{dispatch, ParameterSink};
use crate::transform::format_time;
use crate::transport::TransportClock;
use crate::types::Recording;

use super::types::{Notifier, PlaybackState, PlayerEvent};

const REQUEST_NONE: u8 = 0;
const REQUEST_PAUSE: u8 = 1;
const REQUEST_RESET: u8 = 2;

/// Deferred control request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    Pause,
    Reset,
}

/// Cloneable handle for requesting pause/reset at any time
///
/// Reset takes precedence over pause when both are requested before the
/// player gets to honor them.
#[derive(Debug, Clone, Default)]
pub struct PlaybackControl {
    pending: Arc<AtomicU8>,
}

impl PlaybackControl {
    /// Request a pause at the next opportunity
    pub fn request_pause(&self) {
        self.pending.fetch_max(REQUEST_PAUSE, Ordering::AcqRel);
    }

    /// Request a reset at the next opportunity
    pub fn request_reset(&self) {
        self.pending.fetch_max(REQUEST_RESET, Ordering::AcqRel);
    }

    /// The request currently queued, if any
    pub fn pending(&self) -> Option<ControlRequest> {
        decode(self.pending.load(Ordering::Acquire))
    }

    fn take(&self) -> Option<ControlRequest> {
        decode(self.pending.swap(REQUEST_NONE, Ordering::AcqRel))
    }

    fn clear(&self) {
        self.pending.store(REQUEST_NONE, Ordering::Release);
    }
}

fn decode(raw: u8) -> Option<ControlRequest> {
    match raw {
        REQUEST_PAUSE => Some(ControlRequest::Pause),
        REQUEST_RESET => Some(ControlRequest::Reset),
        _ => None,
    }
}

/// What a single [`Player::tick`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Number of events pushed to the sink
    pub applied: usize,
    /// Playback time after the tick
    pub current_time_ms: u64,
    /// Playback stopped during this tick (transport stopped, end reached, or a request)
    pub stopped: bool,
    /// The end of the recording was reached
    pub finished: bool,
}

/// Replays a recording in lock-step with the transport
pub struct Player {
    transport: Arc<dyn TransportClock>,
    recording: Option<Recording>,
    state: PlaybackState,
    enabled: bool,
    control: PlaybackControl,
    notifier: Notifier<PlayerEvent>,
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("recording", &self.recording.as_ref().map(|r| &r.id))
            .field("state", &self.state)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl Player {
    /// Create an enabled player with nothing loaded
    pub fn new(transport: Arc<dyn TransportClock>) -> Self {
        Self {
            transport,
            recording: None,
            state: PlaybackState::IDLE,
            enabled: true,
            control: PlaybackControl::default(),
            notifier: Notifier::default(),
        }
    }

    /// Create a player honoring the playback configuration
    pub fn with_config(transport: Arc<dyn TransportClock>, config: &PlaybackConfig) -> Self {
        let mut player = Self::new(transport);
        player.enabled = config.enabled;
        player
    }

    /// Get current playback state
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Check if playback is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable playback; disabling stops a running playback
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.pause();
        }
    }

    /// Get the loaded recording
    pub fn recording(&self) -> Option<&Recording> {
        self.recording.as_ref()
    }

    /// Check if a recording is loaded
    pub fn has_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// Current playback position
    pub fn current_time_ms(&self) -> u64 {
        self.state.current_time_ms
    }

    /// Index of the next event to apply
    pub fn next_event_index(&self) -> usize {
        self.state.next_event_index
    }

    /// Index of the last applied event
    pub fn last_applied_index(&self) -> Option<usize> {
        self.state.last_applied_index
    }

    /// Total duration of the loaded recording
    pub fn duration_ms(&self) -> u64 {
        self.recording.as_ref().map_or(0, |r| r.duration_ms)
    }

    /// Playback progress (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        let total = self.duration_ms();
        if total == 0 {
            return 0.0;
        }
        (self.state.current_time_ms as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Current position as `MM:SS`, identical to the export formatting
    pub fn position_display(&self) -> String {
        format_time(self.state.current_time_ms)
    }

    /// Whether the host should keep calling [`Player::tick`]
    pub fn wants_frames(&self) -> bool {
        self.state.is_playing
    }

    /// Handle for deferred pause/reset requests
    pub fn control(&self) -> PlaybackControl {
        self.control.clone()
    }

    /// Subscribe to change notifications
    pub fn subscribe(&mut self) -> Receiver<PlayerEvent> {
        self.notifier.subscribe()
    }

    /// Load a recording
    ///
    /// If its id differs from the currently loaded one, the cursor is reset
    /// before anything else can run. Events are sorted by timestamp.
    pub fn load(&mut self, mut recording: Recording) {
        if !recording.is_sorted() {
            recording.sort_events();
        }

        let changed = self
            .recording
            .as_ref()
            .map_or(true, |current| !current.same_identity(&recording));

        let id = recording.id.clone();
        self.recording = Some(recording);

        if changed {
            self.on_identity_change();
            tracing::debug!(recording = %id, "Loaded recording");
            self.notifier.notify(PlayerEvent::RecordingChanged(Some(id)));
        }
    }

    /// Unload the current recording
    pub fn unload(&mut self) {
        if self.recording.take().is_some() {
            self.on_identity_change();
            tracing::debug!("Unloaded recording");
            self.notifier.notify(PlayerEvent::RecordingChanged(None));
        }
    }

    /// Load or unload depending on `recording`
    pub fn set_recording(&mut self, recording: Option<Recording>) {
        match recording {
            Some(recording) => self.load(recording),
            None => self.unload(),
        }
    }

    fn on_identity_change(&mut self) {
        self.control.clear();
        self.state.reset();
    }

    /// Start or resume playback
    ///
    /// Does nothing unless a recording is loaded, playback is enabled and the
    /// transport is playing. Returns whether the player is now playing.
    pub fn play(&mut self) -> bool {
        self.honor_pending();

        if self.state.is_playing {
            return true;
        }
        if self.recording.is_none() {
            tracing::trace!("play() ignored: no recording loaded");
            return false;
        }
        if !self.enabled {
            tracing::trace!("play() ignored: playback disabled");
            return false;
        }

        let snapshot = self.transport.snapshot();
        if !snapshot.playing {
            tracing::trace!("play() ignored: transport is not playing");
            return false;
        }

        self.state.is_playing = true;
        self.state.playback_start_time_ref =
            snapshot.seconds - self.state.current_time_ms as f64 / 1000.0;

        tracing::debug!(
            position_ms = self.state.current_time_ms,
            anchor = self.state.playback_start_time_ref,
            "Playback started"
        );
        self.notifier.notify(PlayerEvent::Played {
            position_ms: self.state.current_time_ms,
        });
        true
    }

    /// Pause playback, keeping the position
    pub fn pause(&mut self) {
        if !self.state.is_playing {
            return;
        }
        self.state.is_playing = false;
        tracing::debug!(position_ms = self.state.current_time_ms, "Playback paused");
        self.notifier.notify(PlayerEvent::Paused {
            position_ms: self.state.current_time_ms,
        });
    }

    /// Stop and rewind to the beginning
    pub fn reset(&mut self) {
        self.state.reset();
        tracing::debug!("Playback reset");
        self.notifier.notify(PlayerEvent::Reset);
    }

    /// Jump to `position_ms`, clamped to `[0, duration]`
    ///
    /// Events at or before the new position count as passed and are not
    /// re-applied; playing continues smoothly from the new position.
    pub fn seek(&mut self, position_ms: i64) {
        let Some(recording) = self.recording.as_ref() else {
            tracing::trace!("seek() ignored: no recording loaded");
            return;
        };

        let position = (position_ms.max(0) as u64).min(recording.duration_ms);
        let passed = recording.events_at_or_before(position);

        self.state.current_time_ms = position;
        self.state.next_event_index = passed;
        self.state.last_applied_index = passed.checked_sub(1);

        if self.state.is_playing {
            let snapshot = self.transport.snapshot();
            self.state.playback_start_time_ref = snapshot.seconds - position as f64 / 1000.0;
        }

        tracing::debug!(position_ms = position, next_event = passed, "Seeked");
        self.notifier.notify(PlayerEvent::Seeked {
            position_ms: position,
        });
    }

    /// Per-frame update
    ///
    /// Applies every due event exactly once, in timestamp order, then honors
    /// any pause/reset requested through [`PlaybackControl`] (including from
    /// the sink during this call), then stops if the end was reached.
    pub fn tick<S: ParameterSink + ?Sized>(&mut self, sink: &mut S) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        self.honor_pending();
        if !self.state.is_playing {
            outcome.current_time_ms = self.state.current_time_ms;
            return outcome;
        }

        let snapshot = self.transport.snapshot();
        if !snapshot.playing || self.recording.is_none() {
            self.pause();
            outcome.current_time_ms = self.state.current_time_ms;
            outcome.stopped = true;
            return outcome;
        }

        let elapsed_ms = (snapshot.seconds - self.state.playback_start_time_ref) * 1000.0;
        let recording_time_ms = if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            elapsed_ms.floor() as u64
        } else {
            0
        };
        self.state.current_time_ms = recording_time_ms;

        let mut duration_ms = 0;
        if let Some(recording) = self.recording.as_ref() {
            duration_ms = recording.duration_ms;
            let first = self.state.last_applied_index.map_or(0, |i| i + 1);
            for (index, event) in recording.events.iter().enumerate().skip(first) {
                if event.timestamp_ms > recording_time_ms {
                    break;
                }
                tracing::trace!(index, timestamp_ms = event.timestamp_ms, "Applying event");
                dispatch(sink, event);
                self.state.last_applied_index = Some(index);
                self.state.next_event_index = index + 1;
                outcome.applied += 1;
                self.notifier.notify(PlayerEvent::EventApplied { index });
            }
        }

        // Playback never runs past the end, even when paused by a request
        let reached_end = recording_time_ms >= duration_ms;
        if reached_end {
            self.state.current_time_ms = duration_ms;
        }

        let request = self.honor_pending();
        if request == Some(ControlRequest::Reset) {
            outcome.current_time_ms = self.state.current_time_ms;
            outcome.stopped = true;
            return outcome;
        }

        if reached_end {
            self.pause();
            tracing::debug!(duration_ms, "Playback reached end of recording");
            self.notifier.notify(PlayerEvent::Finished);
            outcome.stopped = true;
            outcome.finished = true;
        } else if request.is_some() {
            outcome.stopped = !self.state.is_playing;
        }

        outcome.current_time_ms = self.state.current_time_ms;
        outcome
    }

    /// Apply a queued control request, returning it
    fn honor_pending(&mut self) -> Option<ControlRequest> {
        let request = self.control.take();
        match request {
            Some(ControlRequest::Reset) => self.reset(),
            Some(ControlRequest::Pause) => self.pause(),
            None => {}
        }
        request
    }
}
