//! Recorder for capturing live parameter changes
//!
//! The recorder timestamps every change against the host wall clock and
//! coalesces rapid repeats of the same control into a single event, so a
//! slider drag becomes one `old -> new` entry instead of hundreds.
//!
//! Each debounce key `(type, param, layerId)` owns a [`DebounceHandle`]. A new
//! change to that key while its handle is live rewrites the run's `newValue`
//! and reschedules the handle; once the handle expires the run is sealed and
//! the next change starts a new event.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::config::RecorderConfig;
use crate::transport::{TransportClock, WallClock};
use crate::types::{EventChange, EventKey, Recording, RecordingEvent, TrackId, TweakParam};

use super::types::{CaptureResult, Notifier, RecorderEvent, RecordingState};

/// Pending debounce deadline for one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceHandle {
    /// Index of the run's event in the buffer
    pub event_index: usize,
    /// Wall-clock time (ms) at which the run is sealed
    pub deadline_ms: u64,
}

impl DebounceHandle {
    fn is_live(&self, now_ms: u64) -> bool {
        now_ms < self.deadline_ms
    }
}

/// Captures a time-ordered event log during a transport-driven session
pub struct Recorder {
    transport: Arc<dyn TransportClock>,
    clock: Arc<dyn WallClock>,
    config: RecorderConfig,
    state: RecordingState,
    debounce: HashMap<EventKey, DebounceHandle>,
    notifier: Notifier<RecorderEvent>,
}

impl fmt::Debug for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

impl Recorder {
    /// Create a recorder with the default configuration
    pub fn new(transport: Arc<dyn TransportClock>, clock: Arc<dyn WallClock>) -> Self {
        Self::with_config(transport, clock, RecorderConfig::default())
    }

    /// Create a recorder with the given configuration
    pub fn with_config(
        transport: Arc<dyn TransportClock>,
        clock: Arc<dyn WallClock>,
        config: RecorderConfig,
    ) -> Self {
        Self {
            transport,
            clock,
            config,
            state: RecordingState::default(),
            debounce: HashMap::new(),
            notifier: Notifier::default(),
        }
    }

    /// Get the active configuration
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Change the coalesce window; affects runs started after the call
    pub fn set_coalesce_window_ms(&mut self, window_ms: u64) {
        self.config.coalesce_window_ms = window_ms;
    }

    /// Set maximum number of stored events (0 = unlimited)
    pub fn set_max_events(&mut self, max: usize) {
        self.config.max_events = max;
    }

    /// Get current recording state
    pub fn state(&self) -> &RecordingState {
        &self.state
    }

    /// Check if a capture session is running
    pub fn is_recording(&self) -> bool {
        self.state.is_recording
    }

    /// Buffered events, in capture order
    pub fn events(&self) -> &[RecordingEvent] {
        &self.state.events
    }

    /// Number of buffered events
    pub fn event_count(&self) -> usize {
        self.state.events.len()
    }

    /// Milliseconds since capture started, as of the last update
    pub fn elapsed_ms(&self) -> u64 {
        self.state.elapsed_ms
    }

    /// Whether the host should keep calling [`Recorder::tick`]
    pub fn wants_frames(&self) -> bool {
        self.state.is_recording
    }

    /// Number of debounce handles that have not expired yet
    pub fn pending_debounce_count(&self) -> usize {
        self.debounce.len()
    }

    /// Subscribe to change notifications
    pub fn subscribe(&mut self) -> Receiver<RecorderEvent> {
        self.notifier.subscribe()
    }

    /// Start capturing
    ///
    /// Only starts while the transport is playing. Previously buffered events
    /// are kept; call [`Recorder::clear`] first for a fresh session. Returns
    /// whether a session is now running because of this call.
    pub fn start(&mut self) -> bool {
        if self.state.is_recording {
            tracing::trace!("start() ignored: already recording");
            return false;
        }

        let snapshot = self.transport.snapshot();
        if !snapshot.playing {
            tracing::trace!("start() ignored: transport is not playing");
            return false;
        }

        self.state.is_recording = true;
        self.state.start_time = snapshot.seconds;
        self.state.start_perf_time = self.clock.now_ms();
        self.state.elapsed_ms = 0;
        self.debounce.clear();

        tracing::debug!(
            transport_seconds = snapshot.seconds,
            buffered = self.state.events.len(),
            "Recording started"
        );
        self.notifier.notify(RecorderEvent::Started {
            start_time: snapshot.seconds,
        });
        true
    }

    /// Capture a parameter change
    ///
    /// Returns the buffer index of the event that now holds the change, or
    /// `None` if nothing was stored (not recording, a NaN or infinite value,
    /// or event limit reached).
    pub fn capture_event(&mut self, change: EventChange) -> Option<usize> {
        if !self.state.is_recording {
            tracing::trace!(kind = %change.kind(), "capture ignored: not recording");
            return None;
        }

        if !change.is_finite() {
            tracing::warn!(kind = %change.kind(), "Ignoring change with a non-finite value");
            return None;
        }

        let now = self.clock.now_ms();
        let deadline_ms = now.saturating_add(self.config.coalesce_window_ms);
        let key = change.key();

        let mut coalesced = None;
        if let Some(handle) = self.debounce.get_mut(&key) {
            if handle.is_live(now) {
                if let Some(event) = self.state.events.get_mut(handle.event_index) {
                    if event.change.absorb(&change) {
                        handle.deadline_ms = deadline_ms;
                        coalesced = Some(handle.event_index);
                    }
                }
            }
        }

        if let Some(index) = coalesced {
            tracing::trace!(index, "Coalesced change into existing event");
            self.notifier.notify(RecorderEvent::Coalesced { index });
            return Some(index);
        }

        // The previous run for this key (if any) is over
        self.debounce.remove(&key);

        if self.config.max_events > 0 && self.state.events.len() >= self.config.max_events {
            tracing::warn!(
                max_events = self.config.max_events,
                "Event limit reached, dropping {} change",
                change.kind()
            );
            self.notifier.notify(RecorderEvent::Dropped);
            return None;
        }

        let timestamp_ms = now.saturating_sub(self.state.start_perf_time);
        let index = self.state.events.len();
        self.state.events.push(RecordingEvent::new(timestamp_ms, change));
        self.debounce.insert(
            key,
            DebounceHandle {
                event_index: index,
                deadline_ms,
            },
        );

        tracing::trace!(index, timestamp_ms, "Captured event");
        self.notifier.notify(RecorderEvent::Captured { index });
        Some(index)
    }

    /// Capture a change to a tweak parameter
    pub fn capture_tweak(
        &mut self,
        param: TweakParam,
        old_value: f64,
        new_value: f64,
    ) -> Option<usize> {
        self.capture_event(EventChange::tweak(param, old_value, new_value))
    }

    /// Capture a layer mute toggle
    pub fn capture_layer_mute(
        &mut self,
        layer_id: &str,
        old_value: bool,
        new_value: bool,
    ) -> Option<usize> {
        self.capture_event(EventChange::layer_mute(layer_id, old_value, new_value))
    }

    /// Capture a layer volume change
    pub fn capture_layer_volume(
        &mut self,
        layer_id: &str,
        old_value: f64,
        new_value: f64,
    ) -> Option<usize> {
        self.capture_event(EventChange::layer_volume(layer_id, old_value, new_value))
    }

    /// Capture a layer solo toggle
    pub fn capture_layer_solo(
        &mut self,
        layer_id: &str,
        old_value: bool,
        new_value: bool,
    ) -> Option<usize> {
        self.capture_event(EventChange::layer_solo(layer_id, old_value, new_value))
    }

    /// Per-frame update: refresh elapsed time and expire debounce handles
    pub fn tick(&mut self) -> u64 {
        if !self.state.is_recording {
            return self.state.elapsed_ms;
        }

        let now = self.clock.now_ms();
        self.state.elapsed_ms = now.saturating_sub(self.state.start_perf_time);
        self.debounce.retain(|_, handle| handle.is_live(now));
        self.state.elapsed_ms
    }

    /// Stop capturing and return the buffered events
    ///
    /// The buffer is left intact; calling `stop()` while idle just returns it.
    pub fn stop(&mut self) -> CaptureResult {
        if self.state.is_recording {
            let now = self.clock.now_ms();
            self.state.elapsed_ms = now.saturating_sub(self.state.start_perf_time);
            self.state.is_recording = false;
            self.debounce.clear();

            tracing::debug!(
                events = self.state.events.len(),
                duration_ms = self.state.elapsed_ms,
                "Recording stopped"
            );
            self.notifier.notify(RecorderEvent::Stopped {
                event_count: self.state.events.len(),
                duration_ms: self.state.elapsed_ms,
            });
        }

        CaptureResult {
            events: self.state.events.clone(),
            duration_ms: self.state.elapsed_ms,
        }
    }

    /// Stop capturing and build a [`Recording`] from the buffer
    pub fn finish(&mut self, track_id: impl Into<TrackId>, name: Option<String>) -> Recording {
        let capture = self.stop();
        Recording::from_capture(track_id, name, capture)
    }

    /// Empty the buffer and reset elapsed time
    pub fn clear(&mut self) {
        self.state.events.clear();
        self.state.elapsed_ms = 0;
        self.debounce.clear();
        tracing::debug!("Recording buffer cleared");
        self.notifier.notify(RecorderEvent::Cleared);
    }
}
