//! Session state types shared by the recorder and the player

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::types::{Recording, RecordingEvent, RecordingId, TrackId};

/// Transient state of one capture session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingState {
    pub is_recording: bool,
    /// Transport time (seconds) when capture started
    pub start_time: f64,
    /// Wall-clock reference (ms) that event timestamps are measured from
    pub start_perf_time: u64,
    /// Event accumulator, in capture order
    pub events: Vec<RecordingEvent>,
    pub elapsed_ms: u64,
}

/// Transient playback cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time_ms: u64,
    /// Index of the first event not yet passed
    pub next_event_index: usize,
    /// Index of the last event pushed to the sink; `None` before the first
    pub last_applied_index: Option<usize>,
    /// Transport time (seconds) corresponding to recording time zero
    pub playback_start_time_ref: f64,
}

impl PlaybackState {
    /// Stopped at zero with nothing applied
    pub const IDLE: PlaybackState = PlaybackState {
        is_playing: false,
        current_time_ms: 0,
        next_event_index: 0,
        last_applied_index: None,
        playback_start_time_ref: 0.0,
    };

    pub fn reset(&mut self) {
        *self = Self::IDLE;
    }

    /// Whether the cursor is at its reset position
    pub fn is_idle(&self) -> bool {
        !self.is_playing
            && self.current_time_ms == 0
            && self.next_event_index == 0
            && self.last_applied_index.is_none()
    }

    /// `last_applied_index` with -1 standing in for "none applied"
    pub fn last_applied_signed(&self) -> i64 {
        self.last_applied_index.map_or(-1, |i| i as i64)
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::IDLE
    }
}

/// What a finished capture session produced
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    /// Captured events, in capture order
    pub events: Vec<RecordingEvent>,
    pub duration_ms: u64,
}

impl Recording {
    /// Build an immutable recording from a capture session
    pub fn from_capture(
        track_id: impl Into<TrackId>,
        name: Option<String>,
        capture: CaptureResult,
    ) -> Self {
        let mut recording = Recording::new(track_id)
            .with_duration(capture.duration_ms)
            .with_events(capture.events);
        recording.name = name;
        recording
    }
}

/// Recorder change notifications
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderEvent {
    Started { start_time: f64 },
    /// A new event was appended at `index`
    Captured { index: usize },
    /// The event at `index` absorbed a repeated change
    Coalesced { index: usize },
    /// A change was dropped because the event limit was reached
    Dropped,
    Stopped { event_count: usize, duration_ms: u64 },
    Cleared,
}

/// Player change notifications
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    RecordingChanged(Option<RecordingId>),
    Played { position_ms: u64 },
    Paused { position_ms: u64 },
    Seeked { position_ms: u64 },
    Reset,
    EventApplied { index: usize },
    Finished,
}

/// Fan-out of change notifications to any number of subscribers
///
/// Subscribers whose receiver was dropped are pruned on the next send.
#[derive(Debug)]
pub(crate) struct Notifier<E> {
    subscribers: Vec<Sender<E>>,
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<E: Clone> Notifier<E> {
    pub(crate) fn subscribe(&mut self) -> Receiver<E> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub(crate) fn notify(&mut self, event: E) {
        if self.subscribers.is_empty() {
            return;
        }
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventChange, TweakParam};

    #[test]
    fn test_playback_state_reset() {
        let mut state = PlaybackState {
            is_playing: true,
            current_time_ms: 1200,
            next_event_index: 3,
            last_applied_index: Some(2),
            playback_start_time_ref: 4.5,
        };
        assert!(!state.is_idle());
        assert_eq!(state.last_applied_signed(), 2);

        state.reset();
        assert!(state.is_idle());
        assert_eq!(state.last_applied_signed(), -1);
        assert_eq!(state, PlaybackState::default());
    }

    #[test]
    fn test_from_capture_sorts_events() {
        let capture = CaptureResult {
            events: vec![
                RecordingEvent::new(40, EventChange::tweak(TweakParam::Bpm, 1.0, 2.0)),
                RecordingEvent::new(10, EventChange::layer_mute("l1", false, true)),
            ],
            duration_ms: 100,
        };
        let recording = Recording::from_capture("track", Some("Take 1".into()), capture);
        assert_eq!(recording.duration_ms, 100);
        assert_eq!(recording.events[0].timestamp_ms, 10);
        assert_eq!(recording.name.as_deref(), Some("Take 1"));
    }

    #[test]
    fn test_notifier_prunes_dropped_receivers() {
        let mut notifier = Notifier::<PlayerEvent>::default();
        let keep = notifier.subscribe();
        let dropped = notifier.subscribe();
        drop(dropped);

        notifier.notify(PlayerEvent::Reset);
        assert_eq!(notifier.subscriber_count(), 1);
        assert_eq!(keep.try_recv().unwrap(), PlayerEvent::Reset);
    }
}
