//! Live recording and transport-synchronized playback
//!
//! The [`Recorder`] captures parameter changes while the transport plays,
//! coalescing rapid bursts on the same control into one event. The
//! [`Player`] replays a finished [`Recording`](crate::types::Recording)
//! against a [`ParameterSink`](crate::sink::ParameterSink), slaved to the
//! transport position.
//!
//! # Features
//!
//! - Per-control debounce with a sliding coalescing window
//! - Frame-driven updates: the host calls `tick()` while `wants_frames()` is true
//! - Exactly-once, in-order event application during a play session
//! - Seek, pause and reset, including deferred requests from sink callbacks
//! - Change notifications over crossbeam channels

pub mod player;
pub mod recorder;
pub mod types;

pub use player::{ControlRequest, PlaybackControl, Player, TickOutcome};
pub use recorder::{DebounceHandle, Recorder};
pub use types::{CaptureResult, PlaybackState, PlayerEvent, RecorderEvent, RecordingState};
