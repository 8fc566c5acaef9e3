//! # tweaklog-rs: automation recording and replay
//!
//! Records live parameter tweaks and per-layer control changes made during a
//! performance and replays them deterministically in sync with an external
//! transport clock.
//!
//! ## Architecture
//!
//! - **Types**: The event model ([`RecordingEvent`], [`Recording`])
//! - **Session**: [`Recorder`] (capture with debounce) and [`Player`] (frame-driven replay)
//! - **Transport**: Injected [`TransportClock`] and [`WallClock`] sources
//! - **Sink**: [`ParameterSink`] receives every replayed change
//! - **Transform**: Merge, trim, export (JSON/CSV), import, statistics
//! - **Config**: TOML settings for the recorder, playback and export
//!
//! ## Configuration
//!
//! Settings live in the platform config directory under `tweaklog-rs/config.toml`
//! (see [`config`]).
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tweaklog_rs::{
//!     sink::LoggingSink,
//!     transport::{ManualTransport, SystemWallClock},
//!     Player, Recorder, TweakParam,
//! };
//!
//! let transport = Arc::new(ManualTransport::playing_at(0.0));
//! let mut recorder = Recorder::new(transport.clone(), Arc::new(SystemWallClock::new()));
//! recorder.start();
//! recorder.capture_tweak(TweakParam::Bpm, 120.0, 124.0);
//! let recording = recorder.finish("track-1", Some("Take 1".into()));
//!
//! let mut player = Player::new(transport.clone());
//! player.load(recording);
//! player.play();
//! let mut sink = LoggingSink::new();
//! while player.wants_frames() {
//!     transport.advance(1.0 / 60.0);
//!     player.tick(&mut sink);
//! }
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod sink;
pub mod transform;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::AutomationConfig;
pub use error::{Result, TweakLogError};
pub use session::{PlaybackControl, Player, Recorder, TickOutcome};
pub use sink::ParameterSink;
pub use transport::{TransportClock, TransportSnapshot, WallClock};
pub use types::{EventChange, EventKind, Recording, RecordingEvent, TweakParam};
