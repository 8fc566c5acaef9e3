//! Transform and export utilities
//!
//! Pure functions over immutable [`Recording`](crate::types::Recording)
//! values. Every operation returns a new recording or a new text blob and
//! never mutates its inputs.
//!
//! # Features
//!
//! - Merge several recordings end-to-end
//! - Trim a recording to a window (inclusive at both ends)
//! - Export to JSON or CSV, import from JSON
//! - `MM:SS` time formatting shared with the player's position display
//! - On-demand summary statistics

pub mod export;
pub mod format;
pub mod import;
pub mod merge;
pub mod stats;
pub mod trim;

pub use export::{export_to_csv, export_to_json, CSV_HEADER};
pub use format::{format_time, generate_filename};
pub use import::{import_from_json, IMPORTED_RECORDING_NAME};
pub use merge::merge_recordings;
pub use stats::{recording_stats, RecordingStats};
pub use trim::trim_recording;
