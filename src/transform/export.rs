//! JSON and CSV export
//!
//! Both formats are transfer formats for humans and other tools; they are
//! not the storage format of the owning project layer.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ExportFormat;
use crate::error::Result;
use crate::types::{Recording, RecordingEvent, TrackId};

use super::format::format_time;

/// CSV header row
pub const CSV_HEADER: &str = "timestamp_ms,timestamp_formatted,type,param,layer_id,old_value,new_value";

#[derive(Serialize)]
struct JsonExport<'a> {
    name: &'a str,
    track_id: &'a TrackId,
    duration_ms: u64,
    duration_formatted: String,
    event_count: usize,
    created_at: &'a DateTime<Utc>,
    updated_at: &'a DateTime<Utc>,
    events: Vec<ExportedEvent<'a>>,
}

#[derive(Serialize)]
struct ExportedEvent<'a> {
    #[serde(flatten)]
    event: &'a RecordingEvent,
    timestamp_formatted: String,
}

/// Export a recording as pretty-printed JSON (2-space indentation)
///
/// Values are expected to be finite; the recorder never stores NaN or
/// infinity, which JSON cannot represent.
pub fn export_to_json(recording: &Recording) -> Result<String> {
    let export = JsonExport {
        name: recording.display_name(),
        track_id: &recording.track_id,
        duration_ms: recording.duration_ms,
        duration_formatted: format_time(recording.duration_ms),
        event_count: recording.event_count(),
        created_at: &recording.created_at,
        updated_at: &recording.updated_at,
        events: recording
            .events
            .iter()
            .map(|event| ExportedEvent {
                event,
                timestamp_formatted: format_time(event.timestamp_ms),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Export a recording as CSV, one row per event
pub fn export_to_csv(recording: &Recording) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + recording.event_count() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for event in &recording.events {
        let change = &event.change;
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            event.timestamp_ms,
            format_time(event.timestamp_ms),
            change.kind(),
            change.param().map(|p| p.as_str()).unwrap_or(""),
            csv_field(change.layer_id().unwrap_or("")),
            change.old_value(),
            change.new_value(),
        );
    }
    out
}

/// Export in the given format
pub fn export_as(recording: &Recording, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => export_to_json(recording),
        ExportFormat::Csv => Ok(export_to_csv(recording)),
    }
}

/// Quote a field if it contains a separator, quote or line break
fn csv_field(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\"")).into()
    } else {
        value.into()
    }
}
