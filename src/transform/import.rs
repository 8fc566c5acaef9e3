//! JSON import with field-level validation
//!
//! Import is all-or-nothing: the first malformed field aborts with a
//! [`TweakLogError::Validation`] naming the field and, for event fields, the
//! event index. No partially imported recording is ever returned.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{Result, TweakLogError};
use crate::types::{EventChange, EventId, EventKind, Recording, RecordingEvent, TrackId, TweakParam};

/// Name given to imported recordings that carry none
pub const IMPORTED_RECORDING_NAME: &str = "Imported Recording";

/// Parse a recording from exported JSON
pub fn import_from_json(contents: &str) -> Result<Recording> {
    let root: Value = serde_json::from_str(contents)?;
    let obj = root
        .as_object()
        .ok_or_else(|| TweakLogError::validation("root", "expected a JSON object"))?;

    let events = obj
        .get("events")
        .and_then(Value::as_array)
        .ok_or_else(|| TweakLogError::validation("events", "expected an array"))?;

    let duration_ms = obj
        .get("duration_ms")
        .and_then(as_millis)
        .ok_or_else(|| TweakLogError::validation("duration_ms", "expected a non-negative number"))?;

    let events = events
        .iter()
        .enumerate()
        .map(|(index, value)| parse_event(index, value))
        .collect::<Result<Vec<_>>>()?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(IMPORTED_RECORDING_NAME);
    let track_id = obj.get("track_id").and_then(Value::as_str).unwrap_or_default();

    let mut recording = Recording::new(TrackId::new(track_id))
        .with_name(name)
        .with_duration(duration_ms)
        .with_events(events);
    if let Some(created_at) = obj.get("created_at").and_then(as_datetime) {
        recording.created_at = created_at;
    }
    if let Some(updated_at) = obj.get("updated_at").and_then(as_datetime) {
        recording.updated_at = updated_at;
    }

    tracing::debug!(
        events = recording.event_count(),
        duration_ms,
        "Imported recording"
    );
    Ok(recording)
}

fn parse_event(index: usize, value: &Value) -> Result<RecordingEvent> {
    let obj = value
        .as_object()
        .ok_or_else(|| TweakLogError::event_validation(index, "event", "expected an object"))?;

    let timestamp_ms = obj.get("timestamp_ms").and_then(as_millis).ok_or_else(|| {
        TweakLogError::event_validation(index, "timestamp_ms", "expected a non-negative number")
    })?;

    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<EventKind>().ok())
        .ok_or_else(|| {
            TweakLogError::event_validation(
                index,
                "type",
                "expected one of tweak, layer_mute, layer_volume, layer_solo",
            )
        })?;

    let change = match kind {
        EventKind::Tweak => {
            let param = obj
                .get("param")
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<TweakParam>().ok())
                .ok_or_else(|| {
                    TweakLogError::event_validation(index, "param", "expected a known parameter")
                })?;
            EventChange::tweak(
                param,
                number_field(obj, index, "oldValue")?,
                number_field(obj, index, "newValue")?,
            )
        }
        EventKind::LayerMute => EventChange::layer_mute(
            layer_field(obj, index)?,
            bool_field(obj, index, "oldValue")?,
            bool_field(obj, index, "newValue")?,
        ),
        EventKind::LayerVolume => EventChange::layer_volume(
            layer_field(obj, index)?,
            number_field(obj, index, "oldValue")?,
            number_field(obj, index, "newValue")?,
        ),
        EventKind::LayerSolo => EventChange::layer_solo(
            layer_field(obj, index)?,
            bool_field(obj, index, "oldValue")?,
            bool_field(obj, index, "newValue")?,
        ),
    };

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(EventId::new)
        .unwrap_or_else(EventId::generate);

    Ok(RecordingEvent {
        id,
        timestamp_ms,
        change,
    })
}

fn layer_field<'a>(obj: &'a Map<String, Value>, index: usize) -> Result<&'a str> {
    obj.get("layerId")
        .and_then(Value::as_str)
        .ok_or_else(|| TweakLogError::event_validation(index, "layerId", "expected a string"))
}

fn number_field(obj: &Map<String, Value>, index: usize, field: &str) -> Result<f64> {
    obj.get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| TweakLogError::event_validation(index, field, "expected a number"))
}

fn bool_field(obj: &Map<String, Value>, index: usize, field: &str) -> Result<bool> {
    obj.get(field)
        .and_then(Value::as_bool)
        .ok_or_else(|| TweakLogError::event_validation(index, field, "expected a boolean"))
}

/// Non-negative JSON number as whole milliseconds (fractions truncated)
fn as_millis(value: &Value) -> Option<u64> {
    if let Some(ms) = value.as_u64() {
        return Some(ms);
    }
    value
        .as_f64()
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .map(|ms| ms.floor() as u64)
}

fn as_datetime(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
