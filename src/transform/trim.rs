//! Trimming a recording to a time window

use crate::types::Recording;

/// Keep the events in `[start_ms, end_ms]`, rebased to start at zero
///
/// `start_ms` is clamped to 0 and `end_ms` to the recording's duration. An
/// empty or inverted window yields a zero-duration recording without events.
/// Both ends are inclusive.
pub fn trim_recording(recording: &Recording, start_ms: i64, end_ms: i64) -> Recording {
    let start = start_ms.max(0) as u64;
    let end = (end_ms.max(0) as u64).min(recording.duration_ms);

    let mut trimmed = Recording::new(recording.track_id.clone());
    trimmed.name = recording.name.clone();

    if start >= end {
        tracing::debug!(start, end, "Trim window is empty");
        return trimmed;
    }

    let events = recording
        .events
        .iter()
        .filter(|e| e.timestamp_ms >= start && e.timestamp_ms <= end)
        .map(|e| {
            let mut event = e.clone();
            event.timestamp_ms -= start;
            event
        })
        .collect();

    trimmed.with_duration(end - start).with_events(events)
}
