//! Merging recordings end-to-end

use crate::types::{Recording, RecordingEvent, TrackId};

/// Concatenate recordings, each offset by the total duration of those before it
///
/// Offsets saturate at `u64::MAX` milliseconds.
///
/// - No input: an empty, zero-duration recording.
/// - One input: a copy that keeps its id, name and event ids.
/// - Several inputs: every event gets a fresh id and the result is named
///   `Merged (N recordings)`, on the first input's track.
pub fn merge_recordings(recordings: &[Recording]) -> Recording {
    match recordings {
        [] => Recording::new(TrackId::new("")),
        [single] => {
            let mut copy = single.clone();
            copy.sort_events();
            copy
        }
        [first, ..] => {
            let total_events = recordings.iter().map(Recording::event_count).sum();
            let mut events = Vec::with_capacity(total_events);
            let mut offset_ms = 0u64;

            for recording in recordings {
                events.extend(recording.events.iter().map(|event| {
                    RecordingEvent::new(
                        event.timestamp_ms.saturating_add(offset_ms),
                        event.change.clone(),
                    )
                }));
                offset_ms = offset_ms.saturating_add(recording.duration_ms);
            }

            tracing::debug!(
                inputs = recordings.len(),
                events = events.len(),
                duration_ms = offset_ms,
                "Merged recordings"
            );

            Recording::new(first.track_id.clone())
                .with_name(format!("Merged ({} recordings)", recordings.len()))
                .with_duration(offset_ms)
                .with_events(events)
        }
    }
}
