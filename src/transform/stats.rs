//! Summary statistics over a recording

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{EventChange, EventKind, Recording, TweakParam};

/// Event counts and time span of a recording
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordingStats {
    pub total_events: usize,
    pub by_kind: BTreeMap<EventKind, usize>,
    pub by_param: BTreeMap<TweakParam, usize>,
    pub by_layer: BTreeMap<String, usize>,
    pub first_event_ms: Option<u64>,
    pub last_event_ms: Option<u64>,
    pub duration_ms: u64,
}

impl RecordingStats {
    pub fn count(&self, kind: EventKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Average events per second over the recording's duration
    pub fn events_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.total_events as f64 / (self.duration_ms as f64 / 1000.0)
    }
}

/// Compute statistics for a recording
pub fn recording_stats(recording: &Recording) -> RecordingStats {
    let mut stats = RecordingStats {
        total_events: recording.event_count(),
        duration_ms: recording.duration_ms,
        ..Default::default()
    };

    for event in &recording.events {
        *stats.by_kind.entry(event.kind()).or_default() += 1;
        match &event.change {
            EventChange::Tweak { param, .. } => *stats.by_param.entry(*param).or_default() += 1,
            EventChange::LayerMute { layer_id, .. }
            | EventChange::LayerVolume { layer_id, .. }
            | EventChange::LayerSolo { layer_id, .. } => {
                *stats.by_layer.entry(layer_id.clone()).or_default() += 1
            }
        }
    }

    stats.first_event_ms = recording.events.iter().map(|e| e.timestamp_ms).min();
    stats.last_event_ms = recording.events.iter().map(|e| e.timestamp_ms).max();
    stats
}
