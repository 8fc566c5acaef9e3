//! Test data builders for creating test objects

use tweaklog_rs::types::{EventChange, Recording, RecordingEvent, TweakParam};

/// Builder for creating test Recordings
pub struct RecordingBuilder {
    track_id: String,
    name: Option<String>,
    duration_ms: u64,
    events: Vec<RecordingEvent>,
}

impl RecordingBuilder {
    pub fn new() -> Self {
        Self {
            track_id: "test-track".to_string(),
            name: None,
            duration_ms: 10_000,
            events: Vec::new(),
        }
    }

    pub fn track(mut self, track_id: &str) -> Self {
        self.track_id = track_id.to_string();
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn event(mut self, timestamp_ms: u64, change: EventChange) -> Self {
        self.events.push(RecordingEvent::new(timestamp_ms, change));
        self
    }

    pub fn tweak(self, timestamp_ms: u64, param: TweakParam, old: f64, new: f64) -> Self {
        self.event(timestamp_ms, EventChange::tweak(param, old, new))
    }

    pub fn mute(self, timestamp_ms: u64, layer_id: &str, muted: bool) -> Self {
        self.event(timestamp_ms, EventChange::layer_mute(layer_id, !muted, muted))
    }

    /// One tweak per timestamp
    pub fn tweaks_at(self, timestamps: &[u64]) -> Self {
        timestamps.iter().enumerate().fold(self, |b, (i, &ts)| {
            b.tweak(ts, TweakParam::FilterCutoff, i as f64, i as f64 + 1.0)
        })
    }

    pub fn build(self) -> Recording {
        let recording = Recording::new(self.track_id.as_str())
            .with_duration(self.duration_ms)
            .with_events(self.events);
        match self.name {
            Some(name) => recording.with_name(name),
            None => recording,
        }
    }
}

impl Default for RecordingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The two-event recording used across the player tests:
/// bpm 82 -> 85 at 1 s, layer `l1` muted at 3 s, 10 s long
pub fn scenario_recording() -> Recording {
    RecordingBuilder::new()
        .track("track-1")
        .duration(10_000)
        .tweak(1000, TweakParam::Bpm, 82.0, 85.0)
        .mute(3000, "l1", true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_builder() {
        let recording = RecordingBuilder::new()
            .name("Built")
            .duration(500)
            .tweaks_at(&[300, 100])
            .build();

        assert_eq!(recording.name.as_deref(), Some("Built"));
        assert_eq!(recording.duration_ms, 500);
        assert_eq!(recording.events[0].timestamp_ms, 100);
    }
}
