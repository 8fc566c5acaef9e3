//! Parameter sink: where replayed values go
//!
//! Every callback has an empty default body, so a sink only implements the
//! handlers it cares about and the player skips the rest silently.

use crate::types::{EventChange, RecordingEvent, TweakParam};

/// Receiver for parameter values pushed out by the player
#[cfg_attr(test, mockall::automock)]
pub trait ParameterSink {
    fn on_tweak_change(&mut self, _param: TweakParam, _value: f64) {}

    fn on_layer_mute_change(&mut self, _layer_id: &str, _muted: bool) {}

    fn on_layer_volume_change(&mut self, _layer_id: &str, _volume: f64) {}

    fn on_layer_solo_change(&mut self, _layer_id: &str, _soloed: bool) {}

    /// Called after the variant-specific handler, once per applied event
    fn on_event_triggered(&mut self, _event: &RecordingEvent) {}
}

/// Dispatch an event to the matching handler, then to `on_event_triggered`
pub fn dispatch<S: ParameterSink + ?Sized>(sink: &mut S, event: &RecordingEvent) {
    match &event.change {
        EventChange::Tweak { param, new_value, .. } => sink.on_tweak_change(*param, *new_value),
        EventChange::LayerMute {
            layer_id,
            new_value,
            ..
        } => sink.on_layer_mute_change(layer_id, *new_value),
        EventChange::LayerVolume {
            layer_id,
            new_value,
            ..
        } => sink.on_layer_volume_change(layer_id, *new_value),
        EventChange::LayerSolo {
            layer_id,
            new_value,
            ..
        } => sink.on_layer_solo_change(layer_id, *new_value),
    }
    sink.on_event_triggered(event);
}

/// Sink that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ParameterSink for NullSink {}

/// Sink that logs each applied event through `tracing`
#[derive(Debug, Default)]
pub struct LoggingSink {
    applied: usize,
}

impl LoggingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events seen so far
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl ParameterSink for LoggingSink {
    fn on_event_triggered(&mut self, event: &RecordingEvent) {
        self.applied += 1;
        tracing::info!(
            timestamp_ms = event.timestamp_ms,
            kind = %event.kind(),
            old = %event.change.old_value(),
            new = %event.change.new_value(),
            control = %event
                .change
                .param()
                .map(|p| p.as_str().to_string())
                .or_else(|| event.change.layer_id().map(str::to_string))
                .unwrap_or_default(),
            "Applied event"
        );
    }
}

/// Sink that keeps every applied event, in application order
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub events: Vec<RecordingEvent>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamps of the applied events, in application order
    pub fn timestamps(&self) -> Vec<u64> {
        self.events.iter().map(|e| e.timestamp_ms).collect()
    }
}

impl ParameterSink for CollectingSink {
    fn on_event_triggered(&mut self, event: &RecordingEvent) {
        self.events.push(event.clone());
    }
}
