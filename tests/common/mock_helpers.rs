//! Mock construction helpers

use mockall::mock;
use tweaklog_rs::types::{RecordingEvent, TweakParam};
use tweaklog_rs::{ParameterSink, PlaybackControl, TransportClock, TransportSnapshot};

mock! {
    pub Transport {}

    impl TransportClock for Transport {
        fn snapshot(&self) -> TransportSnapshot;
    }
}

mock! {
    pub Sink {}

    impl ParameterSink for Sink {
        fn on_tweak_change(&mut self, param: TweakParam, value: f64);
        fn on_layer_mute_change(&mut self, layer_id: &str, muted: bool);
        fn on_layer_volume_change(&mut self, layer_id: &str, volume: f64);
        fn on_layer_solo_change(&mut self, layer_id: &str, soloed: bool);
        fn on_event_triggered(&mut self, event: &RecordingEvent);
    }
}

/// Snapshot of a playing transport at `seconds`
pub fn playing_at(seconds: f64) -> TransportSnapshot {
    TransportSnapshot {
        seconds,
        playing: true,
        ..Default::default()
    }
}

/// Sink that records timestamps and fires a control request when it sees
/// the event at `trigger_ms`
pub struct ControllingSink {
    pub control: PlaybackControl,
    pub trigger_ms: u64,
    pub reset: bool,
    pub applied: Vec<u64>,
}

impl ControllingSink {
    pub fn resetting_at(control: PlaybackControl, trigger_ms: u64) -> Self {
        Self {
            control,
            trigger_ms,
            reset: true,
            applied: Vec::new(),
        }
    }

    pub fn pausing_at(control: PlaybackControl, trigger_ms: u64) -> Self {
        Self {
            control,
            trigger_ms,
            reset: false,
            applied: Vec::new(),
        }
    }
}

impl ParameterSink for ControllingSink {
    fn on_event_triggered(&mut self, event: &RecordingEvent) {
        self.applied.push(event.timestamp_ms);
        if event.timestamp_ms == self.trigger_ms {
            if self.reset {
                self.control.request_reset();
            } else {
                self.control.request_pause();
            }
        }
    }
}
