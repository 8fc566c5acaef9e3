//! Core data types for tweaklog-rs
//!
//! This module contains the event model shared by the recorder, the player
//! and the transform utilities.
//!
//! # Main Types
//!
//! - [`TweakParam`] - The fixed set of scalar performance parameters
//! - [`EventChange`] - What changed: a tweak or one of the per-layer controls
//! - [`RecordingEvent`] - A timestamped, identified [`EventChange`]
//! - [`Recording`] - An immutable, time-ordered log of events for one track
//!
//! # Wire Shape
//!
//! Events serialize flat, with the variant in a `type` tag:
//!
//! ```json
//! { "id": "…", "timestamp_ms": 1000, "type": "tweak", "param": "bpm", "oldValue": 82, "newValue": 85 }
//! { "id": "…", "timestamp_ms": 3000, "type": "layer_mute", "layerId": "l1", "oldValue": false, "newValue": true }
//! ```
//!
//! Because each [`EventChange`] variant only carries the fields valid for it,
//! a tweak can never hold a layer id and a mute can never hold a number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Name used by exports when a recording has none
pub const DEFAULT_RECORDING_NAME: &str = "Untitled Recording";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Get the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Opaque unique token identifying a single recorded event
    EventId
);
string_id!(
    /// Identity of a [`Recording`]. Two recordings are "the same" iff their ids match.
    RecordingId
);
string_id!(
    /// Reference to an externally-owned track
    TrackId
);

/// Scalar performance parameters that can be tweaked live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweakParam {
    /// Tempo in beats per minute
    Bpm,
    /// Filter cutoff
    FilterCutoff,
    /// Filter resonance
    FilterResonance,
    /// Reverb wet/dry mix
    ReverbMix,
    /// Delay wet/dry mix
    DelayMix,
    /// Swing amount
    Swing,
    /// Master output volume
    MasterVolume,
}

impl TweakParam {
    /// All parameters, in declaration order
    pub const ALL: [TweakParam; 7] = [
        TweakParam::Bpm,
        TweakParam::FilterCutoff,
        TweakParam::FilterResonance,
        TweakParam::ReverbMix,
        TweakParam::DelayMix,
        TweakParam::Swing,
        TweakParam::MasterVolume,
    ];

    /// Wire name of the parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            TweakParam::Bpm => "bpm",
            TweakParam::FilterCutoff => "filter_cutoff",
            TweakParam::FilterResonance => "filter_resonance",
            TweakParam::ReverbMix => "reverb_mix",
            TweakParam::DelayMix => "delay_mix",
            TweakParam::Swing => "swing",
            TweakParam::MasterVolume => "master_volume",
        }
    }
}

impl fmt::Display for TweakParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TweakParam {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TweakParam::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown parameter '{}'", s))
    }
}

/// The four event variants, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Scalar performance parameter change
    Tweak,
    /// Layer mute toggle
    LayerMute,
    /// Layer volume change
    LayerVolume,
    /// Layer solo toggle
    LayerSolo,
}

impl EventKind {
    /// All variants, in declaration order
    pub const ALL: [EventKind; 4] = [
        EventKind::Tweak,
        EventKind::LayerMute,
        EventKind::LayerVolume,
        EventKind::LayerSolo,
    ];

    /// Wire name of the variant (the `type` tag)
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Tweak => "tweak",
            EventKind::LayerMute => "layer_mute",
            EventKind::LayerVolume => "layer_volume",
            EventKind::LayerSolo => "layer_solo",
        }
    }

    /// Whether values of this variant are booleans (mute/solo) rather than numbers
    pub fn is_boolean(&self) -> bool {
        matches!(self, EventKind::LayerMute | EventKind::LayerSolo)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown event type '{}'", s))
    }
}

/// A single old or new value, typed by variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventValue {
    Number(f64),
    Bool(bool),
}

impl fmt::Display for EventValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventValue::Number(n) => write!(f, "{}", n),
            EventValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Debounce key: events with equal keys coalesce into one another
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub kind: EventKind,
    pub param: Option<TweakParam>,
    pub layer_id: Option<String>,
}

/// What a recorded event changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventChange {
    #[serde(rename_all = "camelCase")]
    Tweak {
        param: TweakParam,
        old_value: f64,
        new_value: f64,
    },
    #[serde(rename_all = "camelCase")]
    LayerMute {
        layer_id: String,
        old_value: bool,
        new_value: bool,
    },
    #[serde(rename_all = "camelCase")]
    LayerVolume {
        layer_id: String,
        old_value: f64,
        new_value: f64,
    },
    #[serde(rename_all = "camelCase")]
    LayerSolo {
        layer_id: String,
        old_value: bool,
        new_value: bool,
    },
}

impl EventChange {
    /// Change to a tweak parameter
    pub fn tweak(param: TweakParam, old_value: f64, new_value: f64) -> Self {
        EventChange::Tweak {
            param,
            old_value,
            new_value,
        }
    }

    /// Layer mute toggle
    pub fn layer_mute(layer_id: impl Into<String>, old_value: bool, new_value: bool) -> Self {
        EventChange::LayerMute {
            layer_id: layer_id.into(),
            old_value,
            new_value,
        }
    }

    /// Layer volume change
    pub fn layer_volume(layer_id: impl Into<String>, old_value: f64, new_value: f64) -> Self {
        EventChange::LayerVolume {
            layer_id: layer_id.into(),
            old_value,
            new_value,
        }
    }

    /// Layer solo toggle
    pub fn layer_solo(layer_id: impl Into<String>, old_value: bool, new_value: bool) -> Self {
        EventChange::LayerSolo {
            layer_id: layer_id.into(),
            old_value,
            new_value,
        }
    }

    /// Variant tag of this change
    pub fn kind(&self) -> EventKind {
        match self {
            EventChange::Tweak { .. } => EventKind::Tweak,
            EventChange::LayerMute { .. } => EventKind::LayerMute,
            EventChange::LayerVolume { .. } => EventKind::LayerVolume,
            EventChange::LayerSolo { .. } => EventKind::LayerSolo,
        }
    }

    /// The tweaked parameter (tweaks only)
    pub fn param(&self) -> Option<TweakParam> {
        match self {
            EventChange::Tweak { param, .. } => Some(*param),
            _ => None,
        }
    }

    /// The affected layer (layer variants only)
    pub fn layer_id(&self) -> Option<&str> {
        match self {
            EventChange::Tweak { .. } => None,
            EventChange::LayerMute { layer_id, .. }
            | EventChange::LayerVolume { layer_id, .. }
            | EventChange::LayerSolo { layer_id, .. } => Some(layer_id),
        }
    }

    /// Value before the change
    pub fn old_value(&self) -> EventValue {
        match self {
            EventChange::Tweak { old_value, .. } | EventChange::LayerVolume { old_value, .. } => {
                EventValue::Number(*old_value)
            }
            EventChange::LayerMute { old_value, .. } | EventChange::LayerSolo { old_value, .. } => {
                EventValue::Bool(*old_value)
            }
        }
    }

    /// Value after the change
    pub fn new_value(&self) -> EventValue {
        match self {
            EventChange::Tweak { new_value, .. } | EventChange::LayerVolume { new_value, .. } => {
                EventValue::Number(*new_value)
            }
            EventChange::LayerMute { new_value, .. } | EventChange::LayerSolo { new_value, .. } => {
                EventValue::Bool(*new_value)
            }
        }
    }

    /// Whether both values are finite (boolean variants always are)
    ///
    /// Non-finite numbers have no JSON representation, so they are never
    /// recorded.
    pub fn is_finite(&self) -> bool {
        match self {
            EventChange::Tweak {
                old_value,
                new_value,
                ..
            }
            | EventChange::LayerVolume {
                old_value,
                new_value,
                ..
            } => old_value.is_finite() && new_value.is_finite(),
            EventChange::LayerMute { .. } | EventChange::LayerSolo { .. } => true,
        }
    }

    /// Debounce key of this change
    pub fn key(&self) -> EventKey {
        EventKey {
            kind: self.kind(),
            param: self.param(),
            layer_id: self.layer_id().map(str::to_string),
        }
    }

    /// Overwrite this change's new value with `later`'s, keeping the old value.
    ///
    /// Returns false (and leaves `self` untouched) if the two changes do not
    /// share a debounce key.
    pub fn absorb(&mut self, later: &EventChange) -> bool {
        if self.key() != later.key() {
            return false;
        }
        match (self, later) {
            (
                EventChange::Tweak { new_value, .. },
                EventChange::Tweak { new_value: next, .. },
            )
            | (
                EventChange::LayerVolume { new_value, .. },
                EventChange::LayerVolume { new_value: next, .. },
            ) => *new_value = *next,
            (
                EventChange::LayerMute { new_value, .. },
                EventChange::LayerMute { new_value: next, .. },
            )
            | (
                EventChange::LayerSolo { new_value, .. },
                EventChange::LayerSolo { new_value: next, .. },
            ) => *new_value = *next,
            _ => return false,
        }
        true
    }
}

/// A recorded parameter change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingEvent {
    pub id: EventId,
    /// Milliseconds since the start of the recording
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub change: EventChange,
}

impl RecordingEvent {
    /// Create an event with a freshly generated id
    pub fn new(timestamp_ms: u64, change: EventChange) -> Self {
        Self {
            id: EventId::generate(),
            timestamp_ms,
            change,
        }
    }

    /// Create an event with an existing id
    pub fn with_id(id: impl Into<EventId>, timestamp_ms: u64, change: EventChange) -> Self {
        Self {
            id: id.into(),
            timestamp_ms,
            change,
        }
    }

    /// Variant tag of the event
    pub fn kind(&self) -> EventKind {
        self.change.kind()
    }
}

/// An immutable automation log for one track
///
/// Transform operations (merge, trim, import) always produce new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub id: RecordingId,
    pub track_id: TrackId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub duration_ms: u64,
    /// Sorted ascending by `timestamp_ms` once built through a constructor
    pub events: Vec<RecordingEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recording {
    /// Create an empty, zero-duration recording with a fresh id
    pub fn new(track_id: impl Into<TrackId>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordingId::generate(),
            track_id: track_id.into(),
            name: None,
            duration_ms: 0,
            events: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the duration in milliseconds
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Replace the event list, sorting it by timestamp (stable)
    pub fn with_events(mut self, events: Vec<RecordingEvent>) -> Self {
        self.events = events;
        self.sort_events();
        self
    }

    /// Name used for display and export
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_RECORDING_NAME)
    }

    /// Number of events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Check if there are no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Stable sort of the event list by timestamp
    pub fn sort_events(&mut self) {
        self.events.sort_by_key(|e| e.timestamp_ms);
    }

    /// Whether the event list is ordered ascending by timestamp
    pub fn is_sorted(&self) -> bool {
        self.events
            .windows(2)
            .all(|w| w[0].timestamp_ms <= w[1].timestamp_ms)
    }

    /// Number of events with `timestamp_ms <= position_ms` (requires sorted events)
    pub fn events_at_or_before(&self, position_ms: u64) -> usize {
        self.events.partition_point(|e| e.timestamp_ms <= position_ms)
    }

    /// Same identity as `other` (id comparison, not content)
    pub fn same_identity(&self, other: &Recording) -> bool {
        self.id == other.id
    }
}
