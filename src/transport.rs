//! Transport clock and wall clock contracts
//!
//! The recorder and player never own time. They read it from two external
//! collaborators:
//!
//! - [`TransportClock`] - musical transport (elapsed seconds, play state, BPM)
//! - [`WallClock`] - millisecond wall-clock "now" supplied by the host scheduler
//!
//! [`ManualTransport`] and [`ManualWallClock`] are driven by hand; the CLI
//! replay command and the test-suite use them to simulate a running host.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

/// A point-in-time reading of the transport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportSnapshot {
    /// Elapsed transport time in seconds
    pub seconds: f64,
    /// Whether the transport is running
    pub playing: bool,
    /// Current tempo
    pub bpm: f64,
}

impl Default for TransportSnapshot {
    fn default() -> Self {
        Self {
            seconds: 0.0,
            playing: false,
            bpm: 120.0,
        }
    }
}

/// Read-only musical transport
#[cfg_attr(test, mockall::automock)]
pub trait TransportClock: Send + Sync {
    fn snapshot(&self) -> TransportSnapshot;
}

/// Millisecond-resolution wall clock
#[cfg_attr(test, mockall::automock)]
pub trait WallClock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Monotonic wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemWallClock {
    origin: Instant,
}

impl Default for SystemWallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemWallClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl WallClock for SystemWallClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven transport
///
/// Values are stored as atomics so the transport can be shared between a
/// recorder/player pair and whatever advances it.
#[derive(Debug)]
pub struct ManualTransport {
    seconds_bits: AtomicU64,
    bpm_bits: AtomicU64,
    playing: AtomicBool,
}

impl Default for ManualTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTransport {
    /// Stopped transport at 0 s, 120 BPM
    pub fn new() -> Self {
        let snap = TransportSnapshot::default();
        Self {
            seconds_bits: AtomicU64::new(snap.seconds.to_bits()),
            bpm_bits: AtomicU64::new(snap.bpm.to_bits()),
            playing: AtomicBool::new(snap.playing),
        }
    }

    /// Running transport at the given position
    pub fn playing_at(seconds: f64) -> Self {
        let transport = Self::new();
        transport.set_seconds(seconds);
        transport.set_playing(true);
        transport
    }

    pub fn set_seconds(&self, seconds: f64) {
        self.seconds_bits.store(seconds.to_bits(), Ordering::Release);
    }

    /// Move the transport forward by `delta` seconds
    pub fn advance(&self, delta: f64) {
        let now = self.seconds();
        self.set_seconds(now + delta);
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::Release);
    }

    pub fn set_bpm(&self, bpm: f64) {
        self.bpm_bits.store(bpm.to_bits(), Ordering::Release);
    }

    pub fn seconds(&self) -> f64 {
        f64::from_bits(self.seconds_bits.load(Ordering::Acquire))
    }
}

impl TransportClock for ManualTransport {
    fn snapshot(&self) -> TransportSnapshot {
        TransportSnapshot {
            seconds: self.seconds(),
            playing: self.playing.load(Ordering::Acquire),
            bpm: f64::from_bits(self.bpm_bits.load(Ordering::Acquire)),
        }
    }
}

/// Hand-driven wall clock
#[derive(Debug, Default)]
pub struct ManualWallClock {
    now: AtomicU64,
}

impl ManualWallClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::Release);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::AcqRel);
    }
}

impl WallClock for ManualWallClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}
