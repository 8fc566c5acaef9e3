//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use std::sync::Arc;

use tweaklog_rs::transport::{ManualTransport, ManualWallClock};
use tweaklog_rs::{Player, Recorder, Recording};

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Recorder on a playing transport and a wall clock starting at 0 ms
pub fn recorder_rig() -> (Recorder, Arc<ManualTransport>, Arc<ManualWallClock>) {
    let transport = Arc::new(ManualTransport::playing_at(0.0));
    let clock = Arc::new(ManualWallClock::new(0));
    let recorder = Recorder::new(transport.clone(), clock.clone());
    (recorder, transport, clock)
}

/// Player on a playing transport with `recording` loaded
pub fn player_rig(recording: Recording) -> (Player, Arc<ManualTransport>) {
    let transport = Arc::new(ManualTransport::playing_at(0.0));
    let mut player = Player::new(transport.clone());
    player.load(recording);
    (player, transport)
}
