//! Integration tests for transport-synchronized playback

mod common;

use common::builders::{scenario_recording, RecordingBuilder};
use common::mock_helpers::{playing_at, ControllingSink, MockSink, MockTransport};
use common::player_rig;
use mockall::predicate::eq;
use mockall::Sequence;
use proptest::prelude::*;
use std::sync::Arc;
use tweaklog_rs::session::{ControlRequest, PlayerEvent};
use tweaklog_rs::sink::CollectingSink;
use tweaklog_rs::types::TweakParam;
use tweaklog_rs::Player;

#[test]
fn test_scenario_replay_and_seek() {
    let (mut player, transport) = player_rig(scenario_recording());
    let mut sink = CollectingSink::new();
    assert!(player.play());

    transport.advance(1.5);
    let outcome = player.tick(&mut sink);
    assert_eq!(outcome.applied, 1);
    assert_eq!(outcome.current_time_ms, 1500);
    assert_eq!(sink.timestamps(), vec![1000]);

    player.seek(1500);
    assert_eq!(player.next_event_index(), 1);
    assert_eq!(player.last_applied_index(), Some(0));
    assert_eq!(player.position_display(), "00:01");
}

#[test]
fn test_tick_is_idempotent_at_fixed_time() {
    let (mut player, transport) = player_rig(scenario_recording());
    let mut sink = CollectingSink::new();
    player.play();

    transport.advance(3.5);
    assert_eq!(player.tick(&mut sink).applied, 2);
    assert_eq!(player.tick(&mut sink).applied, 0);
    assert_eq!(player.tick(&mut sink).applied, 0);
    assert_eq!(sink.timestamps(), vec![1000, 3000]);
}

#[test]
fn test_sink_receives_new_values() {
    let (mut player, transport) = player_rig(scenario_recording());
    let mut sink = MockSink::new();
    let mut seq = Sequence::new();
    sink.expect_on_tweak_change()
        .with(eq(TweakParam::Bpm), eq(85.0))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    sink.expect_on_event_triggered()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    sink.expect_on_layer_mute_change()
        .withf(|layer, muted| layer == "l1" && *muted)
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    sink.expect_on_event_triggered()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    player.play();
    transport.advance(5.0);
    player.tick(&mut sink);
}

#[test]
fn test_reset_requested_mid_tick_applies_due_events_first() {
    let recording = RecordingBuilder::new()
        .tweaks_at(&[1000, 1200, 3000])
        .build();
    let (mut player, transport) = player_rig(recording);
    let mut sink = ControllingSink::resetting_at(player.control(), 1000);
    let events = player.subscribe();
    player.play();

    transport.advance(1.5);
    let outcome = player.tick(&mut sink);

    // Both due events were pushed before the reset took effect
    assert_eq!(sink.applied, vec![1000, 1200]);
    assert_eq!(outcome.applied, 2);
    assert!(outcome.stopped);
    assert!(!outcome.finished);
    assert!(player.state().is_idle());
    assert_eq!(player.control().pending(), None);

    let seen: Vec<PlayerEvent> = events.try_iter().collect();
    assert_eq!(seen.last(), Some(&PlayerEvent::Reset));
}

#[test]
fn test_pause_requested_mid_tick_keeps_position() {
    let recording = RecordingBuilder::new()
        .tweaks_at(&[1000, 1200, 3000])
        .build();
    let (mut player, transport) = player_rig(recording);
    let mut sink = ControllingSink::pausing_at(player.control(), 1200);
    player.play();

    transport.advance(1.5);
    player.tick(&mut sink);
    assert!(!player.is_playing());
    assert_eq!(player.current_time_ms(), 1500);
    assert_eq!(player.next_event_index(), 2);

    // Resuming continues without re-applying anything
    transport.advance(2.0);
    assert!(player.play());
    transport.advance(2.0);
    player.tick(&mut sink);
    assert_eq!(sink.applied, vec![1000, 1200, 3000]);
}

#[test]
fn test_pause_requested_on_final_frame_still_stops_at_end() {
    let recording = RecordingBuilder::new()
        .duration(10_000)
        .tweaks_at(&[9000])
        .build();
    let (mut player, transport) = player_rig(recording);
    let mut sink = ControllingSink::pausing_at(player.control(), 9000);
    let events = player.subscribe();
    player.play();

    transport.advance(12.0);
    let outcome = player.tick(&mut sink);

    assert_eq!(sink.applied, vec![9000]);
    assert!(outcome.stopped);
    assert!(outcome.finished);
    assert_eq!(outcome.current_time_ms, 10_000);
    assert_eq!(player.current_time_ms(), 10_000);
    assert_eq!(player.position_display(), "00:10");
    assert!(!player.is_playing());
    assert!(events.try_iter().any(|e| e == PlayerEvent::Finished));
}

#[test]
fn test_reset_requested_on_final_frame_rewinds() {
    let recording = RecordingBuilder::new()
        .duration(10_000)
        .tweaks_at(&[9000])
        .build();
    let (mut player, transport) = player_rig(recording);
    let mut sink = ControllingSink::resetting_at(player.control(), 9000);
    player.play();

    transport.advance(12.0);
    let outcome = player.tick(&mut sink);

    assert!(outcome.stopped);
    assert!(!outcome.finished);
    assert!(player.state().is_idle());
}

#[test]
fn test_reset_wins_over_pause() {
    let (mut player, transport) = player_rig(scenario_recording());
    player.play();
    transport.advance(1.5);
    player.tick(&mut CollectingSink::new());

    let control = player.control();
    control.request_pause();
    control.request_reset();
    control.request_pause();

    assert_eq!(control.pending(), Some(ControlRequest::Reset));
    let outcome = player.tick(&mut CollectingSink::new());
    assert_eq!(outcome.applied, 0);
    assert!(player.state().is_idle());
}

#[test]
fn test_transport_stop_pauses_playback() {
    let (mut player, transport) = player_rig(scenario_recording());
    player.play();
    transport.advance(0.5);
    player.tick(&mut CollectingSink::new());

    transport.set_playing(false);
    let outcome = player.tick(&mut CollectingSink::new());
    assert!(outcome.stopped);
    assert!(!player.is_playing());
    assert_eq!(player.current_time_ms(), 500);
}

#[test]
fn test_reaching_end_finishes() {
    let (mut player, transport) = player_rig(scenario_recording());
    let events = player.subscribe();
    let mut sink = CollectingSink::new();
    player.play();

    transport.advance(12.5);
    let outcome = player.tick(&mut sink);
    assert!(outcome.finished);
    assert_eq!(outcome.current_time_ms, 10_000);
    assert!(!player.wants_frames());
    assert_eq!(player.progress(), 1.0);
    assert!(events.try_iter().any(|e| e == PlayerEvent::Finished));
}

#[test]
fn test_seek_while_playing_skips_passed_events() {
    let (mut player, transport) = player_rig(scenario_recording());
    let mut sink = CollectingSink::new();
    player.play();

    transport.advance(1.5);
    player.seek(5000);
    transport.advance(0.5);
    let outcome = player.tick(&mut sink);

    assert_eq!(outcome.current_time_ms, 5500);
    assert!(sink.events.is_empty());

    // Seeking backwards makes earlier events due again
    player.seek(0);
    transport.advance(3.5);
    player.tick(&mut sink);
    assert_eq!(sink.timestamps(), vec![1000, 3000]);
}

#[test]
fn test_seek_clamps() {
    let (mut player, _transport) = player_rig(scenario_recording());
    player.seek(-250);
    assert_eq!(player.current_time_ms(), 0);
    assert_eq!(player.last_applied_index(), None);

    player.seek(99_999);
    assert_eq!(player.current_time_ms(), 10_000);
    assert_eq!(player.next_event_index(), 2);
}

#[test]
fn test_new_identity_resets_cursor() {
    let (mut player, transport) = player_rig(scenario_recording());
    player.play();
    transport.advance(3.5);
    player.tick(&mut CollectingSink::new());

    // Same id, edited contents: cursor kept
    let mut edited = player.recording().cloned().unwrap();
    edited.duration_ms = 20_000;
    player.load(edited);
    assert_eq!(player.next_event_index(), 2);
    assert!(player.is_playing());

    player.load(scenario_recording());
    assert!(player.state().is_idle());
}

#[test]
fn test_with_mock_transport() {
    let mut transport = MockTransport::new();
    let mut seq = Sequence::new();
    for seconds in [10.0, 11.0, 14.0] {
        transport
            .expect_snapshot()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(playing_at(seconds));
    }

    let mut player = Player::new(Arc::new(transport));
    player.load(scenario_recording());
    let mut sink = CollectingSink::new();

    assert!(player.play());
    assert_eq!(player.tick(&mut sink).current_time_ms, 1000);
    assert_eq!(player.tick(&mut sink).current_time_ms, 4000);
    assert_eq!(sink.timestamps(), vec![1000, 3000]);
}

proptest! {
    #[test]
    fn test_every_event_applied_once_in_order(
        stamps in prop::collection::vec(0u64..10_000, 0..60),
        steps in prop::collection::vec(1u32..40, 1..200),
    ) {
        let recording = RecordingBuilder::new().duration(10_000).tweaks_at(&stamps).build();
        let expected: Vec<u64> = recording.events.iter().map(|e| e.timestamp_ms).collect();
        let (mut player, transport) = player_rig(recording);
        let mut sink = CollectingSink::new();
        player.play();

        // Quarter-second multiples keep transport arithmetic exact
        for step in steps.iter().cycle() {
            if !player.wants_frames() {
                break;
            }
            transport.advance(*step as f64 * 0.25);
            player.tick(&mut sink);
        }

        prop_assert_eq!(sink.timestamps(), expected);
        let ids: std::collections::HashSet<_> = sink.events.iter().map(|e| e.id.clone()).collect();
        prop_assert_eq!(ids.len(), sink.events.len());
    }

    #[test]
    fn test_position_never_moves_backwards_while_playing(
        steps in prop::collection::vec(0u32..8, 1..100),
    ) {
        let (mut player, transport) = player_rig(scenario_recording());
        let mut sink = CollectingSink::new();
        player.play();

        let mut last = 0;
        for step in steps {
            transport.advance(step as f64 * 0.125);
            let outcome = player.tick(&mut sink);
            prop_assert!(outcome.current_time_ms >= last);
            last = outcome.current_time_ms;
        }
    }
}
