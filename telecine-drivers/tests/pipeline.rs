//! Playback loop driving the real ST7789 driver over mock hardware

mod common;

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use common::{clock, commands, pixel_writes, rig, ScriptedDecoder, SolidScaler};
use telecine_core::config::{Orientation, PanelConfig};
use telecine_core::playback::{Player, PlayerSettings};
use telecine_core::state::PlaybackState;
use telecine_core::traits::SourceKind;
use telecine_drivers::st7789::commands::cmd;

fn small_panel() -> PanelConfig {
    PanelConfig {
        width: 40,
        height: 30,
        orientation: Orientation::Landscape90,
        color_inversion: true,
    }
}

fn settings() -> PlayerSettings {
    PlayerSettings {
        frame_interval: None,
        retry_cooldown: Duration::from_millis(500),
        stats_interval: 0,
    }
}

#[test]
fn finite_source_loops_onto_panel() {
    let (mut lcd, rig) = rig(1000, 4096);
    lcd.initialize(small_panel()).unwrap();
    rig.take();

    let decoder = ScriptedDecoder::finite(3);
    let seeks = decoder.seeks.clone();
    let stop = AtomicBool::new(false);
    let mut player = Player::new(decoder, &mut lcd, SolidScaler, clock(&rig), settings(), &stop);

    while player.stats().frames_shown < 7 {
        assert_ne!(player.step(), PlaybackState::SourceError);
    }
    drop(player);

    assert_eq!(seeks.get(), 2);

    let ops = rig.take();
    let ramwr = commands(&ops).iter().filter(|s| s.command == cmd::RAMWR).count();
    assert_eq!(ramwr, 7);

    // 40 * 30 * 2 = 2400 bytes per frame in chunks of 1000
    let chunks = pixel_writes(&ops);
    assert_eq!(chunks.len(), 7 * 3);
    // BGR red arrives as RGB565 red
    assert!(chunks.iter().all(|c| c.chunks(2).all(|px| px == [0xF8, 0x00])));
}

#[test]
fn bus_failure_aborts_only_current_frame() {
    let (mut lcd, rig) = rig(1000, 4096);
    lcd.initialize(small_panel()).unwrap();
    rig.take();

    let stop = AtomicBool::new(false);
    let mut player = Player::new(
        ScriptedDecoder::finite(10),
        &mut lcd,
        SolidScaler,
        clock(&rig),
        settings(),
        &stop,
    );

    player.step(); // Connecting
    player.step(); // Streaming
    player.step(); // frame 1
    rig.faults.fail_next_pixel_write.set(true);
    assert_eq!(player.step(), PlaybackState::Streaming); // frame 2, dropped
    assert_eq!(player.step(), PlaybackState::Streaming); // frame 3

    let stats = player.stats();
    assert_eq!(stats.frames_shown, 2);
    assert_eq!(stats.frames_dropped, 1);
    drop(player);

    // Frame 2 was abandoned at its first chunk; frames 1 and 3 are whole
    let ops = rig.take();
    let chunks = pixel_writes(&ops);
    assert_eq!(chunks.len(), 3 + 3);
}

#[test]
fn unreachable_source_retries_with_cooldown() {
    let (mut lcd, rig) = rig(1000, 4096);
    lcd.initialize(small_panel()).unwrap();
    rig.take();

    let decoder = ScriptedDecoder {
        fail_opens: 2,
        kind: SourceKind::Live,
        ..ScriptedDecoder::finite(1)
    };
    let opens = decoder.opens.clone();
    let started = rig.now.get();
    let stop = AtomicBool::new(false);
    let mut player = Player::new(decoder, &mut lcd, SolidScaler, clock(&rig), settings(), &stop);

    let states: Vec<PlaybackState> = (0..6).map(|_| player.step()).collect();
    assert_eq!(
        states,
        [
            PlaybackState::Connecting,
            PlaybackState::SourceError,
            PlaybackState::Connecting,
            PlaybackState::SourceError,
            PlaybackState::Connecting,
            PlaybackState::Streaming,
        ]
    );
    assert_eq!(opens.get(), 3);
    assert_eq!(rig.now.get() - started, Duration::from_millis(1000));
}
