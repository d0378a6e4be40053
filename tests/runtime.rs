//! End-to-end: a simulation thread driven only through its channels

use std::time::{Duration, Instant};

use void_gunner::platform::{self, Pilot};
use void_gunner::sim::{GameEvent, GamePhase, GameState, LevelParams};
use void_gunner::{InputEvent, InputKind, Tuning};

fn fast_tuning() -> Tuning {
    Tuning {
        frame_budget_ms: 1,
        seed: Some(2024),
        initial_level: LevelParams {
            enemy_spawn_frequency: 5.0,
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn fire_input_reaches_the_simulation() {
    let tuning = fast_tuning();
    let state = GameState::from_tuning(7, &tuning).unwrap();
    let sim = platform::spawn(state, &tuning).unwrap();

    sim.send(InputEvent::press(InputKind::FirePrimary)).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut shots = 0;
    while Instant::now() < deadline && shots == 0 {
        if let Ok(snapshot) = sim.snapshots().recv_timeout(Duration::from_millis(50)) {
            shots += snapshot
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::ShotFired { .. }))
                .count();
            shots += snapshot
                .level
                .bullets
                .iter()
                .filter(|b| !b.fired_by_enemy)
                .count();
        }
    }
    assert!(shots > 0, "no player shot seen");

    let state = sim.quit().unwrap();
    assert!(state.level.player.character.fire.is_firing);
}

#[test]
fn pilot_plays_until_quit() {
    let tuning = fast_tuning();
    let state = GameState::from_tuning(11, &tuning).unwrap();
    let sim = platform::spawn(state, &tuning).unwrap();
    let mut pilot = Pilot::new();

    let deadline = Instant::now() + Duration::from_secs(3);
    let mut last_tick = 0;
    while Instant::now() < deadline {
        let Ok(snapshot) = sim.snapshots().recv_timeout(Duration::from_millis(100)) else {
            continue;
        };
        // Snapshots arrive in order
        assert!(snapshot.time_ticks >= last_tick);
        last_tick = snapshot.time_ticks;
        if snapshot.phase == GamePhase::GameOver || last_tick > 300 {
            break;
        }
        for input in pilot.steer(&snapshot) {
            if sim.send(input).is_err() {
                pilot.forget();
                break;
            }
        }
    }

    let state = sim.quit().unwrap();
    assert!(state.time_ticks >= last_tick);
    assert!(state.time_ticks > 0);
}

#[test]
fn explicit_quit_event_stops_the_thread() {
    let tuning = fast_tuning();
    let state = GameState::from_tuning(3, &tuning).unwrap();
    let sim = platform::spawn(state, &tuning).unwrap();
    sim.send(InputEvent::press(InputKind::Quit)).unwrap();

    // The thread winds down and closes its end of the snapshot channel
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut closed = false;
    while Instant::now() < deadline {
        match sim.snapshots().recv_timeout(Duration::from_millis(50)) {
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                closed = true;
                break;
            }
            _ => continue,
        }
    }
    assert!(closed);
    assert!(sim.quit().is_ok());
}
