//! Void Gunner entry point
//!
//! Headless run: the simulation ticks on its own thread while this thread
//! plays the presentation side, reading snapshots, logging a HUD line and
//! feeding inputs from the demo pilot.

use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::Parser;

use void_gunner::Tuning;
use void_gunner::platform::{self, Pilot};
use void_gunner::sim::{GameEvent, GamePhase, GameState, Snapshot};

#[derive(Parser, Debug)]
#[command(version, about = "Run the Void Gunner simulation headless with a demo pilot")]
struct Args {
    /// JSON tuning file; stock values when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed (overrides the tuning file)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many simulation ticks
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Ticks between HUD lines
    #[arg(long, default_value_t = 60)]
    hud_every: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.config {
        Some(path) => Tuning::load(path)?,
        None => {
            let tuning = Tuning::default();
            tuning.validate().context("stock tuning")?;
            tuning
        }
    };
    let seed = args.seed.or(tuning.seed).unwrap_or_else(rand::random);
    log::info!("Void Gunner (headless) starting with seed {seed}");

    let state = GameState::from_tuning(seed, &tuning).context("when building the first level")?;
    let sim = platform::spawn(state, &tuning).context("when starting the simulation thread")?;
    let mut pilot = Pilot::new();
    let mut last_hud = 0;

    loop {
        let snapshot = match sim.snapshots().recv_timeout(Duration::from_secs(1)) {
            Ok(snapshot) => snapshot,
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("No snapshot for a second");
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("Simulation stopped on its own");
                break;
            }
        };

        report_events(&snapshot);
        if snapshot.time_ticks >= last_hud + args.hud_every {
            last_hud = snapshot.time_ticks;
            log::info!("{}", hud_line(&snapshot));
        }
        if snapshot.phase == GamePhase::GameOver || snapshot.time_ticks >= args.frames {
            break;
        }

        for input in pilot.steer(&snapshot) {
            if sim.send(input).is_err() {
                log::debug!("Input channel full, dropped {:?}", input);
                pilot.forget();
                break;
            }
        }
    }

    let state = sim
        .quit()
        .map_err(|_| anyhow!("simulation thread panicked"))?;
    let player = &state.level.player;
    log::info!(
        "Finished after {} ticks: level {}, {} points, {} lives, phase {:?}",
        state.time_ticks,
        state.level.level_number(),
        player.points,
        player.lives,
        state.phase
    );
    Ok(())
}

fn report_events(snapshot: &Snapshot) {
    for event in &snapshot.events {
        match event {
            GameEvent::LevelStarted { level_number } => log::info!("Level {level_number} started"),
            GameEvent::LevelComplete { level_number } => log::info!("Level {level_number} complete"),
            GameEvent::BossSpawned => log::info!("Boss incoming"),
            GameEvent::BossDefeated => log::info!("Boss defeated"),
            GameEvent::GameOver { points } => log::info!("Game over with {points} points"),
            other => log::trace!("{:?}", other),
        }
    }
}

fn hud_line(snapshot: &Snapshot) -> String {
    let level = &snapshot.level;
    let player = &level.player;
    format!(
        "t={} L{} pts={}/{} hp={} sh={} lives={} laser={} enemies={} bullets={}",
        snapshot.time_ticks,
        level.level_number(),
        player.points,
        level.params.points_to_complete,
        player.character.hitpoints,
        player.character.shield_hitpoints,
        player.lives,
        player.laser_level,
        level.enemies.len(),
        level.bullets.len()
    )
}
