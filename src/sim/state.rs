//! Session state and core simulation types
//!
//! `GameState` is owned by exactly one simulation task. The presentation side
//! only ever sees `Snapshot`s: immutable copies handed over per frame.

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{DamageOutcome, EnemyKind, EntityId, Player, PowerUpKind, ShooterId};
use super::geometry::{Geometry, GeometryTable};
use super::level::{Level, LevelError, LevelParams};
use crate::tuning::Tuning;

/// Most notifications held back while the presentation side is not reading
pub const MAX_QUEUED_EVENTS: usize = 512;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active combat
    Playing,
    /// Frozen by the player
    Paused,
    /// Level cleared; showing the completion screen for `remaining` seconds
    LevelComplete { remaining: f32 },
    /// Out of lives (terminal)
    GameOver,
}

/// Side-effect notifications for audio/visual collaborators.
/// The simulation never waits on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { by: ShooterId, count: usize },
    Impact { by: ShooterId },
    PointsAwarded { id: EntityId, points: u32 },
    EnemyDestroyed { id: EntityId, kind: EnemyKind },
    MeteorFractured { at: Vec2 },
    PowerUpCollected(PowerUpKind),
    BossSpawned,
    BossDefeated,
    PlayerHit { damage: i32, outcome: DamageOutcome },
    PlayerDestroyed,
    PlayerRespawned { lives: u32 },
    LevelComplete { level_number: u32 },
    LevelStarted { level_number: u32 },
    GameOver { points: u32 },
}

/// Immutable view of the world handed to the presentation side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub level: Level,
    pub events: Vec<GameEvent>,
}

/// Simulation-wide knobs that are not per-level
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub viewport: Vec2,
    pub animation_speed: f32,
    pub level_complete_secs: f32,
}

impl From<&Tuning> for SimConfig {
    fn from(tuning: &Tuning) -> Self {
        Self {
            viewport: Vec2::new(tuning.viewport.width, tuning.viewport.height),
            animation_speed: tuning.animation_speed,
            level_complete_secs: tuning.level_complete_secs,
        }
    }
}

/// Complete session state
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub config: SimConfig,
    pub phase: GamePhase,
    pub level: Level,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Notifications raised since the last snapshot
    pub events: Vec<GameEvent>,
    pub(super) geometry: Arc<dyn Geometry + Send + Sync>,
}

impl GameState {
    /// Create a new session with a fresh player on the given first level
    pub fn new(
        seed: u64,
        config: SimConfig,
        params: LevelParams,
        geometry: Arc<dyn Geometry + Send + Sync>,
    ) -> Result<Self, LevelError> {
        let level = Level::new(params, Player::new())?;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            phase: GamePhase::Playing,
            level,
            time_ticks: 0,
            events: Vec::new(),
            geometry,
        };
        let level_number = state.level.level_number();
        state.events.push(GameEvent::LevelStarted { level_number });
        Ok(state)
    }

    /// Session configured from tuning, using its geometry table
    pub fn from_tuning(seed: u64, tuning: &Tuning) -> Result<Self, LevelError> {
        let geometry: Arc<GeometryTable> = Arc::new(tuning.geometry.clone());
        Self::new(seed, SimConfig::from(tuning), tuning.initial_level.clone(), geometry)
    }

    pub fn geometry(&self) -> &dyn Geometry {
        self.geometry.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Copy the world for the presentation side, draining notifications
    pub fn snapshot(&mut self) -> Arc<Snapshot> {
        Arc::new(Snapshot {
            time_ticks: self.time_ticks,
            phase: self.phase,
            level: self.level.clone(),
            events: std::mem::take(&mut self.events),
        })
    }

    /// Put back notifications from a snapshot that could not be delivered.
    /// The backlog is capped at `MAX_QUEUED_EVENTS`; the oldest go first.
    pub fn requeue_events(&mut self, mut events: Vec<GameEvent>) {
        events.append(&mut self.events);
        if events.len() > MAX_QUEUED_EVENTS {
            let excess = events.len() - MAX_QUEUED_EVENTS;
            events.drain(..excess);
            log::debug!("Event backlog full, dropped {} oldest notifications", excess);
        }
        self.events = events;
    }

    /// Swap in the successor level
    pub fn advance_level(&mut self) -> Result<(), LevelError> {
        self.level.advance()?;
        self.phase = GamePhase::Playing;
        let level_number = self.level.level_number();
        self.events.push(GameEvent::LevelStarted { level_number });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::from_tuning(5, &Tuning::default()).unwrap()
    }

    #[test]
    fn test_new_session() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level.level_number(), 1);
        assert_eq!(state.level.player.lives, 3);
        assert_eq!(state.events, vec![GameEvent::LevelStarted { level_number: 1 }]);
    }

    #[test]
    fn test_rejects_malformed_first_level() {
        let tuning = Tuning {
            initial_level: LevelParams {
                points_to_complete: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(GameState::from_tuning(1, &tuning).is_err());
    }

    #[test]
    fn test_snapshot_drains_and_requeue_restores_order() {
        let mut state = state();
        let snap = state.snapshot();
        assert_eq!(snap.events.len(), 1);
        assert!(state.events.is_empty());

        state.events.push(GameEvent::BossSpawned);
        let events = snap.events.clone();
        state.requeue_events(events);
        assert_eq!(
            state.events,
            vec![
                GameEvent::LevelStarted { level_number: 1 },
                GameEvent::BossSpawned
            ]
        );
    }

    #[test]
    fn test_requeue_drops_oldest_past_cap() {
        let mut state = state();
        state.events.clear();
        // Every snapshot bounces off a full channel
        let total = 2 * MAX_QUEUED_EVENTS as u32;
        for lives in 0..total {
            state.events.push(GameEvent::PlayerRespawned { lives });
            let snap = state.snapshot();
            state.requeue_events(snap.events.clone());
            assert!(state.events.len() <= MAX_QUEUED_EVENTS);
        }

        assert_eq!(state.events.len(), MAX_QUEUED_EVENTS);
        assert_eq!(
            state.events.first(),
            Some(&GameEvent::PlayerRespawned {
                lives: total - MAX_QUEUED_EVENTS as u32
            })
        );
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::PlayerRespawned { lives: total - 1 })
        );
    }

    #[test]
    fn test_advance_level_keeps_player() {
        let mut state = state();
        state.level.player.points = 350;
        state.level.player.laser_level = 2;
        state.phase = GamePhase::LevelComplete { remaining: 0.0 };
        state.advance_level().unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level.level_number(), 2);
        assert_eq!(state.level.player.points, 350);
        assert_eq!(state.level.player.laser_level, 2);
    }
}
