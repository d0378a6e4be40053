//! Level parameters, the live world, and level-to-level progression

use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::{Bullet, Character, Enemy, EntityId, Player, ShooterId};

/// Construction-time rejection of level parameters
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    NoPointsToComplete,
    BadDifficulty(f32),
    BadSpawnFrequency { name: &'static str, value: f32 },
    NoEnemySlots,
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::NoPointsToComplete => write!(f, "points_to_complete must be positive"),
            LevelError::BadDifficulty(value) => {
                write!(f, "difficulty multiplier must be positive and finite, got {value}")
            }
            LevelError::BadSpawnFrequency { name, value } => {
                write!(f, "{name} must be positive and finite, got {value}")
            }
            LevelError::NoEnemySlots => write!(f, "max_number_enemies must be at least 1"),
        }
    }
}

impl std::error::Error for LevelError {}

/// Everything that distinguishes one level from the next
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelParams {
    pub level_number: u32,
    pub difficulty_multiplier: f32,
    /// Frames between enemy spawns (lower spawns faster)
    pub enemy_spawn_frequency: f32,
    /// Frames between power-up spawns
    pub power_up_spawn_frequency: f32,
    pub max_number_enemies: usize,
    pub points_to_complete: u32,
    pub has_boss: bool,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            level_number: 1,
            difficulty_multiplier: 0.5,
            enemy_spawn_frequency: 100.0,
            power_up_spawn_frequency: 1200.0,
            max_number_enemies: 15,
            points_to_complete: 300,
            has_boss: true,
        }
    }
}

impl LevelParams {
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.points_to_complete == 0 {
            return Err(LevelError::NoPointsToComplete);
        }
        if !(self.difficulty_multiplier.is_finite() && self.difficulty_multiplier > 0.0) {
            return Err(LevelError::BadDifficulty(self.difficulty_multiplier));
        }
        for (name, value) in [
            ("enemy_spawn_frequency", self.enemy_spawn_frequency),
            ("power_up_spawn_frequency", self.power_up_spawn_frequency),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(LevelError::BadSpawnFrequency { name, value });
            }
        }
        if self.max_number_enemies == 0 {
            return Err(LevelError::NoEnemySlots);
        }
        Ok(())
    }

    /// Parameters for the level after this one
    pub fn successor(&self) -> Self {
        let level_number = self.level_number + 1;
        Self {
            level_number,
            difficulty_multiplier: self.difficulty_multiplier * 1.15,
            enemy_spawn_frequency: self.enemy_spawn_frequency * 0.9,
            power_up_spawn_frequency: self.power_up_spawn_frequency * 0.9,
            max_number_enemies: (self.max_number_enemies as f64 * 1.25).floor() as usize,
            points_to_complete: self.points_to_complete.saturating_mul(2),
            has_boss: level_number % 5 == 0,
        }
    }
}

/// The mutable world for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub params: LevelParams,
    pub player: Player,
    /// Spawn order; ids are strictly increasing
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub enemy_spawn_timer: f32,
    pub power_up_spawn_timer: f32,
    pub boss_spawned: bool,
    pub boss_defeated: bool,
    pub complete: bool,
    next_id: u32,
}

impl Level {
    pub fn new(params: LevelParams, player: Player) -> Result<Self, LevelError> {
        Self::with_next_id(params, player, 1)
    }

    fn with_next_id(params: LevelParams, player: Player, next_id: u32) -> Result<Self, LevelError> {
        params.validate()?;
        log::info!(
            "Level {}: difficulty={:.3}, max_enemies={}, points_to_complete={}, boss={}",
            params.level_number,
            params.difficulty_multiplier,
            params.max_number_enemies,
            params.points_to_complete,
            params.has_boss
        );
        Ok(Self {
            params,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_spawn_timer: 0.0,
            power_up_spawn_timer: 0.0,
            boss_spawned: false,
            boss_defeated: false,
            complete: false,
            next_id,
        })
    }

    /// Build the next level, carrying the player over unchanged and
    /// discarding every enemy and bullet.
    pub fn successor(mut self) -> Result<Self, LevelError> {
        self.advance()?;
        Ok(self)
    }

    /// In-place form of `successor`; on error the level is left untouched
    pub fn advance(&mut self) -> Result<(), LevelError> {
        let params = self.params.successor();
        params.validate()?;
        let player = std::mem::take(&mut self.player);
        *self = Self::with_next_id(params, player, self.next_id)?;
        Ok(())
    }

    /// Allocate a new enemy id
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn level_number(&self) -> u32 {
        self.params.level_number
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|idx| &self.enemies[idx])
    }

    /// Resolve a bullet's firer; `None` once the enemy has been removed
    pub fn firer(&self, id: ShooterId) -> Option<&Character> {
        match id {
            ShooterId::Player => Some(&self.player.character),
            ShooterId::Enemy(id) => self.enemy(id).map(|e| &e.character),
        }
    }

    /// A boss is on screen and still fighting
    pub fn boss_active(&self) -> bool {
        self.boss_spawned && !self.boss_defeated
    }

    /// The boss is due: the score is in but it has not appeared yet
    pub fn boss_due(&self) -> bool {
        self.params.has_boss && !self.boss_spawned && self.points_reached()
    }

    pub fn points_reached(&self) -> bool {
        self.player.points >= self.params.points_to_complete
    }

    pub fn completion_met(&self) -> bool {
        self.points_reached() && (!self.params.has_boss || self.boss_defeated)
    }

    /// Latch completion: force-destroy what is left and clear every bullet
    pub fn mark_complete(&mut self) {
        self.complete = true;
        for enemy in &mut self.enemies {
            if !enemy.character.is_destroyed {
                enemy.character.destroy();
            }
        }
        self.bullets.clear();
    }

    /// Drop enemies and bullets whose aftermath has finished
    pub fn remove_finished(&mut self) {
        self.enemies.retain(|e| !e.character.is_finished());
        self.bullets.retain(|b| !b.is_finished());
    }
}
