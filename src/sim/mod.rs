//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time comes in as an argument; no clocks are read here
//! - Seeded RNG only
//! - Stable iteration order (spawn order, ids strictly increasing)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod level;
pub mod motion;
pub mod spawner;
pub mod state;
pub mod tick;

pub use bounds::Rect;
pub use collision::{apply_power_up, resolve_collisions};
pub use entity::{
    Body, Bullet, Character, DamageOutcome, Enemy, EnemyKind, EntityId, MeteorSize, Player,
    PowerUpKind, Shooter, ShooterId, textures,
};
pub use geometry::{Geometry, GeometryTable, bind_level};
pub use level::{Level, LevelError, LevelParams};
pub use motion::{advance_bullet, advance_enemy, advance_player, check_fire};
pub use spawner::{spawn_enemy, spawn_power_up};
pub use state::{GameEvent, GamePhase, GameState, SimConfig, Snapshot};
pub use tick::{apply_input, tick};
