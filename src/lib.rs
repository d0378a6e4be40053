//! Void Gunner - A wave-based arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, weapons, collisions, levels)
//! - `input`: Abstract input events delivered by the presentation layer
//! - `platform`: Simulation thread and the channels to the presentation side
//! - `tuning`: Data-driven game balance

pub mod input;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use input::{InputEvent, InputKind};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frame-counted timers advance by `elapsed_secs * ANIMATION_SPEED`
    pub const ANIMATION_SPEED: f32 = 60.0;

    /// Viewport defaults
    pub const VIEWPORT_WIDTH: f32 = 1920.0;
    pub const VIEWPORT_HEIGHT: f32 = 1080.0;

    /// Hitpoint/shield ceiling (also the respawn value)
    pub const MAX_HITPOINTS: i32 = 100;
    pub const MAX_SHIELD: i32 = 100;

    /// Player defaults
    pub const PLAYER_LIVES: u32 = 3;
    pub const PLAYER_SPEED: f32 = 800.0; // units/s
    pub const PLAYER_STRENGTH: i32 = 10;
    pub const PLAYER_FIRE_RESET: f32 = 10.0; // frames
    pub const MAX_LASER_LEVEL: u32 = 3;
    /// Horizontal gap between parallel player lasers
    pub const LASER_SPREAD: f32 = 20.0;

    /// Bullet speed in units/s
    pub const BULLET_SPEED: f32 = 1000.0;

    /// Enemies spawn above the top edge
    pub const ENEMY_SPAWN_Y: f32 = -100.0;
    pub const ENEMY_FIRE_RESET: f32 = 150.0; // frames
    pub const BOSS_FIRE_RESET: f32 = 60.0; // frames
    /// Homing ships advance vertically faster than they strafe
    pub const HOMING_Y_FACTOR: f32 = 1.5;

    /// Children scatter within this many units of a fractured meteor
    pub const FRACTURE_SPREAD: f32 = 40.0;
    pub const FRACTURE_CHILDREN: usize = 3;

    /// Destroy animation windows, in frames
    pub const DESTROY_ANIMATION_FRAMES: f32 = 24.0;
    pub const BULLET_IMPACT_FRAMES: f32 = 5.0;

    /// Power-up amounts
    pub const POWER_UP_RESTORE: i32 = 25;
    pub const LASER_STRENGTH_BONUS: i32 = 5;

    /// Contact with a normal enemy deals this multiple of its strength
    pub const CONTACT_DAMAGE_FACTOR: i32 = 2;
}

/// Degrees to radians
#[inline]
pub fn degree_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Decompose a travel distance along a heading (radians) into (dx, dy)
#[inline]
pub fn find_next_point_in_travel(distance: f32, heading_rad: f32) -> Vec2 {
    Vec2::new(distance * heading_rad.cos(), distance * heading_rad.sin())
}
