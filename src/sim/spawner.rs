//! Timer-gated enemy and power-up spawning
//!
//! Both spawners share one rule: when the timer has reached its frequency
//! and spawning is allowed, spawn and reset; otherwise keep accumulating.
//! The timer must keep running while the enemy cap blocks spawning.

use glam::Vec2;
use rand::Rng;

use super::entity::{Enemy, EntityId, MeteorSize, PowerUpKind};
use super::level::Level;
use crate::consts::*;

/// Spawn one enemy if due. `frames` is this tick's frame-scaled elapsed time.
pub fn spawn_enemy(
    level: &mut Level,
    rng: &mut impl Rng,
    viewport_width: f32,
    frames: f32,
) -> Option<EntityId> {
    let ready = level.enemy_spawn_timer >= level.params.enemy_spawn_frequency;
    let multiplier = level.params.difficulty_multiplier;

    if level.boss_due() {
        if !ready {
            level.enemy_spawn_timer += frames;
            return None;
        }
        let id = level.next_entity_id();
        let pos = Vec2::new(viewport_width / 2.0, ENEMY_SPAWN_Y);
        level.enemies.push(Enemy::boss(id, pos, multiplier));
        level.boss_spawned = true;
        level.enemy_spawn_timer = 0.0;
        log::info!("Boss spawned on level {}", level.level_number());
        return Some(id);
    }

    let allowed = !level.boss_active() && level.enemies.len() < level.params.max_number_enemies;
    if !(ready && allowed) {
        level.enemy_spawn_timer += frames;
        return None;
    }

    let id = level.next_entity_id();
    let pos = Vec2::new(rng.random_range(0.0..viewport_width), ENEMY_SPAWN_Y);
    let enemy = if rng.random_bool(0.5) {
        Enemy::hostile_ship(id, pos, multiplier)
    } else {
        let size = if rng.random_bool(0.5) {
            MeteorSize::Big
        } else {
            MeteorSize::Small
        };
        Enemy::meteor(id, pos, size, false)
    };
    log::trace!("Spawned {} {:?} at {:?}", enemy.kind.label(), id, pos);
    level.enemies.push(enemy);
    level.enemy_spawn_timer = 0.0;
    Some(id)
}

/// Spawn one power-up if due; the subtype is uniform over all four
pub fn spawn_power_up(
    level: &mut Level,
    rng: &mut impl Rng,
    viewport_width: f32,
    frames: f32,
) -> Option<EntityId> {
    if level.power_up_spawn_timer < level.params.power_up_spawn_frequency {
        level.power_up_spawn_timer += frames;
        return None;
    }

    let id = level.next_entity_id();
    let pos = Vec2::new(rng.random_range(0.0..viewport_width), ENEMY_SPAWN_Y);
    let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
    level.enemies.push(Enemy::power_up(id, pos, kind));
    level.power_up_spawn_timer = 0.0;
    log::debug!("Spawned power-up {:?}", kind);
    Some(id)
}
