//! Lazy bounding-box binding
//!
//! The presentation layer owns the assets; it hands the simulation a
//! registry of texture sizes up front. The first time the simulation sees an
//! entity without a size it looks the size up here and caches it on the
//! entity for every later collision test.

use std::collections::BTreeMap;

use anyhow::{Context, bail};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::textures;
use super::level::Level;

/// Texture name to on-screen size
pub trait Geometry {
    fn bounds(&self, texture: &str) -> Option<Vec2>;
}

/// Size table keyed by texture name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometryTable {
    sizes: BTreeMap<String, [f32; 2]>,
}

impl Default for GeometryTable {
    /// Sizes of the stock sprite sheet
    fn default() -> Self {
        let sizes = [
            (textures::PLAYER, [99.0, 75.0]),
            (textures::PLAYER_LASER, [9.0, 54.0]),
            (textures::ENEMY_LASER, [9.0, 54.0]),
            (textures::HOSTILE_SHIP, [91.0, 91.0]),
            (textures::METEOR_BIG, [101.0, 84.0]),
            (textures::METEOR_SMALL, [28.0, 28.0]),
            (textures::BOSS, [240.0, 160.0]),
            (textures::POWER_UP_HEALTH, [22.0, 21.0]),
            (textures::POWER_UP_SHIELD, [34.0, 33.0]),
            (textures::POWER_UP_LASER, [34.0, 33.0]),
            (textures::POWER_UP_LIFE, [34.0, 33.0]),
        ]
        .into_iter()
        .map(|(name, size)| (name.to_string(), size))
        .collect();
        Self { sizes }
    }
}

impl GeometryTable {
    pub fn empty() -> Self {
        Self {
            sizes: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, texture: &str, size: Vec2) {
        self.sizes.insert(texture.to_string(), [size.x, size.y]);
    }

    /// Fail unless every texture the simulation can request has a positive size
    pub fn ensure_complete(&self) -> anyhow::Result<()> {
        for name in textures::ALL {
            let size = self
                .bounds(name)
                .with_context(|| format!("no geometry for texture {name:?}"))?;
            if !(size.x > 0.0 && size.y > 0.0) {
                bail!("geometry for texture {name:?} must be positive, got {size:?}");
            }
        }
        Ok(())
    }
}

impl Geometry for GeometryTable {
    fn bounds(&self, texture: &str) -> Option<Vec2> {
        self.sizes.get(texture).map(|&[w, h]| Vec2::new(w, h))
    }
}

/// Bind sizes for every entity that has none yet. The player is parked at
/// bottom-center on first binding; a fresh bullet is centered on its
/// firer's muzzle, and dropped if the firer is already gone.
pub fn bind_level(level: &mut Level, geometry: &dyn Geometry, viewport: Vec2) {
    let body = &mut level.player.character.body;
    if body.size.is_none() {
        if let Some(size) = geometry.bounds(&body.texture) {
            body.size = Some(size);
            body.pos = Vec2::new(viewport.x / 2.0 - size.x / 2.0, viewport.y - size.y * 2.0);
        }
    }

    for enemy in &mut level.enemies {
        let character = &mut enemy.character;
        if character.body.size.is_none() {
            character.body.size = geometry.bounds(&character.body.texture);
            if let Some(size) = character.body.size {
                // Enemy guns sit half a width right of center
                character.fire_offset = Vec2::new(size.x / 2.0, 0.0);
            }
        }
    }

    for idx in 0..level.bullets.len() {
        if level.bullets[idx].body.size.is_some() {
            continue;
        }
        let bullet = &level.bullets[idx];
        let muzzle = level
            .firer(bullet.fired_by)
            .map(|c| c.body.center() + c.fire_offset + Vec2::new(bullet.muzzle_offset, 0.0));
        let size = geometry.bounds(&bullet.body.texture);

        let bullet = &mut level.bullets[idx];
        match (muzzle, size) {
            (Some(muzzle), Some(size)) => {
                bullet.body.size = Some(size);
                bullet.body.pos = muzzle - size / 2.0;
            }
            (None, _) => {
                log::debug!("Dropping bullet from stale shooter {:?}", bullet.fired_by);
                bullet.impact.skip();
            }
            (Some(_), None) => {
                log::warn!("No geometry for {:?}", bullet.body.texture);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Bullet, Enemy, EntityId, Player, ShooterId};
    use crate::sim::level::LevelParams;

    #[test]
    fn test_default_table_is_complete() {
        assert!(GeometryTable::default().ensure_complete().is_ok());
    }

    #[test]
    fn test_missing_texture_is_reported() {
        let mut table = GeometryTable::empty();
        table.insert(textures::PLAYER, Vec2::new(10.0, 10.0));
        let err = table.ensure_complete().unwrap_err();
        assert!(err.to_string().contains("no geometry"));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let mut table = GeometryTable::default();
        table.insert(textures::BOSS, Vec2::ZERO);
        assert!(table.ensure_complete().is_err());
    }

    #[test]
    fn test_binding_is_one_time() {
        let table = GeometryTable::default();
        let viewport = Vec2::new(1920.0, 1080.0);
        let mut level = Level::new(LevelParams::default(), Player::new()).unwrap();
        bind_level(&mut level, &table, viewport);

        let size = table.bounds(textures::PLAYER).unwrap();
        assert_eq!(level.player.character.body.size, Some(size));
        let parked = level.player.character.body.pos;
        assert_eq!(parked.x, 960.0 - size.x / 2.0);

        // Moving and rebinding leaves the position alone
        level.player.character.body.pos.x += 50.0;
        bind_level(&mut level, &table, viewport);
        assert_eq!(level.player.character.body.pos.x, parked.x + 50.0);
    }

    #[test]
    fn test_bullet_centered_on_muzzle() {
        let table = GeometryTable::default();
        let viewport = Vec2::new(1920.0, 1080.0);
        let mut level = Level::new(LevelParams::default(), Player::new()).unwrap();
        bind_level(&mut level, &table, viewport);

        level.bullets.push(Bullet::new(ShooterId::Player, 10, 20.0));
        bind_level(&mut level, &table, viewport);

        let bullet = &level.bullets[0];
        let size = table.bounds(textures::PLAYER_LASER).unwrap();
        let expected = level.player.character.body.center() + Vec2::new(20.0, 0.0) - size / 2.0;
        assert_eq!(bullet.body.pos, expected);
    }

    #[test]
    fn test_enemy_bullet_leaves_from_gun_offset() {
        let table = GeometryTable::default();
        let viewport = Vec2::new(1920.0, 1080.0);
        let mut level = Level::new(LevelParams::default(), Player::new()).unwrap();
        let id = level.next_entity_id();
        level
            .enemies
            .push(Enemy::hostile_ship(id, Vec2::new(300.0, 100.0), 1.0));
        bind_level(&mut level, &table, viewport);

        let ship = table.bounds(textures::HOSTILE_SHIP).unwrap();
        let enemy = level.enemy(id).unwrap();
        assert_eq!(enemy.character.fire_offset, Vec2::new(ship.x / 2.0, 0.0));
        // The player fires from dead center
        assert_eq!(level.player.character.fire_offset, Vec2::ZERO);

        level.bullets.push(Bullet::new(ShooterId::Enemy(id), 10, 0.0));
        bind_level(&mut level, &table, viewport);
        let bullet = level.bullets[0].body.rect().unwrap();
        let center = level.enemy(id).unwrap().character.body.center();
        assert_eq!(bullet.center(), center + Vec2::new(ship.x / 2.0, 0.0));
    }

    #[test]
    fn test_bullet_from_removed_enemy_is_dropped() {
        let table = GeometryTable::default();
        let mut level = Level::new(LevelParams::default(), Player::new()).unwrap();
        level
            .bullets
            .push(Bullet::new(ShooterId::Enemy(EntityId(42)), 10, 0.0));
        bind_level(&mut level, &table, Vec2::new(1920.0, 1080.0));
        assert!(level.bullets[0].is_finished());
        level.remove_finished();
        assert!(level.bullets.is_empty());
    }

    #[test]
    fn test_enemy_keeps_spawn_position() {
        let table = GeometryTable::default();
        let mut level = Level::new(LevelParams::default(), Player::new()).unwrap();
        let id = level.next_entity_id();
        level
            .enemies
            .push(Enemy::hostile_ship(id, Vec2::new(300.0, -100.0), 1.0));
        bind_level(&mut level, &table, Vec2::new(1920.0, 1080.0));
        let enemy = level.enemy(id).unwrap();
        assert_eq!(enemy.character.body.pos, Vec2::new(300.0, -100.0));
        assert!(enemy.character.body.size.is_some());
    }
}
