//! Collision detection and damage resolution
//!
//! Runs once per tick after motion, in two passes:
//! 1. Bullets against their targets (player fire vs enemies, enemy fire vs player)
//! 2. Enemy bodies against the player

use glam::Vec2;
use rand::Rng;

use super::entity::{DamageOutcome, Enemy, EnemyKind, MeteorSize, Player, PowerUpKind};
use super::level::Level;
use super::state::GameEvent;
use crate::consts::*;

/// Resolve every overlap for this tick, appending notifications to `events`
pub fn resolve_collisions(level: &mut Level, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    resolve_bullets(level, rng, events);
    resolve_contacts(level, events);
}

fn resolve_bullets(level: &mut Level, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    // Fracture children are spawned after the pass so they are not hit this tick
    let mut fractures: Vec<Vec2> = Vec::new();

    for bullet in &mut level.bullets {
        let Some(bullet_rect) = bullet.rect() else {
            continue;
        };

        if !bullet.fired_by_enemy {
            let target = level.enemies.iter_mut().find(|enemy| {
                !enemy.kind.is_power_up()
                    && enemy
                        .character
                        .rect()
                        .is_some_and(|rect| rect.intersects(&bullet_rect))
            });
            let Some(enemy) = target else {
                continue;
            };

            bullet.collide();
            events.push(GameEvent::Impact { by: bullet.fired_by });
            if enemy.character.take_hull_damage(bullet.damage) == DamageOutcome::Destroyed {
                level.player.points += enemy.character.point_value;
                events.push(GameEvent::PointsAwarded {
                    id: enemy.id,
                    points: enemy.character.point_value,
                });
                match enemy.kind {
                    EnemyKind::Meteor {
                        is_fractured: false,
                        ..
                    } => fractures.push(enemy.character.body.pos),
                    EnemyKind::Boss => {
                        level.boss_defeated = true;
                        events.push(GameEvent::BossDefeated);
                    }
                    _ => {}
                }
            }
        } else {
            let Some(player_rect) = level.player.character.rect() else {
                continue;
            };
            if !player_rect.intersects(&bullet_rect) {
                continue;
            }
            bullet.collide();
            events.push(GameEvent::Impact { by: bullet.fired_by });
            damage_player(&mut level.player, bullet.damage, events);
        }
    }

    for origin in fractures {
        fracture_meteor(level, origin, rng, events);
    }
}

/// Three fractured children scattered within ±FRACTURE_SPREAD of `origin`
fn fracture_meteor(level: &mut Level, origin: Vec2, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    for _ in 0..FRACTURE_CHILDREN {
        let offset = Vec2::new(
            rng.random_range(-FRACTURE_SPREAD..=FRACTURE_SPREAD),
            rng.random_range(-FRACTURE_SPREAD..=FRACTURE_SPREAD),
        );
        let id = level.next_entity_id();
        level
            .enemies
            .push(Enemy::meteor(id, origin + offset, MeteorSize::Small, true));
    }
    events.push(GameEvent::MeteorFractured { at: origin });
}

fn resolve_contacts(level: &mut Level, events: &mut Vec<GameEvent>) {
    let player = &mut level.player;
    for enemy in &mut level.enemies {
        let Some(player_rect) = player.character.rect() else {
            // Player went down earlier in this pass
            return;
        };
        let hit = enemy
            .character
            .rect()
            .is_some_and(|rect| rect.intersects(&player_rect));
        if !hit {
            continue;
        }

        match enemy.kind {
            EnemyKind::Boss => {
                player.character.destroy();
                events.push(GameEvent::PlayerDestroyed);
            }
            EnemyKind::PowerUp { power_up } => {
                enemy.character.destroy();
                enemy.character.destroy_animation.skip();
                apply_power_up(player, power_up);
                events.push(GameEvent::PowerUpCollected(power_up));
            }
            EnemyKind::HostileShip { .. } | EnemyKind::Meteor { .. } => {
                // Rammers self-destruct without awarding points
                enemy.character.destroy();
                let damage = enemy.character.strength * CONTACT_DAMAGE_FACTOR;
                damage_player(player, damage, events);
            }
        }
    }
}

fn damage_player(player: &mut Player, damage: i32, events: &mut Vec<GameEvent>) {
    let outcome = player.character.take_damage(damage);
    events.push(GameEvent::PlayerHit { damage, outcome });
    if outcome == DamageOutcome::Destroyed {
        events.push(GameEvent::PlayerDestroyed);
    }
}

pub fn apply_power_up(player: &mut Player, power_up: PowerUpKind) {
    let c = &mut player.character;
    match power_up {
        PowerUpKind::Health => {
            c.hitpoints = (c.hitpoints + POWER_UP_RESTORE).min(MAX_HITPOINTS);
        }
        PowerUpKind::Shield => {
            c.shield_hitpoints = (c.shield_hitpoints + POWER_UP_RESTORE).min(MAX_SHIELD);
        }
        PowerUpKind::Life => player.lives += 1,
        PowerUpKind::Laser => {
            player.laser_level = (player.laser_level + 1).min(MAX_LASER_LEVEL);
            c.strength += LASER_STRENGTH_BONUS;
        }
    }
    log::debug!("Power-up {:?} applied", power_up);
}
