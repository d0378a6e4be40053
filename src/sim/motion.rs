//! Per-tick motion and the weapon fire-rate model
//!
//! Units: player and bullet speeds are per second and scale with `dt`;
//! enemy speeds and every fire timer are per frame and scale with
//! `frames = dt * animation_speed`.

use glam::Vec2;

use super::entity::{Bullet, Enemy, Player, Shooter};
use crate::{degree_to_rad, find_next_point_in_travel};

/// Bosses stop descending once their top edge reaches this line
pub const BOSS_HOLD_Y: f32 = 120.0;

/// Move the player by its input-driven velocity, refusing any axis step
/// that would carry its center out of the viewport.
pub fn advance_player(player: &mut Player, dt: f32, viewport: Vec2) {
    if player.character.is_destroyed {
        return;
    }
    let body = &mut player.character.body;
    let half = body.size.unwrap_or(Vec2::ZERO) / 2.0;
    let next = body.pos + body.vel * dt + half;

    if body.vel.x != 0.0 && next.x >= 0.0 && next.x <= viewport.x {
        body.pos.x += body.vel.x * dt;
        player.bounds.at_left = false;
        player.bounds.at_right = false;
    } else {
        if next.x >= viewport.x {
            player.bounds.at_right = true;
        }
        if next.x <= 0.0 {
            player.bounds.at_left = true;
        }
    }

    if body.vel.y != 0.0 && next.y > 0.0 && next.y < viewport.y {
        body.pos.y += body.vel.y * dt;
        player.is_accelerating = body.vel.y < 0.0;
        player.bounds.at_top = false;
        player.bounds.at_bottom = false;
    } else {
        if next.y >= viewport.y {
            player.bounds.at_bottom = true;
        }
        if next.y <= 0.0 {
            player.bounds.at_top = true;
        }
    }
}

/// Constant-motion enemies fall straight down; homing ships strafe toward
/// the player's X while descending faster.
pub fn advance_enemy(enemy: &mut Enemy, player_x: f32, frames: f32) {
    if enemy.character.is_destroyed {
        return;
    }
    let constant = enemy.kind.constant_motion();
    let is_boss = enemy.kind.is_boss();
    let body = &mut enemy.character.body;
    let step = body.speed * frames;

    if constant {
        body.vel = Vec2::new(0.0, body.speed);
        body.pos.y += step;
        return;
    }

    let dx = if player_x > body.pos.x { step } else { -step };
    let mut dy = step * crate::consts::HOMING_Y_FACTOR;
    if is_boss && body.pos.y + dy > BOSS_HOLD_Y {
        dy = (BOSS_HOLD_Y - body.pos.y).max(0.0);
    }
    body.vel = if frames > 0.0 {
        Vec2::new(dx, dy) / frames
    } else {
        Vec2::ZERO
    };
    body.pos.x += dx;
    body.pos.y += dy;
}

/// Bullets travel along `direction ± 90°`: enemy fire downward, player fire upward
pub fn advance_bullet(bullet: &mut Bullet, dt: f32) {
    if bullet.is_colliding {
        return;
    }
    let heading = if bullet.fired_by_enemy {
        bullet.body.direction + 90.0
    } else {
        bullet.body.direction - 90.0
    };
    let rad = degree_to_rad(heading);
    bullet.body.vel = find_next_point_in_travel(bullet.body.speed, rad);
    bullet.body.pos += find_next_point_in_travel(bullet.body.speed * dt, rad);
}

/// The player's timer runs only while the trigger is held
pub fn advance_trigger(player: &mut Player, frames: f32) {
    let fire = &mut player.character.fire;
    if fire.is_firing && !fire.ready() {
        fire.timer += frames;
    }
}

/// Emit a volley when the fire timer is due and reset it. When not due,
/// AI shooters advance their own timer; the player's is driven by
/// `advance_trigger` instead.
pub fn check_fire<S: Shooter>(shooter: &mut S, frames: f32) -> Vec<Bullet> {
    let (timer, reset_value, is_player) = shooter.fire_settings();
    if timer >= reset_value {
        let id = shooter.shooter_id();
        let volley = shooter.volley();
        let character = shooter.character_mut();
        character.fire.timer = 0.0;
        let direction = character.body.direction;
        let muzzle = character.body.center() + character.fire_offset;
        return volley
            .into_iter()
            .map(|offset| {
                let mut bullet = Bullet::new(id, character.strength, offset);
                bullet.body.direction = direction;
                // Provisional until geometry is bound
                bullet.body.pos = muzzle + Vec2::new(offset, 0.0);
                bullet
            })
            .collect();
    }
    if !is_player {
        shooter.character_mut().fire.timer = timer + frames;
    }
    Vec::new()
}
