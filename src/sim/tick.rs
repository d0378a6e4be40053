//! Frame driver
//!
//! One call to `tick` applies the inputs gathered since the last frame and
//! advances the world by `dt` seconds. Order within a frame:
//! inputs, geometry, motion, firing, collisions, completion, spawning,
//! animations, death handling, removal.

use glam::Vec2;

use super::collision::resolve_collisions;
use super::entity::ShooterId;
use super::geometry::bind_level;
use super::motion::{advance_bullet, advance_enemy, advance_player, advance_trigger, check_fire};
use super::spawner::{spawn_enemy, spawn_power_up};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::input::{InputEvent, InputKind};

/// Apply one edge-triggered input to the session
pub fn apply_input(state: &mut GameState, input: &InputEvent) {
    match input.kind {
        InputKind::Pause => {
            if !input.pressed {
                return;
            }
            state.phase = match state.phase {
                GamePhase::Playing => GamePhase::Paused,
                GamePhase::Paused => GamePhase::Playing,
                other => other,
            };
            log::debug!("Phase now {:?}", state.phase);
        }
        InputKind::Up | InputKind::Down | InputKind::Left | InputKind::Right => {
            steer(state, input.kind, input.pressed);
        }
        InputKind::FirePrimary => {
            let fire = &mut state.level.player.character.fire;
            fire.is_firing = input.pressed;
            if input.pressed {
                // First shot goes out on the next frame
                fire.timer = fire.reset_value;
            }
        }
        // Quit is handled by the runtime
        InputKind::FireSecondary | InputKind::None | InputKind::Quit => {}
    }
}

fn steer(state: &mut GameState, kind: InputKind, pressed: bool) {
    let body = &mut state.level.player.character.body;
    let (axis, sign) = match kind {
        InputKind::Up => (1, -1.0),
        InputKind::Down => (1, 1.0),
        InputKind::Left => (0, -1.0),
        InputKind::Right => (0, 1.0),
        _ => return,
    };
    let target = sign * body.speed;
    if pressed {
        body.vel[axis] = target;
    } else if body.vel[axis] == target {
        // Releasing only stops motion still heading this way
        body.vel[axis] = 0.0;
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, inputs: &[InputEvent], dt: f32) {
    for input in inputs {
        apply_input(state, input);
    }

    if matches!(state.phase, GamePhase::Paused | GamePhase::GameOver) {
        return;
    }

    state.time_ticks += 1;
    let frames = dt * state.config.animation_speed;
    let viewport = state.config.viewport;

    bind_level(&mut state.level, state.geometry.as_ref(), viewport);
    advance_player(&mut state.level.player, dt, viewport);

    if let GamePhase::LevelComplete { remaining } = state.phase {
        advance_animations(state, frames);
        handle_player_death(state, frames);
        state.level.remove_finished();
        if state.is_over() {
            return;
        }
        let remaining = remaining - dt;
        if remaining > 0.0 {
            state.phase = GamePhase::LevelComplete { remaining };
        } else if let Err(e) = state.advance_level() {
            log::error!("Cannot build level {}: {}", state.level.level_number() + 1, e);
            state.phase = GamePhase::LevelComplete { remaining: 0.0 };
        }
        return;
    }

    step_playing(state, dt, frames, viewport);
}

fn step_playing(state: &mut GameState, dt: f32, frames: f32, viewport: Vec2) {
    let level = &mut state.level;
    let events = &mut state.events;

    // Bullets
    for bullet in &mut level.bullets {
        advance_bullet(bullet, dt);
        if bullet.rect().is_some_and(|rect| rect.is_far_outside(viewport)) {
            bullet.impact.skip();
        }
    }

    // Enemies: cleanup, fire, move
    let player_x = level.player.character.body.pos.x;
    let mut volleys = Vec::new();
    for enemy in &mut level.enemies {
        if enemy.character.is_destroyed {
            continue;
        }
        if enemy.character.body.pos.y > viewport.y {
            // Fell off the bottom: gone without aftermath or points
            enemy.character.destroy();
            enemy.character.destroy_animation.skip();
            continue;
        }
        if enemy.kind.can_fire() {
            let bullets = check_fire(enemy, frames);
            if !bullets.is_empty() {
                events.push(GameEvent::ShotFired {
                    by: ShooterId::Enemy(enemy.id),
                    count: bullets.len(),
                });
                volleys.extend(bullets);
            }
        }
        advance_enemy(enemy, player_x, frames);
    }
    level.bullets.extend(volleys);

    resolve_collisions(level, &mut state.rng, events);

    if !level.complete && level.completion_met() {
        level.mark_complete();
        let level_number = level.level_number();
        log::info!("Level {} complete with {} points", level_number, level.player.points);
        events.push(GameEvent::LevelComplete { level_number });
        state.phase = GamePhase::LevelComplete {
            remaining: state.config.level_complete_secs,
        };
    } else {
        if let Some(id) = spawn_enemy(level, &mut state.rng, viewport.x, frames) {
            if level.enemy(id).is_some_and(|e| e.kind.is_boss()) {
                events.push(GameEvent::BossSpawned);
            }
        }
        spawn_power_up(level, &mut state.rng, viewport.x, frames);

        let player = &mut level.player;
        if player.is_alive() {
            advance_trigger(player, frames);
            let bullets = check_fire(player, frames);
            if !bullets.is_empty() {
                events.push(GameEvent::ShotFired {
                    by: ShooterId::Player,
                    count: bullets.len(),
                });
                level.bullets.extend(bullets);
            }
        }
    }

    // Place this frame's bullets and spawns before anyone draws them
    bind_level(&mut state.level, state.geometry.as_ref(), viewport);

    advance_animations(state, frames);
    handle_player_death(state, frames);
    state.level.remove_finished();
}

/// Run enemy destruction and bullet impact windows
fn advance_animations(state: &mut GameState, frames: f32) {
    for enemy in &mut state.level.enemies {
        if !enemy.character.is_destroyed {
            continue;
        }
        let animation = &mut enemy.character.destroy_animation;
        if !animation.sound_played {
            animation.sound_played = true;
            state.events.push(GameEvent::EnemyDestroyed {
                id: enemy.id,
                kind: enemy.kind,
            });
        }
        animation.advance(frames, DESTROY_ANIMATION_FRAMES);
    }

    for bullet in &mut state.level.bullets {
        if bullet.is_colliding {
            bullet.impact.advance(frames, BULLET_IMPACT_FRAMES);
        }
    }
}

/// Once the player's destruction has played out, spend a life
fn handle_player_death(state: &mut GameState, frames: f32) {
    let player = &mut state.level.player;
    if player.is_alive() {
        return;
    }
    if !player.character.destroy_animation.advance(frames, DESTROY_ANIMATION_FRAMES) {
        return;
    }

    player.lives = player.lives.saturating_sub(1);
    if player.lives == 0 {
        let points = player.points;
        log::info!("Game over at level {} with {} points", state.level.level_number(), points);
        state.events.push(GameEvent::GameOver { points });
        state.phase = GamePhase::GameOver;
    } else {
        player.respawn();
        log::debug!("Player respawned, {} lives left", player.lives);
        state.events.push(GameEvent::PlayerRespawned { lives: player.lives });
    }
}
