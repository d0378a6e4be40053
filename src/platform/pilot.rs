//! Demo pilot
//!
//! Plays the game from snapshots alone, the way a presentation layer would:
//! it reads the world and answers with edge-triggered inputs. Used by the
//! headless binary and for soak testing.

use crate::input::{InputEvent, InputKind};
use crate::sim::{Enemy, GamePhase, Snapshot};

/// Horizontal distance at which the pilot stops strafing
const AIM_TOLERANCE: f32 = 12.0;

#[derive(Debug, Default)]
pub struct Pilot {
    strafe: Option<InputKind>,
    firing: bool,
    /// Last inputs may not have arrived; resend everything
    desynced: bool,
}

impl Pilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inputs needed to move from what is held now to what this snapshot calls for
    pub fn steer(&mut self, snapshot: &Snapshot) -> Vec<InputEvent> {
        let (strafe, firing) = self.plan(snapshot);
        let mut inputs = Vec::new();

        if self.desynced {
            inputs.push(InputEvent::release(InputKind::Left));
            inputs.push(InputEvent::release(InputKind::Right));
            inputs.push(InputEvent::release(InputKind::FirePrimary));
            self.strafe = None;
            self.firing = false;
            self.desynced = false;
        }

        if strafe != self.strafe {
            if let Some(held) = self.strafe {
                inputs.push(InputEvent::release(held));
            }
            if let Some(next) = strafe {
                inputs.push(InputEvent::press(next));
            }
            self.strafe = strafe;
        }
        if firing != self.firing {
            inputs.push(if firing {
                InputEvent::press(InputKind::FirePrimary)
            } else {
                InputEvent::release(InputKind::FirePrimary)
            });
            self.firing = firing;
        }
        inputs
    }

    /// Call when an input could not be delivered
    pub fn forget(&mut self) {
        self.desynced = true;
    }

    fn plan(&self, snapshot: &Snapshot) -> (Option<InputKind>, bool) {
        if snapshot.phase != GamePhase::Playing {
            return (None, false);
        }
        let level = &snapshot.level;
        let player = &level.player;
        if !player.is_alive() {
            return (None, false);
        }
        let x = player.character.body.center().x;

        // Power-ups first, otherwise the lowest threat
        let target = level
            .enemies
            .iter()
            .filter(|e| !e.is_destroyed() && e.character.body.pos.y > 0.0)
            .max_by(|a, b| {
                let key = |e: &Enemy| (e.kind.is_power_up(), e.character.body.pos.y);
                key(a)
                    .partial_cmp(&key(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        let Some(target) = target else {
            return (None, false);
        };

        let dx = target.character.body.center().x - x;
        let strafe = if dx > AIM_TOLERANCE {
            Some(InputKind::Right)
        } else if dx < -AIM_TOLERANCE {
            Some(InputKind::Left)
        } else {
            None
        };
        (strafe, !target.kind.is_power_up())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EntityId, Level, LevelParams, Player, PowerUpKind};
    use glam::Vec2;

    fn snapshot(enemies: Vec<Enemy>) -> Snapshot {
        let mut player = Player::new();
        player.character.body.size = Some(Vec2::new(100.0, 80.0));
        player.character.body.pos = Vec2::new(910.0, 900.0);
        let mut level = Level::new(LevelParams::default(), player).unwrap();
        level.enemies = enemies;
        Snapshot {
            time_ticks: 1,
            phase: GamePhase::Playing,
            level,
            events: Vec::new(),
        }
    }

    fn ship_at(id: u32, x: f32, y: f32) -> Enemy {
        let mut ship = Enemy::hostile_ship(EntityId(id), Vec2::new(x, y), 0.5);
        ship.character.body.size = Some(Vec2::new(90.0, 90.0));
        ship
    }

    #[test]
    fn test_idle_without_targets() {
        let mut pilot = Pilot::new();
        assert!(pilot.steer(&snapshot(Vec::new())).is_empty());
    }

    #[test]
    fn test_chases_and_fires_edge_triggered() {
        let mut pilot = Pilot::new();
        let snap = snapshot(vec![ship_at(1, 200.0, 300.0)]);
        assert_eq!(
            pilot.steer(&snap),
            vec![
                InputEvent::press(InputKind::Left),
                InputEvent::press(InputKind::FirePrimary)
            ]
        );
        // Same picture, nothing new to say
        assert!(pilot.steer(&snap).is_empty());

        // Target switches sides
        let snap = snapshot(vec![ship_at(2, 1500.0, 300.0)]);
        assert_eq!(
            pilot.steer(&snap),
            vec![
                InputEvent::release(InputKind::Left),
                InputEvent::press(InputKind::Right)
            ]
        );
    }

    #[test]
    fn test_prefers_power_ups_and_holds_fire() {
        let mut pilot = Pilot::new();
        let mut power_up = Enemy::power_up(EntityId(3), Vec2::new(100.0, 50.0), PowerUpKind::Laser);
        power_up.character.body.size = Some(Vec2::new(34.0, 33.0));
        let snap = snapshot(vec![ship_at(1, 1500.0, 600.0), power_up]);
        assert_eq!(pilot.steer(&snap), vec![InputEvent::press(InputKind::Left)]);
    }

    #[test]
    fn test_releases_everything_when_paused() {
        let mut pilot = Pilot::new();
        let mut snap = snapshot(vec![ship_at(1, 200.0, 300.0)]);
        pilot.steer(&snap);
        snap.phase = GamePhase::Paused;
        assert_eq!(
            pilot.steer(&snap),
            vec![
                InputEvent::release(InputKind::Left),
                InputEvent::release(InputKind::FirePrimary)
            ]
        );
    }

    #[test]
    fn test_forget_resends() {
        let mut pilot = Pilot::new();
        let snap = snapshot(vec![ship_at(1, 200.0, 300.0)]);
        pilot.steer(&snap);
        pilot.forget();
        let inputs = pilot.steer(&snap);
        assert_eq!(inputs.len(), 5);
        assert_eq!(inputs[3], InputEvent::press(InputKind::Left));
        assert_eq!(inputs[4], InputEvent::press(InputKind::FirePrimary));
    }
}
