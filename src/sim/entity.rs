//! Entity model: player, enemies, bullets and the shared shooter capability
//!
//! Plain data plus accessors. Behaviour lives in `motion`, `collision`,
//! `spawner` and `level`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Rect;
use crate::consts::*;

/// Texture names the simulation binds geometry for
pub mod textures {
    pub const PLAYER: &str = "player";
    pub const PLAYER_LASER: &str = "laserBlue01";
    pub const ENEMY_LASER: &str = "laserRed01";
    pub const HOSTILE_SHIP: &str = "ufo3d";
    pub const METEOR_BIG: &str = "meteorBrown_big1";
    pub const METEOR_SMALL: &str = "meteorBrown_small1";
    pub const BOSS: &str = "enemyBoss";
    pub const POWER_UP_HEALTH: &str = "pill_red";
    pub const POWER_UP_SHIELD: &str = "powerupBlue_shield";
    pub const POWER_UP_LASER: &str = "powerupRed_bolt";
    pub const POWER_UP_LIFE: &str = "powerupGreen_star";

    /// Every name the simulation may request
    pub const ALL: [&str; 11] = [
        PLAYER,
        PLAYER_LASER,
        ENEMY_LASER,
        HOSTILE_SHIP,
        METEOR_BIG,
        METEOR_SMALL,
        BOSS,
        POWER_UP_HEALTH,
        POWER_UP_SHIELD,
        POWER_UP_LASER,
        POWER_UP_LIFE,
    ];
}

/// Stable handle for an enemy (never reused within a session)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Non-owning reference from a bullet to whoever fired it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShooterId {
    Player,
    Enemy(EntityId),
}

/// Position, cached bounding box and velocity shared by everything on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub texture: String,
    /// Top-left corner
    pub pos: Vec2,
    /// Bound lazily from the geometry registry
    pub size: Option<Vec2>,
    pub vel: Vec2,
    /// Facing in degrees
    pub direction: f32,
    pub speed: f32,
}

impl Body {
    pub fn new(texture: &str, pos: Vec2, speed: f32) -> Self {
        Self {
            texture: texture.to_string(),
            pos,
            size: None,
            vel: Vec2::ZERO,
            direction: 0.0,
            speed,
        }
    }

    /// Collision rectangle, if geometry has been bound
    pub fn rect(&self) -> Option<Rect> {
        self.size.map(|size| Rect::new(self.pos, size))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size.unwrap_or(Vec2::ZERO) / 2.0
    }
}

/// Frame-counted destruction/impact animation bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestroyAnimation {
    pub counter: f32,
    pub played: bool,
    pub sound_played: bool,
}

impl DestroyAnimation {
    /// Advance by `frames`; returns true on the frame the window completes
    pub fn advance(&mut self, frames: f32, window: f32) -> bool {
        if self.played {
            return false;
        }
        self.counter += frames;
        if self.counter >= window {
            self.played = true;
            return true;
        }
        false
    }

    /// Finish immediately (no visual aftermath)
    pub fn skip(&mut self) {
        self.played = true;
        self.sound_played = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Fire-rate throttle: a bullet is due once `timer >= reset_value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireControl {
    pub timer: f32,
    pub reset_value: f32,
    pub is_firing: bool,
}

impl FireControl {
    pub fn new(reset_value: f32) -> Self {
        Self {
            timer: 0.0,
            reset_value,
            is_firing: false,
        }
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.timer >= self.reset_value
    }
}

/// Where a hit landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    Shield,
    Hull,
    Destroyed,
}

/// Anything that can take damage and be destroyed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub body: Body,
    pub point_value: u32,
    pub hitpoints: i32,
    pub shield_hitpoints: i32,
    /// Damage dealt per bullet
    pub strength: i32,
    pub is_destroyed: bool,
    pub destroy_animation: DestroyAnimation,
    pub fire: FireControl,
    /// Muzzle offset from the body center
    pub fire_offset: Vec2,
}

impl Character {
    pub fn new(body: Body, hitpoints: i32, strength: i32, fire_reset: f32) -> Self {
        Self {
            body,
            point_value: 0,
            hitpoints,
            shield_hitpoints: 0,
            strength,
            is_destroyed: false,
            destroy_animation: DestroyAnimation::default(),
            fire: FireControl::new(fire_reset),
            fire_offset: Vec2::ZERO,
        }
    }

    /// Apply damage to hitpoints only, clamping at zero
    pub fn take_hull_damage(&mut self, damage: i32) -> DamageOutcome {
        self.hitpoints = (self.hitpoints - damage.max(0)).max(0);
        if self.hitpoints == 0 {
            self.is_destroyed = true;
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Hull
        }
    }

    /// Shield absorbs the whole hit while it has any charge left.
    /// Overflow past zero shield is discarded, not carried into hitpoints.
    pub fn take_damage(&mut self, damage: i32) -> DamageOutcome {
        if self.shield_hitpoints > 0 {
            self.shield_hitpoints = (self.shield_hitpoints - damage.max(0)).max(0);
            DamageOutcome::Shield
        } else {
            self.take_hull_damage(damage)
        }
    }

    /// Zero hitpoints and mark destroyed
    pub fn destroy(&mut self) {
        self.hitpoints = 0;
        self.is_destroyed = true;
    }

    /// Destroyed and the aftermath has finished playing
    pub fn is_finished(&self) -> bool {
        self.is_destroyed && self.destroy_animation.played
    }

    pub fn rect(&self) -> Option<Rect> {
        if self.is_destroyed {
            return None;
        }
        self.body.rect()
    }
}

/// Which viewport edges the player is pressed against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryFlags {
    pub at_top: bool,
    pub at_bottom: bool,
    pub at_left: bool,
    pub at_right: bool,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub character: Character,
    pub points: u32,
    pub lives: u32,
    /// 1-3, number of parallel lasers
    pub laser_level: u32,
    pub bounds: BoundaryFlags,
    pub is_accelerating: bool,
    pub currency: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        let body = Body::new(textures::PLAYER, Vec2::ZERO, PLAYER_SPEED);
        let mut character = Character::new(body, MAX_HITPOINTS, PLAYER_STRENGTH, PLAYER_FIRE_RESET);
        character.shield_hitpoints = MAX_SHIELD;
        Self {
            character,
            points: 0,
            lives: PLAYER_LIVES,
            laser_level: 1,
            bounds: BoundaryFlags::default(),
            is_accelerating: false,
            currency: 0,
        }
    }

    /// Bring the ship back in place after a death (caller handles lives).
    /// Velocity and trigger follow held keys, so they survive the respawn.
    pub fn respawn(&mut self) {
        let c = &mut self.character;
        c.hitpoints = MAX_HITPOINTS;
        c.shield_hitpoints = MAX_SHIELD;
        c.is_destroyed = false;
        c.destroy_animation.reset();
        c.fire.timer = 0.0;
        self.bounds = BoundaryFlags::default();
        self.is_accelerating = false;
    }

    /// Horizontal offsets of each laser for the current laser level
    pub fn laser_offsets(&self) -> Vec<f32> {
        match self.laser_level.min(MAX_LASER_LEVEL) {
            0 | 1 => vec![0.0],
            2 => vec![-LASER_SPREAD / 2.0, LASER_SPREAD / 2.0],
            _ => vec![-LASER_SPREAD, 0.0, LASER_SPREAD],
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.character.is_destroyed
    }
}

/// Meteor size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeteorSize {
    Big,
    Small,
}

/// Power-up effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Health,
    Shield,
    Laser,
    Life,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Health,
        PowerUpKind::Shield,
        PowerUpKind::Laser,
        PowerUpKind::Life,
    ];

    pub fn texture(&self) -> &'static str {
        match self {
            PowerUpKind::Health => textures::POWER_UP_HEALTH,
            PowerUpKind::Shield => textures::POWER_UP_SHIELD,
            PowerUpKind::Laser => textures::POWER_UP_LASER,
            PowerUpKind::Life => textures::POWER_UP_LIFE,
        }
    }
}

/// Closed classification of enemies, carrying only per-kind state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    HostileShip { constant_motion: bool, can_fire: bool },
    Meteor { size: MeteorSize, is_fractured: bool },
    Boss,
    PowerUp { power_up: PowerUpKind },
}

impl EnemyKind {
    pub fn can_fire(&self) -> bool {
        match self {
            EnemyKind::HostileShip { can_fire, .. } => *can_fire,
            EnemyKind::Boss => true,
            EnemyKind::Meteor { .. } | EnemyKind::PowerUp { .. } => false,
        }
    }

    pub fn constant_motion(&self) -> bool {
        match self {
            EnemyKind::HostileShip {
                constant_motion, ..
            } => *constant_motion,
            EnemyKind::Boss => false,
            EnemyKind::Meteor { .. } | EnemyKind::PowerUp { .. } => true,
        }
    }

    pub fn is_power_up(&self) -> bool {
        matches!(self, EnemyKind::PowerUp { .. })
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, EnemyKind::Boss)
    }

    /// Short label for notifications and logs
    pub fn label(&self) -> &'static str {
        match self {
            EnemyKind::HostileShip { .. } => "ship",
            EnemyKind::Meteor { .. } => "meteor",
            EnemyKind::Boss => "boss",
            EnemyKind::PowerUp { .. } => "power-up",
        }
    }
}

/// An enemy ship, meteor, boss or power-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub character: Character,
}

impl Enemy {
    /// A homing gunship scaled by the difficulty multiplier
    pub fn hostile_ship(id: EntityId, pos: Vec2, multiplier: f32) -> Self {
        let body = Body::new(textures::HOSTILE_SHIP, pos, 2.0 * multiplier);
        let mut character = Character::new(
            body,
            (50.0 * multiplier) as i32,
            (10.0 * multiplier) as i32,
            ENEMY_FIRE_RESET,
        );
        character.point_value = 25;
        Self {
            id,
            kind: EnemyKind::HostileShip {
                constant_motion: false,
                can_fire: true,
            },
            character,
        }
    }

    pub fn meteor(id: EntityId, pos: Vec2, size: MeteorSize, is_fractured: bool) -> Self {
        let (texture, hitpoints, strength, points) = match size {
            MeteorSize::Big => (textures::METEOR_BIG, 20, 15, 15),
            MeteorSize::Small => (textures::METEOR_SMALL, 10, 5, 5),
        };
        let body = Body::new(texture, pos, 2.0);
        let mut character = Character::new(body, hitpoints, strength, ENEMY_FIRE_RESET);
        character.point_value = points;
        Self {
            id,
            kind: EnemyKind::Meteor { size, is_fractured },
            character,
        }
    }

    pub fn boss(id: EntityId, pos: Vec2, multiplier: f32) -> Self {
        let body = Body::new(textures::BOSS, pos, multiplier.max(0.5));
        let mut character = Character::new(
            body,
            (500.0 * multiplier) as i32,
            (25.0 * multiplier) as i32,
            BOSS_FIRE_RESET,
        );
        character.point_value = 100;
        Self {
            id,
            kind: EnemyKind::Boss,
            character,
        }
    }

    pub fn power_up(id: EntityId, pos: Vec2, power_up: PowerUpKind) -> Self {
        let body = Body::new(power_up.texture(), pos, 2.0);
        let character = Character::new(body, 1, 0, ENEMY_FIRE_RESET);
        Self {
            id,
            kind: EnemyKind::PowerUp { power_up },
            character,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.character.is_destroyed
    }
}

/// A projectile in flight (or playing its impact)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub body: Body,
    pub fired_by: ShooterId,
    pub fired_by_enemy: bool,
    pub damage: i32,
    /// Latched on first hit; a colliding bullet never moves or hits again
    pub is_colliding: bool,
    /// Lateral offset from the firer's muzzle (multi-laser spread)
    pub muzzle_offset: f32,
    pub impact: DestroyAnimation,
}

impl Bullet {
    pub fn new(fired_by: ShooterId, damage: i32, muzzle_offset: f32) -> Self {
        let fired_by_enemy = fired_by != ShooterId::Player;
        let texture = if fired_by_enemy {
            textures::ENEMY_LASER
        } else {
            textures::PLAYER_LASER
        };
        Self {
            body: Body::new(texture, Vec2::ZERO, BULLET_SPEED),
            fired_by,
            fired_by_enemy,
            damage,
            is_colliding: false,
            muzzle_offset,
            impact: DestroyAnimation::default(),
        }
    }

    /// Mark the first hit and stop in place
    pub fn collide(&mut self) {
        self.is_colliding = true;
        self.body.vel = Vec2::ZERO;
    }

    /// Impact finished or dropped; ready for removal
    pub fn is_finished(&self) -> bool {
        self.impact.played
    }

    pub fn rect(&self) -> Option<Rect> {
        if self.is_colliding {
            return None;
        }
        self.body.rect()
    }
}

/// Capability shared by everything that fires bullets
pub trait Shooter {
    fn shooter_id(&self) -> ShooterId;
    fn character(&self) -> &Character;
    fn character_mut(&mut self) -> &mut Character;

    /// Lateral offsets for each bullet in one volley
    fn volley(&self) -> Vec<f32> {
        vec![0.0]
    }

    fn is_player(&self) -> bool {
        self.shooter_id() == ShooterId::Player
    }

    /// (timer, reset value, is player)
    fn fire_settings(&self) -> (f32, f32, bool) {
        let fire = &self.character().fire;
        (fire.timer, fire.reset_value, self.is_player())
    }
}

impl Shooter for Player {
    fn shooter_id(&self) -> ShooterId {
        ShooterId::Player
    }

    fn character(&self) -> &Character {
        &self.character
    }

    fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    fn volley(&self) -> Vec<f32> {
        self.laser_offsets()
    }
}

impl Shooter for Enemy {
    fn shooter_id(&self) -> ShooterId {
        ShooterId::Enemy(self.id)
    }

    fn character(&self) -> &Character {
        &self.character
    }

    fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shield_absorbs_without_carry_through() {
        let mut player = Player::new();
        player.character.shield_hitpoints = 10;
        let outcome = player.character.take_damage(15);
        assert_eq!(outcome, DamageOutcome::Shield);
        assert_eq!(player.character.shield_hitpoints, 0);
        // Overflow is discarded, hull untouched on this hit
        assert_eq!(player.character.hitpoints, MAX_HITPOINTS);

        // Next hit goes to the hull
        let outcome = player.character.take_damage(15);
        assert_eq!(outcome, DamageOutcome::Hull);
        assert_eq!(player.character.hitpoints, MAX_HITPOINTS - 15);
    }

    #[test]
    fn test_hull_damage_clamps_at_zero() {
        let mut enemy = Enemy::meteor(EntityId(1), Vec2::ZERO, MeteorSize::Small, false);
        let outcome = enemy.character.take_hull_damage(1000);
        assert_eq!(outcome, DamageOutcome::Destroyed);
        assert_eq!(enemy.character.hitpoints, 0);
        assert!(enemy.is_destroyed());
    }

    #[test]
    fn test_only_ships_and_bosses_fire() {
        let ship = Enemy::hostile_ship(EntityId(1), Vec2::ZERO, 1.0);
        let boss = Enemy::boss(EntityId(2), Vec2::ZERO, 1.0);
        let meteor = Enemy::meteor(EntityId(3), Vec2::ZERO, MeteorSize::Big, false);
        let power_up = Enemy::power_up(EntityId(4), Vec2::ZERO, PowerUpKind::Life);
        assert!(ship.kind.can_fire());
        assert!(boss.kind.can_fire());
        assert!(!meteor.kind.can_fire());
        assert!(!power_up.kind.can_fire());
    }

    #[test]
    fn test_ship_stats_scale_with_difficulty() {
        let ship = Enemy::hostile_ship(EntityId(1), Vec2::ZERO, 0.5);
        assert_eq!(ship.character.hitpoints, 25);
        assert_eq!(ship.character.strength, 5);
        assert_eq!(ship.character.point_value, 25);
        assert!((ship.character.body.speed - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_laser_offsets() {
        let mut player = Player::new();
        assert_eq!(player.laser_offsets(), vec![0.0]);
        player.laser_level = 2;
        assert_eq!(player.laser_offsets().len(), 2);
        player.laser_level = 3;
        assert_eq!(player.laser_offsets(), vec![-LASER_SPREAD, 0.0, LASER_SPREAD]);
        // Anything past the cap still fires three
        player.laser_level = 7;
        assert_eq!(player.laser_offsets().len(), 3);
    }

    #[test]
    fn test_respawn_keeps_progress() {
        let mut player = Player::new();
        player.points = 120;
        player.laser_level = 2;
        player.lives = 2;
        player.character.destroy();
        player.character.destroy_animation.skip();
        player.character.shield_hitpoints = 0;
        player.character.body.vel = Vec2::new(-PLAYER_SPEED, 0.0);
        player.character.fire.is_firing = true;
        player.character.fire.timer = 4.0;

        player.respawn();
        assert!(player.is_alive());
        assert_eq!(player.character.hitpoints, MAX_HITPOINTS);
        assert_eq!(player.character.shield_hitpoints, MAX_SHIELD);
        assert_eq!(player.points, 120);
        assert_eq!(player.laser_level, 2);
        assert_eq!(player.lives, 2);
        assert!(!player.character.destroy_animation.played);
        // Held keys still apply; only the fire timer restarts
        assert_eq!(player.character.body.vel, Vec2::new(-PLAYER_SPEED, 0.0));
        assert!(player.character.fire.is_firing);
        assert_eq!(player.character.fire.timer, 0.0);
    }

    #[test]
    fn test_destroy_animation_completes_once() {
        let mut anim = DestroyAnimation::default();
        assert!(!anim.advance(10.0, 24.0));
        assert!(anim.advance(14.0, 24.0));
        assert!(anim.played);
        assert!(!anim.advance(1.0, 24.0));
    }

    #[test]
    fn test_bullet_collide_stops() {
        let mut bullet = Bullet::new(ShooterId::Player, 10, 0.0);
        bullet.body.vel = Vec2::new(0.0, -5.0);
        bullet.body.size = Some(Vec2::new(4.0, 10.0));
        assert!(bullet.rect().is_some());
        bullet.collide();
        assert!(bullet.is_colliding);
        assert_eq!(bullet.body.vel, Vec2::ZERO);
        assert!(bullet.rect().is_none());
    }
}
