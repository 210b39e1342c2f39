//! The player's ship: movement, dash, damage intake, boosts and weapons.

use glam::Vec2;
use neon_onslaught_core::{Bounds, PlayerSnapshot, PowerUpKind, SavedPlayer, WeaponKind};
use rand::Rng;

use crate::body::Body;
use crate::weapon::{Bullet, Weapon};

const PLAYER_SIZE: f32 = 40.0;
const BASE_SPEED: f32 = 200.0;
const INVULNERABILITY: f32 = 1.0;
const DASH_DURATION: f32 = 0.15;
const DASH_COOLDOWN: f32 = 1.0;
const DASH_SPEED: f32 = 800.0;
const MAX_SHIELD: f32 = 50.0;
const SHIELD_PICKUP: f32 = 30.0;
const DAMAGE_PER_UPGRADE: f32 = 0.15;
const SPEED_BOOST: (f32, f32) = (1.5, 8.0);
const DAMAGE_BOOST: (f32, f32) = (2.0, 8.0);
const MAGNET_BOOST: (f32, f32) = (200.0, 12.0);

/// Maximum health before any upgrade.
pub(crate) const BASE_MAX_HEALTH: f32 = 100.0;

/// Maximum health granted by each health upgrade.
pub(crate) const HEALTH_PER_UPGRADE: f32 = 20.0;

/// Seconds left on each timed boost.
#[derive(Clone, Copy, Debug, Default)]
struct Boosts {
    speed: f32,
    damage: f32,
    magnet: f32,
}

impl Boosts {
    fn update(&mut self, dt: f32) {
        self.speed = (self.speed - dt).max(0.0);
        self.damage = (self.damage - dt).max(0.0);
        self.magnet = (self.magnet - dt).max(0.0);
    }
}

/// Outcome of a hit that was not ignored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Hit {
    pub(crate) absorbed: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) body: Body,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    shield: f32,
    aim_angle: f32,
    steer: Vec2,
    trigger_held: bool,
    weapons: [Weapon; 3],
    active: WeaponKind,
    invulnerable: f32,
    dash_remaining: f32,
    dash_cooldown: f32,
    dash_direction: Vec2,
    boosts: Boosts,
}

impl Player {
    /// Creates a player centred in the playfield at full health.
    pub(crate) fn spawn(bounds: Bounds, max_health: f32) -> Self {
        Self {
            body: Body::centered(bounds.center(), Vec2::splat(PLAYER_SIZE)),
            health: max_health,
            max_health,
            shield: 0.0,
            aim_angle: 0.0,
            steer: Vec2::ZERO,
            trigger_held: false,
            weapons: WeaponKind::ALL.map(Weapon::new),
            active: WeaponKind::AssaultRifle,
            invulnerable: 0.0,
            dash_remaining: 0.0,
            dash_cooldown: 0.0,
            dash_direction: Vec2::X,
            boosts: Boosts::default(),
        }
    }

    /// Recreates a player from a checkpoint.
    pub(crate) fn restore(bounds: Bounds, saved: &SavedPlayer) -> Self {
        let max_health = saved.max_health.max(1.0);
        let mut player = Self::spawn(bounds, max_health);
        player.body.position = Vec2::new(saved.x, saved.y);
        player.clamp_into(bounds);
        player.health = saved.health.clamp(0.0, max_health);
        player
    }

    pub(crate) fn saved(&self) -> SavedPlayer {
        SavedPlayer {
            x: self.body.position.x,
            y: self.body.position.y,
            health: self.health,
            max_health: self.max_health,
        }
    }

    pub(crate) fn steer(&mut self, direction: Vec2) {
        self.steer = direction.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    pub(crate) fn aim_at(&mut self, target: Vec2) {
        let delta = target - self.body.center();
        if delta != Vec2::ZERO {
            self.aim_angle = delta.y.atan2(delta.x);
        }
    }

    pub(crate) fn set_trigger(&mut self, held: bool) {
        self.trigger_held = held;
    }

    /// Activates `weapon`, returning `false` if it was already active.
    pub(crate) fn select_weapon(&mut self, weapon: WeaponKind) -> bool {
        if self.active == weapon {
            return false;
        }
        self.active = weapon;
        true
    }

    pub(crate) fn is_dashing(&self) -> bool {
        self.dash_remaining > 0.0
    }

    /// Starts a dash along the movement input, or along the aim when idle.
    pub(crate) fn try_dash(&mut self) -> Option<Vec2> {
        if self.is_dashing() || self.dash_cooldown > 0.0 {
            return None;
        }
        let direction = if self.steer == Vec2::ZERO {
            Vec2::new(self.aim_angle.cos(), self.aim_angle.sin())
        } else {
            self.steer.normalize_or_zero()
        };
        self.dash_direction = direction;
        self.dash_remaining = DASH_DURATION;
        self.dash_cooldown = DASH_COOLDOWN;
        Some(direction)
    }

    fn speed(&self) -> f32 {
        if self.boosts.speed > 0.0 {
            BASE_SPEED * SPEED_BOOST.0
        } else {
            BASE_SPEED
        }
    }

    fn clamp_into(&mut self, bounds: Bounds) {
        let max = Vec2::new(bounds.width(), bounds.height()) - self.body.size;
        self.body.clamp_position(Vec2::ZERO, max);
    }

    /// Advances timers and moves the player, keeping it inside the playfield.
    pub(crate) fn update(&mut self, dt: f32, bounds: Bounds) {
        self.invulnerable = (self.invulnerable - dt).max(0.0);
        self.dash_cooldown = (self.dash_cooldown - dt).max(0.0);
        self.boosts.update(dt);
        for weapon in &mut self.weapons {
            weapon.update(dt);
        }

        self.body.velocity = if self.is_dashing() {
            self.dash_remaining = (self.dash_remaining - dt).max(0.0);
            self.dash_direction * DASH_SPEED
        } else {
            self.steer.normalize_or_zero() * self.speed()
        };
        self.body.integrate(dt);
        self.clamp_into(bounds);
    }

    /// Bullet damage multiplier from upgrades and the damage boost.
    pub(crate) fn damage_scale(&self, damage_upgrades: u32) -> f32 {
        let upgrades = 1.0 + DAMAGE_PER_UPGRADE * damage_upgrades as f32;
        if self.boosts.damage > 0.0 {
            upgrades * DAMAGE_BOOST.0
        } else {
            upgrades
        }
    }

    /// Pulls the trigger of the active weapon if it is held and ready.
    pub(crate) fn fire<R: Rng + ?Sized>(
        &mut self,
        damage_upgrades: u32,
        rng: &mut R,
    ) -> Option<(WeaponKind, Vec<Bullet>)> {
        if !self.trigger_held {
            return None;
        }
        let scale = self.damage_scale(damage_upgrades);
        let origin = self.body.center();
        let angle = self.aim_angle;
        let weapon = &mut self.weapons[self.active.slot()];
        if !weapon.try_fire() {
            return None;
        }
        Some((weapon.kind(), weapon.emit(origin, angle, scale, rng)))
    }

    /// Applies incoming damage, shield first. Ignored while dashing or invulnerable.
    pub(crate) fn take_damage(&mut self, amount: f32) -> Option<Hit> {
        if self.is_dashing() || self.invulnerable > 0.0 {
            return None;
        }
        let absorbed = amount.min(self.shield);
        self.shield -= absorbed;
        self.health = (self.health - (amount - absorbed)).max(0.0);
        self.invulnerable = INVULNERABILITY;
        Some(Hit { absorbed })
    }

    pub(crate) fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub(crate) fn apply_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Speed => self.boosts.speed = SPEED_BOOST.1,
            PowerUpKind::Damage => self.boosts.damage = DAMAGE_BOOST.1,
            PowerUpKind::Shield => self.shield = (self.shield + SHIELD_PICKUP).min(MAX_SHIELD),
            PowerUpKind::Magnet => self.boosts.magnet = MAGNET_BOOST.1,
        }
    }

    /// Centre and radius of the coin magnet while it is active.
    pub(crate) fn magnet(&self) -> Option<(Vec2, f32)> {
        (self.boosts.magnet > 0.0).then(|| (self.body.center(), MAGNET_BOOST.0))
    }

    pub(crate) fn apply_health_upgrade(&mut self) {
        self.max_health += HEALTH_PER_UPGRADE;
        self.health = self.max_health;
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.body.position,
            size: self.body.size,
            health: self.health,
            max_health: self.max_health,
            shield: self.shield,
            aim_angle: self.aim_angle,
            weapon: self.active,
            weapon_ready: self.weapons[self.active.slot()].is_ready(),
            dashing: self.is_dashing(),
            invulnerable: self.is_dashing() || self.invulnerable > 0.0,
            speed_boost: self.boosts.speed,
            damage_boost: self.boosts.damage,
            magnet_boost: self.boosts.magnet,
        }
    }
}
