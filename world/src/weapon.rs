//! Player weapons and the bullets they emit.

use glam::Vec2;
use neon_onslaught_core::{Bounds, BulletSnapshot, EnemyId, WeaponKind};
use rand::Rng;

use crate::body::Body;

const BULLET_SIZE: f32 = 8.0;
const CULL_MARGIN: f32 = 20.0;

/// Static firing characteristics of a weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct WeaponStats {
    pub(crate) damage: f32,
    pub(crate) fire_interval: f32,
    pub(crate) bullet_speed: f32,
    pub(crate) pellets: u32,
    /// Total arc in radians; each pellet deviates uniformly by half of it.
    pub(crate) spread: f32,
    /// Enemies a bullet passes through before it is spent. Zero disables piercing.
    pub(crate) pierce: u32,
}

pub(crate) const fn weapon_stats(kind: WeaponKind) -> WeaponStats {
    match kind {
        WeaponKind::AssaultRifle => WeaponStats {
            damage: 10.0,
            fire_interval: 0.15,
            bullet_speed: 500.0,
            pellets: 1,
            spread: 0.0,
            pierce: 0,
        },
        WeaponKind::Shotgun => WeaponStats {
            damage: 6.0,
            fire_interval: 0.6,
            bullet_speed: 350.0,
            pellets: 8,
            spread: 0.4,
            pierce: 0,
        },
        WeaponKind::Sniper => WeaponStats {
            damage: 50.0,
            fire_interval: 1.0,
            bullet_speed: 800.0,
            pellets: 1,
            spread: 0.0,
            pierce: 3,
        },
    }
}

/// Fire-rate gate for a single weapon.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Weapon {
    kind: WeaponKind,
    cooldown: f32,
    ready: bool,
}

impl Weapon {
    pub(crate) const fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            cooldown: 0.0,
            ready: true,
        }
    }

    pub(crate) const fn kind(&self) -> WeaponKind {
        self.kind
    }

    pub(crate) const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Accumulates cooldown; the weapon re-arms once the fire interval is reached.
    pub(crate) fn update(&mut self, dt: f32) {
        if self.ready {
            return;
        }
        self.cooldown += dt;
        if self.cooldown >= weapon_stats(self.kind).fire_interval {
            self.cooldown = 0.0;
            self.ready = true;
        }
    }

    /// Consumes the ready state. Returns `false` while cooling down.
    pub(crate) fn try_fire(&mut self) -> bool {
        if !self.ready {
            return false;
        }
        self.ready = false;
        self.cooldown = 0.0;
        true
    }

    /// Builds the projectiles of one trigger pull.
    pub(crate) fn emit<R: Rng + ?Sized>(
        &self,
        origin: Vec2,
        angle: f32,
        damage_scale: f32,
        rng: &mut R,
    ) -> Vec<Bullet> {
        let stats = weapon_stats(self.kind);
        let damage = stats.damage * damage_scale;
        (0..stats.pellets)
            .map(|_| {
                let deviation = if stats.spread > 0.0 {
                    (rng.gen::<f32>() - 0.5) * stats.spread
                } else {
                    0.0
                };
                Bullet::new(
                    origin,
                    angle + deviation,
                    stats.bullet_speed,
                    damage,
                    stats.pierce,
                )
            })
            .collect()
    }
}

#[derive(Clone, Debug)]
struct Pierce {
    remaining: u32,
    struck: Vec<EnemyId>,
}

/// Projectile travelling in a straight line.
#[derive(Clone, Debug)]
pub(crate) struct Bullet {
    pub(crate) body: Body,
    pub(crate) damage: f32,
    pierce: Option<Pierce>,
    pub(crate) spent: bool,
}

impl Bullet {
    pub(crate) fn new(origin: Vec2, angle: f32, speed: f32, damage: f32, pierce: u32) -> Self {
        let mut body = Body::centered(origin, Vec2::splat(BULLET_SIZE));
        body.velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
        Self {
            body,
            damage,
            pierce: (pierce > 0).then(|| Pierce {
                remaining: pierce,
                struck: Vec::new(),
            }),
            spent: false,
        }
    }

    /// Moves the bullet and marks it spent once it leaves the playfield margin.
    pub(crate) fn update(&mut self, dt: f32, bounds: Bounds) {
        self.body.integrate(dt);
        let position = self.body.position;
        if position.x < -CULL_MARGIN
            || position.x > bounds.width() + CULL_MARGIN
            || position.y < -CULL_MARGIN
            || position.y > bounds.height() + CULL_MARGIN
        {
            self.spent = true;
        }
    }

    /// Reports whether a piercing bullet already passed through `enemy`.
    pub(crate) fn has_struck(&self, enemy: EnemyId) -> bool {
        self.pierce
            .as_ref()
            .is_some_and(|pierce| pierce.struck.contains(&enemy))
    }

    /// Consumes the bullet or one unit of its pierce budget.
    pub(crate) fn register_hit(&mut self, enemy: EnemyId) {
        match self.pierce.as_mut() {
            None => self.spent = true,
            Some(pierce) => {
                pierce.struck.push(enemy);
                pierce.remaining = pierce.remaining.saturating_sub(1);
                if pierce.remaining == 0 {
                    self.spent = true;
                }
            }
        }
    }

    pub(crate) fn snapshot(&self) -> BulletSnapshot {
        BulletSnapshot {
            position: self.body.position,
            size: self.body.size,
            velocity: self.body.velocity,
            damage: self.damage,
            piercing: self.pierce.is_some(),
        }
    }
}
