//! Collectible drops left behind by destroyed enemies.

use glam::Vec2;
use neon_onslaught_core::{PickupKind, PickupSnapshot};
use rand::Rng;

use crate::body::{chase_velocity, Body};

const COIN_SIZE: f32 = 16.0;
const COIN_LIFETIME: f32 = 10.0;
const COIN_SCATTER: f32 = 50.0;
const COIN_FRICTION: f32 = 0.9;
const MAGNET_PULL_SPEED: f32 = 300.0;
const HEALTH_PACK_SIZE: f32 = 20.0;
const HEALTH_PACK_LIFETIME: f32 = 15.0;
const POWER_UP_SIZE: f32 = 30.0;
const POWER_UP_LIFETIME: f32 = 15.0;

/// Health restored by a health pack.
pub(crate) const HEALTH_PACK_HEAL: f32 = 30.0;

#[derive(Clone, Debug)]
pub(crate) struct Pickup {
    pub(crate) kind: PickupKind,
    pub(crate) body: Body,
    age: f32,
    lifetime: f32,
    pub(crate) collected: bool,
}

impl Pickup {
    /// Drops a pickup centred on `center`. Coins scatter with a small random impulse.
    pub(crate) fn drop_at<R: Rng + ?Sized>(kind: PickupKind, center: Vec2, rng: &mut R) -> Self {
        let (size, lifetime) = match kind {
            PickupKind::Coin { .. } => (COIN_SIZE, COIN_LIFETIME),
            PickupKind::HealthPack => (HEALTH_PACK_SIZE, HEALTH_PACK_LIFETIME),
            PickupKind::PowerUp { .. } => (POWER_UP_SIZE, POWER_UP_LIFETIME),
        };
        let mut body = Body::centered(center, Vec2::splat(size));
        if matches!(kind, PickupKind::Coin { .. }) {
            body.velocity = Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * COIN_SCATTER;
        }
        Self {
            kind,
            body,
            age: 0.0,
            lifetime,
            collected: false,
        }
    }

    /// Ages the pickup and moves coins, pulling them toward `magnet` when in range.
    pub(crate) fn update(&mut self, dt: f32, magnet: Option<(Vec2, f32)>) {
        self.age += dt;
        if !matches!(self.kind, PickupKind::Coin { .. }) {
            return;
        }

        let center = self.body.center();
        match magnet {
            Some((target, range)) if center.distance(target) <= range => {
                self.body.velocity = chase_velocity(center, target, MAGNET_PULL_SPEED);
            }
            _ => self.body.velocity *= COIN_FRICTION,
        }
        self.body.integrate(dt);
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }

    pub(crate) fn snapshot(&self) -> PickupSnapshot {
        PickupSnapshot {
            kind: self.kind,
            position: self.body.position,
            size: self.body.size,
            remaining: (self.lifetime - self.age).max(0.0),
        }
    }
}
