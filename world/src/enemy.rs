//! Enemy archetype catalog and per-archetype behaviour.
//!
//! Every enemy shares the same health and contact-damage contract. The
//! archetype-specific state lives in [`Behavior`], a closed set of variants
//! dispatched with `match` each tick.

use std::collections::BTreeSet;
use std::f32::consts::TAU;

use glam::Vec2;
use neon_onslaught_core::{Bounds, EnemyDetail, EnemyId, EnemyKind, EnemySnapshot};
use rand::Rng;

use crate::body::{chase_velocity, Body};

const SPLIT_OFFSET: f32 = 20.0;
const SMALL_SPLITTER_SPEED: f32 = 150.0;
const SMALL_SPLITTER_DAMAGE: f32 = 5.0;
const SMALL_SPLITTER_COINS: u32 = 3;

const BOSS_BASE_HEALTH: f32 = 200.0;
const BOSS_HEALTH_PER_WAVE: f32 = 50.0;
const BOSS_ENRAGED_SPEED: f32 = 60.0;
const BOSS_FIRE_INTERVAL: f32 = 2.0;
const BOSS_ENRAGED_FIRE_INTERVAL: f32 = 1.5;

const TELEPORT_COOLDOWN: f32 = 3.0;
const TELEPORT_DURATION: f32 = 0.3;
const TELEPORT_MIN_DISTANCE: f32 = 50.0;
const TELEPORT_EXTRA_DISTANCE: f32 = 150.0;
const TELEPORT_EDGE_MARGIN: f32 = 50.0;

const SHIELD_CAPACITY: f32 = 50.0;
const SHIELD_REGEN_RATE: f32 = 8.0;
const SHIELD_REGEN_DELAY: f32 = 2.0;

const SPAWNER_COOLDOWN: f32 = 4.0;
const SPAWNER_FIRST_SPAWN: f32 = 2.0;
const SPAWNER_ANIMATION: f32 = 0.5;
const SPAWNER_MAX_MINIONS: usize = 3;
const MINION_DISTANCE: f32 = 40.0;
const MINION_EDGE_MIN: f32 = 10.0;
const MINION_EDGE_MAX: f32 = 40.0;

/// Base statistics of an archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StatBlock {
    pub(crate) size: f32,
    pub(crate) health: f32,
    pub(crate) speed: f32,
    pub(crate) damage: f32,
    pub(crate) coin_value: u32,
}

/// Looks up the statistics of `kind`. Only the boss scales with `wave`.
pub(crate) fn stat_block(kind: EnemyKind, wave: u32) -> StatBlock {
    let (size, health, speed, damage, coin_value) = match kind {
        EnemyKind::Drone => (30.0, 30.0, 120.0, 10.0, 5),
        EnemyKind::Tank => (45.0, 60.0, 60.0, 20.0, 10),
        EnemyKind::Turret => (35.0, 40.0, 0.0, 15.0, 8),
        EnemyKind::Splitter => (35.0, 25.0, 90.0, 12.0, 7),
        EnemyKind::Elite => (40.0, 50.0, 150.0, 25.0, 15),
        EnemyKind::Boss => (
            80.0,
            BOSS_BASE_HEALTH + BOSS_HEALTH_PER_WAVE * wave as f32,
            40.0,
            30.0,
            50,
        ),
        EnemyKind::Teleporter => (35.0, 40.0, 80.0, 15.0, 12),
        EnemyKind::Shielder => (40.0, 60.0, 70.0, 12.0, 15),
        EnemyKind::Spawner => (50.0, 100.0, 30.0, 10.0, 20),
    };
    StatBlock {
        size,
        health,
        speed,
        damage,
        coin_value,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TeleportPhase {
    Chasing,
    FadingOut,
    FadingIn,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct TeleportState {
    phase: TeleportPhase,
    timer: f32,
}

impl TeleportState {
    fn opacity(&self) -> f32 {
        let half = TELEPORT_DURATION * 0.5;
        match self.phase {
            TeleportPhase::Chasing => 1.0,
            TeleportPhase::FadingOut => (1.0 - self.timer / half).clamp(0.0, 1.0),
            TeleportPhase::FadingIn => (self.timer / half).clamp(0.0, 1.0),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct ShieldState {
    shield: f32,
    since_hit: f32,
    broken: bool,
}

impl ShieldState {
    /// Soaks up as much of `amount` as possible, returning what passes through.
    fn absorb(&mut self, amount: f32) -> f32 {
        self.since_hit = 0.0;
        if self.shield <= 0.0 {
            return amount;
        }
        let absorbed = amount.min(self.shield);
        self.shield -= absorbed;
        if self.shield <= 0.0 {
            self.shield = 0.0;
            self.broken = true;
        }
        amount - absorbed
    }

    fn regenerate(&mut self, dt: f32) {
        self.since_hit += dt;
        if self.since_hit < SHIELD_REGEN_DELAY || self.shield >= SHIELD_CAPACITY {
            return;
        }
        self.shield = (self.shield + SHIELD_REGEN_RATE * dt).min(SHIELD_CAPACITY);
        if self.shield >= SHIELD_CAPACITY {
            self.broken = false;
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct SpawnerState {
    minions: Vec<EnemyId>,
    timer: f32,
    /// Elapsed time of the spawning animation, if one is playing.
    animation: Option<f32>,
}

/// Archetype-specific state.
#[derive(Clone, Debug)]
pub(crate) enum Behavior {
    /// Drone, Tank and Elite: plain pursuit.
    Chaser,
    Stationary,
    Splitter {
        can_split: bool,
        is_small: bool,
    },
    Boss {
        enraged: bool,
        fire_interval: f32,
    },
    Teleporter(TeleportState),
    Shielder(ShieldState),
    Spawner(SpawnerState),
}

/// Side effect requested by an enemy during its update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum EnemyAction {
    Enraged,
    Teleported { from: Vec2, to: Vec2 },
    SpawnMinion { position: Vec2 },
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) body: Body,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    speed: f32,
    pub(crate) damage: f32,
    pub(crate) coin_value: u32,
    pub(crate) dead: bool,
    behavior: Behavior,
}

impl Enemy {
    /// Creates an enemy of `kind` centred on `center`.
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, center: Vec2, wave: u32) -> Self {
        let stats = stat_block(kind, wave);
        let behavior = match kind {
            EnemyKind::Drone | EnemyKind::Tank | EnemyKind::Elite => Behavior::Chaser,
            EnemyKind::Turret => Behavior::Stationary,
            EnemyKind::Splitter => Behavior::Splitter {
                can_split: true,
                is_small: false,
            },
            EnemyKind::Boss => Behavior::Boss {
                enraged: false,
                fire_interval: BOSS_FIRE_INTERVAL,
            },
            EnemyKind::Teleporter => Behavior::Teleporter(TeleportState {
                phase: TeleportPhase::Chasing,
                timer: 0.0,
            }),
            EnemyKind::Shielder => Behavior::Shielder(ShieldState {
                shield: SHIELD_CAPACITY,
                since_hit: 0.0,
                broken: false,
            }),
            EnemyKind::Spawner => Behavior::Spawner(SpawnerState {
                minions: Vec::new(),
                timer: SPAWNER_FIRST_SPAWN,
                animation: None,
            }),
        };
        Self {
            id,
            kind,
            body: Body::centered(center, Vec2::splat(stats.size)),
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            damage: stats.damage,
            coin_value: stats.coin_value,
            dead: false,
            behavior,
        }
    }

    /// Builds the two children of a splitting splitter, or `None` for any other enemy.
    ///
    /// Children have half the parent's extents and maximum health, never split
    /// again, and are centred 20 units left and right of the parent's centre.
    pub(crate) fn split(&self, mut next_id: impl FnMut() -> EnemyId) -> Option<[Enemy; 2]> {
        if !matches!(
            self.behavior,
            Behavior::Splitter {
                can_split: true,
                ..
            }
        ) {
            return None;
        }
        let center = self.body.center();
        let size = self.body.size * 0.5;
        let health = self.max_health * 0.5;
        let mut child = |offset: f32| Enemy {
            id: next_id(),
            kind: EnemyKind::Splitter,
            body: Body::centered(center + Vec2::new(offset, 0.0), size),
            health,
            max_health: health,
            speed: SMALL_SPLITTER_SPEED,
            damage: SMALL_SPLITTER_DAMAGE,
            coin_value: SMALL_SPLITTER_COINS,
            dead: false,
            behavior: Behavior::Splitter {
                can_split: false,
                is_small: true,
            },
        };
        Some([child(-SPLIT_OFFSET), child(SPLIT_OFFSET)])
    }

    /// Applies damage, returning `true` only on the hit that kills the enemy.
    pub(crate) fn take_damage(&mut self, amount: f32) -> bool {
        if self.dead {
            return false;
        }
        let remaining = match &mut self.behavior {
            Behavior::Shielder(shield) => shield.absorb(amount),
            _ => amount,
        };
        self.health = (self.health - remaining).max(0.0);
        if self.health <= 0.0 {
            self.dead = true;
            return true;
        }
        false
    }

    /// Teleporters mid-jump neither ram the player nor can be rammed.
    pub(crate) fn is_phased(&self) -> bool {
        matches!(&self.behavior, Behavior::Teleporter(state) if state.phase != TeleportPhase::Chasing)
    }

    /// Forgets minions that are no longer alive.
    pub(crate) fn prune_minions(&mut self, live: &BTreeSet<EnemyId>) {
        if let Behavior::Spawner(state) = &mut self.behavior {
            state.minions.retain(|minion| live.contains(minion));
        }
    }

    pub(crate) fn register_minion(&mut self, minion: EnemyId) {
        if let Behavior::Spawner(state) = &mut self.behavior {
            state.minions.push(minion);
        }
    }

    /// Runs the archetype rules and pursuit for one tick.
    pub(crate) fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        target: Vec2,
        bounds: Bounds,
        rng: &mut R,
    ) -> Option<EnemyAction> {
        let center = self.body.center();
        let mut pursue = true;

        let action = match &mut self.behavior {
            Behavior::Chaser | Behavior::Splitter { .. } => None,
            Behavior::Stationary => {
                pursue = false;
                None
            }
            Behavior::Boss {
                enraged,
                fire_interval,
            } => {
                if !*enraged && self.health < self.max_health * 0.5 {
                    *enraged = true;
                    *fire_interval = BOSS_ENRAGED_FIRE_INTERVAL;
                    self.speed = BOSS_ENRAGED_SPEED;
                    Some(EnemyAction::Enraged)
                } else {
                    None
                }
            }
            Behavior::Teleporter(state) => {
                state.timer += dt;
                match state.phase {
                    TeleportPhase::Chasing => {
                        if state.timer >= TELEPORT_COOLDOWN {
                            state.phase = TeleportPhase::FadingOut;
                            state.timer = 0.0;
                        }
                        None
                    }
                    TeleportPhase::FadingOut => {
                        pursue = false;
                        if state.timer >= TELEPORT_DURATION * 0.5 {
                            state.phase = TeleportPhase::FadingIn;
                            state.timer = 0.0;
                            let from = self.body.position;
                            let to = teleport_destination(target, self.body.size, bounds, rng);
                            self.body.position = to;
                            Some(EnemyAction::Teleported { from, to })
                        } else {
                            None
                        }
                    }
                    TeleportPhase::FadingIn => {
                        pursue = false;
                        if state.timer >= TELEPORT_DURATION * 0.5 {
                            state.phase = TeleportPhase::Chasing;
                            state.timer = 0.0;
                        }
                        None
                    }
                }
            }
            Behavior::Shielder(shield) => {
                shield.regenerate(dt);
                None
            }
            Behavior::Spawner(state) => match state.animation.as_mut() {
                Some(elapsed) => {
                    *elapsed += dt;
                    if *elapsed >= SPAWNER_ANIMATION {
                        state.animation = None;
                        Some(EnemyAction::SpawnMinion {
                            position: minion_position(center, bounds, rng),
                        })
                    } else {
                        None
                    }
                }
                None => {
                    state.timer += dt;
                    if state.timer >= SPAWNER_COOLDOWN && state.minions.len() < SPAWNER_MAX_MINIONS
                    {
                        state.timer = 0.0;
                        state.animation = Some(0.0);
                    }
                    None
                }
            },
        };

        self.body.velocity = if pursue {
            chase_velocity(center, target, self.speed)
        } else {
            Vec2::ZERO
        };
        self.body.integrate(dt);
        action
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        let detail = match &self.behavior {
            Behavior::Chaser | Behavior::Stationary => EnemyDetail::Plain,
            Behavior::Splitter { is_small, .. } => EnemyDetail::Splitter {
                is_small: *is_small,
            },
            Behavior::Boss {
                enraged,
                fire_interval,
            } => EnemyDetail::Boss {
                phase: if *enraged { 2 } else { 1 },
                fire_interval: *fire_interval,
            },
            Behavior::Teleporter(state) => EnemyDetail::Teleporter {
                opacity: state.opacity(),
            },
            Behavior::Shielder(shield) => EnemyDetail::Shielder {
                shield: shield.shield,
                max_shield: SHIELD_CAPACITY,
                broken: shield.broken,
            },
            Behavior::Spawner(state) => EnemyDetail::Spawner {
                minions: state.minions.len(),
                spawning: state.animation.is_some(),
            },
        };
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.body.position,
            size: self.body.size,
            health: self.health,
            max_health: self.max_health,
            detail,
        }
    }
}

/// Top-left corner for a body of `size` whose centre lands 50..200 units
/// from `target`, kept away from the playfield edges.
fn teleport_destination<R: Rng + ?Sized>(
    target: Vec2,
    size: Vec2,
    bounds: Bounds,
    rng: &mut R,
) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let distance = TELEPORT_MIN_DISTANCE + rng.gen::<f32>() * TELEPORT_EXTRA_DISTANCE;
    let destination = target + Vec2::new(angle.cos(), angle.sin()) * distance - size * 0.5;
    let min = Vec2::splat(TELEPORT_EDGE_MARGIN);
    let max = Vec2::new(bounds.width(), bounds.height()) - Vec2::splat(TELEPORT_EDGE_MARGIN) - size;
    destination.min(max).max(min)
}

fn minion_position<R: Rng + ?Sized>(center: Vec2, bounds: Bounds, rng: &mut R) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let position = center + Vec2::new(angle.cos(), angle.sin()) * MINION_DISTANCE;
    let min = Vec2::splat(MINION_EDGE_MIN);
    let max = Vec2::new(bounds.width(), bounds.height()) - Vec2::splat(MINION_EDGE_MAX);
    position.min(max).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn enemy(kind: EnemyKind) -> Enemy {
        Enemy::spawn(EnemyId::new(1), kind, Vec2::new(100.0, 100.0), 1)
    }

    #[test]
    fn boss_health_scales_with_wave() {
        assert!((stat_block(EnemyKind::Boss, 5).health - 450.0).abs() < f32::EPSILON);
        assert!((stat_block(EnemyKind::Boss, 20).health - 1200.0).abs() < f32::EPSILON);
        assert!((stat_block(EnemyKind::Drone, 20).health - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn teleport_lands_on_a_ring_around_the_player_centre() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let player_center = Vec2::new(640.0, 360.0);
        let size = Vec2::splat(35.0);
        for _ in 0..64 {
            let top_left = teleport_destination(player_center, size, Bounds::playfield(), &mut rng);
            let distance = (top_left + size * 0.5).distance(player_center);
            assert!((49.99..=200.01).contains(&distance), "landed {distance} away");
        }
    }

    #[test]
    fn health_is_clamped_and_death_reported_once() {
        let mut drone = enemy(EnemyKind::Drone);
        assert!(!drone.take_damage(10.0));
        assert!(drone.take_damage(500.0));
        assert_eq!(drone.health, 0.0);
        assert!(drone.dead);
        assert!(!drone.take_damage(10.0), "already dead");
        assert_eq!(drone.health, 0.0);
    }

    #[test]
    fn shielder_absorbs_before_health() {
        let mut shielder = enemy(EnemyKind::Shielder);
        assert!(!shielder.take_damage(70.0));
        assert!((shielder.health - 40.0).abs() < f32::EPSILON);
        match shielder.snapshot().detail {
            EnemyDetail::Shielder { shield, broken, .. } => {
                assert_eq!(shield, 0.0);
                assert!(broken);
            }
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[test]
    fn shielder_regenerates_after_delay() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut shielder = enemy(EnemyKind::Shielder);
        let _ = shielder.take_damage(50.0);
        let target = Vec2::new(600.0, 600.0);

        let _ = shielder.update(1.5, target, Bounds::playfield(), &mut rng);
        assert!(matches!(
            shielder.snapshot().detail,
            EnemyDetail::Shielder { shield, .. } if shield == 0.0
        ));

        let _ = shielder.take_damage(1.0);
        let _ = shielder.update(1.5, target, Bounds::playfield(), &mut rng);
        assert!(
            matches!(shielder.snapshot().detail, EnemyDetail::Shielder { shield, .. } if shield == 0.0),
            "hit resets regen delay"
        );

        let _ = shielder.update(0.5, target, Bounds::playfield(), &mut rng);
        let _ = shielder.update(1.0, target, Bounds::playfield(), &mut rng);
        match shielder.snapshot().detail {
            EnemyDetail::Shielder { shield, broken, .. } => {
                assert!((shield - 12.0).abs() < 1e-4, "shield {shield}");
                assert!(broken);
            }
            other => panic!("unexpected detail {other:?}"),
        }

        for _ in 0..10 {
            let _ = shielder.update(1.0, target, Bounds::playfield(), &mut rng);
        }
        match shielder.snapshot().detail {
            EnemyDetail::Shielder { shield, broken, .. } => {
                assert_eq!(shield, 50.0);
                assert!(!broken);
            }
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[test]
    fn boss_enrages_once_below_half_health() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut boss = Enemy::spawn(EnemyId::new(9), EnemyKind::Boss, Vec2::ZERO, 5);
        let target = Vec2::new(640.0, 360.0);

        let _ = boss.take_damage(225.0);
        assert_eq!(boss.update(0.1, target, Bounds::playfield(), &mut rng), None);

        let _ = boss.take_damage(1.0);
        assert_eq!(
            boss.update(0.1, target, Bounds::playfield(), &mut rng),
            Some(EnemyAction::Enraged)
        );
        assert_eq!(boss.update(0.1, target, Bounds::playfield(), &mut rng), None);
        assert!((boss.body.velocity.length() - BOSS_ENRAGED_SPEED).abs() < 1e-3);
        assert!(matches!(
            boss.snapshot().detail,
            EnemyDetail::Boss { phase: 2, fire_interval } if fire_interval == BOSS_ENRAGED_FIRE_INTERVAL
        ));
    }

    #[test]
    fn large_splitter_splits_into_half_sized_children() {
        let splitter = enemy(EnemyKind::Splitter);
        let mut next = 10;
        let children = splitter
            .split(|| {
                next += 1;
                EnemyId::new(next)
            })
            .expect("large splitter splits");

        let center = splitter.body.center();
        for (child, offset) in children.iter().zip([-20.0, 20.0]) {
            assert_eq!(child.body.size, splitter.body.size * 0.5);
            assert!((child.max_health - 12.5).abs() < f32::EPSILON);
            assert_eq!(child.body.center(), center + Vec2::new(offset, 0.0));
            assert!(child.split(|| EnemyId::new(0)).is_none());
            assert!(matches!(
                child.snapshot().detail,
                EnemyDetail::Splitter { is_small: true }
            ));
        }
        assert_eq!(children[0].id, EnemyId::new(11));
        assert_eq!(children[1].id, EnemyId::new(12));
        assert!(enemy(EnemyKind::Drone).split(|| EnemyId::new(0)).is_none());
    }

    #[test]
    fn turret_never_moves() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut turret = enemy(EnemyKind::Turret);
        let _ = turret.update(1.0, Vec2::new(600.0, 300.0), Bounds::playfield(), &mut rng);
        assert_eq!(turret.body.center(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn chasers_stand_still_on_top_of_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut drone = enemy(EnemyKind::Drone);
        let center = drone.body.center();
        let _ = drone.update(0.5, center, Bounds::playfield(), &mut rng);
        assert_eq!(drone.body.center(), center);
    }

    #[test]
    fn teleporter_relocates_near_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut teleporter = enemy(EnemyKind::Teleporter);
        let target = Vec2::new(640.0, 360.0);

        let _ = teleporter.update(TELEPORT_COOLDOWN, target, Bounds::playfield(), &mut rng);
        assert!(teleporter.is_phased());

        let action = teleporter.update(0.15, target, Bounds::playfield(), &mut rng);
        let Some(EnemyAction::Teleported { to, .. }) = action else {
            panic!("expected teleport, got {action:?}");
        };
        assert_eq!(teleporter.body.position, to);
        let distance = teleporter.body.center().distance(target);
        assert!(
            (TELEPORT_MIN_DISTANCE - 1e-3..=TELEPORT_MIN_DISTANCE + TELEPORT_EXTRA_DISTANCE + 1e-3)
                .contains(&distance),
            "distance {distance}"
        );
        assert!(teleporter.is_phased(), "fading back in");

        let _ = teleporter.update(0.15, target, Bounds::playfield(), &mut rng);
        assert!(!teleporter.is_phased());
    }

    #[test]
    fn spawner_produces_capped_minions() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut spawner = Enemy::spawn(
            EnemyId::new(1),
            EnemyKind::Spawner,
            Vec2::new(600.0, 300.0),
            1,
        );
        let target = spawner.body.center();
        let mut live = BTreeSet::new();
        let mut produced = 0;

        for step in 0..400 {
            spawner.prune_minions(&live);
            let origin = spawner.body.center();
            if let Some(EnemyAction::SpawnMinion { position }) =
                spawner.update(0.1, target, Bounds::playfield(), &mut rng)
            {
                assert!((position.distance(origin) - MINION_DISTANCE).abs() < 1e-3);
                produced += 1;
                let minion = EnemyId::new(100 + step);
                let _ = live.insert(minion);
                spawner.register_minion(minion);
            }
        }
        assert_eq!(produced, SPAWNER_MAX_MINIONS);

        live.clear();
        spawner.prune_minions(&live);
        assert!(matches!(
            spawner.snapshot().detail,
            EnemyDetail::Spawner { minions: 0, .. }
        ));
    }
}
