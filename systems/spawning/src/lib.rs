#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for populating waves.
//!
//! [`select_wave_composition`] is the pure spawn policy: given a wave number,
//! the playfield and a random source it decides which archetypes appear and
//! where. [`Spawning`] wraps the policy with a per-wave seed so that every
//! replay of a wave produces the same composition.

use glam::Vec2;
use log::debug;
use neon_onslaught_core::{is_boss_wave, Bounds, Command, EnemyKind, Event, WeightedTable};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

const EDGE_SPAWN_OFFSET: f32 = 50.0;
const STATIONARY_MARGIN: f32 = 100.0;

/// Weighted archetype tables, keyed by the last wave each tier covers.
const TIERS: [(u32, &[(f64, EnemyKind)]); 5] = [
    (
        4,
        &[
            (0.60, EnemyKind::Drone),
            (0.25, EnemyKind::Tank),
            (0.15, EnemyKind::Turret),
        ],
    ),
    (
        7,
        &[
            (0.40, EnemyKind::Drone),
            (0.25, EnemyKind::Tank),
            (0.15, EnemyKind::Turret),
            (0.20, EnemyKind::Splitter),
        ],
    ),
    (
        11,
        &[
            (0.30, EnemyKind::Drone),
            (0.20, EnemyKind::Tank),
            (0.15, EnemyKind::Turret),
            (0.15, EnemyKind::Splitter),
            (0.10, EnemyKind::Elite),
            (0.10, EnemyKind::Teleporter),
        ],
    ),
    (
        15,
        &[
            (0.20, EnemyKind::Drone),
            (0.15, EnemyKind::Tank),
            (0.10, EnemyKind::Turret),
            (0.15, EnemyKind::Splitter),
            (0.15, EnemyKind::Elite),
            (0.15, EnemyKind::Teleporter),
            (0.10, EnemyKind::Shielder),
        ],
    ),
    (
        u32::MAX,
        &[
            (0.15, EnemyKind::Drone),
            (0.10, EnemyKind::Tank),
            (0.10, EnemyKind::Turret),
            (0.10, EnemyKind::Splitter),
            (0.15, EnemyKind::Elite),
            (0.15, EnemyKind::Teleporter),
            (0.15, EnemyKind::Shielder),
            (0.10, EnemyKind::Spawner),
        ],
    ),
];

/// One enemy the policy wants on the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnOrder {
    /// Archetype to spawn.
    pub kind: EnemyKind,
    /// Centre of the enemy's body.
    pub position: Vec2,
}

/// Number of non-boss enemies drawn for `wave`.
#[must_use]
pub fn regular_enemy_count(wave: u32) -> usize {
    let count = if is_boss_wave(wave) {
        3 + wave / 5
    } else {
        5 + wave.saturating_mul(3) / 2
    };
    count as usize
}

/// Archetype table used to draw the regular enemies of `wave`.
#[must_use]
pub fn spawn_table(wave: u32) -> WeightedTable<EnemyKind> {
    let entries = TIERS
        .iter()
        .find(|(last_wave, _)| wave <= *last_wave)
        .map_or(TIERS[TIERS.len() - 1].1, |(_, entries)| *entries);
    WeightedTable::new(entries.iter().copied())
}

/// Decides the enemies of `wave`.
///
/// Boss waves put exactly one boss at the playfield centre ahead of the
/// regular draw. Positions and archetypes are drawn from `rng` only, so the
/// same seed always yields the same composition.
pub fn select_wave_composition<R: Rng + ?Sized>(
    wave: u32,
    bounds: Bounds,
    rng: &mut R,
) -> Vec<SpawnOrder> {
    let table = spawn_table(wave);
    let count = regular_enemy_count(wave);
    let mut orders = Vec::with_capacity(count + 1);

    if is_boss_wave(wave) {
        orders.push(SpawnOrder {
            kind: EnemyKind::Boss,
            position: bounds.center(),
        });
    }

    for _ in 0..count {
        let Some(kind) = table.pick(rng.gen::<f64>()) else {
            break;
        };
        let position = spawn_position(kind, bounds, rng);
        orders.push(SpawnOrder { kind, position });
    }
    orders
}

/// Stationary archetypes appear inside the playfield; everything else
/// enters from just beyond a random edge.
fn spawn_position<R: Rng + ?Sized>(kind: EnemyKind, bounds: Bounds, rng: &mut R) -> Vec2 {
    let width = bounds.width();
    let height = bounds.height();
    if kind.is_stationary() {
        return Vec2::new(
            uniform(rng, STATIONARY_MARGIN, width - STATIONARY_MARGIN),
            uniform(rng, STATIONARY_MARGIN, height - STATIONARY_MARGIN),
        );
    }

    match rng.gen_range(0..4_u8) {
        0 => Vec2::new(uniform(rng, 0.0, width), -EDGE_SPAWN_OFFSET),
        1 => Vec2::new(width + EDGE_SPAWN_OFFSET, uniform(rng, 0.0, height)),
        2 => Vec2::new(uniform(rng, 0.0, width), height + EDGE_SPAWN_OFFSET),
        _ => Vec2::new(-EDGE_SPAWN_OFFSET, uniform(rng, 0.0, height)),
    }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high <= low {
        return low;
    }
    low + rng.gen::<f32>() * (high - low)
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided global seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that answers wave starts with spawn commands.
#[derive(Debug)]
pub struct Spawning {
    rng_seed: u64,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng_seed: config.rng_seed,
        }
    }

    /// Consumes events and emits one spawn command per enemy of each started wave.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            let Event::WaveStarted { wave, bounds } = event else {
                continue;
            };
            let mut rng = ChaCha8Rng::seed_from_u64(derive_wave_seed(self.rng_seed, *wave));
            let orders = select_wave_composition(*wave, *bounds, &mut rng);
            debug!("wave {wave}: spawning {} enemies", orders.len());
            out.extend(orders.into_iter().map(|order| Command::SpawnEnemy {
                kind: order.kind,
                position: order.position,
            }));
        }
    }
}

fn derive_wave_seed(global_seed: u64, wave: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(wave.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
