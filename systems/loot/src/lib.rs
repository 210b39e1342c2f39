#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides what enemies leave behind.
//!
//! Only kills scored by the player's fire are considered; enemies that ram
//! the player never drop anything. The decision itself lives in
//! [`drop_for_roll`] so it can be exercised without a random source.

use log::trace;
use neon_onslaught_core::{Command, Event, PickupKind, PowerUpKind, WeightedTable};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// First wave on which power-ups can drop.
pub const POWER_UP_MIN_WAVE: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Band {
    PowerUp,
    HealthPack,
    Coin,
    Nothing,
}

fn band_table() -> WeightedTable<Band> {
    WeightedTable::new([
        (0.15, Band::PowerUp),
        (0.20, Band::HealthPack),
        (0.50, Band::Coin),
        (0.15, Band::Nothing),
    ])
}

/// Coins carried by a coin drop once the combo multiplier is applied.
#[must_use]
pub fn coin_value(base: u32, combo_multiplier: f32) -> u32 {
    // float to int casts saturate, negative multipliers collapse to zero
    (base as f32 * combo_multiplier).round() as u32
}

/// Resolves the drop of a single kill.
///
/// `band_roll` picks the outcome band and `power_up_roll` picks which power-up
/// a power-up band yields; both are expected in `[0, 1)`.
#[must_use]
pub fn drop_for_roll(
    band_roll: f64,
    power_up_roll: f64,
    wave: u32,
    base_coins: u32,
    combo_multiplier: f32,
) -> Option<PickupKind> {
    match band_table().pick(band_roll)? {
        Band::PowerUp if wave >= POWER_UP_MIN_WAVE => {
            let power_ups = WeightedTable::new(PowerUpKind::ALL.map(|kind| (1.0, kind)));
            power_ups
                .pick(power_up_roll)
                .map(|kind| PickupKind::PowerUp { kind })
        }
        Band::PowerUp | Band::Nothing => None,
        Band::HealthPack => Some(PickupKind::HealthPack),
        Band::Coin => Some(PickupKind::Coin {
            value: coin_value(base_coins, combo_multiplier),
        }),
    }
}

/// Configuration parameters required to construct the loot system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Loot system that answers kills with pickup drops.
#[derive(Debug)]
pub struct Loot {
    rng: ChaCha8Rng,
}

impl Loot {
    /// Creates a new loot system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Rolls a drop for every `EnemyKilled` event and emits `DropPickup` commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            let Event::EnemyKilled {
                enemy,
                position,
                coin_value,
                wave,
                combo_multiplier,
                ..
            } = event
            else {
                continue;
            };

            let band_roll = self.rng.gen::<f64>();
            let power_up_roll = self.rng.gen::<f64>();
            let Some(kind) =
                drop_for_roll(band_roll, power_up_roll, *wave, *coin_value, *combo_multiplier)
            else {
                continue;
            };
            trace!("enemy {} dropped {kind:?}", enemy.get());
            out.push(Command::DropPickup {
                kind,
                position: *position,
            });
        }
    }
}
