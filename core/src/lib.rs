#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Neon Onslaught engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams and respond
//! exclusively with new command batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Width of the playfield measured in world units.
pub const PLAYFIELD_WIDTH: f32 = 1280.0;

/// Height of the playfield measured in world units.
pub const PLAYFIELD_HEIGHT: f32 = 720.0;

/// Wave whose clearance ends the run in victory.
pub const FINAL_WAVE: u32 = 20;

/// Every wave divisible by this interval is a boss wave.
pub const BOSS_WAVE_INTERVAL: u32 = 5;

/// Store key holding the serialized [`SaveRecord`].
pub const SAVE_GAME_KEY: &str = "neonOnslaughtSaveGame";

/// Store key holding the serialized [`HighScore`].
pub const HIGH_SCORE_KEY: &str = "neonOnslaughtHighScore";

/// Reports whether the provided wave spawns a boss.
#[must_use]
pub const fn is_boss_wave(wave: u32) -> bool {
    wave > 0 && wave % BOSS_WAVE_INTERVAL == 0
}

/// Top-level mode of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// Title screen awaiting a new game or a continue request.
    #[default]
    Title,
    /// Active combat within a wave.
    Playing,
    /// Combat frozen; all live entities are preserved.
    Paused,
    /// Interlude between waves where upgrades may be purchased.
    Shop,
    /// The player was destroyed.
    GameOver,
    /// The final wave was cleared.
    Victory,
}

impl SessionState {
    /// Human readable name of the state.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Shop => "shop",
            Self::GameOver => "game over",
            Self::Victory => "victory",
        }
    }
}

/// Terminal result of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    /// The player ran out of health.
    Defeat,
    /// The final wave was cleared.
    Victory,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts a fresh run at wave one with reset statistics.
    NewGame,
    /// Starts a run from a previously persisted checkpoint.
    ResumeFromSave {
        /// Checkpoint to restore.
        record: SaveRecord,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Sets the raw movement axis requested by the player.
    SteerPlayer {
        /// Unnormalized movement direction; each component in `-1.0..=1.0`.
        direction: Vec2,
    },
    /// Points the player's weapon at a world position.
    AimAt {
        /// World position under the cursor.
        target: Vec2,
    },
    /// Holds or releases the trigger of the active weapon.
    SetTrigger {
        /// Whether the trigger is held.
        held: bool,
    },
    /// Requests a dash in the current movement or aim direction.
    Dash,
    /// Switches the active weapon.
    SelectWeapon {
        /// Weapon to activate.
        weapon: WeaponKind,
    },
    /// Requests that an enemy enter the playfield.
    SpawnEnemy {
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Centre of the enemy's body.
        position: Vec2,
    },
    /// Requests that a pickup be dropped into the playfield.
    DropPickup {
        /// Pickup to drop.
        kind: PickupKind,
        /// Centre point of the drop.
        position: Vec2,
    },
    /// Attempts to buy an upgrade while in the shop.
    PurchaseUpgrade {
        /// Upgrade to buy.
        upgrade: UpgradeKind,
    },
    /// Leaves the shop and starts the next wave.
    ContinueToNextWave,
    /// Pauses or resumes combat.
    SetPaused {
        /// Whether combat should be frozen.
        paused: bool,
    },
    /// Abandons the current run and returns to the title screen.
    ReturnToTitle,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces a transition between session states.
    StateChanged {
        /// State before the transition.
        from: SessionState,
        /// State after the transition.
        to: SessionState,
    },
    /// Announces that a wave began and needs to be populated.
    WaveStarted {
        /// Number of the wave, starting at one.
        wave: u32,
        /// Playfield the wave takes place in.
        bounds: Bounds,
    },
    /// Confirms that an enemy joined the playfield.
    EnemySpawned {
        /// Identifier assigned by the world.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Centre of the enemy's body.
        position: Vec2,
    },
    /// Reports that a bullet damaged an enemy.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Centre of the enemy at the time of the hit.
        position: Vec2,
        /// Damage carried by the bullet, before shields.
        amount: f32,
    },
    /// Reports that an enemy was destroyed by the player's fire.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Centre of the enemy at the time of death.
        position: Vec2,
        /// Base coin value of the enemy.
        coin_value: u32,
        /// Wave in which the kill happened.
        wave: u32,
        /// Combo multiplier after the kill was registered.
        combo_multiplier: f32,
    },
    /// Reports that an enemy destroyed itself by ramming the player.
    EnemyRammed {
        /// Enemy that collided with the player.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Centre of the enemy at the time of impact.
        position: Vec2,
    },
    /// Reports that a boss entered its enraged second phase.
    BossEnraged {
        /// Boss that changed phase.
        enemy: EnemyId,
    },
    /// Reports that a teleporter relocated.
    EnemyTeleported {
        /// Teleporter that moved.
        enemy: EnemyId,
        /// Top-left corner before the jump.
        from: Vec2,
        /// Top-left corner after the jump.
        to: Vec2,
    },
    /// Reports that a spawner produced a minion.
    MinionSpawned {
        /// Spawner that produced the minion.
        spawner: EnemyId,
        /// Identifier of the new minion.
        minion: EnemyId,
    },
    /// Reports that the active weapon fired.
    WeaponFired {
        /// Weapon that fired.
        weapon: WeaponKind,
        /// Number of projectiles created.
        projectiles: u32,
    },
    /// Confirms a weapon switch.
    WeaponSwitched {
        /// Weapon that became active.
        weapon: WeaponKind,
    },
    /// Reports that the player started a dash.
    PlayerDashed {
        /// Unit direction of the dash.
        direction: Vec2,
    },
    /// Reports that the player took a hit.
    PlayerDamaged {
        /// Incoming damage before the shield.
        amount: f32,
        /// Portion of the damage absorbed by the shield.
        absorbed: f32,
        /// Player health after the hit.
        health: f32,
    },
    /// Confirms that a pickup entered the playfield.
    PickupDropped {
        /// Pickup that was dropped.
        kind: PickupKind,
        /// Centre point of the drop.
        position: Vec2,
    },
    /// Reports that the player collected a pickup.
    PickupCollected {
        /// Pickup that was collected.
        kind: PickupKind,
        /// Centre point of the pickup when collected.
        position: Vec2,
    },
    /// Reports that every enemy of the wave was destroyed.
    WaveCleared {
        /// Wave that was cleared.
        wave: u32,
    },
    /// Confirms a successful shop purchase.
    UpgradePurchased {
        /// Upgrade that was bought.
        upgrade: UpgradeKind,
        /// Coins left after the purchase.
        coins_remaining: u32,
    },
    /// Reports that a shop purchase was refused.
    UpgradeRejected {
        /// Upgrade that was requested.
        upgrade: UpgradeKind,
        /// Coins available at the time of the request.
        coins: u32,
    },
    /// Reports that the run ended.
    RunEnded {
        /// How the run ended.
        outcome: RunOutcome,
        /// Statistics at the end of the run.
        stats: RunStats,
    },
}

/// Unique identifier assigned to each enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Colour in byte RGB components, used by presentation side effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Enemy archetypes available to the spawn policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast, fragile chaser.
    Drone,
    /// Slow chaser with heavy armour.
    Tank,
    /// Stationary emplacement.
    Turret,
    /// Chaser that splits into two smaller copies on death.
    Splitter,
    /// Fast chaser with heavy contact damage.
    Elite,
    /// Wave-scaled boss that enrages at half health.
    Boss,
    /// Chaser that periodically blinks next to the player.
    Teleporter,
    /// Chaser protected by a regenerating shield.
    Shielder,
    /// Slow carrier that produces drone minions.
    Spawner,
}

impl EnemyKind {
    /// Every archetype in declaration order.
    pub const ALL: [EnemyKind; 9] = [
        EnemyKind::Drone,
        EnemyKind::Tank,
        EnemyKind::Turret,
        EnemyKind::Splitter,
        EnemyKind::Elite,
        EnemyKind::Boss,
        EnemyKind::Teleporter,
        EnemyKind::Shielder,
        EnemyKind::Spawner,
    ];

    /// Reports whether the archetype never moves.
    #[must_use]
    pub const fn is_stationary(&self) -> bool {
        matches!(self, Self::Turret)
    }

    /// Signature colour used for explosions and outlines.
    #[must_use]
    pub const fn color(&self) -> Rgb {
        match self {
            Self::Drone => Rgb::from_rgb(0xff, 0x00, 0xff),
            Self::Tank => Rgb::from_rgb(0xff, 0x66, 0x00),
            Self::Turret => Rgb::from_rgb(0xff, 0x00, 0xaa),
            Self::Splitter => Rgb::from_rgb(0x00, 0xff, 0x00),
            Self::Elite => Rgb::from_rgb(0xff, 0xaa, 0x00),
            Self::Boss => Rgb::from_rgb(0xff, 0x00, 0x00),
            Self::Teleporter => Rgb::from_rgb(0xaa, 0x00, 0xff),
            Self::Shielder => Rgb::from_rgb(0x00, 0xaa, 0xff),
            Self::Spawner => Rgb::from_rgb(0xff, 0x88, 0x00),
        }
    }

    /// Lowercase display name of the archetype.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Drone => "drone",
            Self::Tank => "tank",
            Self::Turret => "turret",
            Self::Splitter => "splitter",
            Self::Elite => "elite",
            Self::Boss => "boss",
            Self::Teleporter => "teleporter",
            Self::Shielder => "shielder",
            Self::Spawner => "spawner",
        }
    }
}

/// Weapons carried by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Rapid single shots.
    AssaultRifle,
    /// Slow spread of pellets.
    Shotgun,
    /// Slow, heavy, piercing shots.
    Sniper,
}

impl WeaponKind {
    /// Every weapon in slot order.
    pub const ALL: [WeaponKind; 3] = [
        WeaponKind::AssaultRifle,
        WeaponKind::Shotgun,
        WeaponKind::Sniper,
    ];

    /// Zero-based inventory slot of the weapon.
    #[must_use]
    pub const fn slot(&self) -> usize {
        match self {
            Self::AssaultRifle => 0,
            Self::Shotgun => 1,
            Self::Sniper => 2,
        }
    }

    /// Display name of the weapon.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AssaultRifle => "Assault Rifle",
            Self::Shotgun => "Shotgun",
            Self::Sniper => "Sniper",
        }
    }
}

/// Timed or instant effects granted by power-up pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Multiplies movement speed for a while.
    Speed,
    /// Multiplies bullet damage for a while.
    Damage,
    /// Adds shield points immediately.
    Shield,
    /// Pulls nearby coins toward the player for a while.
    Magnet,
}

impl PowerUpKind {
    /// Every power-up in declaration order.
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Speed,
        PowerUpKind::Damage,
        PowerUpKind::Shield,
        PowerUpKind::Magnet,
    ];
}

/// Items that can be dropped by enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupKind {
    /// Currency worth the provided amount.
    Coin {
        /// Coins granted on collection.
        value: u32,
    },
    /// Restores part of the player's health.
    HealthPack,
    /// Grants a power-up.
    PowerUp {
        /// Effect granted on collection.
        kind: PowerUpKind,
    },
}

/// Permanent upgrades sold in the shop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    /// Raises maximum health and heals fully.
    Health,
    /// Raises bullet damage.
    Damage,
}

impl UpgradeKind {
    /// Coin price of the upgrade.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        match self {
            Self::Health => 20,
            Self::Damage => 15,
        }
    }
}

/// Rectangular playfield anchored at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    width: f32,
    height: f32,
}

impl Bounds {
    /// Creates bounds with the provided extents.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Bounds of the standard 1280 × 720 playfield.
    #[must_use]
    pub const fn playfield() -> Self {
        Self::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT)
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Centre point of the playfield.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::playfield()
    }
}

/// Ordered list of weighted outcomes sampled with an externally supplied roll.
///
/// Weights do not need to sum to one; a roll in `[0, 1)` is scaled by the
/// total weight and the first entry whose cumulative weight exceeds it wins.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedTable<T> {
    entries: Vec<(f64, T)>,
    total: f64,
}

impl<T: Copy> WeightedTable<T> {
    /// Creates a table from `(weight, outcome)` pairs. Non-positive weights are dropped.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (f64, T)>) -> Self {
        let entries: Vec<(f64, T)> = entries
            .into_iter()
            .filter(|(weight, _)| *weight > 0.0)
            .collect();
        let total = entries.iter().map(|(weight, _)| weight).sum();
        Self { entries, total }
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.total
    }

    /// Iterates the `(weight, outcome)` pairs in order.
    pub fn entries(&self) -> impl Iterator<Item = &(f64, T)> + '_ {
        self.entries.iter()
    }

    /// Selects the outcome addressed by `roll`, a value in `[0, 1)`.
    ///
    /// Rolls outside the range are clamped. Returns `None` for an empty table.
    #[must_use]
    pub fn pick(&self, roll: f64) -> Option<T> {
        let last = self.entries.last()?;
        let target = roll.clamp(0.0, 1.0) * self.total;
        let mut cumulative = 0.0;
        for (weight, outcome) in &self.entries {
            cumulative += weight;
            if target < cumulative {
                return Some(*outcome);
            }
        }
        Some(last.1)
    }
}

/// Statistics accumulated over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// Coins available to spend.
    pub coins: u32,
    /// Current wave number.
    pub wave: u32,
    /// Enemies destroyed by the player's fire.
    pub kills: u32,
    /// Health upgrades purchased.
    pub health_upgrades: u32,
    /// Damage upgrades purchased.
    pub damage_upgrades: u32,
}

/// Player portion of a [`SaveRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlayer {
    /// Horizontal position of the player's top-left corner.
    pub x: f32,
    /// Vertical position of the player's top-left corner.
    pub y: f32,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
}

/// Statistics portion of a [`SaveRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedStats {
    /// Coins available to spend.
    pub coins: u32,
    /// Enemies destroyed so far.
    pub kills: u32,
    /// Health upgrades purchased.
    pub health_upgrades: u32,
    /// Damage upgrades purchased.
    pub damage_upgrades: u32,
}

/// Checkpoint written after each non-final wave clear.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    /// Player state carried into the next wave.
    pub player: SavedPlayer,
    /// Wave the resumed run starts at.
    pub current_wave: u32,
    /// Run statistics.
    pub stats: SavedStats,
    /// Milliseconds since the Unix epoch when the record was written.
    pub timestamp: u64,
}

impl SaveRecord {
    /// Rebuilds the run statistics encoded in the record.
    #[must_use]
    pub const fn run_stats(&self) -> RunStats {
        RunStats {
            coins: self.stats.coins,
            wave: self.current_wave,
            kills: self.stats.kills,
            health_upgrades: self.stats.health_upgrades,
            damage_upgrades: self.stats.damage_upgrades,
        }
    }
}

/// Best run recorded on this machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    /// Highest wave reached.
    pub wave: u32,
    /// Kills during that run.
    pub kills: u32,
    /// Coins held at the end of that run.
    pub coins: u32,
}

impl HighScore {
    /// Captures the score of a finished run.
    #[must_use]
    pub const fn from_stats(stats: &RunStats) -> Self {
        Self {
            wave: stats.wave,
            kills: stats.kills,
            coins: stats.coins,
        }
    }

    /// Reports whether `candidate` beats this score.
    ///
    /// A higher wave always wins; on an equal wave more kills win.
    #[must_use]
    pub const fn is_improved_by(&self, candidate: &HighScore) -> bool {
        candidate.wave > self.wave || (candidate.wave == self.wave && candidate.kills > self.kills)
    }
}

/// Read-only snapshot of the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Top-left corner of the player's body.
    pub position: Vec2,
    /// Extents of the player's body.
    pub size: Vec2,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Remaining shield points.
    pub shield: f32,
    /// Aim angle in radians.
    pub aim_angle: f32,
    /// Active weapon.
    pub weapon: WeaponKind,
    /// Whether the active weapon can fire this tick.
    pub weapon_ready: bool,
    /// Whether a dash is in progress.
    pub dashing: bool,
    /// Whether incoming damage is currently ignored.
    pub invulnerable: bool,
    /// Seconds left on the speed boost.
    pub speed_boost: f32,
    /// Seconds left on the damage boost.
    pub damage_boost: f32,
    /// Seconds left on the coin magnet.
    pub magnet_boost: f32,
}

impl PlayerSnapshot {
    /// Centre of the player's body.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }
}

/// Archetype-specific details exposed to presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyDetail {
    /// No special state.
    Plain,
    /// Splitter generation.
    Splitter {
        /// Whether the splitter is a child that will not split again.
        is_small: bool,
    },
    /// Boss phase and fire cadence.
    Boss {
        /// One before enraging, two after.
        phase: u8,
        /// Seconds between shots.
        fire_interval: f32,
    },
    /// Teleport animation state.
    Teleporter {
        /// Opacity between 0 (invisible) and 1 (solid).
        opacity: f32,
    },
    /// Shield state.
    Shielder {
        /// Remaining shield points.
        shield: f32,
        /// Maximum shield points.
        max_shield: f32,
        /// Whether the shield collapsed and has not fully regenerated.
        broken: bool,
    },
    /// Minion production state.
    Spawner {
        /// Live minions attributed to the spawner.
        minions: usize,
        /// Whether the spawning animation is playing.
        spawning: bool,
    },
}

/// Read-only snapshot describing an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Top-left corner of the enemy's body.
    pub position: Vec2,
    /// Extents of the enemy's body.
    pub size: Vec2,
    /// Current health, never negative.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Archetype-specific state.
    pub detail: EnemyDetail,
}

impl EnemySnapshot {
    /// Centre of the enemy's body.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }
}

/// Read-only view over every live enemy, ordered by identifier.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Builds a view from unsorted snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterates the snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> + '_ {
        self.snapshots.iter()
    }

    /// Number of live enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no enemies are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the ordered snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot of a bullet in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSnapshot {
    /// Top-left corner of the bullet.
    pub position: Vec2,
    /// Extents of the bullet.
    pub size: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Damage dealt on hit.
    pub damage: f32,
    /// Whether the bullet passes through enemies.
    pub piercing: bool,
}

/// Read-only snapshot of a pickup waiting to be collected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Kind of pickup.
    pub kind: PickupKind,
    /// Top-left corner of the pickup.
    pub position: Vec2,
    /// Extents of the pickup.
    pub size: Vec2,
    /// Seconds until the pickup despawns.
    pub remaining: f32,
}

/// Read-only snapshot of the combo tracker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComboSnapshot {
    /// Kills chained inside the expiry window.
    pub count: u32,
    /// Current coin multiplier.
    pub multiplier: f32,
    /// Seconds before the chain lapses.
    pub remaining: f32,
    /// Longest chain in the run.
    pub highest: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemy_id_round_trips_through_bincode() {
        let id = EnemyId::new(42);
        let bytes = bincode::serialize(&id).expect("serialize");
        let restored: EnemyId = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, id);
        assert_eq!(restored.get(), 42);
    }

    #[test]
    fn boss_waves_are_multiples_of_five() {
        let bosses: Vec<u32> = (1..=FINAL_WAVE).filter(|wave| is_boss_wave(*wave)).collect();
        assert_eq!(bosses, vec![5, 10, 15, 20]);
        assert!(!is_boss_wave(0));
    }

    #[test]
    fn weighted_table_walks_cumulative_bands() {
        let table = WeightedTable::new([(0.15, 'a'), (0.20, 'b'), (0.50, 'c'), (0.15, 'd')]);
        assert_eq!(table.pick(0.0), Some('a'));
        assert_eq!(table.pick(0.149), Some('a'));
        assert_eq!(table.pick(0.15), Some('b'));
        assert_eq!(table.pick(0.349), Some('b'));
        assert_eq!(table.pick(0.35), Some('c'));
        assert_eq!(table.pick(0.849), Some('c'));
        assert_eq!(table.pick(0.85), Some('d'));
        assert_eq!(table.pick(0.999_999), Some('d'));
    }

    #[test]
    fn weighted_table_normalises_weights() {
        let table = WeightedTable::new([(1.0, 1_u8), (3.0, 2_u8), (0.0, 3_u8)]);
        assert!((table.total_weight() - 4.0).abs() < f64::EPSILON);
        assert_eq!(table.entries().count(), 2);
        assert_eq!(table.pick(0.2), Some(1));
        assert_eq!(table.pick(0.3), Some(2));
        assert_eq!(table.pick(1.5), Some(2));
    }

    #[test]
    fn empty_weighted_table_yields_nothing() {
        let table: WeightedTable<u8> = WeightedTable::new(Vec::new());
        assert_eq!(table.pick(0.5), None);
    }

    #[test]
    fn high_score_prefers_wave_then_kills() {
        let best = HighScore {
            wave: 7,
            kills: 40,
            coins: 10,
        };
        assert!(best.is_improved_by(&HighScore {
            wave: 8,
            kills: 0,
            coins: 0,
        }));
        assert!(best.is_improved_by(&HighScore {
            wave: 7,
            kills: 41,
            coins: 0,
        }));
        assert!(!best.is_improved_by(&HighScore {
            wave: 7,
            kills: 40,
            coins: 999,
        }));
        assert!(!best.is_improved_by(&HighScore {
            wave: 6,
            kills: 500,
            coins: 0,
        }));
    }

    #[test]
    fn save_record_uses_stable_field_names() {
        let record = SaveRecord {
            player: SavedPlayer {
                x: 620.0,
                y: 340.0,
                health: 75.0,
                max_health: 120.0,
            },
            current_wave: 4,
            stats: SavedStats {
                coins: 33,
                kills: 21,
                health_upgrades: 1,
                damage_upgrades: 2,
            },
            timestamp: 1_700_000_000_000,
        };

        let value = serde_json::to_value(record).expect("serialize");
        assert_eq!(value["player"]["maxHealth"], 120.0);
        assert_eq!(value["currentWave"], 4);
        assert_eq!(value["stats"]["healthUpgrades"], 1);
        assert_eq!(value["stats"]["damageUpgrades"], 2);
        assert_eq!(value["timestamp"], 1_700_000_000_000_u64);

        let restored: SaveRecord = serde_json::from_value(value).expect("deserialize");
        assert_eq!(restored, record);
        assert_eq!(restored.run_stats().wave, 4);
        assert_eq!(restored.run_stats().coins, 33);
    }

    #[test]
    fn enemy_view_sorts_by_identifier() {
        let snapshot = |id| EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Drone,
            position: Vec2::ZERO,
            size: Vec2::splat(30.0),
            health: 30.0,
            max_health: 30.0,
            detail: EnemyDetail::Plain,
        };
        let view = EnemyView::from_snapshots(vec![snapshot(3), snapshot(1), snapshot(2)]);
        let ids: Vec<u32> = view.iter().map(|enemy| enemy.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(view.len(), 3);
        assert_eq!(view.iter().next().map(EnemySnapshot::center), Some(Vec2::splat(15.0)));
    }
}
