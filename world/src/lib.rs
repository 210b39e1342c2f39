#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Neon Onslaught.
//!
//! The world owns every live entity of a run: the player, enemies, bullets
//! and pickups, together with run statistics, the combo tracker and the
//! progression state machine. Adapters and systems mutate it exclusively
//! through [`apply`] and observe it through the [`query`] module.

mod body;
mod collision;
mod combo;
mod enemy;
mod pickup;
mod player;
mod weapon;

use std::collections::BTreeSet;
use std::time::Duration;

use glam::Vec2;
use log::{debug, info};
use neon_onslaught_core::{
    Bounds, Command, EnemyId, EnemyKind, Event, RunOutcome, RunStats, SaveRecord, SessionState,
    UpgradeKind, FINAL_WAVE,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use combo::ComboTracker;
use enemy::{Enemy, EnemyAction};
use pickup::Pickup;
use player::{Player, BASE_MAX_HEALTH};
use weapon::Bullet;

/// Parameters fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    bounds: Bounds,
    seed: u64,
}

impl WorldConfig {
    /// Creates a configuration for the provided playfield and random seed.
    #[must_use]
    pub const fn new(bounds: Bounds, seed: u64) -> Self {
        Self { bounds, seed }
    }

    /// Playfield the world simulates.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Seed of the world's random stream (weapon spread, teleports, minions, coin scatter).
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(Bounds::playfield(), 0)
    }
}

/// Represents the authoritative Neon Onslaught world state.
#[derive(Debug)]
pub struct World {
    bounds: Bounds,
    state: SessionState,
    stats: RunStats,
    player: Player,
    enemies: Vec<Enemy>,
    pending_enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    pickups: Vec<Pickup>,
    combo: ComboTracker,
    next_enemy_id: u32,
    wave_populated: bool,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl World {
    /// Creates a world on the standard playfield with a zero seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world sitting on the title screen.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            bounds: config.bounds,
            state: SessionState::Title,
            stats: RunStats::default(),
            player: Player::spawn(config.bounds, BASE_MAX_HEALTH),
            enemies: Vec::new(),
            pending_enemies: Vec::new(),
            bullets: Vec::new(),
            pickups: Vec::new(),
            combo: ComboTracker::default(),
            next_enemy_id: 0,
            wave_populated: false,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tick_index: 0,
        }
    }

    fn transition(&mut self, to: SessionState, out_events: &mut Vec<Event>) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        out_events.push(Event::StateChanged { from, to });
    }

    fn clear_entities(&mut self) {
        self.enemies.clear();
        self.pending_enemies.clear();
        self.bullets.clear();
        self.pickups.clear();
        self.wave_populated = false;
    }

    fn start_run(&mut self, record: Option<SaveRecord>, out_events: &mut Vec<Event>) {
        let (stats, player) = match record {
            Some(record) => (
                record.run_stats(),
                Player::restore(self.bounds, &record.player),
            ),
            None => (
                RunStats {
                    wave: 1,
                    ..RunStats::default()
                },
                Player::spawn(self.bounds, BASE_MAX_HEALTH),
            ),
        };
        self.stats = stats;
        self.player = player;
        self.combo = ComboTracker::default();
        self.begin_wave(stats.wave.clamp(1, FINAL_WAVE), out_events);
    }

    fn begin_wave(&mut self, wave: u32, out_events: &mut Vec<Event>) {
        self.stats.wave = wave;
        self.clear_entities();
        self.transition(SessionState::Playing, out_events);
        info!("wave {wave} started");
        out_events.push(Event::WaveStarted {
            wave,
            bounds: self.bounds,
        });
    }

    fn end_run(&mut self, outcome: RunOutcome, out_events: &mut Vec<Event>) {
        let stats = self.stats;
        info!(
            "run ended ({outcome:?}) at wave {} with {} kills and {} coins",
            stats.wave, stats.kills, stats.coins
        );
        self.player.set_trigger(false);
        self.bullets.clear();
        out_events.push(Event::RunEnded { outcome, stats });
        let state = match outcome {
            RunOutcome::Defeat => SessionState::GameOver,
            RunOutcome::Victory => SessionState::Victory,
        };
        self.transition(state, out_events);
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, position: Vec2, out_events: &mut Vec<Event>) {
        let id = allocate_enemy_id(&mut self.next_enemy_id);
        self.enemies
            .push(Enemy::spawn(id, kind, position, self.stats.wave));
        self.wave_populated = true;
        debug!("spawned {} {} at {position}", kind.name(), id.get());
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            position,
        });
    }

    fn purchase(&mut self, upgrade: UpgradeKind, out_events: &mut Vec<Event>) {
        let cost = upgrade.cost();
        if self.stats.coins < cost {
            debug!(
                "rejected {upgrade:?} upgrade: {} coins, {cost} needed",
                self.stats.coins
            );
            out_events.push(Event::UpgradeRejected {
                upgrade,
                coins: self.stats.coins,
            });
            return;
        }

        self.stats.coins -= cost;
        match upgrade {
            UpgradeKind::Health => {
                self.stats.health_upgrades += 1;
                self.player.apply_health_upgrade();
            }
            UpgradeKind::Damage => self.stats.damage_upgrades += 1,
        }
        debug!("purchased {upgrade:?} upgrade for {cost} coins");
        out_events.push(Event::UpgradePurchased {
            upgrade,
            coins_remaining: self.stats.coins,
        });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        self.player.update(seconds, self.bounds);
        if let Some((weapon, bullets)) = self.player.fire(self.stats.damage_upgrades, &mut self.rng)
        {
            out_events.push(Event::WeaponFired {
                weapon,
                projectiles: bullets.len() as u32,
            });
            self.bullets.extend(bullets);
        }
        for bullet in &mut self.bullets {
            bullet.update(seconds, self.bounds);
        }
        self.update_enemies(seconds, out_events);
        let magnet = self.player.magnet();
        for pickup in &mut self.pickups {
            pickup.update(seconds, magnet);
        }
        self.combo.update(seconds);

        collision::resolve(self, out_events);
        self.compact();
        self.evaluate_progression(out_events);
    }

    fn update_enemies(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let live: BTreeSet<EnemyId> = self
            .enemies
            .iter()
            .filter(|enemy| !enemy.dead)
            .map(|enemy| enemy.id)
            .collect();
        let target = self.player.body.center();
        let wave = self.stats.wave;

        for enemy in &mut self.enemies {
            enemy.prune_minions(&live);
            let Some(action) = enemy.update(dt, target, self.bounds, &mut self.rng) else {
                continue;
            };
            match action {
                EnemyAction::Enraged => {
                    info!("boss {} enraged", enemy.id.get());
                    out_events.push(Event::BossEnraged { enemy: enemy.id });
                }
                EnemyAction::Teleported { from, to } => {
                    out_events.push(Event::EnemyTeleported {
                        enemy: enemy.id,
                        from,
                        to,
                    });
                }
                EnemyAction::SpawnMinion { position } => {
                    let minion = allocate_enemy_id(&mut self.next_enemy_id);
                    enemy.register_minion(minion);
                    self.pending_enemies
                        .push(Enemy::spawn(minion, EnemyKind::Drone, position, wave));
                    out_events.push(Event::EnemySpawned {
                        enemy: minion,
                        kind: EnemyKind::Drone,
                        position,
                    });
                    out_events.push(Event::MinionSpawned {
                        spawner: enemy.id,
                        minion,
                    });
                }
            }
        }
    }

    /// Removes everything marked during the tick, then admits enemies spawned mid-tick.
    fn compact(&mut self) {
        self.bullets.retain(|bullet| !bullet.spent);
        self.enemies.retain(|enemy| !enemy.dead);
        self.pickups
            .retain(|pickup| !pickup.collected && !pickup.is_expired());
        self.enemies.append(&mut self.pending_enemies);
    }

    fn evaluate_progression(&mut self, out_events: &mut Vec<Event>) {
        if self.player.is_dead() {
            self.end_run(RunOutcome::Defeat, out_events);
            return;
        }
        if !self.wave_populated || !self.enemies.is_empty() {
            return;
        }

        let wave = self.stats.wave;
        info!("wave {wave} cleared");
        out_events.push(Event::WaveCleared { wave });
        if wave >= FINAL_WAVE {
            self.end_run(RunOutcome::Victory, out_events);
        } else {
            // Loot still on the floor is forfeited when the shop opens.
            self.clear_entities();
            self.player.set_trigger(false);
            self.transition(SessionState::Shop, out_events);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn allocate_enemy_id(next: &mut u32) -> EnemyId {
    let id = EnemyId::new(*next);
    *next = next.wrapping_add(1);
    id
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let playing = world.state == SessionState::Playing;
    let at_title = world.state == SessionState::Title;
    match command {
        Command::NewGame => {
            if at_title {
                world.start_run(None, out_events);
            }
        }
        Command::ResumeFromSave { record } => {
            if at_title {
                world.start_run(Some(record), out_events);
            }
        }
        Command::Tick { dt } => {
            if playing {
                world.tick(dt, out_events);
            }
        }
        Command::SteerPlayer { direction } => world.player.steer(direction),
        Command::AimAt { target } => world.player.aim_at(target),
        Command::SetTrigger { held } => world.player.set_trigger(held && playing),
        Command::Dash => {
            if playing {
                if let Some(direction) = world.player.try_dash() {
                    out_events.push(Event::PlayerDashed { direction });
                }
            }
        }
        Command::SelectWeapon { weapon } => {
            if world.player.select_weapon(weapon) {
                out_events.push(Event::WeaponSwitched { weapon });
            }
        }
        Command::SpawnEnemy { kind, position } => {
            if playing {
                world.spawn_enemy(kind, position, out_events);
            }
        }
        Command::DropPickup { kind, position } => {
            if playing {
                world
                    .pickups
                    .push(Pickup::drop_at(kind, position, &mut world.rng));
                out_events.push(Event::PickupDropped { kind, position });
            }
        }
        Command::PurchaseUpgrade { upgrade } => {
            if world.state == SessionState::Shop {
                world.purchase(upgrade, out_events);
            }
        }
        Command::ContinueToNextWave => {
            if world.state == SessionState::Shop {
                let next = world.stats.wave.saturating_add(1);
                world.begin_wave(next, out_events);
            }
        }
        Command::SetPaused { paused } => match (world.state, paused) {
            (SessionState::Playing, true) => {
                world.player.set_trigger(false);
                world.transition(SessionState::Paused, out_events);
            }
            (SessionState::Paused, false) => world.transition(SessionState::Playing, out_events),
            _ => {}
        },
        Command::ReturnToTitle => {
            if !matches!(
                world.state,
                SessionState::Paused | SessionState::GameOver | SessionState::Victory
            ) {
                return;
            }
            world.clear_entities();
            world.player.set_trigger(false);
            world.transition(SessionState::Title, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use neon_onslaught_core::{
        Bounds, BulletSnapshot, ComboSnapshot, EnemyId, EnemySnapshot, EnemyView, PickupSnapshot,
        PlayerSnapshot, RunStats, SaveRecord, SavedStats, SessionState,
    };

    use super::World;

    /// Current top-level state of the session.
    #[must_use]
    pub fn state(world: &World) -> SessionState {
        world.state
    }

    /// Playfield the world simulates.
    #[must_use]
    pub fn bounds(world: &World) -> Bounds {
        world.bounds
    }

    /// Statistics of the current (or most recent) run.
    #[must_use]
    pub fn stats(world: &World) -> RunStats {
        world.stats
    }

    /// Number of ticks simulated while playing.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures a read-only view of every live enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Snapshot of a single enemy, if it is alive.
    #[must_use]
    pub fn enemy(world: &World, id: EnemyId) -> Option<EnemySnapshot> {
        world
            .enemies
            .iter()
            .find(|enemy| enemy.id == id)
            .map(|enemy| enemy.snapshot())
    }

    /// Snapshots of every bullet in flight.
    #[must_use]
    pub fn bullets(world: &World) -> Vec<BulletSnapshot> {
        world.bullets.iter().map(|bullet| bullet.snapshot()).collect()
    }

    /// Snapshots of every pickup awaiting collection.
    #[must_use]
    pub fn pickups(world: &World) -> Vec<PickupSnapshot> {
        world.pickups.iter().map(|pickup| pickup.snapshot()).collect()
    }

    /// Snapshot of the combo tracker.
    #[must_use]
    pub fn combo(world: &World) -> ComboSnapshot {
        world.combo.snapshot()
    }

    /// Checkpoint for the wave after the one just cleared.
    ///
    /// Only available while the shop is open.
    #[must_use]
    pub fn checkpoint(world: &World, timestamp: u64) -> Option<SaveRecord> {
        if world.state != SessionState::Shop {
            return None;
        }
        let stats = world.stats;
        Some(SaveRecord {
            player: world.player.saved(),
            current_wave: stats.wave.saturating_add(1),
            stats: SavedStats {
                coins: stats.coins,
                kills: stats.kills,
                health_upgrades: stats.health_upgrades,
                damage_upgrades: stats.damage_upgrades,
            },
            timestamp,
        })
    }
}
