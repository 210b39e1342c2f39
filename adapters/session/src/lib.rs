#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game-session context tying the world to its systems and edges.
//!
//! A [`Session`] owns the authoritative world, the spawning, loot and
//! persistence systems, a [`Store`] and a [`PresentationSink`]. Each frame it
//! maps input to commands for the current state, applies them and keeps
//! feeding the resulting events to the systems until no follow-up commands
//! remain.

mod input;
mod presentation;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, info};
use neon_onslaught_core::{
    Bounds, BulletSnapshot, Command, ComboSnapshot, EnemyView, Event, HighScore, PickupSnapshot,
    PlayerSnapshot, RunStats, SessionState, UpgradeKind,
};
use neon_onslaught_system_loot::{self as loot, Loot};
use neon_onslaught_system_persistence::{self as persistence, Persistence, Store};
use neon_onslaught_system_spawning::{self as spawning, Spawning};
use neon_onslaught_world::{self as world, query, World, WorldConfig};

pub use input::{FrameInput, InputSource, Key, MouseButton};
use input::Controls;
pub use presentation::{
    NullSink, PresentationSink, SoundId, KILL_EXPLOSION_PARTICLES, RAM_EXPLOSION_PARTICLES,
};

/// Salt separating the loot stream from the spawn stream of the same seed.
const LOOT_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Parameters for assembling a [`Session`].
#[derive(Clone, Debug)]
pub struct SessionConfig {
    world: WorldConfig,
    spawning: spawning::Config,
    loot: loot::Config,
    persistence: persistence::Config,
}

impl SessionConfig {
    /// Creates a configuration for the standard playfield, deriving every
    /// random stream from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_bounds(Bounds::playfield(), seed)
    }

    /// Creates a configuration for a custom playfield.
    #[must_use]
    pub fn with_bounds(bounds: Bounds, seed: u64) -> Self {
        Self {
            world: WorldConfig::new(bounds, seed),
            spawning: spawning::Config::new(seed),
            loot: loot::Config::new(seed ^ LOOT_SEED_SALT),
            persistence: persistence::Config::new(),
        }
    }

    /// Replaces the storage keys used for checkpoints and high scores.
    #[must_use]
    pub fn with_persistence(mut self, persistence: persistence::Config) -> Self {
        self.persistence = persistence;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// A running game: world, systems, storage and presentation.
#[derive(Debug)]
pub struct Session<S, P> {
    world: World,
    spawning: Spawning,
    loot: Loot,
    persistence: Persistence,
    store: S,
    sink: P,
    frame_events: Vec<Event>,
}

impl<S: Store, P: PresentationSink> Session<S, P> {
    /// Assembles a session sitting on the title screen.
    #[must_use]
    pub fn new(config: SessionConfig, store: S, sink: P) -> Self {
        Self {
            world: World::with_config(config.world),
            spawning: Spawning::new(config.spawning),
            loot: Loot::new(config.loot),
            persistence: Persistence::new(config.persistence),
            store,
            sink,
            frame_events: Vec::new(),
        }
    }

    /// Advances the session by one frame.
    ///
    /// Input is interpreted according to the state at the start of the frame;
    /// simulated time only passes while playing.
    pub fn tick(&mut self, input: &dyn InputSource, dt: Duration) {
        let controls = Controls::poll(input);
        self.frame_events.clear();
        match query::state(&self.world) {
            SessionState::Title => {
                if controls.confirm {
                    self.new_game();
                } else if controls.continue_save {
                    let _ = self.continue_saved();
                }
            }
            SessionState::Playing => {
                if controls.pause || controls.escape {
                    self.execute([Command::SetPaused { paused: true }]);
                    return;
                }
                let mut commands = Vec::with_capacity(6);
                if let Some(weapon) = controls.weapon {
                    commands.push(Command::SelectWeapon { weapon });
                }
                commands.push(Command::SteerPlayer {
                    direction: controls.movement,
                });
                commands.push(Command::AimAt {
                    target: controls.aim,
                });
                commands.push(Command::SetTrigger {
                    held: controls.fire,
                });
                if controls.action {
                    commands.push(Command::Dash);
                }
                commands.push(Command::Tick { dt });
                self.execute(commands);
            }
            SessionState::Paused => {
                if controls.escape {
                    self.execute([Command::ReturnToTitle]);
                } else if controls.pause {
                    self.execute([Command::SetPaused { paused: false }]);
                }
            }
            SessionState::Shop => {
                if controls.buy_health {
                    let _ = self.purchase(UpgradeKind::Health);
                }
                if controls.buy_damage {
                    let _ = self.purchase(UpgradeKind::Damage);
                }
                if controls.action {
                    self.execute([Command::ContinueToNextWave]);
                }
            }
            SessionState::GameOver | SessionState::Victory => {
                if controls.confirm {
                    self.execute([Command::ReturnToTitle]);
                }
            }
        }
    }

    /// Starts a fresh run at wave one. Ignored away from the title screen.
    pub fn new_game(&mut self) {
        if self.state() != SessionState::Title {
            return;
        }
        info!("starting a new run");
        self.execute([Command::NewGame]);
    }

    /// Resumes the stored checkpoint, consuming it.
    ///
    /// Returns `false` when no readable checkpoint exists or the session is
    /// not at the title screen; the checkpoint is left in place in that case.
    pub fn continue_saved(&mut self) -> bool {
        if self.state() != SessionState::Title {
            return false;
        }
        let Some(record) = self.persistence.take_save(&mut self.store) else {
            debug!("no checkpoint to continue");
            return false;
        };
        info!("continuing from wave {}", record.current_wave);
        self.execute([Command::ResumeFromSave { record }]);
        true
    }

    /// Attempts a shop purchase and reports whether it went through.
    ///
    /// The checkpoint is written when a wave clears, so upgrades bought in
    /// the shop only reach the save once the following wave is cleared.
    pub fn purchase(&mut self, upgrade: UpgradeKind) -> bool {
        let first_new = self.frame_events.len();
        self.execute([Command::PurchaseUpgrade { upgrade }]);
        self.frame_events[first_new..]
            .iter()
            .any(|event| matches!(event, Event::UpgradePurchased { .. }))
    }

    /// Applies `commands` and pumps the resulting events through every
    /// system until no further commands are produced.
    pub fn execute(&mut self, commands: impl IntoIterator<Item = Command>) {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let mut follow_ups = Vec::new();
        while !events.is_empty() {
            let checkpoint = query::checkpoint(&self.world, unix_millis());
            self.persistence
                .handle(&events, checkpoint.as_ref(), &mut self.store);
            presentation::present(&events, &mut self.sink);
            self.spawning.handle(&events, &mut follow_ups);
            self.loot.handle(&events, &mut follow_ups);
            self.frame_events.append(&mut events);

            for command in follow_ups.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }

    /// Events produced during the most recent frame, in order.
    #[must_use]
    pub fn frame_events(&self) -> &[Event] {
        &self.frame_events
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current top-level state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        query::state(&self.world)
    }

    /// Name of the current top-level state.
    #[must_use]
    pub fn state_name(&self) -> &'static str {
        self.state().name()
    }

    /// Statistics of the current run.
    #[must_use]
    pub fn stats(&self) -> RunStats {
        query::stats(&self.world)
    }

    /// Snapshot of the combo tracker.
    #[must_use]
    pub fn combo(&self) -> ComboSnapshot {
        query::combo(&self.world)
    }

    /// Snapshot of the player.
    #[must_use]
    pub fn player(&self) -> PlayerSnapshot {
        query::player(&self.world)
    }

    /// Live enemies ordered by identifier.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Bullets in flight.
    #[must_use]
    pub fn bullets(&self) -> Vec<BulletSnapshot> {
        query::bullets(&self.world)
    }

    /// Pickups awaiting collection.
    #[must_use]
    pub fn pickups(&self) -> Vec<PickupSnapshot> {
        query::pickups(&self.world)
    }

    /// Best recorded run.
    #[must_use]
    pub fn high_score(&self) -> HighScore {
        self.persistence.high_score(&self.store)
    }

    /// Reports whether a checkpoint can be continued.
    #[must_use]
    pub fn has_save(&self) -> bool {
        self.persistence.has_save(&self.store)
    }

    /// Backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Presentation sink.
    #[must_use]
    pub fn sink(&self) -> &P {
        &self.sink
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
