use std::time::Duration;

use glam::Vec2;
use neon_onslaught_core::{
    Command, EnemyKind, Event, HighScore, RunOutcome, RunStats, SessionState, WeaponKind,
    HIGH_SCORE_KEY, SAVE_GAME_KEY,
};
use neon_onslaught_system_persistence::{Config, MemoryStore, Persistence, Store, StoreError};
use neon_onslaught_world::{self as world, query, World};

const FRAME: Duration = Duration::from_micros(16_667);

/// Backend that refuses every operation.
struct BrokenStore;

impl Store for BrokenStore {
    fn save(&mut self, _key: &str, _blob: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only".to_owned()))
    }

    fn load(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("offline".to_owned()))
    }

    fn delete(&mut self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only".to_owned()))
    }
}

fn submit(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn clear_first_wave(world: &mut World) -> Vec<Event> {
    let mut transcript = submit(world, Command::NewGame);
    transcript.extend(submit(
        world,
        Command::SpawnEnemy {
            kind: EnemyKind::Turret,
            position: Vec2::new(1017.5, 360.0),
        },
    ));
    let _ = submit(
        world,
        Command::SelectWeapon {
            weapon: WeaponKind::Sniper,
        },
    );
    let _ = submit(
        world,
        Command::AimAt {
            target: Vec2::new(1017.5, 360.0),
        },
    );
    let _ = submit(world, Command::SetTrigger { held: true });
    for _ in 0..240 {
        transcript.extend(submit(world, Command::Tick { dt: FRAME }));
        if query::state(world) == SessionState::Shop {
            return transcript;
        }
    }
    panic!("wave one was never cleared");
}

fn run_ended(wave: u32, kills: u32, coins: u32) -> Event {
    Event::RunEnded {
        outcome: RunOutcome::Defeat,
        stats: RunStats {
            coins,
            wave,
            kills,
            ..RunStats::default()
        },
    }
}

#[test]
fn cleared_wave_checkpoint_survives_the_store() {
    let mut world = World::new();
    let events = clear_first_wave(&mut world);
    let checkpoint = query::checkpoint(&world, 1_700_000_000_000);
    assert!(checkpoint.is_some());

    let mut persistence = Persistence::new(Config::new());
    let mut store = MemoryStore::new();
    persistence.handle(&events, checkpoint.as_ref(), &mut store);
    assert!(persistence.has_save(&store));

    let blob = store
        .load(SAVE_GAME_KEY)
        .expect("memory store never fails")
        .expect("checkpoint written");
    assert!(blob.contains("\"currentWave\":2"));

    let record = persistence.take_save(&mut store).expect("checkpoint readable");
    assert_eq!(Some(record), checkpoint);
    assert!(!persistence.has_save(&store));
    assert_eq!(record.stats.kills, 1);

    let mut resumed = World::new();
    let _ = submit(&mut resumed, Command::ResumeFromSave { record });
    assert_eq!(query::state(&resumed), SessionState::Playing);
    assert_eq!(query::stats(&resumed).wave, 2);
    assert_eq!(query::stats(&resumed).kills, 1);
}

#[test]
fn clearing_without_checkpoint_writes_nothing() {
    let mut persistence = Persistence::new(Config::new());
    let mut store = MemoryStore::new();
    persistence.handle(&[Event::WaveCleared { wave: 20 }], None, &mut store);
    assert!(store.is_empty());
}

#[test]
fn finished_runs_keep_only_better_scores() {
    let mut persistence = Persistence::new(Config::new());
    let mut store = MemoryStore::new();
    store.save(SAVE_GAME_KEY, "{}").expect("save");

    persistence.handle(&[run_ended(7, 30, 12)], None, &mut store);
    assert!(!persistence.has_save(&store));
    let best = HighScore {
        wave: 7,
        kills: 30,
        coins: 12,
    };
    assert_eq!(persistence.high_score(&store), best);

    persistence.handle(&[run_ended(6, 99, 99)], None, &mut store);
    persistence.handle(&[run_ended(7, 30, 500)], None, &mut store);
    assert_eq!(persistence.high_score(&store), best);

    persistence.handle(&[run_ended(7, 31, 0)], None, &mut store);
    assert_eq!(persistence.high_score(&store).kills, 31);
    assert!(store
        .load(HIGH_SCORE_KEY)
        .expect("load")
        .is_some_and(|blob| blob.contains("\"wave\":7")));
}

#[test]
fn store_failures_never_interrupt_play() {
    let mut persistence = Persistence::new(Config::new());
    let mut store = BrokenStore;
    let mut world = World::new();
    let events = clear_first_wave(&mut world);
    let checkpoint = query::checkpoint(&world, 5);

    persistence.handle(&events, checkpoint.as_ref(), &mut store);
    persistence.handle(&[run_ended(3, 3, 3)], None, &mut store);

    assert!(!persistence.has_save(&store));
    assert_eq!(persistence.take_save(&mut store), None);
    assert_eq!(persistence.high_score(&store), HighScore::default());
}
