use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use glam::Vec2;
use neon_onslaught_core::{
    Bounds, Command, EnemyKind, Event, PickupKind, RunOutcome, SaveRecord, SavedPlayer,
    SavedStats, SessionState, UpgradeKind, WeaponKind,
};
use neon_onslaught_world::{self as world, query, World, WorldConfig};

const FRAME: Duration = Duration::from_micros(16_667);

fn submit(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn tick(world: &mut World, dt: Duration) -> Vec<Event> {
    submit(world, Command::Tick { dt })
}

fn snipe_until_state(world: &mut World, target: Vec2, state: SessionState) -> Vec<Event> {
    let _ = submit(
        world,
        Command::SelectWeapon {
            weapon: WeaponKind::Sniper,
        },
    );
    let _ = submit(world, Command::AimAt { target });
    let _ = submit(world, Command::SetTrigger { held: true });
    let mut transcript = Vec::new();
    for _ in 0..240 {
        transcript.extend(tick(world, FRAME));
        if query::state(world) == state {
            return transcript;
        }
    }
    panic!("state {state:?} not reached");
}

fn sample_record(current_wave: u32) -> SaveRecord {
    SaveRecord {
        player: SavedPlayer {
            x: 620.0,
            y: 340.0,
            health: 80.0,
            max_health: 140.0,
        },
        current_wave,
        stats: SavedStats {
            coins: 44,
            kills: 120,
            health_upgrades: 2,
            damage_upgrades: 3,
        },
        timestamp: 1,
    }
}

#[test]
fn new_game_starts_wave_one() {
    let mut world = World::new();
    let events = submit(&mut world, Command::NewGame);
    assert_eq!(
        events,
        vec![
            Event::StateChanged {
                from: SessionState::Title,
                to: SessionState::Playing,
            },
            Event::WaveStarted {
                wave: 1,
                bounds: Bounds::playfield(),
            },
        ]
    );
    let stats = query::stats(&world);
    assert_eq!(stats.wave, 1);
    assert_eq!(stats.coins, 0);
}

#[test]
fn unpopulated_wave_does_not_clear() {
    let mut world = World::new();
    let _ = submit(&mut world, Command::NewGame);
    for _ in 0..10 {
        let _ = tick(&mut world, FRAME);
    }
    assert_eq!(query::state(&world), SessionState::Playing);
}

#[test]
fn clearing_wave_opens_shop_with_checkpoint() {
    let mut world = World::new();
    let _ = submit(&mut world, Command::NewGame);
    let _ = submit(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Drone,
            position: Vec2::new(855.0, 360.0),
        },
    );

    let transcript = snipe_until_state(&mut world, Vec2::new(855.0, 360.0), SessionState::Shop);
    assert!(transcript.contains(&Event::WaveCleared { wave: 1 }));
    assert!(transcript.contains(&Event::StateChanged {
        from: SessionState::Playing,
        to: SessionState::Shop,
    }));

    let record = query::checkpoint(&world, 99).expect("checkpoint in shop");
    assert_eq!(record.current_wave, 2);
    assert_eq!(record.stats.kills, 1);
    assert_eq!(record.timestamp, 99);
    assert!((record.player.max_health - 100.0).abs() < f32::EPSILON);

    let events = submit(&mut world, Command::ContinueToNextWave);
    assert!(events.contains(&Event::WaveStarted {
        wave: 2,
        bounds: Bounds::playfield(),
    }));
    assert_eq!(query::state(&world), SessionState::Playing);
    assert!(query::checkpoint(&world, 0).is_none());
}

#[test]
fn shop_purchases_spend_coins_or_are_rejected() {
    let mut world = World::new();
    let _ = submit(&mut world, Command::NewGame);
    let _ = submit(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Turret,
            position: Vec2::new(1017.5, 360.0),
        },
    );
    let center = query::player(&world).center();
    let _ = submit(
        &mut world,
        Command::DropPickup {
            kind: PickupKind::Coin { value: 40 },
            position: center,
        },
    );
    let _ = snipe_until_state(&mut world, Vec2::new(1017.5, 360.0), SessionState::Shop);
    assert_eq!(query::stats(&world).coins, 40);

    let events = submit(
        &mut world,
        Command::PurchaseUpgrade {
            upgrade: UpgradeKind::Health,
        },
    );
    assert_eq!(
        events,
        vec![Event::UpgradePurchased {
            upgrade: UpgradeKind::Health,
            coins_remaining: 20,
        }]
    );
    let player = query::player(&world);
    assert!((player.max_health - 120.0).abs() < f32::EPSILON);
    assert!((player.health - 120.0).abs() < f32::EPSILON);

    let _ = submit(
        &mut world,
        Command::PurchaseUpgrade {
            upgrade: UpgradeKind::Damage,
        },
    );
    let events = submit(
        &mut world,
        Command::PurchaseUpgrade {
            upgrade: UpgradeKind::Damage,
        },
    );
    assert_eq!(
        events,
        vec![Event::UpgradeRejected {
            upgrade: UpgradeKind::Damage,
            coins: 5,
        }]
    );
    let stats = query::stats(&world);
    assert_eq!(stats.coins, 5);
    assert_eq!(stats.health_upgrades, 1);
    assert_eq!(stats.damage_upgrades, 1);
}

#[test]
fn pause_freezes_and_resumes_losslessly() {
    let mut world = World::new();
    let _ = submit(&mut world, Command::NewGame);
    let _ = submit(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Tank,
            position: Vec2::new(100.0, 100.0),
        },
    );
    let _ = tick(&mut world, FRAME);

    let events = submit(&mut world, Command::SetPaused { paused: true });
    assert_eq!(
        events,
        vec![Event::StateChanged {
            from: SessionState::Playing,
            to: SessionState::Paused,
        }]
    );
    let before = query::enemy_view(&world).into_vec();
    let ticks = query::tick_index(&world);
    for _ in 0..30 {
        assert!(tick(&mut world, FRAME).is_empty());
    }
    assert_eq!(query::enemy_view(&world).into_vec(), before);
    assert_eq!(query::tick_index(&world), ticks);

    let _ = submit(&mut world, Command::SetPaused { paused: false });
    assert_eq!(query::state(&world), SessionState::Playing);
    let _ = tick(&mut world, FRAME);
    assert_ne!(query::enemy_view(&world).into_vec(), before);
}

#[test]
fn quitting_from_pause_returns_to_title() {
    let mut world = World::new();
    let _ = submit(&mut world, Command::NewGame);
    let _ = submit(&mut world, Command::SetPaused { paused: true });
    let events = submit(&mut world, Command::ReturnToTitle);
    assert_eq!(
        events,
        vec![Event::StateChanged {
            from: SessionState::Paused,
            to: SessionState::Title,
        }]
    );
    assert!(query::enemy_view(&world).is_empty());
}

fn restarts() -> [Command; 2] {
    [
        Command::NewGame,
        Command::ResumeFromSave {
            record: sample_record(7),
        },
    ]
}

#[test]
fn restarting_and_abandoning_are_gated_by_state() {
    let mut world = World::new();
    let _ = submit(&mut world, Command::NewGame);
    for command in restarts() {
        assert!(submit(&mut world, command).is_empty());
    }
    assert!(submit(&mut world, Command::ReturnToTitle).is_empty());
    assert_eq!(query::state(&world), SessionState::Playing);
    assert_eq!(query::stats(&world).wave, 1);

    let _ = submit(&mut world, Command::SetPaused { paused: true });
    for command in restarts() {
        assert!(submit(&mut world, command).is_empty());
    }
    assert_eq!(query::state(&world), SessionState::Paused);
    let _ = submit(&mut world, Command::SetPaused { paused: false });

    let _ = submit(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Drone,
            position: Vec2::new(855.0, 360.0),
        },
    );
    let _ = snipe_until_state(&mut world, Vec2::new(855.0, 360.0), SessionState::Shop);
    for command in restarts() {
        assert!(submit(&mut world, command).is_empty());
    }
    assert!(submit(&mut world, Command::ReturnToTitle).is_empty());
    assert_eq!(query::state(&world), SessionState::Shop);
    assert_eq!(query::stats(&world).kills, 1);
}

#[test]
fn loot_from_the_final_kill_is_forfeited_at_the_shop() {
    let mut world = World::new();
    let _ = submit(&mut world, Command::NewGame);
    let _ = submit(
        &mut world,
        Command::DropPickup {
            kind: PickupKind::Coin { value: 10 },
            position: Vec2::new(100.0, 650.0),
        },
    );
    let _ = submit(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Drone,
            position: Vec2::new(855.0, 360.0),
        },
    );
    let transcript = snipe_until_state(&mut world, Vec2::new(855.0, 360.0), SessionState::Shop);
    let position = transcript
        .iter()
        .find_map(|event| match event {
            Event::EnemyKilled { position, .. } => Some(*position),
            _ => None,
        })
        .expect("drone killed");
    assert!(query::pickups(&world).is_empty());

    let coins = query::stats(&world).coins;
    let events = submit(
        &mut world,
        Command::DropPickup {
            kind: PickupKind::Coin { value: 5 },
            position,
        },
    );
    assert!(events.is_empty());
    assert!(query::pickups(&world).is_empty());

    let _ = submit(&mut world, Command::ContinueToNextWave);
    assert_eq!(query::state(&world), SessionState::Playing);
    assert!(query::pickups(&world).is_empty());
    assert_eq!(query::stats(&world).coins, coins);
}

#[test]
fn repeated_contact_ends_the_run() {
    let mut world = World::new();
    let _ = submit(&mut world, Command::NewGame);
    let _ = submit(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Turret,
            position: Vec2::new(100.0, 100.0),
        },
    );

    let mut transcript = Vec::new();
    for _ in 0..4 {
        let position = query::player(&world).center();
        let _ = submit(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Boss,
                position,
            },
        );
        transcript.extend(tick(&mut world, FRAME));
        transcript.extend(tick(&mut world, Duration::from_secs(1)));
    }

    assert_eq!(query::state(&world), SessionState::GameOver);
    assert_eq!(query::player(&world).health, 0.0);
    let ended = transcript
        .iter()
        .filter(|event| matches!(event, Event::RunEnded { outcome: RunOutcome::Defeat, .. }))
        .count();
    assert_eq!(ended, 1);
}

#[test]
fn resume_restores_checkpoint() {
    let mut world = World::new();
    let events = submit(
        &mut world,
        Command::ResumeFromSave {
            record: sample_record(7),
        },
    );
    assert!(events.contains(&Event::WaveStarted {
        wave: 7,
        bounds: Bounds::playfield(),
    }));
    let stats = query::stats(&world);
    assert_eq!(stats.wave, 7);
    assert_eq!(stats.coins, 44);
    assert_eq!(stats.kills, 120);
    assert_eq!(stats.damage_upgrades, 3);
    let player = query::player(&world);
    assert!((player.health - 80.0).abs() < f32::EPSILON);
    assert!((player.max_health - 140.0).abs() < f32::EPSILON);
}

#[test]
fn clearing_final_wave_is_victory() {
    let mut world = World::new();
    let _ = submit(
        &mut world,
        Command::ResumeFromSave {
            record: sample_record(20),
        },
    );
    let _ = submit(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Drone,
            position: Vec2::new(855.0, 360.0),
        },
    );

    let transcript =
        snipe_until_state(&mut world, Vec2::new(855.0, 360.0), SessionState::Victory);
    assert!(transcript.contains(&Event::WaveCleared { wave: 20 }));
    let stats = transcript
        .iter()
        .find_map(|event| match event {
            Event::RunEnded {
                outcome: RunOutcome::Victory,
                stats,
            } => Some(*stats),
            _ => None,
        })
        .expect("victory reported");
    assert_eq!(stats.wave, 20);
    assert_eq!(stats.kills, 121);
    assert!(query::checkpoint(&world, 0).is_none());
}

#[test]
fn replays_are_deterministic() {
    fn fingerprint(seed: u64) -> u64 {
        let mut world = World::with_config(WorldConfig::new(Bounds::playfield(), seed));
        let _ = submit(&mut world, Command::NewGame);
        for (kind, position) in [
            (EnemyKind::Teleporter, Vec2::new(100.0, 100.0)),
            (EnemyKind::Spawner, Vec2::new(1100.0, 500.0)),
            (EnemyKind::Shielder, Vec2::new(200.0, 600.0)),
        ] {
            let _ = submit(&mut world, Command::SpawnEnemy { kind, position });
        }
        let _ = submit(
            &mut world,
            Command::SelectWeapon {
                weapon: WeaponKind::Shotgun,
            },
        );
        let _ = submit(&mut world, Command::SetTrigger { held: true });

        let mut hasher = DefaultHasher::new();
        for step in 0..300_u32 {
            let _ = submit(
                &mut world,
                Command::SteerPlayer {
                    direction: Vec2::new(if step % 120 < 60 { 1.0 } else { -1.0 }, 0.0),
                },
            );
            let _ = submit(&mut world, Command::AimAt { target: Vec2::new(100.0, 100.0) });
            let _ = tick(&mut world, FRAME);
            for enemy in query::enemy_view(&world).iter() {
                enemy.id.hash(&mut hasher);
                enemy.position.x.to_bits().hash(&mut hasher);
                enemy.position.y.to_bits().hash(&mut hasher);
                enemy.health.to_bits().hash(&mut hasher);
            }
            for bullet in query::bullets(&world) {
                bullet.position.x.to_bits().hash(&mut hasher);
                bullet.position.y.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    assert_eq!(fingerprint(0xfeed), fingerprint(0xfeed));
}
