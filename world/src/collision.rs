//! Collision and consequence pipeline.
//!
//! Runs after motion and archetype rules. Entities are only marked here
//! (spent, dead, collected); removal happens in the world's compaction pass
//! so iteration never observes a collection being resized.

use neon_onslaught_core::{Event, PickupKind};

use crate::pickup::HEALTH_PACK_HEAL;
use crate::{allocate_enemy_id, World};

pub(crate) fn resolve(world: &mut World, out_events: &mut Vec<Event>) {
    bullets_against_enemies(world, out_events);
    player_against_enemies(world, out_events);
    player_against_pickups(world, out_events);
}

fn bullets_against_enemies(world: &mut World, out_events: &mut Vec<Event>) {
    let World {
        bullets,
        enemies,
        pending_enemies,
        combo,
        stats,
        next_enemy_id,
        ..
    } = world;

    for bullet in bullets.iter_mut() {
        for enemy in enemies.iter_mut() {
            if bullet.spent {
                break;
            }
            if enemy.dead || bullet.has_struck(enemy.id) || !bullet.body.overlaps(&enemy.body) {
                continue;
            }

            let killed = enemy.take_damage(bullet.damage);
            bullet.register_hit(enemy.id);
            let position = enemy.body.center();
            out_events.push(Event::EnemyDamaged {
                enemy: enemy.id,
                position,
                amount: bullet.damage,
            });
            if !killed {
                continue;
            }

            stats.kills = stats.kills.saturating_add(1);
            combo.add_kill();
            out_events.push(Event::EnemyKilled {
                enemy: enemy.id,
                kind: enemy.kind,
                position,
                coin_value: enemy.coin_value,
                wave: stats.wave,
                combo_multiplier: combo.multiplier(),
            });

            if let Some(children) = enemy.split(|| allocate_enemy_id(&mut *next_enemy_id)) {
                for child in children {
                    out_events.push(Event::EnemySpawned {
                        enemy: child.id,
                        kind: child.kind,
                        position: child.body.center(),
                    });
                    pending_enemies.push(child);
                }
            }
        }
    }
}

/// Every overlapping enemy rams the player and dies without rewarding a kill.
fn player_against_enemies(world: &mut World, out_events: &mut Vec<Event>) {
    let World {
        player,
        enemies,
        combo,
        ..
    } = world;

    for enemy in enemies.iter_mut() {
        if enemy.dead || enemy.is_phased() || !enemy.body.overlaps(&player.body) {
            continue;
        }
        if let Some(hit) = player.take_damage(enemy.damage) {
            combo.reset();
            out_events.push(Event::PlayerDamaged {
                amount: enemy.damage,
                absorbed: hit.absorbed,
                health: player.health,
            });
        }
        enemy.dead = true;
        out_events.push(Event::EnemyRammed {
            enemy: enemy.id,
            kind: enemy.kind,
            position: enemy.body.center(),
        });
    }
}

fn player_against_pickups(world: &mut World, out_events: &mut Vec<Event>) {
    let World {
        player,
        pickups,
        stats,
        ..
    } = world;

    for pickup in pickups.iter_mut() {
        if pickup.collected || pickup.is_expired() || !pickup.body.overlaps(&player.body) {
            continue;
        }
        pickup.collected = true;
        match pickup.kind {
            PickupKind::Coin { value } => stats.coins = stats.coins.saturating_add(value),
            PickupKind::HealthPack => player.heal(HEALTH_PACK_HEAL),
            PickupKind::PowerUp { kind } => player.apply_power_up(kind),
        }
        out_events.push(Event::PickupCollected {
            kind: pickup.kind,
            position: pickup.body.center(),
        });
    }
}
