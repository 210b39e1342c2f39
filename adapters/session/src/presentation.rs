//! Audio and particle feedback derived from world events.

use glam::Vec2;
use neon_onslaught_core::{Event, PickupKind, Rgb, RunOutcome};

/// Particles emitted when an enemy is shot down.
pub const KILL_EXPLOSION_PARTICLES: u32 = 20;
/// Particles emitted when an enemy rams the player.
pub const RAM_EXPLOSION_PARTICLES: u32 = 10;

/// Sound effects the game can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundId {
    /// The active weapon fired.
    Shoot,
    /// An enemy was destroyed.
    Death,
    /// A health pack was collected.
    Health,
    /// A wave was cleared.
    WaveComplete,
    /// The player died.
    GameOver,
    /// The final wave was cleared.
    Win,
}

/// Receiver of presentation side effects.
///
/// Implementations may drop any request; the simulation never reads back from
/// the sink.
pub trait PresentationSink {
    /// Plays a sound effect.
    fn play(&mut self, sound: SoundId);

    /// Spawns a burst of `count` particles at `position`.
    fn spawn_explosion(&mut self, position: Vec2, color: Rgb, count: u32);

    /// Shows a floating damage number at `position`.
    fn spawn_damage_number(&mut self, position: Vec2, amount: f32);
}

/// Sink that discards every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn play(&mut self, _sound: SoundId) {}

    fn spawn_explosion(&mut self, _position: Vec2, _color: Rgb, _count: u32) {}

    fn spawn_damage_number(&mut self, _position: Vec2, _amount: f32) {}
}

pub(crate) fn present(events: &[Event], sink: &mut dyn PresentationSink) {
    for event in events {
        match event {
            Event::WeaponFired { .. } => sink.play(SoundId::Shoot),
            Event::EnemyDamaged {
                position, amount, ..
            } => sink.spawn_damage_number(*position, *amount),
            Event::EnemyKilled { kind, position, .. } => {
                sink.play(SoundId::Death);
                sink.spawn_explosion(*position, kind.color(), KILL_EXPLOSION_PARTICLES);
            }
            Event::EnemyRammed { kind, position, .. } => {
                sink.spawn_explosion(*position, kind.color(), RAM_EXPLOSION_PARTICLES);
            }
            Event::PickupCollected {
                kind: PickupKind::HealthPack,
                ..
            } => sink.play(SoundId::Health),
            Event::WaveCleared { .. } => sink.play(SoundId::WaveComplete),
            Event::RunEnded { outcome, .. } => sink.play(match outcome {
                RunOutcome::Defeat => SoundId::GameOver,
                RunOutcome::Victory => SoundId::Win,
            }),
            _ => {}
        }
    }
}
