//! Scripted player that drives headless runs.

use glam::Vec2;
use neon_onslaught_core::{EnemySnapshot, SessionState, UpgradeKind, WeaponKind};
use neon_onslaught_session::{FrameInput, Key, MouseButton, PresentationSink, Session};
use neon_onslaught_system_persistence::Store;

use crate::config::{AutopilotConfig, ShopPolicy};

/// Chasers closer than this make the autopilot back off.
const RETREAT_DISTANCE: f32 = 160.0;
/// Chasers closer than this trigger a dash.
const DASH_DISTANCE: f32 = 70.0;

/// Aims at the nearest enemy, keeps firing, backs away from chasers and
/// shops according to its policy.
#[derive(Debug)]
pub(crate) struct Autopilot {
    config: AutopilotConfig,
}

impl Autopilot {
    pub(crate) fn new(config: AutopilotConfig) -> Self {
        Self { config }
    }

    pub(crate) fn next_input<S: Store, P: PresentationSink>(
        &self,
        session: &Session<S, P>,
    ) -> FrameInput {
        match session.state() {
            SessionState::Playing => self.fight(session),
            SessionState::Shop => self.shop(session),
            SessionState::Paused => FrameInput::new().pressing(Key::P),
            SessionState::Title | SessionState::GameOver | SessionState::Victory => {
                FrameInput::new()
            }
        }
    }

    fn fight<S: Store, P: PresentationSink>(&self, session: &Session<S, P>) -> FrameInput {
        let player = session.player();
        let origin = player.center();
        let enemies = session.enemies().into_vec();

        let mut input = FrameInput::new().clicking(MouseButton::Left);
        if player.weapon != self.config.weapon {
            input = input.pressing(weapon_key(self.config.weapon));
        }

        let Some(target) = nearest(&enemies, origin, |_| true) else {
            return input.pointing_at(origin + Vec2::X);
        };
        input = input.pointing_at(target.center());

        let Some(threat) = nearest(&enemies, origin, |enemy| !enemy.kind.is_stationary()) else {
            return input;
        };
        let distance = origin.distance(threat.center());
        if distance > RETREAT_DISTANCE {
            return input;
        }

        let away = (origin - threat.center()).normalize_or_zero();
        for (key, component) in [
            (Key::D, away.x),
            (Key::A, -away.x),
            (Key::S, away.y),
            (Key::W, -away.y),
        ] {
            if component > 0.3 {
                input = input.holding(key);
            }
        }
        if distance < DASH_DISTANCE {
            input = input.pressing(Key::Space);
        }
        input
    }

    fn shop<S: Store, P: PresentationSink>(&self, session: &Session<S, P>) -> FrameInput {
        let coins = session.stats().coins;
        let player = session.player();
        let wanted = match self.config.shop {
            ShopPolicy::Skip => None,
            ShopPolicy::Health => Some(UpgradeKind::Health),
            ShopPolicy::Damage => Some(UpgradeKind::Damage),
            ShopPolicy::Balanced if player.health < player.max_health * 0.75 => {
                Some(UpgradeKind::Health)
            }
            ShopPolicy::Balanced => Some(UpgradeKind::Damage),
        };

        match wanted {
            Some(upgrade) if coins >= upgrade.cost() => FrameInput::new().pressing(match upgrade {
                UpgradeKind::Health => Key::H,
                UpgradeKind::Damage => Key::D,
            }),
            _ => FrameInput::new().pressing(Key::Space),
        }
    }
}

fn weapon_key(weapon: WeaponKind) -> Key {
    match weapon {
        WeaponKind::AssaultRifle => Key::Digit1,
        WeaponKind::Shotgun => Key::Digit2,
        WeaponKind::Sniper => Key::Digit3,
    }
}

fn nearest(
    enemies: &[EnemySnapshot],
    origin: Vec2,
    filter: impl Fn(&EnemySnapshot) -> bool,
) -> Option<&EnemySnapshot> {
    enemies.iter().filter(|enemy| filter(enemy)).min_by(|a, b| {
        origin
            .distance(a.center())
            .total_cmp(&origin.distance(b.center()))
    })
}
