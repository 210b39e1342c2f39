//! Input contracts and the per-state key map.

use std::collections::BTreeSet;

use glam::Vec2;
use neon_onslaught_core::WeaponKind;

/// Keyboard keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Move up.
    W,
    /// Move left.
    A,
    /// Move down.
    S,
    /// Move right, or buy a damage upgrade in the shop.
    D,
    /// Buy a health upgrade in the shop.
    H,
    /// Pause toggle.
    P,
    /// Continue a saved run from the title screen.
    C,
    /// Dash while playing, leave the shop.
    Space,
    /// Start a run, or return to the title after it ended.
    Enter,
    /// Pause, or quit to the title while paused.
    Escape,
    /// Select the assault rifle.
    Digit1,
    /// Select the shotgun.
    Digit2,
    /// Select the sniper.
    Digit3,
}

/// Mouse buttons the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    /// Fires the active weapon while held.
    Left,
}

/// Source of per-frame input observations.
///
/// `is_key_pressed` is edge-triggered: it reports keys that went down during
/// the current frame only.
pub trait InputSource {
    /// Reports whether `key` is currently held down.
    fn is_key_held(&self, key: Key) -> bool;

    /// Reports whether `key` went down during this frame.
    fn is_key_pressed(&self, key: Key) -> bool;

    /// Reports whether `button` is currently held down.
    fn is_mouse_button_held(&self, button: MouseButton) -> bool;

    /// Cursor position in playfield coordinates.
    fn mouse_position(&self) -> Vec2;
}

/// Plain snapshot of a single frame of input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Keys held during the frame.
    pub held: BTreeSet<Key>,
    /// Keys that went down during the frame.
    pub pressed: BTreeSet<Key>,
    /// Mouse buttons held during the frame.
    pub mouse_buttons: BTreeSet<MouseButton>,
    /// Cursor position in playfield coordinates.
    pub mouse: Vec2,
}

impl FrameInput {
    /// Creates an empty snapshot with the cursor at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as held.
    #[must_use]
    pub fn holding(mut self, key: Key) -> Self {
        let _ = self.held.insert(key);
        self
    }

    /// Marks `key` as pressed this frame. A pressed key is also held.
    #[must_use]
    pub fn pressing(mut self, key: Key) -> Self {
        let _ = self.pressed.insert(key);
        self.holding(key)
    }

    /// Marks `button` as held.
    #[must_use]
    pub fn clicking(mut self, button: MouseButton) -> Self {
        let _ = self.mouse_buttons.insert(button);
        self
    }

    /// Places the cursor at `position`.
    #[must_use]
    pub fn pointing_at(mut self, position: Vec2) -> Self {
        self.mouse = position;
        self
    }
}

impl InputSource for FrameInput {
    fn is_key_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn is_mouse_button_held(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    fn mouse_position(&self) -> Vec2 {
        self.mouse
    }
}

/// Everything the key map extracts from one frame of input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Controls {
    /// Movement axes in `[-1, 1]`, not normalised.
    pub(crate) movement: Vec2,
    pub(crate) aim: Vec2,
    pub(crate) fire: bool,
    /// `Space`: dash while playing, continue in the shop.
    pub(crate) action: bool,
    pub(crate) weapon: Option<WeaponKind>,
    pub(crate) pause: bool,
    pub(crate) escape: bool,
    pub(crate) confirm: bool,
    pub(crate) continue_save: bool,
    pub(crate) buy_health: bool,
    pub(crate) buy_damage: bool,
}

impl Controls {
    pub(crate) fn poll(input: &dyn InputSource) -> Self {
        let axis = |negative: Key, positive: Key| {
            f32::from(u8::from(input.is_key_held(positive)))
                - f32::from(u8::from(input.is_key_held(negative)))
        };
        let weapon = [
            (Key::Digit1, WeaponKind::AssaultRifle),
            (Key::Digit2, WeaponKind::Shotgun),
            (Key::Digit3, WeaponKind::Sniper),
        ]
        .into_iter()
        .find(|(key, _)| input.is_key_pressed(*key))
        .map(|(_, weapon)| weapon);

        Self {
            movement: Vec2::new(axis(Key::A, Key::D), axis(Key::W, Key::S)),
            aim: input.mouse_position(),
            fire: input.is_mouse_button_held(MouseButton::Left),
            action: input.is_key_pressed(Key::Space),
            weapon,
            pause: input.is_key_pressed(Key::P),
            escape: input.is_key_pressed(Key::Escape),
            confirm: input.is_key_pressed(Key::Enter),
            continue_save: input.is_key_pressed(Key::C),
            buy_health: input.is_key_pressed(Key::H),
            buy_damage: input.is_key_pressed(Key::D),
        }
    }
}
