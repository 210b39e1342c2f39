//! Axis-aligned bodies shared by every entity in the playfield.

use glam::Vec2;

/// Position, velocity and extents of an entity.
///
/// Positions address the top-left corner of the box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Body {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) size: Vec2,
}

impl Body {
    /// Creates a stationary body anchored at its top-left corner.
    pub(crate) const fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
        }
    }

    /// Creates a stationary body centred on the provided point.
    pub(crate) fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size * 0.5, size)
    }

    pub(crate) fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Moves the body along its velocity for `dt` seconds.
    pub(crate) fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    /// Strict AABB intersection; touching edges do not overlap.
    pub(crate) fn overlaps(&self, other: &Body) -> bool {
        self.position.x < other.position.x + other.size.x
            && self.position.x + self.size.x > other.position.x
            && self.position.y < other.position.y + other.size.y
            && self.position.y + self.size.y > other.position.y
    }

    /// Clamps the top-left corner into `[min, max]`, favouring `min` when the range is empty.
    pub(crate) fn clamp_position(&mut self, min: Vec2, max: Vec2) {
        self.position = self.position.min(max).max(min);
    }
}

/// Velocity that moves `from` toward `to` at `speed`.
///
/// Coincident points yield zero velocity.
pub(crate) fn chase_velocity(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    (to - from).normalize_or_zero() * speed
}
