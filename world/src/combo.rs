//! Kill-chain tracking that scales coin rewards.

use neon_onslaught_core::ComboSnapshot;

/// Seconds a chain survives without another kill.
pub(crate) const COMBO_WINDOW: f32 = 3.0;

const MULTIPLIER_STEPS: [(u32, f32); 5] = [(20, 4.0), (15, 3.0), (10, 2.5), (5, 2.0), (3, 1.5)];

/// Multiplier granted by a chain of `count` kills.
pub(crate) fn multiplier_for(count: u32) -> f32 {
    MULTIPLIER_STEPS
        .iter()
        .find(|(threshold, _)| count >= *threshold)
        .map_or(1.0, |(_, multiplier)| *multiplier)
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ComboTracker {
    count: u32,
    remaining: f32,
    highest: u32,
}

impl ComboTracker {
    pub(crate) fn add_kill(&mut self) {
        self.count = self.count.saturating_add(1);
        self.remaining = COMBO_WINDOW;
        self.highest = self.highest.max(self.count);
    }

    /// Counts the expiry window down; the chain lapses when it runs out.
    pub(crate) fn update(&mut self, dt: f32) {
        if self.count == 0 {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.reset();
        }
    }

    /// Breaks the chain. The highest chain of the run is kept.
    pub(crate) fn reset(&mut self) {
        self.count = 0;
        self.remaining = 0.0;
    }

    pub(crate) fn multiplier(&self) -> f32 {
        multiplier_for(self.count)
    }

    pub(crate) fn snapshot(&self) -> ComboSnapshot {
        ComboSnapshot {
            count: self.count,
            multiplier: self.multiplier(),
            remaining: self.remaining.max(0.0),
            highest: self.highest,
        }
    }
}
