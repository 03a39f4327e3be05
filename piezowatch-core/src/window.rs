//! Peak aggregation between publishes
//!
//! Sampling runs at sub-second cadence while publishing runs at
//! seconds. The window keeps the maximum normalized level seen since
//! the last publish, so a short spike between publishes is reported
//! even when the publish itself is delayed.

use crate::time::Timestamp;

/// Max-hold accumulator spanning one publish interval
///
/// Between two `take_and_reset` calls the held value is monotonically
/// non-decreasing.
#[derive(Debug, Clone, Copy)]
pub struct PeakWindow {
    max_level: u16,
    started_at: Timestamp,
}

impl PeakWindow {
    /// Open a window at `now`
    pub const fn new(now: Timestamp) -> Self {
        Self {
            max_level: 0,
            started_at: now,
        }
    }

    /// Fold one normalized level into the window
    pub fn observe(&mut self, level: u16) {
        if level > self.max_level {
            self.max_level = level;
        }
    }

    /// Current held maximum
    pub fn max_level(&self) -> u16 {
        self.max_level
    }

    /// When the current window opened
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Close the window: return the held maximum and open a fresh one at `now`
    pub fn take_and_reset(&mut self, now: Timestamp) -> u16 {
        let max = self.max_level;
        self.max_level = 0;
        self.started_at = now;
        max
    }
}
