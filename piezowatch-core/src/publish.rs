//! Publish throttling
//!
//! The sensor samples far faster than anything downstream wants to
//! hear about. The gate enforces a minimum spacing between outbound
//! events and is the only place that closes the peak window, so a
//! suppressed publish never loses a spike - it stays in the window for
//! the next attempt.

use crate::events::VibrationEvent;
use crate::time::{elapsed_ms, Timestamp};
use crate::window::PeakWindow;

/// Minimum-interval gate in front of the event sink
#[derive(Debug, Clone, Copy)]
pub struct PublishGate {
    min_interval_ms: u32,
    last_published_at: Option<Timestamp>,
}

impl PublishGate {
    /// Create a gate with the given minimum spacing
    pub const fn new(min_interval_ms: u32) -> Self {
        Self {
            min_interval_ms,
            last_published_at: None,
        }
    }

    /// Current minimum spacing in milliseconds
    pub fn min_interval_ms(&self) -> u32 {
        self.min_interval_ms
    }

    /// Change the minimum spacing; applies from the next attempt
    pub fn set_min_interval_ms(&mut self, ms: u32) {
        self.min_interval_ms = ms;
    }

    /// When the last event went out, if any
    pub fn last_published_at(&self) -> Option<Timestamp> {
        self.last_published_at
    }

    /// True once enough time has passed since the last publish
    ///
    /// The first publish is never throttled.
    pub fn ready(&self, now: Timestamp) -> bool {
        match self.last_published_at {
            None => true,
            Some(last) => elapsed_ms(last, now) >= self.min_interval_ms as u64,
        }
    }

    /// Emit an event if the detector is in a window and the throttle allows
    ///
    /// On emission the peak window is closed (reset to 0, restarted at
    /// `now`) and the throttle timestamp advances. Otherwise the
    /// window is left untouched.
    pub fn maybe_publish(
        &mut self,
        now: Timestamp,
        active: bool,
        window: &mut PeakWindow,
        location: &'static str,
    ) -> Option<VibrationEvent> {
        if !active || !self.ready(now) {
            return None;
        }

        let level = window.take_and_reset(now);
        let elapsed_since_last_ms = self.last_published_at.map(|last| elapsed_ms(last, now));
        self.last_published_at = Some(now);

        Some(VibrationEvent {
            level,
            elapsed_since_last_ms,
            timestamp: now,
            location,
        })
    }
}
