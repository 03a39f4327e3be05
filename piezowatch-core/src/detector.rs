//! Activity window detection
//!
//! Decides whether the monitored machine is currently running. The
//! fleet has used two different notions of "running" over its life:
//! signal-driven hysteresis (a qualifying vibration opens a window
//! that stays open until a quiet timeout) and a plain time-of-day gate
//! (publish between fixed hours, signal ignored). The two behave very
//! differently near boundaries, so the policy is explicit and
//! pluggable rather than baked in.

use crate::constants::{DEFAULT_WINDOW_END_HOUR, DEFAULT_WINDOW_START_HOUR};
use crate::time::{elapsed_ms, Timestamp};

/// Strategy deciding when the system is inside an event window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// Signal-driven: a level at or above `threshold` opens (or
    /// extends) the window; it closes after `timeout_ms` without a
    /// qualifying observation.
    SignalHysteresis {
        /// Normalized level that counts as activity
        threshold: u16,
        /// Quiet time after which the window closes
        timeout_ms: u32,
    },
    /// Clock-driven: active between `start_hour` (inclusive) and
    /// `end_hour` (exclusive), regardless of signal. With no wall
    /// clock available the window is never open.
    TimeOfDay {
        /// First active hour (0-23)
        start_hour: u8,
        /// First inactive hour (0-23, exclusive bound)
        end_hour: u8,
    },
    /// Window always open; publishing is throttled only by rate
    AlwaysActive,
}

impl WindowPolicy {
    /// The fleet's historical daytime publishing window (07:00-22:00)
    pub const fn daytime() -> Self {
        WindowPolicy::TimeOfDay {
            start_hour: DEFAULT_WINDOW_START_HOUR,
            end_hour: DEFAULT_WINDOW_END_HOUR,
        }
    }
}

/// Whether the machine is considered running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ActivityState {
    /// No event window open
    Idle,
    /// Inside an event window
    Active,
}

/// Hysteresis/clock state machine over one [`WindowPolicy`]
#[derive(Debug, Clone, Copy)]
pub struct ActivityDetector {
    policy: WindowPolicy,
    state: ActivityState,
    last_activation_at: Option<Timestamp>,
}

impl ActivityDetector {
    /// Create a detector in `Idle` under `policy`
    pub const fn new(policy: WindowPolicy) -> Self {
        Self {
            policy,
            state: ActivityState::Idle,
            last_activation_at: None,
        }
    }

    /// Active policy
    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Current state
    pub fn state(&self) -> ActivityState {
        self.state
    }

    /// True while inside an event window
    pub fn is_active(&self) -> bool {
        self.state == ActivityState::Active
    }

    /// Most recent qualifying observation (hysteresis policy only)
    pub fn last_activation_at(&self) -> Option<Timestamp> {
        self.last_activation_at
    }

    /// Update the hysteresis threshold; no effect under other policies
    pub fn set_threshold(&mut self, threshold: u16) {
        if let WindowPolicy::SignalHysteresis { threshold: t, .. } = &mut self.policy {
            *t = threshold;
        }
    }

    /// Advance the state machine by one sampling tick
    ///
    /// `level` is the normalized window level for this tick, or `None`
    /// when the sampler produced no data. A no-data tick never opens a
    /// window but still lets an open one time out. `hour` feeds the
    /// time-of-day policy and may be `None` when the wall clock is
    /// unsynchronized.
    pub fn tick(&mut self, level: Option<u16>, now: Timestamp, hour: Option<u8>) {
        match self.policy {
            WindowPolicy::SignalHysteresis { threshold, timeout_ms } => {
                if let Some(level) = level {
                    if level >= threshold {
                        self.state = ActivityState::Active;
                        self.last_activation_at = Some(now);
                        return;
                    }
                }
                if let Some(last) = self.last_activation_at {
                    if elapsed_ms(last, now) >= timeout_ms as u64 {
                        self.state = ActivityState::Idle;
                    }
                }
            }
            WindowPolicy::TimeOfDay { start_hour, end_hour } => {
                self.state = match hour {
                    Some(h) if h >= start_hour && h < end_hour => ActivityState::Active,
                    _ => ActivityState::Idle,
                };
            }
            WindowPolicy::AlwaysActive => {
                self.state = ActivityState::Active;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HYSTERESIS: WindowPolicy = WindowPolicy::SignalHysteresis {
        threshold: 450,
        timeout_ms: 10_000,
    };

    #[test]
    fn opens_on_threshold_crossing() {
        let mut detector = ActivityDetector::new(HYSTERESIS);
        detector.tick(Some(449), 0, None);
        assert!(!detector.is_active());

        detector.tick(Some(450), 1000, None);
        assert!(detector.is_active());
        assert_eq!(detector.last_activation_at(), Some(1000));
    }

    #[test]
    fn stays_active_until_timeout() {
        let mut detector = ActivityDetector::new(HYSTERESIS);
        detector.tick(Some(500), 0, None);

        // Quiet ticks inside the timeout keep the window open
        detector.tick(Some(0), 5000, None);
        assert!(detector.is_active());
        detector.tick(Some(0), 9999, None);
        assert!(detector.is_active());

        // Timeout elapsed with no refresh
        detector.tick(Some(0), 10_000, None);
        assert!(!detector.is_active());
    }

    #[test]
    fn qualifying_observation_extends_window() {
        let mut detector = ActivityDetector::new(HYSTERESIS);
        detector.tick(Some(500), 0, None);
        detector.tick(Some(470), 8000, None);
        assert_eq!(detector.last_activation_at(), Some(8000));

        // Would have expired relative to t=0, not relative to t=8000
        detector.tick(Some(0), 12_000, None);
        assert!(detector.is_active());
        detector.tick(Some(0), 18_000, None);
        assert!(!detector.is_active());
    }

    #[test]
    fn no_data_tick_never_opens_but_can_close() {
        let mut detector = ActivityDetector::new(HYSTERESIS);
        detector.tick(None, 0, None);
        assert!(!detector.is_active());

        detector.tick(Some(500), 1000, None);
        detector.tick(None, 20_000, None);
        assert!(!detector.is_active());
    }

    #[test]
    fn time_of_day_ignores_signal() {
        let policy = WindowPolicy::TimeOfDay {
            start_hour: 7,
            end_hour: 22,
        };
        let mut detector = ActivityDetector::new(policy);

        // Quiet but mid-morning: active
        detector.tick(Some(0), 0, Some(10));
        assert!(detector.is_active());

        // Loud but before the window: idle
        detector.tick(Some(4000), 1000, Some(6));
        assert!(!detector.is_active());

        // Boundary hours: start inclusive, end exclusive
        detector.tick(None, 2000, Some(7));
        assert!(detector.is_active());
        detector.tick(None, 3000, Some(22));
        assert!(!detector.is_active());
    }

    #[test]
    fn missing_wall_clock_degrades_to_idle() {
        let policy = WindowPolicy::TimeOfDay {
            start_hour: 7,
            end_hour: 22,
        };
        let mut detector = ActivityDetector::new(policy);
        detector.tick(Some(4000), 0, None);
        assert!(!detector.is_active());
    }

    #[test]
    fn always_active_policy() {
        let mut detector = ActivityDetector::new(WindowPolicy::AlwaysActive);
        detector.tick(None, 0, None);
        assert!(detector.is_active());
    }

    #[test]
    fn threshold_update_applies_next_tick() {
        let mut detector = ActivityDetector::new(HYSTERESIS);
        detector.tick(Some(400), 0, None);
        assert!(!detector.is_active());

        detector.set_threshold(300);
        detector.tick(Some(400), 1000, None);
        assert!(detector.is_active());
    }
}
