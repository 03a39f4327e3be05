//! Time management for the sampling loop
//!
//! Provides a clock abstraction covering the two time notions the
//! pipeline needs:
//! - Monotonic milliseconds since boot, for sampling windows, activity
//!   timeouts and the publish throttle
//! - Wall-clock hour of day, for the time-of-day window policy (only
//!   available once the host has synchronized time)

/// Timestamp in milliseconds since device boot (monotonic)
pub type Timestamp = u64;

/// Milliseconds between `earlier` and `later`, wrap-safe.
///
/// Hardware tick counters wrap; naive `later - earlier` across a wrap
/// underflows and every timeout in the loop fires at once. Wrapping
/// subtraction yields the correct interval as long as the real elapsed
/// time is less than the counter period.
#[inline]
pub fn elapsed_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.wrapping_sub(earlier)
}

/// Source of time for the pipeline
pub trait Clock {
    /// Current monotonic timestamp in milliseconds
    fn now_ms(&self) -> Timestamp;

    /// Local hour of day (0-23), or `None` when no synchronized wall
    /// clock is available.
    ///
    /// The time-of-day policy treats `None` as "outside the window"
    /// rather than failing.
    fn hour_of_day(&self) -> Option<u8>;
}

/// System clock (requires std)
///
/// Monotonic time comes from [`std::time::Instant`] anchored at
/// construction; the hour of day is derived from UTC system time.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemClock {
    boot: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Create a clock anchored at "now"
    pub fn new() -> Self {
        Self {
            boot: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        self.boot.elapsed().as_millis() as Timestamp
    }

    fn hour_of_day(&self) -> Option<u8> {
        use std::time::{SystemTime, UNIX_EPOCH};

        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()?
            .as_secs();
        Some(((secs / 3600) % 24) as u8)
    }
}

/// Controllable clock for tests
///
/// Advances only when told to. `step_per_read` makes every `now_ms`
/// call advance the clock, which lets blocking sampling loops
/// terminate deterministically in tests.
#[derive(Debug)]
pub struct FixedClock {
    now: core::cell::Cell<Timestamp>,
    hour: Option<u8>,
    step_per_read: u64,
}

impl FixedClock {
    /// Create a clock frozen at `now`, with no wall-clock hour
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: core::cell::Cell::new(now),
            hour: None,
            step_per_read: 0,
        }
    }

    /// Set the wall-clock hour reported by `hour_of_day`
    pub fn with_hour(mut self, hour: u8) -> Self {
        self.hour = Some(hour);
        self
    }

    /// Advance the clock by `ms` on every `now_ms` call
    pub fn with_step_per_read(mut self, ms: u64) -> Self {
        self.step_per_read = ms;
        self
    }

    /// Jump to an absolute timestamp
    pub fn set(&mut self, now: Timestamp) {
        self.now.set(now);
    }

    /// Advance by `ms`
    pub fn advance(&mut self, ms: u64) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> Timestamp {
        let current = self.now.get();
        if self.step_per_read > 0 {
            self.now.set(current.wrapping_add(self.step_per_read));
        }
        current
    }

    fn hour_of_day(&self) -> Option<u8> {
        self.hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = FixedClock::new(1000);
        assert_eq!(clock.now_ms(), 1000);

        clock.advance(500);
        assert_eq!(clock.now_ms(), 1500);
    }

    #[test]
    fn fixed_clock_steps_on_read() {
        let clock = FixedClock::new(0).with_step_per_read(10);
        assert_eq!(clock.now_ms(), 0);
        assert_eq!(clock.now_ms(), 10);
        assert_eq!(clock.now_ms(), 20);
    }

    #[test]
    fn hour_defaults_to_none() {
        let clock = FixedClock::new(0);
        assert_eq!(clock.hour_of_day(), None);
        assert_eq!(FixedClock::new(0).with_hour(13).hour_of_day(), Some(13));
    }

    #[test]
    fn elapsed_survives_wraparound() {
        // Counter wrapped between the two observations
        let earlier = Timestamp::MAX - 100;
        let later = 400;
        assert_eq!(elapsed_ms(earlier, later), 501);

        // Normal case
        assert_eq!(elapsed_ms(1000, 6000), 5000);
    }
}
