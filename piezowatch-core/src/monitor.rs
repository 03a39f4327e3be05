//! Control-loop context
//!
//! [`VibrationMonitor`] owns every pipeline component and is itself
//! owned by the host's loop - there are no global singletons. One
//! `tick` runs the whole chain:
//!
//! ```text
//! Sampler → Calibrator → PeakWindow → ActivityDetector → PublishGate
//! ```
//!
//! The loop is single-threaded and cooperative: sampling blocks for
//! its whole window, configuration changes land on the next iteration,
//! and every timeout is evaluated by comparing monotonic elapsed time
//! on the tick that observes it.

use crate::adc::AdcReader;
use crate::calibrate::normalize;
use crate::constants::{
    DEFAULT_ACTIVITY_TIMEOUT_MS, DEFAULT_PUBLISH_INTERVAL_S, DEFAULT_SAMPLE_WINDOW_MS,
    MAX_PUBLISH_INTERVAL_S, MIN_PUBLISH_INTERVAL_S, MS_PER_SECOND,
};
use crate::detector::{ActivityDetector, ActivityState, WindowPolicy};
use crate::display::DisplaySink;
use crate::errors::ConfigError;
use crate::events::VibrationEvent;
use crate::profile::{self, DeviceProfile, PROFILES};
use crate::publish::PublishGate;
use crate::sampler::Sampler;
use crate::time::{elapsed_ms, Clock, Timestamp};
use crate::window::PeakWindow;

/// Temporary publish-rate override with automatic revert
#[derive(Debug, Clone, Copy)]
struct RateOverride {
    previous_s: u32,
    set_at: Timestamp,
    hold_ms: u64,
}

/// Introspection snapshot of the whole pipeline
///
/// The moral equivalent of the firmware's "publish settings" dumps:
/// everything an operator needs to tell a mis-calibrated unit from a
/// quiet one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiagnosticState {
    /// Unit label from the active profile
    pub location: &'static str,
    /// Baseline being subtracted from raw peaks
    pub baseline: u16,
    /// Post-baseline clamp
    pub ceiling: u16,
    /// Current activation threshold
    pub activation_threshold: u16,
    /// Current publish throttle, in seconds
    pub publish_interval_s: u32,
    /// Length of one sampling window
    pub sample_window_ms: u32,
    /// Detector state as of the last tick
    pub state: ActivityState,
    /// Held maximum of the open peak window
    pub window_max: u16,
    /// Sampling passes completed in the last window
    pub samples_last_window: u32,
    /// When the last event went out, if any
    pub last_published_at: Option<Timestamp>,
    /// True when the unit is running on the fallback profile
    pub profile_fallback: bool,
    /// True while a temporary rate override is in force
    pub rate_override_active: bool,
}

/// The sampling-and-publish pipeline, one instance per device
pub struct VibrationMonitor {
    profile: DeviceProfile,
    profile_known: bool,
    sampler: Sampler,
    sample_window_ms: u32,
    activation_threshold: u16,
    window: PeakWindow,
    detector: ActivityDetector,
    gate: PublishGate,
    publish_interval_s: u32,
    rate_override: Option<RateOverride>,
    samples_last_window: u32,
}

impl VibrationMonitor {
    /// Create a monitor for `profile` under the default hysteresis policy
    ///
    /// The detector threshold comes from the profile; the publish
    /// throttle starts at [`DEFAULT_PUBLISH_INTERVAL_S`].
    pub fn new(profile: DeviceProfile, sampler: Sampler, now: Timestamp) -> Self {
        let policy = WindowPolicy::SignalHysteresis {
            threshold: profile.activation_threshold,
            timeout_ms: DEFAULT_ACTIVITY_TIMEOUT_MS,
        };
        Self::with_policy(profile, sampler, policy, now)
    }

    /// Create a monitor with an explicit window policy
    pub fn with_policy(
        profile: DeviceProfile,
        sampler: Sampler,
        policy: WindowPolicy,
        now: Timestamp,
    ) -> Self {
        Self {
            activation_threshold: profile.activation_threshold,
            profile,
            profile_known: true,
            sampler,
            sample_window_ms: DEFAULT_SAMPLE_WINDOW_MS,
            window: PeakWindow::new(now),
            detector: ActivityDetector::new(policy),
            gate: PublishGate::new(DEFAULT_PUBLISH_INTERVAL_S * MS_PER_SECOND as u32),
            publish_interval_s: DEFAULT_PUBLISH_INTERVAL_S,
            rate_override: None,
            samples_last_window: 0,
        }
    }

    /// Create a monitor by resolving `device_id` against the fleet table
    ///
    /// Unknown identities start on [`DeviceProfile::fallback`] instead
    /// of failing; the condition is logged once and visible in every
    /// [`DiagnosticState`].
    pub fn for_device(device_id: &str, sampler: Sampler, now: Timestamp) -> Self {
        let (profile, known) = profile::resolve(PROFILES, device_id);
        #[cfg(feature = "log")]
        if !known {
            log::warn!("unknown device identity, using fallback profile");
        }
        let mut monitor = Self::new(profile, sampler, now);
        monitor.profile_known = known;
        monitor
    }

    /// Override the sampling-window length
    pub fn with_sample_window_ms(mut self, ms: u32) -> Self {
        self.sample_window_ms = ms;
        self
    }

    /// Active calibration profile
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Run one loop iteration: sample, calibrate, detect, maybe publish
    ///
    /// Blocks for the sampling window. Returns the emitted event, if
    /// the detector reports an open window and the throttle allows
    /// one. A starved window (zero samples) feeds nothing into the
    /// aggregator and cannot open a window, but an already-open
    /// hysteresis window may still time out on such a tick.
    pub fn tick<A, C>(&mut self, adc: &mut A, clock: &C) -> Option<VibrationEvent>
    where
        A: AdcReader,
        C: Clock,
    {
        self.check_rate_revert(clock.now_ms());

        let reading = self.sampler.sample_window(adc, clock, self.sample_window_ms);
        let now = clock.now_ms();
        self.samples_last_window = reading.samples_taken();

        let level = if reading.is_empty() {
            None
        } else {
            Some(normalize(reading.primary_peak(), &self.profile))
        };

        if let Some(level) = level {
            self.window.observe(level);
        }
        self.detector.tick(level, now, clock.hour_of_day());

        let event = self.gate.maybe_publish(
            now,
            self.detector.is_active(),
            &mut self.window,
            self.profile.location,
        );
        #[cfg(feature = "log")]
        if let Some(event) = &event {
            log::debug!("publishing level={} at t={}", event.level, event.timestamp);
        }
        event
    }

    /// Reconfigure the publish throttle and activation threshold
    ///
    /// The interval must lie in `[MIN_PUBLISH_INTERVAL_S,
    /// MAX_PUBLISH_INTERVAL_S]`; a rejected request leaves the
    /// previous configuration fully in place. Takes effect on the next
    /// tick. A pending rate override is cancelled by an explicit
    /// reconfiguration.
    pub fn configure(
        &mut self,
        publish_interval_s: u32,
        activation_threshold: u16,
    ) -> Result<(), ConfigError> {
        check_interval(publish_interval_s)?;

        self.publish_interval_s = publish_interval_s;
        self.gate
            .set_min_interval_ms(publish_interval_s * MS_PER_SECOND as u32);
        self.activation_threshold = activation_threshold;
        self.detector.set_threshold(activation_threshold);
        self.rate_override = None;
        Ok(())
    }

    /// Temporarily change the publish rate, reverting after `hold_s`
    ///
    /// Used for burst diagnostics ("report every second for the next
    /// five minutes"). The override rate is validated like any other;
    /// re-overriding extends the hold but keeps the original rate to
    /// revert to.
    pub fn override_publish_rate(
        &mut self,
        rate_s: u32,
        hold_s: u32,
        now: Timestamp,
    ) -> Result<(), ConfigError> {
        check_interval(rate_s)?;

        let previous_s = match self.rate_override {
            Some(existing) => existing.previous_s,
            None => self.publish_interval_s,
        };
        self.rate_override = Some(RateOverride {
            previous_s,
            set_at: now,
            hold_ms: hold_s as u64 * MS_PER_SECOND,
        });
        self.publish_interval_s = rate_s;
        self.gate.set_min_interval_ms(rate_s * MS_PER_SECOND as u32);
        Ok(())
    }

    /// Revert an expired rate override
    fn check_rate_revert(&mut self, now: Timestamp) {
        if let Some(active) = self.rate_override {
            if elapsed_ms(active.set_at, now) >= active.hold_ms {
                self.publish_interval_s = active.previous_s;
                self.gate
                    .set_min_interval_ms(active.previous_s * MS_PER_SECOND as u32);
                self.rate_override = None;
            }
        }
    }

    /// Snapshot the pipeline for telemetry
    pub fn snapshot(&self) -> DiagnosticState {
        DiagnosticState {
            location: self.profile.location,
            baseline: self.profile.baseline,
            ceiling: self.profile.ceiling,
            activation_threshold: self.activation_threshold,
            publish_interval_s: self.publish_interval_s,
            sample_window_ms: self.sample_window_ms,
            state: self.detector.state(),
            window_max: self.window.max_level(),
            samples_last_window: self.samples_last_window,
            last_published_at: self.gate.last_published_at(),
            profile_fallback: !self.profile_known,
            rate_override_active: self.rate_override.is_some(),
        }
    }

    /// Push the current level to whatever display the unit carries
    ///
    /// Shows the open window's maximum while active, blanks otherwise.
    pub fn render<D: DisplaySink>(&self, display: &mut D) {
        if self.detector.is_active() {
            display.show_level(self.window.max_level());
        } else {
            display.clear();
        }
    }
}

fn check_interval(interval_s: u32) -> Result<(), ConfigError> {
    if !(MIN_PUBLISH_INTERVAL_S..=MAX_PUBLISH_INTERVAL_S).contains(&interval_s) {
        return Err(ConfigError::PublishIntervalOutOfRange {
            requested: interval_s,
            min: MIN_PUBLISH_INTERVAL_S,
            max: MAX_PUBLISH_INTERVAL_S,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adc::testing::ConstantAdc;
    use crate::adc::Pin;
    use crate::time::FixedClock;

    fn washer_profile() -> DeviceProfile {
        DeviceProfile {
            baseline: 100,
            ceiling: 550,
            activation_threshold: 450,
            location: "Washer",
        }
    }

    fn monitor() -> VibrationMonitor {
        VibrationMonitor::new(washer_profile(), Sampler::new(&[Pin(0)]), 0)
            .with_sample_window_ms(100)
    }

    #[test]
    fn quiet_signal_never_publishes() {
        let mut monitor = monitor();
        let mut adc = ConstantAdc::new(200); // normalizes to 100, below threshold
        let clock = FixedClock::new(0).with_step_per_read(10);

        for _ in 0..50 {
            assert!(monitor.tick(&mut adc, &clock).is_none());
        }
        assert_eq!(monitor.snapshot().state, ActivityState::Idle);
    }

    #[test]
    fn loud_signal_publishes_window_max() {
        let mut monitor = monitor();
        let mut adc = ConstantAdc::new(700); // normalizes to 550, above threshold
        let clock = FixedClock::new(0).with_step_per_read(10);

        let event = monitor.tick(&mut adc, &clock).expect("should publish");
        assert_eq!(event.level, 550);
        assert_eq!(event.location, "Washer");
        assert_eq!(monitor.snapshot().window_max, 0);
    }

    #[test]
    fn configure_rejects_out_of_range_interval() {
        let mut monitor = monitor();
        let before = monitor.snapshot();

        let err = monitor.configure(0, 300).unwrap_err();
        assert!(matches!(err, ConfigError::PublishIntervalOutOfRange { requested: 0, .. }));
        assert!(monitor.configure(61, 300).is_err());

        // Rejection retains the previous configuration wholesale
        let after = monitor.snapshot();
        assert_eq!(after.publish_interval_s, before.publish_interval_s);
        assert_eq!(after.activation_threshold, before.activation_threshold);
    }

    #[test]
    fn configure_round_trips_through_snapshot() {
        let mut monitor = monitor();
        monitor.configure(30, 400).unwrap();

        let snap = monitor.snapshot();
        assert_eq!(snap.publish_interval_s, 30);
        assert_eq!(snap.activation_threshold, 400);
    }

    #[test]
    fn rate_override_reverts_after_hold() {
        let mut monitor = monitor();
        let mut adc = ConstantAdc::new(200);

        monitor.override_publish_rate(1, 60, 0).unwrap();
        assert_eq!(monitor.snapshot().publish_interval_s, 1);
        assert!(monitor.snapshot().rate_override_active);

        // Well past the hold: the next tick reverts before sampling
        let clock = FixedClock::new(120_000).with_step_per_read(10);
        let _ = monitor.tick(&mut adc, &clock);
        assert_eq!(monitor.snapshot().publish_interval_s, DEFAULT_PUBLISH_INTERVAL_S);
        assert!(!monitor.snapshot().rate_override_active);
    }

    #[test]
    fn fallback_profile_is_visible_in_snapshot() {
        let monitor = VibrationMonitor::for_device("unlisted", Sampler::new(&[Pin(0)]), 0);
        let snap = monitor.snapshot();
        assert!(snap.profile_fallback);
        assert_eq!(snap.location, "Unknown");
        assert_eq!(snap.ceiling, u16::MAX);
    }

    #[test]
    fn render_shows_level_only_while_active() {
        use crate::display::testing::RecordingDisplay;

        let mut monitor = monitor();
        let mut display = RecordingDisplay::default();

        monitor.render(&mut display);
        assert!(display.cleared);
        assert_eq!(display.last_level, None);

        let mut adc = ConstantAdc::new(700);
        let clock = FixedClock::new(0).with_step_per_read(10);
        // Long throttle so the window survives the tick unpublished
        monitor.configure(60, 450).unwrap();
        let _ = monitor.tick(&mut adc, &clock); // first publish consumes the window
        let _ = monitor.tick(&mut adc, &clock); // throttled: window holds 550

        monitor.render(&mut display);
        assert_eq!(display.last_level, Some(550));
    }
}
