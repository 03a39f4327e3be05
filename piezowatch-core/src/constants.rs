//! Constants for PiezoWatch Core
//!
//! Centralized numeric policy for the sampling-and-publish pipeline.
//! Values mirror the deployed sensor hardware: Wi-Fi microcontroller
//! boards with 12-bit ADCs and piezo discs under the appliance feet.

/// Full-scale raw ADC reading (12-bit converter)
pub const ADC_MAX: u16 = 4095;

/// Maximum analog channels one sampler instance scans
///
/// The deployed units carry at most two piezo discs (one weighted,
/// one free); two slots keep the per-window state at four bytes.
pub const MAX_SAMPLE_PINS: usize = 2;

/// Default length of one blocking sampling window
pub const DEFAULT_SAMPLE_WINDOW_MS: u32 = 1000;

/// Inter-pass spacing used by the slow sampling variants
///
/// 25 ms between passes gives ~40 passes over a 1 s window, enough to
/// catch drum-rotation peaks while leaving headroom for the
/// connectivity task. Fast variants use 0 (back-to-back reads).
pub const SLOW_SAMPLE_SPACING_MS: u16 = 25;

/// Publish throttle bounds, in seconds
///
/// Downstream ingestion is rate-sensitive; anything below 1 s floods
/// it and anything above 60 s makes the dashboard useless for spotting
/// a running cycle.
pub const MIN_PUBLISH_INTERVAL_S: u32 = 1;
/// Upper bound of the publish throttle, in seconds
pub const MAX_PUBLISH_INTERVAL_S: u32 = 60;
/// Default publish throttle, in seconds
pub const DEFAULT_PUBLISH_INTERVAL_S: u32 = 5;

/// Default activation threshold for the hysteresis policy
///
/// Determined empirically for the vertically mounted weighted discs;
/// resting noise stays well below this on every calibrated unit.
pub const DEFAULT_ACTIVATION_THRESHOLD: u16 = 340;

/// Default hysteresis timeout before an active window closes
///
/// Two hours covers the longest observed wash cycle including pauses
/// between fill and spin phases.
pub const DEFAULT_ACTIVITY_TIMEOUT_MS: u32 = 2 * 60 * 60 * 1000;

/// Default time-of-day publishing window (hours, half-open)
pub const DEFAULT_WINDOW_START_HOUR: u8 = 7;
/// End of the default time-of-day publishing window (exclusive)
pub const DEFAULT_WINDOW_END_HOUR: u8 = 22;

/// Milliseconds per second
pub const MS_PER_SECOND: u64 = 1000;
