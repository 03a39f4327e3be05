//! Per-device baseline calibration
//!
//! Every physical unit rests at a different noise floor (mounting,
//! disc weighting, cable run) and saturates at a different "still
//! interesting" level. Normalization subtracts the unit's baseline and
//! clamps to its ceiling so one loose transient cannot dominate the
//! scale of everything reported downstream.

use crate::profile::DeviceProfile;

/// Turn a raw window peak into a normalized activity level
///
/// `raw_peak.saturating_sub(baseline)` clamped to `ceiling`. Pure and
/// total: always yields a value in `0..=ceiling`, readings below the
/// baseline come out as 0.
#[inline]
pub fn normalize(raw_peak: u16, profile: &DeviceProfile) -> u16 {
    raw_peak.saturating_sub(profile.baseline).min(profile.ceiling)
}
