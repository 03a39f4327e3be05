//! Error Types for Configuration and Profile Resolution
//!
//! The error taxonomy is deliberately narrow: nothing in the pipeline
//! is fatal. A bad configuration request is rejected and the previous
//! configuration retained; an unknown device identity falls back to a
//! safe default profile. Errors are small `Copy` values so they can be
//! returned from hot paths without allocation.

use thiserror_no_std::Error;

/// Errors from runtime reconfiguration requests
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Requested publish interval outside the accepted bounds
    #[error("publish interval {requested}s outside [{min}, {max}]s")]
    PublishIntervalOutOfRange {
        /// Interval the caller asked for, in seconds
        requested: u32,
        /// Lowest accepted interval, in seconds
        min: u32,
        /// Highest accepted interval, in seconds
        max: u32,
    },
}

/// Errors from device-profile resolution
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileError {
    /// Hardware identity not present in the calibration table
    #[error("device identity not in calibration table")]
    UnknownDevice,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::PublishIntervalOutOfRange { requested, min, max } => {
                defmt::write!(fmt, "publish interval {}s outside [{}, {}]s", requested, min, max)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ProfileError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::UnknownDevice => defmt::write!(fmt, "device identity not in calibration table"),
        }
    }
}
