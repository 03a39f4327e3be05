//! Core sampling and event-detection engine for PiezoWatch
//!
//! Detects "machine is running" events (washer/dryer) from a noisy
//! analog piezo signal and reports them at a bounded rate. Designed
//! for resource-constrained microcontrollers:
//!
//! - No heap allocation in the sampling path
//! - Single-threaded cooperative loop, no locking
//! - Wrap-safe timeout arithmetic on the monotonic clock
//!
//! ```no_run
//! use piezowatch_core::{VibrationMonitor, Sampler, Pin, SystemClock};
//!
//! # struct BoardAdc;
//! # impl piezowatch_core::AdcReader for BoardAdc {
//! #     fn read_pin(&mut self, _pin: Pin) -> u16 { 0 }
//! # }
//! let clock = SystemClock::new();
//! let mut adc = BoardAdc;
//! let mut monitor = VibrationMonitor::for_device(
//!     "2a004d000f47363331333432",
//!     Sampler::new(&[Pin(0)]),
//!     0,
//! );
//!
//! loop {
//!     if let Some(event) = monitor.tick(&mut adc, &clock) {
//!         // hand to the delivery collaborator
//!         let _ = event;
//!     }
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod adc;
pub mod calibrate;
pub mod constants;
pub mod detector;
pub mod display;
pub mod errors;
pub mod events;
pub mod monitor;
pub mod profile;
pub mod publish;
pub mod sampler;
pub mod time;
pub mod window;

// Public API
pub use adc::{AdcReader, Pin};
pub use calibrate::normalize;
pub use detector::{ActivityDetector, ActivityState, WindowPolicy};
pub use display::{DisplaySink, NoOpDisplay};
pub use errors::{ConfigError, ProfileError};
pub use events::{EventSink, NullSink, VibrationEvent};
pub use monitor::{DiagnosticState, VibrationMonitor};
pub use profile::DeviceProfile;
pub use publish::PublishGate;
pub use sampler::{PeakReading, Sampler};
pub use time::{Clock, FixedClock, Timestamp};
pub use window::PeakWindow;

#[cfg(feature = "std")]
pub use events::LogSink;
#[cfg(feature = "std")]
pub use time::SystemClock;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
