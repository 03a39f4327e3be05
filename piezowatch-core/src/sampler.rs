//! Fixed-duration max-hold sampling
//!
//! A piezo disc under an appliance foot produces short voltage spikes
//! as the drum rotates. Reading the ADC once per publish interval would
//! miss nearly all of them, so the sampler instead owns the CPU for a
//! whole window (historically 25 ms to 1000 ms), reads every configured
//! channel as fast as the platform allows, and keeps only the maximum
//! per channel.
//!
//! Sampling is blocking: the control loop is unavailable for the full
//! window. That is fine in the single-threaded cooperative model - the
//! connectivity task runs on its own and nothing else competes for the
//! loop.

use heapless::Vec;

use crate::adc::{AdcReader, Pin};
use crate::constants::MAX_SAMPLE_PINS;
use crate::time::{elapsed_ms, Clock};

/// Result of one sampling window
///
/// One max-hold peak per configured channel plus the number of
/// sampling passes taken. A window with zero passes carries no
/// information: callers must treat it as "no data", never as "idle".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakReading {
    peaks: [u16; MAX_SAMPLE_PINS],
    channels: u8,
    samples_taken: u32,
}

impl PeakReading {
    /// A reading with no data (zero passes)
    pub const fn empty() -> Self {
        Self {
            peaks: [0; MAX_SAMPLE_PINS],
            channels: 0,
            samples_taken: 0,
        }
    }

    /// Peak for channel `index`, if that channel was sampled
    pub fn peak(&self, index: usize) -> Option<u16> {
        if index < self.channels as usize {
            Some(self.peaks[index])
        } else {
            None
        }
    }

    /// Peak of the detection channel (channel 0), 0 when unsampled
    pub fn primary_peak(&self) -> u16 {
        self.peaks[0]
    }

    /// Number of sampling passes taken over the window
    pub fn samples_taken(&self) -> u32 {
        self.samples_taken
    }

    /// True when the window produced no samples at all
    pub fn is_empty(&self) -> bool {
        self.samples_taken == 0
    }
}

/// Blocking multi-channel peak sampler
///
/// Channel 0 is the detection channel; further channels are sampled
/// for diagnostics only.
#[derive(Debug, Clone)]
pub struct Sampler {
    pins: Vec<Pin, MAX_SAMPLE_PINS>,
    spacing_ms: u16,
}

impl Sampler {
    /// Create a sampler over `pins` (at most [`MAX_SAMPLE_PINS`], extras ignored)
    pub fn new(pins: &[Pin]) -> Self {
        let mut owned = Vec::new();
        for pin in pins.iter().take(MAX_SAMPLE_PINS) {
            // Capacity checked by the take() above
            let _ = owned.push(*pin);
        }
        Self {
            pins: owned,
            spacing_ms: 0,
        }
    }

    /// Wait `ms` between sampling passes instead of reading back-to-back
    pub fn with_spacing(mut self, ms: u16) -> Self {
        self.spacing_ms = ms;
        self
    }

    /// Configured pins, in channel order
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Sample all channels for `duration_ms`, max-holding per channel
    ///
    /// Consumes wall-clock time equal to `duration_ms`. A zero-length
    /// window (or a starved loop that never completes a pass) yields
    /// [`PeakReading::empty`].
    pub fn sample_window<A, C>(&self, adc: &mut A, clock: &C, duration_ms: u32) -> PeakReading
    where
        A: AdcReader,
        C: Clock,
    {
        let mut peaks = [0u16; MAX_SAMPLE_PINS];
        let mut samples_taken = 0u32;
        let started = clock.now_ms();

        while elapsed_ms(started, clock.now_ms()) < duration_ms as u64 {
            for (channel, pin) in self.pins.iter().enumerate() {
                let raw = adc.read_pin(*pin);
                if raw > peaks[channel] {
                    peaks[channel] = raw;
                }
            }
            samples_taken += 1;

            if self.spacing_ms > 0 {
                self.wait_spacing(clock);
            }
        }

        PeakReading {
            peaks,
            channels: self.pins.len() as u8,
            samples_taken,
        }
    }

    /// Busy-wait one inter-pass gap on the monotonic clock
    fn wait_spacing<C: Clock>(&self, clock: &C) {
        let pass_end = clock.now_ms();
        while elapsed_ms(pass_end, clock.now_ms()) < self.spacing_ms as u64 {}
    }
}
