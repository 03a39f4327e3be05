//! ADC read seam
//!
//! The pipeline never touches hardware registers directly; the host
//! supplies an [`AdcReader`] backed by whatever converter the platform
//! has. Reads are blocking by contract - the control loop owns the CPU
//! for the whole sampling window anyway (see the sampler module).

/// Analog input pin identifier
///
/// Plain channel number; the mapping to physical pads is the host's
/// business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin(pub u8);

/// Blocking analog-to-digital converter access
///
/// ## Implementation Requirements
///
/// - `read_pin` returns a raw reading in `0..=ADC_MAX`
/// - A read must complete in well under the sampler's inter-pass
///   spacing, or the sample count for a window drops
pub trait AdcReader {
    /// Read one raw sample from `pin`
    fn read_pin(&mut self, pin: Pin) -> u16;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Replays a fixed per-pin value, counting reads
    pub struct ConstantAdc {
        pub value: u16,
        pub reads: u32,
    }

    impl ConstantAdc {
        pub fn new(value: u16) -> Self {
            Self { value, reads: 0 }
        }
    }

    impl AdcReader for ConstantAdc {
        fn read_pin(&mut self, _pin: Pin) -> u16 {
            self.reads += 1;
            self.value
        }
    }

    /// Replays a scripted sequence, then holds the last value
    pub struct SequenceAdc {
        values: &'static [u16],
        cursor: usize,
    }

    impl SequenceAdc {
        pub fn new(values: &'static [u16]) -> Self {
            Self { values, cursor: 0 }
        }
    }

    impl AdcReader for SequenceAdc {
        fn read_pin(&mut self, _pin: Pin) -> u16 {
            let value = self.values[self.cursor.min(self.values.len() - 1)];
            self.cursor += 1;
            value
        }
    }
}
