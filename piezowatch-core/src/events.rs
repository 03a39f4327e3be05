//! Outbound events and the delivery seam
//!
//! The pipeline's single externally observable effect is a
//! [`VibrationEvent`] handed to an [`EventSink`]. Delivery is
//! fire-and-forget by design: the cloud transport lives outside the
//! core, offers no acknowledgement, and owns any retry policy.

use crate::time::Timestamp;

/// One rate-limited vibration report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VibrationEvent {
    /// Peak normalized level over the closed window
    pub level: u16,
    /// Time since the previous event, `None` for the first
    pub elapsed_since_last_ms: Option<u64>,
    /// When the event was emitted (monotonic ms)
    pub timestamp: Timestamp,
    /// Label of the unit that produced it
    pub location: &'static str,
}

/// Fire-and-forget event delivery
///
/// Implementations must not block the control loop for longer than a
/// sampling pass and have no way to report failure back to the core.
pub trait EventSink {
    /// Hand one event to the transport
    fn publish(&mut self, event: &VibrationEvent);
}

/// Sink that drops every event
///
/// Useful for bench units and tests where only the detector state
/// matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: &VibrationEvent) {}
}

/// Sink that writes events to the log (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[cfg(feature = "std")]
impl EventSink for LogSink {
    fn publish(&mut self, event: &VibrationEvent) {
        log::info!(
            "vibration {} level={} elapsed_since_last_ms={:?}",
            event.location,
            event.level,
            event.elapsed_since_last_ms,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records everything published, for assertions
    #[derive(Default)]
    struct RecordingSink {
        events: std::vec::Vec<VibrationEvent>,
    }

    impl EventSink for RecordingSink {
        fn publish(&mut self, event: &VibrationEvent) {
            self.events.push(*event);
        }
    }

    #[test]
    fn sink_receives_events_as_given() {
        let event = VibrationEvent {
            level: 550,
            elapsed_since_last_ms: Some(5000),
            timestamp: 6000,
            location: "Washer",
        };

        let mut sink = RecordingSink::default();
        sink.publish(&event);
        assert_eq!(sink.events, [event]);

        // Fire-and-forget: the null sink just swallows it
        NullSink.publish(&event);
    }
}
