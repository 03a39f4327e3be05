//! Basic monitoring example
//!
//! Simulates a washer spinning up and winding down and runs the full
//! pipeline against it with a controllable clock, printing every
//! rate-limited event. Run with:
//!
//! ```bash
//! cargo run --example 01_basic_monitoring
//! ```

use piezowatch_core::constants::SLOW_SAMPLE_SPACING_MS;
use piezowatch_core::{
    AdcReader, EventSink, FixedClock, Pin, Sampler, VibrationEvent, VibrationMonitor,
};

/// Piezo disc simulation: quiet, then a noisy spin cycle, then quiet
struct SimulatedWasher {
    reads: u32,
}

impl AdcReader for SimulatedWasher {
    fn read_pin(&mut self, _pin: Pin) -> u16 {
        self.reads += 1;
        let phase = self.reads / 200;
        match phase {
            // Resting noise floor
            0..=2 => 120 + (self.reads % 17) as u16,
            // Spin cycle: strong peaks with jitter
            3..=12 => 600 + (self.reads % 113) as u16,
            // Machine done
            _ => 110 + (self.reads % 13) as u16,
        }
    }
}

/// Stand-in for the cloud delivery collaborator
struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn publish(&mut self, event: &VibrationEvent) {
        println!(
            "[{:>6}ms] {} event: level={} (since last: {:?})",
            event.timestamp, event.location, event.level, event.elapsed_since_last_ms,
        );
    }
}

fn main() {
    println!("PiezoWatch basic monitoring");
    println!("===========================\n");

    // Washer profile from the fleet table
    let mut monitor = VibrationMonitor::for_device(
        "2a004d000f47363331333432",
        Sampler::new(&[Pin(0)]).with_spacing(SLOW_SAMPLE_SPACING_MS),
        0,
    );
    monitor.configure(5, 450).expect("valid configuration");

    // Simulated time: every clock read advances 25ms
    let clock = FixedClock::new(0).with_step_per_read(25);
    let mut adc = SimulatedWasher { reads: 0 };
    let mut sink = ConsoleSink;

    for iteration in 0..60 {
        if let Some(event) = monitor.tick(&mut adc, &clock) {
            sink.publish(&event);
        }

        if iteration % 20 == 0 {
            let snap = monitor.snapshot();
            println!(
                "           state={:?} window_max={} samples/window={}",
                snap.state, snap.window_max, snap.samples_last_window,
            );
        }
    }

    println!("\nFinal snapshot: {:#?}", monitor.snapshot());
}
