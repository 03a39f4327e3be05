//! Display capability seam
//!
//! Some units carry a numeric seven-segment module, one has a small
//! OLED, most have nothing. The core only knows this trait; concrete
//! drivers live with the host. Rendering is pull-based: the host calls
//! `VibrationMonitor::render` once per loop with whatever sink it has.

/// Something that can show the current activity level
pub trait DisplaySink {
    /// Show the current normalized window maximum
    fn show_level(&mut self, level: u16);

    /// Blank the display, e.g. when leaving an active window
    fn clear(&mut self) {}
}

/// Display for units without one
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDisplay;

impl DisplaySink for NoOpDisplay {
    fn show_level(&mut self, _level: u16) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Remembers the last level shown
    #[derive(Default)]
    pub struct RecordingDisplay {
        pub last_level: Option<u16>,
        pub cleared: bool,
    }

    impl DisplaySink for RecordingDisplay {
        fn show_level(&mut self, level: u16) {
            self.last_level = Some(level);
        }

        fn clear(&mut self) {
            self.cleared = true;
        }
    }
}
