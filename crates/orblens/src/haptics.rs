//! Fire-and-forget haptic feedback sink.

/// No return value, no failure surfaced; implementations decide what a
/// pulse means on their platform.
pub trait HapticSink {
    fn pulse(&self);
}

/// Desktop stand-in: a pulse is just a log line.
pub struct LogHaptics;

impl HapticSink for LogHaptics {
    fn pulse(&self) {
        tracing::debug!("haptic pulse");
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::Cell;

    use super::HapticSink;

    /// Counts pulses for assertions.
    #[derive(Default)]
    pub struct CountingHaptics {
        pulses: Cell<u32>,
    }

    impl CountingHaptics {
        pub fn pulses(&self) -> u32 {
            self.pulses.get()
        }
    }

    impl HapticSink for CountingHaptics {
        fn pulse(&self) {
            self.pulses.set(self.pulses.get() + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use glam::Vec2;

    use gesture::{GestureCoordinator, GestureThresholds};

    use super::testing::CountingHaptics;
    use super::HapticSink;

    #[test]
    fn page_advance_reaches_the_sink_exactly_once() {
        let mut coordinator = GestureCoordinator::new(GestureThresholds::default());
        let haptics = CountingHaptics::default();

        let decisions = coordinator.update(Vec2::new(70.0, 5.0), true, Instant::now());
        assert_eq!(decisions.page_advance, Some(1));
        for _ in 0..decisions.haptic_pulses {
            haptics.pulse();
        }
        assert_eq!(haptics.pulses(), 1);
    }
}
