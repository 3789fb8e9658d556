//! Time-sliced relay actuation
//!
//! Drives a mechanical relay or SSR over a fixed time base: each cycle
//! the actuator is energized for `time_base * duty / 100` and released
//! for the remainder. Turn-on happens at the cycle boundary; turn-off
//! happens on whatever later tick the on-duration elapses.

use thermion_core::traits::ActuationStrategy;

/// Duty values at or below this never energize the relay (percent ×100)
///
/// Sub-1% slices would chatter the contacts without useful heat.
pub const MIN_ENERGIZE_X100: i32 = 100;

/// Trait for on/off switch pins
pub trait SwitchPin {
    /// Drive the pin high
    fn set_high(&mut self);

    /// Drive the pin low
    fn set_low(&mut self);

    /// Check if the pin is driven high
    fn is_set_high(&self) -> bool;
}

/// Relay time-slicing strategy
pub struct RelaySlicer<P> {
    pin: P,
    time_base_ms: u32,
    off_at_ms: u64,
    energized: bool,
}

impl<P: SwitchPin> RelaySlicer<P> {
    /// Create a slicer over `time_base_ms`-long actuation cycles
    pub fn new(mut pin: P, time_base_ms: u32) -> Self {
        pin.set_low();
        Self {
            pin,
            time_base_ms,
            off_at_ms: 0,
            energized: false,
        }
    }

    /// Access the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// On-duration for one cycle at the given duty value
    fn on_duration_ms(&self, duty_x100: i32) -> u64 {
        u64::from(self.time_base_ms) * duty_x100 as u64 / 10_000
    }
}

impl<P: SwitchPin> ActuationStrategy for RelaySlicer<P> {
    fn begin_cycle(&mut self, duty_x100: i32, now_ms: u64) {
        if duty_x100 > MIN_ENERGIZE_X100 {
            self.off_at_ms = now_ms + self.on_duration_ms(duty_x100);
            self.pin.set_high();
            self.energized = true;
        }
        // At or below the floor, any leftover on-duration from the
        // previous cycle still runs out through `service`.
    }

    fn service(&mut self, now_ms: u64) {
        if self.energized && now_ms >= self.off_at_ms {
            self.pin.set_low();
            self.energized = false;
        }
    }

    fn shutdown(&mut self) {
        self.pin.set_low();
        self.energized = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
    }

    impl SwitchPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_starts_released() {
        let slicer = RelaySlicer::new(MockPin { high: true }, 2000);
        assert!(!slicer.pin().is_set_high());
    }

    #[test]
    fn test_half_duty_slices_the_cycle() {
        let mut slicer = RelaySlicer::new(MockPin { high: false }, 2000);

        slicer.begin_cycle(5000, 0);
        assert!(slicer.pin().is_set_high());

        slicer.service(999);
        assert!(slicer.pin().is_set_high());

        slicer.service(1000);
        assert!(!slicer.pin().is_set_high());
    }

    #[test]
    fn test_chatter_floor() {
        let mut slicer = RelaySlicer::new(MockPin { high: false }, 2000);

        slicer.begin_cycle(100, 0);
        assert!(!slicer.pin().is_set_high());

        slicer.begin_cycle(50, 2000);
        assert!(!slicer.pin().is_set_high());
    }

    #[test]
    fn test_full_duty_stays_energized_across_cycles() {
        let mut slicer = RelaySlicer::new(MockPin { high: false }, 2000);

        slicer.begin_cycle(10_000, 0);
        slicer.service(1999);
        assert!(slicer.pin().is_set_high());

        slicer.begin_cycle(10_000, 2000);
        slicer.service(2000);
        assert!(slicer.pin().is_set_high());
    }

    #[test]
    fn test_shutdown_releases_immediately() {
        let mut slicer = RelaySlicer::new(MockPin { high: false }, 2000);
        slicer.begin_cycle(9000, 0);
        assert!(slicer.pin().is_set_high());

        slicer.shutdown();
        assert!(!slicer.pin().is_set_high());

        // A later service tick must not re-energize
        slicer.service(100);
        assert!(!slicer.pin().is_set_high());
    }
}
