//! Continuous PWM actuation
//!
//! Sets the analog output level to the duty value at every cycle
//! boundary. The level itself encodes "off", so there is no separate
//! de-energize step and no on/off timing.

use thermion_core::traits::ActuationStrategy;

/// Full-scale analog output level
pub const LEVEL_MAX: u8 = 255;

/// Trait for analog-level (PWM) output pins
pub trait PwmPin {
    /// Set the output level (0 = off, [`LEVEL_MAX`] = full scale)
    fn set_level(&mut self, level: u8);

    /// Current output level
    fn level(&self) -> u8;
}

/// Map a duty percentage (×100) onto the analog level range
pub fn duty_to_level(duty_x100: i32) -> u8 {
    (duty_x100.clamp(0, 10_000) * i32::from(LEVEL_MAX) / 10_000) as u8
}

/// Continuous PWM strategy
pub struct PwmOutput<P> {
    pin: P,
}

impl<P: PwmPin> PwmOutput<P> {
    /// Create a PWM strategy with the output level at zero
    pub fn new(mut pin: P) -> Self {
        pin.set_level(0);
        Self { pin }
    }

    /// Access the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }
}

impl<P: PwmPin> ActuationStrategy for PwmOutput<P> {
    fn begin_cycle(&mut self, duty_x100: i32, _now_ms: u64) {
        self.pin.set_level(duty_to_level(duty_x100));
    }

    fn service(&mut self, _now_ms: u64) {}

    fn shutdown(&mut self) {
        self.pin.set_level(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        level: u8,
    }

    impl PwmPin for MockPin {
        fn set_level(&mut self, level: u8) {
            self.level = level;
        }

        fn level(&self) -> u8 {
            self.level
        }
    }

    #[test]
    fn test_duty_to_level_endpoints() {
        assert_eq!(duty_to_level(0), 0);
        assert_eq!(duty_to_level(10_000), LEVEL_MAX);
        assert_eq!(duty_to_level(5000), 127);
        // Out-of-range inputs saturate
        assert_eq!(duty_to_level(-500), 0);
        assert_eq!(duty_to_level(20_000), LEVEL_MAX);
    }

    #[test]
    fn test_level_tracks_duty() {
        let mut out = PwmOutput::new(MockPin { level: 99 });
        assert_eq!(out.pin().level(), 0);

        out.begin_cycle(7500, 0);
        assert_eq!(out.pin().level(), 191);

        out.begin_cycle(2500, 2000);
        assert_eq!(out.pin().level(), 63);
    }

    #[test]
    fn test_service_is_inert() {
        let mut out = PwmOutput::new(MockPin { level: 0 });
        out.begin_cycle(5000, 0);
        out.service(10_000);
        assert_eq!(out.pin().level(), 127);
    }

    #[test]
    fn test_shutdown_zeroes_the_level() {
        let mut out = PwmOutput::new(MockPin { level: 0 });
        out.begin_cycle(9000, 0);
        out.shutdown();
        assert_eq!(out.pin().level(), 0);
    }
}
