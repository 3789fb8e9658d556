//! embedded-hal pin adapters
//!
//! Wrappers that let `embedded-hal` 1.0 pin implementations drive the
//! crate-local pin seams. Only infallible pins are accepted; a board
//! whose pin errors carry real information should implement
//! [`SwitchPin`]/[`PwmPin`] directly and handle them there.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use super::pwm::{PwmPin, LEVEL_MAX};
use super::relay::SwitchPin;

/// [`SwitchPin`] over an infallible `embedded-hal` output pin
pub struct HalSwitch<P> {
    pin: P,
    high: bool,
}

impl<P: OutputPin<Error = Infallible>> HalSwitch<P> {
    /// Wrap `pin`, driving it low first
    pub fn new(mut pin: P) -> Self {
        let _ = pin.set_low();
        Self { pin, high: false }
    }
}

impl<P: OutputPin<Error = Infallible>> SwitchPin for HalSwitch<P> {
    fn set_high(&mut self) {
        let _ = self.pin.set_high();
        self.high = true;
    }

    fn set_low(&mut self) {
        let _ = self.pin.set_low();
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// [`PwmPin`] over an infallible `embedded-hal` PWM channel
pub struct HalPwm<P> {
    pin: P,
    level: u8,
}

impl<P: SetDutyCycle<Error = Infallible>> HalPwm<P> {
    /// Wrap `pin`; the level is applied on the first `set_level` call
    pub fn new(pin: P) -> Self {
        Self { pin, level: 0 }
    }
}

impl<P: SetDutyCycle<Error = Infallible>> PwmPin for HalPwm<P> {
    fn set_level(&mut self, level: u8) {
        let _ = self
            .pin
            .set_duty_cycle_fraction(u16::from(level), u16::from(LEVEL_MAX));
        self.level = level;
    }

    fn level(&self) -> u8 {
        self.level
    }
}
