//! Heating-zone actuation and control

pub mod hal;
pub mod pwm;
pub mod relay;
pub mod zone;

pub use pwm::{PwmOutput, PwmPin};
pub use relay::{RelaySlicer, SwitchPin};
pub use zone::ZoneHeater;
