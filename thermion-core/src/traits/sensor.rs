//! Temperature source seam
//!
//! The sensing algorithm that turns a raw analog reading into a
//! calibrated temperature lives outside this crate; the control loop
//! depends only on this contract.

/// Trait for temperature sources
///
/// A source owns one zone's sensor and exposes its most recent sample.
/// `sample` must be cheap and safe to call on every control tick; the
/// accessors return whatever the last call produced.
pub trait TemperatureSource {
    /// Take a fresh sensor sample, updating the exposed values
    fn sample(&mut self);

    /// Last calibrated temperature in 0.1 °C units (455 = 45.5 °C)
    fn temperature_x10(&self) -> i16;

    /// Last raw ADC sample
    fn raw(&self) -> u16;
}
