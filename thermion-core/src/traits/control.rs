//! Control algorithm seam

/// Controller operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Compute steps produce fresh duty values
    #[default]
    Automatic,
    /// Compute steps are suspended; duty is commanded externally
    Manual,
}

/// Trait for closed-loop control algorithms
///
/// Implementations turn {current value, setpoint, tunings} into a duty
/// value bounded by the configured output limits. Values follow the
/// crate's scaled-integer conventions: temperatures ×10, gains and
/// duty percentages ×100.
pub trait ControlAlgorithm {
    /// Set the minimum interval between compute steps
    fn set_sample_time(&mut self, ms: u32);

    /// Replace the tuning coefficients
    fn set_tunings(&mut self, kp_x100: i32, ki_x100: i32, kd_x100: i32);

    /// Bound the computed output (duty percent ×100)
    fn set_output_limits(&mut self, min_x100: i32, max_x100: i32);

    /// Switch between automatic and manual operation
    fn set_mode(&mut self, mode: Mode);

    /// Current operating mode
    fn mode(&self) -> Mode;

    /// Run one compute step
    ///
    /// Returns the new duty value (percent ×100), or `None` when the
    /// step is a no-op: manual mode, or less than the sample interval
    /// since the previous computation.
    fn compute(&mut self, input_x10: i16, setpoint_x10: i16, now_ms: u64) -> Option<i32>;
}
