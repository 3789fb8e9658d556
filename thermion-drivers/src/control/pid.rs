//! PID control algorithm
//!
//! Fixed-point PID producing a duty value bounded by the configured
//! output limits. Gains are per-sample coefficients; the compute step
//! runs on a fixed sample interval, so time scaling folds into the
//! tunings.

use thermion_core::traits::{ControlAlgorithm, Mode};

use super::fixed::Fixed32;

/// Sample interval used until the owner configures one
pub const DEFAULT_SAMPLE_MS: u32 = 100;

/// PID implementation of the control-algorithm seam
///
/// The integral term is clamped to the output limits on every step, so
/// it cannot wind up past anything the actuator could ever deliver.
/// The derivative acts on the error; setpoint steps therefore kick it
/// once, which the clamp absorbs.
pub struct PidControl {
    kp: Fixed32,
    ki: Fixed32,
    kd: Fixed32,
    sample_ms: u32,
    min: Fixed32,
    max: Fixed32,
    mode: Mode,
    integral: Fixed32,
    prev_error_x10: i16,
    last_compute_ms: Option<u64>,
    output: Fixed32,
}

impl Default for PidControl {
    fn default() -> Self {
        Self::new()
    }
}

impl PidControl {
    /// Create a controller with zero gains and a 0–100% output range
    ///
    /// The owning zone configures tunings, limits, and sample time
    /// before the first compute step.
    pub fn new() -> Self {
        Self {
            kp: Fixed32::ZERO,
            ki: Fixed32::ZERO,
            kd: Fixed32::ZERO,
            sample_ms: DEFAULT_SAMPLE_MS,
            min: Fixed32::ZERO,
            max: Fixed32::from_int(10_000),
            mode: Mode::Automatic,
            integral: Fixed32::ZERO,
            prev_error_x10: 0,
            last_compute_ms: None,
            output: Fixed32::ZERO,
        }
    }

    /// Last computed duty value (percent ×100)
    pub fn output_x100(&self) -> i32 {
        self.output.to_scaled_100()
    }

    fn reset_state(&mut self) {
        self.integral = Fixed32::ZERO;
        self.prev_error_x10 = 0;
        self.last_compute_ms = None;
    }
}

impl ControlAlgorithm for PidControl {
    fn set_sample_time(&mut self, ms: u32) {
        self.sample_ms = ms;
    }

    fn set_tunings(&mut self, kp_x100: i32, ki_x100: i32, kd_x100: i32) {
        self.kp = Fixed32::from_scaled_100(kp_x100);
        self.ki = Fixed32::from_scaled_100(ki_x100);
        self.kd = Fixed32::from_scaled_100(kd_x100);
    }

    fn set_output_limits(&mut self, min_x100: i32, max_x100: i32) {
        self.min = Fixed32::from_scaled_100(min_x100);
        self.max = Fixed32::from_scaled_100(max_x100);
        self.integral = self.integral.clamp(self.min, self.max);
        self.output = self.output.clamp(self.min, self.max);
    }

    fn set_mode(&mut self, mode: Mode) {
        // Re-entering automatic control starts from a clean integral
        // so stale windup cannot slam the actuator
        if mode == Mode::Automatic && self.mode == Mode::Manual {
            self.reset_state();
        }
        self.mode = mode;
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn compute(&mut self, input_x10: i16, setpoint_x10: i16, now_ms: u64) -> Option<i32> {
        if self.mode == Mode::Manual {
            return None;
        }
        if let Some(last) = self.last_compute_ms {
            if now_ms.saturating_sub(last) < u64::from(self.sample_ms) {
                return None;
            }
        }
        self.last_compute_ms = Some(now_ms);

        let error_x10 = setpoint_x10.saturating_sub(input_x10);
        let error = Fixed32::from_int(error_x10);

        let p_term = self.kp.mul(error);

        self.integral = self
            .integral
            .saturating_add(self.ki.mul(error))
            .clamp(self.min, self.max);

        let d_error = error_x10 - self.prev_error_x10;
        let d_term = self.kd.mul(Fixed32::from_int(d_error));
        self.prev_error_x10 = error_x10;

        self.output = p_term
            .saturating_add(self.integral)
            .saturating_add(d_term)
            .clamp(self.min, self.max);

        Some(self.output.to_scaled_100())
    }
}
