//! Zone heater controller
//!
//! Owns one zone's actuation state and orchestrates the control tick:
//! sample the temperature source, run the control algorithm at cycle
//! boundaries, hand the duty value to the actuation strategy. Duty is
//! computed by the algorithm and applied by the strategy; keeping
//! those apart lets a fast analog output and a slow mechanical relay
//! share one control loop.
//!
//! The owner picks the strategy from [`Discipline`] when wiring the
//! zone up: [`super::RelaySlicer`] for `Relay`, [`super::PwmOutput`]
//! for `Pwm`.
//!
//! [`Discipline`]: thermion_core::config::Discipline

use thermion_core::config::HeatingZoneConfig;
use thermion_core::traits::{ActuationStrategy, ControlAlgorithm, Mode, TemperatureSource};

/// Compute interval for continuous-PWM zones, whose time base is zero
const PWM_SAMPLE_MS: u32 = 100;

/// Closed-loop controller for one heating zone
///
/// Generic over its three collaborators; the zone config supplies only
/// numbers, taken as a snapshot at construction and updated through
/// explicit setters afterwards.
pub struct ZoneHeater<T, C, A> {
    source: T,
    control: C,
    actuation: A,
    time_base_ms: u32,
    cycle_start_ms: Option<u64>,
    duty_x100: i32,
    min_duty_x100: i32,
    max_duty_x100: i32,
    setpoint_x10: i16,
}

impl<T, C, A> ZoneHeater<T, C, A>
where
    T: TemperatureSource,
    C: ControlAlgorithm,
    A: ActuationStrategy,
{
    /// Create a controller configured from one zone's calibration
    pub fn new(source: T, mut control: C, actuation: A, zone: &HeatingZoneConfig) -> Self {
        let min_duty_x100 = i32::from(zone.min_duty_pct) * 100;
        let max_duty_x100 = i32::from(zone.max_duty_pct) * 100;

        let sample_ms = if zone.time_base_ms > 0 {
            zone.time_base_ms
        } else {
            PWM_SAMPLE_MS
        };
        control.set_sample_time(sample_ms);
        control.set_tunings(zone.kp_x100, zone.ki_x100, zone.kd_x100);
        control.set_output_limits(min_duty_x100, max_duty_x100);
        control.set_mode(Mode::Automatic);

        Self {
            source,
            control,
            actuation,
            time_base_ms: zone.time_base_ms,
            cycle_start_ms: None,
            duty_x100: 0,
            min_duty_x100,
            max_duty_x100,
            setpoint_x10: zone.set_temp_x10,
        }
    }

    /// Run one control tick
    ///
    /// Call much faster than the time base. The source is sampled on
    /// every tick so the control algorithm always has fresh input,
    /// even while the actuator idles between cycles; the strategy is
    /// serviced on every tick so a relay turn-off can land between
    /// cycle boundaries.
    pub fn activate(&mut self, now_ms: u64) {
        self.source.sample();

        let boundary = match self.cycle_start_ms {
            Some(start) => now_ms.saturating_sub(start) >= u64::from(self.time_base_ms),
            None => true,
        };
        if boundary {
            self.cycle_start_ms = Some(now_ms);
            if let Some(duty) =
                self.control
                    .compute(self.source.temperature_x10(), self.setpoint_x10, now_ms)
            {
                self.duty_x100 = duty;
            }
            self.actuation.begin_cycle(self.duty_x100, now_ms);
        }

        self.actuation.service(now_ms);
    }

    /// Sample the temperature source without touching the actuator
    ///
    /// For states where the zone must keep reporting temperature while
    /// deliberately inactive, e.g. cooling down.
    pub fn sample_temp(&mut self) {
        self.source.sample();
    }

    /// Command the duty cycle directly
    ///
    /// Forces manual mode, suspending the control algorithm until the
    /// mode is restored, and clamps the value into the configured
    /// bounds. The new duty takes effect at the next cycle boundary.
    pub fn set_duty_cycle(&mut self, duty_x100: i32) {
        if self.control.mode() == Mode::Automatic {
            self.control.set_mode(Mode::Manual);
        }
        self.duty_x100 = duty_x100.clamp(self.min_duty_x100, self.max_duty_x100);
    }

    /// Safety override: manual mode, zero duty, actuator released now
    ///
    /// Independent of the cycle timer.
    pub fn off(&mut self) {
        self.control.set_mode(Mode::Manual);
        self.duty_x100 = 0;
        self.actuation.shutdown();
    }

    /// Pass-through to the control algorithm's mode
    pub fn set_mode(&mut self, mode: Mode) {
        self.control.set_mode(mode);
    }

    /// Current operating mode
    pub fn mode(&self) -> Mode {
        self.control.mode()
    }

    /// Current duty value (percent ×100)
    pub fn duty_cycle(&self) -> i32 {
        self.duty_x100
    }

    /// Current calibrated temperature (°C ×10)
    pub fn temperature_x10(&self) -> i16 {
        self.source.temperature_x10()
    }

    /// Current raw sensor sample
    pub fn raw(&self) -> u16 {
        self.source.raw()
    }

    /// Update the setpoint snapshot (°C ×10)
    pub fn set_setpoint(&mut self, setpoint_x10: i16) {
        self.setpoint_x10 = setpoint_x10;
    }

    /// Current setpoint (°C ×10)
    pub fn setpoint_x10(&self) -> i16 {
        self.setpoint_x10
    }

    /// Access the underlying temperature source
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Access the underlying actuation strategy
    pub fn actuation(&self) -> &A {
        &self.actuation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heater::pwm::{PwmOutput, PwmPin};
    use crate::heater::relay::{RelaySlicer, SwitchPin};
    use proptest::prelude::*;

    struct MockSource {
        temp_x10: i16,
        raw: u16,
        samples: u32,
    }

    impl MockSource {
        fn at(temp_x10: i16) -> Self {
            Self {
                temp_x10,
                raw: 512,
                samples: 0,
            }
        }
    }

    impl TemperatureSource for MockSource {
        fn sample(&mut self) {
            self.samples += 1;
        }

        fn temperature_x10(&self) -> i16 {
            self.temp_x10
        }

        fn raw(&self) -> u16 {
            self.raw
        }
    }

    /// Control stub that always proposes the same duty while automatic
    struct FixedControl {
        mode: Mode,
        duty_x100: i32,
        computes: u32,
    }

    impl FixedControl {
        fn duty(duty_x100: i32) -> Self {
            Self {
                mode: Mode::Automatic,
                duty_x100,
                computes: 0,
            }
        }
    }

    impl ControlAlgorithm for FixedControl {
        fn set_sample_time(&mut self, _ms: u32) {}

        fn set_tunings(&mut self, _kp_x100: i32, _ki_x100: i32, _kd_x100: i32) {}

        fn set_output_limits(&mut self, _min_x100: i32, _max_x100: i32) {}

        fn set_mode(&mut self, mode: Mode) {
            self.mode = mode;
        }

        fn mode(&self) -> Mode {
            self.mode
        }

        fn compute(&mut self, _input_x10: i16, _setpoint_x10: i16, _now_ms: u64) -> Option<i32> {
            if self.mode == Mode::Manual {
                return None;
            }
            self.computes += 1;
            Some(self.duty_x100)
        }
    }

    struct MockSwitch {
        high: bool,
    }

    impl SwitchPin for MockSwitch {
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

    struct MockAnalog {
        level: u8,
    }

    impl PwmPin for MockAnalog {
        fn set_level(&mut self, level: u8) {
            self.level = level;
        }

        fn level(&self) -> u8 {
            self.level
        }
    }

    fn relay_zone(time_base_ms: u32) -> HeatingZoneConfig {
        HeatingZoneConfig {
            time_base_ms,
            discipline: thermion_core::config::Discipline::Relay,
            ..HeatingZoneConfig::default()
        }
    }

    fn relay_heater(
        duty_x100: i32,
        time_base_ms: u32,
    ) -> ZoneHeater<MockSource, FixedControl, RelaySlicer<MockSwitch>> {
        let zone = relay_zone(time_base_ms);
        ZoneHeater::new(
            MockSource::at(1800),
            FixedControl::duty(duty_x100),
            RelaySlicer::new(MockSwitch { high: false }, zone.time_base_ms),
            &zone,
        )
    }

    #[test]
    fn test_relay_half_duty_timing_across_cycles() {
        let mut heater = relay_heater(5000, 2000);

        // 2000ms time base at 50%: energized for exactly the first
        // 1000ms of each cycle, three cycles straight
        for now in (0..6000).step_by(100) {
            heater.activate(now);
            let expect_on = now % 2000 < 1000;
            assert_eq!(
                heater.actuation().pin().is_set_high(),
                expect_on,
                "at t={now}"
            );
        }
    }

    #[test]
    fn test_relay_low_duty_never_energizes() {
        let mut heater = relay_heater(100, 2000);

        for now in (0..6000).step_by(50) {
            heater.activate(now);
            assert!(!heater.actuation().pin().is_set_high(), "at t={now}");
        }
    }

    #[test]
    fn test_samples_every_tick_even_between_cycles() {
        let mut heater = relay_heater(5000, 2000);

        for now in (0..4000).step_by(100) {
            heater.activate(now);
        }
        assert_eq!(heater.source().samples, 40);
        // Only the two cycle boundaries computed
        assert_eq!(heater.control.computes, 2);
    }

    #[test]
    fn test_pwm_level_tracks_duty_every_cycle() {
        let zone = HeatingZoneConfig {
            time_base_ms: 0,
            ..HeatingZoneConfig::default()
        };
        let mut heater = ZoneHeater::new(
            MockSource::at(1800),
            FixedControl::duty(7500),
            PwmOutput::new(MockAnalog { level: 0 }),
            &zone,
        );

        heater.activate(0);
        assert_eq!(heater.actuation().pin().level(), 191);

        heater.control.duty_x100 = 2500;
        heater.activate(100);
        assert_eq!(heater.actuation().pin().level(), 63);
    }

    #[test]
    fn test_set_duty_cycle_clamps_and_forces_manual() {
        let mut heater = relay_heater(0, 2000);
        assert_eq!(heater.mode(), Mode::Automatic);

        heater.set_duty_cycle(15_000);
        assert_eq!(heater.mode(), Mode::Manual);
        assert_eq!(heater.duty_cycle(), 10_000);

        heater.set_duty_cycle(-500);
        assert_eq!(heater.duty_cycle(), 0);
    }

    #[test]
    fn test_narrow_clamp_bounds() {
        let zone = HeatingZoneConfig {
            min_duty_pct: 20,
            max_duty_pct: 90,
            ..relay_zone(2000)
        };
        let mut heater = ZoneHeater::new(
            MockSource::at(1800),
            FixedControl::duty(0),
            RelaySlicer::new(MockSwitch { high: false }, 2000),
            &zone,
        );

        heater.set_duty_cycle(500);
        assert_eq!(heater.duty_cycle(), 2000);

        heater.set_duty_cycle(9500);
        assert_eq!(heater.duty_cycle(), 9000);
    }

    #[test]
    fn test_manual_mode_freezes_duty_against_the_algorithm() {
        let mut heater = relay_heater(4000, 2000);
        heater.activate(0);
        assert_eq!(heater.duty_cycle(), 4000);

        heater.set_mode(Mode::Manual);
        for now in (2000..10_000).step_by(500) {
            heater.activate(now);
        }
        // The algorithm kept its opinion, but manual duty stands
        assert_eq!(heater.duty_cycle(), 4000);

        heater.set_duty_cycle(1500);
        for now in (10_000..14_000).step_by(500) {
            heater.activate(now);
        }
        assert_eq!(heater.duty_cycle(), 1500);
    }

    #[test]
    fn test_off_releases_mid_cycle() {
        let mut heater = relay_heater(8000, 2000);
        heater.activate(0);
        assert!(heater.actuation().pin().is_set_high());

        // Mid-cycle, well before the on-duration elapses
        heater.off();
        assert!(!heater.actuation().pin().is_set_high());
        assert_eq!(heater.mode(), Mode::Manual);
        assert_eq!(heater.duty_cycle(), 0);
    }

    #[test]
    fn test_sample_temp_leaves_actuator_alone() {
        let mut heater = relay_heater(9000, 2000);
        for _ in 0..5 {
            heater.sample_temp();
        }
        assert_eq!(heater.source().samples, 5);
        assert!(!heater.actuation().pin().is_set_high());
        assert_eq!(heater.control.computes, 0);
    }

    #[test]
    fn test_introspection_reflects_source() {
        let heater = relay_heater(0, 2000);
        assert_eq!(heater.temperature_x10(), 1800);
        assert_eq!(heater.raw(), 512);
    }

    #[test]
    fn test_setpoint_snapshot_updates_by_setter_only() {
        let mut heater = relay_heater(0, 2000);
        assert_eq!(heater.setpoint_x10(), 0);
        heater.set_setpoint(2350);
        assert_eq!(heater.setpoint_x10(), 2350);
    }

    proptest! {
        #[test]
        fn prop_commanded_duty_always_within_bounds(duty in -50_000i32..50_000) {
            let mut heater = relay_heater(0, 2000);
            heater.set_duty_cycle(duty);
            prop_assert!(heater.duty_cycle() >= 0);
            prop_assert!(heater.duty_cycle() <= 10_000);
        }
    }
}
