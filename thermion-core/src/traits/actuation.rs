//! Actuation strategy seam

/// Trait for duty-to-pin actuation disciplines
///
/// A strategy translates the scalar duty value into pin activity. The
/// control loop computes duty once per cycle and is written against
/// this trait; whether the zone time-slices a relay or drives a
/// continuous analog level is fixed when the zone is constructed.
pub trait ActuationStrategy {
    /// Start a new actuation cycle with the given duty value
    fn begin_cycle(&mut self, duty_x100: i32, now_ms: u64);

    /// Per-tick service step
    ///
    /// Called on every control tick, including between cycle
    /// boundaries. Relay disciplines de-energize here once the
    /// on-duration has elapsed; turn-on and turn-off are decoupled.
    fn service(&mut self, now_ms: u64);

    /// Drop the actuator to its de-energized state immediately
    fn shutdown(&mut self);
}
