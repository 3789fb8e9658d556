//! Driver implementations for the Thermion heating-zone controller
//!
//! Concrete implementations of the seams defined in `thermion-core`:
//!
//! - Zone heater controller (cycle timing, manual override, safety off)
//! - Actuation strategies (continuous PWM, time-sliced relay)
//! - PID control algorithm
//! - Pin adapters (crate-local traits and embedded-hal 1.0 wrappers)

#![no_std]
#![deny(unsafe_code)]

pub mod control;
pub mod heater;
