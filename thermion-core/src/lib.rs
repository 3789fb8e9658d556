//! Board-agnostic core logic for the Thermion heating-zone controller
//!
//! This crate contains everything that does not depend on specific
//! hardware implementations:
//!
//! - Collaborator seams (temperature source, control algorithm,
//!   actuation strategy, byte store)
//! - Configuration and profile data model with factory defaults
//! - The fixed-slot record store and its on-disk frame
//! - Safety monitoring logic

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod safety;
pub mod traits;
