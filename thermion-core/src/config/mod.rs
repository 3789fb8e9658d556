//! Configuration and profile persistence
//!
//! Data model for the physical device calibration and operator
//! profiles, plus the fixed-slot record store that persists them.

pub mod store;
pub mod types;

pub use store::{ConfigStore, StoreError};
pub use types::*;
