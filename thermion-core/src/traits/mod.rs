//! Collaborator seams
//!
//! These traits define the interface between the control and
//! persistence logic and the hardware-specific implementations that
//! back them.

pub mod actuation;
pub mod control;
pub mod sensor;
pub mod storage;

pub use actuation::ActuationStrategy;
pub use control::{ControlAlgorithm, Mode};
pub use sensor::TemperatureSource;
pub use storage::ByteStore;
