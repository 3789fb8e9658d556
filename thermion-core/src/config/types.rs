//! Configuration and profile type definitions
//!
//! These types describe the physical device and the operator's
//! recipes. They persist as framed postcard payloads (see [`super::store`]),
//! never as raw in-memory dumps. Factory defaults live in the `Default`
//! impls and are plain data, adjustable without touching any logic.

use heapless::String;
use serde::{Deserialize, Serialize};

/// Maximum profile display-name length
pub const MAX_NAME_LEN: usize = 20;

/// Number of profile slots in storage
pub const PROFILE_SLOTS: usize = 10;

/// Slot value of a profile not yet assigned a storage position
pub const UNASSIGNED_SLOT: i8 = -1;

/// Sanity ceiling for any persisted max-temperature value (°C ×10)
///
/// A corrupted record must never hand the control loop a ceiling above
/// what the hardware could survive.
pub const MAX_CEILING_X10: i16 = 4000;

/// Actuation discipline for a heating zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Discipline {
    /// Continuous analog output; the level itself encodes "off"
    #[default]
    Pwm,
    /// Time-sliced on/off switching over a fixed time base
    Relay,
}

/// Thermistor wiring and linearization inputs
///
/// Consumed by the temperature-source collaborator; carried here so
/// one record captures the whole zone calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThermistorConfig {
    /// ADC pin the thermistor divider is wired to
    pub pin: u8,
    /// Nominal resistance at the nominal temperature (ohms)
    pub r_nominal_ohms: u32,
    /// Nominal temperature (°C ×10)
    pub t_nominal_x10: i16,
    /// Series resistor in the divider (ohms)
    pub series_resistor_ohms: u32,
    /// Beta coefficient
    pub beta: u16,
    /// Samples averaged per reading
    pub samples: u8,
}

impl Default for ThermistorConfig {
    fn default() -> Self {
        Self {
            pin: 6,
            r_nominal_ohms: 100_000,
            t_nominal_x10: 250,
            series_resistor_ohms: 1_000,
            beta: 3950,
            samples: 20,
        }
    }
}

/// One heating zone's physical calibration and tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeatingZoneConfig {
    /// Output pin driving the heater (relay coil or PWM-capable)
    pub heater_pin: u8,
    /// Output pin driving the cooling device
    pub cooler_pin: u8,
    /// Thermistor parameters
    pub thermistor: ThermistorConfig,
    /// Proportional gain ×100
    pub kp_x100: i32,
    /// Integral gain ×100
    pub ki_x100: i32,
    /// Derivative gain ×100
    pub kd_x100: i32,
    /// Actuation cycle duration in ms; 0 selects continuous PWM
    pub time_base_ms: u32,
    /// Lower duty-cycle clamp bound (percent)
    pub min_duty_pct: u8,
    /// Upper duty-cycle clamp bound (percent)
    pub max_duty_pct: u8,
    /// Actuation discipline
    pub discipline: Discipline,
    /// Zone has active cooling fitted
    pub active_cooling: bool,
    /// Current setpoint (°C ×10)
    pub set_temp_x10: i16,
}

impl HeatingZoneConfig {
    /// Check the duty clamp invariant: `0 ≤ min ≤ max ≤ 100`
    pub fn is_valid(&self) -> bool {
        self.min_duty_pct <= self.max_duty_pct && self.max_duty_pct <= 100
    }
}

impl Default for HeatingZoneConfig {
    fn default() -> Self {
        Self {
            heater_pin: 12,
            cooler_pin: 13,
            thermistor: ThermistorConfig::default(),
            kp_x100: 340,
            ki_x100: 15,
            kd_x100: 0,
            time_base_ms: 2000,
            min_duty_pct: 0,
            max_duty_pct: 100,
            discipline: Discipline::Pwm,
            active_cooling: false,
            set_temp_x10: 0,
        }
    }
}

/// Physical setup of the whole device
///
/// Calibration and tuning for the hardware itself, independent of any
/// profile. Created with factory defaults at startup, replaced by
/// `load_config`, persisted by `save_config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhysicalConfig {
    /// Mirrors the storage slot's occupancy state
    pub stored: bool,
    /// Load the persisted configuration automatically at boot
    pub load_automatically: bool,
    /// Heating zone 1
    pub zone1: HeatingZoneConfig,
    /// Global ceiling no heater may exceed (°C ×10)
    pub max_temp_x10: i16,
}

impl PhysicalConfig {
    /// Range-check a (possibly just decoded) configuration
    pub fn is_valid(&self) -> bool {
        self.zone1.is_valid() && self.max_temp_x10 > 0 && self.max_temp_x10 <= MAX_CEILING_X10
    }
}

impl Default for PhysicalConfig {
    fn default() -> Self {
        Self {
            stored: false,
            load_automatically: false,
            zone1: HeatingZoneConfig::default(),
            max_temp_x10: 2800,
        }
    }
}

/// A named operating recipe
///
/// Target temperatures and safety limits the operator selects, as
/// opposed to the physical calibration above. Exactly one profile is
/// active in memory; up to [`PROFILE_SLOTS`] live in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Profile {
    /// Storage slot 0–9, or [`UNASSIGNED_SLOT`] for a transient profile
    pub slot: i8,
    /// Display name
    pub name: String<MAX_NAME_LEN>,
    /// Zone 1 setpoint while coming up to temperature (°C ×10)
    pub zone1_initial_set_temp_x10: i16,
    /// Zone 1 steady-state setpoint (°C ×10)
    pub zone1_set_temp_x10: i16,
    /// Minimum safe extrusion temperature (°C ×10)
    pub min_extrude_temp_x10: i16,
    /// Absolute ceiling for any zone under this profile (°C ×10)
    pub max_temp_x10: i16,
    /// Longest allowed preheat before the profile is abandoned (ms)
    pub max_preheat_ms: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            slot: UNASSIGNED_SLOT,
            name: String::try_from("PET 1.85mm").unwrap_or_default(),
            zone1_initial_set_temp_x10: 0,
            zone1_set_temp_x10: 1000,
            min_extrude_temp_x10: 1600,
            max_temp_x10: 2850,
            max_preheat_ms: 600_000,
        }
    }
}
