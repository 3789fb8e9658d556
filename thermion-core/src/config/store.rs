//! Fixed-slot record store
//!
//! Persists the physical configuration and up to ten named profiles at
//! fixed offsets in a byte-addressed non-volatile store:
//!
//! ```text
//! [config slot][profile slot 0][profile slot 1] .. [profile slot 9]
//! ```
//!
//! Slot sizes are explicit constants, so the on-disk layout never
//! depends on in-memory struct layout. Each record is framed with an
//! occupancy magic, a layout version, a payload length, and a CRC32,
//! which makes vacant slots, stale layouts, and torn writes all
//! detectable on read.

use heapless::String;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::{PhysicalConfig, Profile, MAX_NAME_LEN, PROFILE_SLOTS};
use crate::traits::ByteStore;

/// Marks a slot as occupied; erased or deleted slots never match
pub const RECORD_MAGIC: u8 = 0xA5;

/// On-disk layout version, bumped on any frame or payload change
pub const LAYOUT_VERSION: u8 = 1;

/// Frame header: magic, version, payload length (u16 LE)
const HEADER_LEN: usize = 4;

/// CRC32 trailer length
const CRC_LEN: usize = 4;

/// Slot reserved for the physical configuration record
pub const CONFIG_SLOT_SIZE: usize = 128;

/// Slot size for one profile record
pub const PROFILE_SLOT_SIZE: usize = 64;

/// Byte offset of profile slot `slot`
pub const fn profile_offset(slot: usize) -> usize {
    CONFIG_SLOT_SIZE + slot * PROFILE_SLOT_SIZE
}

/// Errors from record store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Slot index outside `[0, PROFILE_SLOTS)`, or profile unassigned
    InvalidSlot,
    /// Slot is not occupied
    Vacant,
    /// Record was written under a different layout version
    VersionMismatch,
    /// Frame or payload failed validation
    Corrupted,
    /// Decoded record failed its range checks
    InvalidData,
    /// Record does not fit its slot
    Overflow,
}

/// Fixed-slot configuration and profile store
///
/// Exclusively owns the single in-memory [`PhysicalConfig`] and the
/// active [`Profile`]. The heater controller receives snapshots of
/// these values through the orchestrator and never touches storage.
/// Storage access happens at startup and on operator action, never
/// inside the control tick.
pub struct ConfigStore<S> {
    store: S,
    physical: PhysicalConfig,
    profile: Profile,
}

impl<S: ByteStore> ConfigStore<S> {
    /// Create a store seeded with factory defaults
    pub fn new(store: S) -> Self {
        Self {
            store,
            physical: PhysicalConfig::default(),
            profile: Profile::default(),
        }
    }

    /// The in-memory physical configuration
    pub fn physical(&self) -> &PhysicalConfig {
        &self.physical
    }

    /// Mutable access to the physical configuration
    pub fn physical_mut(&mut self) -> &mut PhysicalConfig {
        &mut self.physical
    }

    /// The in-memory active profile
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Mutable access to the active profile
    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    /// Consume the store and return the underlying byte store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Reseed the in-memory physical configuration from factory defaults
    pub fn load_default_config(&mut self) {
        self.physical = PhysicalConfig::default();
    }

    /// Reseed the in-memory active profile from factory defaults
    pub fn load_default_profile(&mut self) {
        self.profile = Profile::default();
    }

    /// Persist the physical configuration at the start of storage
    ///
    /// Marks the configuration as stored first, so the persisted
    /// record round-trips with the flag set.
    pub fn save_config(&mut self) -> Result<(), StoreError> {
        self.physical.stored = true;
        let mut slot = [0u8; CONFIG_SLOT_SIZE];
        encode_record(&self.physical, &mut slot)?;
        self.store.write(0, &slot);
        Ok(())
    }

    /// Soft-delete the physical configuration
    ///
    /// Clears the occupancy magic only; the payload bytes stay in
    /// place but are unreachable through `load_config` until re-saved.
    pub fn delete_config(&mut self) {
        self.physical.stored = false;
        self.store.write(0, &[0]);
    }

    /// Load the physical configuration from storage
    ///
    /// The in-memory configuration is replaced only if the frame and
    /// the decoded record's range checks both validate; on any error
    /// it is left untouched so callers can fall back to defaults.
    pub fn load_config(&mut self) -> Result<(), StoreError> {
        let mut slot = [0u8; CONFIG_SLOT_SIZE];
        self.store.read(0, &mut slot);
        let config: PhysicalConfig = decode_record(&slot)?;
        if !config.is_valid() {
            return Err(StoreError::InvalidData);
        }
        self.physical = config;
        Ok(())
    }

    /// Persist the active profile in its assigned slot
    ///
    /// The profile's `slot` must already be in `[0, 9]`; an unassigned
    /// profile has no storage position to write to.
    pub fn save_profile(&mut self) -> Result<(), StoreError> {
        let index = usize::try_from(self.profile.slot).map_err(|_| StoreError::InvalidSlot)?;
        check_slot(index)?;
        let mut slot = [0u8; PROFILE_SLOT_SIZE];
        encode_record(&self.profile, &mut slot)?;
        self.store.write(profile_offset(index), &slot);
        Ok(())
    }

    /// Load the profile in `slot` as the active profile
    pub fn load_profile(&mut self, slot: usize) -> Result<(), StoreError> {
        self.profile = self.read_profile(slot)?;
        Ok(())
    }

    /// Soft-delete the profile in `slot`
    ///
    /// Clears the slot's occupancy magic so it is excluded from name
    /// enumeration and load attempts until re-saved.
    pub fn delete_profile(&mut self, slot: usize) -> Result<(), StoreError> {
        check_slot(slot)?;
        self.store.write(profile_offset(slot), &[0]);
        Ok(())
    }

    /// Read only the display name of the profile in `slot`
    ///
    /// Decodes into a transient record, so the active profile is not
    /// disturbed while a selection menu is being populated.
    pub fn profile_name(&self, slot: usize) -> Result<String<MAX_NAME_LEN>, StoreError> {
        self.read_profile(slot).map(|p| p.name)
    }

    /// Display names for every profile slot
    ///
    /// Visits all [`PROFILE_SLOTS`] slots unconditionally; vacant and
    /// unreadable slots yield `None`.
    pub fn profile_names(&self) -> [Option<String<MAX_NAME_LEN>>; PROFILE_SLOTS] {
        core::array::from_fn(|slot| self.profile_name(slot).ok())
    }

    fn read_profile(&self, slot: usize) -> Result<Profile, StoreError> {
        check_slot(slot)?;
        let mut buf = [0u8; PROFILE_SLOT_SIZE];
        self.store.read(profile_offset(slot), &mut buf);
        decode_record(&buf)
    }
}

fn check_slot(slot: usize) -> Result<(), StoreError> {
    if slot < PROFILE_SLOTS {
        Ok(())
    } else {
        Err(StoreError::InvalidSlot)
    }
}

/// Frame `value` into `slot`: header, postcard payload, CRC32 trailer
fn encode_record<T: Serialize>(value: &T, slot: &mut [u8]) -> Result<(), StoreError> {
    let payload_cap = slot.len() - HEADER_LEN - CRC_LEN;
    let used = {
        let payload = &mut slot[HEADER_LEN..HEADER_LEN + payload_cap];
        postcard::to_slice(value, payload)
            .map_err(|_| StoreError::Overflow)?
            .len()
    };
    slot[0] = RECORD_MAGIC;
    slot[1] = LAYOUT_VERSION;
    slot[2..HEADER_LEN].copy_from_slice(&(used as u16).to_le_bytes());
    let crc = crc32(&slot[..HEADER_LEN + used]);
    slot[HEADER_LEN + used..HEADER_LEN + used + CRC_LEN].copy_from_slice(&crc.to_le_bytes());
    Ok(())
}

/// Validate and decode one record frame
fn decode_record<T: DeserializeOwned>(slot: &[u8]) -> Result<T, StoreError> {
    if slot[0] != RECORD_MAGIC {
        return Err(StoreError::Vacant);
    }
    if slot[1] != LAYOUT_VERSION {
        return Err(StoreError::VersionMismatch);
    }
    let len = u16::from_le_bytes([slot[2], slot[3]]) as usize;
    if HEADER_LEN + len + CRC_LEN > slot.len() {
        return Err(StoreError::Corrupted);
    }
    let mut crc_bytes = [0u8; CRC_LEN];
    crc_bytes.copy_from_slice(&slot[HEADER_LEN + len..HEADER_LEN + len + CRC_LEN]);
    if u32::from_le_bytes(crc_bytes) != crc32(&slot[..HEADER_LEN + len]) {
        return Err(StoreError::Corrupted);
    }
    postcard::from_bytes(&slot[HEADER_LEN..HEADER_LEN + len]).map_err(|_| StoreError::Corrupted)
}

/// CRC32 (IEEE 802.3 polynomial) over a byte slice
fn crc32(data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc: u32 = 0xFFFF_FFFF;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    !crc
}
