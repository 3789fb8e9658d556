//! Non-volatile byte store seam

/// Trait for byte-addressed non-volatile storage
///
/// The primitive mirrors an EEPROM-style part: offset-addressed reads
/// and writes with no failure signaling of their own. Data integrity
/// is the record layer's job (see [`crate::config::store`]).
pub trait ByteStore {
    /// Write `bytes` starting at `offset`
    fn write(&mut self, offset: usize, bytes: &[u8]);

    /// Fill `buf` from storage starting at `offset`
    fn read(&self, offset: usize, buf: &mut [u8]);
}
