//! In-memory implementation of the Medium trait.
//!
//! This is primarily for testing. It has the same semantics as a physical
//! EEPROM but keeps everything in a byte vector with no persistence.

use crate::error::{Result, StoreError};
use crate::traits::Medium;
use crate::ERASED_BYTE;

/// In-memory medium.
///
/// Counts the bytes that actually changed so tests can reason about wear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryMedium {
    bytes: Vec<u8>,
    writes: u64,
}

impl MemoryMedium {
    /// Zero-filled medium.
    pub fn new(capacity: usize) -> Self {
        Self::from_bytes(vec![0; capacity])
    }

    /// Medium filled with [`ERASED_BYTE`], like a factory-fresh EEPROM.
    pub fn erased(capacity: usize) -> Self {
        Self::from_bytes(vec![ERASED_BYTE; capacity])
    }

    /// Wrap an existing image.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes, writes: 0 }
    }

    /// Raw view of the whole medium.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable raw view, bypassing the write counter. Used to simulate
    /// corruption.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of bytes changed through [`Medium::write_if_changed`].
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    pub fn reset_write_count(&mut self) {
        self.writes = 0;
    }

    fn check(&self, addr: usize) -> Result<()> {
        if addr < self.bytes.len() {
            Ok(())
        } else {
            Err(StoreError::OutOfBounds {
                addr,
                capacity: self.bytes.len(),
            })
        }
    }
}

impl Medium for MemoryMedium {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn read_byte(&mut self, addr: usize) -> Result<u8> {
        self.check(addr)?;
        Ok(self.bytes[addr])
    }

    fn write_if_changed(&mut self, addr: usize, byte: u8) -> Result<()> {
        self.check(addr)?;
        if self.bytes[addr] != byte {
            self.bytes[addr] = byte;
            self.writes += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_medium_basic() {
        let mut medium = MemoryMedium::new(8);
        medium.write_if_changed(3, 0xAB).unwrap();
        assert_eq!(medium.read_byte(3).unwrap(), 0xAB);
        assert_eq!(medium.as_bytes()[3], 0xAB);
        assert_eq!(medium.capacity(), 8);
    }

    #[test]
    fn test_unchanged_write_skipped() {
        let mut medium = MemoryMedium::erased(4);
        medium.write_if_changed(0, 0xFF).unwrap();
        assert_eq!(medium.write_count(), 0);

        medium.write_if_changed(0, 0x00).unwrap();
        medium.write_if_changed(0, 0x00).unwrap();
        assert_eq!(medium.write_count(), 1);

        medium.reset_write_count();
        assert_eq!(medium.write_count(), 0);
    }

    #[test]
    fn test_u16_little_endian() {
        let mut medium = MemoryMedium::new(4);
        medium.put_u16(1, 0x1234).unwrap();
        assert_eq!(medium.as_bytes(), &[0x00, 0x34, 0x12, 0x00]);
        assert_eq!(medium.get_u16(1).unwrap(), 0x1234);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut medium = MemoryMedium::new(4);
        assert!(matches!(
            medium.read_byte(4),
            Err(StoreError::OutOfBounds { addr: 4, capacity: 4 })
        ));
        assert!(medium.write_if_changed(10, 1).is_err());
        // The second byte of the u16 is past the end.
        assert!(medium.put_u16(3, 0xFFFF).is_err());
    }

    #[test]
    fn test_through_mut_ref() {
        fn stamp<M: Medium>(mut medium: M) {
            medium.put_u16(0, 0xBEEF).unwrap();
        }

        let mut medium = MemoryMedium::new(4);
        stamp(&mut medium);
        assert_eq!(medium.get_u16(0).unwrap(), 0xBEEF);
    }
}
