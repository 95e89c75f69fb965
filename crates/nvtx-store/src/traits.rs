//! Medium trait: the abstract interface for byte-addressable storage.
//!
//! This trait keeps the cell protocol storage-agnostic. Implementations
//! include an in-memory array (tests, RAM) and an image file.

use crate::error::Result;

/// Byte-level access to a non-volatile medium.
///
/// Every method takes `&mut self`: a medium is a single device and callers
/// serialize access to it.
///
/// # Design Notes
///
/// - Only [`read_byte`](Medium::read_byte) and
///   [`write_if_changed`](Medium::write_if_changed) are required. The
///   two-byte accessors are built on them, so a fault-injecting wrapper that
///   intercepts byte writes sees every byte of a header or tail store.
/// - Two-byte values are little-endian.
pub trait Medium {
    /// Number of addressable bytes.
    fn capacity(&self) -> usize;

    /// Read one byte.
    fn read_byte(&mut self, addr: usize) -> Result<u8>;

    /// Write one byte, skipping the write if the medium already holds it.
    fn write_if_changed(&mut self, addr: usize, byte: u8) -> Result<()>;

    /// Read a little-endian u16 starting at `addr`.
    fn get_u16(&mut self, addr: usize) -> Result<u16> {
        let lo = self.read_byte(addr)?;
        let hi = self.read_byte(addr + 1)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Write a little-endian u16 starting at `addr`, byte by byte.
    fn put_u16(&mut self, addr: usize, value: u16) -> Result<()> {
        let [lo, hi] = value.to_le_bytes();
        self.write_if_changed(addr, lo)?;
        self.write_if_changed(addr + 1, hi)
    }

    /// Push buffered writes to the device. No-op by default.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<M: Medium + ?Sized> Medium for &mut M {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn read_byte(&mut self, addr: usize) -> Result<u8> {
        (**self).read_byte(addr)
    }

    fn write_if_changed(&mut self, addr: usize, byte: u8) -> Result<()> {
        (**self).write_if_changed(addr, byte)
    }

    fn get_u16(&mut self, addr: usize) -> Result<u16> {
        (**self).get_u16(addr)
    }

    fn put_u16(&mut self, addr: usize, value: u16) -> Result<()> {
        (**self).put_u16(addr, value)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<M: Medium + ?Sized> Medium for Box<M> {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn read_byte(&mut self, addr: usize) -> Result<u8> {
        (**self).read_byte(addr)
    }

    fn write_if_changed(&mut self, addr: usize, byte: u8) -> Result<()> {
        (**self).write_if_changed(addr, byte)
    }

    fn get_u16(&mut self, addr: usize) -> Result<u16> {
        (**self).get_u16(addr)
    }

    fn put_u16(&mut self, addr: usize, value: u16) -> Result<()> {
        (**self).put_u16(addr, value)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
