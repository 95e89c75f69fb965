//! # nvtx Store
//!
//! Storage medium abstraction for nvtx. Provides a trait-based interface for
//! byte-addressable non-volatile memory with in-memory and file-backed
//! implementations.
//!
//! ## Overview
//!
//! The protocol in `nvtx` only ever needs four primitive accesses: read a
//! byte, write a byte if it changed, and read or write a little-endian u16.
//! Those are captured by the [`Medium`] trait so the protocol can run against
//! a real EEPROM driver, an image file, or a plain byte array in tests.
//!
//! ## Key Types
//!
//! - [`Medium`] - The trait for all byte-level accesses
//! - [`MemoryMedium`] - In-memory medium for tests and RAM-backed storage
//! - [`FileMedium`] - EEPROM image persisted to a file
//!
//! ## Usage
//!
//! ```rust
//! use nvtx_store::{Medium, MemoryMedium};
//!
//! let mut medium = MemoryMedium::erased(64);
//! medium.put_u16(0, 0xBB3C).unwrap();
//! assert_eq!(medium.read_byte(0).unwrap(), 0x3C);
//! assert_eq!(medium.get_u16(0).unwrap(), 0xBB3C);
//! ```
//!
//! ## Design Notes
//!
//! - **Update, not write**: `write_if_changed` skips bytes that already hold
//!   the value, which is what keeps EEPROM wear down.
//! - **Little-endian scalars**: two-byte fields are stored low byte first.
//! - **Bounds are checked**: out-of-range addresses return
//!   [`StoreError::OutOfBounds`] instead of touching memory.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use file::FileMedium;
pub use memory::MemoryMedium;
pub use traits::Medium;

/// Byte value of an erased EEPROM cell.
pub const ERASED_BYTE: u8 = 0xFF;
