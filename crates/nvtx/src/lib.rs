//! # nvtx
//!
//! Transactional storage of fixed-size values in byte-addressable
//! non-volatile memory such as EEPROM, tolerant of power loss at any point
//! during a write.
//!
//! ## Overview
//!
//! - A value is only ever observed after having been fully written.
//! - Corrupted bytes are detected and rejected rather than returned.
//! - An interrupted update never destroys the previously valid value.
//! - A value written under one identity is never read back as another.
//!
//! Every value lives in a *slot* of two redundant *cells*. Each cell carries
//! a header with the identity checksum, an epoch bit and a valid bit, and a
//! tail checksum over identity and payload. Reads pick the newest cell that
//! verifies, writes go to the other one.
//!
//! ## Usage
//!
//! ```rust
//! use nvtx::{Identity, NvTx};
//! use nvtx::store::MemoryMedium;
//!
//! let mut nv = NvTx::new(MemoryMedium::erased(1024));
//! let boot_count = Identity::new("boot_count");
//!
//! // Read first: this also clears stale headers in the slot.
//! let count = nv.get_value::<u32>(&boot_count, 0).unwrap().unwrap_or(0);
//! nv.put_value(&boot_count, 0, &(count + 1)).unwrap();
//!
//! assert_eq!(nv.get_value::<u32>(&boot_count, 0).unwrap(), Some(count + 1));
//! ```
//!
//! ## Re-exports
//!
//! - `nvtx::core` - CRC-16, identities, headers and geometry
//! - `nvtx::store` - The `Medium` trait and its implementations

pub mod codec;
pub mod config;
pub mod error;
pub mod layout;
pub mod status;
pub mod tx;
pub mod value;

// Re-export component crates
pub use nvtx_core as core;
pub use nvtx_store as store;

// Re-export main types for convenience
pub use codec::CellState;
pub use config::NvTxConfig;
pub use error::{NvTxError, Result};
pub use layout::{LayoutBuilder, LayoutConfig, LayoutError, Slot, SlotMap, SlotSpec};
pub use status::SlotStatus;
pub use tx::NvTx;
pub use value::NvValue;

// Re-export commonly used core types
pub use nvtx_core::{cell_size, slot_size, CellIndex, Epoch, Identity};
pub use nvtx_store::{FileMedium, Medium, MemoryMedium, StoreError};
