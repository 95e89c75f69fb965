//! # nvtx Core
//!
//! Pure primitives for nvtx: the CRC-16 accumulator, value identities, cell
//! headers and the on-medium geometry of cells and slots.
//!
//! This crate contains no I/O. Everything here is computation over bytes and
//! bit fields; reading and writing the medium lives in `nvtx-store` and the
//! dual-cell protocol in `nvtx`.
//!
//! ## Key Types
//!
//! - [`Crc16`] - Streaming CRC-16/ANSI accumulator (polynomial 0xA001, LSB first)
//! - [`Identity`] - Tag plus instance id binding a slot to a semantic meaning
//! - [`CellHeader`] - Decoded 16-bit cell header (identity bits, epoch, valid)
//! - [`Epoch`] - The single freshness bit toggled between writes
//! - [`SlotGeometry`] - Address arithmetic for the two cells of a slot
//!
//! ## Cell Layout
//!
//! ```text
//! |E| id chksum |V| id chksum cont'd | payload   | id + payload chksum || 2nd cell ..
//! ^                ^                 ^           ^                     ^
//! | addr           | addr + 1        | addr + 2  | addr + 2 + size     | addr + 4 + size
//! ```

pub mod crc16;
pub mod error;
pub mod geometry;
pub mod header;
pub mod identity;

pub use crc16::{checksum, checksum_str, Crc16, CRC16_INIT, CRC16_POLY};
pub use error::CoreError;
pub use geometry::{
    cell_size, checked_cell_size, checked_slot_size, slot_size, CellIndex, SlotGeometry,
    CELL_OVERHEAD, HEADER_LEN, TAIL_LEN,
};
pub use header::{CellHeader, Epoch, HeaderProbe, EPOCH_BIT, IDENTITY_MASK, VALID_BIT};
pub use identity::Identity;
