//! Cell codec: validating, reading and writing individual cells, plus the
//! two decision rules of the dual-cell protocol.
//!
//! Everything here works on one [`SlotGeometry`] and one identity checksum.
//! The functions are generic over [`Medium`] and return raw store errors;
//! [`NvTx`](crate::NvTx) wraps them into slot operations.
//!
//! ## Freshness
//!
//! Writing the first cell stamps the complement of the second cell's epoch,
//! writing the second cell copies the first cell's epoch. Between two valid
//! cells, equal epochs therefore mean the second cell was written last and
//! differing epochs mean the first one was.

use nvtx_core::{CellHeader, CellIndex, Crc16, Epoch, HeaderProbe, SlotGeometry};
use nvtx_store::{Medium, Result};

/// Outcome of examining one cell against an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Valid bit clear: never written, erased, invalidated or mid-write.
    Empty,
    /// Valid bit set but the identity bits belong to another identity
    /// (or are garbage).
    Foreign,
    /// Header matches but the tail checksum does not.
    Corrupt,
    /// Header and tail verified.
    Valid(Epoch),
}

impl CellState {
    pub fn epoch(&self) -> Option<Epoch> {
        match self {
            CellState::Valid(epoch) => Some(*epoch),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, CellState::Valid(_))
    }

    /// The header claimed validity but verification failed.
    pub fn is_damaged(&self) -> bool {
        matches!(self, CellState::Foreign | CellState::Corrupt)
    }

    /// Short label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            CellState::Empty => "empty",
            CellState::Foreign => "foreign",
            CellState::Corrupt => "corrupt",
            CellState::Valid(_) => "valid",
        }
    }
}

/// Check a cell without modifying the medium.
pub fn examine_cell<M: Medium>(
    medium: &mut M,
    identity_checksum: u16,
    geo: &SlotGeometry,
    cell: CellIndex,
) -> Result<CellState> {
    let header = CellHeader::from_raw(medium.get_u16(geo.cell_base(cell))?);
    if !header.valid {
        return Ok(CellState::Empty);
    }
    if !header.matches(identity_checksum) {
        return Ok(CellState::Foreign);
    }

    let mut crc = Crc16::with_seed(identity_checksum);
    let start = geo.payload_addr(cell);
    for addr in start..start + geo.size {
        crc.update(medium.read_byte(addr)?);
    }

    let tail = medium.get_u16(geo.tail_addr(cell))?;
    if tail == crc.value() {
        Ok(CellState::Valid(header.epoch))
    } else {
        Ok(CellState::Corrupt)
    }
}

/// Check a cell and demote it in place when it fails.
///
/// A `Foreign` cell always gets its header low byte cleared, so later reads
/// skip it and later writes see it as free. A `Corrupt` cell is cleared only
/// when `invalidate_corrupt` is set. The clear is a single byte write of
/// zero and is idempotent.
pub fn validate_cell<M: Medium>(
    medium: &mut M,
    identity_checksum: u16,
    geo: &SlotGeometry,
    cell: CellIndex,
    invalidate_corrupt: bool,
) -> Result<CellState> {
    let state = examine_cell(medium, identity_checksum, geo, cell)?;
    tracing::trace!(base = geo.base, ?cell, ?state, "validated cell");

    let invalidate = match state {
        CellState::Foreign => true,
        CellState::Corrupt => invalidate_corrupt,
        CellState::Empty | CellState::Valid(_) => false,
    };
    if invalidate {
        invalidate_cell(medium, geo, cell)?;
        tracing::debug!(base = geo.base, ?cell, ?state, "invalidated cell");
    }

    Ok(state)
}

/// Clear the header low byte of a cell (valid bit and epoch).
pub fn invalidate_cell<M: Medium>(medium: &mut M, geo: &SlotGeometry, cell: CellIndex) -> Result<()> {
    medium.write_if_changed(geo.cell_base(cell), 0)
}

/// Copy a cell's payload into `out`. `out.len()` must equal `geo.size`.
pub fn read_payload<M: Medium>(
    medium: &mut M,
    geo: &SlotGeometry,
    cell: CellIndex,
    out: &mut [u8],
) -> Result<()> {
    let start = geo.payload_addr(cell);
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = medium.read_byte(start + i)?;
    }
    Ok(())
}

/// Read the header low byte of both cells.
pub fn probe<M: Medium>(medium: &mut M, geo: &SlotGeometry) -> Result<[HeaderProbe; 2]> {
    let first = medium.read_byte(geo.cell_base(CellIndex::First))?;
    let second = medium.read_byte(geo.cell_base(CellIndex::Second))?;
    Ok([HeaderProbe::from_byte(first), HeaderProbe::from_byte(second)])
}

/// Pick the cell to overwrite and the epoch to stamp on it.
///
/// | first valid | second valid | target | epoch |
/// |---|---|---|---|
/// | no | - | first | !second |
/// | yes | no | second | first |
/// | yes | yes, epochs equal | first | !second |
/// | yes | yes, epochs differ | second | first |
///
/// When only the first cell is valid the second is stamped with the first
/// cell's epoch unchanged, which makes the second cell the newer one.
pub fn select_target(first: HeaderProbe, second: HeaderProbe) -> (CellIndex, Epoch) {
    if !first.valid || (second.valid && first.epoch == second.epoch) {
        (CellIndex::First, second.epoch.toggled())
    } else {
        (CellIndex::Second, first.epoch)
    }
}

/// Pick the newest of two validated cells.
pub fn newest(first: Option<Epoch>, second: Option<Epoch>) -> Option<CellIndex> {
    match (first, second) {
        (Some(a), Some(b)) if a == b => Some(CellIndex::Second),
        (Some(_), _) => Some(CellIndex::First),
        (None, Some(_)) => Some(CellIndex::Second),
        (None, None) => None,
    }
}

/// Write a complete cell.
///
/// The header goes out first with the valid bit clear, then the payload
/// (unchanged bytes are skipped), then the tail. Only the final single-byte
/// store of the header low byte sets the valid bit, so a cell interrupted at
/// any earlier point reads back as `Empty`.
pub fn write_cell<M: Medium>(
    medium: &mut M,
    identity_checksum: u16,
    geo: &SlotGeometry,
    cell: CellIndex,
    epoch: Epoch,
    value: &[u8],
) -> Result<()> {
    debug_assert_eq!(value.len(), geo.size);

    let base = geo.cell_base(cell);
    let header = CellHeader::new(identity_checksum, epoch);
    medium.put_u16(base, header.pending().to_raw())?;

    let mut crc = Crc16::with_seed(identity_checksum);
    let start = geo.payload_addr(cell);
    for (i, &byte) in value.iter().enumerate() {
        medium.write_if_changed(start + i, byte)?;
        crc.update(byte);
    }
    medium.put_u16(geo.tail_addr(cell), crc.value())?;

    medium.write_if_changed(base, header.low_byte())
}
