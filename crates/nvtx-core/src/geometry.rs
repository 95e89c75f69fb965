//! Address arithmetic for cells and slots.

/// Bytes taken by the cell header.
pub const HEADER_LEN: usize = 2;

/// Bytes taken by the tail checksum.
pub const TAIL_LEN: usize = 2;

/// Per-cell overhead on top of the payload.
pub const CELL_OVERHEAD: usize = HEADER_LEN + TAIL_LEN;

/// Size of one cell holding a `size`-byte payload.
pub const fn cell_size(size: usize) -> usize {
    size + CELL_OVERHEAD
}

/// Size of a slot (two cells) holding a `size`-byte payload.
pub const fn slot_size(size: usize) -> usize {
    2 * cell_size(size)
}

/// [`cell_size`], or `None` if it does not fit in `usize`.
pub const fn checked_cell_size(size: usize) -> Option<usize> {
    size.checked_add(CELL_OVERHEAD)
}

/// [`slot_size`], or `None` if it does not fit in `usize`.
pub const fn checked_slot_size(size: usize) -> Option<usize> {
    match checked_cell_size(size) {
        Some(cell) => cell.checked_mul(2),
        None => None,
    }
}

/// One of the two cells of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellIndex {
    First,
    Second,
}

impl CellIndex {
    pub const fn other(self) -> Self {
        match self {
            CellIndex::First => CellIndex::Second,
            CellIndex::Second => CellIndex::First,
        }
    }

    pub const fn as_usize(self) -> usize {
        match self {
            CellIndex::First => 0,
            CellIndex::Second => 1,
        }
    }
}

/// Where the pieces of a slot live on the medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGeometry {
    pub base: usize,
    pub size: usize,
}

impl SlotGeometry {
    pub const fn new(base: usize, size: usize) -> Self {
        Self { base, size }
    }

    /// Base (header) address of a cell.
    pub const fn cell_base(&self, cell: CellIndex) -> usize {
        match cell {
            CellIndex::First => self.base,
            CellIndex::Second => self.base + cell_size(self.size),
        }
    }

    pub const fn payload_addr(&self, cell: CellIndex) -> usize {
        self.cell_base(cell) + HEADER_LEN
    }

    pub const fn tail_addr(&self, cell: CellIndex) -> usize {
        self.payload_addr(cell) + self.size
    }

    /// Total bytes occupied by the slot, saturating at `usize::MAX`.
    pub const fn len(&self) -> usize {
        match checked_slot_size(self.size) {
            Some(len) => len,
            None => usize::MAX,
        }
    }

    /// First address past the slot, or `None` on address overflow.
    pub const fn end(&self) -> Option<usize> {
        match checked_slot_size(self.size) {
            Some(len) => self.base.checked_add(len),
            None => None,
        }
    }

    /// Whether two slot regions share any byte.
    pub fn overlaps(&self, other: &SlotGeometry) -> bool {
        match (self.end(), other.end()) {
            (Some(a_end), Some(b_end)) => self.base < b_end && other.base < a_end,
            _ => true,
        }
    }
}
