//! Diagnostic view of a slot.

use std::fmt;

use nvtx_core::CellIndex;

use crate::codec::{newest, CellState};

/// State of both cells of a slot, as seen by [`NvTx::inspect`](crate::NvTx::inspect).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotStatus {
    pub cells: [CellState; 2],
}

impl SlotStatus {
    pub fn first(&self) -> CellState {
        self.cells[0]
    }

    pub fn second(&self) -> CellState {
        self.cells[1]
    }

    /// The cell a read would return, if any.
    pub fn newest(&self) -> Option<CellIndex> {
        newest(self.cells[0].epoch(), self.cells[1].epoch())
    }

    /// Whether a read would find a value.
    pub fn is_readable(&self) -> bool {
        self.newest().is_some()
    }

    /// Both copies hold a valid value.
    pub fn is_redundant(&self) -> bool {
        self.cells.iter().all(CellState::is_valid)
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?}]", self.cells[0], self.cells[1])?;
        match self.newest() {
            Some(cell) => write!(f, " newest {:?}", cell),
            None => f.write_str(" unreadable"),
        }
    }
}
