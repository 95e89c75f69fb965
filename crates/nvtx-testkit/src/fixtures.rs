//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use nvtx::{cell_size, CellIndex, Identity, NvTx, NvTxConfig};
use nvtx_store::MemoryMedium;

use crate::fault::PowerCutMedium;

/// The medium every fixture runs on.
pub type FixtureMedium = PowerCutMedium<MemoryMedium>;

/// A test fixture: an in-memory medium behind a power-cut switch.
pub struct TestFixture {
    pub nv: NvTx<FixtureMedium>,
}

impl TestFixture {
    /// Zero-filled medium of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self::from_medium(MemoryMedium::new(capacity), NvTxConfig::default())
    }

    /// `0xFF`-filled medium, like a fresh EEPROM.
    pub fn erased(capacity: usize) -> Self {
        Self::from_medium(MemoryMedium::erased(capacity), NvTxConfig::default())
    }

    pub fn with_config(capacity: usize, config: NvTxConfig) -> Self {
        Self::from_medium(MemoryMedium::new(capacity), config)
    }

    fn from_medium(medium: MemoryMedium, config: NvTxConfig) -> Self {
        Self {
            nv: NvTx::with_config(PowerCutMedium::new(medium), config),
        }
    }

    /// Raw medium contents.
    pub fn bytes(&self) -> &[u8] {
        self.nv.medium().inner().as_bytes()
    }

    /// Raw bytes of one cell of the slot at `base`.
    pub fn cell_bytes(&self, size: usize, base: usize, cell: CellIndex) -> &[u8] {
        let start = base + cell.as_usize() * cell_size(size);
        &self.bytes()[start..start + cell_size(size)]
    }

    /// Flip one bit on the medium behind the protocol's back.
    pub fn flip_bit(&mut self, addr: usize, bit: u8) {
        self.nv.medium_mut().inner_mut().as_bytes_mut()[addr] ^= 1 << bit;
    }

    /// Fail the write after `writes` more byte writes.
    pub fn cut_power_after(&mut self, writes: u64) {
        self.nv.medium_mut().cut_after(writes);
    }

    pub fn restore_power(&mut self) {
        self.nv.medium_mut().restore();
    }

    /// Byte writes attempted since the last cut/restore.
    pub fn write_attempts(&self) -> u64 {
        self.nv.medium().attempts()
    }

    /// Read a value, panicking on medium errors.
    pub fn read(&mut self, identity: &Identity, base: usize, size: usize) -> Option<Vec<u8>> {
        let mut out = vec![0u8; size];
        let found = self.nv.get(identity, base, &mut out).expect("medium error on read");
        found.then_some(out)
    }

    /// Which cells of the slot differ between two snapshots.
    pub fn changed_cells(before: &[u8], after: &[u8], size: usize, base: usize) -> Vec<CellIndex> {
        [CellIndex::First, CellIndex::Second]
            .into_iter()
            .filter(|&cell| {
                let start = base + cell.as_usize() * cell_size(size);
                let range = start..start + cell_size(size);
                before[range.clone()] != after[range]
            })
            .collect()
    }
}
