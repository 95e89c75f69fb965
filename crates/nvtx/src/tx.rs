//! NvTx: transactional slot storage on top of a [`Medium`].
//!
//! Each slot holds one fixed-size value in two redundant cells. Reads return
//! the newest cell that verifies; writes always go to the other cell, so an
//! interrupted write never destroys the previous value.

use nvtx_core::{CellIndex, Identity, SlotGeometry};
use nvtx_store::Medium;

use crate::codec;
use crate::config::NvTxConfig;
use crate::error::{NvTxError, Result};
use crate::layout::Slot;
use crate::status::SlotStatus;
use crate::value::NvValue;

/// Transactional value storage over an owned medium.
///
/// Call [`get`](Self::get) on a slot at least once before the first
/// [`put`](Self::put): reading clears headers left behind by other data or
/// garbage, which keeps write-target selection reliable.
#[derive(Debug)]
pub struct NvTx<M: Medium> {
    medium: M,
    config: NvTxConfig,
}

impl<M: Medium> NvTx<M> {
    pub fn new(medium: M) -> Self {
        Self::with_config(medium, NvTxConfig::default())
    }

    pub fn with_config(medium: M, config: NvTxConfig) -> Self {
        Self { medium, config }
    }

    pub fn config(&self) -> &NvTxConfig {
        &self.config
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    pub fn into_inner(self) -> M {
        self.medium
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Raw slot operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the value stored for `identity` at `base` into `out`.
    ///
    /// The payload size is `out.len()`. Returns `false` when neither cell
    /// holds a valid value for this identity, in which case `out` is left
    /// untouched.
    pub fn get(&mut self, identity: &Identity, base: usize, out: &mut [u8]) -> Result<bool> {
        let geo = self.geometry(base, out.len())?;
        let crc = identity.checksum();
        let invalidate = self.config.invalidate_on_payload_mismatch;

        let first = codec::validate_cell(&mut self.medium, crc, &geo, CellIndex::First, invalidate)?;
        let second = codec::validate_cell(&mut self.medium, crc, &geo, CellIndex::Second, invalidate)?;

        match codec::newest(first.epoch(), second.epoch()) {
            Some(cell) => {
                codec::read_payload(&mut self.medium, &geo, cell, out)?;
                Ok(true)
            }
            None => {
                if first.is_damaged() && second.is_damaged() {
                    tracing::warn!(%identity, base, ?first, ?second, "both cells failed verification");
                }
                Ok(false)
            }
        }
    }

    /// Store `value` for `identity` at `base`.
    ///
    /// The payload size is `value.len()`.
    pub fn put(&mut self, identity: &Identity, base: usize, value: &[u8]) -> Result<()> {
        let geo = self.geometry(base, value.len())?;
        let [first, second] = codec::probe(&mut self.medium, &geo)?;
        let (target, epoch) = codec::select_target(first, second);
        tracing::debug!(%identity, base, ?target, %epoch, "writing cell");

        codec::write_cell(&mut self.medium, identity.checksum(), &geo, target, epoch, value)?;
        self.medium.flush()?;
        Ok(())
    }

    /// Return the slot at `base` to the uninitialized state.
    pub fn erase(&mut self, size: usize, base: usize) -> Result<()> {
        let geo = self.geometry(base, size)?;
        codec::invalidate_cell(&mut self.medium, &geo, CellIndex::First)?;
        codec::invalidate_cell(&mut self.medium, &geo, CellIndex::Second)?;
        self.medium.flush()?;
        tracing::debug!(base, size, "erased slot");
        Ok(())
    }

    /// Report the state of both cells without modifying the medium.
    pub fn inspect(&mut self, identity: &Identity, size: usize, base: usize) -> Result<SlotStatus> {
        let geo = self.geometry(base, size)?;
        let crc = identity.checksum();
        let first = codec::examine_cell(&mut self.medium, crc, &geo, CellIndex::First)?;
        let second = codec::examine_cell(&mut self.medium, crc, &geo, CellIndex::Second)?;
        Ok(SlotStatus {
            cells: [first, second],
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Typed values
    // ─────────────────────────────────────────────────────────────────────────

    pub fn get_value<T: NvValue>(&mut self, identity: &Identity, base: usize) -> Result<Option<T>> {
        let mut buf = vec![0u8; T::SIZE];
        if self.get(identity, base, &mut buf)? {
            Ok(Some(T::read_bytes(&buf)))
        } else {
            Ok(None)
        }
    }

    pub fn put_value<T: NvValue>(&mut self, identity: &Identity, base: usize, value: &T) -> Result<()> {
        self.put(identity, base, &value.to_vec())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Slot-map operations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn get_slot(&mut self, slot: &Slot, out: &mut [u8]) -> Result<bool> {
        check_size(slot, out.len())?;
        self.get(&slot.identity, slot.base, out)
    }

    pub fn put_slot(&mut self, slot: &Slot, value: &[u8]) -> Result<()> {
        check_size(slot, value.len())?;
        self.put(&slot.identity, slot.base, value)
    }

    pub fn erase_slot(&mut self, slot: &Slot) -> Result<()> {
        self.erase(slot.size, slot.base)
    }

    /// Typed read of a declared slot.
    pub fn load<T: NvValue>(&mut self, slot: &Slot) -> Result<Option<T>> {
        check_size(slot, T::SIZE)?;
        self.get_value(&slot.identity, slot.base)
    }

    /// Typed write of a declared slot.
    pub fn store<T: NvValue>(&mut self, slot: &Slot, value: &T) -> Result<()> {
        check_size(slot, T::SIZE)?;
        self.put_value(&slot.identity, slot.base, value)
    }

    /// Slot geometry for `base`/`size`. Regions that wrap the address space
    /// are always rejected; the capacity check follows `check_bounds`.
    fn geometry(&self, base: usize, size: usize) -> Result<SlotGeometry> {
        let geo = SlotGeometry::new(base, size);
        let capacity = self.medium.capacity();
        let fits = match geo.end() {
            Some(end) => !self.config.check_bounds || end <= capacity,
            None => false,
        };
        if !fits {
            return Err(NvTxError::SlotOutOfBounds {
                base,
                len: geo.len(),
                capacity,
            });
        }
        Ok(geo)
    }
}

fn check_size(slot: &Slot, found: usize) -> Result<()> {
    if slot.size == found {
        Ok(())
    } else {
        Err(NvTxError::SizeMismatch {
            expected: slot.size,
            found,
        })
    }
}
