//! Power-loss simulation.
//!
//! [`PowerCutMedium`] wraps another medium and lets a fixed number of byte
//! writes through before the power "goes out". The write that hits the cut
//! and every write after it fail with [`StoreError::PowerLoss`] without
//! touching the inner medium, which is exactly the state a device is left in
//! when reset mid-operation. Reads keep working so tests can look at the
//! aftermath; [`restore`](PowerCutMedium::restore) powers the device back on.

use nvtx_store::{Medium, Result, StoreError};

/// Medium wrapper that fails writes after a configurable budget.
#[derive(Debug, Clone)]
pub struct PowerCutMedium<M> {
    inner: M,
    budget: Option<u64>,
    attempts: u64,
    powered: bool,
}

impl<M: Medium> PowerCutMedium<M> {
    /// Wrap `inner` with no cut scheduled.
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            budget: None,
            attempts: 0,
            powered: true,
        }
    }

    /// Allow `writes` more byte writes, then cut the power.
    ///
    /// `cut_after(0)` fails the very next write.
    pub fn cut_after(&mut self, writes: u64) {
        self.attempts = 0;
        self.budget = Some(writes);
    }

    /// Power back on and cancel any scheduled cut.
    pub fn restore(&mut self) {
        self.budget = None;
        self.powered = true;
        self.attempts = 0;
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Byte writes attempted since the last `cut_after`/`restore`,
    /// including ones that were no-ops because the byte already matched.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut M {
        &mut self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: Medium> Medium for PowerCutMedium<M> {
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn read_byte(&mut self, addr: usize) -> Result<u8> {
        self.inner.read_byte(addr)
    }

    fn write_if_changed(&mut self, addr: usize, byte: u8) -> Result<()> {
        if self.powered && self.budget.is_some_and(|budget| self.attempts >= budget) {
            tracing::debug!(addr, attempts = self.attempts, "power cut");
            self.powered = false;
        }
        if !self.powered {
            return Err(StoreError::PowerLoss { addr });
        }

        self.attempts += 1;
        self.inner.write_if_changed(addr, byte)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}
