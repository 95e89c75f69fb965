//! Runtime configuration for [`NvTx`](crate::NvTx).

/// Configuration for the slot protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvTxConfig {
    /// Clear the valid bit of a cell whose header matches but whose tail
    /// checksum does not. Off by default: such a cell is only skipped, and
    /// re-verified on every read until it is overwritten.
    pub invalidate_on_payload_mismatch: bool,
    /// Reject slot regions that extend past the medium capacity before
    /// touching the medium.
    pub check_bounds: bool,
}

impl Default for NvTxConfig {
    fn default() -> Self {
        Self {
            invalidate_on_payload_mismatch: false,
            check_bounds: true,
        }
    }
}
