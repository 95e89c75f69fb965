//! Error types for nvtx operations.

use nvtx_store::StoreError;
use thiserror::Error;

/// Errors that can occur during slot operations.
///
/// A slot that holds no valid value is not an error: reads report it as
/// `false` / `None`.
#[derive(Debug, Error)]
pub enum NvTxError {
    /// Medium access failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The slot region does not fit on the medium.
    #[error("slot at {base} ({len} bytes) exceeds medium capacity {capacity}")]
    SlotOutOfBounds {
        base: usize,
        len: usize,
        capacity: usize,
    },

    /// Buffer or value size differs from the slot's payload size.
    #[error("size mismatch: slot holds {expected} bytes, got {found}")]
    SizeMismatch { expected: usize, found: usize },
}

/// Result type for nvtx operations.
pub type Result<T> = std::result::Result<T, NvTxError>;
