//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during medium access.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Address outside the medium.
    #[error("address {addr} out of bounds (capacity {capacity})")]
    OutOfBounds { addr: usize, capacity: usize },

    /// The device lost power during a write. Produced by fault-injecting
    /// media; the write at `addr` did not happen.
    #[error("power lost before write at address {addr}")]
    PowerLoss { addr: usize },

    /// Image file has the wrong size.
    #[error("image size mismatch: expected {expected} bytes, found {found}")]
    ImageSize { expected: u64, found: u64 },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
