//! Error types for nvtx core.

use thiserror::Error;

/// Errors from parsing or constructing core values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("identity tag is empty")]
    EmptyTag,

    #[error("identity tag contains a NUL byte at offset {0}")]
    NulInTag(usize),

    #[error("invalid instance id: {0}")]
    InvalidInstance(String),
}
