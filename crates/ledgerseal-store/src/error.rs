//! Storage error types.
//!
//! Defines errors that can occur in the collaborator stores:
//! - `Conflict`: A block index was re-recorded with a different hash
//! - `InvalidRecord`: Input rejected before it reached storage
//! - `Serialization`: Failed to encode/decode data
//! - `Io`: Underlying storage system errors
//! - `Randomness`: The environment could not pick a block

use ledgerseal_core::{EntropyError, SourceError};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Block index already recorded with a different hash
    ///
    /// Observed blocks are immutable. A second hash for the same index means
    /// the ledger mirror is fed from a forked or corrupted source.
    #[error("block {index} already recorded with a different hash")]
    Conflict {
        /// Block index that was re-recorded
        index: u64,
    },

    /// Record rejected before storage (empty address, non-hex hash, ...)
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Serialization or deserialization failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error (file system, database, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Randomness for a block pick was unavailable
    #[error(transparent)]
    Randomness(#[from] EntropyError),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<StorageError> for SourceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Serialization(msg) => SourceError::Corrupted(msg),
            other => SourceError::Unavailable(other.to_string()),
        }
    }
}
