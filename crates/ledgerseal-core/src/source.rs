//! External collaborators consumed by the protocol.
//!
//! The protocol never owns contacts or blocks. It asks a
//! [`ContactSecretStore`] for the static secret of a receiver and a
//! [`BlockKeySource`] for block hashes, both hex encoded. Implementations
//! live outside this crate (see `ledgerseal-store`).

use thiserror::Error;

/// A block observed on the public ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block height
    pub index: u64,
    /// Hex-encoded block hash, used as ephemeral key material
    pub hash: String,
}

impl Block {
    /// Create a block reference.
    pub fn new(index: u64, hash: impl Into<String>) -> Self {
        Self { index, hash: hash.into() }
    }
}

/// Errors reported by collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Backend cannot serve requests (empty ledger, node down, I/O failure)
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// Backend returned data it cannot decode
    #[error("source corrupted: {0}")]
    Corrupted(String),
}

/// Lookup of public blocks used as ephemeral keys.
///
/// # Invariants
///
/// - `hash_of(i)` returns the same hash for the same index forever (blocks
///   are immutable once observed)
/// - `random_block()` returns a block that `hash_of` can resolve
pub trait BlockKeySource {
    /// An unpredictable block to key a new message with.
    fn random_block(&self) -> Result<Block, SourceError>;

    /// Hash of the block at `index`, or `None` if unknown or not yet mined.
    fn hash_of(&self, index: u64) -> Result<Option<String>, SourceError>;
}

/// Lookup of per-contact static shared secrets.
pub trait ContactSecretStore {
    /// Hex-encoded static secret for `address`, or `None` if the contact is
    /// unknown.
    fn secret_of(&self, address: &str) -> Result<Option<String>, SourceError>;
}

impl<T: BlockKeySource + ?Sized> BlockKeySource for &T {
    fn random_block(&self) -> Result<Block, SourceError> {
        (**self).random_block()
    }

    fn hash_of(&self, index: u64) -> Result<Option<String>, SourceError> {
        (**self).hash_of(index)
    }
}

impl<T: ContactSecretStore + ?Sized> ContactSecretStore for &T {
    fn secret_of(&self, address: &str) -> Result<Option<String>, SourceError> {
        (**self).secret_of(address)
    }
}
