//! Error types for protocol operations

use std::fmt;

use ledgerseal_codec::CodecError;
use thiserror::Error;

use crate::{env::EntropyError, source::SourceError};

/// Which of the two envelope keys an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// Per-contact static shared secret (protects the block index)
    Static,
    /// Block-hash ephemeral key (protects the message)
    Ephemeral,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::Ephemeral => f.write_str("ephemeral"),
        }
    }
}

/// Which envelope segment an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Encrypted block index
    Index,
    /// Encrypted message
    Message,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => f.write_str("index"),
            Self::Message => f.write_str("message"),
        }
    }
}

/// Errors from envelope encryption and decryption.
///
/// Every variant aborts the whole operation. No partial envelope or partial
/// plaintext is ever returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Block source or contact store failed to answer
    #[error("key source error: {0}")]
    KeySource(#[from] SourceError),

    /// No static secret is stored for the address
    #[error("unknown contact: {address}")]
    UnknownContact {
        /// Address that was looked up
        address: String,
    },

    /// Block index does not resolve to a known block
    #[error("unknown block: {index}")]
    UnknownBlock {
        /// Block index decrypted from the envelope
        index: u64,
    },

    /// Key material is not valid hex or not an AES key length
    #[error("invalid {role} key: {reason}")]
    KeyFormat {
        /// Which key was rejected
        role: KeyRole,
        /// Why it was rejected
        reason: String,
    },

    /// Envelope bytes are malformed
    #[error("framing error: {0}")]
    Framing(#[from] CodecError),

    /// Decrypted segment is not valid base64
    #[error("{segment} segment is not valid base64: {reason}")]
    Encoding {
        /// Segment that failed to destage
        segment: SegmentKind,
        /// Description from the base64 decoder
        reason: String,
    },

    /// Decrypted block index is not a decimal integer
    #[error("block index is not a decimal integer: {reason}")]
    Format {
        /// Why parsing failed
        reason: String,
    },

    /// Secure randomness for IVs is unavailable
    #[error(transparent)]
    Randomness(#[from] EntropyError),
}

impl ProtocolError {
    /// Returns true if retrying the same call may succeed
    ///
    /// Transient errors come from collaborators (source unavailable, RNG
    /// hiccup). Everything else is deterministic for the given inputs:
    /// retrying the same envelope or contact fails the same way.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::KeySource(SourceError::Unavailable(_)) => true,
            Self::Randomness(_) => true,

            Self::KeySource(SourceError::Corrupted(_)) => false,
            Self::UnknownContact { .. } => false,
            Self::UnknownBlock { .. } => false,
            Self::KeyFormat { .. } => false,
            Self::Framing(_) => false,
            Self::Encoding { .. } => false,
            Self::Format { .. } => false,
        }
    }
}
