//! Error types for stream cipher operations

use thiserror::Error;

/// Errors from key handling and segment encryption
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Key material is not a valid AES key length
    #[error("invalid key length: {actual} bytes, expected 16, 24 or 32")]
    InvalidKeyLength {
        /// Actual key length
        actual: usize,
    },

    /// Segment is too short to contain its IV
    #[error("segment too short: {actual} bytes, IV needs {expected}")]
    SegmentTooShort {
        /// Required IV length
        expected: usize,
        /// Actual segment length
        actual: usize,
    },
}
