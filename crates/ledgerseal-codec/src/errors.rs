//! Error types for codec operations.

use thiserror::Error;

/// Convenience alias for codec results.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors from byte codecs and envelope framing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Hex input has odd length or contains non-hex characters
    #[error("invalid hex: {reason}")]
    InvalidHex {
        /// Description from the hex decoder
        reason: String,
    },

    /// Every byte of a padded buffer is zero, nothing to trim to
    #[error("buffer of {len} bytes is entirely zero padding")]
    AllZero {
        /// Length of the rejected buffer
        len: usize,
    },

    /// A token of a decimal byte string is not an 8-bit unsigned integer
    #[error("invalid decimal byte token {token:?}")]
    InvalidDecimalToken {
        /// The offending token
        token: String,
    },

    /// Delimited envelope has no delimiter between its segments
    #[error("envelope delimiter not found")]
    MissingDelimiter,

    /// Delimited envelope splits into more than two segments
    ///
    /// Ciphertext bytes reproduced the delimiter pattern. The delimited
    /// framing cannot tell the real boundary apart.
    #[error("delimiter collision: envelope split into {segments} segments")]
    DelimiterCollision {
        /// Number of segments produced by the split
        segments: usize,
    },

    /// Segment is too short to carry its IV
    #[error("{segment} segment too short: {len} bytes, need at least {min}")]
    SegmentTooShort {
        /// Which segment (`index` or `message`)
        segment: &'static str,
        /// Actual segment length
        len: usize,
        /// Minimum segment length
        min: usize,
    },

    /// Length-prefixed envelope ended before a declared length was satisfied
    #[error("envelope truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required to finish decoding
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Length-prefixed envelope has bytes after the message segment
    #[error("{count} trailing bytes after message segment")]
    TrailingBytes {
        /// Number of unexpected bytes
        count: usize,
    },

    /// Tagged payload is empty, so it has no compression tag
    #[error("payload has no compression tag")]
    MissingCompressionTag,

    /// Tagged payload starts with a byte that is not a known tag
    #[error("unknown compression tag {tag:#04x}")]
    UnknownCompressionTag {
        /// The offending tag byte
        tag: u8,
    },

    /// Payload tagged as LZ4 does not decompress
    #[error("LZ4 block does not decompress: {reason}")]
    Decompression {
        /// Description from the decompressor
        reason: String,
    },

    /// Segment length does not fit the 32-bit length prefix
    #[error("segment of {len} bytes exceeds the length prefix range")]
    SegmentTooLarge {
        /// Offending segment length
        len: usize,
    },
}

impl From<hex::FromHexError> for CodecError {
    fn from(err: hex::FromHexError) -> Self {
        Self::InvalidHex { reason: err.to_string() }
    }
}
