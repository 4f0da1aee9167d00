//! Envelope framing for the two ciphertext segments.
//!
//! An envelope carries an index segment (the encrypted block index) and a
//! message segment (the encrypted payload). Each segment starts with its
//! 16-byte IV. Two framings exist:
//!
//! ```text
//! Delimited:       [index segment] [42 58 42] [message segment]
//! LengthPrefixed:  [u32 BE len] [index segment] [u32 BE len] [message segment]
//! ```
//!
//! # Delimited framing
//!
//! Decoding renders the envelope as a decimal byte string and splits it on
//! `" 42 58 42 "`. Ciphertext is uniformly distributed, so a segment can
//! reproduce the delimiter bytes at token boundaries. A collision inside a
//! segment yields more than two parts and is rejected with
//! `DelimiterCollision`. A collision that straddles the real delimiter (an
//! index segment ending in `42 58`) moves the boundary without changing the
//! part count and misparses silently. Only use it to talk to legacy peers.
//!
//! # Length-prefixed framing
//!
//! Each segment is preceded by its big-endian `u32` byte count. Decoding is
//! exact: no collisions, truncation and trailing bytes are rejected.

use crate::{
    bytes::{from_decimal_string, to_decimal_string},
    errors::{CodecError, Result},
};

/// Delimiter between segments in the delimited framing (`*:*`).
pub const DELIMITER: [u8; 3] = [42, 58, 42];

/// Size of the IV that opens every segment.
pub const SEGMENT_IV_SIZE: usize = 16;

/// Delimiter as it appears inside a decimal byte string.
const DELIMITER_TOKENS: &str = " 42 58 42 ";

/// Size of a segment length prefix.
const LENGTH_PREFIX_SIZE: usize = 4;

/// Envelope layout on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Segments separated by the [`DELIMITER`] bytes (legacy layout)
    Delimited,
    /// Each segment preceded by its `u32` big-endian length
    #[default]
    LengthPrefixed,
}

/// The two IV-prefixed ciphertext segments of a message.
///
/// # Invariants
///
/// - Decoded envelopes always have both segments at least
///   [`SEGMENT_IV_SIZE`] bytes long
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// `IV_a || ciphertext` of the block index
    pub index_segment: Vec<u8>,
    /// `IV_b || ciphertext` of the message
    pub message_segment: Vec<u8>,
}

impl Envelope {
    /// Pair two segments into an envelope.
    pub fn new(index_segment: Vec<u8>, message_segment: Vec<u8>) -> Self {
        Self { index_segment, message_segment }
    }

    /// Total encoded size under the given framing.
    pub fn encoded_len(&self, framing: Framing) -> usize {
        let overhead = match framing {
            Framing::Delimited => DELIMITER.len(),
            Framing::LengthPrefixed => 2 * LENGTH_PREFIX_SIZE,
        };
        self.index_segment.len() + overhead + self.message_segment.len()
    }

    /// Serialize the envelope.
    ///
    /// # Errors
    ///
    /// - `SegmentTooLarge` if a segment does not fit a `u32` length prefix
    pub fn encode(&self, framing: Framing) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len(framing));

        match framing {
            Framing::Delimited => {
                out.extend_from_slice(&self.index_segment);
                out.extend_from_slice(&DELIMITER);
                out.extend_from_slice(&self.message_segment);
            },
            Framing::LengthPrefixed => {
                for segment in [&self.index_segment, &self.message_segment] {
                    let len = u32::try_from(segment.len())
                        .map_err(|_| CodecError::SegmentTooLarge { len: segment.len() })?;
                    out.extend_from_slice(&len.to_be_bytes());
                    out.extend_from_slice(segment);
                }
            },
        }

        Ok(out)
    }

    /// Parse an envelope.
    ///
    /// # Errors
    ///
    /// - `MissingDelimiter`, `DelimiterCollision`, `InvalidDecimalToken` for
    ///   malformed delimited envelopes
    /// - `Truncated`, `TrailingBytes` for malformed length-prefixed envelopes
    /// - `SegmentTooShort` if a segment cannot hold its IV
    pub fn decode(bytes: &[u8], framing: Framing) -> Result<Self> {
        let envelope = match framing {
            Framing::Delimited => decode_delimited(bytes)?,
            Framing::LengthPrefixed => decode_length_prefixed(bytes)?,
        };

        check_segment("index", &envelope.index_segment)?;
        check_segment("message", &envelope.message_segment)?;

        Ok(envelope)
    }
}

/// Frame an index and a message segment into envelope bytes.
///
/// # Errors
///
/// See [`Envelope::encode`].
pub fn encode(index_segment: &[u8], message_segment: &[u8], framing: Framing) -> Result<Vec<u8>> {
    Envelope::new(index_segment.to_vec(), message_segment.to_vec()).encode(framing)
}

/// Split envelope bytes into `(index_segment, message_segment)`.
///
/// # Errors
///
/// See [`Envelope::decode`].
pub fn decode(bytes: &[u8], framing: Framing) -> Result<(Vec<u8>, Vec<u8>)> {
    let envelope = Envelope::decode(bytes, framing)?;
    Ok((envelope.index_segment, envelope.message_segment))
}

fn decode_delimited(bytes: &[u8]) -> Result<Envelope> {
    let text = to_decimal_string(bytes);
    let parts: Vec<&str> = text.split(DELIMITER_TOKENS).collect();

    match parts.as_slice() {
        [index, message] => {
            Ok(Envelope::new(from_decimal_string(index)?, from_decimal_string(message)?))
        },
        [_] => Err(CodecError::MissingDelimiter),
        _ => Err(CodecError::DelimiterCollision { segments: parts.len() }),
    }
}

fn decode_length_prefixed(bytes: &[u8]) -> Result<Envelope> {
    let (index_segment, rest) = take_prefixed(bytes)?;
    let (message_segment, rest) = take_prefixed(rest)?;

    if !rest.is_empty() {
        return Err(CodecError::TrailingBytes { count: rest.len() });
    }

    Ok(Envelope::new(index_segment.to_vec(), message_segment.to_vec()))
}

/// Read one length-prefixed segment, returning it and the remaining bytes.
fn take_prefixed(bytes: &[u8]) -> Result<(&[u8], &[u8])> {
    let Some((prefix, rest)) = bytes.split_first_chunk::<LENGTH_PREFIX_SIZE>() else {
        return Err(CodecError::Truncated { expected: LENGTH_PREFIX_SIZE, actual: bytes.len() });
    };

    let len = u32::from_be_bytes(*prefix) as usize;
    if rest.len() < len {
        return Err(CodecError::Truncated { expected: len, actual: rest.len() });
    }

    Ok(rest.split_at(len))
}

fn check_segment(segment: &'static str, bytes: &[u8]) -> Result<()> {
    if bytes.len() < SEGMENT_IV_SIZE {
        return Err(CodecError::SegmentTooShort {
            segment,
            len: bytes.len(),
            min: SEGMENT_IV_SIZE,
        });
    }
    Ok(())
}
