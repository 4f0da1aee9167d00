//! Base64 staging of segment plaintexts.
//!
//! Both segments encrypt base64 text rather than raw bytes. The index segment
//! carries the block index as decimal digits (`42` is staged as `"NDI="`).

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::{ProtocolError, SegmentKind};

/// Stage raw bytes as standard base64 text.
pub fn stage(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Recover raw bytes from staged text.
///
/// # Errors
///
/// - `Encoding` if the text is not canonical, padded base64
pub fn destage(text: &[u8], segment: SegmentKind) -> Result<Vec<u8>, ProtocolError> {
    STANDARD
        .decode(text)
        .map_err(|e| ProtocolError::Encoding { segment, reason: e.to_string() })
}

/// Stage a block index as base64 of its decimal digits.
pub fn stage_index(index: u64) -> String {
    stage(index.to_string().as_bytes())
}

/// Recover a block index from a decrypted index segment.
///
/// # Errors
///
/// - `Encoding` if the segment is not base64
/// - `Format` if the digits do not parse as a `u64`
pub fn destage_index(text: &[u8]) -> Result<u64, ProtocolError> {
    let digits = destage(text, SegmentKind::Index)?;
    let digits = std::str::from_utf8(&digits)
        .map_err(|e| ProtocolError::Format { reason: e.to_string() })?;

    digits.parse::<u64>().map_err(|e| ProtocolError::Format { reason: e.to_string() })
}
