//! LZ4 block compression.
//!
//! [`compress`] and [`decompress`] are best-effort and never fail.
//! Compression falls back to the original bytes, decompression falls back to
//! the raw input read as text. Whether a payload was compressed is not
//! recorded, so mixing compressed and plain payloads through them is lossy.
//!
//! The tagged variants record it in a leading byte:
//!
//! ```text
//! [TAG_PLAIN] [utf-8 text]
//! [TAG_LZ4]   [LZ4 block]
//! ```

use lz4_flex::block;

use crate::{
    bytes::trim_trailing_padding,
    errors::{CodecError, Result},
};

/// Decompression buffer size as a multiple of the input length.
pub const DECOMPRESS_RATIO: usize = 10;

/// Tag of a payload carrying the text as is.
pub const TAG_PLAIN: u8 = 0;

/// Tag of a payload carrying an LZ4 block.
pub const TAG_LZ4: u8 = 1;

/// Compress text into an LZ4 block no larger than the input.
///
/// `None` when the input is empty or the block would be larger than the
/// input.
pub fn try_compress(text: &str) -> Option<Vec<u8>> {
    let source = text.as_bytes();
    let compressed = block::compress(source);

    if compressed.is_empty() || compressed.len() > source.len() {
        return None;
    }
    Some(compressed)
}

/// Compress text, returning the original bytes when [`try_compress`] fails.
///
/// The output is not guaranteed to be smaller, and nothing marks which of the
/// two happened.
pub fn compress(text: &str) -> Vec<u8> {
    try_compress(text).unwrap_or_else(|| text.as_bytes().to_vec())
}

/// Decompress an LZ4 block produced by [`compress`].
///
/// Falls back to the input interpreted as (lossy UTF-8) text when the block
/// is malformed or expands beyond [`DECOMPRESS_RATIO`] times its size.
pub fn decompress(bytes: &[u8]) -> String {
    decompress_block(bytes).unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
}

/// Decompress a block received zero-padded to a fixed size.
///
/// Legacy peers ship compressed blocks inside fixed-size buffers. Trailing
/// zero padding is trimmed before decompression; a buffer that is all zero is
/// passed through untrimmed.
pub fn decompress_padded(buffer: &[u8]) -> String {
    let block = trim_trailing_padding(buffer).unwrap_or(buffer);
    decompress(block)
}

/// Compress text behind a tag byte saying whether LZ4 was applied.
pub fn compress_tagged(text: &str) -> Vec<u8> {
    let (tag, body) = match try_compress(text) {
        Some(compressed) => (TAG_LZ4, compressed),
        None => (TAG_PLAIN, text.as_bytes().to_vec()),
    };

    let mut payload = Vec::with_capacity(1 + body.len());
    payload.push(tag);
    payload.extend_from_slice(&body);
    payload
}

/// Recover the text of a [`compress_tagged`] payload.
///
/// # Errors
///
/// - `MissingCompressionTag` for an empty payload
/// - `UnknownCompressionTag` if the first byte is not a tag
/// - `Decompression` if an LZ4-tagged block is malformed
pub fn decompress_tagged(payload: &[u8]) -> Result<String> {
    match payload.split_first() {
        None => Err(CodecError::MissingCompressionTag),
        Some((&TAG_PLAIN, text)) => Ok(String::from_utf8_lossy(text).into_owned()),
        Some((&TAG_LZ4, compressed)) => decompress_block(compressed),
        Some((&tag, _)) => Err(CodecError::UnknownCompressionTag { tag }),
    }
}

fn decompress_block(bytes: &[u8]) -> Result<String> {
    let mut decompressed = vec![0u8; bytes.len().saturating_mul(DECOMPRESS_RATIO)];

    let len = block::decompress_into(bytes, &mut decompressed)
        .map_err(|e| CodecError::Decompression { reason: e.to_string() })?;
    Ok(String::from_utf8_lossy(&decompressed[..len]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_roundtrip() {
        let text = "the quick brown fox jumps over the lazy dog. ".repeat(3);
        let compressed = compress(&text);

        assert!(compressed.len() < text.len());
        assert_eq!(decompress(&compressed), text);
    }

    #[test]
    fn compress_empty_returns_empty() {
        assert!(compress("").is_empty());
        assert_eq!(try_compress(""), None);
    }

    #[test]
    fn incompressible_input_returned_unchanged() {
        // Too short for LZ4 to fit its token overhead into the input size
        let text = "ab";
        assert_eq!(try_compress(text), None);
        assert_eq!(compress(text), text.as_bytes());
    }

    #[test]
    fn compressed_text_ending_in_nul_survives() {
        let text = format!("{}\0\0", "payload ".repeat(16));
        let compressed = compress(&text);

        assert_eq!(decompress(&compressed), text);
    }

    #[test]
    fn decompress_garbage_falls_back_to_input() {
        let garbage = [0xFF, 0xFF, 0xFF, 0xFF];
        let first = decompress(&garbage);
        let second = decompress(&garbage);

        assert_eq!(first, second);
    }

    #[test]
    fn decompress_empty_never_panics() {
        assert_eq!(decompress(&[]), "");
    }

    #[test]
    fn decompress_padded_trims_padding() {
        let text = "padded block padded block padded block";
        let mut buffer = compress(text);
        buffer.resize(buffer.len() + 16, 0);

        assert_eq!(decompress_padded(&buffer), text);
    }

    #[test]
    fn decompress_padded_all_zero_never_panics() {
        let buffer = [0u8; 8];
        let _ = decompress_padded(&buffer);
    }

    #[test]
    fn untagged_fallback_is_ambiguous() {
        // Short text that LZ4 cannot shrink is passed through, and the
        // passthrough happens to parse as an LZ4 block of different text.
        let text = "x31}YGf?";
        assert_eq!(compress(text), text.as_bytes());
        assert_ne!(decompress(text.as_bytes()), text);
    }

    #[test]
    fn tagged_roundtrip_incompressible() {
        let text = "x31}YGf?";
        let payload = compress_tagged(text);

        assert_eq!(payload[0], TAG_PLAIN);
        assert_eq!(decompress_tagged(&payload).unwrap(), text);
    }

    #[test]
    fn tagged_roundtrip_compressible() {
        let text = "the quick brown fox jumps over the lazy dog. ".repeat(3);
        let payload = compress_tagged(&text);

        assert_eq!(payload[0], TAG_LZ4);
        assert!(payload.len() < text.len());
        assert_eq!(decompress_tagged(&payload).unwrap(), text);
    }

    #[test]
    fn tagged_empty_text() {
        assert_eq!(compress_tagged(""), vec![TAG_PLAIN]);
        assert_eq!(decompress_tagged(&[TAG_PLAIN]).unwrap(), "");
    }

    #[test]
    fn tagged_rejects_bad_payloads() {
        assert_eq!(decompress_tagged(&[]), Err(CodecError::MissingCompressionTag));
        assert_eq!(
            decompress_tagged(&[7, 1, 2]),
            Err(CodecError::UnknownCompressionTag { tag: 7 })
        );
        assert!(matches!(
            decompress_tagged(&[TAG_LZ4, 0xFF, 0xFF, 0xFF, 0xFF]),
            Err(CodecError::Decompression { .. })
        ));
    }
}
