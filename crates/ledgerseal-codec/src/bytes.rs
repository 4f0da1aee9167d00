//! Byte-level codecs: hex, zero-padding trim, and decimal byte strings.
//!
//! The decimal byte string renders every byte as its decimal value separated
//! by single spaces (`[1, 42, 255]` becomes `"1 42 255"`). It exists for the
//! delimited envelope framing, which locates the segment boundary by
//! splitting that text on a fixed token sequence.

use crate::errors::{CodecError, Result};

/// Encode bytes as lowercase hex.
pub fn hex_encode(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Decode a hex string.
///
/// # Errors
///
/// - `InvalidHex` on odd length or non-hex characters
pub fn hex_decode(text: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(text)?)
}

/// Strip trailing zero bytes from a fixed-size buffer.
///
/// Returns the prefix up to and including the last non-zero byte. Values
/// whose real encoding ends in zero bytes are truncated too, so new formats
/// carry explicit lengths instead.
///
/// # Errors
///
/// - `AllZero` if the buffer holds no non-zero byte (including empty buffers)
pub fn trim_trailing_padding(buffer: &[u8]) -> Result<&[u8]> {
    buffer
        .iter()
        .rposition(|&b| b != 0)
        .map(|last| &buffer[..=last])
        .ok_or(CodecError::AllZero { len: buffer.len() })
}

/// Render bytes as space-separated decimal values.
///
/// Empty input renders as the empty string.
pub fn to_decimal_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&byte.to_string());
    }
    out
}

/// Parse a space-separated decimal byte string.
///
/// Inverse of [`to_decimal_string`]. The empty string parses to no bytes.
///
/// # Errors
///
/// - `InvalidDecimalToken` if a token is empty, non-numeric, or above 255
pub fn from_decimal_string(text: &str) -> Result<Vec<u8>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    text.split(' ')
        .map(|token| {
            token
                .parse::<u8>()
                .map_err(|_| CodecError::InvalidDecimalToken { token: token.to_string() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let bytes = [0x00, 0x11, 0xAB, 0xFF];
        let text = hex_encode(bytes);
        assert_eq!(text, "0011abff");
        assert_eq!(hex_decode(&text).unwrap(), bytes);
    }

    #[test]
    fn hex_decode_accepts_uppercase() {
        assert_eq!(hex_decode("ABCDEF").unwrap(), vec![0xAB, 0xCD, 0xEF]);
    }

    #[test]
    fn hex_decode_rejects_odd_length() {
        assert!(matches!(hex_decode("abc"), Err(CodecError::InvalidHex { .. })));
    }

    #[test]
    fn hex_decode_rejects_non_hex() {
        assert!(matches!(hex_decode("zz"), Err(CodecError::InvalidHex { .. })));
    }

    #[test]
    fn trim_keeps_last_non_zero_byte() {
        let buffer = [1, 0, 2, 0, 0, 0];
        assert_eq!(trim_trailing_padding(&buffer).unwrap(), &[1, 0, 2]);
    }

    #[test]
    fn trim_without_padding_is_identity() {
        let buffer = [9, 8, 7];
        assert_eq!(trim_trailing_padding(&buffer).unwrap(), &buffer);
    }

    #[test]
    fn trim_all_zero_fails() {
        assert_eq!(trim_trailing_padding(&[0, 0, 0]), Err(CodecError::AllZero { len: 3 }));
    }

    #[test]
    fn trim_empty_fails() {
        assert_eq!(trim_trailing_padding(&[]), Err(CodecError::AllZero { len: 0 }));
    }

    #[test]
    fn trim_truncates_meaningful_trailing_zero() {
        // Known limitation: a value that really ends in zero loses it
        let value = [5, 0];
        assert_eq!(trim_trailing_padding(&value).unwrap(), &[5]);
    }

    #[test]
    fn decimal_string_format() {
        assert_eq!(to_decimal_string(&[0, 42, 58, 255]), "0 42 58 255");
        assert_eq!(to_decimal_string(&[7]), "7");
        assert_eq!(to_decimal_string(&[]), "");
    }

    #[test]
    fn decimal_string_roundtrip() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = to_decimal_string(&bytes);
        assert_eq!(from_decimal_string(&text).unwrap(), bytes);
    }

    #[test]
    fn decimal_string_rejects_out_of_range() {
        assert_eq!(
            from_decimal_string("1 256"),
            Err(CodecError::InvalidDecimalToken { token: "256".to_string() })
        );
    }

    #[test]
    fn decimal_string_rejects_non_numeric() {
        assert!(from_decimal_string("1 x 3").is_err());
    }

    #[test]
    fn decimal_string_rejects_double_space() {
        assert_eq!(
            from_decimal_string("1  3"),
            Err(CodecError::InvalidDecimalToken { token: String::new() })
        );
    }
}
