//! Fuzz target for the decimal byte string and padding helpers
//!
//! - `from_decimal_string` never panics on arbitrary text
//! - bytes survive a trip through their decimal rendering
//! - padding trim, padded and tagged decompression never panic

#![no_main]

use ledgerseal_codec::{
    decompress_padded, decompress_tagged, from_decimal_string, to_decimal_string,
    trim_trailing_padding,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let rendered = to_decimal_string(data);
    assert_eq!(from_decimal_string(&rendered).expect("rendered string parses"), data);

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = from_decimal_string(text);
    }

    if let Ok(trimmed) = trim_trailing_padding(data) {
        assert!(trimmed.last().is_some_and(|&b| b != 0));
    }

    let _ = decompress_padded(data);
    let _ = decompress_tagged(data);
});
