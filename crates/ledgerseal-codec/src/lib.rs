//! Ledgerseal codecs
//!
//! Byte-level building blocks for the Ledgerseal message format. Everything
//! here is pure and allocation-only: no keys, no randomness, no I/O.
//!
//! - [`bytes`]: hex, zero-padding trim, decimal byte strings
//! - [`compression`]: LZ4 block compression, best-effort or tagged
//! - [`envelope`]: framing of the index and message segments into one blob

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod bytes;
pub mod compression;
pub mod envelope;
mod errors;

pub use bytes::{
    from_decimal_string, hex_decode, hex_encode, to_decimal_string, trim_trailing_padding,
};
pub use compression::{
    TAG_LZ4, TAG_PLAIN, compress, compress_tagged, decompress, decompress_padded,
    decompress_tagged, try_compress,
};
pub use envelope::{DELIMITER, Envelope, Framing, SEGMENT_IV_SIZE};
pub use errors::{CodecError, Result};
