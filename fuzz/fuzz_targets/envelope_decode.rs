//! Fuzz target for Envelope::decode
//!
//! Decodes arbitrary bytes under both framings. Decoding should NEVER panic,
//! and any envelope that decodes under the length-prefixed framing must
//! re-encode to the same bytes.

#![no_main]

use ledgerseal_codec::{Envelope, Framing, SEGMENT_IV_SIZE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(envelope) = Envelope::decode(data, Framing::Delimited) {
        assert!(envelope.index_segment.len() >= SEGMENT_IV_SIZE);
        assert!(envelope.message_segment.len() >= SEGMENT_IV_SIZE);
    }

    if let Ok(envelope) = Envelope::decode(data, Framing::LengthPrefixed) {
        let encoded = envelope.encode(Framing::LengthPrefixed).expect("decoded segments fit u32");
        assert_eq!(encoded, data);
    }
});
