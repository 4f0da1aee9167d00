//! Fuzz target for CipherProtocol under tampering and collaborator failures
//!
//! # Strategy
//!
//! - Encrypt an arbitrary message with deterministic IVs
//! - Apply arbitrary byte edits to the envelope
//! - Decrypt through collaborators that fail at a fuzzed rate
//!
//! # Invariants
//!
//! - The protocol NEVER panics on malformed envelopes
//! - An untouched envelope decrypts to the original message unless a
//!   collaborator failure was injected

#![no_main]

use arbitrary::Arbitrary;
use ledgerseal_core::{CipherProtocol, EntropyError, Environment, Framing, ProtocolConfig};
use ledgerseal_store::{ChaoticSource, ContactRecord, MemoryStore};
use libfuzzer_sys::fuzz_target;

#[derive(Clone)]
struct FillEnv(u8);

impl Environment for FillEnv {
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        buffer.fill(self.0);
        Ok(())
    }
}

#[derive(Debug, Arbitrary)]
struct Scenario {
    iv_fill: u8,
    chaos_seed: u64,
    /// Failure rate 0-9 maps to 0%-90%
    failure_rate_tenth: u8,
    delimited: bool,
    message: Vec<u8>,
    edits: Vec<(u16, u8)>,
}

fuzz_target!(|scenario: Scenario| {
    let env = FillEnv(scenario.iv_fill);
    let store = MemoryStore::new(env.clone());
    store
        .upsert_contact(&ContactRecord::new("0xalice", "000102030405060708090a0b0c0d0e0f"))
        .expect("valid contact");
    store.record_block(42, "0123456789abcdef0123456789abcdef").expect("valid block");

    let framing = if scenario.delimited { Framing::Delimited } else { Framing::LengthPrefixed };
    let failure_rate = (scenario.failure_rate_tenth % 10) as f64 / 10.0;
    let chaotic = ChaoticSource::with_seed(store, failure_rate, scenario.chaos_seed);
    let config = ProtocolConfig { framing };
    let protocol = CipherProtocol::with_config(env, chaotic.clone(), chaotic, config);

    let Ok(mut envelope) = protocol.encrypt("0xalice", &scenario.message) else {
        return;
    };

    if scenario.edits.is_empty() {
        match protocol.decrypt("0xalice", &envelope) {
            Ok(plaintext) => assert_eq!(plaintext, scenario.message),
            Err(err) => assert!(err.is_transient() || scenario.delimited, "{err}"),
        }
        return;
    }

    for (position, byte) in scenario.edits {
        if envelope.is_empty() {
            break;
        }
        let position = position as usize % envelope.len();
        envelope[position] = byte;
    }

    let _ = protocol.decrypt("0xalice", &envelope);
});
