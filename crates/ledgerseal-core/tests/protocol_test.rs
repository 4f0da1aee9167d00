//! Scenario tests for the envelope protocol
//!
//! Fixed keys, fixed IVs and hand-picked blocks: concrete envelope sizes,
//! error kinds seen by callers, the delimiter collision of the legacy
//! framing, and concurrent use of one protocol instance.

mod common;

use std::collections::HashMap;

use common::{ALICE_SECRET, FakeContacts, FakeLedger, ScriptedEnv, SeededEnv};
use ledgerseal_codec::{CodecError, DELIMITER, Envelope};
use ledgerseal_core::{
    Block, CipherProtocol, Framing, ProtocolConfig, ProtocolError, SegmentKind, SourceError,
};

const ZERO_HASH: &str = "00000000000000000000000000000000";

type ScriptedProtocol = CipherProtocol<ScriptedEnv, FakeLedger<SeededEnv>, FakeContacts>;

fn scripted(framing: Framing, ivs: Vec<Vec<u8>>, blocks: Vec<Block>) -> ScriptedProtocol {
    CipherProtocol::with_config(
        ScriptedEnv::new(ivs),
        FakeLedger::new(SeededEnv::new(0), blocks),
        FakeContacts::with_alice(),
        ProtocolConfig { framing },
    )
}

#[test]
fn hello_through_block_42() {
    for (framing, expected_len) in [(Framing::Delimited, 47), (Framing::LengthPrefixed, 52)] {
        let protocol = scripted(
            framing,
            vec![vec![0xA5; 16], vec![0x5A; 16], vec![0xA5; 16], vec![0x5A; 16]],
            vec![Block::new(42, ZERO_HASH)],
        );

        let envelope = protocol.encrypt("alice", b"hello").unwrap();
        assert_eq!(envelope.len(), expected_len, "{framing:?}");
        assert_eq!(protocol.decrypt("alice", &envelope).unwrap(), b"hello");
    }
}

#[test]
fn delimiter_in_message_iv_breaks_delimited_framing_only() {
    // IV_b carries the delimiter bytes, so the message segment reproduces it
    let mut colliding_iv = vec![0x10; 16];
    colliding_iv[6..9].copy_from_slice(&DELIMITER);
    let ivs = vec![vec![0x01; 16], colliding_iv];

    let delimited = scripted(Framing::Delimited, ivs.clone(), vec![Block::new(42, ZERO_HASH)]);
    let envelope = delimited.encrypt("alice", b"hello").unwrap();
    assert!(matches!(
        delimited.decrypt("alice", &envelope),
        Err(ProtocolError::Framing(CodecError::DelimiterCollision { .. }))
    ));

    let prefixed = scripted(Framing::LengthPrefixed, ivs, vec![Block::new(42, ZERO_HASH)]);
    let envelope = prefixed.encrypt("alice", b"hello").unwrap();
    let decoded = Envelope::decode(&envelope, Framing::LengthPrefixed).unwrap();
    assert_eq!(&decoded.message_segment[6..9], &DELIMITER);
    assert_eq!(prefixed.decrypt("alice", &envelope).unwrap(), b"hello");
}

#[test]
fn framing_mismatch_fails() {
    let env = SeededEnv::new(3);
    let sender = CipherProtocol::with_config(
        env.clone(),
        FakeLedger::seeded(env.clone(), 4, 3),
        FakeContacts::with_alice(),
        ProtocolConfig { framing: Framing::LengthPrefixed },
    );
    let receiver = CipherProtocol::with_config(
        env.clone(),
        FakeLedger::seeded(env, 4, 3),
        FakeContacts::with_alice(),
        ProtocolConfig { framing: Framing::Delimited },
    );

    let envelope = sender.encrypt("alice", b"hello").unwrap();
    assert!(receiver.decrypt("alice", &envelope).is_err());
}

#[test]
fn wrong_static_secret_cannot_recover_index() {
    let env = SeededEnv::new(11);
    let sender = CipherProtocol::new(
        env.clone(),
        FakeLedger::seeded(env.clone(), 8, 11),
        FakeContacts::with_alice(),
    );
    let envelope = sender.encrypt("alice", b"for alice only").unwrap();

    let other_secret = "ffeeddccbbaa99887766554433221100";
    let eavesdropper = CipherProtocol::new(
        env.clone(),
        FakeLedger::seeded(env, 8, 11),
        FakeContacts(HashMap::from([("alice".to_string(), other_secret.to_string())])),
    );

    let result = eavesdropper.decrypt("alice", &envelope);
    assert_ne!(result.ok(), Some(b"for alice only".to_vec()));
}

#[test]
fn changed_secret_length_is_hard_failure() {
    let env = SeededEnv::new(5);
    let sender = CipherProtocol::new(
        env.clone(),
        FakeLedger::seeded(env.clone(), 2, 5),
        FakeContacts::with_alice(),
    );
    let envelope = sender.encrypt("alice", b"hello").unwrap();

    let truncated = &ALICE_SECRET[..30];
    let receiver = CipherProtocol::new(
        env.clone(),
        FakeLedger::seeded(env, 2, 5),
        FakeContacts(HashMap::from([("alice".to_string(), truncated.to_string())])),
    );

    assert!(matches!(
        receiver.decrypt("alice", &envelope),
        Err(ProtocolError::KeyFormat { .. })
    ));
}

#[test]
fn empty_ledger_is_key_source_error() {
    let protocol = scripted(Framing::LengthPrefixed, vec![], vec![]);

    let err = protocol.encrypt("alice", b"hello").unwrap_err();
    assert_eq!(err, ProtocolError::KeySource(SourceError::Unavailable("empty ledger".to_string())));
    assert!(err.is_transient());
}

#[test]
fn garbage_message_segment_is_encoding_error() {
    let protocol = scripted(
        Framing::LengthPrefixed,
        vec![vec![0x01; 16], vec![0x02; 16]],
        vec![Block::new(42, ZERO_HASH)],
    );
    let envelope = protocol.encrypt("alice", b"hello").unwrap();

    let mut decoded = Envelope::decode(&envelope, Framing::LengthPrefixed).unwrap();
    // Flip the padding character of "aGVsbG8=" into something invalid
    let last = decoded.message_segment.len() - 1;
    decoded.message_segment[last] ^= b'=' ^ b'!';
    let tampered = decoded.encode(Framing::LengthPrefixed).unwrap();

    assert!(matches!(
        protocol.decrypt("alice", &tampered),
        Err(ProtocolError::Encoding { segment: SegmentKind::Message, .. })
    ));
}

#[test]
fn concurrent_callers_share_one_protocol() {
    let env = SeededEnv::new(99);
    let protocol = CipherProtocol::new(
        env.clone(),
        FakeLedger::seeded(env, 32, 99),
        FakeContacts::with_alice(),
    );

    std::thread::scope(|scope| {
        for worker in 0..4u8 {
            let protocol = &protocol;
            scope.spawn(move || {
                for round in 0..25u8 {
                    let plaintext = vec![worker, round, 0xEE];
                    let envelope = protocol.encrypt("alice", &plaintext).unwrap();
                    assert_eq!(protocol.decrypt("alice", &envelope).unwrap(), plaintext);
                }
            });
        }
    });
}
