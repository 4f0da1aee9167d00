//! Envelope encryption keyed by public blocks.
//!
//! [`CipherProtocol`] ties the collaborators to the codecs and the stream
//! cipher. It keeps no state between calls: every `encrypt`/`decrypt`
//! decodes its keys, uses them once and drops them (zeroized).
//!
//! # Encrypt
//!
//! ```text
//! plaintext ──base64──► AES-CFB(block hash, IV_b) ──► message segment
//! block index ──decimal──base64──► AES-CFB(static secret, IV_a) ──► index segment
//! (index segment, message segment) ──framing──► envelope
//! ```
//!
//! # Decrypt
//!
//! The receiver decrypts the index segment with the static secret, resolves
//! the block hash for that index, then decrypts the message segment with it.
//! Any failure aborts with a [`ProtocolError`]; nothing is retried.

use ledgerseal_codec::{Envelope, Framing, hex_decode};
use ledgerseal_crypto::{CipherError, CipherKey, IV_SIZE, decrypt_segment, encrypt_segment};
use zeroize::Zeroizing;

use crate::{
    env::Environment,
    error::{KeyRole, ProtocolError, SegmentKind},
    source::{BlockKeySource, ContactSecretStore},
    staging::{destage, destage_index, stage, stage_index},
};

/// Protocol configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Envelope layout used for both encrypt and decrypt
    ///
    /// Defaults to length-prefixed. Delimited framing is only for peers that
    /// still speak the legacy layout.
    pub framing: Framing,
}

/// Dual-layer envelope encryption.
///
/// Generic over its collaborators so tests can inject deterministic or
/// failing implementations. Shareable across threads when `E`, `B` and `C`
/// are `Sync`: both operations take `&self`.
#[derive(Debug, Clone)]
pub struct CipherProtocol<E, B, C> {
    env: E,
    blocks: B,
    contacts: C,
    config: ProtocolConfig,
}

impl<E, B, C> CipherProtocol<E, B, C>
where
    E: Environment,
    B: BlockKeySource,
    C: ContactSecretStore,
{
    /// Create a protocol with the default configuration.
    pub fn new(env: E, blocks: B, contacts: C) -> Self {
        Self::with_config(env, blocks, contacts, ProtocolConfig::default())
    }

    /// Create a protocol with an explicit configuration.
    pub fn with_config(env: E, blocks: B, contacts: C, config: ProtocolConfig) -> Self {
        Self { env, blocks, contacts, config }
    }

    /// Active configuration.
    pub fn config(&self) -> ProtocolConfig {
        self.config
    }

    /// Block source this protocol keys messages with.
    pub fn blocks(&self) -> &B {
        &self.blocks
    }

    /// Contact store this protocol reads static secrets from.
    pub fn contacts(&self) -> &C {
        &self.contacts
    }

    /// Encrypt `plaintext` for `receiver`.
    ///
    /// Picks a fresh block from the block source as the ephemeral key and
    /// hides its index under the receiver's static secret.
    ///
    /// # Errors
    ///
    /// - `KeySource` if the block source or contact store fails
    /// - `KeyFormat` if the block hash or static secret is not a valid key
    /// - `UnknownContact` if `receiver` has no static secret
    /// - `Randomness` if IVs cannot be generated
    pub fn encrypt(&self, receiver: &str, plaintext: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        let staged_message = Zeroizing::new(stage(plaintext));

        let block = self.blocks.random_block().inspect_err(|e| {
            tracing::warn!("Block source failed to provide a block: {}", e);
        })?;
        let ephemeral_key = decode_key(&block.hash, KeyRole::Ephemeral)?;

        let static_key = self.static_key(receiver)?;

        tracing::debug!(
            block_index = block.index,
            plaintext_len = plaintext.len(),
            "Encrypting message for {}",
            receiver
        );

        let index_iv = self.fresh_iv()?;
        let index_segment =
            encrypt_segment(&static_key, index_iv, stage_index(block.index).as_bytes())
                .map_err(|e| cipher_error(e, KeyRole::Static))?;

        let message_iv = self.fresh_iv()?;
        let message_segment =
            encrypt_segment(&ephemeral_key, message_iv, staged_message.as_bytes())
                .map_err(|e| cipher_error(e, KeyRole::Ephemeral))?;

        let envelope =
            Envelope::new(index_segment, message_segment).encode(self.config.framing)?;

        tracing::debug!(envelope_len = envelope.len(), "Envelope sealed");

        Ok(envelope)
    }

    /// Decrypt an envelope received from (or stored for) `receiver`.
    ///
    /// # Errors
    ///
    /// - `Framing` if the envelope is malformed or a segment lacks its IV
    /// - `UnknownContact` if `receiver` has no static secret
    /// - `Encoding`/`Format` if the index segment does not decrypt to a
    ///   base64 decimal index (wrong static secret or tampering)
    /// - `UnknownBlock` if the index does not resolve to a block
    /// - `KeyFormat` if a stored key is not a valid key
    /// - `Encoding` if the message segment does not decrypt to base64
    pub fn decrypt(&self, receiver: &str, envelope: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        let envelope = Envelope::decode(envelope, self.config.framing).inspect_err(|e| {
            tracing::debug!("Rejecting envelope from {}: {}", receiver, e);
        })?;

        let static_key = self.static_key(receiver)?;
        let staged_index = decrypt_segment(&static_key, &envelope.index_segment)
            .map_err(|e| cipher_error(e, KeyRole::Static))?;
        let block_index = destage_index(&staged_index)?;

        tracing::debug!(block_index, "Resolving ephemeral block for {}", receiver);

        let block_hash = self
            .blocks
            .hash_of(block_index)
            .inspect_err(|e| tracing::warn!("Block source lookup failed: {}", e))?
            .ok_or(ProtocolError::UnknownBlock { index: block_index })?;
        let ephemeral_key = decode_key(&block_hash, KeyRole::Ephemeral)?;

        let staged_message =
            Zeroizing::new(decrypt_segment(&ephemeral_key, &envelope.message_segment).map_err(
                |e| cipher_error(e, KeyRole::Ephemeral),
            )?);

        destage(&staged_message, SegmentKind::Message)
    }

    /// Look up and decode the static secret of `address`.
    fn static_key(&self, address: &str) -> Result<CipherKey, ProtocolError> {
        let secret = self
            .contacts
            .secret_of(address)
            .inspect_err(|e| tracing::warn!("Contact store lookup failed: {}", e))?
            .ok_or_else(|| ProtocolError::UnknownContact { address: address.to_string() })?;
        let secret = Zeroizing::new(secret);

        decode_key(&secret, KeyRole::Static)
    }

    /// Draw a fresh IV from the environment.
    fn fresh_iv(&self) -> Result<[u8; IV_SIZE], ProtocolError> {
        let mut iv = [0u8; IV_SIZE];
        self.env.random_bytes(&mut iv).inspect_err(|e| {
            tracing::warn!("Randomness unavailable for IV: {}", e);
        })?;
        Ok(iv)
    }
}

/// Decode hex key material into a validated key.
fn decode_key(hex_key: &str, role: KeyRole) -> Result<CipherKey, ProtocolError> {
    let bytes =
        hex_decode(hex_key).map_err(|e| ProtocolError::KeyFormat { role, reason: e.to_string() })?;

    CipherKey::from_vec(bytes).map_err(|e| ProtocolError::KeyFormat { role, reason: e.to_string() })
}

/// Map a stream cipher failure onto the protocol taxonomy.
fn cipher_error(err: CipherError, role: KeyRole) -> ProtocolError {
    match err {
        CipherError::InvalidKeyLength { .. } => {
            ProtocolError::KeyFormat { role, reason: err.to_string() }
        },
        CipherError::SegmentTooShort { expected, actual } => {
            let segment = match role {
                KeyRole::Static => "index",
                KeyRole::Ephemeral => "message",
            };
            ProtocolError::Framing(ledgerseal_codec::CodecError::SegmentTooShort {
                segment,
                len: actual,
                min: expected,
            })
        },
    }
}
