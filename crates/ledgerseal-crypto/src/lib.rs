//! Ledgerseal Cryptographic Primitives
//!
//! Stream cipher building blocks for Ledgerseal envelopes. Pure functions:
//! callers provide IVs so tests can be deterministic.
//!
//! # Key Lifecycle
//!
//! Every envelope is encrypted under two keys:
//!
//! ```text
//! Contact static secret (hex, per contact)
//!        │
//!        ▼
//! AES-CFB(IV_a) → Index segment   (which block to look up)
//!
//! Block hash (hex, public, one block per message)
//!        │
//!        ▼
//! AES-CFB(IV_b) → Message segment (the payload)
//! ```
//!
//! Both keys are decoded into a [`CipherKey`] for exactly one operation and
//! zeroized when it is dropped.
//!
//! # Security
//!
//! - Confidentiality of the index rests on the static secret
//! - Confidentiality of the message rests on the block hash staying unknown
//!   to anyone who cannot decrypt the index
//! - No integrity: CFB is malleable and there is no MAC. Tampering changes
//!   the plaintext, it is not detected
//! - IVs must come from a cryptographically secure source and never repeat
//!   under the same key

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
pub mod key;
pub mod stream;

pub use error::CipherError;
pub use key::{CipherKey, KeySize};
pub use stream::{IV_SIZE, decrypt_segment, encrypt_segment};
