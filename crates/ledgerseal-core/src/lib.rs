//! Ledgerseal protocol core
//!
//! Message encryption where every message is keyed by a public ledger block
//! and only the block's index travels with the message, hidden under a
//! per-contact static secret. The receiver looks the block up again to
//! re-derive the key; no per-message key exchange is needed.
//!
//! # Architecture
//!
//! ```text
//! CipherProtocol
//!   ├── Environment         (IV randomness)
//!   ├── BlockKeySource      (random block / hash by index)
//!   ├── ContactSecretStore  (static secret by address)
//!   ├── ledgerseal-crypto   (AES-CFB segments)
//!   └── ledgerseal-codec    (envelope framing, hex)
//! ```
//!
//! Collaborators are injected, never reached through globals. The protocol
//! is synchronous and holds no per-call state, so one instance can serve
//! concurrent callers.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod error;
pub mod protocol;
pub mod source;
pub mod staging;

pub use env::{EntropyError, Environment};
pub use error::{KeyRole, ProtocolError, SegmentKind};
pub use ledgerseal_codec::Framing;
pub use protocol::{CipherProtocol, ProtocolConfig};
pub use source::{Block, BlockKeySource, ContactSecretStore, SourceError};
