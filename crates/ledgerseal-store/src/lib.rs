//! Ledgerseal collaborator stores.
//!
//! Concrete implementations of the collaborator traits that
//! [`ledgerseal_core::CipherProtocol`] is generic over.
//!
//! # Components
//!
//! - [`MemoryStore`]: In-memory contacts and blocks for tests and simulation
//! - [`RedbStore`]: Durable contacts, ledger mirror and message history backed
//!   by Redb
//! - [`HistoryFile`]: Read-only contacts from the legacy `*:*` history file
//! - [`ChaoticSource`]: Fault-injecting wrapper over any collaborator
//! - [`SystemEnv`]: Production environment (OS randomness)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod chaotic;
mod error;
mod history;
mod memory;
mod record;
mod redb;
mod system_env;

pub use chaotic::ChaoticSource;
pub use error::StorageError;
pub use history::{FIELD_SEPARATOR, HistoryFile};
pub use memory::MemoryStore;
pub use record::{ContactRecord, MessageRecord, MessageStatus};
pub use self::redb::RedbStore;
pub use system_env::SystemEnv;
