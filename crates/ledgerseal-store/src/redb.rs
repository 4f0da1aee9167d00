//! Redb-backed durable contacts and ledger mirror.
//!
//! Uses Redb's ACID transactions with Copy-on-Write for crash safety.
//! Contacts, observed blocks and message history survive restarts of the
//! CLI.

use std::{path::Path, sync::Arc};

use ledgerseal_core::{Block, BlockKeySource, ContactSecretStore, Environment, SourceError};
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};

use crate::{
    error::StorageError,
    record::{ContactRecord, MessageRecord, MessageStatus, validate_hex},
};

/// Table: contacts
/// Key: contact address
/// Value: CBOR-encoded `ContactRecord`
const CONTACTS: TableDefinition<&str, &[u8]> = TableDefinition::new("contacts");

/// Table: blocks
/// Key: block index
/// Value: hex-encoded block hash
const BLOCKS: TableDefinition<u64, &str> = TableDefinition::new("blocks");

/// Table: messages
/// Key: (contact address, sequence number), sequence starting at 0
/// Value: CBOR-encoded `MessageRecord`
const MESSAGES: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("messages");

/// Durable store backed by Redb.
///
/// Thread-safe through Redb's internal locking. Clone is cheap (Arc).
#[derive(Clone)]
pub struct RedbStore<E> {
    db: Arc<Database>,
    env: E,
}

impl<E: Environment> RedbStore<E> {
    /// Open or create a Redb database at the given path.
    ///
    /// Creates tables if they don't exist (CONTACTS, BLOCKS, MESSAGES).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>, env: E) -> Result<Self, StorageError> {
        let db = Database::create(path.as_ref()).map_err(|e| StorageError::Io(e.to_string()))?;

        let txn = db.begin_write().map_err(|e| StorageError::Io(e.to_string()))?;
        {
            let _ = txn.open_table(CONTACTS).map_err(|e| StorageError::Io(e.to_string()))?;
            let _ = txn.open_table(BLOCKS).map_err(|e| StorageError::Io(e.to_string()))?;
            let _ = txn.open_table(MESSAGES).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(path = %path.as_ref().display(), "opened store");

        Ok(Self { db: Arc::new(db), env })
    }

    /// Insert or replace the contact stored under `record.address`.
    pub fn upsert_contact(&self, record: &ContactRecord) -> Result<(), StorageError> {
        record.validate()?;

        let mut bytes = Vec::new();
        ciborium::into_writer(record, &mut bytes)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let txn = self.db.begin_write().map_err(|e| StorageError::Io(e.to_string()))?;
        {
            let mut table =
                txn.open_table(CONTACTS).map_err(|e| StorageError::Io(e.to_string()))?;
            table
                .insert(record.address.as_str(), bytes.as_slice())
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(())
    }

    /// Contact stored under `address`.
    pub fn contact(&self, address: &str) -> Result<Option<ContactRecord>, StorageError> {
        let txn = self.db.begin_read().map_err(|e| StorageError::Io(e.to_string()))?;
        let table = txn.open_table(CONTACTS).map_err(|e| StorageError::Io(e.to_string()))?;

        match table.get(address).map_err(|e| StorageError::Io(e.to_string()))? {
            Some(value) => decode_contact(value.value()).map(Some),
            None => Ok(None),
        }
    }

    /// First contact added through `link`.
    pub fn contact_by_link(&self, link: &str) -> Result<Option<ContactRecord>, StorageError> {
        Ok(self.list_contacts()?.into_iter().find(|record| record.link == link))
    }

    /// All contacts ordered by address.
    pub fn list_contacts(&self) -> Result<Vec<ContactRecord>, StorageError> {
        let txn = self.db.begin_read().map_err(|e| StorageError::Io(e.to_string()))?;
        let table = txn.open_table(CONTACTS).map_err(|e| StorageError::Io(e.to_string()))?;

        let mut contacts = Vec::new();
        for result in table.iter().map_err(|e| StorageError::Io(e.to_string()))? {
            let (_, value) = result.map_err(|e| StorageError::Io(e.to_string()))?;
            contacts.push(decode_contact(value.value())?);
        }

        Ok(contacts)
    }

    /// Record an observed block.
    ///
    /// Re-recording the same hash is a no-op.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the index is already recorded with another hash
    /// - `InvalidRecord` if the hash is not hex
    pub fn record_block(&self, index: u64, hash: &str) -> Result<(), StorageError> {
        validate_hex("block hash", hash)?;

        let txn = self.db.begin_write().map_err(|e| StorageError::Io(e.to_string()))?;
        {
            let mut table = txn.open_table(BLOCKS).map_err(|e| StorageError::Io(e.to_string()))?;

            let existing = table
                .get(index)
                .map_err(|e| StorageError::Io(e.to_string()))?
                .map(|value| value.value().to_string());

            match existing {
                Some(existing) if existing != hash => {
                    return Err(StorageError::Conflict { index });
                },
                Some(_) => {},
                None => {
                    table.insert(index, hash).map_err(|e| StorageError::Io(e.to_string()))?;
                },
            }
        }
        txn.commit().map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(())
    }

    /// Number of observed blocks.
    pub fn block_count(&self) -> Result<u64, StorageError> {
        let txn = self.db.begin_read().map_err(|e| StorageError::Io(e.to_string()))?;
        let table = txn.open_table(BLOCKS).map_err(|e| StorageError::Io(e.to_string()))?;

        table.len().map_err(|e| StorageError::Io(e.to_string()))
    }

    /// Append a message to the history of `contact`.
    ///
    /// Returns the sequence number assigned to it.
    pub fn save_message(
        &self,
        contact: &str,
        record: &MessageRecord,
    ) -> Result<u64, StorageError> {
        let mut bytes = Vec::new();
        ciborium::into_writer(record, &mut bytes)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let txn = self.db.begin_write().map_err(|e| StorageError::Io(e.to_string()))?;
        let sequence = {
            let mut table =
                txn.open_table(MESSAGES).map_err(|e| StorageError::Io(e.to_string()))?;

            let last = table
                .range((contact, 0)..=(contact, u64::MAX))
                .map_err(|e| StorageError::Io(e.to_string()))?
                .next_back()
                .transpose()
                .map_err(|e| StorageError::Io(e.to_string()))?
                .map(|(key, _)| key.value().1);
            let sequence = last.map_or(0, |last| last + 1);

            table
                .insert((contact, sequence), bytes.as_slice())
                .map_err(|e| StorageError::Io(e.to_string()))?;
            sequence
        };
        txn.commit().map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(contact, sequence, status = %record.status, "message saved");

        Ok(sequence)
    }

    /// Full history with `contact`, oldest first.
    pub fn chat_history(&self, contact: &str) -> Result<Vec<MessageRecord>, StorageError> {
        let txn = self.db.begin_read().map_err(|e| StorageError::Io(e.to_string()))?;
        let table = txn.open_table(MESSAGES).map_err(|e| StorageError::Io(e.to_string()))?;

        let mut messages = Vec::new();
        for result in table
            .range((contact, 0)..=(contact, u64::MAX))
            .map_err(|e| StorageError::Io(e.to_string()))?
        {
            let (_, value) = result.map_err(|e| StorageError::Io(e.to_string()))?;
            messages.push(decode_message(value.value())?);
        }

        Ok(messages)
    }

    /// Most recent message with `contact`.
    pub fn last_message(&self, contact: &str) -> Result<Option<MessageRecord>, StorageError> {
        let txn = self.db.begin_read().map_err(|e| StorageError::Io(e.to_string()))?;
        let table = txn.open_table(MESSAGES).map_err(|e| StorageError::Io(e.to_string()))?;

        let last = table
            .range((contact, 0)..=(contact, u64::MAX))
            .map_err(|e| StorageError::Io(e.to_string()))?
            .next_back()
            .transpose()
            .map_err(|e| StorageError::Io(e.to_string()))?;

        match last {
            Some((_, value)) => decode_message(value.value()).map(Some),
            None => Ok(None),
        }
    }

    /// Number of incoming messages from `contact` not yet read.
    pub fn unread_count(&self, contact: &str) -> Result<usize, StorageError> {
        let history = self.chat_history(contact)?;
        Ok(history.iter().filter(|m| m.status == MessageStatus::Unread).count())
    }

    /// Mark every unread message from `contact` as read.
    ///
    /// Returns the number of messages changed.
    pub fn mark_read(&self, contact: &str) -> Result<usize, StorageError> {
        self.update_status(contact, MessageStatus::Unread, MessageStatus::Read)
    }

    /// Mark every sent message to `contact` as acknowledged.
    ///
    /// Returns the number of messages changed.
    pub fn mark_acknowledged(&self, contact: &str) -> Result<usize, StorageError> {
        self.update_status(contact, MessageStatus::Sent, MessageStatus::Acknowledged)
    }

    fn update_status(
        &self,
        contact: &str,
        from: MessageStatus,
        to: MessageStatus,
    ) -> Result<usize, StorageError> {
        let txn = self.db.begin_write().map_err(|e| StorageError::Io(e.to_string()))?;
        let changed = {
            let mut table =
                txn.open_table(MESSAGES).map_err(|e| StorageError::Io(e.to_string()))?;

            let mut pending = Vec::new();
            for result in table
                .range((contact, 0)..=(contact, u64::MAX))
                .map_err(|e| StorageError::Io(e.to_string()))?
            {
                let (key, value) = result.map_err(|e| StorageError::Io(e.to_string()))?;
                let record = decode_message(value.value())?;
                if record.status == from {
                    pending.push((key.value().1, record));
                }
            }

            for (sequence, record) in &mut pending {
                record.status = to;
                let mut bytes = Vec::new();
                ciborium::into_writer(&*record, &mut bytes)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                table
                    .insert((contact, *sequence), bytes.as_slice())
                    .map_err(|e| StorageError::Io(e.to_string()))?;
            }
            pending.len()
        };
        txn.commit().map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(changed)
    }

    fn pick_block(&self) -> Result<Option<Block>, StorageError> {
        let txn = self.db.begin_read().map_err(|e| StorageError::Io(e.to_string()))?;
        let table = txn.open_table(BLOCKS).map_err(|e| StorageError::Io(e.to_string()))?;

        let len = table.len().map_err(|e| StorageError::Io(e.to_string()))?;
        if len == 0 {
            return Ok(None);
        }

        let pick = self.env.random_u64()?;
        let nth = (pick % len) as usize;

        match table.iter().map_err(|e| StorageError::Io(e.to_string()))?.nth(nth) {
            Some(result) => {
                let (key, value) = result.map_err(|e| StorageError::Io(e.to_string()))?;
                Ok(Some(Block::new(key.value(), value.value().to_string())))
            },
            None => Ok(None),
        }
    }
}

impl<E: Environment> BlockKeySource for RedbStore<E> {
    fn random_block(&self) -> Result<Block, SourceError> {
        self.pick_block()?.ok_or_else(|| SourceError::Unavailable("no blocks observed".to_string()))
    }

    fn hash_of(&self, index: u64) -> Result<Option<String>, SourceError> {
        let lookup = || -> Result<Option<String>, StorageError> {
            let txn = self.db.begin_read().map_err(|e| StorageError::Io(e.to_string()))?;
            let table = txn.open_table(BLOCKS).map_err(|e| StorageError::Io(e.to_string()))?;

            Ok(table
                .get(index)
                .map_err(|e| StorageError::Io(e.to_string()))?
                .map(|value| value.value().to_string()))
        };

        Ok(lookup()?)
    }
}

impl<E: Environment> ContactSecretStore for RedbStore<E> {
    fn secret_of(&self, address: &str) -> Result<Option<String>, SourceError> {
        Ok(self.contact(address)?.map(|record| record.secret))
    }
}

fn decode_message(bytes: &[u8]) -> Result<MessageRecord, StorageError> {
    ciborium::from_reader(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
}

fn decode_contact(bytes: &[u8]) -> Result<ContactRecord, StorageError> {
    ciborium::from_reader(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
}
