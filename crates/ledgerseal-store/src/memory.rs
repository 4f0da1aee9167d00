#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
};

use ledgerseal_core::{Block, BlockKeySource, ContactSecretStore, Environment, SourceError};

use crate::{
    error::StorageError,
    record::{ContactRecord, validate_hex},
};

/// In-memory contacts and ledger mirror for testing and simulation
///
/// Blocks are kept in a `BTreeMap` so `random_block` picks deterministically
/// for a seeded environment. All state is wrapped in Arc<Mutex<>> so clones
/// share it. Uses `lock().expect()` which will panic if the mutex is poisoned
/// - acceptable for test code.
#[derive(Clone)]
pub struct MemoryStore<E> {
    env: E,
    inner: Arc<Mutex<MemoryStoreInner>>,
}

struct MemoryStoreInner {
    /// Contacts by address
    contacts: HashMap<String, ContactRecord>,

    /// Observed blocks, index -> hex hash
    blocks: BTreeMap<u64, String>,
}

impl<E: Environment> MemoryStore<E> {
    /// Create an empty store drawing block picks from `env`
    pub fn new(env: E) -> Self {
        Self {
            env,
            inner: Arc::new(Mutex::new(MemoryStoreInner {
                contacts: HashMap::new(),
                blocks: BTreeMap::new(),
            })),
        }
    }

    /// Insert or replace a contact.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn upsert_contact(&self, record: &ContactRecord) -> Result<(), StorageError> {
        record.validate()?;
        let mut inner = self.inner.lock().expect("Mutex poisoned");
        inner.contacts.insert(record.address.clone(), record.clone());
        Ok(())
    }

    /// Record an observed block.
    ///
    /// Re-recording the same hash is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn record_block(&self, index: u64, hash: &str) -> Result<(), StorageError> {
        validate_hex("block hash", hash)?;
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        match inner.blocks.get(&index) {
            Some(existing) if existing != hash => Err(StorageError::Conflict { index }),
            Some(_) => Ok(()),
            None => {
                inner.blocks.insert(index, hash.to_string());
                Ok(())
            },
        }
    }

    /// Number of stored contacts.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn contact_count(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").contacts.len()
    }

    /// Number of observed blocks.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn block_count(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").blocks.len()
    }
}

impl<E: Environment> BlockKeySource for MemoryStore<E> {
    #[allow(clippy::expect_used)]
    fn random_block(&self) -> Result<Block, SourceError> {
        let inner = self.inner.lock().expect("Mutex poisoned");
        if inner.blocks.is_empty() {
            return Err(SourceError::Unavailable("no blocks observed".to_string()));
        }

        let pick = self.env.random_u64().map_err(|e| SourceError::Unavailable(e.to_string()))?;
        let nth = (pick % inner.blocks.len() as u64) as usize;

        inner
            .blocks
            .iter()
            .nth(nth)
            .map(|(&index, hash)| Block::new(index, hash.clone()))
            .ok_or_else(|| SourceError::Corrupted("block pick out of range".to_string()))
    }

    #[allow(clippy::expect_used)]
    fn hash_of(&self, index: u64) -> Result<Option<String>, SourceError> {
        Ok(self.inner.lock().expect("Mutex poisoned").blocks.get(&index).cloned())
    }
}

impl<E: Environment> ContactSecretStore for MemoryStore<E> {
    #[allow(clippy::expect_used)]
    fn secret_of(&self, address: &str) -> Result<Option<String>, SourceError> {
        let inner = self.inner.lock().expect("Mutex poisoned");
        Ok(inner.contacts.get(address).map(|record| record.secret.clone()))
    }
}
