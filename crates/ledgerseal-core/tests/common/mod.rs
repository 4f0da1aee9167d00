//! Shared fakes for protocol tests.

#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use ledgerseal_core::{
    Block, BlockKeySource, ContactSecretStore, EntropyError, Environment, SourceError,
};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Secret of the contact `alice` in every fixture.
pub const ALICE_SECRET: &str = "00112233445566778899aabbccddeeff";

/// Seeded ChaCha environment: reproducible, still uniformly random.
#[derive(Clone)]
pub struct SeededEnv {
    rng: Arc<Mutex<ChaCha20Rng>>,
}

impl SeededEnv {
    pub fn new(seed: u64) -> Self {
        Self { rng: Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(seed))) }
    }
}

impl Environment for SeededEnv {
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        self.rng.lock().unwrap().fill_bytes(buffer);
        Ok(())
    }
}

/// Environment replaying scripted chunks, one per `random_bytes` call.
#[derive(Clone)]
pub struct ScriptedEnv {
    chunks: Arc<Mutex<VecDeque<Vec<u8>>>>,
}

impl ScriptedEnv {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self { chunks: Arc::new(Mutex::new(chunks.into())) }
    }
}

impl Environment for ScriptedEnv {
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        let chunk = self
            .chunks
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| EntropyError::new("script exhausted"))?;
        buffer.copy_from_slice(&chunk[..buffer.len()]);
        Ok(())
    }
}

/// In-test ledger choosing blocks with its own environment.
pub struct FakeLedger<E> {
    env: E,
    blocks: Vec<Block>,
}

impl<E: Environment> FakeLedger<E> {
    pub fn new(env: E, blocks: Vec<Block>) -> Self {
        Self { env, blocks }
    }

    /// Ledger of `count` blocks starting at height 1000 with seeded hashes.
    pub fn seeded(env: E, count: u64, seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let blocks = (0..count)
            .map(|i| {
                let mut hash = [0u8; 32];
                rng.fill_bytes(&mut hash);
                Block::new(1000 + i, hex::encode(hash))
            })
            .collect();
        Self { env, blocks }
    }
}

impl<E: Environment> BlockKeySource for FakeLedger<E> {
    fn random_block(&self) -> Result<Block, SourceError> {
        if self.blocks.is_empty() {
            return Err(SourceError::Unavailable("empty ledger".to_string()));
        }
        let pick = self.env.random_u64().map_err(|e| SourceError::Unavailable(e.to_string()))?;
        Ok(self.blocks[(pick % self.blocks.len() as u64) as usize].clone())
    }

    fn hash_of(&self, index: u64) -> Result<Option<String>, SourceError> {
        Ok(self.blocks.iter().find(|b| b.index == index).map(|b| b.hash.clone()))
    }
}

/// Contact store backed by a map.
pub struct FakeContacts(pub HashMap<String, String>);

impl FakeContacts {
    pub fn with_alice() -> Self {
        Self(HashMap::from([("alice".to_string(), ALICE_SECRET.to_string())]))
    }
}

impl ContactSecretStore for FakeContacts {
    fn secret_of(&self, address: &str) -> Result<Option<String>, SourceError> {
        Ok(self.0.get(address).cloned())
    }
}
