//! Chaotic collaborator wrapper for fault injection testing
//!
//! Wraps a block source or contact store and randomly fails lookups with
//! `SourceError::Unavailable`, so callers can be tested against a ledger
//! node that drops out mid-operation.

#![allow(clippy::disallowed_types, reason = "Locking simple RNG state")]

use std::sync::{Arc, Mutex};

use ledgerseal_core::{Block, BlockKeySource, ContactSecretStore, SourceError};

/// Seed used by [`ChaoticSource::new`].
const DEFAULT_SEED: u64 = 0x1234_5678_9ABC_DEF0;

/// Collaborator wrapper that randomly injects failures
///
/// Delegates to an underlying collaborator but fails each call with
/// probability `failure_rate`. The RNG state sits behind Arc<Mutex<>> so
/// clones share one failure sequence.
#[derive(Clone)]
pub struct ChaoticSource<S> {
    inner: S,
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    /// RNG state for deterministic chaos
    rng: Arc<Mutex<ChaoticRng>>,
    /// Failures injected so far
    failures: Arc<Mutex<usize>>,
}

/// Linear congruential generator, reproducible for a given seed.
struct ChaoticRng {
    state: u64,
}

impl ChaoticRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next value in [0.0, 1.0)
    fn next(&mut self) -> f64 {
        // Numerical Recipes constants
        const A: u64 = 1_664_525;
        const C: u64 = 1_013_904_223;
        const M: u64 = 1u64 << 32;

        self.state = (A.wrapping_mul(self.state).wrapping_add(C)) % M;
        (self.state as f64) / (M as f64)
    }
}

impl<S> ChaoticSource<S> {
    /// Wrap `inner` with the default seed.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn new(inner: S, failure_rate: f64) -> Self {
        Self::with_seed(inner, failure_rate, DEFAULT_SEED)
    }

    /// Wrap `inner` with an explicit seed for reproducible chaos.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn with_seed(inner: S, failure_rate: f64, seed: u64) -> Self {
        assert!(
            (0.0..=1.0).contains(&failure_rate),
            "failure_rate must be between 0.0 and 1.0, got {failure_rate}"
        );

        Self {
            inner,
            failure_rate,
            rng: Arc::new(Mutex::new(ChaoticRng::new(seed))),
            failures: Arc::new(Mutex::new(0)),
        }
    }

    /// Underlying collaborator.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of failures injected so far.
    pub fn failure_count(&self) -> usize {
        #[allow(clippy::expect_used)]
        *self.failures.lock().expect("failure counter mutex poisoned")
    }

    /// Roll the dice for one call.
    fn inject(&self, operation: &'static str) -> Result<(), SourceError> {
        #[allow(clippy::expect_used)]
        let fail = self.rng.lock().expect("ChaoticRng mutex poisoned").next() < self.failure_rate;
        if !fail {
            return Ok(());
        }

        #[allow(clippy::expect_used)]
        let mut failures = self.failures.lock().expect("failure counter mutex poisoned");
        *failures += 1;

        tracing::debug!(operation, "injected collaborator failure");
        Err(SourceError::Unavailable(format!("chaos: {operation} failed")))
    }
}

impl<S: BlockKeySource> BlockKeySource for ChaoticSource<S> {
    fn random_block(&self) -> Result<Block, SourceError> {
        self.inject("random_block")?;
        self.inner.random_block()
    }

    fn hash_of(&self, index: u64) -> Result<Option<String>, SourceError> {
        self.inject("hash_of")?;
        self.inner.hash_of(index)
    }
}

impl<S: ContactSecretStore> ContactSecretStore for ChaoticSource<S> {
    fn secret_of(&self, address: &str) -> Result<Option<String>, SourceError> {
        self.inject("secret_of")?;
        self.inner.secret_of(address)
    }
}
