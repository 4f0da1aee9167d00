//! Environment abstraction for deterministic testing.
//!
//! Decouples the protocol from system randomness. Production uses the OS
//! RNG; tests plug in seeded or failing sources.

use thiserror::Error;

/// The randomness source could not produce bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("randomness unavailable: {reason}")]
pub struct EntropyError {
    /// Description from the underlying source
    pub reason: String,
}

impl EntropyError {
    /// Create an entropy error with a reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Abstract environment providing randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - A failure is reported, never papered over with predictable bytes
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    ///
    /// # Invariants
    ///
    /// - Given the same RNG seed, this produces the same sequence of bytes
    /// - Uses cryptographically secure RNG
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError>;

    /// Generates a random `u64`.
    ///
    /// Used by block sources to pick a block uniformly.
    fn random_u64(&self) -> Result<u64, EntropyError> {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes)?;
        Ok(u64::from_be_bytes(bytes))
    }
}
