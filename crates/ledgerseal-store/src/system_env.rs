//! Production `Environment` backed by the OS RNG.

use ledgerseal_core::{EntropyError, Environment};

/// Environment drawing IVs and block picks from `getrandom`.
///
/// Unlike a server, the CLI can report a failing RNG to the operator, so
/// failures surface as `EntropyError` instead of panicking.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        getrandom::fill(buffer).map_err(|e| EntropyError::new(e.to_string()))
    }
}
