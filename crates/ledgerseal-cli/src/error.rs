//! CLI error types.

use std::io;

use ledgerseal_codec::CodecError;
use ledgerseal_core::ProtocolError;
use ledgerseal_store::StorageError;
use thiserror::Error;

/// Errors surfaced to the operator.
#[derive(Error, Debug)]
pub enum CliError {
    /// Contact or block store failed
    #[error("store: {0}")]
    Storage(#[from] StorageError),

    /// Encryption or decryption failed
    #[error("protocol: {0}")]
    Protocol(#[from] ProtocolError),

    /// Envelope argument is not hex, or a `--decompress` payload is malformed
    #[error("codec: {0}")]
    Codec(#[from] CodecError),

    /// Reading stdin or writing stdout failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// Transient protocol failures exit with 75 (`EX_TEMPFAIL`) so scripts
    /// can retry; everything else exits with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Protocol(err) if err.is_transient() => 75,
            _ => 1,
        }
    }
}
