//! Ledgerseal operator CLI.
//!
//! Manages a Redb-backed contact list and ledger mirror and runs the cipher
//! protocol over it. The binary in `main.rs` only parses arguments and
//! installs logging; everything else lives here so it can be tested.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod args;
pub mod commands;
mod error;

pub use args::{Cli, CliConfig, Command, FramingArg};
pub use commands::run;
pub use error::CliError;
