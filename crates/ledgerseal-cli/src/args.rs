//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use ledgerseal_core::{Framing, ProtocolConfig};

/// Default database path
pub const DEFAULT_DB: &str = "ledgerseal.redb";

/// Default sender recorded for outgoing messages
pub const DEFAULT_SELF: &str = "self";

/// Ledgerseal operator CLI
#[derive(Parser, Debug)]
#[command(name = "ledgerseal")]
#[command(about = "Encrypt messages under public ledger blocks")]
#[command(version)]
pub struct Cli {
    /// Path to the contacts and ledger database
    #[arg(long, global = true, default_value = DEFAULT_DB)]
    pub db: PathBuf,

    /// Envelope framing
    #[arg(long, global = true, value_enum, default_value_t = FramingArg::LengthPrefixed)]
    pub framing: FramingArg,

    /// Own address, recorded as the sender of outgoing messages
    #[arg(long, global = true, default_value = DEFAULT_SELF)]
    pub me: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage contacts
    #[command(subcommand)]
    Contact(ContactCommand),

    /// Manage the local ledger mirror
    #[command(subcommand)]
    Block(BlockCommand),

    /// Encrypt a message for a contact, printing the hex envelope
    Encrypt {
        /// Receiver address
        #[arg(long)]
        to: String,

        /// LZ4-compress the text before encryption
        ///
        /// The payload carries a tag byte, so the receiver must decrypt with
        /// `--decompress`.
        #[arg(long)]
        compress: bool,

        /// Message text; read from stdin when absent
        #[arg(long)]
        text: Option<String>,
    },

    /// Decrypt a hex envelope from a contact
    Decrypt {
        /// Contact address whose static secret protects the envelope
        #[arg(long)]
        from: String,

        /// Decode a payload encrypted with `--compress`
        #[arg(long)]
        decompress: bool,

        /// Hex-encoded envelope
        envelope: String,
    },

    /// Inspect and update message history
    #[command(subcommand)]
    History(HistoryCommand),
}

/// `history` subcommands.
#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// Print every message exchanged with a contact, oldest first
    Show {
        /// Contact address
        address: String,
    },

    /// Print the most recent message exchanged with a contact
    Last {
        /// Contact address
        address: String,
    },

    /// Print the number of unread messages from a contact
    Unread {
        /// Contact address
        address: String,
    },

    /// Mark every message from a contact as read
    Read {
        /// Contact address
        address: String,
    },

    /// Mark every message sent to a contact as acknowledged
    Ack {
        /// Contact address
        address: String,
    },
}

/// `contact` subcommands.
#[derive(Subcommand, Debug)]
pub enum ContactCommand {
    /// Add or replace a contact
    Add {
        /// Contact address
        address: String,

        /// Hex-encoded static secret (16, 24 or 32 bytes)
        secret: String,

        /// Display name
        #[arg(long, default_value = "")]
        username: String,

        /// Invitation link
        #[arg(long, default_value = "")]
        link: String,
    },

    /// List contacts
    List,
}

/// `block` subcommands.
#[derive(Subcommand, Debug)]
pub enum BlockCommand {
    /// Record an observed block
    Add {
        /// Block index
        index: u64,

        /// Hex-encoded block hash
        hash: String,
    },
}

/// `--framing` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FramingArg {
    /// Segments separated by `*:*` (legacy peers)
    Delimited,
    /// Segments preceded by their length
    LengthPrefixed,
}

impl From<FramingArg> for Framing {
    fn from(arg: FramingArg) -> Self {
        match arg {
            FramingArg::Delimited => Framing::Delimited,
            FramingArg::LengthPrefixed => Framing::LengthPrefixed,
        }
    }
}

/// Settings resolved from the global flags.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Database path
    pub db: PathBuf,
    /// Own address
    pub me: String,
    /// Protocol settings
    pub protocol: ProtocolConfig,
}

impl Cli {
    /// Resolve the global flags.
    pub fn config(&self) -> CliConfig {
        CliConfig {
            db: self.db.clone(),
            me: self.me.clone(),
            protocol: ProtocolConfig { framing: self.framing.into() },
        }
    }
}
