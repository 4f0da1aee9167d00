//! Subcommand execution.
//!
//! Commands read from and write to injected streams so they run the same
//! under `main` and in tests.

use std::{
    io::{Read, Write},
    time::{SystemTime, UNIX_EPOCH},
};

use ledgerseal_codec::{compress_tagged, decompress_tagged, hex_decode, hex_encode};
use ledgerseal_core::CipherProtocol;
use ledgerseal_store::{ContactRecord, MessageRecord, RedbStore, SystemEnv};

use crate::{
    args::{BlockCommand, Cli, CliConfig, Command, ContactCommand, HistoryCommand},
    error::CliError,
};

/// Run the parsed command line against the configured database.
///
/// `input` backs `encrypt` without `--text`; results are written to `output`.
/// Envelopes produced by `encrypt` and accepted by `decrypt` are appended to
/// the contact's message history.
pub fn run<R: Read, W: Write>(cli: Cli, input: R, mut output: W) -> Result<(), CliError> {
    let config = cli.config();
    let store = RedbStore::open(&config.db, SystemEnv::new())?;

    match cli.command {
        Command::Contact(ContactCommand::Add { address, secret, username, link }) => {
            let record =
                ContactRecord::new(address, secret).with_username(username).with_link(link);
            store.upsert_contact(&record)?;
            tracing::info!(address = %record.address, "contact saved");
        },
        Command::Contact(ContactCommand::List) => {
            for record in store.list_contacts()? {
                let unread = store.unread_count(&record.address)?;
                writeln!(
                    output,
                    "{}\t{}\t{}\t{unread}",
                    record.address, record.username, record.link
                )?;
            }
        },
        Command::Block(BlockCommand::Add { index, hash }) => {
            store.record_block(index, &hash)?;
            tracing::info!(index, "block recorded");
        },
        Command::Encrypt { to, compress, text } => {
            let text = match text {
                Some(text) => text,
                None => read_text(input)?,
            };
            let payload = if compress { compress_tagged(&text) } else { text.into_bytes() };

            let envelope = protocol(store.clone(), &config).encrypt(&to, &payload)?;
            let record = MessageRecord::outgoing(&config.me, unix_now(), envelope.clone());
            store.save_message(&to, &record)?;

            writeln!(output, "{}", hex_encode(&envelope))?;
        },
        Command::Decrypt { from, decompress, envelope } => {
            let envelope = hex_decode(envelope.trim())?;
            let plaintext = protocol(store.clone(), &config).decrypt(&from, &envelope)?;
            let text = if decompress { Some(decompress_tagged(&plaintext)?) } else { None };

            store.save_message(&from, &MessageRecord::incoming(&from, unix_now(), envelope))?;

            match text {
                Some(text) => writeln!(output, "{text}")?,
                None => {
                    output.write_all(&plaintext)?;
                    writeln!(output)?;
                },
            }
        },
        Command::History(HistoryCommand::Show { address }) => {
            for message in store.chat_history(&address)? {
                write_message(&mut output, &message)?;
            }
        },
        Command::History(HistoryCommand::Last { address }) => {
            if let Some(message) = store.last_message(&address)? {
                write_message(&mut output, &message)?;
            }
        },
        Command::History(HistoryCommand::Unread { address }) => {
            writeln!(output, "{}", store.unread_count(&address)?)?;
        },
        Command::History(HistoryCommand::Read { address }) => {
            writeln!(output, "{}", store.mark_read(&address)?)?;
        },
        Command::History(HistoryCommand::Ack { address }) => {
            writeln!(output, "{}", store.mark_acknowledged(&address)?)?;
        },
    }

    output.flush()?;
    Ok(())
}

/// One history line: `timestamp  status  sender  hex envelope`.
fn write_message<W: Write>(output: &mut W, message: &MessageRecord) -> Result<(), CliError> {
    writeln!(
        output,
        "{}\t{}\t{}\t{}",
        message.timestamp,
        message.status,
        message.sender,
        hex_encode(&message.envelope)
    )?;
    Ok(())
}

#[allow(clippy::disallowed_methods)]
fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_secs())
}

fn protocol(
    store: RedbStore<SystemEnv>,
    config: &CliConfig,
) -> CipherProtocol<SystemEnv, RedbStore<SystemEnv>, RedbStore<SystemEnv>> {
    CipherProtocol::with_config(SystemEnv::new(), store.clone(), store, config.protocol)
}

/// Read the message from stdin, dropping one trailing line break.
fn read_text<R: Read>(mut input: R) -> Result<String, CliError> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}
