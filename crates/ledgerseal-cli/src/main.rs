//! Ledgerseal CLI binary.
//!
//! # Usage
//!
//! ```bash
//! ledgerseal contact add 0xalice 000102030405060708090a0b0c0d0e0f --username alice
//! ledgerseal block add 42 0123456789abcdef0123456789abcdef
//! ledgerseal encrypt --to 0xalice --text hello
//! ledgerseal decrypt --from 0xalice <hex-envelope>
//! ```

use std::process::ExitCode;

use clap::Parser;
use ledgerseal_cli::{Cli, run};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli, std::io::stdin().lock(), std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(err.exit_code())
        },
    }
}
