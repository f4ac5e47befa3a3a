// marshal-cli/src/main.rs

//! `marshal` binary.
//!
//! Thin command-line front end over the `marshal` crate:
//!
//! - `fingerprint` of the configured ABI,
//! - `encode` / `decode` of single ABI values,
//! - `tx-encode` / `tx-decode` of transaction digests,
//! - `batch-encode` / `batch-decode` of transport frames.
//!
//! Results go to stdout, diagnostics to stderr.

mod cli;
mod commands;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::CliConfig;

fn main() {
    let cli = Cli::parse();
    let config = CliConfig::default().with_abi(cli.abi.clone());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    if let Err(e) = run(cli, &config) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &CliConfig) -> Result<(), String> {
    let marshaler = if cli.command.needs_abi() {
        Some(config.load_marshaler()?)
    } else {
        None
    };

    let output = commands::run(cli.command, marshaler.as_ref())?;
    println!("{output}");
    Ok(())
}
