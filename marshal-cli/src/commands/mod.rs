//! Subcommand handlers.
//!
//! Handlers return their stdout text so they can be tested without a
//! terminal; `main` does the printing.

use std::io::Read;

use marshal::Marshaler;

use crate::cli::Command;

mod batch;
mod codec;
mod fingerprint;
mod tx;

/// Runs `command`. `marshaler` is `Some` whenever [`Command::needs_abi`].
pub fn run(command: Command, marshaler: Option<&Marshaler>) -> Result<String, String> {
    let abi = || marshaler.ok_or_else(|| "this command needs an ABI".to_string());
    match command {
        Command::Fingerprint => fingerprint::handle(abi()?),
        Command::Encode(args) => codec::encode(abi()?, args),
        Command::Decode(args) => codec::decode(abi()?, args),
        Command::TxEncode(args) => tx::encode(abi()?, args),
        Command::TxDecode(args) => tx::decode(abi()?, args),
        Command::BatchEncode(args) => batch::encode(args),
        Command::BatchDecode(args) => batch::decode(args),
    }
}

/// Returns `arg`, or all of stdin when `arg` is `-`.
fn read_input(arg: String) -> Result<String, String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {e}"))?;
    Ok(buf)
}

/// Decodes hex input, tolerating a `0x` prefix and surrounding whitespace.
fn parse_hex(text: &str) -> Result<Vec<u8>, String> {
    let text = text.trim();
    let text = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(text).map_err(|e| format!("invalid hex input: {e}"))
}

fn to_pretty(json: &serde_json::Value) -> Result<String, String> {
    serde_json::to_string_pretty(json).map_err(|e| format!("failed to render JSON: {e}"))
}
