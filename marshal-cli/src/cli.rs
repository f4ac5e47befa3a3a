//! Command-line surface.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::config::ABI_ENV;

#[derive(Parser, Debug)]
#[command(
    name = "marshal",
    version,
    about = "Encode and decode VM values, transactions and batch frames",
    arg_required_else_help = true
)]
pub struct Cli {
    /// ABI document (default: abi.json).
    #[arg(long, global = true, env = ABI_ENV, value_name = "PATH")]
    pub abi: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the ABI fingerprint.
    Fingerprint,

    /// Encode a JSON value; prints hex.
    Encode(EncodeArgs),

    /// Decode hex bytes; prints JSON.
    Decode(DecodeArgs),

    /// Encode a transaction payload; prints the digest as hex.
    TxEncode(TxEncodeArgs),

    /// Decode a transaction digest (or signed transaction); prints JSON.
    TxDecode(TxDecodeArgs),

    /// Frame hex messages into one batch.
    BatchEncode(BatchEncodeArgs),

    /// Split a batch; prints one hex message per line.
    BatchDecode(BatchDecodeArgs),
}

impl Command {
    /// Whether the command needs an ABI.
    pub fn needs_abi(&self) -> bool {
        !matches!(self, Command::BatchEncode(_) | Command::BatchDecode(_))
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Type name or descriptor, e.g. `Transfer` or `[]uint64`.
    #[arg(long = "type", value_name = "TYPE")]
    pub ty: String,

    /// Reject unknown fields and prefix the type id.
    #[arg(long)]
    pub typed: bool,

    /// JSON value, or `-` to read stdin.
    #[arg(value_name = "JSON")]
    pub json: String,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["ty", "action", "output"])
))]
pub struct DecodeArgs {
    /// Decode as this type name or descriptor.
    #[arg(long = "type", value_name = "TYPE")]
    pub ty: Option<String>,

    /// Decode an id-tagged action.
    #[arg(long)]
    pub action: bool,

    /// Decode an id-tagged output.
    #[arg(long)]
    pub output: bool,

    /// Hex bytes, with or without `0x`.
    #[arg(value_name = "HEX")]
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct TxEncodeArgs {
    /// Transaction payload JSON, or `-` to read stdin.
    #[arg(value_name = "JSON")]
    pub json: String,
}

#[derive(Args, Debug)]
pub struct TxDecodeArgs {
    /// Input carries an auth trailer after the digest.
    #[arg(long)]
    pub signed: bool,

    /// Hex bytes, with or without `0x`.
    #[arg(value_name = "HEX")]
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct BatchEncodeArgs {
    /// Messages as hex, in order.
    #[arg(value_name = "HEX")]
    pub messages: Vec<String>,
}

#[derive(Args, Debug)]
pub struct BatchDecodeArgs {
    /// Framed batch as hex.
    #[arg(value_name = "HEX")]
    pub hex: String,
}
