//! `batch-encode` and `batch-decode`.

use marshal::{decode_batch, encode_batch};

use super::parse_hex;
use crate::cli::{BatchDecodeArgs, BatchEncodeArgs};

pub fn encode(args: BatchEncodeArgs) -> Result<String, String> {
    let messages = args
        .messages
        .iter()
        .map(|m| parse_hex(m))
        .collect::<Result<Vec<_>, _>>()?;
    let framed = encode_batch(&messages).map_err(|e| format!("failed to frame batch: {e}"))?;
    Ok(hex::encode(framed))
}

pub fn decode(args: BatchDecodeArgs) -> Result<String, String> {
    let bytes = parse_hex(&args.hex)?;
    let messages = decode_batch(&bytes).map_err(|e| format!("invalid batch: {e}"))?;
    Ok(messages
        .iter()
        .map(hex::encode)
        .collect::<Vec<_>>()
        .join("\n"))
}
