//! `tx-encode` and `tx-decode`.

use marshal::{Marshaler, TransactionPayload};
use serde_json::json;

use super::{parse_hex, read_input, to_pretty};
use crate::cli::{TxDecodeArgs, TxEncodeArgs};

pub fn encode(marshaler: &Marshaler, args: TxEncodeArgs) -> Result<String, String> {
    let text = read_input(args.json)?;
    let json: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| format!("invalid payload JSON: {e}"))?;
    let payload =
        TransactionPayload::from_json(&json).map_err(|e| format!("invalid payload: {e}"))?;
    let digest = marshaler
        .encode_transaction(&payload)
        .map_err(|e| format!("failed to encode transaction: {e}"))?;
    Ok(hex::encode(digest))
}

pub fn decode(marshaler: &Marshaler, args: TxDecodeArgs) -> Result<String, String> {
    let bytes = parse_hex(&args.hex)?;

    if args.signed {
        let signed = marshaler
            .decode_signed_transaction(&bytes)
            .map_err(|e| format!("failed to decode signed transaction: {e}"))?;
        let mut json = signed.payload.to_json();
        json["digestLen"] = json!(signed.digest_len);
        json["auth"] = json!({
            "authId": signed.auth.auth_id,
            "publicKey": hex::encode(signed.auth.public_key),
            "signature": hex::encode(signed.auth.signature),
        });
        return to_pretty(&json);
    }

    let (payload, consumed) = marshaler
        .decode_transaction(&bytes)
        .map_err(|e| format!("failed to decode transaction: {e}"))?;
    if consumed < bytes.len() {
        tracing::warn!(
            consumed,
            len = bytes.len(),
            "trailing bytes after the digest; pass --signed for signed transactions"
        );
    }
    to_pretty(&payload.to_json())
}
