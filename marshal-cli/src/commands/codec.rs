//! `encode` and `decode`.

use marshal::{Marshaler, TypeCategory};
use serde_json::json;

use super::{parse_hex, read_input, to_pretty};
use crate::cli::{DecodeArgs, EncodeArgs};

pub fn encode(marshaler: &Marshaler, args: EncodeArgs) -> Result<String, String> {
    let json = read_input(args.json)?;
    let encoded = if args.typed {
        marshaler.encode_typed_json(&args.ty, &json)
    } else {
        marshaler.encode_json(&args.ty, &json)
    };
    let bytes = encoded.map_err(|e| format!("failed to encode {}: {e}", args.ty))?;
    Ok(hex::encode(bytes))
}

pub fn decode(marshaler: &Marshaler, args: DecodeArgs) -> Result<String, String> {
    let bytes = parse_hex(&args.hex)?;

    let (json, consumed) = match args.ty {
        Some(ty) => {
            let (value, consumed) = marshaler
                .parse(&ty, &bytes)
                .map_err(|e| format!("failed to decode {ty}: {e}"))?;
            (value.to_json(), consumed)
        }
        None => {
            let category = if args.action {
                TypeCategory::Action
            } else {
                TypeCategory::Output
            };
            let (typed, value, consumed) = marshaler
                .parse_tagged(&bytes, category)
                .map_err(|e| format!("failed to decode {category}: {e}"))?;
            let json = json!({
                "id": typed.id,
                "name": typed.name,
                "data": value.to_json(),
            });
            (json, consumed)
        }
    };

    if consumed < bytes.len() {
        tracing::warn!(
            consumed,
            len = bytes.len(),
            "input has trailing bytes after the decoded value"
        );
    }
    to_pretty(&json)
}
