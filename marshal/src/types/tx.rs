//! Transaction payloads.
//!
//! A [`TransactionPayload`] is built by the caller right before signing and
//! is never persisted here. Its JSON form uses base-10 strings for the
//! numeric header fields so 256-bit chain ids survive untouched:
//!
//! ```json
//! { "base": { "timestamp": "1717111222000", "chainId": "...", "maxFee": "10000000000" },
//!   "actions": [ { "actionName": "Transfer", "data": { ... } } ] }
//! ```

use primitive_types::U256;
use serde_json::json;

use super::value::Value;
use crate::codec::numeric::parse_unsigned;
use crate::error::{CodecError, MarshalError};

/// Auth scheme id for Ed25519, the only supported scheme.
pub const ED25519_AUTH_ID: u8 = 0x00;

/// Length of an Ed25519 public key.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Length of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// Transaction header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionBase {
    /// Milliseconds since Unix epoch. Only whole seconds reach the wire.
    pub timestamp: u64,
    pub chain_id: U256,
    pub max_fee: u64,
}

/// One action: the ABI action name and its struct value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActionData {
    pub action_name: String,
    pub data: Value,
}

impl ActionData {
    pub fn new(action_name: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            action_name: action_name.into(),
            data: data.into(),
        }
    }
}

/// Header plus ordered actions; the unsigned body of a transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionPayload {
    pub base: TransactionBase,
    pub actions: Vec<ActionData>,
}

impl TransactionPayload {
    /// Parses the JSON form described in the module docs.
    ///
    /// Header numbers may be JSON numbers or base-10 strings.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, MarshalError> {
        let base = &json["base"];
        let base = TransactionBase {
            timestamp: json_u64(&base["timestamp"], "timestamp")?,
            chain_id: json_u256(&base["chainId"])?,
            max_fee: json_u64(&base["maxFee"], "maxFee")?,
        };

        let actions = match &json["actions"] {
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| -> Result<ActionData, MarshalError> {
                    let action_name = item["actionName"]
                        .as_str()
                        .ok_or(CodecError::UnexpectedValue {
                            expected: "actionName string",
                            found: json_kind(&item["actionName"]),
                        })?
                        .to_string();
                    let data = Value::from_json(&item["data"])?;
                    Ok(ActionData { action_name, data })
                })
                .collect::<Result<Vec<_>, MarshalError>>()?,
            other => {
                return Err(CodecError::UnexpectedValue {
                    expected: "actions array",
                    found: json_kind(other),
                }
                .into());
            }
        };

        Ok(Self { base, actions })
    }

    /// Renders the JSON form described in the module docs.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "base": {
                "timestamp": self.base.timestamp.to_string(),
                "chainId": self.base.chain_id.to_string(),
                "maxFee": self.base.max_fee.to_string(),
            },
            "actions": self.actions.iter().map(|a| json!({
                "actionName": a.action_name,
                "data": a.data.to_json(),
            })).collect::<Vec<_>>(),
        })
    }
}

/// Trailer appended after the digest by the signing collaborator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthTrailer {
    pub auth_id: u8,
    pub public_key: [u8; PUBLIC_KEY_LEN],
    pub signature: [u8; SIGNATURE_LEN],
}

/// A decoded signed transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignedTransaction {
    pub payload: TransactionPayload,
    /// Length of the signed digest at the start of the buffer.
    pub digest_len: usize,
    pub auth: AuthTrailer,
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn json_u64(json: &serde_json::Value, field: &'static str) -> Result<u64, CodecError> {
    let invalid = || CodecError::InvalidNumber {
        kind: field,
        value: json.to_string(),
    };
    match json {
        serde_json::Value::Number(n) => n.as_u64().ok_or_else(invalid),
        serde_json::Value::String(s) => s.parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn json_u256(json: &serde_json::Value) -> Result<U256, CodecError> {
    let invalid = || CodecError::InvalidNumber {
        kind: "chainId",
        value: json.to_string(),
    };
    match json {
        serde_json::Value::Number(n) => n.as_u64().map(U256::from).ok_or_else(invalid),
        serde_json::Value::String(s) => parse_unsigned(s).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}
