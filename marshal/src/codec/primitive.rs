//! Booleans, strings, byte buffers and addresses.
//!
//! ```text
//! bool     1 byte, 0 or 1
//! string   uint16 BE byte length + UTF-8
//! []uint8  uint32 BE byte length + raw bytes (base64 text for callers)
//! Address  33 raw bytes (checksum only in the text form)
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::{read_u32, take, u32_prefix};
use crate::error::CodecError;
use crate::types::{ADDRESS_LEN, Address, Value};

pub fn encode_bool(value: &Value) -> Result<Vec<u8>, CodecError> {
    match value {
        Value::Bool(b) => Ok(vec![u8::from(*b)]),
        other => Err(CodecError::UnexpectedValue {
            expected: "bool",
            found: other.kind(),
        }),
    }
}

pub fn decode_bool(bytes: &[u8]) -> Result<(Value, usize), CodecError> {
    match take(bytes, 1)?[0] {
        0 => Ok((Value::Bool(false), 1)),
        1 => Ok((Value::Bool(true), 1)),
        other => Err(CodecError::InvalidBoolean(other)),
    }
}

/// Encodes a string with a 2-byte byte-count prefix.
pub fn encode_string(value: &Value) -> Result<Vec<u8>, CodecError> {
    let s = expect_str(value, "string")?;
    let len = u16::try_from(s.len()).map_err(|_| CodecError::LengthOverflow {
        what: "string",
        len: s.len(),
        max: u16::MAX as usize,
    })?;

    let mut out = Vec::with_capacity(2 + s.len());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(s.as_bytes());
    Ok(out)
}

pub fn decode_string(bytes: &[u8]) -> Result<(Value, usize), CodecError> {
    let prefix = take(bytes, 2)?;
    let len = u16::from_be_bytes([prefix[0], prefix[1]]) as usize;
    let raw = take(&bytes[2..], len)?;
    let s = std::str::from_utf8(raw).map_err(|_| CodecError::InvalidUtf8)?;
    Ok((Value::String(s.to_string()), 2 + len))
}

/// Encodes a `[]uint8` buffer with a 4-byte length prefix.
///
/// Callers normally pass base64 text. An array of byte values is accepted
/// as well.
pub fn encode_bytes(value: &Value) -> Result<Vec<u8>, CodecError> {
    let raw = match value {
        Value::String(text) => STANDARD
            .decode(text)
            .map_err(|_| CodecError::InvalidBase64)?,
        Value::Array(items) => items
            .iter()
            .map(byte_of)
            .collect::<Result<Vec<u8>, _>>()?,
        other => {
            return Err(CodecError::UnexpectedValue {
                expected: "base64 string",
                found: other.kind(),
            });
        }
    };

    let mut out = Vec::with_capacity(4 + raw.len());
    out.extend_from_slice(&u32_prefix("byte buffer", raw.len())?);
    out.extend_from_slice(&raw);
    Ok(out)
}

/// Decodes a `[]uint8` buffer; the value is the base64 text of its bytes.
pub fn decode_bytes(bytes: &[u8]) -> Result<(Value, usize), CodecError> {
    let len = read_u32(bytes)? as usize;
    let raw = take(&bytes[4..], len)?;
    Ok((Value::String(STANDARD.encode(raw)), 4 + len))
}

/// Verifies the address text's checksum and returns its 33 payload bytes.
pub fn encode_address(value: &Value) -> Result<Vec<u8>, CodecError> {
    let address: Address = expect_str(value, "address string")?.parse()?;
    Ok(address.0.to_vec())
}

/// Reads 33 payload bytes and rebuilds the text form with a fresh checksum.
///
/// The checksum is regenerated, never verified, so this cannot fail on
/// well-sized input.
pub fn decode_address(bytes: &[u8]) -> Result<(Value, usize), CodecError> {
    let raw = take(bytes, ADDRESS_LEN)?;
    let mut payload = [0u8; ADDRESS_LEN];
    payload.copy_from_slice(raw);
    Ok((Value::String(Address(payload).to_string()), ADDRESS_LEN))
}

fn expect_str<'a>(value: &'a Value, expected: &'static str) -> Result<&'a str, CodecError> {
    value.as_str().ok_or(CodecError::UnexpectedValue {
        expected,
        found: value.kind(),
    })
}

fn byte_of(value: &Value) -> Result<u8, CodecError> {
    let encoded = super::encode_number(crate::types::NumberKind::U8, value)?;
    Ok(encoded[0])
}
