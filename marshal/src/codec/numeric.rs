//! Fixed-width big-endian integers.
//!
//! ```text
//! uint8/int8    1 byte
//! uint16/int16  2 bytes
//! uint32/int32  4 bytes
//! uint64/int64  8 bytes
//! uint256      32 bytes (unsigned only)
//! ```
//!
//! Inputs are normalized first: a [`Value::Int`], a [`Value::Uint`] or a
//! base-10 [`Value::String`] all work, so callers can pass 64- and 256-bit
//! numbers as text without losing precision. Values outside the kind's
//! range are rejected rather than wrapped.

use primitive_types::U256;

use super::take;
use crate::error::CodecError;
use crate::types::{NumberKind, Value};

/// Encodes `value` as `kind.width()` big-endian bytes.
pub fn encode_number(kind: NumberKind, value: &Value) -> Result<Vec<u8>, CodecError> {
    let width = kind.width();
    if kind.is_signed() {
        let n = to_signed(kind, value)?;
        Ok(n.to_be_bytes()[8 - width..].to_vec())
    } else {
        let n = to_unsigned(kind, value)?;
        Ok(n.to_big_endian()[32 - width..].to_vec())
    }
}

/// Decodes the first `kind.width()` bytes of `bytes`.
///
/// Unsigned kinds come back as [`Value::Uint`], signed kinds as
/// [`Value::Int`].
pub fn decode_number(kind: NumberKind, bytes: &[u8]) -> Result<Value, CodecError> {
    let width = kind.width();
    let raw = take(bytes, width)?;
    if kind.is_signed() {
        let fill = if raw[0] & 0x80 != 0 { 0xff } else { 0x00 };
        let mut buf = [fill; 8];
        buf[8 - width..].copy_from_slice(raw);
        Ok(Value::Int(i64::from_be_bytes(buf)))
    } else {
        Ok(Value::Uint(U256::from_big_endian(raw)))
    }
}

fn invalid(kind: NumberKind, value: impl ToString) -> CodecError {
    CodecError::InvalidNumber {
        kind: kind.name(),
        value: value.to_string(),
    }
}

fn to_unsigned(kind: NumberKind, value: &Value) -> Result<U256, CodecError> {
    let n = match value {
        Value::Uint(u) => *u,
        Value::Int(i) => u64::try_from(*i)
            .map(U256::from)
            .map_err(|_| invalid(kind, i))?,
        Value::String(s) => parse_unsigned(s).ok_or_else(|| invalid(kind, s))?,
        other => {
            return Err(CodecError::UnexpectedValue {
                expected: "integer",
                found: other.kind(),
            });
        }
    };

    let width = kind.width();
    if width < 32 && n >= U256::one() << (8 * width) {
        return Err(invalid(kind, n));
    }
    Ok(n)
}

fn to_signed(kind: NumberKind, value: &Value) -> Result<i64, CodecError> {
    let n = match value {
        Value::Int(i) => *i,
        Value::Uint(u) if *u <= U256::from(i64::MAX as u64) => u.low_u64() as i64,
        Value::Uint(u) => return Err(invalid(kind, u)),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid(kind, s))?,
        other => {
            return Err(CodecError::UnexpectedValue {
                expected: "integer",
                found: other.kind(),
            });
        }
    };

    let (min, max) = match kind {
        NumberKind::I8 => (i8::MIN as i64, i8::MAX as i64),
        NumberKind::I16 => (i16::MIN as i64, i16::MAX as i64),
        NumberKind::I32 => (i32::MIN as i64, i32::MAX as i64),
        _ => (i64::MIN, i64::MAX),
    };
    if n < min || n > max {
        return Err(invalid(kind, n));
    }
    Ok(n)
}

/// Base-10 digits only, surrounding whitespace allowed.
pub(crate) fn parse_unsigned(text: &str) -> Option<U256> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_dec_str(text).ok()
}
