//! Leaf codecs.
//!
//! - [`numeric`]: fixed-width big-endian integers (1 to 32 bytes),
//! - [`primitive`]: booleans, strings, byte buffers and addresses.
//!
//! Decoders take the remaining input as a slice and return the value plus
//! the number of bytes consumed. Reading past the end fails with
//! [`CodecError::OutOfBounds`]; there is no separate bounds pre-check.

pub mod numeric;
pub mod primitive;

pub use numeric::{decode_number, encode_number};
pub use primitive::{
    decode_address, decode_bool, decode_bytes, decode_string, encode_address, encode_bool,
    encode_bytes, encode_string,
};

use crate::error::CodecError;

/// Returns the first `n` bytes of `bytes`.
pub(crate) fn take(bytes: &[u8], n: usize) -> Result<&[u8], CodecError> {
    bytes.get(..n).ok_or(CodecError::OutOfBounds {
        needed: n,
        available: bytes.len(),
    })
}

/// Reads a big-endian `u32` prefix.
pub(crate) fn read_u32(bytes: &[u8]) -> Result<u32, CodecError> {
    let raw = take(bytes, 4)?;
    Ok(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Encodes a length as a big-endian `u32` prefix.
pub(crate) fn u32_prefix(what: &'static str, len: usize) -> Result<[u8; 4], CodecError> {
    let len = u32::try_from(len).map_err(|_| CodecError::LengthOverflow {
        what,
        len,
        max: u32::MAX as usize,
    })?;
    Ok(len.to_be_bytes())
}
