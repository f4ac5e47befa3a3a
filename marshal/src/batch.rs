//! Length-prefixed batch framing.
//!
//! Frames opaque messages for transport, independent of any ABI:
//!
//! ```text
//! +-----------+-------------+-----------+-------------+-----------+-----
//! | count (4) | len 0 (4)   | msg 0     | len 1 (4)   | msg 1     | ...
//! +-----------+-------------+-----------+-------------+-----------+-----
//! ```
//!
//! All lengths are big-endian `u32`.

use crate::codec::{read_u32, u32_prefix};
use crate::error::CodecError;

/// Frames `messages` in order.
pub fn encode_batch<M: AsRef<[u8]>>(messages: &[M]) -> Result<Vec<u8>, CodecError> {
    let body: usize = messages.iter().map(|m| 4 + m.as_ref().len()).sum();
    let mut out = Vec::with_capacity(4 + body);
    out.extend_from_slice(&u32_prefix("batch", messages.len())?);
    for message in messages {
        let message = message.as_ref();
        out.extend_from_slice(&u32_prefix("message", message.len())?);
        out.extend_from_slice(message);
    }
    Ok(out)
}

/// Splits a framed buffer back into its messages.
///
/// The declared frames must cover `bytes` exactly; a short or over-long
/// buffer fails with [`CodecError::TrailingOrMissingBytes`].
pub fn decode_batch(bytes: &[u8]) -> Result<Vec<&[u8]>, CodecError> {
    let missing = |consumed: usize| CodecError::TrailingOrMissingBytes {
        consumed,
        len: bytes.len(),
    };

    let count = read_u32(bytes).map_err(|_| missing(4))? as usize;
    let mut offset = 4;
    let mut messages = Vec::with_capacity(count.min(bytes.len() / 4));
    for _ in 0..count {
        let len = read_u32(&bytes[offset..]).map_err(|_| missing(offset + 4))? as usize;
        offset += 4;
        let end = offset.checked_add(len).ok_or_else(|| missing(usize::MAX))?;
        if end > bytes.len() {
            return Err(missing(end));
        }
        messages.push(&bytes[offset..end]);
        offset = end;
    }

    if offset != bytes.len() {
        return Err(missing(offset));
    }
    Ok(messages)
}
