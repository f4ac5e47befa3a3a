//! Core domain types used by the marshaler.
//!
//! This module defines the ABI document, the parsed type grammar, the
//! dynamic value tree, transaction payloads, and the fixed-size byte
//! newtypes (hashes, addresses) shared across the codecs. The goal is to
//! avoid "naked" byte buffers in public APIs and instead use
//! domain-specific newtypes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CodecError;

/// The ABI document and its validation.
pub mod abi;
/// Parsed type descriptors.
pub mod descriptor;
/// Transaction payloads and the authentication trailer.
pub mod tx;
/// Dynamically-typed values.
pub mod value;

pub use abi::{Abi, Field, TypeAbi, TypedStruct};
pub use descriptor::{NumberKind, Primitive, TypeDescriptor};
pub use tx::{
    ActionData, AuthTrailer, ED25519_AUTH_ID, PUBLIC_KEY_LEN, SIGNATURE_LEN, SignedTransaction,
    TransactionBase, TransactionPayload,
};
pub use value::{Fields, Value};

/// Length in bytes of all 256-bit hash types used in this module.
pub const HASH_LEN: usize = 32;

/// Length of an address payload on the wire.
pub const ADDRESS_LEN: usize = 33;

/// Length of the checksum carried only in the address text form.
pub const CHECKSUM_LEN: usize = 4;

/// Marker that starts every address text.
pub const ADDRESS_PREFIX: &str = "0x";

/// Strongly-typed 256-bit hash wrapper (SHA-256).
///
/// Used for ABI fingerprints and address checksums. It is always exactly
/// [`HASH_LEN`] bytes long.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Hash256(pub [u8; HASH_LEN]);

impl Hash256 {
    /// Computes a new [`Hash256`] as the SHA-256 hash of `data`.
    pub fn compute(data: &[u8]) -> Self {
        Hash256(Sha256::digest(data).into())
    }

    /// Returns the underlying 32-byte hash as a borrowed array.
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Lowercase hex rendering, as printed by the CLI.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Which id space a typed struct belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    /// Transaction operations.
    Action,
    /// Execution results of actions.
    Output,
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCategory::Action => f.write_str("action"),
            TypeCategory::Output => f.write_str("output"),
        }
    }
}

/// On-chain account address: 33 payload bytes.
///
/// The text form is `0x` + hex(payload) + hex(checksum), where the checksum
/// is the last [`CHECKSUM_LEN`] bytes of `SHA-256(payload)`. Only the
/// payload ever goes on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Returns the 33 payload bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Re-derives the checksum from the payload.
    pub fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let hash = Hash256::compute(&self.0);
        let mut checksum = [0u8; CHECKSUM_LEN];
        checksum.copy_from_slice(&hash.0[HASH_LEN - CHECKSUM_LEN..]);
        checksum
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{ADDRESS_PREFIX}{}{}",
            hex::encode(self.0),
            hex::encode(self.checksum())
        )
    }
}

impl FromStr for Address {
    type Err = CodecError;

    /// Parses the text form and verifies its checksum.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let body = text
            .strip_prefix(ADDRESS_PREFIX)
            .filter(|body| body.len() == 2 * (ADDRESS_LEN + CHECKSUM_LEN))
            .ok_or_else(|| CodecError::InvalidAddress(text.to_string()))?;
        let bytes = hex::decode(body).map_err(|_| CodecError::InvalidAddress(text.to_string()))?;

        let mut payload = [0u8; ADDRESS_LEN];
        payload.copy_from_slice(&bytes[..ADDRESS_LEN]);
        let address = Address(payload);

        if address.checksum()[..] != bytes[ADDRESS_LEN..] {
            return Err(CodecError::InvalidChecksum);
        }
        Ok(address)
    }
}
