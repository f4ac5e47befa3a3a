//! Marshal library crate.
//!
//! This crate implements the binary wire format of a VM chain, driven by a
//! machine-readable ABI:
//!
//! - strongly-typed domain types: the ABI, type descriptors, values and
//!   transaction payloads (`types`),
//! - leaf codecs for numbers, booleans, strings, byte buffers and
//!   checksummed addresses (`codec`),
//! - the schema-driven encoder/decoder (`engine`),
//! - ABI fingerprints and the ABI's own binary form (`fingerprint`),
//! - the signable transaction body and its auth trailer (`transaction`),
//! - and schema-free batch framing for transport (`batch`).
//!
//! Everything here is synchronous and free of I/O. A [`Marshaler`] holds
//! only its immutable ABI, so one instance can serve any number of threads.

pub mod batch;
pub mod codec;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod transaction;
pub mod types;

// Re-export the engine and its error types.
pub use engine::{MAX_NESTING_DEPTH, Marshaler};
pub use error::{CodecError, MarshalError, Result, SchemaError};

// Re-export the free-standing entry points.
pub use batch::{decode_batch, encode_batch};
pub use fingerprint::{decode_abi, encode_abi, fingerprint};
pub use transaction::{TxSigner, floor_timestamp};

// Re-export domain types at the crate root for convenience.
pub use types::*;
