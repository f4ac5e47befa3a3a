//! Error types for schema resolution and binary coding.
//!
//! Failures fall into two families:
//!
//! - [`SchemaError`]: the ABI or the caller's request is inconsistent
//!   (unknown type, unknown id, extra field, malformed document),
//! - [`CodecError`]: the bytes or the supplied value cannot be coded
//!   (bad boolean byte, bad checksum, wrong array length, truncated input).
//!
//! [`MarshalError`] wraps both and is returned by every [`crate::Marshaler`]
//! method. Nothing here is retried internally; every error reaches the caller
//! unchanged.

use thiserror::Error;

use crate::types::TypeCategory;

/// The ABI, or the type a caller asked for, does not describe the request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A bare type name does not resolve to an ABI type.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// No action/output is registered under the given numeric id.
    #[error("no {category} found for id {id}")]
    UnknownId { category: TypeCategory, id: u8 },

    /// Strict encoding found keys that the target struct does not declare.
    #[error("unexpected fields for {ty}: {}", fields.join(", "))]
    UnexpectedField { ty: String, fields: Vec<String> },

    /// A struct value lacks one of its declared fields.
    #[error("missing field {field} for {ty}")]
    MissingField { ty: String, field: String },

    /// The action name is not listed in the ABI's actions.
    #[error("no action found: {0}")]
    UnknownAction(String),

    /// The type exists but has no action/output id to tag it with.
    #[error("type {0} has no action or output id")]
    UnregisteredType(String),

    /// Two entries of the same category share an id.
    #[error("duplicate {category} id {id}")]
    DuplicateId { category: TypeCategory, id: u8 },

    /// Two types share a name.
    #[error("duplicate type name: {0}")]
    DuplicateType(String),

    /// The descriptor text does not follow the type grammar.
    #[error("invalid type descriptor: {0:?}")]
    InvalidDescriptor(String),

    /// A struct contains itself without an array to end the recursion.
    #[error("type {0} contains itself")]
    RecursiveType(String),

    /// A dynamic array whose elements occupy no bytes, so its count alone
    /// would decide how many values a decode produces.
    #[error("dynamic array of zero-width elements: []{0}")]
    ZeroWidthElement(String),

    /// The ABI document does not have the expected shape.
    #[error("malformed ABI: {0}")]
    MalformedAbi(String),
}

/// The bytes or the supplied value cannot be coded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid boolean value: {0}, expected 0 or 1")]
    InvalidBoolean(u8),

    #[error("invalid address checksum")]
    InvalidChecksum,

    /// Address text is not `0x` followed by 74 hex characters.
    #[error("address must be a 74-character hex string with '0x' prefix: {0}")]
    InvalidAddress(String),

    #[error("expected an array of length {expected}, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// A read ran past the end of the input.
    #[error("out of bounds: needed {needed} bytes, {available} available")]
    OutOfBounds { needed: usize, available: usize },

    /// Framed input did not end exactly where its headers said it would.
    #[error("consumed {consumed} bytes but buffer holds {len}")]
    TrailingOrMissingBytes { consumed: usize, len: usize },

    /// Non-numeric or out-of-range input for a numeric kind.
    #[error("invalid {kind} value: {value}")]
    InvalidNumber { kind: &'static str, value: String },

    /// The value's shape does not match the descriptor.
    #[error("expected {expected}, found {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid base64 in byte buffer")]
    InvalidBase64,

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    /// A length prefix cannot hold the value's length.
    #[error("{what} length {len} exceeds maximum {max}")]
    LengthOverflow {
        what: &'static str,
        len: usize,
        max: usize,
    },

    #[error("transaction holds {0} actions, at most 255 are allowed")]
    TooManyActions(usize),

    #[error("unsupported auth scheme id: {0}")]
    UnsupportedAuthScheme(u8),

    #[error("value nesting exceeds {0} levels")]
    NestingTooDeep(usize),
}

/// Top-level error returned by [`crate::Marshaler`].
#[derive(Debug, Error)]
pub enum MarshalError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Input JSON could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for [`MarshalError`].
pub type Result<T> = std::result::Result<T, MarshalError>;
