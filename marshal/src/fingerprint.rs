//! ABI fingerprint.
//!
//! An ABI is serialized through the engine itself, using a fixed
//! meta-schema that describes the ABI's own shape:
//!
//! ```text
//! ABI         { actions: []TypedStruct, outputs: []TypedStruct, types: []Type }
//! TypedStruct { id: uint8, name: string }
//! Type        { name: string, fields: []Field }
//! Field       { name: string, type: string }
//! ```
//!
//! The SHA-256 of that encoding is the fingerprint. Client and server
//! compare fingerprints to detect schema drift without shipping the
//! schema; [`encode_abi`]/[`decode_abi`] ship it when they must.

use std::sync::LazyLock;

use tracing::debug;

use crate::engine::Marshaler;
use crate::error::Result;
use crate::types::{Abi, Field, Fields, Hash256, TypeAbi, TypedStruct, Value};

const META_ROOT: &str = "ABI";

fn meta_type(name: &str, fields: &[(&str, &str)]) -> TypeAbi {
    TypeAbi {
        name: name.to_string(),
        fields: fields
            .iter()
            .map(|(name, ty)| Field {
                name: name.to_string(),
                ty: ty.to_string(),
            })
            .collect(),
    }
}

/// Marshaler over the meta-schema. Built once; the schema is a constant.
static META: LazyLock<Marshaler> = LazyLock::new(|| {
    let abi = Abi {
        actions: Vec::new(),
        outputs: Vec::new(),
        types: vec![
            meta_type(
                META_ROOT,
                &[
                    ("actions", "[]TypedStruct"),
                    ("outputs", "[]TypedStruct"),
                    ("types", "[]Type"),
                ],
            ),
            meta_type("TypedStruct", &[("id", "uint8"), ("name", "string")]),
            meta_type("Type", &[("name", "string"), ("fields", "[]Field")]),
            meta_type("Field", &[("name", "string"), ("type", "string")]),
        ],
    };
    Marshaler::new(abi).expect("meta-schema is valid")
});

/// Converts an ABI into a value shaped by the meta-schema.
fn abi_to_value(abi: &Abi) -> Value {
    let typed = |list: &[TypedStruct]| -> Value {
        let items: Vec<Value> = list
            .iter()
            .map(|t| {
                Value::from(
                    Fields::new()
                        .with("id", u64::from(t.id))
                        .with("name", t.name.as_str()),
                )
            })
            .collect();
        Value::from(items)
    };

    let types: Vec<Value> = abi
        .types
        .iter()
        .map(|t| {
            let fields: Vec<Value> = t
                .fields
                .iter()
                .map(|f| {
                    Value::from(
                        Fields::new()
                            .with("name", f.name.as_str())
                            .with("type", f.ty.as_str()),
                    )
                })
                .collect();
            Value::from(
                Fields::new()
                    .with("name", t.name.as_str())
                    .with("fields", fields),
            )
        })
        .collect();

    Fields::new()
        .with("actions", typed(&abi.actions[..]))
        .with("outputs", typed(&abi.outputs[..]))
        .with("types", types)
        .into()
}

/// Serializes `abi` with the meta-schema.
///
/// Fails only when a name exceeds the 2-byte string length prefix.
pub fn encode_abi(abi: &Abi) -> Result<Vec<u8>> {
    META.encode(META_ROOT, &abi_to_value(abi))
}

/// Reads an ABI serialized by [`encode_abi`].
///
/// Returns the ABI and the number of bytes consumed. The result is not
/// validated; pass it to [`Marshaler::new`] before use.
pub fn decode_abi(bytes: &[u8]) -> Result<(Abi, usize)> {
    let (value, consumed) = META.parse(META_ROOT, bytes)?;
    let abi = Abi::from_json(value.to_json())?;
    Ok((abi, consumed))
}

/// SHA-256 of the meta-schema encoding of `abi`.
pub fn fingerprint(abi: &Abi) -> Result<Hash256> {
    let encoded = encode_abi(abi)?;
    let digest = Hash256::compute(&encoded);
    debug!(len = encoded.len(), fingerprint = %digest.to_hex(), "computed ABI fingerprint");
    Ok(digest)
}

impl Marshaler {
    /// Fingerprint of the ABI this marshaler was built with.
    pub fn fingerprint(&self) -> Result<Hash256> {
        fingerprint(self.abi())
    }
}
