//! Schema-driven encoder/decoder.
//!
//! The [`Marshaler`] walks an ABI's type graph and dispatches to the leaf
//! codecs at primitives:
//!
//! - `[]T` writes/reads a 4-byte element count, then the elements,
//! - `[N]T` processes exactly `N` elements with no count,
//! - a bare name processes the struct's fields in declaration order with
//!   no length prefix; struct boundaries come from the schema alone.
//!
//! A marshaler owns one immutable ABI and holds no other state, so a single
//! instance can be shared across threads and used concurrently.

use tracing::{debug, trace};

use super::MAX_NESTING_DEPTH;
use super::schema::SchemaIndex;
use crate::codec::{numeric, primitive, read_u32, take, u32_prefix};
use crate::error::{CodecError, MarshalError, Result, SchemaError};
use crate::types::{Abi, Fields, Primitive, TypeCategory, TypeDescriptor, TypedStruct, Value};

/// Encoder/decoder bound to one ABI.
#[derive(Clone, Debug)]
pub struct Marshaler {
    abi: Abi,
    index: SchemaIndex,
}

impl Marshaler {
    /// Validates `abi` and builds a marshaler for it.
    ///
    /// Every field descriptor is parsed here, once; later calls only look
    /// the parsed layouts up.
    pub fn new(abi: Abi) -> std::result::Result<Self, SchemaError> {
        let index = SchemaIndex::build(&abi)?;
        debug!(
            actions = abi.actions.len(),
            outputs = abi.outputs.len(),
            types = abi.types.len(),
            "loaded ABI"
        );
        Ok(Self { abi, index })
    }

    /// Parses an ABI JSON document and builds a marshaler for it.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, SchemaError> {
        Self::new(Abi::from_json_str(json)?)
    }

    /// Returns the ABI this marshaler was built with.
    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// Encodes `value` as the type named by the descriptor text `ty`.
    pub fn encode(&self, ty: &str, value: &Value) -> Result<Vec<u8>> {
        let ty: TypeDescriptor = ty.parse()?;
        self.encode_field(&ty, value)
    }

    /// Parses `json` and encodes it as `ty`.
    pub fn encode_json(&self, ty: &str, json: &str) -> Result<Vec<u8>> {
        let json: serde_json::Value = serde_json::from_str(json)?;
        self.encode(ty, &Value::from_json(&json)?)
    }

    /// Encodes `value` according to the descriptor `ty`.
    pub fn encode_field(&self, ty: &TypeDescriptor, value: &Value) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_into(ty, value, 0, &mut out)?;
        Ok(out)
    }

    /// Strict encoding of the struct `type_name`, tagged with its id.
    ///
    /// Rejects top-level keys the struct does not declare and prefixes the
    /// encoding with one byte holding the type's id from the combined
    /// actions + outputs id space.
    pub fn encode_typed(&self, type_name: &str, value: &Value) -> Result<Vec<u8>> {
        let layout = self
            .index
            .layout(type_name)
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))?;
        let fields = expect_struct(value)?;

        let extra: Vec<String> = fields
            .keys()
            .filter(|key| !layout.iter().any(|(name, _)| name == key))
            .map(str::to_string)
            .collect();
        if !extra.is_empty() {
            return Err(SchemaError::UnexpectedField {
                ty: type_name.to_string(),
                fields: extra,
            }
            .into());
        }

        let id = self
            .abi
            .type_id(type_name)
            .ok_or_else(|| SchemaError::UnregisteredType(type_name.to_string()))?;

        let mut out = vec![id];
        self.encode_into(&TypeDescriptor::named(type_name), value, 0, &mut out)?;
        Ok(out)
    }

    /// Parses `json` and runs [`Marshaler::encode_typed`] on it.
    pub fn encode_typed_json(&self, type_name: &str, json: &str) -> Result<Vec<u8>> {
        let json: serde_json::Value = serde_json::from_str(json)?;
        self.encode_typed(type_name, &Value::from_json(&json)?)
    }

    /// Decodes a value of descriptor `ty` from the start of `bytes`.
    ///
    /// Returns the value and the number of bytes consumed; trailing bytes
    /// are left for the caller.
    pub fn decode_field(&self, ty: &TypeDescriptor, bytes: &[u8]) -> Result<(Value, usize)> {
        self.decode_at(ty, bytes, 0)
    }

    /// Decodes the type named `ty` (a struct or any descriptor text).
    pub fn parse(&self, ty: &str, bytes: &[u8]) -> Result<(Value, usize)> {
        let ty: TypeDescriptor = ty.parse()?;
        self.decode_field(&ty, bytes)
    }

    /// Decodes an id-tagged struct produced by [`Marshaler::encode_typed`].
    ///
    /// The leading id byte is resolved against the actions or the outputs
    /// depending on `category`. The returned count includes the id byte.
    pub fn parse_typed(&self, bytes: &[u8], category: TypeCategory) -> Result<(Value, usize)> {
        let (_, value, consumed) = self.parse_tagged(bytes, category)?;
        Ok((value, consumed))
    }

    /// Like [`Marshaler::parse_typed`] but also reports which type matched.
    pub fn parse_tagged(
        &self,
        bytes: &[u8],
        category: TypeCategory,
    ) -> Result<(&TypedStruct, Value, usize)> {
        let id = take(bytes, 1)?[0];
        let list = match category {
            TypeCategory::Action => &self.abi.actions,
            TypeCategory::Output => &self.abi.outputs,
        };
        let typed = list
            .iter()
            .find(|t| t.id == id)
            .ok_or(SchemaError::UnknownId { category, id })?;
        trace!(%category, id, name = %typed.name, "resolved typed struct");

        let (value, consumed) = self.parse(&typed.name, &bytes[1..])?;
        Ok((typed, value, consumed + 1))
    }

    /// Numeric id of the action named `name`.
    pub fn action_type_id(&self, name: &str) -> Result<u8> {
        self.abi
            .actions
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.id)
            .ok_or_else(|| SchemaError::UnknownAction(name.to_string()).into())
    }

    fn encode_into(
        &self,
        ty: &TypeDescriptor,
        value: &Value,
        depth: usize,
        out: &mut Vec<u8>,
    ) -> Result<()> {
        if depth > MAX_NESTING_DEPTH {
            return Err(CodecError::NestingTooDeep(MAX_NESTING_DEPTH).into());
        }

        match ty {
            TypeDescriptor::Primitive(p) => out.extend(encode_primitive(*p, value)?),
            TypeDescriptor::DynamicArray(elem) => {
                self.index.element_width(elem)?;
                let items = expect_array(value)?;
                out.extend_from_slice(&u32_prefix("array", items.len())?);
                for item in items {
                    self.encode_into(elem, item, depth + 1, out)?;
                }
            }
            TypeDescriptor::FixedArray(elem, len) => {
                let items = expect_array(value)?;
                if items.len() != *len {
                    return Err(CodecError::ArityMismatch {
                        expected: *len,
                        actual: items.len(),
                    }
                    .into());
                }
                for item in items {
                    self.encode_into(elem, item, depth + 1, out)?;
                }
            }
            TypeDescriptor::Named(name) => {
                let layout = self
                    .index
                    .layout(name)
                    .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
                let fields = expect_struct(value)?;
                for (field, field_ty) in layout {
                    let field_value = fields.get(field).ok_or_else(|| SchemaError::MissingField {
                        ty: name.clone(),
                        field: field.clone(),
                    })?;
                    self.encode_into(field_ty, field_value, depth + 1, out)?;
                }
            }
        }
        Ok(())
    }

    fn decode_at(
        &self,
        ty: &TypeDescriptor,
        bytes: &[u8],
        depth: usize,
    ) -> Result<(Value, usize)> {
        if depth > MAX_NESTING_DEPTH {
            return Err(CodecError::NestingTooDeep(MAX_NESTING_DEPTH).into());
        }

        match ty {
            TypeDescriptor::Primitive(p) => Ok(decode_primitive(*p, bytes)?),
            TypeDescriptor::DynamicArray(elem) => {
                let count = read_u32(bytes)? as usize;
                let rest = &bytes[4..];
                // A count the remaining input cannot hold fails before any
                // element is decoded.
                let needed = count.saturating_mul(self.index.element_width(elem)?);
                if needed > rest.len() {
                    return Err(CodecError::OutOfBounds {
                        needed,
                        available: rest.len(),
                    }
                    .into());
                }
                let (items, consumed) = self.decode_items(elem, rest, count, depth)?;
                Ok((Value::Array(items), consumed + 4))
            }
            TypeDescriptor::FixedArray(elem, len) => {
                let (items, consumed) = self.decode_items(elem, bytes, *len, depth)?;
                Ok((Value::Array(items), consumed))
            }
            TypeDescriptor::Named(name) => {
                let layout = self
                    .index
                    .layout(name)
                    .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
                let mut fields = Fields::new();
                let mut offset = 0;
                for (field, field_ty) in layout {
                    let (value, consumed) = self.decode_at(field_ty, &bytes[offset..], depth + 1)?;
                    fields.insert(field.clone(), value);
                    offset += consumed;
                }
                Ok((Value::Struct(fields), offset))
            }
        }
    }

    fn decode_items(
        &self,
        elem: &TypeDescriptor,
        bytes: &[u8],
        count: usize,
        depth: usize,
    ) -> Result<(Vec<Value>, usize)> {
        // Dynamic counts are already bounded by the remaining input; fixed
        // lengths come from the ABI and may still exceed it.
        let mut items = Vec::with_capacity(count.min(bytes.len()));
        let mut offset = 0;
        for _ in 0..count {
            let (item, consumed) = self.decode_at(elem, &bytes[offset..], depth + 1)?;
            items.push(item);
            offset += consumed;
        }
        Ok((items, offset))
    }
}

fn encode_primitive(p: Primitive, value: &Value) -> std::result::Result<Vec<u8>, CodecError> {
    match p {
        Primitive::Bool => primitive::encode_bool(value),
        Primitive::Number(kind) => numeric::encode_number(kind, value),
        Primitive::String => primitive::encode_string(value),
        Primitive::Address => primitive::encode_address(value),
        Primitive::Bytes => primitive::encode_bytes(value),
    }
}

fn decode_primitive(p: Primitive, bytes: &[u8]) -> std::result::Result<(Value, usize), CodecError> {
    match p {
        Primitive::Bool => primitive::decode_bool(bytes),
        Primitive::Number(kind) => Ok((numeric::decode_number(kind, bytes)?, kind.width())),
        Primitive::String => primitive::decode_string(bytes),
        Primitive::Address => primitive::decode_address(bytes),
        Primitive::Bytes => primitive::decode_bytes(bytes),
    }
}

fn expect_array(value: &Value) -> std::result::Result<&[Value], MarshalError> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        other => Err(CodecError::UnexpectedValue {
            expected: "array",
            found: other.kind(),
        }
        .into()),
    }
}

fn expect_struct(value: &Value) -> std::result::Result<&Fields, MarshalError> {
    value.as_struct().ok_or_else(|| {
        CodecError::UnexpectedValue {
            expected: "struct",
            found: value.kind(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;
    use serde_json::json;

    const TEST_ADDRESS: &str =
        "0x0102030405060708090a0b0c0d0e0f10111213140000000000000000000000000020db0e6c";

    fn dummy_marshaler() -> Marshaler {
        let abi = Abi::from_json(json!({
            "actions": [
                {"id": 0, "name": "Transfer"},
                {"id": 7, "name": "Batch"}
            ],
            "outputs": [
                {"id": 0, "name": "TransferResult"}
            ],
            "types": [
                {"name": "Transfer", "fields": [
                    {"name": "to", "type": "Address"},
                    {"name": "value", "type": "uint64"},
                    {"name": "memo", "type": "[]uint8"}
                ]},
                {"name": "Batch", "fields": [
                    {"name": "transfers", "type": "[]Transfer"},
                    {"name": "weights", "type": "[2]uint16"},
                    {"name": "flags", "type": "[]bool"},
                    {"name": "label", "type": "string"}
                ]},
                {"name": "TransferResult", "fields": [
                    {"name": "senderBalance", "type": "uint64"},
                    {"name": "receiverBalance", "type": "uint64"}
                ]},
                {"name": "AllNumbers", "fields": [
                    {"name": "u8", "type": "uint8"},
                    {"name": "u16", "type": "uint16"},
                    {"name": "u32", "type": "uint32"},
                    {"name": "u64", "type": "uint64"},
                    {"name": "i8", "type": "int8"},
                    {"name": "i16", "type": "int16"},
                    {"name": "i32", "type": "int32"},
                    {"name": "i64", "type": "int64"}
                ]},
                {"name": "Big", "fields": [
                    {"name": "amount", "type": "uint256"}
                ]},
                {"name": "Node", "fields": [
                    {"name": "children", "type": "[]Node"}
                ]}
            ]
        }))
        .expect("well-formed abi");
        Marshaler::new(abi).expect("valid abi")
    }

    fn dummy_transfer(value: u64) -> Value {
        Fields::new()
            .with("to", TEST_ADDRESS)
            .with("value", value)
            .with("memo", "aGk=")
            .into()
    }

    #[test]
    fn encodes_struct_fields_in_declaration_order() {
        let m = dummy_marshaler();
        // Supplied out of order; the ABI decides the layout.
        let value: Value = Fields::new()
            .with("memo", "aGk=")
            .with("value", 1000u64)
            .with("to", TEST_ADDRESS)
            .into();

        let bytes = m.encode("Transfer", &value).expect("encodable");
        assert_eq!(
            hex::encode(&bytes),
            concat!(
                "0102030405060708090a0b0c0d0e0f101112131400000000000000000000000000",
                "00000000000003e8",
                "000000026869"
            )
        );

        let (decoded, consumed) = m.parse("Transfer", &bytes).expect("decodable");
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded, dummy_transfer(1000));
    }

    #[test]
    fn all_number_kinds_roundtrip_at_their_extremes() {
        let m = dummy_marshaler();
        let value: Value = Fields::new()
            .with("u8", 255u64)
            .with("u16", 65_535u64)
            .with("u32", 4_294_967_295u64)
            .with("u64", "18446744073709551615")
            .with("i8", -128i64)
            .with("i16", -32_768i64)
            .with("i32", i64::from(i32::MIN))
            .with("i64", "-9223372036854775808")
            .into();

        let bytes = m.encode("AllNumbers", &value).expect("encodable");
        assert_eq!(
            hex::encode(&bytes),
            "ffffffffffffffffffffffffffffff808000800000008000000000000000"
        );

        let (decoded, _) = m.parse("AllNumbers", &bytes).expect("decodable");
        let fields = decoded.as_struct().expect("struct");
        assert_eq!(fields.get("u64"), Some(&Value::from(u64::MAX)));
        assert_eq!(fields.get("i64"), Some(&Value::Int(i64::MIN)));
        assert_eq!(decoded.to_json()["u64"], json!(u64::MAX));
    }

    #[test]
    fn nested_arrays_and_structs_roundtrip() {
        let m = dummy_marshaler();
        let value: Value = Fields::new()
            .with("transfers", vec![dummy_transfer(1), dummy_transfer(2)])
            .with("weights", vec![Value::from(1u64), Value::from(2u64)])
            .with("flags", vec![Value::Bool(true), Value::Bool(false)])
            .with("label", "batch")
            .into();

        let bytes = m.encode("Batch", &value).expect("encodable");
        let (decoded, consumed) = m.parse("Batch", &bytes).expect("decodable");
        assert_eq!(decoded, value);
        assert_eq!(consumed, bytes.len());

        // transfers count, then two 47-byte transfers.
        assert_eq!(&bytes[..4], &[0, 0, 0, 2]);
        assert_eq!(bytes.len(), 4 + 2 * 47 + 4 + 4 + 2 + 2 + 5);
    }

    #[test]
    fn fixed_array_length_must_match() {
        let m = dummy_marshaler();
        for weights in [vec![], vec![Value::from(1u64)], vec![Value::from(1u64); 3]] {
            let value: Value = Fields::new()
                .with("transfers", Vec::<Value>::new())
                .with("weights", weights.clone())
                .with("flags", Vec::<Value>::new())
                .with("label", "")
                .into();
            match m.encode("Batch", &value) {
                Err(MarshalError::Codec(CodecError::ArityMismatch { expected, actual })) => {
                    assert_eq!(expected, 2);
                    assert_eq!(actual, weights.len());
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn uint256_field_decodes() {
        let m = dummy_marshaler();
        let value: Value = Fields::new().with("amount", U256::MAX).into();
        let bytes = m.encode("Big", &value).expect("encodable");
        assert_eq!(bytes, vec![0xff; 32]);
        assert_eq!(m.parse("Big", &bytes).expect("decodable"), (value, 32));
    }

    #[test]
    fn primitive_names_parse_directly() {
        let m = dummy_marshaler();
        assert_eq!(
            m.parse("[]uint8", &[0, 0, 0, 2, b'h', b'i']).expect("bytes"),
            (Value::from("aGk="), 6)
        );
        assert_eq!(m.parse("uint16", &[1, 2, 3]).expect("u16"), (Value::from(258u64), 2));
        assert_eq!(
            m.parse("[2]uint8", &[0xd3, 0x6e]).expect("fixed bytes"),
            (Value::Array(vec![Value::from(0xd3u64), Value::from(0x6eu64)]), 2)
        );
    }

    #[test]
    fn missing_fields_and_unknown_types_are_schema_errors() {
        let m = dummy_marshaler();
        let value: Value = Fields::new().with("to", TEST_ADDRESS).into();
        assert!(matches!(
            m.encode("Transfer", &value),
            Err(MarshalError::Schema(SchemaError::MissingField { ref field, .. })) if field == "value"
        ));
        assert!(matches!(
            m.encode("Nope", &value),
            Err(MarshalError::Schema(SchemaError::UnknownType(ref name))) if name == "Nope"
        ));
        assert!(matches!(
            m.parse("Nope", &[]),
            Err(MarshalError::Schema(SchemaError::UnknownType(_)))
        ));
    }

    #[test]
    fn plain_encode_ignores_extra_fields_but_typed_encode_rejects_them() {
        let m = dummy_marshaler();
        let mut fields = dummy_transfer(5).as_struct().expect("struct").clone();
        fields.insert("extra", true);
        let value = Value::Struct(fields);

        assert!(m.encode("Transfer", &value).is_ok());
        match m.encode_typed("Transfer", &value) {
            Err(MarshalError::Schema(SchemaError::UnexpectedField { ty, fields })) => {
                assert_eq!(ty, "Transfer");
                assert_eq!(fields, vec!["extra".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn typed_encoding_is_prefixed_with_the_type_id() {
        let m = dummy_marshaler();
        let result: Value = Fields::new()
            .with("senderBalance", 10u64)
            .with("receiverBalance", 20u64)
            .into();

        let bytes = m.encode_typed("TransferResult", &result).expect("encodable");
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes.len(), 17);

        let (decoded, consumed) = m
            .parse_typed(&bytes, TypeCategory::Output)
            .expect("decodable");
        assert_eq!(decoded, result);
        assert_eq!(consumed, 17);

        // Id 0 in the action space is Transfer, which needs far more bytes.
        assert!(matches!(
            m.parse_typed(&bytes, TypeCategory::Action),
            Err(MarshalError::Codec(CodecError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn typed_parse_rejects_unknown_ids_and_empty_input() {
        let m = dummy_marshaler();
        assert!(matches!(
            m.parse_typed(&[9], TypeCategory::Output),
            Err(MarshalError::Schema(SchemaError::UnknownId {
                category: TypeCategory::Output,
                id: 9
            }))
        ));
        assert!(matches!(
            m.parse_typed(&[], TypeCategory::Action),
            Err(MarshalError::Codec(CodecError::OutOfBounds { needed: 1, available: 0 }))
        ));
    }

    #[test]
    fn typed_encode_needs_a_registered_struct() {
        let m = dummy_marshaler();
        let value: Value = Fields::new().with("amount", 1u64).into();
        assert!(matches!(
            m.encode_typed("Big", &value),
            Err(MarshalError::Schema(SchemaError::UnregisteredType(_)))
        ));
        assert!(matches!(
            m.encode_typed("uint8", &Value::from(1u64)),
            Err(MarshalError::Schema(SchemaError::UnknownType(_)))
        ));
    }

    #[test]
    fn json_entry_points_accept_numbers_as_text() {
        let m = dummy_marshaler();
        let json = format!(r#"{{"to": "{TEST_ADDRESS}", "value": "1000", "memo": "aGk="}}"#);
        let plain = m.encode_json("Transfer", &json).expect("encodable");
        let typed = m.encode_typed_json("Transfer", &json).expect("encodable");
        assert_eq!(typed[0], 0);
        assert_eq!(&typed[1..], &plain[..]);

        assert!(matches!(
            m.encode_json("Transfer", "{"),
            Err(MarshalError::Json(_))
        ));
    }

    #[test]
    fn truncated_input_fails_out_of_bounds() {
        let m = dummy_marshaler();
        let bytes = m.encode("Transfer", &dummy_transfer(1)).expect("encodable");
        for cut in [0, 10, 33, 40, bytes.len() - 1] {
            assert!(
                matches!(
                    m.parse("Transfer", &bytes[..cut]),
                    Err(MarshalError::Codec(CodecError::OutOfBounds { .. }))
                ),
                "cut at {cut}"
            );
        }
    }

    #[test]
    fn huge_declared_counts_fail_without_allocating() {
        let m = dummy_marshaler();
        assert!(matches!(
            m.parse("[]uint64", &[0xff, 0xff, 0xff, 0xff, 0, 0]),
            Err(MarshalError::Codec(CodecError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn declared_counts_are_bounded_by_element_width() {
        let m = dummy_marshaler();
        // Two transfers need at least 2 * (33 + 8 + 4) bytes.
        let mut bytes = vec![0, 0, 0, 2];
        bytes.extend_from_slice(&[0; 50]);
        match m.parse("[]Transfer", &bytes) {
            Err(MarshalError::Codec(CodecError::OutOfBounds { needed, available })) => {
                assert_eq!((needed, available), (90, 50));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn zero_width_elements_are_refused_in_dynamic_arrays() {
        let abi = Abi::from_json(json!({
            "actions": [{"id": 0, "name": "Empty"}],
            "outputs": [],
            "types": [
                {"name": "Empty", "fields": []},
                {"name": "Holder", "fields": [{"name": "none", "type": "[3]Empty"}]}
            ]
        }))
        .expect("well-formed abi");
        let m = Marshaler::new(abi).expect("fixed arrays of empty structs are fine");

        for ty in ["[]Empty", "[][0]bool", "[][2]Empty"] {
            assert!(
                matches!(
                    m.parse(ty, &[0xff, 0xff, 0xff, 0xff]),
                    Err(MarshalError::Schema(SchemaError::ZeroWidthElement(_)))
                ),
                "decoding {ty}"
            );
            assert!(
                matches!(
                    m.encode(ty, &Value::Array(Vec::new())),
                    Err(MarshalError::Schema(SchemaError::ZeroWidthElement(_)))
                ),
                "encoding {ty}"
            );
        }

        let (value, consumed) = m.parse("Holder", &[]).expect("zero-width struct");
        assert_eq!(consumed, 0);
        assert_eq!(value.to_json(), json!({"none": [{}, {}, {}]}));
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let m = dummy_marshaler();
        // Every level declares one child: 4 bytes per level.
        let mut bytes = Vec::new();
        for _ in 0..=MAX_NESTING_DEPTH {
            bytes.extend_from_slice(&[0, 0, 0, 1]);
        }
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        assert!(matches!(
            m.parse("Node", &bytes),
            Err(MarshalError::Codec(CodecError::NestingTooDeep(_)))
        ));

        let shallow = [0, 0, 0, 1, 0, 0, 0, 0];
        let (value, consumed) = m.parse("Node", &shallow).expect("shallow tree");
        assert_eq!(consumed, 8);
        assert_eq!(value.to_json(), json!({"children": [{"children": []}]}));
    }

    #[test]
    fn value_shape_mismatch_is_reported() {
        let m = dummy_marshaler();
        assert!(matches!(
            m.encode("[]bool", &Value::Bool(true)),
            Err(MarshalError::Codec(CodecError::UnexpectedValue { expected: "array", .. }))
        ));
        assert!(matches!(
            m.encode("Transfer", &Value::from(1u64)),
            Err(MarshalError::Codec(CodecError::UnexpectedValue { expected: "struct", .. }))
        ));
    }

    #[test]
    fn action_ids_resolve_by_name() {
        let m = dummy_marshaler();
        assert_eq!(m.action_type_id("Batch").expect("known"), 7);
        assert!(matches!(
            m.action_type_id("TransferResult"),
            Err(MarshalError::Schema(SchemaError::UnknownAction(_)))
        ));
    }

    #[test]
    fn marshaler_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Marshaler>();

        let m = dummy_marshaler();
        let expected = m.encode("Transfer", &dummy_transfer(9)).expect("encodable");
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let bytes = m.encode("Transfer", &dummy_transfer(9)).expect("encodable");
                    assert_eq!(bytes, expected);
                    let (decoded, _) = m.parse("Transfer", &bytes).expect("decodable");
                    assert_eq!(decoded, dummy_transfer(9));
                });
            }
        });
    }
}
