//! Dynamically-typed values.
//!
//! A [`Value`] is what callers hand to the encoder and what the decoder
//! hands back. It only lives for the duration of one encode/decode call;
//! the ABI decides how each node is laid out on the wire.

use primitive_types::U256;
use serde_json::{Map, Number};

use crate::error::CodecError;

/// A value tree shaped by an ABI type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Bool(bool),
    /// Signed integers (`int8`..`int64`).
    Int(i64),
    /// Unsigned integers (`uint8`..`uint256`).
    Uint(U256),
    /// Text, address text, base64 byte buffers, or a base-10 number.
    String(String),
    Array(Vec<Value>),
    Struct(Fields),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "signed integer",
            Value::Uint(_) => "unsigned integer",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Fields> {
        match self {
            Value::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Converts parsed JSON into a value.
    ///
    /// Numbers that fit `u64` become [`Value::Uint`], negative ones
    /// [`Value::Int`]. Strings are kept as-is, so large integers can be
    /// passed losslessly as base-10 text. `null` and fractional numbers
    /// have no wire form and are rejected.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, CodecError> {
        Ok(match json {
            serde_json::Value::Null => {
                return Err(CodecError::UnexpectedValue {
                    expected: "a value",
                    found: "null",
                });
            }
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Value::Uint(U256::from(u))
                } else if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    return Err(CodecError::InvalidNumber {
                        kind: "integer",
                        value: n.to_string(),
                    });
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(Value::from_json)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(map) => Value::Struct(
                map.iter()
                    .map(|(k, v)| -> Result<_, CodecError> {
                        Ok((k.clone(), Value::from_json(v)?))
                    })
                    .collect::<Result<_, CodecError>>()?,
            ),
        })
    }

    /// Renders the value as JSON.
    ///
    /// Unsigned integers above `u64::MAX` are rendered as base-10 strings so
    /// no precision is lost.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number(Number::from(*i)),
            Value::Uint(u) if *u <= U256::from(u64::MAX) => {
                serde_json::Value::Number(Number::from(u.low_u64()))
            }
            Value::Uint(u) => serde_json::Value::String(u.to_string()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Struct(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(U256::from(u))
    }
}

impl From<U256> for Value {
    fn from(u: U256) -> Self {
        Value::Uint(u)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Value::Struct(fields)
    }
}

/// Struct fields in declaration order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Fields(Vec<(String, Value)>);

impl Fields {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Looks a field up by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Sets a field, replacing an existing one of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Builder-style [`Fields::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_numbers_map_to_integer_variants() {
        let v = Value::from_json(&json!([1, -1, "18446744073709551616"])).expect("valid json");
        assert_eq!(
            v,
            Value::Array(vec![
                Value::Uint(U256::from(1u64)),
                Value::Int(-1),
                Value::String("18446744073709551616".to_string()),
            ])
        );
    }

    #[test]
    fn null_and_floats_are_rejected() {
        assert!(matches!(
            Value::from_json(&json!({"a": null})),
            Err(CodecError::UnexpectedValue { found: "null", .. })
        ));
        assert!(matches!(
            Value::from_json(&json!(1.5)),
            Err(CodecError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn wide_integers_render_as_strings() {
        let big = U256::from(u64::MAX) + U256::from(1u64);
        assert_eq!(Value::Uint(big).to_json(), json!("18446744073709551616"));
        assert_eq!(Value::Uint(U256::from(u64::MAX)).to_json(), json!(u64::MAX));
        assert_eq!(Value::Int(i64::MIN).to_json(), json!(i64::MIN));
    }

    #[test]
    fn struct_keeps_declaration_order() {
        let fields = Fields::new().with("z", 1u64).with("a", true).with("z", 2u64);
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["z", "a"]);
        assert_eq!(fields.get("z"), Some(&Value::from(2u64)));

        let json = Value::Struct(fields).to_json();
        assert_eq!(json.to_string(), r#"{"z":2,"a":true}"#);
    }

    #[test]
    fn json_object_roundtrips() {
        let original = json!({"to": "abc", "value": 1000, "flags": [true, false]});
        let value = Value::from_json(&original).expect("valid json");
        assert_eq!(value.to_json(), original);
    }
}
