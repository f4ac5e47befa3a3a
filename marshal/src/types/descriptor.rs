//! Parsed type descriptors.
//!
//! ABI fields carry their type as text (`uint64`, `[]Address`, `[4]Point`,
//! `Transfer`, ...). The text is parsed once into a [`TypeDescriptor`] so
//! the codecs can match on it exhaustively instead of re-inspecting string
//! prefixes on every call.

use std::fmt;
use std::str::FromStr;

use super::ADDRESS_LEN;
use crate::error::SchemaError;

/// Fixed-width integer kinds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum NumberKind {
    U8,
    U16,
    U32,
    U64,
    /// Unsigned only; there is no signed 256-bit kind.
    U256,
    I8,
    I16,
    I32,
    I64,
}

impl NumberKind {
    /// Encoded width in bytes.
    pub fn width(self) -> usize {
        match self {
            NumberKind::U8 | NumberKind::I8 => 1,
            NumberKind::U16 | NumberKind::I16 => 2,
            NumberKind::U32 | NumberKind::I32 => 4,
            NumberKind::U64 | NumberKind::I64 => 8,
            NumberKind::U256 => 32,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            NumberKind::I8 | NumberKind::I16 | NumberKind::I32 | NumberKind::I64
        )
    }

    /// ABI keyword for this kind.
    pub fn name(self) -> &'static str {
        match self {
            NumberKind::U8 => "uint8",
            NumberKind::U16 => "uint16",
            NumberKind::U32 => "uint32",
            NumberKind::U64 => "uint64",
            NumberKind::U256 => "uint256",
            NumberKind::I8 => "int8",
            NumberKind::I16 => "int16",
            NumberKind::I32 => "int32",
            NumberKind::I64 => "int64",
        }
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "uint8" => NumberKind::U8,
            "uint16" => NumberKind::U16,
            "uint32" => NumberKind::U32,
            "uint64" => NumberKind::U64,
            "uint256" => NumberKind::U256,
            "int8" => NumberKind::I8,
            "int16" => NumberKind::I16,
            "int32" => NumberKind::I32,
            "int64" => NumberKind::I64,
            _ => return None,
        })
    }
}

/// Leaf types handled directly by the primitive codecs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Primitive {
    Bool,
    Number(NumberKind),
    /// 2-byte length prefix + UTF-8.
    String,
    /// 33 payload bytes; the checksum lives only in the text form.
    Address,
    /// `[]uint8`: 4-byte length prefix + raw bytes, base64 for callers.
    Bytes,
}

impl Primitive {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "bool" => Some(Primitive::Bool),
            "string" => Some(Primitive::String),
            "Address" => Some(Primitive::Address),
            "[]uint8" => Some(Primitive::Bytes),
            other => NumberKind::from_keyword(other).map(Primitive::Number),
        }
    }

    /// Fewest bytes a value of this type occupies on the wire.
    pub(crate) fn min_width(self) -> usize {
        match self {
            Primitive::Bool => 1,
            Primitive::Number(kind) => kind.width(),
            Primitive::String => 2,
            Primitive::Address => ADDRESS_LEN,
            Primitive::Bytes => 4,
        }
    }
}

/// A parsed ABI type.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    /// `[]T`: 4-byte element count, then the elements.
    DynamicArray(Box<TypeDescriptor>),
    /// `[N]T`: exactly `N` elements, no count on the wire.
    FixedArray(Box<TypeDescriptor>, usize),
    /// A struct declared in the ABI's `types`.
    Named(String),
}

impl TypeDescriptor {
    /// Shorthand for a struct reference.
    pub fn named(name: impl Into<String>) -> Self {
        TypeDescriptor::Named(name.into())
    }
}

impl FromStr for TypeDescriptor {
    type Err = SchemaError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || SchemaError::InvalidDescriptor(text.to_string());

        if let Some(primitive) = Primitive::from_keyword(text) {
            return Ok(TypeDescriptor::Primitive(primitive));
        }

        if let Some(elem) = text.strip_prefix("[]") {
            let elem: TypeDescriptor = elem.parse().map_err(|_| invalid())?;
            return Ok(TypeDescriptor::DynamicArray(Box::new(elem)));
        }

        if let Some(rest) = text.strip_prefix('[') {
            let (len, elem) = rest.split_once(']').ok_or_else(invalid)?;
            if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let len: usize = len.parse().map_err(|_| invalid())?;
            let elem: TypeDescriptor = elem.parse().map_err(|_| invalid())?;
            return Ok(TypeDescriptor::FixedArray(Box::new(elem), len));
        }

        let is_identifier = text
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !is_identifier {
            return Err(invalid());
        }
        Ok(TypeDescriptor::Named(text.to_string()))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(Primitive::Bool) => f.write_str("bool"),
            TypeDescriptor::Primitive(Primitive::Number(kind)) => f.write_str(kind.name()),
            TypeDescriptor::Primitive(Primitive::String) => f.write_str("string"),
            TypeDescriptor::Primitive(Primitive::Address) => f.write_str("Address"),
            TypeDescriptor::Primitive(Primitive::Bytes) => f.write_str("[]uint8"),
            TypeDescriptor::DynamicArray(elem) => write!(f, "[]{elem}"),
            TypeDescriptor::FixedArray(elem, len) => write!(f, "[{len}]{elem}"),
            TypeDescriptor::Named(name) => f.write_str(name),
        }
    }
}
