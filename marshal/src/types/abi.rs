//! The ABI document.
//!
//! An [`Abi`] lists the numeric ids of action and output types and the
//! field layout of every named struct. It is the wire contract with the
//! configuration layer that supplies it, so the serde names match the
//! JSON document exactly: `actions`, `outputs`, `types`, `id`, `name`,
//! `fields`, `type`.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A numerically identified action or output type.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TypedStruct {
    pub id: u8,
    pub name: String,
}

/// One struct field: name plus type descriptor text.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// A named struct and its fields in declaration order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TypeAbi {
    pub name: String,
    pub fields: Vec<Field>,
}

/// Machine-readable interface description of a VM.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Abi {
    pub actions: Vec<TypedStruct>,
    pub outputs: Vec<TypedStruct>,
    pub types: Vec<TypeAbi>,
}

impl Abi {
    /// Parses an ABI JSON document.
    ///
    /// Any structural mismatch (missing list, wrong field type, id out of
    /// `u8` range) is reported as [`SchemaError::MalformedAbi`].
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::MalformedAbi(e.to_string()))
    }

    /// Same as [`Abi::from_json_str`] for an already-parsed document.
    pub fn from_json(json: serde_json::Value) -> Result<Self, SchemaError> {
        serde_json::from_value(json).map_err(|e| SchemaError::MalformedAbi(e.to_string()))
    }

    /// Looks up a struct declaration by name.
    pub fn find_type(&self, name: &str) -> Option<&TypeAbi> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Id of an action or output named `name`, actions first.
    ///
    /// Both lists form one lookup space here, which is how typed encoding
    /// tags a struct.
    pub fn type_id(&self, name: &str) -> Option<u8> {
        self.actions
            .iter()
            .chain(self.outputs.iter())
            .find(|t| t.name == name)
            .map(|t| t.id)
    }
}
