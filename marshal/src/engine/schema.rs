//! ABI validation and the parsed struct index.
//!
//! Runs once when a [`crate::Marshaler`] is built and enforces the
//! invariants the codecs rely on:
//!
//! - action ids and output ids are unique within their own list,
//! - type names are unique,
//! - every field descriptor parses and every bare name resolves,
//! - no struct contains itself without an array that can end the chain,
//! - no dynamic array holds elements that occupy zero bytes.
//!
//! It also records the minimum wire width of every struct, which bounds
//! how many elements a decoded count may claim.

use std::collections::{HashMap, HashSet};

use crate::error::SchemaError;
use crate::types::{Abi, TypeCategory, TypeDescriptor, TypedStruct};

/// Parsed field list of one struct.
pub(crate) type StructLayout = Vec<(String, TypeDescriptor)>;

/// Struct layouts keyed by type name, with descriptors parsed once.
#[derive(Clone, Debug, Default)]
pub(crate) struct SchemaIndex {
    structs: HashMap<String, StructLayout>,
    widths: HashMap<String, usize>,
}

impl SchemaIndex {
    /// Validates `abi` and parses every field descriptor.
    pub(crate) fn build(abi: &Abi) -> Result<Self, SchemaError> {
        check_unique_ids(TypeCategory::Action, &abi.actions)?;
        check_unique_ids(TypeCategory::Output, &abi.outputs)?;

        let mut structs = HashMap::with_capacity(abi.types.len());
        for ty in &abi.types {
            let layout = ty
                .fields
                .iter()
                .map(|f| -> Result<_, SchemaError> {
                    Ok((f.name.clone(), f.ty.parse::<TypeDescriptor>()?))
                })
                .collect::<Result<StructLayout, SchemaError>>()?;
            if structs.insert(ty.name.clone(), layout).is_some() {
                return Err(SchemaError::DuplicateType(ty.name.clone()));
            }
        }

        let mut index = Self {
            structs,
            widths: HashMap::new(),
        };
        index.check_references(abi)?;
        index.check_recursion()?;

        let mut widths = HashMap::with_capacity(index.structs.len());
        for name in index.structs.keys() {
            struct_width(&index.structs, name, &mut widths);
        }
        index.widths = widths;
        index.check_element_widths()?;
        Ok(index)
    }

    /// Field layout of the struct `name`.
    pub(crate) fn layout(&self, name: &str) -> Option<&StructLayout> {
        self.structs.get(name)
    }

    /// Fewest bytes a value of `ty` occupies on the wire.
    pub(crate) fn min_width(&self, ty: &TypeDescriptor) -> Result<usize, SchemaError> {
        match ty {
            TypeDescriptor::Primitive(p) => Ok(p.min_width()),
            TypeDescriptor::DynamicArray(_) => Ok(4),
            TypeDescriptor::FixedArray(_, 0) => Ok(0),
            TypeDescriptor::FixedArray(elem, len) => {
                Ok(len.saturating_mul(self.min_width(elem)?))
            }
            TypeDescriptor::Named(name) => self
                .widths
                .get(name)
                .copied()
                .ok_or_else(|| SchemaError::UnknownType(name.clone())),
        }
    }

    /// Minimum width of a dynamic array's element type. Zero-width elements
    /// are refused.
    pub(crate) fn element_width(&self, elem: &TypeDescriptor) -> Result<usize, SchemaError> {
        match self.min_width(elem)? {
            0 => Err(SchemaError::ZeroWidthElement(elem.to_string())),
            width => Ok(width),
        }
    }

    fn check_element_widths(&self) -> Result<(), SchemaError> {
        fn walk(index: &SchemaIndex, ty: &TypeDescriptor) -> Result<(), SchemaError> {
            match ty {
                TypeDescriptor::DynamicArray(elem) => {
                    index.element_width(elem)?;
                    walk(index, elem)
                }
                TypeDescriptor::FixedArray(elem, _) => walk(index, elem),
                TypeDescriptor::Primitive(_) | TypeDescriptor::Named(_) => Ok(()),
            }
        }

        for layout in self.structs.values() {
            for (_, ty) in layout {
                walk(self, ty)?;
            }
        }
        Ok(())
    }

    fn resolves(&self, ty: &TypeDescriptor) -> Result<(), SchemaError> {
        match ty {
            TypeDescriptor::Primitive(_) => Ok(()),
            TypeDescriptor::DynamicArray(elem) | TypeDescriptor::FixedArray(elem, _) => {
                self.resolves(elem)
            }
            TypeDescriptor::Named(name) if self.structs.contains_key(name) => Ok(()),
            TypeDescriptor::Named(name) => Err(SchemaError::UnknownType(name.clone())),
        }
    }

    fn check_references(&self, abi: &Abi) -> Result<(), SchemaError> {
        for layout in self.structs.values() {
            for (_, ty) in layout {
                self.resolves(ty)?;
            }
        }

        // Action and output names must themselves be resolvable types.
        for typed in abi.actions.iter().chain(abi.outputs.iter()) {
            let ty: TypeDescriptor = typed.name.parse()?;
            self.resolves(&ty)?;
        }
        Ok(())
    }

    fn check_recursion(&self) -> Result<(), SchemaError> {
        let mut done = HashSet::new();
        let mut names: Vec<&String> = self.structs.keys().collect();
        names.sort();

        for name in names {
            let mut path = Vec::new();
            self.visit(name, &mut path, &mut done)?;
        }
        Ok(())
    }

    /// Depth-first walk over edges that always recurse: bare names and
    /// non-empty fixed arrays. Dynamic arrays may be empty, so they end
    /// the walk.
    fn visit<'a>(
        &'a self,
        name: &'a str,
        path: &mut Vec<&'a str>,
        done: &mut HashSet<&'a str>,
    ) -> Result<(), SchemaError> {
        if done.contains(name) {
            return Ok(());
        }
        if path.contains(&name) {
            return Err(SchemaError::RecursiveType(name.to_string()));
        }

        path.push(name);
        if let Some(layout) = self.structs.get(name) {
            for (_, ty) in layout {
                if let Some(next) = always_recurses_into(ty) {
                    self.visit(next, path, done)?;
                }
            }
        }
        path.pop();
        done.insert(name);
        Ok(())
    }
}

fn always_recurses_into(ty: &TypeDescriptor) -> Option<&str> {
    match ty {
        TypeDescriptor::Named(name) => Some(name),
        TypeDescriptor::FixedArray(elem, len) if *len > 0 => always_recurses_into(elem),
        _ => None,
    }
}

/// Memoised minimum width of struct `name`. Only called once references
/// resolve and recursion is known to end.
fn struct_width(
    structs: &HashMap<String, StructLayout>,
    name: &str,
    widths: &mut HashMap<String, usize>,
) -> usize {
    if let Some(width) = widths.get(name) {
        return *width;
    }
    let width = structs.get(name).map_or(0, |layout| {
        layout.iter().fold(0usize, |acc, (_, ty)| {
            acc.saturating_add(descriptor_width(structs, ty, widths))
        })
    });
    widths.insert(name.to_string(), width);
    width
}

fn descriptor_width(
    structs: &HashMap<String, StructLayout>,
    ty: &TypeDescriptor,
    widths: &mut HashMap<String, usize>,
) -> usize {
    match ty {
        TypeDescriptor::Primitive(p) => p.min_width(),
        TypeDescriptor::DynamicArray(_) => 4,
        TypeDescriptor::FixedArray(_, 0) => 0,
        TypeDescriptor::FixedArray(elem, len) => {
            len.saturating_mul(descriptor_width(structs, elem, widths))
        }
        TypeDescriptor::Named(name) => struct_width(structs, name, widths),
    }
}

fn check_unique_ids(category: TypeCategory, list: &[TypedStruct]) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for typed in list {
        if !seen.insert(typed.id) {
            return Err(SchemaError::DuplicateId {
                category,
                id: typed.id,
            });
        }
    }
    Ok(())
}
