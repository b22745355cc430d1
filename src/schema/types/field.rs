use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::datatype::{self, DataType, InvalidDataType};

/// A single typed, named, defaulted leaf of a schema.
///
/// The sanitizer is not built at construction time; it is created lazily by
/// `ensure_sanitizer` from the declared type and config, and its kind always
/// matches `field_type` once set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub config: Map<String, Value>,
    #[serde(default, rename = "defaultValue")]
    pub default_value: Value,
    #[serde(skip)]
    sanitizer: Option<DataType>,
}

impl Field {
    pub fn new(
        name: impl Into<String>,
        field_type: impl Into<String>,
        config: Map<String, Value>,
        default_value: Value,
    ) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            config,
            default_value,
            sanitizer: None,
        }
    }

    /// Lazily builds the sanitizer from the declared type and config.
    ///
    /// Idempotent: a second call keeps the already-built sanitizer untouched,
    /// so calling it twice is safe and deterministic.
    pub fn ensure_sanitizer(&mut self) -> Result<(), InvalidDataType> {
        if self.sanitizer.is_none() {
            self.sanitizer = Some(datatype::create(&self.field_type, self.config.clone())?);
        }
        Ok(())
    }

    /// The sanitizer, if `ensure_sanitizer` has been called successfully.
    pub fn sanitizer(&self) -> Option<&DataType> {
        self.sanitizer.as_ref()
    }
}

/// One node of a schema's field tree: a field leaf or a named group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldNode {
    Leaf(Field),
    Group(BTreeMap<String, FieldNode>),
}

impl FieldNode {
    /// The field at this node, if it is a leaf.
    pub fn as_field(&self) -> Option<&Field> {
        match self {
            FieldNode::Leaf(field) => Some(field),
            FieldNode::Group(_) => None,
        }
    }
}

/// A schema's fields, addressed by dotted paths.
///
/// Lookups are existence tests over the tree structure, never truthiness
/// checks on values: a field whose default is falsy still resolves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTree(pub BTreeMap<String, FieldNode>);

impl FieldTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, node: FieldNode) {
        self.0.insert(name.into(), node);
    }

    /// True if a node exists at `path`.
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Walks `path` segment by segment through nested groups.
    pub fn get(&self, path: &str) -> Option<&FieldNode> {
        let mut segments = path.split('.');
        let mut node = self.0.get(segments.next()?)?;
        for segment in segments {
            match node {
                FieldNode::Group(children) => node = children.get(segment)?,
                FieldNode::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
