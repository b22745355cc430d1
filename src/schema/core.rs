use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use serde_json::{Map, Value};

use super::types::{Schema, SchemaError};

/// Registry of all installed schemas, keyed by globally unique name.
///
/// Built once by the installer and carried inside the configuration handle;
/// read-only afterwards. Schemas are held behind `Arc` so resolution
/// contexts can hold them without copying.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema, replacing any previous one with the same name.
    pub fn register(&mut self, schema: Schema) {
        debug!("registering schema {}", schema.name);
        self.schemas.insert(schema.name.clone(), Arc::new(schema));
    }

    /// True if `name` identifies a registered schema.
    pub fn has(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// The schema named `name`, if registered.
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }

    /// The schema named `name`, or a `NotFound` failure.
    pub fn require(&self, name: &str) -> Result<Arc<Schema>, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Serializes the registry into the state object of the `schemas` store
    /// module.
    pub fn to_state(&self) -> Result<Value, serde_json::Error> {
        let mut state = Map::new();
        for (name, schema) in &self.schemas {
            state.insert(name.clone(), serde_json::to_value(schema.as_ref())?);
        }
        Ok(Value::Object(state))
    }
}
