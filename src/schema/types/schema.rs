use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::action::ActionDescriptor;
use super::field::FieldTree;

/// A named edge from one schema to another, traversed during path
/// resolution. Relationship edges form a DAG over registered schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
    pub schema: String,
}

/// Field subset configuration a model resolves against its owning schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub name: String,
    pub fields: Vec<String>,
}

/// Declarative description of one entity type: its fields, relationships,
/// actions, and model configs.
///
/// Schemas are immutable after installation and their names are globally
/// unique within the registry. When schemas are loaded from configuration
/// the registry key is authoritative for `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: FieldTree,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub actions: BTreeMap<String, ActionDescriptor>,
    #[serde(default, rename = "model")]
    pub models: BTreeMap<String, ModelConfig>,
}

impl Schema {
    /// Creates an empty schema with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: FieldTree::new(),
            relationships: Vec::new(),
            actions: BTreeMap::new(),
            models: BTreeMap::new(),
        }
    }

    /// Sets all fields at once.
    pub fn with_fields(mut self, fields: FieldTree) -> Self {
        self.fields = fields;
        self
    }

    /// Adds a relationship edge to another schema.
    pub fn with_relationship(mut self, name: impl Into<String>, schema: impl Into<String>) -> Self {
        self.relationships.push(Relationship {
            name: name.into(),
            schema: schema.into(),
        });
        self
    }

    /// Adds an action descriptor under `name`.
    pub fn with_action(mut self, name: impl Into<String>, action: ActionDescriptor) -> Self {
        self.actions.insert(name.into(), action);
        self
    }

    /// The relationship named `name`, if declared.
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|rel| rel.name == name)
    }

    /// The action descriptor keyed by `name`, if declared.
    pub fn action(&self, name: &str) -> Option<&ActionDescriptor> {
        self.actions.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_lookup_by_name() {
        let schema = Schema::new("vehicle").with_relationship("owner", "person");
        assert_eq!(schema.relationship("owner").map(|r| r.schema.as_str()), Some("person"));
        assert!(schema.relationship("driver").is_none());
    }

    #[test]
    fn test_schema_deserializes_from_config() {
        let schema: Schema = serde_json::from_str(
            r#"{
                "fields": {
                    "plate": { "type": "String", "defaultValue": "" }
                },
                "relationships": [{ "name": "owner", "schema": "person" }],
                "model": { "edit": { "fields": ["plate"] } }
            }"#,
        )
        .unwrap();
        assert!(schema.fields.has("plate"));
        assert!(schema.relationship("owner").is_some());
        assert_eq!(schema.models["edit"].fields, vec!["plate".to_string()]);
    }
}
