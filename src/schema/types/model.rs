use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::SchemaError;
use super::field::FieldNode;
use super::schema::Schema;

/// A field subset resolved against a schema.
///
/// Every matched node is deep-cloned, so later mutation of model fields can
/// never alias the schema's own field objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub fields: BTreeMap<String, FieldNode>,
}

impl Model {
    /// Builds the model named `name` from the owning schema's model configs.
    ///
    /// Fails with `InvalidModel` when the config is absent or declares no
    /// fields, and with `FieldNotFound` on the first requested field path
    /// that does not exist in the schema's field tree.
    pub fn build(name: &str, schema: &Schema) -> Result<Self, SchemaError> {
        let config = schema
            .models
            .get(name)
            .filter(|config| !config.fields.is_empty())
            .ok_or_else(|| SchemaError::InvalidModel("The MantraModel is invalid".to_string()))?;

        let mut fields = BTreeMap::new();
        for path in &config.fields {
            let node = schema
                .fields
                .get(path)
                .ok_or_else(|| SchemaError::FieldNotFound {
                    field: path.clone(),
                    schema: schema.name.clone(),
                })?;
            fields.insert(path.clone(), node.clone());
        }

        let model_name = if config.name.is_empty() {
            name.to_string()
        } else {
            config.name.clone()
        };
        Ok(Self {
            name: model_name,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::field::{Field, FieldTree};
    use crate::schema::types::schema::ModelConfig;
    use serde_json::{json, Map};

    fn vehicle_schema() -> Schema {
        let mut fields = FieldTree::new();
        fields.insert(
            "plate",
            FieldNode::Leaf(Field::new("plate", "String", Map::new(), json!(""))),
        );
        fields.insert(
            "mileage",
            FieldNode::Leaf(Field::new("mileage", "Number", Map::new(), json!(0))),
        );
        let mut schema = Schema::new("vehicle");
        schema.fields = fields;
        schema.models.insert(
            "edit".to_string(),
            ModelConfig {
                name: "edit".to_string(),
                fields: vec!["plate".to_string(), "mileage".to_string()],
            },
        );
        schema.models.insert(
            "broken".to_string(),
            ModelConfig {
                name: "broken".to_string(),
                fields: vec!["vin".to_string()],
            },
        );
        schema.models.insert(
            "empty".to_string(),
            ModelConfig {
                name: "empty".to_string(),
                fields: vec![],
            },
        );
        schema
    }

    #[test]
    fn test_build_resolves_requested_fields() {
        let schema = vehicle_schema();
        let model = Model::build("edit", &schema).unwrap();
        assert_eq!(model.name, "edit");
        assert_eq!(model.fields.len(), 2);
        assert!(model.fields.contains_key("plate"));
    }

    #[test]
    fn test_build_clones_instead_of_aliasing() {
        let schema = vehicle_schema();
        let mut model = Model::build("edit", &schema).unwrap();
        if let Some(FieldNode::Leaf(field)) = model.fields.get_mut("plate") {
            field.default_value = json!("ZZZ-999");
        }
        let original = schema.fields.get("plate").and_then(FieldNode::as_field);
        assert_eq!(original.map(|f| f.default_value.clone()), Some(json!("")));
    }

    #[test]
    fn test_build_fails_on_missing_field() {
        let schema = vehicle_schema();
        let err = Model::build("broken", &schema).unwrap_err();
        assert_eq!(
            err,
            SchemaError::FieldNotFound {
                field: "vin".to_string(),
                schema: "vehicle".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Field vin not found in vehicle schema");
    }

    #[test]
    fn test_build_rejects_empty_and_unknown_configs() {
        let schema = vehicle_schema();
        for name in ["empty", "nonexistent"] {
            let err = Model::build(name, &schema).unwrap_err();
            assert_eq!(
                err,
                SchemaError::InvalidModel("The MantraModel is invalid".to_string())
            );
        }
    }
}
