use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

use super::errors::SchemaError;
use super::model::Model;
use super::schema::Schema;

/// The closed set of mixin markers a resolvable component can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MixinTag {
    MantraForm,
}

/// A renderable component definition attached to a schema action.
///
/// Schema entries are reused across many resolutions, so resolved copies are
/// always deep clones, never references into the schema itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDef {
    pub name: String,
    pub mixin: MixinTag,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl ComponentDef {
    pub fn form(name: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            name: name.into(),
            mixin: MixinTag::MantraForm,
            fields,
        }
    }
}

/// Binding from a form action to its model: a name reference into the owning
/// schema's model configs before resolution, a materialized model afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelBinding {
    Named(String),
    Resolved(Model),
}

/// A form action against a schema: the component to render and the field
/// subset it edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormAction {
    pub name: String,
    pub model: ModelBinding,
    pub component: ComponentDef,
}

impl FormAction {
    /// Creates a form action. The name and the model reference are both
    /// required; a form action without a resolved model cannot be rendered.
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        component: ComponentDef,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        let model = model.into();
        if name.is_empty() {
            return Err(ConfigurationError::new("A form action needs a name property"));
        }
        if model.is_empty() {
            return Err(ConfigurationError::new("A form action needs a model property"));
        }
        Ok(Self {
            name,
            model: ModelBinding::Named(model),
            component,
        })
    }

    /// Materializes the named model config against the owning schema.
    /// Idempotent once resolved.
    pub fn set_model(&mut self, schema: &Schema) -> Result<&Model, SchemaError> {
        if let ModelBinding::Named(name) = &self.model {
            let model = Model::build(name, schema)?;
            self.model = ModelBinding::Resolved(model);
        }
        match &self.model {
            ModelBinding::Resolved(model) => Ok(model),
            ModelBinding::Named(_) => {
                Err(SchemaError::InvalidModel("The MantraModel is invalid".to_string()))
            }
        }
    }

    /// The materialized model, if `set_model` has run.
    pub fn model(&self) -> Option<&Model> {
        match &self.model {
            ModelBinding::Resolved(model) => Some(model),
            ModelBinding::Named(_) => None,
        }
    }
}

/// Action descriptors, dispatched by pattern match. New action kinds extend
/// this variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mixin")]
pub enum ActionDescriptor {
    MantraForm(FormAction),
}

impl ActionDescriptor {
    pub fn name(&self) -> &str {
        match self {
            ActionDescriptor::MantraForm(form) => &form.name,
        }
    }

    /// The component definition this action renders with.
    pub fn component(&self) -> &ComponentDef {
        match self {
            ActionDescriptor::MantraForm(form) => &form.component,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::field::{Field, FieldNode, FieldTree};
    use crate::schema::types::schema::ModelConfig;
    use serde_json::{json, Map};

    fn component() -> ComponentDef {
        ComponentDef::form("VehicleForm", vec!["plate".to_string()])
    }

    #[test]
    fn test_new_requires_name_and_model() {
        assert!(FormAction::new("", "edit", component()).is_err());
        assert!(FormAction::new("edit", "", component()).is_err());
        assert!(FormAction::new("edit", "edit", component()).is_ok());
    }

    #[test]
    fn test_set_model_materializes_and_is_idempotent() {
        let mut fields = FieldTree::new();
        fields.insert(
            "plate",
            FieldNode::Leaf(Field::new("plate", "String", Map::new(), json!(""))),
        );
        let mut schema = Schema::new("vehicle");
        schema.fields = fields;
        schema.models.insert(
            "edit".to_string(),
            ModelConfig {
                name: "edit".to_string(),
                fields: vec!["plate".to_string()],
            },
        );

        let mut action = FormAction::new("edit", "edit", component()).unwrap();
        assert!(action.model().is_none());
        action.set_model(&schema).unwrap();
        let first = action.model().cloned().unwrap();
        action.set_model(&schema).unwrap();
        assert_eq!(action.model().cloned().unwrap(), first);
    }

    #[test]
    fn test_descriptor_serializes_with_mixin_tag() {
        let action = FormAction::new("edit", "edit", component()).unwrap();
        let value = serde_json::to_value(ActionDescriptor::MantraForm(action)).unwrap();
        assert_eq!(value["mixin"], json!("MantraForm"));
        assert_eq!(value["component"]["mixin"], json!("MantraForm"));
    }
}
