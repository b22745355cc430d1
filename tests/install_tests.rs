use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use mantra::{
    install, report, resolve, ComponentDef, ComponentRegistry, Field, FieldNode, FieldTree,
    HttpClient, InstallConfig, InstallOptions, MantraError, ModelConfig, PluginOptions,
    RequestDescriptor, Schema, StateTree, StoreOptions, TransportError,
};

struct NullClient;

#[async_trait]
impl HttpClient for NullClient {
    async fn get(&self, _endpoint: &str) -> Result<Value, TransportError> {
        Ok(Value::Null)
    }
}

fn plugins() -> PluginOptions {
    PluginOptions {
        store: Some(StoreOptions {
            lib: StateTree::new(),
        }),
        http_client: Some(Arc::new(NullClient)),
    }
}

fn components() -> BTreeMap<String, ComponentDef> {
    let mut components = BTreeMap::new();
    components.insert(
        "VehicleForm".to_string(),
        ComponentDef::form("VehicleForm", vec![]),
    );
    components
}

#[test]
fn test_invalid_schemas_reports_and_registers_nothing() {
    let options = InstallOptions {
        config: InstallConfig {
            schemas: None,
            components: Some(components()),
        },
        plugins: plugins(),
    };
    let mut host = ComponentRegistry::new();
    let err = install(&mut host, options).unwrap_err();
    assert_eq!(err.reason(), "Schemas property must be an object");
    assert_eq!(
        report::render(err.reason()),
        "[mantra]: Schemas property must be an object"
    );
    assert!(host.is_empty());
}

#[test]
fn test_resolving_bare_schema_end_to_end() {
    let mut schemas = BTreeMap::new();
    schemas.insert("vehicles".to_string(), Schema::new(""));
    let options = InstallOptions {
        config: InstallConfig {
            schemas: Some(schemas),
            components: Some(components()),
        },
        plugins: plugins(),
    };
    let mut host = ComponentRegistry::new();
    let mantra = install(&mut host, options).unwrap();

    let ctx = resolve(&mantra, "vehicles.5");
    assert_eq!(ctx.name, "vehicles");
    assert_eq!(ctx.id, "5");
    assert_eq!(ctx.path, "vehicles.5");
    assert_eq!(ctx.endpoint, "vehicles/5");
    assert!(ctx.parents.is_empty());
    // the bare schema declares no actions, so no component resolves and the
    // descriptor stays incomplete
    assert!(ctx.component.is_none());
    assert!(!ctx.is_complete());
}

#[test]
fn test_resolved_context_feeds_the_coordinator() {
    let mut schemas = BTreeMap::new();
    schemas.insert("vehicles".to_string(), Schema::new(""));
    let options = InstallOptions {
        config: InstallConfig {
            schemas: Some(schemas),
            components: Some(components()),
        },
        plugins: plugins(),
    };
    let mut host = ComponentRegistry::new();
    let mantra = install(&mut host, options).unwrap();

    let ctx = resolve(&mantra, "vehicles.5");
    let request = RequestDescriptor::from(&ctx);
    assert_eq!(request.alias, "vehicles.5");
    assert_eq!(request.endpoint, "vehicles/5");
    assert_eq!(request.store_path, "vehicles.5");
    assert!(request.need_fetch);
}

#[test]
fn test_model_materializes_from_resolved_schema() {
    let mut fields = FieldTree::new();
    fields.insert(
        "plate",
        FieldNode::Leaf(Field::new(
            "plate",
            "String",
            serde_json::Map::new(),
            Value::String(String::new()),
        )),
    );
    let mut schema = Schema::new("").with_fields(fields);
    schema.models.insert(
        "edit".to_string(),
        ModelConfig {
            name: "edit".to_string(),
            fields: vec!["plate".to_string()],
        },
    );
    let mut schemas = BTreeMap::new();
    schemas.insert("vehicles".to_string(), schema);

    let options = InstallOptions {
        config: InstallConfig {
            schemas: Some(schemas),
            components: Some(components()),
        },
        plugins: plugins(),
    };
    let mut host = ComponentRegistry::new();
    let mantra = install(&mut host, options).unwrap();

    let ctx = resolve(&mantra, "vehicles.5");
    let model = mantra.model_for(&ctx, "edit").unwrap();
    assert_eq!(model.name, "edit");
    assert!(model.fields.contains_key("plate"));

    let err = mantra.model_for(&ctx, "missing").unwrap_err();
    assert!(matches!(err, MantraError::Schema(_)));
}

#[test]
fn test_schemas_module_readable_through_store() {
    let mut schemas = BTreeMap::new();
    schemas.insert(
        "vehicles".to_string(),
        Schema::new("").with_relationship("owner", "people"),
    );
    schemas.insert("people".to_string(), Schema::new(""));
    let options = InstallOptions {
        config: InstallConfig {
            schemas: Some(schemas),
            components: Some(components()),
        },
        plugins: plugins(),
    };
    let mut host = ComponentRegistry::new();
    let mantra = install(&mut host, options).unwrap();

    assert!(mantra.store().has("schemas.vehicles.relationships"));
    let relationships = mantra.schemas_module("vehicles.relationships").unwrap();
    assert_eq!(relationships[0]["name"], "owner");
    assert_eq!(relationships[0]["schema"], "people");
}
