//! Installation entrypoint and the process configuration handle.
//!
//! `install` validates its options, registers components into the host,
//! writes the schema registry into the store tree as the `schemas` module,
//! and returns a `Mantra` handle. The handle is passed by reference to
//! every resolution and coordination call; there is no process-wide
//! singleton. Installation failures are reported through the `[mantra]`
//! channel and leave no partial state behind; the host never sees a panic.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::components::ComponentHost;
use crate::coordinator::RequestCoordinator;
use crate::error::{ConfigurationError, MantraResult};
use crate::report;
use crate::resolver::PathContext;
use crate::schema::core::SchemaRegistry;
use crate::schema::types::{ComponentDef, Model, Schema, SchemaError};
use crate::store::{StateTree, StoreModule};
use crate::transport::HttpClient;

/// Name of the store module holding the serialized schema registry.
const SCHEMAS_MODULE: &str = "schemas";

/// Store plugin handle: the host's reactive tree.
pub struct StoreOptions {
    pub lib: StateTree,
}

/// Declarative configuration passed to `install`.
#[derive(Default)]
pub struct InstallConfig {
    pub schemas: Option<BTreeMap<String, Schema>>,
    pub components: Option<BTreeMap<String, ComponentDef>>,
}

/// Collaborator libraries passed to `install`.
#[derive(Default)]
pub struct PluginOptions {
    pub store: Option<StoreOptions>,
    pub http_client: Option<Arc<dyn HttpClient>>,
}

#[derive(Default)]
pub struct InstallOptions {
    pub config: InstallConfig,
    pub plugins: PluginOptions,
}

/// Process configuration produced by a successful install.
pub struct Mantra {
    schemas: SchemaRegistry,
    store: StateTree,
    http_client: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for Mantra {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mantra")
            .field("schemas", &self.schemas)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Mantra {
    /// The installed schema registry.
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// The store tree, including the `schemas` module.
    pub fn store(&self) -> &StateTree {
        &self.store
    }

    /// The transport client handed to coordinators.
    pub fn http_client(&self) -> Arc<dyn HttpClient> {
        Arc::clone(&self.http_client)
    }

    /// Dotted-path lookup inside the installed `schemas` store module.
    pub fn schemas_module(&self, path: &str) -> Option<&Value> {
        self.store.get(&format!("{}.{}", SCHEMAS_MODULE, path))
    }

    /// A root coordinator bound to this configuration's transport client.
    pub fn coordinator(&self) -> RequestCoordinator {
        RequestCoordinator::root(self.http_client())
    }

    /// Materializes a named model against the schema a context resolved to.
    pub fn model_for(&self, ctx: &PathContext, model: &str) -> MantraResult<Model> {
        let schema = ctx
            .schema
            .as_deref()
            .ok_or_else(|| SchemaError::NotFound(ctx.name.clone()))?;
        Ok(Model::build(model, schema)?)
    }
}

fn validate_options(options: &InstallOptions) -> Result<(), ConfigurationError> {
    let schemas_present = options
        .config
        .schemas
        .as_ref()
        .map(|schemas| !schemas.is_empty())
        .unwrap_or(false);
    if !schemas_present {
        return Err(ConfigurationError::new("Schemas property must be an object"));
    }

    if options.plugins.store.is_none() {
        return Err(ConfigurationError::new("Store library must be provided"));
    }

    if options.plugins.http_client.is_none() {
        return Err(ConfigurationError::new(
            "HttpClient library configuration must be provided",
        ));
    }

    let components_present = options
        .config
        .components
        .as_ref()
        .map(|components| !components.is_empty())
        .unwrap_or(false);
    if !components_present {
        return Err(ConfigurationError::new(
            "Components property must be an object",
        ));
    }

    Ok(())
}

/// Installs the plugin against a host component namespace.
///
/// Validation order: schemas, store, http client, components; the first
/// failure is reported and aborts with nothing registered. On success the
/// components are registered, the schemas module is written into the store
/// tree, and the configuration handle is returned.
pub fn install<H: ComponentHost>(
    host: &mut H,
    options: InstallOptions,
) -> Result<Mantra, ConfigurationError> {
    if let Err(err) = validate_options(&options) {
        report::error(err.reason());
        return Err(err);
    }

    let InstallOptions { config, plugins } = options;
    // validate_options guarantees all four are present
    let (Some(schemas), Some(components), Some(store), Some(http_client)) = (
        config.schemas,
        config.components,
        plugins.store,
        plugins.http_client,
    ) else {
        let err = ConfigurationError::new("Schemas property must be an object");
        report::error(err.reason());
        return Err(err);
    };

    let mut registry = SchemaRegistry::new();
    for (name, mut schema) in schemas {
        // the config key is authoritative for the schema name
        schema.name = name;
        registry.register(schema);
    }

    let state = match registry.to_state() {
        Ok(state) => state,
        Err(err) => {
            let err = ConfigurationError::new(format!("Schemas could not be serialized: {}", err));
            report::error(err.reason());
            return Err(err);
        }
    };

    for (name, definition) in &components {
        host.component(name, definition.clone());
    }

    let mut store_tree = store.lib;
    store_tree.register_module(SCHEMAS_MODULE, StoreModule::with_state(state));

    Ok(Mantra {
        schemas: registry,
        store: store_tree,
        http_client,
    })
}
