//! mantra — schema-driven path resolution and state hydration for
//! component-based UIs.
//!
//! Given a declarative schema registry (entities, fields, relationships,
//! actions), the resolver walks a dotted route path into a fully-specified
//! render descriptor, and the coordinator hydrates remote state on demand
//! while deduplicating concurrent in-flight fetches per logical resource
//! key. Rendering, transport, and the reactive store are opaque
//! collaborators behind the `components`, `transport`, and `store`
//! boundaries.

pub mod components;
pub mod coordinator;
pub mod datatype;
pub mod error;
pub mod plugin;
pub mod report;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod transport;

pub(crate) mod utils;

pub use components::{ComponentHost, ComponentRegistry};
pub use coordinator::{InitState, RequestCoordinator, RequestDescriptor, SharedRequest, StateStatus};
pub use error::{ConfigurationError, MantraError, MantraResult};
pub use plugin::{install, InstallConfig, InstallOptions, Mantra, PluginOptions, StoreOptions};
pub use resolver::{resolve, resolve_with_context, ActionKind, ParentEntity, PathContext, ResolvedAction};
pub use schema::core::SchemaRegistry;
pub use schema::types::{
    ActionDescriptor, ComponentDef, Field, FieldNode, FieldTree, FormAction, MixinTag, Model,
    ModelBinding, ModelConfig, Relationship, Schema, SchemaError,
};
pub use store::{StateTree, StoreModule};
pub use transport::{HttpClient, TransportError};
