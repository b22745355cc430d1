pub mod action;
pub mod errors;
pub mod field;
pub mod model;
pub mod schema;

pub use action::{ActionDescriptor, ComponentDef, FormAction, MixinTag, ModelBinding};
pub use errors::SchemaError;
pub use field::{Field, FieldNode, FieldTree};
pub use model::Model;
pub use schema::{ModelConfig, Relationship, Schema};
