use thiserror::Error;

/// Resolution-time and schema-construction failures.
///
/// These are caught at the orchestration boundary, logged through the
/// user-facing channel, and degrade to a partial descriptor; none of them is
/// fatal to the host process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A path segment or relationship target does not name a registered schema
    #[error("Schema not found: {0}")]
    NotFound(String),

    /// A model requested a field path absent from the owning schema
    #[error("Field {field} not found in {schema} schema")]
    FieldNotFound { field: String, schema: String },

    /// A resolved component is missing or lacks the expected mixin tag
    #[error("Invalid component: {0}")]
    InvalidComponent(String),

    /// A model configuration is absent or declares no fields
    #[error("{0}")]
    InvalidModel(String),

    /// Malformed schema configuration data
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
