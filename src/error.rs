use thiserror::Error;

use crate::datatype::InvalidDataType;
use crate::schema::types::SchemaError;
use crate::transport::TransportError;

/// Invalid installation options.
///
/// Reported through the user-facing channel; installation aborts without
/// leaving any partial state registered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error: {reason}")]
pub struct ConfigurationError {
    reason: String,
}

impl ConfigurationError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The bare validation message, without the error-category prefix.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Unified error type for the crate.
///
/// Each variant covers one failure category; conversions exist from every
/// per-module error so callers can propagate with `?`.
#[derive(Error, Debug)]
pub enum MantraError {
    /// Schema lookup and resolution failures
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Invalid installation options
    #[error("{0}")]
    Config(#[from] ConfigurationError),

    /// Remote fetch failures
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Unsupported data type requested from the sanitizer factory
    #[error("Data type error: {0}")]
    DataType(#[from] InvalidDataType),

    /// Serialization/deserialization failures
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MantraError {
    fn from(error: serde_json::Error) -> Self {
        MantraError::Serialization(error.to_string())
    }
}

/// Result type alias for operations that can fail with a `MantraError`.
pub type MantraResult<T> = Result<T, MantraError>;
