//! Primitive data types and the sanitizer factory.
//!
//! A sanitizer casts raw values into a field's primitive representation.
//! Casting follows the host framework's observable coercion rules; in
//! particular, numeric coercion of non-numeric input produces NaN (rendered
//! as JSON null) rather than an error, and the failed cast propagates as-is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::utils::coerce_number;

/// Typed failure returned when a sanitizer is requested for an unsupported
/// type. This is the factory's only error condition; it never panics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct InvalidDataType {
    pub reason: String,
}

impl InvalidDataType {
    fn unsupported() -> Self {
        Self {
            reason: "Must provide a supported data type".to_string(),
        }
    }
}

/// The closed set of primitive types a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataTypeKind {
    String,
    Number,
    Boolean,
}

impl DataTypeKind {
    /// Maps a declared type name to a supported kind.
    pub fn parse(type_name: &str) -> Result<Self, InvalidDataType> {
        match type_name {
            "String" => Ok(Self::String),
            "Number" => Ok(Self::Number),
            "Boolean" => Ok(Self::Boolean),
            _ => Err(InvalidDataType::unsupported()),
        }
    }
}

/// A sanitizer bound to one primitive kind plus its format configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataType {
    pub kind: DataTypeKind,
    #[serde(default)]
    pub format: Map<String, Value>,
}

impl DataType {
    /// Casts `value` to this data type's representation. No side effects.
    pub fn sanitize(&self, value: &Value) -> Value {
        match self.kind {
            DataTypeKind::String => Value::String(to_display_string(value)),
            DataTypeKind::Number => to_number(value),
            DataTypeKind::Boolean => Value::Bool(is_truthy(value)),
        }
    }
}

/// Creates a sanitizer for `type_name`, or a typed failure if the type is
/// unsupported.
pub fn create(type_name: &str, format: Map<String, Value>) -> Result<DataType, InvalidDataType> {
    let kind = DataTypeKind::parse(type_name)?;
    Ok(DataType { kind, format })
}

fn to_display_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn to_number(value: &Value) -> Value {
    let coerced = match value {
        Value::Null => Some(0.0),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => coerce_number(text),
        Value::Array(_) | Value::Object(_) => None,
    };
    coerced
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
