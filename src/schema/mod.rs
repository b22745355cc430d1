pub mod core;
pub mod types;

pub use self::core::SchemaRegistry;
pub use types::{Schema, SchemaError};
