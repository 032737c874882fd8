//! Convenience re-exports for common minorm usage
//!
//! # Example
//!
//! ```rust
//! use minorm::prelude::*;
//!
//! let filters = fields! { "name__like" => "test", "type" => [1, 2] };
//! let predicate = and_(&filters, None).unwrap();
//! assert_eq!(predicate.values.len(), 3);
//! ```

// Core minorm components
pub use crate::connection::{Connection, Row, RowIter};
pub use crate::model::Model;
pub use crate::record::Record;

#[cfg(feature = "mysql")]
pub use crate::mysql::MySqlConnection;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, ModelSettings};

// Statement building
pub use sql_builder::prelude::*;
pub use sql_builder::{DatastoreError, DatastoreErrorKind, JoinDescriptor, Selection};

// Common external dependencies
pub use serde_json::{json, Value};
