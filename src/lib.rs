//! # minorm
//!
//! A minimal ORM for MySQL: keyword filters become parameterized SQL, and
//! each model exposes CRUD, pagination, one optional join and transaction
//! passthrough over a single blocking connection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use minorm::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let conn = Arc::new(MySqlConnection::from_config(&config.database)?);
//!
//!     let descriptor = ModelDescriptor::new("test_orm", ["id", "name", "content", "type"])?;
//!     let tests = Model::new(descriptor, conn);
//!
//!     let mut record = tests.create(fields! { "name" => "test0", "type" => 1 })?;
//!     record.set("content", "hello")?;
//!     record.save()?;
//!
//!     let recent = tests.find(
//!         &QueryBuilder::new()
//!             .filter("type__ge", 1)
//!             .filter("name__like", "test")
//!             .order_by("id DESC"),
//!     )?;
//!     println!("{} matching rows", recent.len());
//!
//!     tests.begin()?;
//!     tests.update_where_locked(
//!         &fields! { "name" => "b" },
//!         &fields! { "name" => "test0" },
//!         None,
//!     )?;
//!     tests.commit()?;
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod connection;
pub mod model;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod prelude;
pub mod record;

// Re-export the main public types for convenience
pub use connection::{Connection, Row, RowIter};
pub use model::{Model, SQL_LOG_TARGET};
#[cfg(feature = "mysql")]
pub use mysql::MySqlConnection;
pub use record::Record;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig, ModelSettings};

// Re-export internal crates used by macros and public API
pub use sql_builder;
pub use sql_builder::fields;
pub use sql_builder::{
    DatastoreError, DatastoreErrorKind, Fields, ModelDescriptor, OrmError, OrmResult, Predicate,
    QueryBuilder, Selection, Statement,
};
pub use type_mapping;

// Re-export external dependencies used in public API
pub use serde_json;
#[cfg(feature = "mysql")]
pub use sqlx;
