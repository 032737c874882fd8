//! Unified value mapping between `serde_json::Value` and MySQL
//! This crate provides the placeholder, literal and column-type logic shared across the minorm workspace

pub mod serialize;
pub mod sql;
pub mod types;

pub use serialize::{interpolate, render_literal, to_sql_param};
pub use sql::{count_placeholders, mysql_column_kind, rewrite_placeholders, split_statements};
pub use types::{ColumnKind, SqlParam};
