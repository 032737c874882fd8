//! Type mapping definitions
//!
//! This module provides the runtime value shapes exchanged with MySQL.

use serde_json::Value;

/// A bound parameter, classified for the driver
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Json(String), // arrays and objects travel as JSON text
}

/// Decoding class of a result column, derived from the MySQL type name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Bool,
    Int,
    UInt,
    Float,
    Decimal,
    Text,
    Bytes,
    Date,
    DateTime,
    Timestamp,
    Time,
    Json,
    Null,
}

impl From<&Value> for SqlParam {
    fn from(val: &Value) -> Self {
        match val {
            Value::Null => SqlParam::Null,
            Value::Bool(b) => SqlParam::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SqlParam::Int(i)
                } else if let Some(u) = n.as_u64() {
                    SqlParam::UInt(u)
                } else {
                    SqlParam::Float(n.as_f64().unwrap_or_default())
                }
            }
            Value::String(s) => SqlParam::Text(s.clone()),
            other => SqlParam::Json(other.to_string()),
        }
    }
}
