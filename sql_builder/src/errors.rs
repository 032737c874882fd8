use std::fmt;
use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias for minorm operations
pub type OrmResult<T> = Result<T, OrmError>;

#[derive(Error, Debug)]
pub enum OrmError {
    #[error("Schema mismatch: {keys:?} not in {columns:?}")]
    SchemaMismatch {
        keys: Vec<String>,
        columns: Vec<String>,
    },

    #[error("Empty value list for filter `{0}`")]
    EmptyValueList(String),

    #[error("Shape mismatch at record {index}: expected keys {expected:?}, found {found:?}")]
    ShapeMismatch {
        index: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Duplicate key on `{table}` after {attempts} attempts: {message}")]
    DuplicateKey {
        table: String,
        attempts: u32,
        message: String,
    },

    #[error("Refusing to delete from `{0}` without a filter")]
    MissingFilter(String),

    #[error("No values given for {0}")]
    EmptyValues(String),

    #[error("Record of `{0}` has no `id` value")]
    MissingPrimaryKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Datastore error: {0}")]
    Datastore(#[from] DatastoreError),
}

/// Classification a connection attaches to the failures it reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatastoreErrorKind {
    /// Unique / primary key violation (MySQL 1062)
    DuplicateKey,
    Connection,
    Decode,
    Query,
}

/// Failure signalled by the connection collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatastoreError {
    pub kind: DatastoreErrorKind,
    pub message: String,
}

impl DatastoreError {
    pub fn new(kind: DatastoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::new(DatastoreErrorKind::DuplicateKey, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(DatastoreErrorKind::Connection, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(DatastoreErrorKind::Decode, message)
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::new(DatastoreErrorKind::Query, message)
    }
}

impl fmt::Display for DatastoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for DatastoreError {}

impl OrmError {
    /// Check if this is a duplicate-key failure reported by the connection
    pub fn is_duplicate_key(&self) -> bool {
        matches!(
            self,
            Self::Datastore(DatastoreError {
                kind: DatastoreErrorKind::DuplicateKey,
                ..
            })
        )
    }

    pub fn schema_mismatch(keys: Vec<String>, columns: &[String]) -> Self {
        Self::SchemaMismatch {
            keys,
            columns: columns.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_classification() {
        let dup: OrmError = DatastoreError::duplicate_key("Duplicate entry '1' for key 'PRIMARY'").into();
        assert!(dup.is_duplicate_key());

        let other: OrmError = DatastoreError::query("syntax error").into();
        assert!(!other.is_duplicate_key());
        assert!(!OrmError::EmptyValueList("status".to_string()).is_duplicate_key());
    }

    #[test]
    fn test_error_messages() {
        let err = OrmError::schema_mismatch(vec!["nope".to_string()], &["id".to_string()]);
        assert_eq!(err.to_string(), r#"Schema mismatch: ["nope"] not in ["id"]"#);
        assert_eq!(
            OrmError::MissingFilter("users".to_string()).to_string(),
            "Refusing to delete from `users` without a filter"
        );
    }
}
