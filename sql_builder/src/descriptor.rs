//! Model descriptor
//!
//! Static metadata for one table: its name, permitted columns, default page
//! size and whether statements are echoed.

use crate::validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

/// Page size used when neither the caller nor the settings give one
pub const DEFAULT_PER_PAGE: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    table: ValidatedTableName,
    columns: Vec<String>,
    per_page: u64,
    echo: bool,
}

impl ModelDescriptor {
    /// Validate the table and every column name
    pub fn new<I, S>(table: &str, columns: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let table = ValidatedTableName::new(table)?;

        let mut validated: Vec<String> = Vec::new();
        for column in columns {
            let column = ValidatedFieldName::new(column.as_ref())?.into_string();
            if validated.contains(&column) {
                return Err(ValidationError::DuplicateColumn(column));
            }
            validated.push(column);
        }

        Ok(Self {
            table,
            columns: validated,
            per_page: DEFAULT_PER_PAGE,
            echo: false,
        })
    }

    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn table(&self) -> &str {
        self.table.as_str()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn echo(&self) -> bool {
        self.echo
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults() {
        let desc = ModelDescriptor::new("test_orm", ["id", "name", "content", "type"]).unwrap();
        assert_eq!(desc.table(), "test_orm");
        assert_eq!(desc.columns().len(), 4);
        assert_eq!(desc.per_page(), DEFAULT_PER_PAGE);
        assert!(!desc.echo());
        assert!(desc.has_column("type"));
        assert!(!desc.has_column("colour"));
    }

    #[test]
    fn test_descriptor_rejects_bad_columns() {
        assert_eq!(
            ModelDescriptor::new("t", ["id", "id"]),
            Err(ValidationError::DuplicateColumn("id".to_string()))
        );
        assert!(ModelDescriptor::new("t", ["id", "name-x"]).is_err());
        assert!(ModelDescriptor::new("bad table", ["id"]).is_err());
    }
}
