use crate::errors::OrmResult;
use crate::predicate::{Fields, Predicate};
use crate::query_builder::clauses::quote_ident;
use crate::query_builder::filter::PredicateBuilder;
use crate::validation::ValidatedTableName;

/// One optional `INNER JOIN` plus filters on the joined table.
///
/// The join's own predicate is always ANDed onto the base table's filters.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinDescriptor {
    table: ValidatedTableName,
    /// `INNER JOIN `table` ON <on>`
    pub clause: String,
    /// Conditions qualified with the joined table
    pub predicate: Predicate,
}

impl JoinDescriptor {
    /// Join `table` using a caller-supplied ON expression, e.g.
    /// `"items.id = topic_item.item_id"`
    pub fn inner(table: &str, on: &str, filters: &Fields) -> OrmResult<Self> {
        let table = ValidatedTableName::new(table)?;
        let predicate = PredicateBuilder::new(filters)
            .qualify(table.as_str())
            .build()?;

        Ok(Self {
            clause: format!("INNER JOIN {} ON {}", quote_ident(table.as_str()), on),
            table,
            predicate,
        })
    }

    /// Name of the joined table
    pub fn table(&self) -> &str {
        self.table.as_str()
    }
}
