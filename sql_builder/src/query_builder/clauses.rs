//! Clause helpers
//!
//! Thin combinators over [`PredicateBuilder`] for the common shapes.

use crate::errors::OrmResult;
use crate::predicate::{Fields, Predicate};
use crate::query_builder::filter::{Combiner, PredicateBuilder};
use crate::query_builder::join::JoinDescriptor;

/// `` `name` ``, with embedded backticks doubled
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// `` `column` `` or `` `table`.`column` ``
pub fn column_ref(column: &str, table: Option<&str>) -> String {
    match table {
        Some(table) => format!("{}.{}", quote_ident(table), quote_ident(column)),
        None => quote_ident(column),
    }
}

/// Comma-separated column list, optionally qualified by table
pub fn columns_sql<S: AsRef<str>>(columns: &[S], table: Option<&str>) -> String {
    columns
        .iter()
        .map(|c| column_ref(c.as_ref(), table))
        .collect::<Vec<_>>()
        .join(",")
}

/// Filters joined with `AND`, followed by `extra`
pub fn and_(filters: &Fields, extra: Option<&Predicate>) -> OrmResult<Predicate> {
    PredicateBuilder::new(filters).extra(extra).build()
}

/// Filters joined with `OR`, followed by `extra`
pub fn or_(filters: &Fields, extra: Option<&Predicate>) -> OrmResult<Predicate> {
    PredicateBuilder::new(filters)
        .extra(extra)
        .combiner(Combiner::Or)
        .build()
}

/// Alias of [`and_`] for top-level WHERE conditions
pub fn where_(filters: &Fields, extra: Option<&Predicate>) -> OrmResult<Predicate> {
    and_(filters, extra)
}

/// Assignment list for `UPDATE … SET`
pub fn set_(assignments: &Fields) -> OrmResult<Predicate> {
    PredicateBuilder::new(assignments)
        .combiner(Combiner::Assign)
        .build()
}

/// `INNER JOIN` on `table` with filters scoped to the joined table
pub fn join_(table: &str, on: &str, filters: &Fields) -> OrmResult<JoinDescriptor> {
    JoinDescriptor::inner(table, on, filters)
}
