//! Connection capability
//!
//! The five execution modes a datastore connection must provide. Models only
//! ever talk to the database through this trait.

use serde_json::Value;
use sql_builder::{Fields, OrmResult};
use std::sync::Arc;

/// One result row, column name to value in select order
pub type Row = Fields;

/// Lazily produced rows
pub type RowIter<'a> = Box<dyn Iterator<Item = OrmResult<Row>> + 'a>;

/// Blocking request/response channel to the datastore.
///
/// `sql` uses `%s` positional placeholders, one per entry of `values`.
/// Failures are reported as `OrmError::Datastore`, with unique-key
/// violations classified as `DatastoreErrorKind::DuplicateKey`.
pub trait Connection: Send + Sync {
    /// Execute and return the last generated id (0 when none)
    fn execute(&self, sql: &str, values: &[Value]) -> OrmResult<u64>;

    /// Execute and return the affected-row count
    fn execute_rowcount(&self, sql: &str, values: &[Value]) -> OrmResult<u64>;

    /// First row, if any
    fn get(&self, sql: &str, values: &[Value]) -> OrmResult<Option<Row>>;

    /// Every row
    fn query(&self, sql: &str, values: &[Value]) -> OrmResult<Vec<Row>>;

    /// Rows one at a time
    fn iter<'a>(&'a self, sql: &str, values: &[Value]) -> OrmResult<RowIter<'a>>;
}

macro_rules! forward_connection {
    ($($ty:ty),+) => {
        $(
            impl<C: Connection + ?Sized> Connection for $ty {
                fn execute(&self, sql: &str, values: &[Value]) -> OrmResult<u64> {
                    (**self).execute(sql, values)
                }

                fn execute_rowcount(&self, sql: &str, values: &[Value]) -> OrmResult<u64> {
                    (**self).execute_rowcount(sql, values)
                }

                fn get(&self, sql: &str, values: &[Value]) -> OrmResult<Option<Row>> {
                    (**self).get(sql, values)
                }

                fn query(&self, sql: &str, values: &[Value]) -> OrmResult<Vec<Row>> {
                    (**self).query(sql, values)
                }

                fn iter<'a>(&'a self, sql: &str, values: &[Value]) -> OrmResult<RowIter<'a>> {
                    (**self).iter(sql, values)
                }
            }
        )+
    };
}

forward_connection!(Arc<C>, Box<C>, &C);
