//! Writes: insert, update, locked update, delete

use super::Model;
use crate::connection::Connection;
use crate::record::Record;
use serde_json::Value;
use sql_builder::{Fields, OrmError, OrmResult, Predicate, QueryBuilder, SqlGenerator, Statement};

/// Attempts made for one insert before giving up on duplicate keys
pub const INSERT_ATTEMPTS: u32 = 3;

impl<C: Connection> Model<C> {
    pub fn create_statement(&self, values: &Fields) -> OrmResult<Statement> {
        SqlGenerator::insert(self.descriptor(), values)
    }

    /// Insert one row and reload it.
    ///
    /// Duplicate-key failures are retried up to [`INSERT_ATTEMPTS`] times in
    /// total; any other failure returns immediately. The row is reloaded by
    /// the caller's `id` when one was given, else by the generated id.
    pub fn create(&self, values: Fields) -> OrmResult<Record<C>> {
        let statement = self.create_statement(&values)?;

        let mut attempt = 0;
        let generated = loop {
            attempt += 1;
            match self.run_execute(&statement) {
                Ok(id) => break id,
                Err(e) if e.is_duplicate_key() => {
                    tracing::warn!(
                        table = self.table(),
                        attempt,
                        error = %e,
                        "duplicate key on insert"
                    );
                    if attempt >= INSERT_ATTEMPTS {
                        return Err(OrmError::DuplicateKey {
                            table: self.table().to_string(),
                            attempts: attempt,
                            message: e.to_string(),
                        });
                    }
                }
                Err(e) => return Err(e),
            }
        };

        let id = match values.get("id") {
            Some(id) if !id.is_null() => id.clone(),
            _ => Value::from(generated),
        };

        self.get(&QueryBuilder::new().filter("id", id.clone()))?
            .ok_or_else(|| {
                OrmError::NotFound(format!("`{}` row with id {} after insert", self.table(), id))
            })
    }

    pub fn insert_many_statement(&self, records: &[Fields]) -> OrmResult<Option<Statement>> {
        SqlGenerator::insert_many(self.descriptor(), records)
    }

    /// One multi-row INSERT; `None` for an empty batch, else the id the
    /// connection reports for it
    pub fn insert_many(&self, records: &[Fields]) -> OrmResult<Option<u64>> {
        let Some(statement) = self.insert_many_statement(records)? else {
            return Ok(None);
        };
        match self.run_execute(&statement) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                tracing::error!(
                    table = self.table(),
                    records = records.len(),
                    error = %e,
                    "multi-row insert failed"
                );
                Err(e)
            }
        }
    }

    pub fn update_statement(
        &self,
        assignments: &Fields,
        filters: &Fields,
        extra: Option<&Predicate>,
    ) -> OrmResult<Option<Statement>> {
        SqlGenerator::update(self.descriptor(), assignments, filters, extra)
    }

    /// Affected-row count; 0 without a statement when nothing is assigned
    pub fn update_where(
        &self,
        assignments: &Fields,
        filters: &Fields,
        extra: Option<&Predicate>,
    ) -> OrmResult<u64> {
        match self.update_statement(assignments, filters, extra)? {
            Some(statement) => self.run_rowcount(&statement),
            None => Ok(0),
        }
    }

    pub fn update_locked_statement(
        &self,
        assignments: &Fields,
        filters: &Fields,
        extra: Option<&Predicate>,
    ) -> OrmResult<Option<Statement>> {
        SqlGenerator::update_locked(self.descriptor(), assignments, filters, extra)
    }

    /// `SELECT … FOR UPDATE` then `UPDATE`, sent as one call
    pub fn update_where_locked(
        &self,
        assignments: &Fields,
        filters: &Fields,
        extra: Option<&Predicate>,
    ) -> OrmResult<u64> {
        match self.update_locked_statement(assignments, filters, extra)? {
            Some(statement) => self.run_rowcount(&statement),
            None => Ok(0),
        }
    }

    pub fn delete_statement(
        &self,
        filters: &Fields,
        extra: Option<&Predicate>,
    ) -> OrmResult<Statement> {
        SqlGenerator::delete(self.descriptor(), filters, extra)
    }

    /// Affected-row count. An empty filter is refused; pass
    /// `Predicate::raw("1=1")` to clear the table.
    pub fn delete_where(&self, filters: &Fields, extra: Option<&Predicate>) -> OrmResult<u64> {
        let statement = self.delete_statement(filters, extra)?;
        self.run_rowcount(&statement)
    }
}
