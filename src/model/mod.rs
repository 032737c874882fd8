//! Model handle
//!
//! A [`Model`] pairs a [`ModelDescriptor`] with the connection every
//! statement for that table goes through. Cloning is cheap.

mod mutation;
mod query;
mod transaction;

use crate::connection::{Connection, Row, RowIter};
use crate::record::Record;
use config::ModelSettings;
use sql_builder::{ModelDescriptor, OrmResult, Statement};
use std::fmt;
use std::sync::Arc;

/// Target of echoed statements
pub const SQL_LOG_TARGET: &str = "minorm::sql";

pub struct Model<C: Connection> {
    descriptor: Arc<ModelDescriptor>,
    conn: Arc<C>,
}

impl<C: Connection> Model<C> {
    pub fn new(descriptor: ModelDescriptor, conn: Arc<C>) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            conn,
        }
    }

    /// Build a model from its `[models.<name>]` settings
    pub fn from_settings(settings: &ModelSettings, conn: Arc<C>) -> OrmResult<Self> {
        let descriptor = ModelDescriptor::new(&settings.table, &settings.columns)?
            .with_per_page(settings.per_page)
            .with_echo(settings.echo);
        Ok(Self::new(descriptor, conn))
    }

    pub fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    pub fn table(&self) -> &str {
        self.descriptor.table()
    }

    pub fn connection(&self) -> &Arc<C> {
        &self.conn
    }

    pub(crate) fn record(&self, row: Row) -> Record<C> {
        Record::from_row(self.clone(), row)
    }

    fn log_statement(&self, statement: &Statement) {
        if self.descriptor.echo() {
            tracing::info!(
                target: SQL_LOG_TARGET,
                "{}",
                type_mapping::interpolate(&statement.sql, &statement.values)
            );
        } else {
            crate::debug_log!(
                table = self.descriptor.table(),
                sql = %statement.sql,
                params = statement.values.len(),
                "executing statement"
            );
        }
    }

    pub(crate) fn run_execute(&self, statement: &Statement) -> OrmResult<u64> {
        self.log_statement(statement);
        self.conn.execute(&statement.sql, &statement.values)
    }

    pub(crate) fn run_rowcount(&self, statement: &Statement) -> OrmResult<u64> {
        self.log_statement(statement);
        self.conn.execute_rowcount(&statement.sql, &statement.values)
    }

    pub(crate) fn run_get(&self, statement: &Statement) -> OrmResult<Option<Row>> {
        self.log_statement(statement);
        self.conn.get(&statement.sql, &statement.values)
    }

    pub(crate) fn run_query(&self, statement: &Statement) -> OrmResult<Vec<Row>> {
        self.log_statement(statement);
        self.conn.query(&statement.sql, &statement.values)
    }

    pub(crate) fn run_iter(&self, statement: &Statement) -> OrmResult<RowIter<'_>> {
        self.log_statement(statement);
        self.conn.iter(&statement.sql, &statement.values)
    }

    /// Run a previously built statement and return the generated id
    pub fn execute(&self, statement: &Statement) -> OrmResult<u64> {
        self.run_execute(statement)
    }

    /// Run a previously built statement and return the affected-row count
    pub fn execute_rowcount(&self, statement: &Statement) -> OrmResult<u64> {
        self.run_rowcount(statement)
    }
}

impl<C: Connection> Clone for Model<C> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            conn: Arc::clone(&self.conn),
        }
    }
}

impl<C: Connection> fmt::Debug for Model<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
