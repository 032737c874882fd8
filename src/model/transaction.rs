//! Transaction passthrough
//!
//! Literal statements on the model's connection. No nesting, and nothing
//! rolls back on its own.

use super::Model;
use crate::connection::Connection;
use sql_builder::{OrmResult, Statement};

impl<C: Connection> Model<C> {
    pub fn begin(&self) -> OrmResult<()> {
        self.run_execute(&Statement::new("BEGIN", Vec::new()))?;
        Ok(())
    }

    pub fn commit(&self) -> OrmResult<()> {
        self.run_execute(&Statement::new("COMMIT", Vec::new()))?;
        Ok(())
    }

    pub fn rollback(&self) -> OrmResult<()> {
        self.run_execute(&Statement::new("ROLLBACK", Vec::new()))?;
        Ok(())
    }
}
