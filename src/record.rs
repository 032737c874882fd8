//! Live records
//!
//! A [`Record`] holds one row of a model plus its dirty set: every column
//! assigned through [`Record::set`] since the last load or write.

use crate::connection::{Connection, Row};
use crate::model::Model;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use sql_builder::{Fields, OrmError, OrmResult, SqlGenerator, Statement};
use std::fmt;
use std::ops::Index;

static NULL: Value = Value::Null;

pub struct Record<C: Connection> {
    model: Model<C>,
    values: Fields,
    dirty: Fields,
}

impl<C: Connection> Record<C> {
    /// Wrap a fetched row; columns outside the model are dropped
    pub(crate) fn from_row(model: Model<C>, row: Row) -> Self {
        let values = row
            .into_iter()
            .filter(|(column, _)| model.descriptor().has_column(column))
            .collect();
        Self {
            model,
            values,
            dirty: Fields::new(),
        }
    }

    pub fn model(&self) -> &Model<C> {
        &self.model
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// The `id` column, when present and not NULL
    pub fn id(&self) -> Option<&Value> {
        self.values.get("id").filter(|id| !id.is_null())
    }

    pub fn values(&self) -> &Fields {
        &self.values
    }

    /// Assign a column and mark it dirty, even when the value is unchanged
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> OrmResult<()> {
        if !self.model.descriptor().has_column(column) {
            return Err(OrmError::schema_mismatch(
                vec![column.to_string()],
                self.model.descriptor().columns(),
            ));
        }
        let value = value.into();
        self.values.insert(column.to_string(), value.clone());
        self.dirty.insert(column.to_string(), value);
        Ok(())
    }

    pub fn dirty(&self) -> &Fields {
        &self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Forget pending assignments without writing them
    pub fn mark_clean(&mut self) {
        self.dirty.clear();
    }

    pub fn update_statement(&self, assignments: &Fields) -> OrmResult<Option<Statement>> {
        if assignments.is_empty() {
            return Ok(None);
        }
        let id = self
            .id()
            .ok_or_else(|| OrmError::MissingPrimaryKey(self.model.table().to_string()))?;
        SqlGenerator::update_record(self.model.descriptor(), assignments, id)
    }

    /// Write `assignments` to this record's row.
    ///
    /// Returns the affected-row count. Nothing is sent when `assignments` is
    /// empty. When a row was written the new values are applied and the
    /// dirty set is cleared; otherwise the record is left as it was.
    pub fn update(&mut self, assignments: Fields) -> OrmResult<u64> {
        let Some(statement) = self.update_statement(&assignments)? else {
            return Ok(0);
        };

        let affected = self.model.execute_rowcount(&statement)?;
        if affected > 0 {
            self.values.extend(assignments);
            self.dirty.clear();
        }
        Ok(affected)
    }

    /// Persist the dirty set. It is cleared whether or not the write succeeds.
    pub fn save(&mut self) -> OrmResult<u64> {
        let dirty = std::mem::take(&mut self.dirty);
        self.update(dirty)
    }

    /// Export as a JSON object, optionally only the named columns
    pub fn to_map(&self, fields: Option<&[&str]>) -> Map<String, Value> {
        self.values
            .iter()
            .filter(|(column, _)| fields.is_none_or(|names| names.contains(&column.as_str())))
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect()
    }
}

impl<C: Connection> Index<&str> for Record<C> {
    type Output = Value;

    fn index(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&NULL)
    }
}

impl<C: Connection> Serialize for Record<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<C: Connection> Clone for Record<C> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            values: self.values.clone(),
            dirty: self.dirty.clone(),
        }
    }
}

impl<C: Connection> fmt::Debug for Record<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("table", &self.model.table())
            .field("values", &self.values)
            .field("dirty", &self.dirty)
            .finish()
    }
}
