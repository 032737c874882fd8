//! Reads: get, find, iterate, scan, paginate, count

use super::Model;
use crate::connection::{Connection, Row, RowIter};
use crate::record::Record;
use serde_json::Value;
use sql_builder::{OrmResult, Pagination, QueryBuilder, Selection, SqlGenerator, Statement};
use std::borrow::Cow;

/// Record reads always select every model column
fn model_query(query: &QueryBuilder) -> Cow<'_, QueryBuilder> {
    if query.returns_records() {
        Cow::Borrowed(query)
    } else {
        Cow::Owned(query.clone().select(Selection::Model))
    }
}

impl<C: Connection> Model<C> {
    pub fn get_statement(&self, query: &QueryBuilder) -> OrmResult<Statement> {
        SqlGenerator::select_one(self.descriptor(), query)
    }

    /// First matching record, or `None`
    pub fn get(&self, query: &QueryBuilder) -> OrmResult<Option<Record<C>>> {
        let statement = self.get_statement(&model_query(query))?;
        Ok(self.run_get(&statement)?.map(|row| self.record(row)))
    }

    /// First matching row using the query's own selection
    pub fn get_row(&self, query: &QueryBuilder) -> OrmResult<Option<Row>> {
        let statement = self.get_statement(query)?;
        self.run_get(&statement)
    }

    /// Whether any row matches
    pub fn exists(&self, query: &QueryBuilder) -> OrmResult<bool> {
        let statement = SqlGenerator::exists(self.descriptor(), query)?;
        Ok(self.run_get(&statement)?.is_some())
    }

    pub fn find_statement(&self, query: &QueryBuilder) -> OrmResult<Statement> {
        SqlGenerator::select(self.descriptor(), query)
    }

    pub fn find(&self, query: &QueryBuilder) -> OrmResult<Vec<Record<C>>> {
        let statement = self.find_statement(&model_query(query))?;
        let rows = self.run_query(&statement)?;
        Ok(rows.into_iter().map(|row| self.record(row)).collect())
    }

    pub fn find_rows(&self, query: &QueryBuilder) -> OrmResult<Vec<Row>> {
        let statement = self.find_statement(query)?;
        self.run_query(&statement)
    }

    /// Records produced as the connection yields rows
    pub fn find_iter(
        &self,
        query: &QueryBuilder,
    ) -> OrmResult<Box<dyn Iterator<Item = OrmResult<Record<C>>> + '_>> {
        let statement = self.find_statement(&model_query(query))?;
        let rows = self.run_iter(&statement)?;
        Ok(Box::new(rows.map(move |row| row.map(|row| self.record(row)))))
    }

    pub fn iter_rows(&self, query: &QueryBuilder) -> OrmResult<RowIter<'_>> {
        let statement = self.find_statement(query)?;
        self.run_iter(&statement)
    }

    pub fn all_statement(
        &self,
        selection: &Selection,
        order_by: Option<&str>,
        limit: Option<u64>,
    ) -> Statement {
        SqlGenerator::scan(self.descriptor(), selection, order_by, limit)
    }

    /// Every record of the table
    pub fn all(&self, order_by: Option<&str>, limit: Option<u64>) -> OrmResult<Vec<Record<C>>> {
        let statement = self.all_statement(&Selection::Model, order_by, limit);
        let rows = self.run_query(&statement)?;
        Ok(rows.into_iter().map(|row| self.record(row)).collect())
    }

    pub fn all_rows(
        &self,
        selection: &Selection,
        order_by: Option<&str>,
        limit: Option<u64>,
    ) -> OrmResult<Vec<Row>> {
        let statement = self.all_statement(selection, order_by, limit);
        self.run_query(&statement)
    }

    /// `page` is one-based; `per_page` falls back to the model default
    pub fn page_statement(
        &self,
        page: i64,
        per_page: Option<u64>,
        query: &QueryBuilder,
    ) -> OrmResult<Statement> {
        let pagination = Pagination::new(page, per_page.unwrap_or(self.descriptor().per_page()));
        SqlGenerator::page(self.descriptor(), query, pagination)
    }

    pub fn page(
        &self,
        page: i64,
        per_page: Option<u64>,
        query: &QueryBuilder,
    ) -> OrmResult<Vec<Record<C>>> {
        let statement = self.page_statement(page, per_page, &model_query(query))?;
        let rows = self.run_query(&statement)?;
        Ok(rows.into_iter().map(|row| self.record(row)).collect())
    }

    pub fn page_rows(
        &self,
        page: i64,
        per_page: Option<u64>,
        query: &QueryBuilder,
    ) -> OrmResult<Vec<Row>> {
        let statement = self.page_statement(page, per_page, query)?;
        self.run_query(&statement)
    }

    pub fn count_statement(&self, query: &QueryBuilder) -> OrmResult<Statement> {
        SqlGenerator::count(self.descriptor(), query)
    }

    /// Number of matching rows; 0 when the result set is empty
    pub fn count(&self, query: &QueryBuilder) -> OrmResult<u64> {
        let statement = self.count_statement(query)?;
        let rows = self.run_query(&statement)?;
        Ok(rows
            .first()
            .and_then(|row| row.get("total"))
            .map(count_value)
            .unwrap_or(0))
    }
}

fn count_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|i| i.max(0) as u64))
            .unwrap_or(0),
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}
