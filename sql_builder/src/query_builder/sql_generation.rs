//! SELECT generation
//!
//! Every generator returns a [`Statement`] whose values line up with its
//! `%s` placeholders.

use crate::descriptor::ModelDescriptor;
use crate::errors::OrmResult;
use crate::predicate::{Predicate, Statement};
use crate::query_builder::builder::{QueryBuilder, Selection};
use crate::query_builder::clauses::{column_ref, columns_sql, quote_ident};
use crate::query_builder::filter::PredicateBuilder;
use crate::query_builder::pagination::Pagination;
use serde_json::Value;

pub struct SqlGenerator;

impl SqlGenerator {
    /// Base table qualifier, only needed once a join is in play
    fn qualifier<'a>(desc: &'a ModelDescriptor, query: &QueryBuilder) -> Option<&'a str> {
        query.join.as_ref().map(|_| desc.table())
    }

    /// WHERE predicate: the model's filters, then the join's filters with AND
    pub fn where_predicate(desc: &ModelDescriptor, query: &QueryBuilder) -> OrmResult<Predicate> {
        let mut builder = PredicateBuilder::new(&query.filters)
            .permitted(desc.columns())
            .extra(query.extra.as_ref());
        if let Some(table) = Self::qualifier(desc, query) {
            builder = builder.qualify(table);
        }
        let predicate = builder.build()?;

        Ok(match &query.join {
            Some(join) => predicate.and_also(&join.predicate),
            None => predicate,
        })
    }

    pub fn build_where_clause(predicate: &Predicate) -> String {
        if predicate.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", predicate.expr)
        }
    }

    pub fn build_order_clause(order_by: Option<&str>) -> String {
        match order_by {
            Some(order) if !order.trim().is_empty() => format!(" ORDER BY {}", order),
            _ => String::new(),
        }
    }

    pub fn build_limit_clause(limit: Option<u64>) -> String {
        limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default()
    }

    fn select_list(desc: &ModelDescriptor, selection: &Selection, table: Option<&str>) -> String {
        match selection {
            Selection::Model => columns_sql(desc.columns(), table),
            Selection::Columns(columns) => columns_sql(columns, table),
            Selection::Raw(raw) => raw.clone(),
        }
    }

    /// `FROM `t` [INNER JOIN …] [WHERE …]` and its values
    fn from_where(desc: &ModelDescriptor, query: &QueryBuilder) -> OrmResult<(String, Vec<Value>)> {
        let predicate = Self::where_predicate(desc, query)?;
        let join = query
            .join
            .as_ref()
            .map(|j| format!(" {}", j.clause))
            .unwrap_or_default();

        let sql = format!(
            "FROM {}{}{}",
            quote_ident(desc.table()),
            join,
            Self::build_where_clause(&predicate)
        );
        Ok((sql, predicate.values))
    }

    fn select_with(desc: &ModelDescriptor, query: &QueryBuilder, tail: &str) -> OrmResult<Statement> {
        let fields = Self::select_list(desc, &query.selection, Self::qualifier(desc, query));
        let (from, values) = Self::from_where(desc, query)?;

        let sql = format!(
            "SELECT {} {}{}{}",
            fields,
            from,
            Self::build_order_clause(query.order_by.as_deref()),
            tail
        );
        Ok(Statement::new(sql, values))
    }

    /// Multi-row SELECT honouring the query's own limit
    pub fn select(desc: &ModelDescriptor, query: &QueryBuilder) -> OrmResult<Statement> {
        Self::select_with(desc, query, &Self::build_limit_clause(query.limit))
    }

    /// Single-row SELECT
    pub fn select_one(desc: &ModelDescriptor, query: &QueryBuilder) -> OrmResult<Statement> {
        Self::select_with(desc, query, &Self::build_limit_clause(Some(1)))
    }

    /// SELECT for one page; the query's own limit is ignored
    pub fn page(
        desc: &ModelDescriptor,
        query: &QueryBuilder,
        pagination: Pagination,
    ) -> OrmResult<Statement> {
        Self::select_with(desc, query, &format!(" {}", pagination.to_sql()))
    }

    /// `SELECT COUNT(*) AS total …`
    pub fn count(desc: &ModelDescriptor, query: &QueryBuilder) -> OrmResult<Statement> {
        let (from, values) = Self::from_where(desc, query)?;
        Ok(Statement::new(
            format!("SELECT COUNT(*) AS total {}", from),
            values,
        ))
    }

    /// `SELECT `id` … LIMIT 1`
    pub fn exists(desc: &ModelDescriptor, query: &QueryBuilder) -> OrmResult<Statement> {
        let id = column_ref("id", Self::qualifier(desc, query));
        let (from, values) = Self::from_where(desc, query)?;
        Ok(Statement::new(format!("SELECT {} {} LIMIT 1", id, from), values))
    }

    /// Full-table scan without WHERE
    pub fn scan(
        desc: &ModelDescriptor,
        selection: &Selection,
        order_by: Option<&str>,
        limit: Option<u64>,
    ) -> Statement {
        let sql = format!(
            "SELECT {} FROM {}{}{}",
            Self::select_list(desc, selection, None),
            quote_ident(desc.table()),
            Self::build_order_clause(order_by),
            Self::build_limit_clause(limit)
        );
        Statement::new(sql, Vec::new())
    }
}
