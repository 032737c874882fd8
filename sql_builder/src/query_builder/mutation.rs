//! INSERT, UPDATE and DELETE generation

use crate::descriptor::ModelDescriptor;
use crate::errors::{OrmError, OrmResult};
use crate::predicate::{Fields, Predicate, Statement};
use crate::query_builder::clauses::{columns_sql, quote_ident};
use crate::query_builder::filter::{Combiner, PredicateBuilder};
use crate::query_builder::sql_generation::SqlGenerator;
use serde_json::Value;

/// `(%s,%s,…)` with `n` placeholders
fn placeholders(n: usize) -> String {
    format!("({})", vec!["%s"; n].join(","))
}

impl SqlGenerator {
    fn ensure_columns<'a, I>(desc: &ModelDescriptor, keys: I) -> OrmResult<()>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let unknown: Vec<String> = keys
            .into_iter()
            .filter(|key| !desc.has_column(key))
            .cloned()
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(OrmError::schema_mismatch(unknown, desc.columns()))
        }
    }

    /// Plain SET list, never parenthesized
    fn set_list(desc: &ModelDescriptor, assignments: &Fields) -> OrmResult<Predicate> {
        Ok(PredicateBuilder::new(assignments)
            .permitted(desc.columns())
            .combiner(Combiner::Assign)
            .build()?
            .strip_parens())
    }

    fn filter_predicate(
        desc: &ModelDescriptor,
        filters: &Fields,
        extra: Option<&Predicate>,
    ) -> OrmResult<Predicate> {
        PredicateBuilder::new(filters)
            .permitted(desc.columns())
            .extra(extra)
            .build()
    }

    /// `INSERT INTO `t` (`a`,`b`) VALUES (%s,%s)`
    pub fn insert(desc: &ModelDescriptor, values: &Fields) -> OrmResult<Statement> {
        if values.is_empty() {
            return Err(OrmError::EmptyValues(format!("insert into `{}`", desc.table())));
        }
        Self::ensure_columns(desc, values.keys())?;

        let columns: Vec<&str> = values.keys().map(String::as_str).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            quote_ident(desc.table()),
            columns_sql(&columns, None),
            placeholders(columns.len())
        );
        Ok(Statement::new(sql, values.values().cloned().collect()))
    }

    /// One multi-row INSERT. Every record must carry exactly the first
    /// record's keys; values bind in the first record's key order.
    pub fn insert_many(desc: &ModelDescriptor, records: &[Fields]) -> OrmResult<Option<Statement>> {
        let Some(first) = records.first() else {
            return Ok(None);
        };
        if first.is_empty() {
            return Err(OrmError::EmptyValues(format!("insert into `{}`", desc.table())));
        }
        Self::ensure_columns(desc, first.keys())?;

        let columns: Vec<&str> = first.keys().map(String::as_str).collect();
        let mut values = Vec::with_capacity(columns.len() * records.len());

        for (index, record) in records.iter().enumerate() {
            let same_shape =
                record.len() == columns.len() && columns.iter().all(|c| record.contains_key(*c));
            if !same_shape {
                return Err(OrmError::ShapeMismatch {
                    index,
                    expected: first.keys().cloned().collect(),
                    found: record.keys().cloned().collect(),
                });
            }
            values.extend(columns.iter().map(|c| record[*c].clone()));
        }

        let tuples = vec![placeholders(columns.len()); records.len()].join(",");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            quote_ident(desc.table()),
            columns_sql(&columns, None),
            tuples
        );
        Ok(Some(Statement::new(sql, values)))
    }

    /// `UPDATE `t` SET … [WHERE …]`; `None` when there is nothing to assign
    pub fn update(
        desc: &ModelDescriptor,
        assignments: &Fields,
        filters: &Fields,
        extra: Option<&Predicate>,
    ) -> OrmResult<Option<Statement>> {
        if assignments.is_empty() {
            return Ok(None);
        }
        let sets = Self::set_list(desc, assignments)?;
        let predicate = Self::filter_predicate(desc, filters, extra)?;

        let sql = format!(
            "UPDATE {} SET {}{}",
            quote_ident(desc.table()),
            sets.expr,
            Self::build_where_clause(&predicate)
        );
        let mut values = sets.values;
        values.extend(predicate.values);
        Ok(Some(Statement::new(sql, values)))
    }

    /// Row-locking SELECT followed by the UPDATE, as one compound statement.
    ///
    /// Values bind as filter values, assignment values, then filter values again.
    pub fn update_locked(
        desc: &ModelDescriptor,
        assignments: &Fields,
        filters: &Fields,
        extra: Option<&Predicate>,
    ) -> OrmResult<Option<Statement>> {
        if assignments.is_empty() {
            return Ok(None);
        }
        let sets = Self::set_list(desc, assignments)?;
        let predicate = Self::filter_predicate(desc, filters, extra)?;
        let table = quote_ident(desc.table());
        let where_clause = Self::build_where_clause(&predicate);

        let sql = format!(
            "SELECT `id` FROM {table}{where_clause} FOR UPDATE;UPDATE {table} SET {}{where_clause}",
            sets.expr
        );

        let mut values = predicate.values.clone();
        values.extend(sets.values);
        values.extend(predicate.values);
        Ok(Some(Statement::new(sql, values)))
    }

    /// `DELETE FROM `t` WHERE …`. An empty predicate is refused.
    pub fn delete(
        desc: &ModelDescriptor,
        filters: &Fields,
        extra: Option<&Predicate>,
    ) -> OrmResult<Statement> {
        let predicate = Self::filter_predicate(desc, filters, extra)?;
        if predicate.is_empty() {
            return Err(OrmError::MissingFilter(desc.table().to_string()));
        }
        Ok(Statement::new(
            format!("DELETE FROM {} WHERE {}", quote_ident(desc.table()), predicate.expr),
            predicate.values,
        ))
    }

    /// Instance update keyed on `id`; `None` when there is nothing to assign
    pub fn update_record(
        desc: &ModelDescriptor,
        assignments: &Fields,
        id: &Value,
    ) -> OrmResult<Option<Statement>> {
        if assignments.is_empty() {
            return Ok(None);
        }
        let sets = Self::set_list(desc, assignments)?;

        let sql = format!(
            "UPDATE {} SET {} WHERE `id` = %s",
            quote_ident(desc.table()),
            sets.expr
        );
        let mut values = sets.values;
        values.push(id.clone());
        Ok(Some(Statement::new(sql, values)))
    }
}
