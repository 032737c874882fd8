//! Query builder
//!
//! Collects everything a read needs besides the model itself.

use crate::predicate::{Fields, Predicate};
use crate::query_builder::join::JoinDescriptor;
use serde_json::Value;

/// Which columns a SELECT returns
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    /// Every column of the model; results become records
    #[default]
    Model,
    /// Explicit columns; results stay raw rows
    Columns(Vec<String>),
    /// Literal select list such as `items.*`; results stay raw rows
    Raw(String),
}

impl Selection {
    pub fn is_model(&self) -> bool {
        matches!(self, Selection::Model)
    }
}

/// Query builder for reads against one model
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pub(crate) filters: Fields,
    pub(crate) extra: Option<Predicate>,
    pub(crate) join: Option<JoinDescriptor>,
    pub(crate) selection: Selection,
    pub(crate) order_by: Option<String>,
    pub(crate) limit: Option<u64>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one keyword filter, e.g. `filter("type__gt", 1)`
    pub fn filter(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.filters.insert(key.to_string(), value.into());
        self
    }

    /// Add several keyword filters
    pub fn filters(mut self, filters: Fields) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Raw predicate (usually from `or_`/`and_`) appended after the filters
    pub fn extra(mut self, extra: Predicate) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn join(mut self, join: JoinDescriptor) -> Self {
        self.join = Some(join);
        self
    }

    /// Return raw rows with only these columns
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = Selection::Columns(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the selection outright
    pub fn select(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Return raw rows using a literal select list
    pub fn raw_columns(mut self, select: &str) -> Self {
        self.selection = Selection::Raw(select.to_string());
        self
    }

    /// ORDER BY expression, passed through as written
    pub fn order_by(mut self, order_by: &str) -> Self {
        self.order_by = Some(order_by.to_string());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether results should be built into records
    pub fn returns_records(&self) -> bool {
        self.selection.is_model()
    }

    pub fn filter_fields(&self) -> &Fields {
        &self.filters
    }

    pub fn join_descriptor(&self) -> Option<&JoinDescriptor> {
        self.join.as_ref()
    }
}
