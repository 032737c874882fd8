//! Predicates and statements
//!
//! A [`Predicate`] is a SQL fragment paired with the values for its `%s`
//! placeholders. Fragments only ever combine together with their values, so
//! the n-th placeholder always reads the n-th value.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Ordered keyword arguments: column (optionally `column__op`) to value
pub type Fields = IndexMap<String, Value>;

/// Build a [`Fields`] mapping, keeping insertion order.
///
/// ```
/// use sql_builder::fields;
///
/// let filters = fields! { "name" => "test0", "type__gt" => 1 };
/// assert_eq!(filters.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            fields.insert(::std::string::String::from($key), $crate::serde_json::json!($value));
        )+
        fields
    }};
}

/// SQL boolean or assignment fragment with its bound values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Predicate {
    pub expr: String,
    pub values: Vec<Value>,
}

impl Predicate {
    pub fn new(expr: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            expr: expr.into(),
            values,
        }
    }

    /// A literal fragment without parameters, e.g. `"1=1"`
    pub fn raw(expr: impl Into<String>) -> Self {
        Self::new(expr, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.expr.trim().is_empty()
    }

    /// `%s` placeholders outside quoted text, counted the way connections bind them
    pub fn placeholder_count(&self) -> usize {
        type_mapping::count_placeholders(&self.expr)
    }

    /// Append `other` with `AND`, keeping value order. Empty sides vanish.
    pub fn and_also(mut self, other: &Predicate) -> Self {
        if other.is_empty() {
            return self;
        }
        if !self.is_empty() {
            self.expr.push_str(" AND ");
        }
        self.expr.push_str(&other.expr);
        self.values.extend(other.values.iter().cloned());
        self
    }

    /// Drop one pair of parentheses enclosing the whole fragment.
    ///
    /// SET lists must not be parenthesized.
    pub fn strip_parens(mut self) -> Self {
        let trimmed = self.expr.trim();
        if trimmed.starts_with('(') && trimmed.ends_with(')') && encloses_whole(trimmed) {
            self.expr = trimmed[1..trimmed.len() - 1].trim().to_string();
        }
        self
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

/// Whether the opening parenthesis at 0 closes at the last character
fn encloses_whole(expr: &str) -> bool {
    let mut depth = 0usize;
    let last = expr.len() - 1;
    for (i, c) in expr.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && i != last {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// A complete statement ready for a connection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statement {
    pub sql: String,
    pub values: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            values,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}
