//! Keyword filter translation
//!
//! Turns `column__op = value` keyword mappings into a [`Predicate`].

use crate::errors::{OrmError, OrmResult};
use crate::predicate::{Fields, Predicate};
use crate::query_builder::clauses::column_ref;
use crate::validation::ValidatedFieldName;
use serde_json::Value;

/// Separator between a column name and its operator suffix
pub const OP_SEPARATOR: &str = "__";

/// Comparison operators selectable by key suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,   // no suffix
    Gt,   // __gt
    Lt,   // __lt
    Ge,   // __ge
    Le,   // __le
    Ne,   // __no
    Like, // __like
}

impl CompareOp {
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "gt" => Some(CompareOp::Gt),
            "lt" => Some(CompareOp::Lt),
            "ge" => Some(CompareOp::Ge),
            "le" => Some(CompareOp::Le),
            "no" => Some(CompareOp::Ne),
            "like" => Some(CompareOp::Like),
            _ => None,
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::Ne => "<>",
            CompareOp::Like => "LIKE",
        }
    }

    /// The value to bind for this operator; `LIKE` matches anywhere in the column
    pub fn bind_value(&self, value: &Value) -> Value {
        match (self, value) {
            (CompareOp::Like, Value::String(s)) => Value::String(format!("%{}%", s)),
            (CompareOp::Like, other) => Value::String(format!("%{}%", other)),
            (_, other) => other.clone(),
        }
    }
}

/// How the clauses of one predicate are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combiner {
    #[default]
    And,
    Or,
    /// SET list: keys are plain columns and values bind as-is
    Assign,
}

impl Combiner {
    pub fn to_sql(&self) -> &'static str {
        match self {
            Combiner::And => " AND ",
            Combiner::Or => " OR ",
            Combiner::Assign => ", ",
        }
    }
}

/// A filter key split into its column and operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterKey<'a> {
    pub column: &'a str,
    pub op: CompareOp,
}

impl<'a> FilterKey<'a> {
    /// Split `column__op`. Unknown suffixes leave the whole key as the column.
    pub fn parse(key: &'a str) -> Self {
        if let Some((column, suffix)) = key.rsplit_once(OP_SEPARATOR) {
            if !column.is_empty() {
                if let Some(op) = CompareOp::from_suffix(suffix) {
                    return Self { column, op };
                }
            }
        }
        Self {
            column: key,
            op: CompareOp::Eq,
        }
    }

    fn plain(key: &'a str) -> Self {
        Self {
            column: key,
            op: CompareOp::Eq,
        }
    }
}

/// Builds a [`Predicate`] from keyword filters.
///
/// Scalar filters render first, in key order, then one `(c = %s OR c = %s)`
/// group per multi-valued filter, then the caller's extra fragment. All of
/// them are joined with the same combiner. The result is parenthesized when
/// at least one scalar filter was rendered.
#[derive(Debug, Clone)]
pub struct PredicateBuilder<'a> {
    filters: &'a Fields,
    extra: Option<&'a Predicate>,
    columns: Option<&'a [String]>,
    table: Option<&'a str>,
    combiner: Combiner,
}

impl<'a> PredicateBuilder<'a> {
    pub fn new(filters: &'a Fields) -> Self {
        Self {
            filters,
            extra: None,
            columns: None,
            table: None,
            combiner: Combiner::And,
        }
    }

    /// Raw fragment appended after the keyword filters
    pub fn extra(mut self, extra: Option<&'a Predicate>) -> Self {
        self.extra = extra;
        self
    }

    /// Reject keys whose column is not in `columns`
    pub fn permitted(mut self, columns: &'a [String]) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Render column references as `` `table`.`column` ``
    pub fn qualify(mut self, table: &'a str) -> Self {
        self.table = Some(table);
        self
    }

    pub fn combiner(mut self, combiner: Combiner) -> Self {
        self.combiner = combiner;
        self
    }

    fn parse_key<'k>(&self, key: &'k str) -> FilterKey<'k> {
        match self.combiner {
            Combiner::Assign => FilterKey::plain(key),
            _ => FilterKey::parse(key),
        }
    }

    /// Without a permitted set every column must still be a plain identifier
    fn check_columns(&self) -> OrmResult<()> {
        let Some(columns) = self.columns else {
            for key in self.filters.keys() {
                ValidatedFieldName::new(self.parse_key(key).column)?;
            }
            return Ok(());
        };

        let unknown: Vec<String> = self
            .filters
            .keys()
            .filter(|key| {
                let column = self.parse_key(key).column;
                !columns.iter().any(|c| c == column)
            })
            .cloned()
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(OrmError::schema_mismatch(unknown, columns))
        }
    }

    pub fn build(&self) -> OrmResult<Predicate> {
        self.check_columns()?;

        let mut clauses = Vec::with_capacity(self.filters.len() + 1);
        let mut values = Vec::with_capacity(self.filters.len());
        let mut groups: Vec<Predicate> = Vec::new();

        for (key, value) in self.filters {
            let parsed = self.parse_key(key);
            let column = column_ref(parsed.column, self.table);

            let value = match value {
                Value::Array(items) if self.combiner != Combiner::Assign => match items.len() {
                    0 => return Err(OrmError::EmptyValueList(key.clone())),
                    1 => &items[0],
                    _ => {
                        let alternatives = vec![format!("{} = %s", column); items.len()];
                        groups.push(Predicate::new(
                            format!("({})", alternatives.join(" OR ")),
                            items.clone(),
                        ));
                        continue;
                    }
                },
                other => other,
            };

            clauses.push(format!("{} {} %s", column, parsed.op.to_sql()));
            values.push(parsed.op.bind_value(value));
        }

        let scalar_count = clauses.len();

        for group in groups {
            clauses.push(group.expr);
            values.extend(group.values);
        }

        if let Some(extra) = self.extra.filter(|e| !e.is_empty()) {
            clauses.push(extra.expr.clone());
            values.extend(extra.values.iter().cloned());
        }

        let joined = clauses.join(self.combiner.to_sql());
        let expr = if scalar_count > 0 {
            format!("({})", joined)
        } else {
            joined
        };

        Ok(Predicate::new(expr, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use serde_json::json;

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(FilterKey::parse("age__gt").op, CompareOp::Gt);
        assert_eq!(FilterKey::parse("age__gt").column, "age");
        assert_eq!(FilterKey::parse("age__no").op, CompareOp::Ne);
        assert_eq!(FilterKey::parse("name__like").op, CompareOp::Like);
        assert_eq!(FilterKey::parse("age").op, CompareOp::Eq);

        let unknown = FilterKey::parse("age__between");
        assert_eq!(unknown.column, "age__between");
        assert_eq!(unknown.op, CompareOp::Eq);

        let leading = FilterKey::parse("__gt");
        assert_eq!(leading.column, "__gt");
    }

    #[test]
    fn test_like_wraps_value() {
        assert_eq!(CompareOp::Like.bind_value(&json!("abc")), json!("%abc%"));
        assert_eq!(CompareOp::Like.bind_value(&json!(12)), json!("%12%"));
        assert_eq!(CompareOp::Gt.bind_value(&json!(12)), json!(12));
    }

    #[test]
    fn test_scalar_filters() {
        let filters = fields! { "name" => "a", "type__ge" => 2 };
        let p = PredicateBuilder::new(&filters).build().unwrap();
        assert_eq!(p.expr, "(`name` = %s AND `type` >= %s)");
        assert_eq!(p.values, vec![json!("a"), json!(2)]);
    }

    #[test]
    fn test_empty_filters() {
        let filters = fields!();
        let p = PredicateBuilder::new(&filters).build().unwrap();
        assert!(p.is_empty());
        assert!(p.values.is_empty());
    }

    #[test]
    fn test_unknown_column_rejected() {
        let columns = vec!["id".to_string(), "name".to_string()];
        let filters = fields! { "name__like" => "x", "colour" => "red", "size__gt" => 3 };
        let err = PredicateBuilder::new(&filters)
            .permitted(&columns)
            .build()
            .unwrap_err();

        match err {
            OrmError::SchemaMismatch { keys, .. } => {
                assert_eq!(keys, vec!["colour".to_string(), "size__gt".to_string()]);
            }
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_unchecked_keys_must_be_identifiers() {
        let filters = fields! { "a` = 0 OR 1=1 -- " => 1 };
        let err = PredicateBuilder::new(&filters)
            .combiner(Combiner::Or)
            .build()
            .unwrap_err();
        assert!(matches!(err, OrmError::Validation(_)));

        let assignments = fields! { "name`=1, `type" => 2 };
        let err = PredicateBuilder::new(&assignments)
            .combiner(Combiner::Assign)
            .build()
            .unwrap_err();
        assert!(matches!(err, OrmError::Validation(_)));
    }

    #[test]
    fn test_assign_mode_keeps_keys_and_arrays() {
        let assignments = fields! { "tags" => ["a", "b"], "name" => "x" };
        let p = PredicateBuilder::new(&assignments)
            .combiner(Combiner::Assign)
            .build()
            .unwrap();
        assert_eq!(p.expr, "(`tags` = %s, `name` = %s)");
        assert_eq!(p.values, vec![json!(["a", "b"]), json!("x")]);
    }
}
