//! Serialization utilities
//!
//! This module renders `serde_json::Value`s as MySQL literals, used when
//! echoing generated SQL with its bound values in place.

use crate::sql::rewrite_placeholders;
use crate::types::SqlParam;
use serde_json::Value;

/// Classify a value for binding
pub fn to_sql_param(value: &Value) -> SqlParam {
    SqlParam::from(value)
}

/// Render a value as a MySQL literal
pub fn render_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        other => quote(&other.to_string()),
    }
}

/// Substitute bound values for the `%s` placeholders of a statement.
///
/// Placeholders without a matching value are left as `%s`.
pub fn interpolate(sql: &str, values: &[Value]) -> String {
    rewrite_placeholders(sql, |index| {
        values
            .get(index)
            .map(render_literal)
            .unwrap_or_else(|| "%s".to_string())
    })
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_literals() {
        assert_eq!(render_literal(&json!(null)), "NULL");
        assert_eq!(render_literal(&json!(true)), "1");
        assert_eq!(render_literal(&json!(42)), "42");
        assert_eq!(render_literal(&json!("it's")), "'it\\'s'");
        assert_eq!(render_literal(&json!([1, 2])), "'[1,2]'");
    }

    #[test]
    fn test_interpolate_statement() {
        let sql = "SELECT `id` FROM `t` WHERE (`name` = %s AND `type` > %s) LIMIT 1";
        assert_eq!(
            interpolate(sql, &[json!("test0"), json!(1)]),
            "SELECT `id` FROM `t` WHERE (`name` = 'test0' AND `type` > 1) LIMIT 1"
        );
    }

    #[test]
    fn test_interpolate_missing_values() {
        assert_eq!(interpolate("a = %s AND b = %s", &[json!(1)]), "a = 1 AND b = %s");
    }
}
