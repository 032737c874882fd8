//! SQL text conversion utilities
//!
//! This module handles the `%s` placeholder dialect and the mapping of
//! MySQL column type names to decoding classes.

use crate::types::ColumnKind;

/// Rewrite every `%s` placeholder outside quoted regions with `f(index)`.
///
/// `%%` outside quotes collapses to a single `%`. Text inside `'…'`, `"…"`
/// and `` `…` `` is copied through untouched.
pub fn rewrite_placeholders<F>(sql: &str, mut f: F) -> String
where
    F: FnMut(usize) -> String,
{
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;
    let mut index = 0;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' && q != '`' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                out.push(c);
            }
            '%' => match chars.peek() {
                Some('s') => {
                    chars.next();
                    out.push_str(&f(index));
                    index += 1;
                }
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                _ => out.push('%'),
            },
            _ => out.push(c),
        }
    }

    out
}

/// Number of `%s` placeholders outside quoted regions
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    rewrite_placeholders(sql, |_| {
        count += 1;
        String::new()
    });
    count
}

/// Split a compound statement on top-level `;`, dropping empty pieces
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = sql.chars();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == '\\' && q != '`' {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                current.push(c);
            }
            ';' => {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    statements.push(trimmed.to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }

    statements
}

/// Map a MySQL column type name (as reported by the driver) to a decoding class
pub fn mysql_column_kind(type_name: &str) -> ColumnKind {
    let normalized = type_name.trim().to_ascii_uppercase();
    let unsigned = normalized.contains("UNSIGNED");
    let base = normalized.split_whitespace().next().unwrap_or("");

    match base {
        "BOOLEAN" | "BOOL" => ColumnKind::Bool,
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" => {
            if unsigned {
                ColumnKind::UInt
            } else {
                ColumnKind::Int
            }
        }
        // YEAR only decodes through the unsigned integer path
        "BIT" | "YEAR" => ColumnKind::UInt,
        "FLOAT" | "DOUBLE" | "REAL" => ColumnKind::Float,
        "DECIMAL" | "NUMERIC" => ColumnKind::Decimal,
        "CHAR" | "VARCHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            ColumnKind::Text
        }
        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "GEOMETRY" => {
            ColumnKind::Bytes
        }
        "DATE" => ColumnKind::Date,
        "DATETIME" => ColumnKind::DateTime,
        "TIMESTAMP" => ColumnKind::Timestamp,
        "TIME" => ColumnKind::Time,
        "JSON" => ColumnKind::Json,
        "NULL" => ColumnKind::Null,
        _ => ColumnKind::Text, // default fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_to_question_marks() {
        let sql = "SELECT * FROM `t` WHERE `a` = %s AND `b` > %s";
        assert_eq!(
            rewrite_placeholders(sql, |_| "?".to_string()),
            "SELECT * FROM `t` WHERE `a` = ? AND `b` > ?"
        );
    }

    #[test]
    fn test_rewrite_skips_quoted_text() {
        let sql = "SELECT '%s', `%s`, \"a\\\"%s\" FROM t WHERE x = %s";
        assert_eq!(
            rewrite_placeholders(sql, |i| format!("${}", i + 1)),
            "SELECT '%s', `%s`, \"a\\\"%s\" FROM t WHERE x = $1"
        );
    }

    #[test]
    fn test_escaped_percent() {
        assert_eq!(
            rewrite_placeholders("a LIKE 'x%%' OR b = 100%%", |_| "?".to_string()),
            "a LIKE 'x%%' OR b = 100%"
        );
        assert_eq!(count_placeholders("100%% %s %d"), 1);
    }

    #[test]
    fn test_split_compound_statement() {
        let parts = split_statements(
            "SELECT `id` FROM `t` WHERE (`name` = %s) FOR UPDATE;UPDATE `t` SET `name` = %s WHERE (`name` = %s)",
        );
        assert_eq!(parts.len(), 2);
        assert!(parts[0].ends_with("FOR UPDATE"));
        assert!(parts[1].starts_with("UPDATE"));
        assert_eq!(count_placeholders(&parts[0]), 1);
        assert_eq!(count_placeholders(&parts[1]), 2);
    }

    #[test]
    fn test_split_ignores_quoted_semicolons() {
        let parts = split_statements("begin; UPDATE t SET a = 'x;y'; ");
        assert_eq!(parts, vec!["begin".to_string(), "UPDATE t SET a = 'x;y'".to_string()]);
    }

    #[test]
    fn test_mysql_column_kinds() {
        assert_eq!(mysql_column_kind("INT"), ColumnKind::Int);
        assert_eq!(mysql_column_kind("BIGINT UNSIGNED"), ColumnKind::UInt);
        assert_eq!(mysql_column_kind("varchar"), ColumnKind::Text);
        assert_eq!(mysql_column_kind("BOOLEAN"), ColumnKind::Bool);
        assert_eq!(mysql_column_kind("YEAR"), ColumnKind::UInt);
        assert_eq!(mysql_column_kind("DECIMAL"), ColumnKind::Decimal);
        assert_eq!(mysql_column_kind("DATETIME"), ColumnKind::DateTime);
        assert_eq!(mysql_column_kind("JSON"), ColumnKind::Json);
        assert_eq!(mysql_column_kind("LONGBLOB"), ColumnKind::Bytes);
        assert_eq!(mysql_column_kind("SOMETHING_NEW"), ColumnKind::Text);
    }
}
