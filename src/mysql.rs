//! MySQL connection over sqlx
//!
//! One physical connection behind a mutex, driven by a private
//! current-thread tokio runtime so every call blocks the caller. Do not call
//! it from inside another tokio runtime.

use crate::connection::{Connection, Row, RowIter};
use config::DatabaseConfig;
use serde_json::Value;
use sql_builder::{DatastoreError, Fields, OrmResult};
use sqlx::mysql::{MySqlArguments, MySqlQueryResult, MySqlRow};
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{Column, Connection as _, MySql, Row as _, TypeInfo};
use std::sync::Mutex;
use std::time::Duration;
use tokio::runtime::Runtime;
use type_mapping::{
    count_placeholders, mysql_column_kind, rewrite_placeholders, split_statements, to_sql_param,
};
use type_mapping::{ColumnKind, SqlParam};

/// One statement of a possibly compound call, with its share of the values
#[derive(Debug)]
struct Piece {
    sql: String,
    values: Vec<Value>,
}

pub struct MySqlConnection {
    runtime: Runtime,
    conn: Mutex<sqlx::MySqlConnection>,
}

impl MySqlConnection {
    /// Connect to a `mysql://` URL
    pub fn connect(url: &str) -> OrmResult<Self> {
        let runtime = build_runtime()?;
        let conn = runtime
            .block_on(sqlx::MySqlConnection::connect(url))
            .map_err(classify)?;
        Ok(Self {
            runtime,
            conn: Mutex::new(conn),
        })
    }

    /// Connect with the configured timeout, then run the init statements.
    /// Init statement failures are logged and skipped.
    pub fn from_config(config: &DatabaseConfig) -> OrmResult<Self> {
        let runtime = build_runtime()?;
        let url = config.connection_string();
        let timeout = Duration::from_secs(config.connection_timeout_seconds);

        let conn = runtime
            .block_on(tokio::time::timeout(
                timeout,
                sqlx::MySqlConnection::connect(&url),
            ))
            .map_err(|_| {
                DatastoreError::connection(format!(
                    "timed out after {}s connecting to {}:{}",
                    config.connection_timeout_seconds, config.host, config.port
                ))
            })?
            .map_err(classify)?;

        let connection = Self {
            runtime,
            conn: Mutex::new(conn),
        };

        for statement in &config.init_statements {
            if let Err(e) = connection.execute_rowcount(statement, &[]) {
                tracing::warn!(statement = %statement, error = %e, "init statement failed");
            }
        }

        tracing::info!(host = %config.host, database = %config.database, "connected to MySQL");
        Ok(connection)
    }

    fn lock(&self) -> OrmResult<std::sync::MutexGuard<'_, sqlx::MySqlConnection>> {
        self.conn
            .lock()
            .map_err(|_| DatastoreError::connection("connection mutex poisoned").into())
    }

    fn run_pieces(&self, sql: &str, values: &[Value]) -> OrmResult<Option<MySqlQueryResult>> {
        let pieces = split_pieces(sql, values)?;
        let mut conn = self.lock()?;
        self.runtime
            .block_on(async {
                let mut last = None;
                for piece in &pieces {
                    last = Some(execute_piece(&mut conn, piece).await?);
                }
                Ok::<_, sqlx::Error>(last)
            })
            .map_err(|e| classify(e).into())
    }

    fn fetch_rows(&self, sql: &str, values: &[Value]) -> OrmResult<Vec<Row>> {
        let pieces = split_pieces(sql, values)?;
        let Some((last, leading)) = pieces.split_last() else {
            return Ok(Vec::new());
        };

        let mut conn = self.lock()?;
        let rows = self
            .runtime
            .block_on(async {
                for piece in leading {
                    execute_piece(&mut conn, piece).await?;
                }
                if last.values.is_empty() {
                    sqlx::raw_sql(&last.sql).fetch_all(&mut *conn).await
                } else {
                    bind_values(sqlx::query(&last.sql), &last.values)
                        .fetch_all(&mut *conn)
                        .await
                }
            })
            .map_err(classify)?;

        rows.iter().map(decode_row).collect()
    }
}

impl Connection for MySqlConnection {
    fn execute(&self, sql: &str, values: &[Value]) -> OrmResult<u64> {
        Ok(self
            .run_pieces(sql, values)?
            .map(|r| r.last_insert_id())
            .unwrap_or(0))
    }

    fn execute_rowcount(&self, sql: &str, values: &[Value]) -> OrmResult<u64> {
        Ok(self
            .run_pieces(sql, values)?
            .map(|r| r.rows_affected())
            .unwrap_or(0))
    }

    fn get(&self, sql: &str, values: &[Value]) -> OrmResult<Option<Row>> {
        Ok(self.fetch_rows(sql, values)?.into_iter().next())
    }

    fn query(&self, sql: &str, values: &[Value]) -> OrmResult<Vec<Row>> {
        self.fetch_rows(sql, values)
    }

    // The driver hands back a fully buffered result set; rows are decoded up front.
    fn iter<'a>(&'a self, sql: &str, values: &[Value]) -> OrmResult<RowIter<'a>> {
        let rows = self.fetch_rows(sql, values)?;
        Ok(Box::new(rows.into_iter().map(Ok)))
    }
}

fn build_runtime() -> OrmResult<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| DatastoreError::connection(format!("failed to start runtime: {}", e)).into())
}

/// Split on top-level `;` and hand each statement the next values in order
fn split_pieces(sql: &str, values: &[Value]) -> OrmResult<Vec<Piece>> {
    let mut offset = 0;
    let mut pieces = Vec::new();

    for statement in split_statements(sql) {
        let wanted = count_placeholders(&statement);
        let Some(slice) = values.get(offset..offset + wanted) else {
            return Err(DatastoreError::query(format!(
                "statement needs {} more values than were given: {}",
                offset + wanted - values.len(),
                statement
            ))
            .into());
        };
        offset += wanted;
        pieces.push(Piece {
            sql: rewrite_placeholders(&statement, |_| "?".to_string()),
            values: slice.to_vec(),
        });
    }

    if offset != values.len() {
        return Err(DatastoreError::query(format!(
            "{} values given for {} placeholders",
            values.len(),
            offset
        ))
        .into());
    }
    Ok(pieces)
}

async fn execute_piece(
    conn: &mut sqlx::MySqlConnection,
    piece: &Piece,
) -> Result<MySqlQueryResult, sqlx::Error> {
    // Statements without parameters go over the text protocol, which also
    // accepts transaction control and session statements
    if piece.values.is_empty() {
        sqlx::raw_sql(&piece.sql).execute(&mut *conn).await
    } else {
        bind_values(sqlx::query(&piece.sql), &piece.values)
            .execute(&mut *conn)
            .await
    }
}

fn bind_values<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    values: &[Value],
) -> Query<'q, MySql, MySqlArguments> {
    for value in values {
        query = match to_sql_param(value) {
            SqlParam::Null => query.bind(Option::<String>::None),
            SqlParam::Bool(b) => query.bind(b),
            SqlParam::Int(i) => query.bind(i),
            SqlParam::UInt(u) => query.bind(u),
            SqlParam::Float(f) => query.bind(f),
            SqlParam::Text(s) | SqlParam::Json(s) => query.bind(s),
        };
    }
    query
}

fn decode_row(row: &MySqlRow) -> OrmResult<Row> {
    let mut fields = Fields::with_capacity(row.columns().len());
    for column in row.columns() {
        let kind = mysql_column_kind(column.type_info().name());
        let value = decode_value(row, column.ordinal(), kind).map_err(|e| {
            DatastoreError::decode(format!("column `{}`: {}", column.name(), e))
        })?;
        fields.insert(column.name().to_string(), value);
    }
    Ok(fields)
}

fn decode_value(row: &MySqlRow, index: usize, kind: ColumnKind) -> Result<Value, sqlx::Error> {
    let value = match kind {
        ColumnKind::Null => Value::Null,
        ColumnKind::Bool => row.try_get::<Option<bool>, _>(index)?.map(Value::Bool).unwrap_or(Value::Null),
        ColumnKind::Int => row.try_get::<Option<i64>, _>(index)?.map(Value::from).unwrap_or(Value::Null),
        ColumnKind::UInt => row.try_get::<Option<u64>, _>(index)?.map(Value::from).unwrap_or(Value::Null),
        ColumnKind::Float => row
            .try_get::<Option<f64>, _>(index)?
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ColumnKind::Json => row
            .try_get::<Option<Json<Value>>, _>(index)?
            .map(|json| json.0)
            .unwrap_or(Value::Null),
        ColumnKind::Date => row
            .try_get::<Option<chrono::NaiveDate>, _>(index)?
            .map(|d| Value::String(d.to_string()))
            .unwrap_or(Value::Null),
        ColumnKind::DateTime => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)?
            .map(|d| Value::String(d.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(Value::Null),
        ColumnKind::Timestamp => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)?
            .map(|d| Value::String(d.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(Value::Null),
        ColumnKind::Time => row
            .try_get::<Option<chrono::NaiveTime>, _>(index)?
            .map(|t| Value::String(t.to_string()))
            .unwrap_or(Value::Null),
        ColumnKind::Bytes => row
            .try_get_unchecked::<Option<Vec<u8>>, _>(index)?
            .map(|b| Value::String(String::from_utf8_lossy(&b).into_owned()))
            .unwrap_or(Value::Null),
        ColumnKind::Decimal | ColumnKind::Text => row
            .try_get_unchecked::<Option<String>, _>(index)?
            .map(Value::String)
            .unwrap_or(Value::Null),
    };
    Ok(value)
}

/// Map a driver error onto the datastore taxonomy. MySQL 1062 is a duplicate key.
fn classify(err: sqlx::Error) -> DatastoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DatastoreError::duplicate_key(db.message())
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Configuration(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => DatastoreError::connection(err.to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            DatastoreError::decode(err.to_string())
        }
        _ => DatastoreError::query(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_pieces_distributes_values() {
        let sql = "SELECT `id` FROM `t` WHERE (`name` = %s) FOR UPDATE;\
                   UPDATE `t` SET `name` = %s WHERE (`name` = %s)";
        let values = vec![json!("a"), json!("b"), json!("a")];
        let pieces = split_pieces(sql, &values).unwrap();

        assert_eq!(pieces.len(), 2);
        assert_eq!(
            pieces[0].sql,
            "SELECT `id` FROM `t` WHERE (`name` = ?) FOR UPDATE"
        );
        assert_eq!(pieces[0].values, vec![json!("a")]);
        assert_eq!(pieces[1].sql, "UPDATE `t` SET `name` = ? WHERE (`name` = ?)");
        assert_eq!(pieces[1].values, vec![json!("b"), json!("a")]);
    }

    #[test]
    fn test_split_pieces_checks_counts() {
        assert!(split_pieces("SELECT %s, %s", &[json!(1)]).is_err());
        assert!(split_pieces("SELECT 1", &[json!(1)]).is_err());
        assert_eq!(split_pieces("BEGIN", &[]).unwrap().len(), 1);
    }
}
