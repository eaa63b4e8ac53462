//! SQLite backend implementation, for local development and tests.

use anyhow::Result;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::Connection;
use serde_json::{Map, Number, Value};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::backend::{Filter, Query, RecordStore, Table};
use super::schema::SCHEMA;
use super::StoreError;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock leaves the connection itself usable.
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}

fn to_sql_value(table: Table, column: &str, value: &Value) -> Result<SqlValue, StoreError> {
    let converted = match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) if table.array_columns().contains(&column) => SqlValue::Text(value.to_string()),
        Value::Array(_) | Value::Object(_) => {
            return Err(StoreError::Decode {
                table: table.name(),
                message: format!("column {} cannot hold {}", column, value),
            })
        }
    };
    Ok(converted)
}

fn from_sql_value(table: Table, column: &str, value: ValueRef<'_>) -> Result<Value, StoreError> {
    let decode_error = |message: String| StoreError::Decode {
        table: table.name(),
        message,
    };

    let converted = match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) if table.bool_columns().contains(&column) => Value::Bool(i != 0),
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| decode_error(format!("column {} is not UTF-8: {}", column, e)))?;
            if table.array_columns().contains(&column) {
                serde_json::from_str(text)
                    .map_err(|e| decode_error(format!("column {} is not a JSON array: {}", column, e)))?
            } else {
                Value::String(text.to_string())
            }
        }
        ValueRef::Blob(_) => return Err(decode_error(format!("column {} holds a blob", column))),
    };
    Ok(converted)
}

impl RecordStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        query.validate()?;
        let table = query.table;

        let mut sql = format!("SELECT * FROM {}", quote(table.name()));
        let mut params = Vec::with_capacity(query.filters.len());

        if !query.filters.is_empty() {
            let mut clauses = Vec::with_capacity(query.filters.len());
            for (i, filter) in query.filters.iter().enumerate() {
                clauses.push(format!("{} = ?{}", quote(&filter.column), i + 1));
                params.push(to_sql_value(table, &filter.column, &filter.value)?);
            }
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        // rowid last so equal keys come back in insertion order
        let mut order_terms: Vec<String> = query
            .order
            .iter()
            .map(|o| format!("{} {}", quote(&o.column), if o.ascending { "ASC" } else { "DESC" }))
            .collect();
        order_terms.push("rowid ASC".to_string());
        sql.push_str(" ORDER BY ");
        sql.push_str(&order_terms.join(", "));

        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;

        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let mut object = Map::new();
            for (i, column) in columns.iter().enumerate() {
                object.insert(column.clone(), from_sql_value(table, column, row.get_ref(i)?)?);
            }
            results.push(Value::Object(object));
        }

        Ok(results)
    }

    fn insert(&self, table: Table, row: Value) -> Result<(), StoreError> {
        let Value::Object(fields) = row else {
            return Err(StoreError::Decode {
                table: table.name(),
                message: "insert expects a JSON object".to_string(),
            });
        };

        let mut columns = Vec::with_capacity(fields.len());
        let mut placeholders = Vec::with_capacity(fields.len());
        let mut params = Vec::with_capacity(fields.len());
        for (i, (column, value)) in fields.iter().enumerate() {
            table.check_column(column)?;
            columns.push(quote(column));
            placeholders.push(format!("?{}", i + 1));
            params.push(to_sql_value(table, column, value)?);
        }

        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote(table.name()))
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote(table.name()),
                columns.join(", "),
                placeholders.join(", ")
            )
        };

        self.conn().execute(&sql, rusqlite::params_from_iter(params.iter()))?;
        Ok(())
    }

    fn update(&self, table: Table, filter: &Filter, changes: Value) -> Result<(), StoreError> {
        let Value::Object(fields) = changes else {
            return Err(StoreError::Decode {
                table: table.name(),
                message: "update expects a JSON object".to_string(),
            });
        };
        table.check_column(&filter.column)?;
        if fields.is_empty() {
            return Ok(());
        }

        let mut assignments = Vec::with_capacity(fields.len() + 1);
        let mut params = Vec::with_capacity(fields.len() + 1);
        for (i, (column, value)) in fields.iter().enumerate() {
            table.check_column(column)?;
            assignments.push(format!("{} = ?{}", quote(column), i + 1));
            params.push(to_sql_value(table, column, value)?);
        }
        if table.has_column("updated_at") && !fields.contains_key("updated_at") {
            assignments.push("updated_at = CURRENT_TIMESTAMP".to_string());
        }
        params.push(to_sql_value(table, &filter.column, &filter.value)?);

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            quote(table.name()),
            assignments.join(", "),
            quote(&filter.column),
            params.len()
        );

        self.conn().execute(&sql, rusqlite::params_from_iter(params.iter()))?;
        Ok(())
    }
}
