// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params, params_from_iter};
use serde_json::Value;
use tracing::debug;

use super::{DataStore, OrderBy, Row, StoreError, Table, check_column};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn query_rows(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Row>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let cols: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut cur = stmt.query(params_from_iter(args.iter()))?;
        let mut out = Vec::new();
        while let Some(r) = cur.next()? {
            let mut row = Row::new();
            for (i, name) in cols.iter().enumerate() {
                row.insert(name.clone(), to_json(r.get_ref(i)?));
            }
            out.push(row);
        }
        Ok(out)
    }

    fn fetch_one(&self, table: Table, id: i64) -> Result<Row, StoreError> {
        let sql = format!("SELECT * FROM {} WHERE id=?1", table.name());
        self.query_rows(&sql, &[SqlValue::Integer(id)])?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound { table, id })
    }
}

fn to_json(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}

fn to_sql(v: Value) -> SqlValue {
    match v {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Text(n.to_string()),
        },
        Value::String(s) => SqlValue::Text(s),
        other => SqlValue::Text(other.to_string()),
    }
}

fn split_row(row: Row) -> Result<(Vec<String>, Vec<SqlValue>), StoreError> {
    let mut cols = Vec::with_capacity(row.len());
    let mut vals = Vec::with_capacity(row.len());
    for (k, v) in row {
        if k == "id" {
            continue;
        }
        check_column(&k)?;
        cols.push(k);
        vals.push(to_sql(v));
    }
    Ok((cols, vals))
}

impl DataStore for SqliteStore {
    fn fetch_all(&self, table: Table, order_by: Option<&OrderBy>) -> Result<Vec<Row>, StoreError> {
        let mut sql = format!("SELECT * FROM {}", table.name());
        match order_by {
            Some(o) => {
                let col = check_column(&o.column)?;
                let dir = if o.ascending { "ASC" } else { "DESC" };
                sql.push_str(&format!(" ORDER BY {} {}, id {}", col, dir, dir));
            }
            None => sql.push_str(" ORDER BY id"),
        }
        let rows = self.query_rows(&sql, &[])?;
        debug!(table = %table, rows = rows.len(), "fetched");
        Ok(rows)
    }

    fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
        let (cols, vals) = split_row(row)?;
        if cols.is_empty() {
            return Err(StoreError::EmptyRow(table));
        }
        let placeholders: Vec<String> = (1..=cols.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {}({}) VALUES ({})",
            table.name(),
            cols.join(", "),
            placeholders.join(",")
        );
        self.conn.execute(&sql, params_from_iter(vals.iter()))?;
        let id = self.conn.last_insert_rowid();
        debug!(table = %table, id, "inserted");
        self.fetch_one(table, id)
    }

    fn delete_by_id(&self, table: Table, id: i64) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE id=?1", table.name());
        let n = self.conn.execute(&sql, params![id])?;
        if n == 0 {
            return Err(StoreError::NotFound { table, id });
        }
        debug!(table = %table, id, "deleted");
        Ok(())
    }

    fn update_by_id(&self, table: Table, id: i64, fields: Row) -> Result<Row, StoreError> {
        let (cols, mut vals) = split_row(fields)?;
        if cols.is_empty() {
            return Err(StoreError::EmptyRow(table));
        }
        let sets: Vec<String> = cols
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}=?{}", c, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id=?{}",
            table.name(),
            sets.join(", "),
            cols.len() + 1
        );
        vals.push(SqlValue::Integer(id));
        let n = self.conn.execute(&sql, params_from_iter(vals.iter()))?;
        if n == 0 {
            return Err(StoreError::NotFound { table, id });
        }
        debug!(table = %table, id, "updated");
        self.fetch_one(table, id)
    }
}
