// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Access to the tables behind the dashboard.
//!
//! Rows travel as JSON objects so that a local SQLite file and a remote
//! PostgREST endpoint can sit behind the same trait. The typed helpers at the
//! bottom convert to and from the record structs in [`crate::models`].

pub mod rest;
pub mod sqlite;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use rest::RestStore;
pub use sqlite::SqliteStore;

pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Income,
    Expenses,
    Credits,
    Services,
    Budget,
    ReserveMovements,
    Gifts,
    MonthlyBalance,
    Accounts,
}

impl Table {
    pub const ALL: [Table; 9] = [
        Table::Income,
        Table::Expenses,
        Table::Credits,
        Table::Services,
        Table::Budget,
        Table::ReserveMovements,
        Table::Gifts,
        Table::MonthlyBalance,
        Table::Accounts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Income => "income",
            Table::Expenses => "expenses",
            Table::Credits => "credits",
            Table::Services => "services",
            Table::Budget => "budget",
            Table::ReserveMovements => "reserve_movements",
            Table::Gifts => "gifts",
            Table::MonthlyBalance => "monthly_balance",
            Table::Accounts => "accounts",
        }
    }

    pub fn from_name(name: &str) -> Option<Table> {
        Table::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: true,
        }
    }

    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid column name '{0}'")]
    InvalidColumn(String),

    #[error("No row with id {id} in {table}")]
    NotFound { table: Table, id: i64 },

    #[error("Nothing to write to {0}")]
    EmptyRow(Table),

    #[error("HTTP {status} from data service: {body}")]
    Http { status: u16, body: String },

    #[error("Unexpected response from data service: {0}")]
    Decode(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

static COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("column pattern is valid"));

pub fn check_column(name: &str) -> Result<&str, StoreError> {
    if COLUMN_RE.is_match(name) {
        Ok(name)
    } else {
        Err(StoreError::InvalidColumn(name.to_string()))
    }
}

/// The operations every page needs from the backing service.
pub trait DataStore {
    fn fetch_all(&self, table: Table, order_by: Option<&OrderBy>) -> Result<Vec<Row>, StoreError>;

    /// Stores `row` and returns it as persisted, including its new `id`.
    fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError>;

    fn delete_by_id(&self, table: Table, id: i64) -> Result<(), StoreError>;

    /// Overwrites the given fields and returns the updated row.
    fn update_by_id(&self, table: Table, id: i64, fields: Row) -> Result<Row, StoreError>;
}

pub fn to_row<T: Serialize>(record: &T) -> Result<Row> {
    match serde_json::to_value(record)? {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(map)
        }
        other => anyhow::bail!("Record did not serialize to an object: {}", other),
    }
}

pub fn from_row<T: DeserializeOwned>(table: Table, row: Row) -> Result<T> {
    serde_json::from_value(Value::Object(row))
        .with_context(|| format!("Malformed row in {}", table))
}

pub fn fetch_records<T: DeserializeOwned>(
    store: &dyn DataStore,
    table: Table,
    order_by: Option<&OrderBy>,
) -> Result<Vec<T>> {
    let rows = store
        .fetch_all(table, order_by)
        .with_context(|| format!("Failed to fetch {}", table))?;
    rows.into_iter().map(|r| from_row(table, r)).collect()
}

pub fn insert_record<T: Serialize + DeserializeOwned>(
    store: &dyn DataStore,
    table: Table,
    record: &T,
) -> Result<T> {
    let row = store
        .insert(table, to_row(record)?)
        .with_context(|| format!("Failed to insert into {}", table))?;
    from_row(table, row)
}

pub fn update_record<T: DeserializeOwned>(
    store: &dyn DataStore,
    table: Table,
    id: i64,
    fields: Row,
) -> Result<T> {
    let row = store
        .update_by_id(table, id, fields)
        .with_context(|| format!("Failed to update {} #{}", table, id))?;
    from_row(table, row)
}

pub fn find_record<T: DeserializeOwned>(store: &dyn DataStore, table: Table, id: i64) -> Result<T> {
    let row = store
        .fetch_all(table, None)
        .with_context(|| format!("Failed to fetch {}", table))?
        .into_iter()
        .find(|r| r.get("id").and_then(Value::as_i64) == Some(id))
        .ok_or(StoreError::NotFound { table, id })?;
    from_row(table, row)
}
