// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! PostgREST-style HTTP backend (the shape Supabase exposes under `/rest/v1`).
//!
//! The remote tables must follow the local schema in [`crate::db`]: table
//! names from [`Table::name`] and the column names of [`crate::models`].
//! Nothing here renames tables or columns.

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::{DataStore, OrderBy, Row, StoreError, Table, check_column};

const UA: &str = concat!(
    "moneydash/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/moneydash)"
);

pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).user_agent(UA).build()?;
        info!(url = base_url, "using remote data service");
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    /// Query string for a full-table select.
    pub fn select_query(order_by: Option<&OrderBy>) -> Result<Vec<(String, String)>, StoreError> {
        let mut q = vec![("select".to_string(), "*".to_string())];
        if let Some(o) = order_by {
            let col = check_column(&o.column)?;
            let dir = if o.ascending { "asc" } else { "desc" };
            q.push(("order".to_string(), format!("{}.{}", col, dir)));
        }
        Ok(q)
    }

    pub fn id_filter(id: i64) -> (String, String) {
        ("id".to_string(), format!("eq.{}", id))
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn rows(resp: Response) -> Result<Vec<Row>, StoreError> {
        let status = resp.status();
        let body = resp.text()?;
        Self::decode_rows(status, &body)
    }

    /// Turns a response into rows. Non-2xx statuses become [`StoreError::Http`];
    /// anything other than an array of objects is a decode error.
    pub fn decode_rows(status: StatusCode, body: &str) -> Result<Vec<Row>, StoreError> {
        if !status.is_success() {
            return Err(StoreError::Http {
                status: status.as_u16(),
                body: body.to_string(),
            });
        }
        let value: Value =
            serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))?;
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|v| match v {
                    Value::Object(m) => Ok(m),
                    other => Err(StoreError::Decode(other.to_string())),
                })
                .collect(),
            other => Err(StoreError::Decode(other.to_string())),
        }
    }

    /// The one row a by-id DELETE or PATCH returned. An empty representation
    /// means no row matched.
    pub fn single(table: Table, id: i64, rows: Vec<Row>) -> Result<Row, StoreError> {
        rows.into_iter()
            .next()
            .ok_or(StoreError::NotFound { table, id })
    }
}

fn checked(row: Row) -> Result<Row, StoreError> {
    let mut out = Row::new();
    for (k, v) in row {
        if k == "id" {
            continue;
        }
        check_column(&k)?;
        out.insert(k, v);
    }
    Ok(out)
}

impl DataStore for RestStore {
    fn fetch_all(&self, table: Table, order_by: Option<&OrderBy>) -> Result<Vec<Row>, StoreError> {
        let query = Self::select_query(order_by)?;
        let resp = self
            .authed(self.client.get(self.table_url(table)))
            .query(&query)
            .send()?;
        let rows = Self::rows(resp)?;
        debug!(table = %table, rows = rows.len(), "fetched");
        Ok(rows)
    }

    fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
        let row = checked(row)?;
        if row.is_empty() {
            return Err(StoreError::EmptyRow(table));
        }
        let resp = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&vec![Value::Object(row)])
            .send()?;
        Self::rows(resp)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))
    }

    fn delete_by_id(&self, table: Table, id: i64) -> Result<(), StoreError> {
        let resp = self
            .authed(self.client.delete(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(&[Self::id_filter(id)])
            .send()?;
        Self::single(table, id, Self::rows(resp)?).map(|_| ())
    }

    fn update_by_id(&self, table: Table, id: i64, fields: Row) -> Result<Row, StoreError> {
        let fields = checked(fields)?;
        if fields.is_empty() {
            return Err(StoreError::EmptyRow(table));
        }
        let resp = self
            .authed(self.client.patch(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(&[Self::id_filter(id)])
            .json(&Value::Object(fields))
            .send()?;
        Self::single(table, id, Self::rows(resp)?)
    }
}
