// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context as _, Result, bail};
use serde_json::Value;
use std::path::Path;
use tracing::info;

use super::arg;
use crate::store::{DataStore, Row, Table};

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("table", sub)) => {
            let name = arg(sub, "table")?;
            let table = Table::from_name(name.trim())
                .with_context(|| format!("Unknown table '{}'", name))?;
            let fmt = arg(sub, "format")?.to_lowercase();
            let out = arg(sub, "out")?;
            let n = export_table(store, table, &fmt, Path::new(out))?;
            println!("Exported {} rows of {} to {}", n, table, out);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Column order: `id` first, then the remaining keys in the order of the
/// first row that carries them.
fn columns(rows: &[Row]) -> Vec<String> {
    let mut cols: Vec<String> = Vec::new();
    for row in rows {
        for k in row.keys() {
            if !cols.contains(k) {
                cols.push(k.clone());
            }
        }
    }
    if let Some(pos) = cols.iter().position(|c| c == "id") {
        let id = cols.remove(pos);
        cols.insert(0, id);
    }
    cols
}

pub fn export_table(store: &dyn DataStore, table: Table, fmt: &str, out: &Path) -> Result<usize> {
    let rows = store
        .fetch_all(table, None)
        .with_context(|| format!("Failed to fetch {}", table))?;
    match fmt {
        "csv" => {
            let cols = columns(&rows);
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            wtr.write_record(&cols)?;
            for row in &rows {
                wtr.write_record(cols.iter().map(|c| row.get(c).map(cell).unwrap_or_default()))?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<Value> = rows.iter().cloned().map(Value::Object).collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Failed to write {}", out.display()))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    info!(table = %table, rows = rows.len(), "exported");
    Ok(rows.len())
}
