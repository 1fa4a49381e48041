// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use moneydash::store::{DataStore, SqliteStore, Table};
use moneydash::{cli, commands::exporter, db};
use serde_json::{Value, json};
use tempfile::tempdir;

fn seeded() -> SqliteStore {
    let store = SqliteStore::new(db::open_in_memory().unwrap());
    for (name, price, purchased) in [("Scarf", "20.00", false), ("Watch", "50", true)] {
        store
            .insert(
                Table::Gifts,
                json!({"name": name, "estimated_price": price, "purchased": purchased})
                    .as_object()
                    .unwrap()
                    .clone(),
            )
            .unwrap();
    }
    store
}

#[test]
fn export_table_writes_pretty_json() {
    let store = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("gifts.json");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "moneydash",
        "export",
        "table",
        "gifts",
        "--format",
        "json",
        "--out",
        out_str.as_str(),
    ]);
    if let Some(("export", m)) = matches.subcommand() {
        exporter::handle(&store, m).unwrap();
    } else {
        panic!("export command not parsed");
    }

    let content = std::fs::read_to_string(&out_path).unwrap();
    assert!(content.contains("\n  {"));
    let parsed: Value = serde_json::from_str(&content).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Scarf");
    assert_eq!(items[0]["estimated_price"], "20.00");
    assert_eq!(items[1]["purchased"], 1);
}

#[test]
fn export_table_writes_csv_with_id_first() {
    let store = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("gifts.csv");

    let n = exporter::export_table(&store, Table::Gifts, "csv", &out_path).unwrap();
    assert_eq!(n, 2);

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "id");
    let name_idx = headers.iter().position(|h| h == "name").unwrap();
    let desc_idx = headers.iter().position(|h| h == "description").unwrap();
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[1][name_idx], "Watch");
    assert_eq!(&records[0][desc_idx], "");
}

#[test]
fn export_rejects_unknown_format() {
    let store = seeded();
    let dir = tempdir().unwrap();
    let err = exporter::export_table(&store, Table::Gifts, "xml", &dir.path().join("g.xml"))
        .unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
}
