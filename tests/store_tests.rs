// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use moneydash::db;
use moneydash::models::{GiftItem, IncomeRecord, RecurringService};
use moneydash::store::{
    DataStore, OrderBy, RestStore, Row, SqliteStore, StoreError, Table, fetch_records,
    insert_record,
};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;
use std::time::Duration;

fn setup() -> SqliteStore {
    SqliteStore::new(db::open_in_memory().unwrap())
}

fn row(v: serde_json::Value) -> Row {
    v.as_object().unwrap().clone()
}

#[test]
fn insert_returns_row_with_id() {
    let store = setup();
    let saved = store
        .insert(
            Table::Income,
            row(json!({"description": "Salary", "amount": "1500.00", "date": "2025-03-01"})),
        )
        .unwrap();
    assert_eq!(saved["id"], 1);
    assert_eq!(saved["amount"], "1500.00");
    assert!(saved.contains_key("created_at"));
}

#[test]
fn fetch_orders_by_column() {
    let store = setup();
    for (desc, date) in [("a", "2025-01-05"), ("b", "2025-03-01"), ("c", "2025-02-10")] {
        store
            .insert(
                Table::Income,
                row(json!({"description": desc, "amount": "1", "date": date})),
            )
            .unwrap();
    }
    let rows: Vec<IncomeRecord> =
        fetch_records(&store, Table::Income, Some(&OrderBy::desc("date"))).unwrap();
    let order: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(order, vec!["b", "c", "a"]);
}

#[test]
fn typed_round_trip_keeps_decimals_and_flags() {
    let store = setup();
    let svc = RecurringService {
        name: "Streaming".into(),
        amount: Some(Decimal::from_str_exact("9.99").unwrap()),
        active: true,
        ..Default::default()
    };
    let saved = insert_record(&store, Table::Services, &svc).unwrap();
    assert_eq!(saved.id, Some(1));
    assert_eq!(saved.amount(), Decimal::from_str_exact("9.99").unwrap());
    assert!(saved.active);
}

#[test]
fn update_changes_only_given_fields() {
    let store = setup();
    let gift = GiftItem {
        name: "Book".into(),
        estimated_price: Some(Decimal::from(20)),
        ..Default::default()
    };
    let saved = insert_record(&store, Table::Gifts, &gift).unwrap();
    let id = saved.id.unwrap();
    let updated = store
        .update_by_id(Table::Gifts, id, row(json!({"purchased": true})))
        .unwrap();
    assert_eq!(updated["purchased"], 1);
    assert_eq!(updated["name"], "Book");
}

#[test]
fn delete_and_missing_ids() {
    let store = setup();
    let saved = store
        .insert(Table::Budget, row(json!({"name": "Food", "budgeted_amount": "300"})))
        .unwrap();
    let id = saved["id"].as_i64().unwrap();
    store.delete_by_id(Table::Budget, id).unwrap();
    assert!(store.fetch_all(Table::Budget, None).unwrap().is_empty());

    let err = store.delete_by_id(Table::Budget, id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { id: i, .. } if i == id));
    let err = store
        .update_by_id(Table::Budget, 42, row(json!({"name": "x"})))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn rejects_bad_column_names() {
    let store = setup();
    let err = store
        .fetch_all(Table::Income, Some(&OrderBy::asc("date; DROP TABLE income")))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidColumn(_)));
    let err = store
        .insert(Table::Income, row(json!({"Amount": "1"})))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidColumn(_)));
    let err = store.insert(Table::Income, Row::new()).unwrap_err();
    assert!(matches!(err, StoreError::EmptyRow(Table::Income)));
}

#[test]
fn table_names_round_trip() {
    for t in Table::ALL {
        assert_eq!(Table::from_name(t.name()), Some(t));
    }
    assert_eq!(Table::from_name("users"), None);
}

#[test]
fn rest_urls_follow_postgrest_conventions() {
    let store = RestStore::new("https://demo.supabase.co/", "key", Duration::from_secs(5)).unwrap();
    assert_eq!(
        store.table_url(Table::ReserveMovements),
        "https://demo.supabase.co/rest/v1/reserve_movements"
    );
    let q = RestStore::select_query(Some(&OrderBy::desc("date"))).unwrap();
    assert_eq!(
        q,
        vec![
            ("select".to_string(), "*".to_string()),
            ("order".to_string(), "date.desc".to_string())
        ]
    );
    assert_eq!(RestStore::id_filter(7), ("id".to_string(), "eq.7".to_string()));
    assert!(RestStore::select_query(Some(&OrderBy::asc("x.y"))).is_err());
}

#[test]
fn rest_tables_use_local_schema_names() {
    let store = RestStore::new("https://demo.supabase.co", "key", Duration::from_secs(5)).unwrap();
    for t in Table::ALL {
        assert_eq!(
            store.table_url(t),
            format!("https://demo.supabase.co/rest/v1/{}", t.name())
        );
    }
    assert!(store.table_url(Table::Gifts).ends_with("/gifts"));
    assert!(store.table_url(Table::Income).ends_with("/income"));
}

#[test]
fn rest_responses_decode_or_map_to_errors() {
    let rows = RestStore::decode_rows(StatusCode::OK, r#"[{"id": 3, "name": "Cash"}]"#).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Cash");

    let err = RestStore::decode_rows(StatusCode::UNAUTHORIZED, "invalid api key").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Http { status: 401, ref body } if body == "invalid api key"
    ));

    let err = RestStore::decode_rows(StatusCode::OK, r#"{"message": "oops"}"#).unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
    let err = RestStore::decode_rows(StatusCode::OK, "[1, 2]").unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
    let err = RestStore::decode_rows(StatusCode::OK, "not json").unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
}

#[test]
fn rest_empty_representation_is_not_found() {
    let rows = RestStore::decode_rows(StatusCode::OK, "[]").unwrap();
    let err = RestStore::single(Table::Gifts, 12, rows).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { table: Table::Gifts, id: 12 }));

    let rows = RestStore::decode_rows(StatusCode::OK, r#"[{"id": 12}]"#).unwrap();
    assert_eq!(RestStore::single(Table::Gifts, 12, rows).unwrap()["id"], 12);
}
