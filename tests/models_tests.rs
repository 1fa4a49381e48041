// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use moneydash::models::{
    CreditAccount, GiftItem, IncomeRecord, MovementType, Periodicity, RecurringService,
    ReserveMovement,
};
use rust_decimal::Decimal;
use serde_json::json;

#[test]
fn numbers_decode_from_strings_numbers_and_garbage() {
    let from_str: IncomeRecord =
        serde_json::from_value(json!({"amount": "12.50", "date": "2025-02-03"})).unwrap();
    assert_eq!(from_str.amount(), Decimal::from_str_exact("12.50").unwrap());

    let from_num: IncomeRecord = serde_json::from_value(json!({"amount": 7.25})).unwrap();
    assert_eq!(from_num.amount(), Decimal::from_str_exact("7.25").unwrap());

    let garbage: IncomeRecord = serde_json::from_value(json!({"amount": "abc"})).unwrap();
    assert_eq!(garbage.amount, None);
    assert_eq!(garbage.amount(), Decimal::ZERO);

    let missing: IncomeRecord = serde_json::from_value(json!({})).unwrap();
    assert_eq!(missing.amount(), Decimal::ZERO);
    assert_eq!(missing.description, "");
}

#[test]
fn dates_accept_timestamps() {
    let r: IncomeRecord =
        serde_json::from_value(json!({"date": "2025-04-09T13:45:00+00:00"})).unwrap();
    assert_eq!(r.date, NaiveDate::from_ymd_opt(2025, 4, 9));
    let bad: IncomeRecord = serde_json::from_value(json!({"date": "09/04/2025"})).unwrap();
    assert_eq!(bad.date, None);
}

#[test]
fn flags_decode_from_sqlite_integers() {
    let s: RecurringService =
        serde_json::from_value(json!({"active": 1, "amount": "3"})).unwrap();
    assert!(s.active);
    let g: GiftItem = serde_json::from_value(json!({"purchased": 0})).unwrap();
    assert!(!g.purchased);
    let g: GiftItem = serde_json::from_value(json!({"purchased": "true"})).unwrap();
    assert!(g.purchased);
    let g: GiftItem = serde_json::from_value(json!({"purchased": null})).unwrap();
    assert!(!g.purchased);
}

#[test]
fn enum_tokens_accept_aliases_and_keep_unknowns() {
    assert_eq!(MovementType::from("deposito"), MovementType::Deposit);
    assert_eq!(MovementType::from("Withdrawal"), MovementType::Withdrawal);
    assert_eq!(
        MovementType::from("ajuste"),
        MovementType::Other("ajuste".to_string())
    );
    assert_eq!(Periodicity::from("anual"), Periodicity::Annual);
    assert_eq!(Periodicity::from("weekly"), Periodicity::Weekly);

    let m: ReserveMovement =
        serde_json::from_value(json!({"movement_type": "ajuste", "amount": 5})).unwrap();
    assert_eq!(serde_json::to_value(&m).unwrap()["movement_type"], "ajuste");

    let missing: RecurringService = serde_json::from_value(json!({"periodicity": null})).unwrap();
    assert_eq!(missing.periodicity, Periodicity::Monthly);
}

#[test]
fn serialized_records_use_store_tokens() {
    let m = ReserveMovement {
        movement_type: MovementType::Withdrawal,
        ..Default::default()
    };
    let v = serde_json::to_value(&m).unwrap();
    assert_eq!(v["movement_type"], "retiro");
    assert!(v.get("id").is_none());

    let c = CreditAccount {
        id: Some(4),
        total_balance: Some(Decimal::from(100)),
        ..Default::default()
    };
    let v = serde_json::to_value(&c).unwrap();
    assert_eq!(v["id"], 4);
    assert_eq!(v["total_balance"], "100");
}
