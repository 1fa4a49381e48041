// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use moneydash::aggregate::*;
use moneydash::models::*;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn income(amount: Option<&str>, date: &str, desc: &str) -> IncomeRecord {
    IncomeRecord {
        description: desc.to_string(),
        amount: amount.map(d),
        date: Some(day(date)),
        ..Default::default()
    }
}

fn expense(amount: &str) -> ExpenseRecord {
    ExpenseRecord {
        amount: Some(d(amount)),
        ..Default::default()
    }
}

fn credit(total: &str, paid: &str) -> CreditAccount {
    CreditAccount {
        total_balance: Some(d(total)),
        paid_balance: Some(d(paid)),
        ..Default::default()
    }
}

fn service(amount: &str, periodicity: &str, active: bool) -> RecurringService {
    RecurringService {
        amount: Some(d(amount)),
        periodicity: Periodicity::from(periodicity),
        active,
        ..Default::default()
    }
}

fn movement(amount: &str, kind: &str) -> ReserveMovement {
    ReserveMovement {
        amount: Some(d(amount)),
        movement_type: MovementType::from(kind),
        ..Default::default()
    }
}

fn category(budgeted: &str, spent: &str) -> BudgetCategory {
    BudgetCategory {
        budgeted_amount: Some(d(budgeted)),
        spent_amount: Some(d(spent)),
        ..Default::default()
    }
}

fn gift(price: &str, purchased: bool) -> GiftItem {
    GiftItem {
        estimated_price: Some(d(price)),
        purchased,
        ..Default::default()
    }
}

#[test]
fn sum_amount_empty_is_zero_and_order_independent() {
    let empty: Vec<IncomeRecord> = Vec::new();
    assert_eq!(sum_amount(&empty, |r| r.amount), Decimal::ZERO);

    let mut rows = vec![
        income(Some("10.10"), "2025-01-03", "a"),
        income(None, "2025-01-04", "b"),
        income(Some("0.20"), "2025-02-01", "c"),
        income(Some("-3"), "2025-02-09", "d"),
    ];
    let forward = sum_amount(&rows, |r| r.amount);
    rows.reverse();
    assert_eq!(forward, d("7.30"));
    assert_eq!(sum_amount(&rows, |r| r.amount), forward);
}

#[test]
fn net_balance_can_go_negative() {
    let inc = vec![income(Some("100"), "2025-01-01", "pay")];
    let exp = vec![expense("80"), expense("45.50")];
    assert_eq!(net_balance(&inc, &exp), d("-25.50"));
    assert_eq!(net_balance(&[], &[]), Decimal::ZERO);
}

#[test]
fn reserve_deposits_minus_withdrawals() {
    let moves = vec![movement("100", "deposito"), movement("30", "retiro")];
    assert_eq!(reserve_total(&moves), d("70"));
}

#[test]
fn reserve_ignores_unknown_types_and_may_go_negative() {
    let moves = vec![
        movement("50", "deposit"),
        movement("20", "transfer"),
        movement("80", "withdrawal"),
    ];
    assert_eq!(reserve_total(&moves), d("-30"));
    assert_eq!(reserve_total(&[]), Decimal::ZERO);
}

#[test]
fn overpaid_credit_floors_at_zero() {
    assert_eq!(pending_debt(&[credit("100", "150")]), Decimal::ZERO);
    let credits = vec![credit("100", "150"), credit("500", "120.25")];
    assert_eq!(pending_debt(&credits), d("379.75"));
}

#[test]
fn credit_with_missing_fields_counts_as_zero() {
    let c = CreditAccount {
        total_balance: Some(d("40")),
        ..Default::default()
    };
    assert_eq!(credit_pending(&c), d("40"));
    assert_eq!(paid_percentage(&c), Decimal::ZERO);
}

#[test]
fn paid_percentage_is_bounded() {
    assert_eq!(paid_percentage(&credit("200", "50")), d("25"));
    assert_eq!(paid_percentage(&credit("100", "150")), d("100"));
    assert_eq!(paid_percentage(&credit("0", "10")), Decimal::ZERO);
}

#[test]
fn monthly_equivalent_uses_fixed_multipliers() {
    assert_eq!(monthly_equivalent(&[service("120", "anual", true)]), d("10"));
    assert_eq!(monthly_equivalent(&[service("50", "semanal", true)]), d("200"));
    assert_eq!(monthly_equivalent(&[service("15.99", "mensual", true)]), d("15.99"));
    // unknown cadence counts as monthly
    assert_eq!(monthly_equivalent(&[service("7", "quincenal", true)]), d("7"));
}

#[test]
fn monthly_equivalent_excludes_inactive() {
    let inactive = RecurringService {
        amount: Some(d("999")),
        active: false,
        ..Default::default()
    };
    assert_eq!(monthly_equivalent(&[inactive.clone()]), Decimal::ZERO);
    let mixed = vec![inactive, service("120", "anual", true), service("50", "semanal", true)];
    assert_eq!(monthly_equivalent(&mixed), d("210"));
}

#[test]
fn budget_utilization_is_clamped() {
    assert_eq!(budget_utilization(&category("0", "50")), Decimal::ZERO);
    assert_eq!(budget_utilization(&category("-10", "50")), Decimal::ZERO);
    assert_eq!(budget_utilization(&category("100", "150")), d("100"));
    assert_eq!(budget_utilization(&category("200", "50")), d("25"));
    assert_eq!(budget_utilization(&category("100", "-5")), Decimal::ZERO);
}

#[test]
fn budget_totals_sum_both_columns() {
    let cats = vec![category("100", "20"), category("50", "75"), BudgetCategory::default()];
    let totals = budget_totals(&cats);
    assert_eq!(totals.budgeted, d("150"));
    assert_eq!(totals.spent, d("95"));
}

#[test]
fn pending_gifts_skip_purchased() {
    assert_eq!(pending_gift_total(&[gift("20", false), gift("50", true)]), d("20"));
    let no_price = GiftItem::default();
    assert_eq!(pending_gift_total(&[no_price]), Decimal::ZERO);
}

#[test]
fn savings_rate_guards_zero_income() {
    assert_eq!(savings_rate(d("1000"), d("750")), d("25"));
    assert_eq!(savings_rate(Decimal::ZERO, d("10")), Decimal::ZERO);
    assert_eq!(savings_rate(d("100"), d("150")), d("-50"));
}

#[test]
fn wallet_total_sums_balances() {
    let accounts = vec![
        WalletAccount {
            balance: Some(d("12.5")),
            ..Default::default()
        },
        WalletAccount::default(),
        WalletAccount {
            balance: Some(d("-2.5")),
            ..Default::default()
        },
    ];
    assert_eq!(wallet_total(&accounts), d("10"));
}

#[test]
fn group_by_month_empty() {
    let totals = group_by_month(&Vec::<IncomeRecord>::new(), |r| r.date, |r| r.amount);
    assert!(totals.is_empty());
}

#[test]
fn group_by_month_three_months() {
    let rows = vec![
        income(Some("10"), "2025-03-15", "a"),
        income(Some("5"), "2025-01-02", "b"),
        income(Some("1"), "2025-03-01", "c"),
        income(Some("7"), "2025-02-28", "d"),
        income(None, "2025-02-01", "e"),
    ];
    let totals = group_by_month(&rows, |r| r.date, |r| r.amount);
    assert_eq!(totals.len(), 3);
    assert_eq!(totals.get("2025-03"), Some(d("11")));
    assert_eq!(totals.get("2025-01"), Some(d("5")));
    assert_eq!(totals.get("2025-02"), Some(d("7")));
    // first-seen order
    let keys: Vec<&str> = totals.keys().collect();
    assert_eq!(keys, vec!["2025-03", "2025-01", "2025-02"]);
}

#[test]
fn group_by_month_buckets_undated() {
    let rows = vec![
        IncomeRecord {
            amount: Some(d("4")),
            ..Default::default()
        },
        income(Some("1"), "2025-05-05", "x"),
    ];
    let totals = group_by_month(&rows, |r| r.date, |r| r.amount);
    assert_eq!(totals.get(UNDATED_KEY), Some(d("4")));
}

#[test]
fn month_window_ends_at_injected_date() {
    let rows = vec![
        income(Some("10"), "2025-03-15", "a"),
        income(Some("7"), "2024-12-01", "b"),
        income(Some("99"), "2024-06-01", "too old"),
        income(Some("50"), "2025-04-01", "future"),
    ];
    let totals = group_by_month(&rows, |r| r.date, |r| r.amount);
    let window = month_window(&totals, day("2025-03-31"), 4);
    assert_eq!(
        window,
        vec![
            ("2024-12".to_string(), d("7")),
            ("2025-01".to_string(), Decimal::ZERO),
            ("2025-02".to_string(), Decimal::ZERO),
            ("2025-03".to_string(), d("10")),
        ]
    );
    assert!(month_window(&totals, day("2025-03-31"), 0).is_empty());
}

#[test]
fn filter_by_description_is_case_insensitive() {
    let rows = vec![
        income(Some("1"), "2025-01-01", "Salary March"),
        income(Some("2"), "2025-01-01", "freelance"),
        income(Some("3"), "2025-01-01", "BONUS salary"),
    ];
    let hits = filter_by_description(&rows, "SALARY", |r| Some(r.description.as_str()));
    assert_eq!(hits.len(), 2);
    let all = filter_by_description(&rows, "  ", |r| Some(r.description.as_str()));
    assert_eq!(all.len(), 3);
    let none = filter_by_description(&rows, "rent", |_| None);
    assert!(none.is_empty());
}

#[test]
fn snapshot_series_labels_and_defaults() {
    let snaps = vec![
        MonthlyBalanceSnapshot {
            month: Some(1),
            year: Some(2025),
            total_income: Some(d("100")),
            total_expense: Some(d("40")),
            balance: Some(d("60")),
            ..Default::default()
        },
        MonthlyBalanceSnapshot {
            month: Some(13),
            ..Default::default()
        },
    ];
    let pts = snapshot_series(&snaps);
    assert_eq!(pts[0].label, "Jan 2025");
    assert_eq!(pts[0].balance, d("60"));
    assert_eq!(pts[1].label, "?");
    assert_eq!(pts[1].income, Decimal::ZERO);
}

#[test]
fn overview_combines_every_card() {
    let inc = vec![income(Some("1000"), "2025-01-01", "pay")];
    let exp = vec![expense("400")];
    let res = vec![movement("100", "deposito"), movement("30", "retiro")];
    let cred = vec![credit("500", "100")];
    let serv = vec![service("120", "anual", true), service("10", "mensual", false)];
    let o = BalanceOverview::compute(&inc, &exp, &res, &cred, &serv);
    assert_eq!(o.net, d("600"));
    assert_eq!(o.reserve, d("70"));
    assert_eq!(o.pending_debt, d("400"));
    assert_eq!(o.services_monthly, d("10"));

    let s = DashboardSummary::compute(&inc, &exp);
    assert_eq!(s.balance, d("600"));
    assert_eq!(s.savings_rate, d("60"));
}

#[test]
fn aggregation_is_idempotent() {
    let moves = vec![movement("100", "deposito"), movement("30", "retiro")];
    let services = vec![service("50", "semanal", true)];
    let rows = vec![income(Some("3"), "2025-01-01", "a")];
    assert_eq!(reserve_total(&moves), reserve_total(&moves));
    assert_eq!(monthly_equivalent(&services), monthly_equivalent(&services));
    assert_eq!(
        group_by_month(&rows, |r| r.date, |r| r.amount),
        group_by_month(&rows, |r| r.date, |r| r.amount)
    );
}

#[test]
fn percentages_saturate_on_huge_ratios() {
    let huge = "1000000000000000000000000000";
    assert_eq!(budget_utilization(&category("1", huge)), d("100"));
    assert_eq!(paid_percentage(&credit("1", huge)), d("100"));
    assert_eq!(savings_rate(d("0.0000001"), Decimal::MAX), Decimal::MIN);
    assert_eq!(savings_rate(Decimal::MAX, Decimal::ZERO), d("100"));
}

#[test]
fn totals_saturate_instead_of_overflowing() {
    let big = IncomeRecord {
        amount: Some(Decimal::MAX),
        ..Default::default()
    };
    let income = vec![big.clone(), big];
    assert_eq!(total_income(&income), Decimal::MAX);
    assert_eq!(sum_amount(&income, |r| r.amount), Decimal::MAX);

    let negative = vec![IncomeRecord {
        amount: Some(Decimal::MIN),
        ..Default::default()
    }];
    let spent = vec![ExpenseRecord {
        amount: Some(Decimal::MAX),
        ..Default::default()
    }];
    assert_eq!(net_balance(&negative, &spent), Decimal::MIN);

    let out = ReserveMovement {
        amount: Some(Decimal::MAX),
        movement_type: MovementType::Withdrawal,
        ..Default::default()
    };
    assert_eq!(reserve_total(&[out.clone(), out]), Decimal::MIN);

    let weekly = RecurringService {
        amount: Some(Decimal::MAX),
        periodicity: Periodicity::Weekly,
        active: true,
        ..Default::default()
    };
    assert_eq!(monthly_equivalent(&[weekly]), Decimal::MAX);

    let owed = CreditAccount {
        total_balance: Some(Decimal::MAX),
        paid_balance: Some(Decimal::MIN),
        ..Default::default()
    };
    assert_eq!(credit_pending(&owed), Decimal::MAX);
    assert_eq!(pending_debt(&[owed.clone(), owed]), Decimal::MAX);

    let months = group_by_month(
        &[day("2025-01-03"), day("2025-01-20")],
        |date| Some(*date),
        |_| Some(Decimal::MAX),
    );
    assert_eq!(months.get("2025-01"), Some(Decimal::MAX));
}
