// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::balance::fetch_or_empty;
use super::{Context, arg};
use crate::aggregate::{
    ChartPoint, DashboardSummary, group_by_month, month_key, snapshot_series,
};
use crate::models::{ExpenseRecord, IncomeRecord, MonthlyBalanceSnapshot};
use crate::store::{DataStore, Table, fetch_records, insert_record, to_row, update_record};
use crate::utils::{fmt_percent, maybe_print_json, parse_month, pretty_table};

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(store, sub, ctx)?,
        Some(("snapshot", sub)) => {
            let snap = snapshot(store, arg(sub, "month")?)?;
            println!(
                "Snapshot {:04}-{:02}: income {}, expenses {}, balance {}",
                snap.year.unwrap_or_default(),
                snap.month.unwrap_or_default(),
                ctx.money(snap.total_income.unwrap_or_default()),
                ctx.money(snap.total_expense.unwrap_or_default()),
                ctx.money(snap.balance.unwrap_or_default())
            );
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub summary: DashboardSummary,
    pub months: Vec<ChartPoint>,
}

/// Snapshots sorted by (year, month), keeping the latest `limit`.
pub fn recent_snapshots(
    mut snapshots: Vec<MonthlyBalanceSnapshot>,
    limit: usize,
) -> Vec<MonthlyBalanceSnapshot> {
    snapshots.sort_by_key(|s| (s.year.unwrap_or_default(), s.month.unwrap_or_default()));
    let skip = snapshots.len().saturating_sub(limit);
    snapshots.split_off(skip)
}

pub fn view(store: &dyn DataStore, ctx: &Context) -> DashboardView {
    let income: Vec<IncomeRecord> = fetch_or_empty(store, Table::Income);
    let expenses: Vec<ExpenseRecord> = fetch_or_empty(store, Table::Expenses);
    let snapshots: Vec<MonthlyBalanceSnapshot> = fetch_or_empty(store, Table::MonthlyBalance);
    DashboardView {
        summary: DashboardSummary::compute(&income, &expenses),
        months: snapshot_series(&recent_snapshots(snapshots, ctx.display.chart_months)),
    }
}

fn show(store: &dyn DataStore, sub: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    let data = view(store, ctx);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let s = &data.summary;
    let kpis = vec![
        vec!["Balance".to_string(), ctx.money(s.balance)],
        vec!["Total income".to_string(), ctx.money(s.total_income)],
        vec!["Total expenses".to_string(), ctx.money(s.total_expenses)],
        vec!["Savings rate".to_string(), fmt_percent(s.savings_rate)],
    ];
    println!("{}", pretty_table(&["Dashboard", ""], kpis));
    if data.months.is_empty() {
        println!("No monthly snapshots yet; record one with `dashboard snapshot --month YYYY-MM`.");
        return Ok(());
    }
    let rows = data
        .months
        .iter()
        .map(|p| {
            vec![
                p.label.clone(),
                ctx.money(p.income),
                ctx.money(p.expense),
                ctx.money(p.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Balance"], rows)
    );
    Ok(())
}

/// Totals income and expenses of `month` (YYYY-MM) and stores them as that
/// month's snapshot, replacing an earlier one.
pub fn snapshot(store: &dyn DataStore, month: &str) -> Result<MonthlyBalanceSnapshot> {
    let first = parse_month(month)?;
    let key = month_key(first);
    let income: Vec<IncomeRecord> = fetch_records(store, Table::Income, None)?;
    let expenses: Vec<ExpenseRecord> = fetch_records(store, Table::Expenses, None)?;
    let total_income = group_by_month(&income, |r| r.date, |r| r.amount)
        .get(&key)
        .unwrap_or(Decimal::ZERO);
    let total_expense = group_by_month(&expenses, |r| r.date, |r| r.amount)
        .get(&key)
        .unwrap_or(Decimal::ZERO);

    let (year, month_no) = (i64::from(first.year()), i64::from(first.month()));
    let snap = MonthlyBalanceSnapshot {
        id: None,
        month: Some(month_no),
        year: Some(year),
        total_income: Some(total_income),
        total_expense: Some(total_expense),
        balance: Some(total_income.saturating_sub(total_expense)),
    };

    let existing: Vec<MonthlyBalanceSnapshot> =
        fetch_records(store, Table::MonthlyBalance, None)?;
    let previous = existing
        .iter()
        .find(|s| s.year == Some(year) && s.month == Some(month_no))
        .and_then(|s| s.id);
    let saved = match previous {
        Some(id) => update_record(store, Table::MonthlyBalance, id, to_row(&snap)?)?,
        None => insert_record(store, Table::MonthlyBalance, &snap)?,
    };
    info!(month = %key, "snapshot stored");
    Ok(saved)
}
