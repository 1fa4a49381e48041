// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::Context;
use crate::aggregate::{BalanceOverview, group_by_month, month_window};
use crate::models::{
    CreditAccount, ExpenseRecord, IncomeRecord, RecurringService, ReserveMovement,
};
use crate::store::{DataStore, Table, fetch_records};
use crate::utils::{maybe_print_json, pretty_table};

/// Fetches a table for a multi-table view. A failed fetch is logged and the
/// view carries on with no rows for that table.
pub(crate) fn fetch_or_empty<T: DeserializeOwned>(store: &dyn DataStore, table: Table) -> Vec<T> {
    match fetch_records(store, table, None) {
        Ok(rows) => rows,
        Err(e) => {
            warn!(table = %table, error = %format!("{:#}", e), "fetch failed; showing no rows");
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthFlow {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BalanceReport {
    pub overview: BalanceOverview,
    pub months: Vec<MonthFlow>,
}

pub fn report(store: &dyn DataStore, ctx: &Context) -> BalanceReport {
    let income: Vec<IncomeRecord> = fetch_or_empty(store, Table::Income);
    let expenses: Vec<ExpenseRecord> = fetch_or_empty(store, Table::Expenses);
    let reserve: Vec<ReserveMovement> = fetch_or_empty(store, Table::ReserveMovements);
    let credits: Vec<CreditAccount> = fetch_or_empty(store, Table::Credits);
    let services: Vec<RecurringService> = fetch_or_empty(store, Table::Services);

    let overview = BalanceOverview::compute(&income, &expenses, &reserve, &credits, &services);

    let months = ctx.display.chart_months;
    let inc = month_window(
        &group_by_month(&income, |r| r.date, |r| r.amount),
        ctx.today,
        months,
    );
    let exp = month_window(
        &group_by_month(&expenses, |r| r.date, |r| r.amount),
        ctx.today,
        months,
    );
    let months = inc
        .into_iter()
        .zip(exp)
        .map(|((month, income), (_, expenses))| MonthFlow {
            month,
            income,
            expenses,
        })
        .collect();

    BalanceReport { overview, months }
}

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    let data = report(store, ctx);
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let o = &data.overview;
    let cards = vec![
        vec!["Total income".to_string(), ctx.money(o.income)],
        vec!["Total expenses".to_string(), ctx.money(o.expenses)],
        vec!["Net balance".to_string(), ctx.money(o.net)],
        vec!["Reserve fund".to_string(), ctx.money(o.reserve)],
        vec!["Pending debt".to_string(), ctx.money(o.pending_debt)],
        vec!["Services / month".to_string(), ctx.money(o.services_monthly)],
    ];
    println!("{}", pretty_table(&["Balance", ""], cards));

    let rows = data
        .months
        .iter()
        .map(|f| {
            vec![
                f.month.clone(),
                ctx.money(f.income),
                ctx.money(f.expenses),
                ctx.money(f.income.saturating_sub(f.expenses)),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Net"], rows)
    );
    Ok(())
}
