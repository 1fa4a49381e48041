// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::{Context, arg, id};
use crate::aggregate::{filter_by_description, group_by_month, month_window, total_income};
use crate::models::IncomeRecord;
use crate::store::{DataStore, OrderBy, Table, fetch_records, insert_record};
use crate::utils::{bar, fmt_date, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub, ctx)?,
        Some(("list", sub)) => list(store, sub, ctx)?,
        Some(("rm", sub)) => {
            let id = id(sub)?;
            store.delete_by_id(Table::Income, id)?;
            println!("Removed income #{}", id);
        }
        Some(("chart", sub)) => chart(store, sub, ctx)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &dyn DataStore, sub: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    let record = IncomeRecord {
        id: None,
        description: arg(sub, "description")?.trim().to_string(),
        amount: Some(parse_decimal(arg(sub, "amount")?)?),
        date: Some(parse_date(arg(sub, "date")?)?),
        notes: sub.get_one::<String>("notes").map(|s| s.to_string()),
    };
    let saved = insert_record(store, Table::Income, &record)?;
    info!(id = ?saved.id, "income recorded");
    println!(
        "Recorded income {} on {} ('{}')",
        ctx.money(saved.amount()),
        fmt_date(saved.date),
        saved.description
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct IncomeListing {
    pub rows: Vec<IncomeRecord>,
    pub total: Decimal,
}

/// Newest first, narrowed by `search`; the total covers only the rows shown.
pub fn listing(store: &dyn DataStore, search: Option<&str>) -> Result<IncomeListing> {
    let all: Vec<IncomeRecord> =
        fetch_records(store, Table::Income, Some(&OrderBy::desc("date")))?;
    let rows: Vec<IncomeRecord> =
        filter_by_description(&all, search.unwrap_or(""), |r| Some(r.description.as_str()))
            .into_iter()
            .cloned()
            .collect();
    let total = total_income(&rows);
    Ok(IncomeListing { rows, total })
}

fn list(store: &dyn DataStore, sub: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    let search = sub.get_one::<String>("search").map(|s| s.as_str());
    let data = listing(store, search)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data.rows)? {
        return Ok(());
    }
    let rows = data
        .rows
        .iter()
        .map(|r| {
            vec![
                r.id.map(|i| i.to_string()).unwrap_or_default(),
                fmt_date(r.date),
                r.description.clone(),
                ctx.money(r.amount()),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "Date", "Description", "Amount"], rows));
    println!("Total: {}", ctx.money(data.total));
    Ok(())
}

pub fn monthly_series(
    store: &dyn DataStore,
    ctx: &Context,
    months: usize,
) -> Result<Vec<(String, Decimal)>> {
    let all: Vec<IncomeRecord> = fetch_records(store, Table::Income, None)?;
    let totals = group_by_month(&all, |r| r.date, |r| r.amount);
    Ok(month_window(&totals, ctx.today, months))
}

fn chart(store: &dyn DataStore, sub: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    let months = sub
        .get_one::<usize>("months")
        .copied()
        .unwrap_or(ctx.display.chart_months);
    let series = monthly_series(store, ctx, months)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        return Ok(());
    }
    let max = series.iter().map(|(_, v)| *v).max().unwrap_or(Decimal::ZERO);
    let rows = series
        .iter()
        .map(|(m, v)| vec![m.clone(), ctx.money(*v), bar(*v, max, 30)])
        .collect();
    println!("{}", pretty_table(&["Month", "Income", ""], rows));
    Ok(())
}
