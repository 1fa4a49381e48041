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
use crate::aggregate::{filter_by_description, total_expenses};
use crate::models::ExpenseRecord;
use crate::store::{DataStore, OrderBy, Table, fetch_records, insert_record};
use crate::utils::{fmt_date, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub, ctx)?,
        Some(("list", sub)) => list(store, sub, ctx)?,
        Some(("rm", sub)) => {
            let id = id(sub)?;
            store.delete_by_id(Table::Expenses, id)?;
            println!("Removed expense #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &dyn DataStore, sub: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    let record = ExpenseRecord {
        id: None,
        description: arg(sub, "description")?.trim().to_string(),
        amount: Some(parse_decimal(arg(sub, "amount")?)?),
        date: Some(parse_date(arg(sub, "date")?)?),
        kind: arg(sub, "kind")?.trim().to_string(),
        status: arg(sub, "status")?.trim().to_string(),
    };
    let saved = insert_record(store, Table::Expenses, &record)?;
    info!(id = ?saved.id, "expense recorded");
    println!(
        "Recorded expense {} on {} ('{}')",
        ctx.money(saved.amount()),
        fmt_date(saved.date),
        saved.description
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ExpenseListing {
    pub rows: Vec<ExpenseRecord>,
    pub total: Decimal,
}

pub fn listing(store: &dyn DataStore, search: Option<&str>) -> Result<ExpenseListing> {
    let all: Vec<ExpenseRecord> =
        fetch_records(store, Table::Expenses, Some(&OrderBy::desc("date")))?;
    let rows: Vec<ExpenseRecord> =
        filter_by_description(&all, search.unwrap_or(""), |r| Some(r.description.as_str()))
            .into_iter()
            .cloned()
            .collect();
    let total = total_expenses(&rows);
    Ok(ExpenseListing { rows, total })
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
                r.kind.clone(),
                r.status.clone(),
                ctx.money(r.amount()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Date", "Description", "Kind", "Status", "Amount"], rows)
    );
    println!("Total: {}", ctx.money(data.total));
    Ok(())
}
