// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::{Context, arg, id};
use crate::aggregate::{BudgetTotals, budget_totals, budget_utilization};
use crate::models::BudgetCategory;
use crate::store::{DataStore, OrderBy, Table, fetch_records, insert_record};
use crate::utils::{bar, fmt_percent, maybe_print_json, parse_decimal, pretty_table};

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub, ctx)?,
        Some(("list", sub)) => list(store, sub, ctx)?,
        Some(("rm", sub)) => {
            let id = id(sub)?;
            store.delete_by_id(Table::Budget, id)?;
            println!("Removed budget category #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &dyn DataStore, sub: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    let record = BudgetCategory {
        id: None,
        name: arg(sub, "name")?.trim().to_string(),
        budgeted_amount: Some(parse_decimal(arg(sub, "budgeted")?)?),
        spent_amount: Some(parse_decimal(arg(sub, "spent")?)?),
    };
    let saved = insert_record(store, Table::Budget, &record)?;
    info!(id = ?saved.id, "budget category added");
    println!(
        "Budget '{}' = {} ({} used)",
        saved.name,
        ctx.money(saved.budgeted()),
        fmt_percent(budget_utilization(&saved))
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BudgetRow {
    #[serde(flatten)]
    pub category: BudgetCategory,
    pub utilization: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BudgetListing {
    pub rows: Vec<BudgetRow>,
    pub totals: BudgetTotals,
}

pub fn listing(store: &dyn DataStore) -> Result<BudgetListing> {
    let categories: Vec<BudgetCategory> =
        fetch_records(store, Table::Budget, Some(&OrderBy::asc("name")))?;
    let totals = budget_totals(&categories);
    let rows = categories
        .into_iter()
        .map(|c| BudgetRow {
            utilization: budget_utilization(&c),
            category: c,
        })
        .collect();
    Ok(BudgetListing { rows, totals })
}

fn list(store: &dyn DataStore, sub: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    let data = listing(store)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data.rows)? {
        return Ok(());
    }
    let rows = data
        .rows
        .iter()
        .map(|r| {
            vec![
                r.category.id.map(|i| i.to_string()).unwrap_or_default(),
                r.category.name.clone(),
                ctx.money(r.category.budgeted()),
                ctx.money(r.category.spent()),
                fmt_percent(r.utilization),
                bar(r.utilization, Decimal::ONE_HUNDRED, 20),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Category", "Budget", "Spent", "Used", ""], rows)
    );
    println!(
        "Budgeted: {}  Spent: {}",
        ctx.money(data.totals.budgeted),
        ctx.money(data.totals.spent)
    );
    Ok(())
}
