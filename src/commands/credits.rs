// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use super::{Context, arg, id};
use crate::aggregate::{credit_pending, paid_percentage, pending_debt};
use crate::models::CreditAccount;
use crate::store::{
    DataStore, OrderBy, Row, Table, fetch_records, find_record, insert_record, update_record,
};
use crate::utils::{fmt_date, fmt_percent, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub, ctx)?,
        Some(("list", sub)) => list(store, sub, ctx)?,
        Some(("pay", sub)) => {
            let amount = parse_decimal(arg(sub, "amount")?)?;
            let credit = pay(store, id(sub)?, amount)?;
            println!(
                "Paid {} on '{}'; pending {}",
                ctx.money(amount),
                credit.name,
                ctx.money(credit_pending(&credit))
            );
        }
        Some(("rm", sub)) => {
            let id = id(sub)?;
            store.delete_by_id(Table::Credits, id)?;
            println!("Removed credit #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &dyn DataStore, sub: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    let due_date = match sub.get_one::<String>("due") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    let record = CreditAccount {
        id: None,
        name: arg(sub, "name")?.trim().to_string(),
        total_balance: Some(parse_decimal(arg(sub, "total")?)?),
        paid_balance: Some(parse_decimal(arg(sub, "paid")?)?),
        interest_rate: Some(parse_decimal(arg(sub, "rate")?)?),
        due_date,
    };
    let saved = insert_record(store, Table::Credits, &record)?;
    info!(id = ?saved.id, "credit added");
    println!(
        "Added credit '{}' with {} pending",
        saved.name,
        ctx.money(credit_pending(&saved))
    );
    Ok(())
}

/// Adds `amount` to the paid balance of credit `id`.
pub fn pay(store: &dyn DataStore, id: i64, amount: Decimal) -> Result<CreditAccount> {
    if amount <= Decimal::ZERO {
        bail!("Payment must be positive, got {}", amount);
    }
    let credit: CreditAccount = find_record(store, Table::Credits, id)?;
    let Some(paid) = credit.paid().checked_add(amount) else {
        bail!("Payment of {} overflows the paid balance of credit #{}", amount, id);
    };
    let mut fields = Row::new();
    fields.insert("paid_balance".into(), json!(paid));
    let updated: CreditAccount = update_record(store, Table::Credits, id, fields)?;
    info!(id, paid = %updated.paid(), "credit payment recorded");
    Ok(updated)
}

#[derive(Debug, Serialize)]
pub struct CreditRow {
    #[serde(flatten)]
    pub credit: CreditAccount,
    pub pending: Decimal,
    pub paid_pct: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CreditListing {
    pub rows: Vec<CreditRow>,
    pub total_pending: Decimal,
}

pub fn listing(store: &dyn DataStore) -> Result<CreditListing> {
    let credits: Vec<CreditAccount> =
        fetch_records(store, Table::Credits, Some(&OrderBy::asc("name")))?;
    let total_pending = pending_debt(&credits);
    let rows = credits
        .into_iter()
        .map(|c| CreditRow {
            pending: credit_pending(&c),
            paid_pct: paid_percentage(&c),
            credit: c,
        })
        .collect();
    Ok(CreditListing {
        rows,
        total_pending,
    })
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
                r.credit.id.map(|i| i.to_string()).unwrap_or_default(),
                r.credit.name.clone(),
                ctx.money(r.credit.total()),
                ctx.money(r.credit.paid()),
                ctx.money(r.pending),
                fmt_percent(r.paid_pct),
                fmt_percent(r.credit.rate()),
                fmt_date(r.credit.due_date),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Name", "Total", "Paid", "Pending", "Progress", "Rate", "Due"],
            rows
        )
    );
    println!("Total pending: {}", ctx.money(data.total_pending));
    Ok(())
}
