// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use super::{Context, arg, id};
use crate::aggregate::monthly_equivalent;
use crate::models::{Periodicity, RecurringService};
use crate::store::{
    DataStore, OrderBy, Row, Table, fetch_records, find_record, insert_record, update_record,
};
use crate::utils::{fmt_date, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub, ctx)?,
        Some(("list", sub)) => list(store, sub, ctx)?,
        Some(("toggle", sub)) => {
            let s = toggle(store, id(sub)?)?;
            let state = if s.active { "active" } else { "paused" };
            println!("Service '{}' is now {}", s.name, state);
        }
        Some(("rm", sub)) => {
            let id = id(sub)?;
            store.delete_by_id(Table::Services, id)?;
            println!("Removed service #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &dyn DataStore, sub: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    let periodicity = Periodicity::from(arg(sub, "periodicity")?);
    if let Periodicity::Other(p) = &periodicity {
        warn!(periodicity = %p, "unrecognized periodicity; prorating as monthly");
    }
    let billing_date = match sub.get_one::<String>("billing-date") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    let record = RecurringService {
        id: None,
        name: arg(sub, "name")?.trim().to_string(),
        amount: Some(parse_decimal(arg(sub, "amount")?)?),
        periodicity,
        billing_date,
        active: true,
    };
    let saved = insert_record(store, Table::Services, &record)?;
    info!(id = ?saved.id, "service added");
    println!(
        "Added service '{}' ({} {})",
        saved.name,
        ctx.money(saved.amount()),
        saved.periodicity.as_str()
    );
    Ok(())
}

pub fn toggle(store: &dyn DataStore, id: i64) -> Result<RecurringService> {
    let current: RecurringService = find_record(store, Table::Services, id)?;
    let mut fields = Row::new();
    fields.insert("active".into(), json!(!current.active));
    update_record(store, Table::Services, id, fields)
}

#[derive(Debug, Serialize)]
pub struct ServiceListing {
    pub rows: Vec<RecurringService>,
    /// Prorated monthly cost of the active services.
    pub monthly_total: Decimal,
}

pub fn listing(store: &dyn DataStore) -> Result<ServiceListing> {
    let rows: Vec<RecurringService> =
        fetch_records(store, Table::Services, Some(&OrderBy::asc("name")))?;
    let monthly_total = monthly_equivalent(&rows);
    Ok(ServiceListing {
        rows,
        monthly_total,
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
        .map(|s| {
            let per_month = if s.active {
                ctx.money(s.periodicity.monthly_amount(s.amount()))
            } else {
                "-".to_string()
            };
            vec![
                s.id.map(|i| i.to_string()).unwrap_or_default(),
                s.name.clone(),
                ctx.money(s.amount()),
                s.periodicity.as_str().to_string(),
                per_month,
                fmt_date(s.billing_date),
                if s.active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Name", "Amount", "Periodicity", "Per month", "Billing", "Active"],
            rows
        )
    );
    println!("Monthly total: {}", ctx.money(data.monthly_total));
    Ok(())
}
