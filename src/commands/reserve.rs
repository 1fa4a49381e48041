// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::{Context, arg, id};
use crate::aggregate::reserve_total;
use crate::models::{MovementType, ReserveMovement};
use crate::store::{DataStore, OrderBy, Table, fetch_records, insert_record};
use crate::utils::{fmt_date, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub, ctx)?,
        Some(("list", sub)) => list(store, sub, ctx)?,
        Some(("rm", sub)) => {
            let id = id(sub)?;
            store.delete_by_id(Table::ReserveMovements, id)?;
            println!("Removed movement #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &dyn DataStore, sub: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    let movement_type = MovementType::from(arg(sub, "type")?);
    if let MovementType::Other(t) = &movement_type {
        warn!(movement_type = %t, "unrecognized movement type; it will not count toward the fund");
    }
    let record = ReserveMovement {
        id: None,
        concept: sub
            .get_one::<String>("concept")
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        amount: Some(parse_decimal(arg(sub, "amount")?)?),
        movement_type,
        date: Some(parse_date(arg(sub, "date")?)?),
    };
    let saved = insert_record(store, Table::ReserveMovements, &record)?;
    info!(id = ?saved.id, "reserve movement recorded");
    println!(
        "Recorded {} of {} on {}",
        saved.movement_type.as_str(),
        ctx.money(saved.amount()),
        fmt_date(saved.date)
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ReserveListing {
    pub rows: Vec<ReserveMovement>,
    pub total: Decimal,
}

pub fn listing(store: &dyn DataStore) -> Result<ReserveListing> {
    let rows: Vec<ReserveMovement> =
        fetch_records(store, Table::ReserveMovements, Some(&OrderBy::desc("date")))?;
    let total = reserve_total(&rows);
    Ok(ReserveListing { rows, total })
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
            let signed = match r.movement_type {
                MovementType::Withdrawal => format!("-{}", ctx.money(r.amount())),
                MovementType::Deposit => format!("+{}", ctx.money(r.amount())),
                MovementType::Other(_) => ctx.money(r.amount()),
            };
            vec![
                r.id.map(|i| i.to_string()).unwrap_or_default(),
                fmt_date(r.date),
                r.concept.clone(),
                r.movement_type.as_str().to_string(),
                signed,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Date", "Concept", "Type", "Amount"], rows)
    );
    println!("Reserve fund: {}", ctx.money(data.total));
    Ok(())
}
