// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use super::{Context, arg, id};
use crate::aggregate::pending_gift_total;
use crate::models::GiftItem;
use crate::store::{
    DataStore, OrderBy, Row, Table, fetch_records, find_record, insert_record, update_record,
};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub, ctx)?,
        Some(("list", sub)) => list(store, sub, ctx)?,
        Some(("toggle", sub)) => {
            let g = toggle(store, id(sub)?)?;
            let state = if g.purchased { "purchased" } else { "pending" };
            println!("Gift '{}' marked {}", g.name, state);
        }
        Some(("rm", sub)) => {
            let id = id(sub)?;
            store.delete_by_id(Table::Gifts, id)?;
            println!("Removed gift #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &dyn DataStore, sub: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    let estimated_price = match sub.get_one::<String>("price") {
        Some(s) => Some(parse_decimal(s)?),
        None => None,
    };
    let record = GiftItem {
        id: None,
        name: arg(sub, "name")?.trim().to_string(),
        description: sub.get_one::<String>("description").cloned(),
        recipient: sub.get_one::<String>("recipient").cloned(),
        estimated_price,
        purchased: false,
    };
    let saved = insert_record(store, Table::Gifts, &record)?;
    info!(id = ?saved.id, "gift added");
    println!("Added gift '{}' ({})", saved.name, ctx.money(saved.price()));
    Ok(())
}

pub fn toggle(store: &dyn DataStore, id: i64) -> Result<GiftItem> {
    let current: GiftItem = find_record(store, Table::Gifts, id)?;
    let mut fields = Row::new();
    fields.insert("purchased".into(), json!(!current.purchased));
    update_record(store, Table::Gifts, id, fields)
}

#[derive(Debug, Serialize)]
pub struct GiftListing {
    pub rows: Vec<GiftItem>,
    pub pending_total: Decimal,
}

pub fn listing(store: &dyn DataStore) -> Result<GiftListing> {
    let rows: Vec<GiftItem> =
        fetch_records(store, Table::Gifts, Some(&OrderBy::desc("created_at")))?;
    let pending_total = pending_gift_total(&rows);
    Ok(GiftListing {
        rows,
        pending_total,
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
        .map(|g| {
            vec![
                g.id.map(|i| i.to_string()).unwrap_or_default(),
                if g.purchased { "[x]" } else { "[ ]" }.to_string(),
                g.name.clone(),
                g.recipient.clone().unwrap_or_default(),
                g.estimated_price.map(|p| ctx.money(p)).unwrap_or_default(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "", "Gift", "For", "Price"], rows));
    println!("Still to buy: {}", ctx.money(data.pending_total));
    Ok(())
}
