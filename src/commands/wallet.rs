// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::info;

use super::{Context, arg, id};
use crate::aggregate::wallet_total;
use crate::models::WalletAccount;
use crate::store::{DataStore, OrderBy, Table, fetch_records, insert_record};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches, ctx: &Context) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let record = WalletAccount {
                id: None,
                name: arg(sub, "name")?.trim().to_string(),
                kind: arg(sub, "kind")?.trim().to_string(),
                balance: Some(parse_decimal(arg(sub, "balance")?)?),
                currency: arg(sub, "currency")?.trim().to_uppercase(),
            };
            let saved = insert_record(store, Table::Accounts, &record)?;
            info!(id = ?saved.id, "account added");
            println!(
                "Added account '{}' ({}, {})",
                saved.name,
                saved.kind,
                ctx.money(saved.balance())
            );
        }
        Some(("list", sub)) => {
            let accounts: Vec<WalletAccount> =
                fetch_records(store, Table::Accounts, Some(&OrderBy::asc("name")))?;
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                return Ok(());
            }
            let total = wallet_total(&accounts);
            let rows = accounts
                .iter()
                .map(|a| {
                    vec![
                        a.id.map(|i| i.to_string()).unwrap_or_default(),
                        a.name.clone(),
                        a.kind.clone(),
                        a.currency.clone(),
                        ctx.money(a.balance()),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Id", "Name", "Kind", "CCY", "Balance"], rows)
            );
            println!("Total: {}", ctx.money(total));
        }
        Some(("rm", sub)) => {
            let id = id(sub)?;
            store.delete_by_id(Table::Accounts, id)?;
            println!("Removed account #{}", id);
        }
        _ => {}
    }
    Ok(())
}
