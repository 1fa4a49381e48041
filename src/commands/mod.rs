// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod balance;
pub mod budget;
pub mod credits;
pub mod dashboard;
pub mod expenses;
pub mod exporter;
pub mod gifts;
pub mod income;
pub mod reserve;
pub mod services;
pub mod wallet;

use chrono::NaiveDate;

use crate::config::DisplayConfig;

/// What every command gets besides its arguments.
#[derive(Debug, Clone)]
pub struct Context {
    /// Reference date for anything windowed by month.
    pub today: NaiveDate,
    pub display: DisplayConfig,
}

impl Context {
    pub fn money(&self, d: rust_decimal::Decimal) -> String {
        crate::utils::fmt_money(d, &self.display.currency_symbol)
    }
}

pub(crate) fn arg<'a>(m: &'a clap::ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing --{}", name))
}

pub(crate) fn id(m: &clap::ArgMatches) -> anyhow::Result<i64> {
    crate::utils::parse_id(arg(m, "id")?)
}
