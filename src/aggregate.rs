// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived figures for every view: totals, nets, prorated service costs,
//! debt and budget percentages, and month-bucketed series.
//!
//! Everything here is a pure function of its arguments. Inputs are never
//! assumed to be sorted, missing numbers count as zero, and ratios with a
//! zero denominator are defined as zero. Arithmetic saturates at the bounds
//! of `Decimal` instead of overflowing. Functions that window by time take
//! the reference date as a parameter.

use chrono::{Datelike, Month, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    BudgetCategory, CreditAccount, ExpenseRecord, GiftItem, IncomeRecord, MonthlyBalanceSnapshot,
    MovementType, Periodicity, RecurringService, ReserveMovement, WalletAccount,
};

/// Key used by [`group_by_month`] for records that carry no date.
pub const UNDATED_KEY: &str = "N/A";

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

fn total<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `part / whole * 100`, or zero when `whole` is not positive. A quotient too
/// large to represent saturates toward the sign of `part`.
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|q| q.checked_mul(HUNDRED))
        .unwrap_or(if part.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

fn clamp_percent(v: Decimal) -> Decimal {
    v.clamp(Decimal::ZERO, HUNDRED)
}

/// Sums a numeric field picked out by `field`; `None` counts as zero.
pub fn sum_amount<T, F>(records: &[T], field: F) -> Decimal
where
    F: Fn(&T) -> Option<Decimal>,
{
    total(records.iter().map(|r| field(r).unwrap_or(Decimal::ZERO)))
}

pub fn total_income(income: &[IncomeRecord]) -> Decimal {
    sum_amount(income, |r| r.amount)
}

pub fn total_expenses(expenses: &[ExpenseRecord]) -> Decimal {
    sum_amount(expenses, |r| r.amount)
}

/// Income minus expenses. Not clamped.
pub fn net_balance(income: &[IncomeRecord], expenses: &[ExpenseRecord]) -> Decimal {
    total_income(income).saturating_sub(total_expenses(expenses))
}

/// Running net of the reserve fund. Movements with an unrecognized type
/// contribute nothing.
pub fn reserve_total(movements: &[ReserveMovement]) -> Decimal {
    movements
        .iter()
        .fold(Decimal::ZERO, |acc, m| match m.movement_type {
            MovementType::Deposit => acc.saturating_add(m.amount()),
            MovementType::Withdrawal => acc.saturating_sub(m.amount()),
            MovementType::Other(_) => acc,
        })
}

/// Outstanding balance of one credit, never below zero.
pub fn credit_pending(credit: &CreditAccount) -> Decimal {
    credit.total().saturating_sub(credit.paid()).max(Decimal::ZERO)
}

/// Sum of each credit's outstanding balance. An overpaid credit adds zero
/// rather than offsetting the others.
pub fn pending_debt(credits: &[CreditAccount]) -> Decimal {
    total(credits.iter().map(credit_pending))
}

/// Share of a credit already paid, in percent within `[0, 100]`.
pub fn paid_percentage(credit: &CreditAccount) -> Decimal {
    clamp_percent(percent_of(credit.paid(), credit.total()))
}

impl Periodicity {
    /// Approximate charge per month: four weeks to a month, twelve months to
    /// a year. Unknown cadences count as monthly.
    pub fn monthly_amount(&self, amount: Decimal) -> Decimal {
        match self {
            Periodicity::Weekly => amount.saturating_mul(Decimal::from(4)),
            Periodicity::Annual => amount / Decimal::from(12),
            Periodicity::Monthly | Periodicity::Other(_) => amount,
        }
    }
}

/// Monthly cost of all active services. Inactive services are filtered out
/// before prorating.
pub fn monthly_equivalent(services: &[RecurringService]) -> Decimal {
    total(
        services
            .iter()
            .filter(|s| s.active)
            .map(|s| s.periodicity.monthly_amount(s.amount())),
    )
}

/// Percentage of the category's budget already spent, within `[0, 100]`.
/// A category with no positive budget reports zero.
pub fn budget_utilization(category: &BudgetCategory) -> Decimal {
    clamp_percent(percent_of(category.spent(), category.budgeted()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BudgetTotals {
    pub budgeted: Decimal,
    pub spent: Decimal,
}

pub fn budget_totals(categories: &[BudgetCategory]) -> BudgetTotals {
    BudgetTotals {
        budgeted: sum_amount(categories, |c| c.budgeted_amount),
        spent: sum_amount(categories, |c| c.spent_amount),
    }
}

/// Estimated cost of the gifts still to buy.
pub fn pending_gift_total(items: &[GiftItem]) -> Decimal {
    total(items.iter().filter(|g| !g.purchased).map(GiftItem::price))
}

pub fn wallet_total(accounts: &[WalletAccount]) -> Decimal {
    total(accounts.iter().map(WalletAccount::balance))
}

/// Net over income, in percent. Zero when there is no income; negative when
/// expenses exceed it.
pub fn savings_rate(income_total: Decimal, expense_total: Decimal) -> Decimal {
    percent_of(income_total.saturating_sub(expense_total), income_total)
}

/// Case-insensitive substring search over a record's description. An empty
/// query keeps every record.
pub fn filter_by_description<'a, T, F>(records: &'a [T], query: &str, text: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<&str>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| text(*r).is_some_and(|t| t.to_lowercase().contains(&needle)))
        .collect()
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Amounts bucketed by `YYYY-MM`, in the order each month was first seen.
///
/// Lookups are by key; callers that chart the result pick and order the
/// months themselves (see [`month_window`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    entries: Vec<(String, Decimal)>,
}

impl MonthTotals {
    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn add(&mut self, key: String, amount: Decimal) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, sum)) => *sum = sum.saturating_add(amount),
            None => self.entries.push((key, amount)),
        }
    }
}

pub fn group_by_month<T, D, A>(records: &[T], date: D, amount: A) -> MonthTotals
where
    D: Fn(&T) -> Option<NaiveDate>,
    A: Fn(&T) -> Option<Decimal>,
{
    let mut out = MonthTotals::default();
    for r in records {
        let key = date(r).map(month_key).unwrap_or_else(|| UNDATED_KEY.to_string());
        out.add(key, amount(r).unwrap_or(Decimal::ZERO));
    }
    out
}

/// The `months` calendar months ending with the month of `now`, oldest first,
/// each with its total from `totals` (zero when absent).
pub fn month_window(totals: &MonthTotals, now: NaiveDate, months: usize) -> Vec<(String, Decimal)> {
    let Some(first_of_month) = now.with_day(1) else {
        return Vec::new();
    };
    (0..months)
        .rev()
        .filter_map(|back| first_of_month.checked_sub_months(Months::new(back as u32)))
        .map(|d| {
            let key = month_key(d);
            let total = totals.get(&key).unwrap_or(Decimal::ZERO);
            (key, total)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

fn month_label(month: Option<i64>, year: Option<i64>) -> String {
    let name = month
        .and_then(|m| u8::try_from(m).ok())
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name()[..3].to_string());
    match (name, year) {
        (Some(n), Some(y)) => format!("{} {}", n, y),
        (Some(n), None) => n,
        (None, _) => "?".to_string(),
    }
}

/// Chart points for precomputed monthly snapshots, in input order.
pub fn snapshot_series(snapshots: &[MonthlyBalanceSnapshot]) -> Vec<ChartPoint> {
    snapshots
        .iter()
        .map(|s| ChartPoint {
            label: month_label(s.month, s.year),
            income: s.total_income.unwrap_or(Decimal::ZERO),
            expense: s.total_expense.unwrap_or(Decimal::ZERO),
            balance: s.balance.unwrap_or(Decimal::ZERO),
        })
        .collect()
}

/// Headline figures of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub savings_rate: Decimal,
}

impl DashboardSummary {
    pub fn compute(income: &[IncomeRecord], expenses: &[ExpenseRecord]) -> Self {
        let total_income = total_income(income);
        let total_expenses = total_expenses(expenses);
        Self {
            total_income,
            total_expenses,
            balance: total_income.saturating_sub(total_expenses),
            savings_rate: savings_rate(total_income, total_expenses),
        }
    }
}

/// The cards of the balance view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BalanceOverview {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    pub reserve: Decimal,
    pub pending_debt: Decimal,
    pub services_monthly: Decimal,
}

impl BalanceOverview {
    pub fn compute(
        income: &[IncomeRecord],
        expenses: &[ExpenseRecord],
        reserve: &[ReserveMovement],
        credits: &[CreditAccount],
        services: &[RecurringService],
    ) -> Self {
        let income_total = total_income(income);
        let expense_total = total_expenses(expenses);
        Self {
            income: income_total,
            expenses: expense_total,
            net: income_total.saturating_sub(expense_total),
            reserve: reserve_total(reserve),
            pending_debt: pending_debt(credits),
            services_monthly: monthly_equivalent(services),
        }
    }
}
