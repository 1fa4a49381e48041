// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record types as they come back from the data store.
//!
//! Every numeric field is optional and decoded leniently: numbers, numeric
//! strings, `null` and absent fields are all accepted, and anything that
//! cannot be read as a decimal becomes `None`. The accessor methods turn
//! `None` into zero, so the aggregation code never sees a missing value.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

fn or_zero(v: Option<Decimal>) -> Decimal {
    v.unwrap_or(Decimal::ZERO)
}

pub mod lenient {
    use super::*;

    pub fn decimal<'de, D>(d: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            Some(Value::Number(n)) => n
                .to_string()
                .parse::<Decimal>()
                .ok()
                .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
            Some(Value::String(s)) => s.trim().parse::<Decimal>().ok(),
            _ => None,
        })
    }

    pub fn flag<'de, D>(d: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            Some(Value::Bool(b)) => b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "t" | "1" | "yes"
            ),
            _ => false,
        })
    }

    /// Accepts `YYYY-MM-DD` or any timestamp that starts with it.
    pub fn date<'de, D>(d: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            Some(Value::String(s)) => s
                .get(..10)
                .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()),
            _ => None,
        })
    }

    pub fn int<'de, D>(d: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        })
    }

    pub fn text<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
    }
}

/// Direction of a reserve fund movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovementType {
    Deposit,
    Withdrawal,
    /// Any other token; kept verbatim and ignored by the fund total.
    Other(String),
}

impl MovementType {
    pub fn as_str(&self) -> &str {
        match self {
            MovementType::Deposit => "deposito",
            MovementType::Withdrawal => "retiro",
            MovementType::Other(s) => s,
        }
    }
}

impl Default for MovementType {
    fn default() -> Self {
        MovementType::Other(String::new())
    }
}

impl From<&str> for MovementType {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "deposito" | "deposit" => MovementType::Deposit,
            "retiro" | "withdrawal" => MovementType::Withdrawal,
            _ => MovementType::Other(s.to_string()),
        }
    }
}

/// Billing cadence of a recurring service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Periodicity {
    Weekly,
    #[default]
    Monthly,
    Annual,
    /// Unrecognized cadence; prorated like a monthly charge.
    Other(String),
}

impl Periodicity {
    pub fn as_str(&self) -> &str {
        match self {
            Periodicity::Weekly => "semanal",
            Periodicity::Monthly => "mensual",
            Periodicity::Annual => "anual",
            Periodicity::Other(s) => s,
        }
    }
}

impl From<&str> for Periodicity {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "semanal" | "weekly" => Periodicity::Weekly,
            "mensual" | "monthly" => Periodicity::Monthly,
            "anual" | "annual" | "yearly" => Periodicity::Annual,
            _ => Periodicity::Other(s.to_string()),
        }
    }
}

macro_rules! token_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let v = Option::<Value>::deserialize(d)?;
                Ok(match v {
                    Some(Value::String(s)) => <$ty>::from(s.as_str()),
                    _ => <$ty>::default(),
                })
            }
        }
    };
}

token_serde!(MovementType);
token_serde!(Periodicity);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeRecord {
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl IncomeRecord {
    pub fn amount(&self) -> Decimal {
        or_zero(self.amount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    /// Free-form class such as `fijo` or `variable`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: String,
}

impl ExpenseRecord {
    pub fn amount(&self) -> Decimal {
        or_zero(self.amount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReserveMovement {
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub concept: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub movement_type: MovementType,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
}

impl ReserveMovement {
    pub fn amount(&self) -> Decimal {
        or_zero(self.amount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreditAccount {
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_balance: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub paid_balance: Option<Decimal>,
    /// Annual rate in percent.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub interest_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub due_date: Option<NaiveDate>,
}

impl CreditAccount {
    pub fn total(&self) -> Decimal {
        or_zero(self.total_balance)
    }

    pub fn paid(&self) -> Decimal {
        or_zero(self.paid_balance)
    }

    pub fn rate(&self) -> Decimal {
        or_zero(self.interest_rate)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecurringService {
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub periodicity: Periodicity,
    #[serde(default, deserialize_with = "lenient::date")]
    pub billing_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub active: bool,
}

impl RecurringService {
    pub fn amount(&self) -> Decimal {
        or_zero(self.amount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetCategory {
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub budgeted_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub spent_amount: Option<Decimal>,
}

impl BudgetCategory {
    pub fn budgeted(&self) -> Decimal {
        or_zero(self.budgeted_amount)
    }

    pub fn spent(&self) -> Decimal {
        or_zero(self.spent_amount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GiftItem {
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub estimated_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub purchased: bool,
}

impl GiftItem {
    pub fn price(&self) -> Decimal {
        or_zero(self.estimated_price)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyBalanceSnapshot {
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub month: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_income: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_expense: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub balance: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletAccount {
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub balance: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub currency: String,
}

impl WalletAccount {
    pub fn balance(&self) -> Decimal {
        or_zero(self.balance)
    }
}
