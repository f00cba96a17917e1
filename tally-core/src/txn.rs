//! Transaction records: the unnormalized parser output and the canonical
//! classified form.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::normalize_amount;
use crate::category::Category;
use crate::date::{format_date, parse_date};
use crate::error::Result;

/// Candidate transaction as emitted by a statement parser. Fields are kept
/// as raw strings (date format and amount spelling vary by source) and the
/// record is immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RawTransaction {
    pub date: String,
    pub description: String,
    pub amount: String,
    /// Origin tag ("PayPal", "eBay", "Bank", ...).
    pub source: String,
}

impl RawTransaction {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: amount.into(),
            source: source.into(),
        }
    }
}

/// Canonical transaction. Constructed only through [`Transaction::from_fields`],
/// which enforces the date and amount invariants; corrections require
/// reprocessing, not mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    pub source: String,
}

impl Transaction {
    /// Build a canonical transaction from string fields, normalizing the
    /// date and amount. Fails if either matches no accepted form.
    pub fn from_fields(
        date: &str,
        amount: &str,
        description: impl Into<String>,
        category: Category,
        source: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            date: parse_date(date)?,
            amount: normalize_amount(amount)?,
            description: description.into(),
            category,
            source: source.into(),
        })
    }

    /// Ledger row under the `Date, Amount, Description, Source` schema.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            format_date(self.date),
            self.amount.to_string(),
            self.description.clone(),
            self.source.clone(),
        ]
    }

    /// Parse a ledger row written by [`Transaction::to_row`].
    pub fn from_row(row: &[String], category: Category) -> Result<Self> {
        let field = |i: usize| row.get(i).map(String::as_str).unwrap_or("");
        Transaction::from_fields(field(0), field(1), field(2), category, field(3))
    }
}
