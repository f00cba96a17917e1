//! The closed set of budget categories. Single source of truth: every
//! boundary that accepts a category string validates against this enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Budget classification assigned to every transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Income")]
    Income,
    #[serde(rename = "Expenses")]
    Expenses,
    #[serde(rename = "Business Expenses")]
    BusinessExpenses,
    #[serde(rename = "Tax Deductible Expenses")]
    TaxDeductibleExpenses,
    #[serde(rename = "Subscriptions")]
    Subscriptions,
    #[serde(rename = "Uncertain Expenses")]
    UncertainExpenses,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Income,
        Category::Expenses,
        Category::BusinessExpenses,
        Category::TaxDeductibleExpenses,
        Category::Subscriptions,
        Category::UncertainExpenses,
    ];

    /// Ledger sheet name for this category.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Category::Income => "Income",
            Category::Expenses => "Expenses",
            Category::BusinessExpenses => "Business Expenses",
            Category::TaxDeductibleExpenses => "Tax Deductible Expenses",
            Category::Subscriptions => "Subscriptions",
            Category::UncertainExpenses => "Uncertain Expenses",
        }
    }

    /// Parse a category label, case-insensitively, trimming whitespace.
    /// Returns None for anything outside the closed set.
    pub fn parse(s: &str) -> Option<Category> {
        let s = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.sheet_name().eq_ignore_ascii_case(s))
    }

    /// Every category other than Income counts toward expense totals.
    pub fn is_expense(&self) -> bool {
        !matches!(self, Category::Income)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}
