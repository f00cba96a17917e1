//! Balance aggregation: weekly buckets and the summary totals, recomputed in
//! full from the category sheets on every run. Sheet membership decides
//! direction, so sums are taken over absolute magnitudes.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::category::Category;
use crate::date::format_date;
use crate::error::{Error, Result};
use crate::ledger::{BALANCES_SHEET, BALANCE_SUMMARY_SHEET, Ledger, WEEKLY_BUDGET_SHEET};
use crate::txn::Transaction;

/// Derived 7-day bucket `[week_start, week_start + 6]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyBalance {
    pub week_start: NaiveDate,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

/// User-supplied external account snapshot, merged into the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    pub account: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
    pub total_account_balances: Decimal,
    pub available_budget: Decimal,
    pub daily_budget: Decimal,
    pub weekly_budget: Decimal,
    pub yearly_budget: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub weekly: Vec<WeeklyBalance>,
    pub summary: BalanceSummary,
}

fn magnitude_sum<'a>(txns: impl Iterator<Item = &'a Transaction>) -> Decimal {
    txns.fold(Decimal::ZERO, |acc, t| acc + t.amount.abs())
}

fn in_week(t: &Transaction, start: NaiveDate, end: NaiveDate) -> bool {
    t.date >= start && t.date <= end
}

/// Aggregate the ledger's Income sheet against every expense-class sheet.
/// Short-circuits with `InsufficientAggregationData` when either side has no
/// rows at all; the date range over an empty set is undefined.
pub fn aggregate(ledger: &Ledger, accounts: &[AccountBalance]) -> Result<Aggregation> {
    let income = ledger.category_transactions(Category::Income);
    let expenses: Vec<Transaction> = Category::ALL
        .iter()
        .filter(|c| c.is_expense())
        .flat_map(|c| ledger.category_transactions(*c))
        .collect();

    if income.is_empty() || expenses.is_empty() {
        return Err(Error::InsufficientAggregationData);
    }

    let weekly = weekly_balances(&income, &expenses);
    let summary = balance_summary(&income, &expenses, accounts);
    Ok(Aggregation { weekly, summary })
}

/// 7-day buckets from the earliest combined date through the latest,
/// inclusive on both ends. Empty weeks are kept.
fn weekly_balances(income: &[Transaction], expenses: &[Transaction]) -> Vec<WeeklyBalance> {
    let dates = || income.iter().chain(expenses.iter()).map(|t| t.date);
    let (Some(start), Some(end)) = (dates().min(), dates().max()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut current = start;
    while current <= end {
        let week_end = current + Duration::days(6);
        let week_income = magnitude_sum(income.iter().filter(|t| in_week(t, current, week_end)));
        let week_expenses =
            magnitude_sum(expenses.iter().filter(|t| in_week(t, current, week_end)));
        out.push(WeeklyBalance {
            week_start: current,
            income: week_income,
            expenses: week_expenses,
            balance: week_income - week_expenses,
        });
        current = current + Duration::days(7);
    }
    out
}

fn balance_summary(
    income: &[Transaction],
    expenses: &[Transaction],
    accounts: &[AccountBalance],
) -> BalanceSummary {
    let total_income = magnitude_sum(income.iter());
    let total_expenses = magnitude_sum(expenses.iter());
    let net_income = total_income - total_expenses;
    let total_account_balances = accounts
        .iter()
        .fold(Decimal::ZERO, |acc, a| acc + a.amount);

    let base = net_income + total_account_balances;
    BalanceSummary {
        total_income,
        total_expenses,
        net_income,
        total_account_balances,
        available_budget: base.round_dp(2),
        daily_budget: (base / Decimal::from(365)).round_dp(2),
        weekly_budget: (base / Decimal::from(52)).round_dp(2),
        yearly_budget: base.round_dp(2),
    }
}

/// Write the three derived report sheets. Category sheets are read-only here.
pub fn write_reports(ledger: &mut Ledger, agg: &Aggregation, accounts: &[AccountBalance]) {
    let weekly_rows = agg
        .weekly
        .iter()
        .map(|w| {
            vec![
                format_date(w.week_start),
                w.income.to_string(),
                w.expenses.to_string(),
                w.balance.to_string(),
            ]
        })
        .collect();
    ledger.replace_report_sheet(
        WEEKLY_BUDGET_SHEET,
        &["Week Start", "Income", "Expenses", "Balance"],
        weekly_rows,
    );

    let s = &agg.summary;
    let summary_rows = vec![
        ("Total Income", s.total_income),
        ("Total Expenses", s.total_expenses),
        ("Net Income", s.net_income),
        ("Total Account Balances", s.total_account_balances),
        ("Available Budget", s.available_budget),
        ("Daily Budget", s.daily_budget),
        ("Weekly Budget", s.weekly_budget),
        ("Yearly Budget", s.yearly_budget),
    ]
    .into_iter()
    .map(|(label, amount)| vec![label.to_string(), amount.to_string()])
    .collect();
    ledger.replace_report_sheet(BALANCE_SUMMARY_SHEET, &["Description", "Amount"], summary_rows);

    let account_rows = accounts
        .iter()
        .map(|a| vec![a.account.clone(), a.amount.to_string()])
        .collect();
    ledger.replace_report_sheet(BALANCES_SHEET, &["Account Type", "Amount"], account_rows);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn txn(date: &str, amount: &str, cat: Category) -> Transaction {
        Transaction::from_fields(date, amount, "test", cat, "Bank").unwrap()
    }

    fn ledger_with(txns: &[Transaction]) -> Ledger {
        let mut ledger = Ledger::new();
        ledger.append_transactions(txns);
        ledger
    }

    #[test]
    fn test_single_week_example() {
        let ledger = ledger_with(&[
            txn("2024-01-01", "100", Category::Income),
            txn("2024-01-03", "40", Category::Expenses),
        ]);
        let agg = aggregate(&ledger, &[]).unwrap();

        assert_eq!(agg.weekly.len(), 1);
        let week = &agg.weekly[0];
        assert_eq!(week.week_start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(week.income, dec!(100));
        assert_eq!(week.expenses, dec!(40));
        assert_eq!(week.balance, dec!(60));
    }

    #[test]
    fn test_buckets_cover_range_including_empty_weeks() {
        let ledger = ledger_with(&[
            txn("2024-01-01", "100", Category::Income),
            txn("2024-01-20", "30", Category::Expenses),
        ]);
        let agg = aggregate(&ledger, &[]).unwrap();

        // Jan 1..=Jan 20 spans three 7-day buckets; the middle one is empty.
        assert_eq!(agg.weekly.len(), 3);
        assert_eq!(agg.weekly[1].income, Decimal::ZERO);
        assert_eq!(agg.weekly[1].expenses, Decimal::ZERO);
        assert_eq!(agg.weekly[2].expenses, dec!(30));
    }

    #[test]
    fn test_expenses_include_all_non_income_sheets() {
        let ledger = ledger_with(&[
            txn("2024-01-01", "100", Category::Income),
            txn("2024-01-02", "10", Category::Expenses),
            txn("2024-01-02", "20", Category::BusinessExpenses),
            txn("2024-01-02", "5", Category::Subscriptions),
        ]);
        let agg = aggregate(&ledger, &[]).unwrap();
        assert_eq!(agg.summary.total_expenses, dec!(35));
        assert_eq!(agg.weekly[0].expenses, dec!(35));
    }

    #[test]
    fn test_sign_stripped_by_sheet_membership() {
        // Expense rows stored with negative amounts still count by magnitude.
        let ledger = ledger_with(&[
            txn("2024-01-01", "100", Category::Income),
            txn("2024-01-02", "40.00-", Category::Expenses),
        ]);
        let agg = aggregate(&ledger, &[]).unwrap();
        assert_eq!(agg.weekly[0].balance, dec!(60));
    }

    #[test]
    fn test_summary_budgets_from_net_plus_balances() {
        let ledger = ledger_with(&[
            txn("2024-01-01", "465", Category::Income),
            txn("2024-01-02", "100", Category::Expenses),
        ]);
        let accounts = vec![AccountBalance {
            account: "Checking".into(),
            amount: dec!(365),
        }];
        let agg = aggregate(&ledger, &accounts).unwrap();

        let s = &agg.summary;
        assert_eq!(s.net_income, dec!(365));
        assert_eq!(s.total_account_balances, dec!(365));
        assert_eq!(s.available_budget, dec!(730));
        assert_eq!(s.daily_budget, dec!(2)); // 730 / 365
        assert_eq!(s.weekly_budget, dec!(14.04)); // 730 / 52, 2dp
        assert_eq!(s.yearly_budget, dec!(730));
    }

    #[test]
    fn test_empty_ledger_is_insufficient() {
        let err = aggregate(&Ledger::new(), &[]).unwrap_err();
        assert!(matches!(err, Error::InsufficientAggregationData));
    }

    #[test]
    fn test_income_without_expenses_is_insufficient() {
        let ledger = ledger_with(&[txn("2024-01-01", "100", Category::Income)]);
        let err = aggregate(&ledger, &[]).unwrap_err();
        assert!(matches!(err, Error::InsufficientAggregationData));
    }

    #[test]
    fn test_write_reports_replaces_wholesale() {
        let mut ledger = ledger_with(&[
            txn("2024-01-01", "100", Category::Income),
            txn("2024-01-03", "40", Category::Expenses),
        ]);
        let agg = aggregate(&ledger, &[]).unwrap();
        write_reports(&mut ledger, &agg, &[]);
        write_reports(&mut ledger, &agg, &[]);

        let weekly = ledger.sheet(WEEKLY_BUDGET_SHEET).unwrap();
        assert_eq!(weekly.rows.len(), 1);
        assert_eq!(weekly.rows[0][0], "2024-01-01");
        // Category sheets untouched by report writing.
        assert_eq!(ledger.sheet("Income").unwrap().rows.len(), 1);
    }
}
