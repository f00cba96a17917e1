//! The ledger store: named sheets persisted as one JSON document.
//!
//! Category sheets hold classified rows under a fixed header; report sheets
//! are derived wholesale by the aggregator. The whole document is saved in a
//! single atomic operation per run (write to a temp file, fsync, rename)
//! so the caller sees either the prior store or the fully updated one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::warn;

use crate::category::Category;
use crate::dedupe::dedupe;
use crate::error::{Error, Result};
use crate::txn::Transaction;

/// Fixed header of every category sheet.
pub const CLASSIFIED_HEADER: [&str; 4] = ["Date", "Amount", "Description", "Source"];

pub const WEEKLY_BUDGET_SHEET: &str = "Weekly Budget";
pub const BALANCE_SUMMARY_SHEET: &str = "Balance Summary";
pub const BALANCES_SHEET: &str = "Balances";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    fn with_header(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ledger {
    sheets: BTreeMap<String, Sheet>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a ledger; a missing file is a store failure.
    pub fn load(path: &Path) -> Result<Ledger> {
        if !path.exists() {
            return Err(Error::LedgerIo(format!("not found: {}", path.display())));
        }
        let file = File::open(path)
            .map_err(|e| Error::LedgerIo(format!("open {}: {e}", path.display())))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::LedgerIo(format!("parse {}: {e}", path.display())))
    }

    /// Load a ledger, starting empty if the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Ledger> {
        if !path.exists() {
            return Ok(Ledger::new());
        }
        Ledger::load(path)
    }

    /// Atomic save: either the whole updated store lands on disk or the
    /// prior store is left untouched.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::LedgerIo(format!("create {}: {e}", parent.display())))?;
            }
        }

        let tmp = path.with_extension("tmp");
        let file = File::create(&tmp)
            .map_err(|e| Error::LedgerIo(format!("create {}: {e}", tmp.display())))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| Error::LedgerIo(format!("serialize ledger: {e}")))?;
        writer
            .flush()
            .map_err(|e| Error::LedgerIo(format!("flush {}: {e}", tmp.display())))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| Error::LedgerIo(format!("sync {}: {e}", tmp.display())))?;

        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            Error::LedgerIo(format!("rename into {}: {e}", path.display()))
        })
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    /// Merge classified transactions into their category sheets. Sheets are
    /// created with the fixed header on first use; after appending, each
    /// touched sheet is deduplicated across existing plus new rows, so
    /// re-merging the same records never grows the store.
    pub fn append_transactions(&mut self, txns: &[Transaction]) {
        let mut touched: Vec<&'static str> = Vec::new();
        for t in txns {
            let name = t.category.sheet_name();
            let sheet = self
                .sheets
                .entry(name.to_string())
                .or_insert_with(|| Sheet::with_header(&CLASSIFIED_HEADER));
            sheet.rows.push(t.to_row());
            if !touched.contains(&name) {
                touched.push(name);
            }
        }
        for name in touched {
            if let Some(sheet) = self.sheets.get_mut(name) {
                let rows = std::mem::take(&mut sheet.rows);
                let mut rows = dedupe(rows);
                rows.sort();
                sheet.rows = rows;
            }
        }
    }

    /// Replace a derived report sheet wholesale. Category sheets are never
    /// written through this path.
    pub fn replace_report_sheet(&mut self, name: &str, header: &[&str], rows: Vec<Vec<String>>) {
        let mut sheet = Sheet::with_header(header);
        sheet.rows = rows;
        self.sheets.insert(name.to_string(), sheet);
    }

    /// Re-parse a category sheet's rows into canonical transactions.
    /// Rows that no longer normalize are skipped with a warning.
    pub fn category_transactions(&self, category: Category) -> Vec<Transaction> {
        let Some(sheet) = self.sheets.get(category.sheet_name()) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            match Transaction::from_row(row, category) {
                Ok(t) => out.push(t),
                Err(e) => warn!(sheet = category.sheet_name(), ?row, "skipping ledger row: {e}"),
            }
        }
        out
    }
}
