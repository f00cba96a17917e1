//! Orchestration: ingest → dedupe → classify → merge → save, then the
//! aggregation pass. Per-document and per-batch problems end up in the run
//! report; only store failures abort.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

use tally_classify::{ClassificationService, ClassifierGateway};
use tally_core::{AccountBalance, Error, Ledger, RunReport, dedupe, report};
use tally_ingest::{
    DocumentKind, READ_SUFFIX, default_parsers, extract_document, ingest_directory, parse_document,
};

/// Dry run: show which parser claims each document and how many rows it
/// would yield. Touches nothing.
pub fn extract_preview(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("input directory not found: {}", dir.display());
    }

    let mut paths: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let parsers = default_parsers();
    for path in paths {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if name.ends_with(READ_SUFFIX) {
            println!("{name}: already read");
            continue;
        }
        let doc = match extract_document(&path) {
            Ok(d) => d,
            Err(e) => {
                println!("{name}: unreadable ({e})");
                continue;
            }
        };
        if doc.kind == DocumentKind::Unsupported {
            continue;
        }
        match parse_document(&parsers, &doc) {
            Some((parser, rows)) => println!("{name}: parser={parser} rows={}", rows.len()),
            None => println!("{name}: no parser matched"),
        }
    }
    Ok(())
}

/// Full processing pass. The ledger is read, merged, and saved once; if
/// nothing was extracted or classified it is left untouched.
pub fn process<S: ClassificationService>(
    dir: &Path,
    ledger_path: &Path,
    gateway: &ClassifierGateway<S>,
    mark_read: bool,
    run: &mut RunReport,
) -> Result<()> {
    let raw = ingest_directory(dir, mark_read, run)?;
    let raw = dedupe(raw);
    if raw.is_empty() {
        println!("No new transactions found under {}", dir.display());
        return Ok(());
    }
    println!("Extracted {} distinct transactions", raw.len());

    let txns = gateway.classify(&raw, run);
    if txns.is_empty() {
        println!("Classification produced no records; ledger left untouched");
        return Ok(());
    }

    let mut ledger = Ledger::load_or_default(ledger_path)?;
    ledger.append_transactions(&txns);
    ledger.save(ledger_path)?;
    println!(
        "Merged {} classified transactions into {}",
        txns.len(),
        ledger_path.display()
    );
    Ok(())
}

/// Aggregation pass: weekly buckets + summary + account balances, written
/// back as report sheets. A ledger without both Income and expense rows is
/// reported, not an error.
pub fn balances(ledger_path: &Path, accounts: &[AccountBalance]) -> Result<()> {
    let mut ledger = Ledger::load(ledger_path)?;

    let agg = match report::aggregate(&ledger, accounts) {
        Ok(agg) => agg,
        Err(Error::InsufficientAggregationData) => {
            println!("Insufficient data: the ledger needs both Income and expense rows");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    report::write_reports(&mut ledger, &agg, accounts);
    ledger.save(ledger_path)?;

    println!("Weekly balances:");
    for w in &agg.weekly {
        println!(
            "  {}  income={:>10}  expenses={:>10}  balance={:>10}",
            w.week_start, w.income, w.expenses, w.balance
        );
    }
    let s = &agg.summary;
    println!("Summary:");
    println!("  Total Income:           {}", s.total_income);
    println!("  Total Expenses:         {}", s.total_expenses);
    println!("  Net Income:             {}", s.net_income);
    println!("  Total Account Balances: {}", s.total_account_balances);
    println!("  Available Budget:       {}", s.available_budget);
    println!("  Daily Budget:           {}", s.daily_budget);
    println!("  Weekly Budget:          {}", s.weekly_budget);
    println!("  Yearly Budget:          {}", s.yearly_budget);
    println!("Reports written to {}", ledger_path.display());
    Ok(())
}
