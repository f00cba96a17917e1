//! End-to-end pipeline checks over synthetic text documents: ingest →
//! classify (stubbed service) → merge → aggregate.

use anyhow::Result;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

use tally_classify::{ClassificationService, ClassifierGateway};
use tally_core::{Category, Ledger, RunReport, dedupe, report};
use tally_ingest::ingest_directory;

/// Replays the same canned reply on every call.
struct FixedReply(String);

impl ClassificationService for FixedReply {
    fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

const REPLY: &str = r#"
{"Date":"2024-01-01","Description":"Client payout","Amount":"100.00","Category":"Income","Source":"Upwork"}
{"Date":"2024-01-03","Description":"Office supplies","Amount":"40.00","Category":"Expenses","Source":"Bank"}
"#;

fn write_inputs(dir: &TempDir) {
    fs::write(
        dir.path().join("ledger.csv"),
        "Date,Description,Amount\n2024-01-01,Client payout,100.00\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("bank.txt"),
        "2024-01-03 Office supplies 40.00\n",
    )
    .unwrap();
}

fn run_process(input: &TempDir, ledger_path: &std::path::Path) -> RunReport {
    let mut report = RunReport::new();
    let raw = ingest_directory(input.path(), false, &mut report).unwrap();
    let raw = dedupe(raw);

    let gateway = ClassifierGateway::new(FixedReply(REPLY.to_string()))
        .with_inter_call_delay(Duration::ZERO);
    let txns = gateway.classify(&raw, &mut report);

    let mut ledger = Ledger::load_or_default(ledger_path).unwrap();
    ledger.append_transactions(&txns);
    ledger.save(ledger_path).unwrap();
    report
}

#[test]
fn test_process_then_aggregate() {
    let input = TempDir::new().unwrap();
    let store = TempDir::new().unwrap();
    let ledger_path = store.path().join("ledger.json");
    write_inputs(&input);

    let report = run_process(&input, &ledger_path);
    assert_eq!(report.documents_processed, 2);
    assert_eq!(report.records_classified, 2);

    let mut ledger = Ledger::load(&ledger_path).unwrap();
    assert_eq!(ledger.category_transactions(Category::Income).len(), 1);
    assert_eq!(ledger.category_transactions(Category::Expenses).len(), 1);

    let agg = report::aggregate(&ledger, &[]).unwrap();
    assert_eq!(agg.weekly.len(), 1);
    assert_eq!(agg.weekly[0].balance.to_string(), "60.00");

    report::write_reports(&mut ledger, &agg, &[]);
    ledger.save(&ledger_path).unwrap();
    assert!(ledger.sheet("Weekly Budget").is_some());
    assert!(ledger.sheet("Balance Summary").is_some());
}

#[test]
fn test_rerun_on_unchanged_inputs_leaves_ledger_unchanged() {
    let input = TempDir::new().unwrap();
    let store = TempDir::new().unwrap();
    let ledger_path = store.path().join("ledger.json");
    write_inputs(&input);

    run_process(&input, &ledger_path);
    let first = Ledger::load(&ledger_path).unwrap();

    run_process(&input, &ledger_path);
    let second = Ledger::load(&ledger_path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_aggregate_without_expense_rows_is_insufficient() {
    let mut ledger = Ledger::new();
    let t = tally_core::Transaction::from_fields(
        "2024-01-01",
        "100.00",
        "Client payout",
        Category::Income,
        "Upwork",
    )
    .unwrap();
    ledger.append_transactions(&[t]);

    let err = report::aggregate(&ledger, &[]).unwrap_err();
    assert!(matches!(err, tally_core::Error::InsufficientAggregationData));
}
