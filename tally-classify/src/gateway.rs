//! Batch gateway: raw transactions in, canonical transactions out.
//!
//! One service call per batch, a minimum delay between calls, and
//! best-effort recovery of whatever the reply contains. A failed or
//! unparseable batch is a diagnostic, never a fatal error; a record with a
//! missing or unknown category is coerced to Uncertain Expenses rather
//! than dropped.

use serde_json::Value;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use tally_core::{Category, RawTransaction, RunReport, Transaction};

use crate::json_extract::extract_json_objects;
use crate::service::ClassificationService;

pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_INTER_CALL_DELAY_MS: u64 = 1000;

pub struct ClassifierGateway<S> {
    service: S,
    batch_size: usize,
    inter_call_delay: Duration,
}

impl<S: ClassificationService> ClassifierGateway<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            batch_size: DEFAULT_BATCH_SIZE,
            inter_call_delay: Duration::from_millis(DEFAULT_INTER_CALL_DELAY_MS),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_inter_call_delay(mut self, delay: Duration) -> Self {
        self.inter_call_delay = delay;
        self
    }

    /// Classify all records, one service call per batch. Returns whatever
    /// could be recovered; everything lost is accounted for in `report`.
    pub fn classify(&self, raw: &[RawTransaction], report: &mut RunReport) -> Vec<Transaction> {
        let mut out = Vec::new();

        for (i, batch) in raw.chunks(self.batch_size).enumerate() {
            if i > 0 && !self.inter_call_delay.is_zero() {
                thread::sleep(self.inter_call_delay);
            }

            report.batches_sent += 1;
            let prompt = build_prompt(batch);
            let reply = match self.service.complete(&prompt) {
                Ok(r) => r,
                Err(e) => {
                    warn!(batch = i, "classification call failed: {e}");
                    report.batches_failed += 1;
                    report.warn(format!("batch {i}: classification call failed: {e}"));
                    continue;
                }
            };

            let objects = extract_json_objects(&reply);
            if objects.is_empty() {
                warn!(batch = i, "reply contained no valid records");
                report.batches_failed += 1;
                report.warn(format!("batch {i}: reply contained no valid records"));
                continue;
            }

            info!(batch = i, records = objects.len(), "parsed classification reply");
            for obj in objects {
                if let Some(t) = record_from_value(&obj, batch, report) {
                    out.push(t);
                }
            }
        }

        out
    }
}

/// Templated instruction plus the JSON-serialized batch.
fn build_prompt(batch: &[RawTransaction]) -> String {
    let payload = serde_json::to_string(batch).expect("raw transactions serialize");
    format!(
        "Please note: I don't want code! Take this transaction data and return one JSON \
         object per transaction with the keys Date, Description, Amount, Category and \
         Source. Category must be exactly one of: Income, Expenses, Business Expenses, \
         Tax Deductible Expenses, Subscriptions, Uncertain Expenses. Analyze each \
         description to pick the category. Never return null for any key, and cover the \
         whole data, don't skip anything.\n{payload}"
    )
}

fn field<'a>(obj: &'a Value, key: &str) -> Option<&'a Value> {
    obj.get(key)
        .or_else(|| obj.get(key.to_ascii_lowercase()))
        .filter(|v| !v.is_null())
}

fn field_string(obj: &Value, key: &str) -> Option<String> {
    match field(obj, key)? {
        Value::String(s) => Some(s.clone()),
        // Models sometimes emit the amount as a bare number.
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Map one reply object to a canonical transaction.
///
/// Missing/unknown category coerces to Uncertain Expenses. A date or
/// amount that survives no normalization rejects the record, with a
/// diagnostic, never silently.
fn record_from_value(
    obj: &Value,
    batch: &[RawTransaction],
    report: &mut RunReport,
) -> Option<Transaction> {
    let description = field_string(obj, "Description").unwrap_or_default();

    let category = match field_string(obj, "Category").as_deref().map(Category::parse) {
        Some(Some(c)) => c,
        parsed => {
            report.records_coerced += 1;
            let label = if parsed.is_none() { "missing" } else { "unknown" };
            report.warn(format!(
                "record '{description}': {label} category, coerced to Uncertain Expenses"
            ));
            Category::UncertainExpenses
        }
    };

    let source = field_string(obj, "Source")
        .or_else(|| {
            batch
                .iter()
                .find(|r| r.description.trim().eq_ignore_ascii_case(description.trim()))
                .map(|r| r.source.clone())
        })
        .unwrap_or_else(|| "Unknown".to_string());

    let date = field_string(obj, "Date").unwrap_or_default();
    let amount = field_string(obj, "Amount").unwrap_or_default();

    match Transaction::from_fields(&date, &amount, description.clone(), category, source) {
        Ok(t) => {
            report.records_classified += 1;
            Some(t)
        }
        Err(e) => {
            warn!("rejecting classified record '{description}': {e}");
            report.records_rejected += 1;
            report.warn(format!("record '{description}' rejected: {e}"));
            None
        }
    }
}
