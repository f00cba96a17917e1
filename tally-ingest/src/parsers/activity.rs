//! Account-activity table parser.
//!
//! Row shape after PDF-to-text:
//!   04/12/2024 Express Checkout Payment USD-25.00 USDID: 4XJ2 USD-1.05-26.05
//! i.e. date, description, 3-letter currency glued to the amount, an ID
//! span, then fee and running total glued to `USD`. The row total is the
//! transaction amount.

use regex::Regex;
use std::sync::OnceLock;
use tally_core::RawTransaction;

use crate::parsers::StatementParser;
use crate::types::ExtractedDocument;

fn activity_row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?P<date>\d{2}/\d{2}/\d{4})",
            r"\s+(?P<desc>.*?)",
            r"\s+(?P<currency>[A-Z]{3})",
            r"(?P<amount>-?\d+\.\d{2})",
            r"\s+USDID:\s+.*?",
            r"USD(?P<fee>-?\d+\.\d{2})",
            r"(?P<total>-?\d+\.\d{2})"
        ))
        .expect("activity row regex")
    })
}

pub struct ActivityParser;

impl StatementParser for ActivityParser {
    fn name(&self) -> &'static str {
        "activity"
    }

    fn try_parse(&self, doc: &ExtractedDocument) -> Option<Vec<RawTransaction>> {
        let rows: Vec<RawTransaction> = doc
            .lines
            .iter()
            .filter_map(|l| activity_row_re().captures(&l.text))
            .map(|caps| {
                RawTransaction::new(
                    caps["date"].to_string(),
                    caps["desc"].trim().to_string(),
                    caps["total"].to_string(),
                    "Bank",
                )
            })
            .collect();

        // The row regex is the content marker: no matching line, no claim
        // on the document.
        if rows.is_empty() { None } else { Some(rows) }
    }
}
