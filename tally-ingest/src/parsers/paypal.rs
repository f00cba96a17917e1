//! PayPal statement parser.
//!
//! Two layouts: the "Transaction History - USD" table with gross/fee/net
//! columns (amount taken from net, description truncated at the `ID:`
//! marker), and the older line layout `MM/DD/YYYY description ... total`.

use regex::Regex;
use std::sync::OnceLock;
use tally_core::RawTransaction;

use crate::parsers::StatementParser;
use crate::types::ExtractedDocument;

const HISTORY_MARKER: &str = "Transaction History - USD";

fn history_row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // date  description  gross  fee  net
        Regex::new(concat!(
            r"(?P<date>\d{2}/\d{2}/\d{2,4})\s+",
            r"(?P<desc>.+?)\s+",
            r"(?P<gross>[-.\d,]+)\s+",
            r"(?P<fee>[-.\d,]+)\s+",
            r"(?P<net>[-.\d,]+)"
        ))
        .expect("history row regex")
    })
}

fn legacy_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}/\d{2}/\d{4}").expect("legacy start regex"))
}

pub struct PayPalParser;

impl StatementParser for PayPalParser {
    fn name(&self) -> &'static str {
        "paypal"
    }

    fn try_parse(&self, doc: &ExtractedDocument) -> Option<Vec<RawTransaction>> {
        let text = doc.text();
        let named = doc.id.to_ascii_lowercase().contains("paypal");
        if !named && !text.contains(HISTORY_MARKER) {
            return None;
        }

        let rows = if let Some(idx) = text.find(HISTORY_MARKER) {
            parse_history_section(&text[idx + HISTORY_MARKER.len()..])
        } else {
            parse_legacy_lines(&text)
        };
        Some(rows)
    }
}

fn parse_history_section(section: &str) -> Vec<RawTransaction> {
    history_row_re()
        .captures_iter(section)
        .map(|caps| {
            let desc = caps["desc"]
                .split("ID:")
                .next()
                .unwrap_or("")
                .trim()
                .to_string();
            RawTransaction::new(caps["date"].to_string(), desc, caps["net"].to_string(), "PayPal")
        })
        .collect()
}

fn parse_legacy_lines(text: &str) -> Vec<RawTransaction> {
    let mut out = Vec::new();
    for line in text.lines() {
        if !legacy_start_re().is_match(line) {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }
        let date = parts[0];
        let description = parts[1..parts.len() - 2].join(" ");
        let total = parts[parts.len() - 1];
        out.push(RawTransaction::new(date, description, total, "PayPal"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocumentKind, RawLine};

    fn doc(id: &str, text: &str) -> ExtractedDocument {
        let lines = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| RawLine {
                doc_id: id.to_string(),
                page: 0,
                line: i,
                text: l.to_string(),
            })
            .collect();
        ExtractedDocument {
            id: id.to_string(),
            kind: DocumentKind::Pdf,
            lines,
        }
    }

    #[test]
    fn test_history_section_uses_net_amount() {
        let d = doc(
            "statement.pdf",
            "Some preamble\n\
             Transaction History - USD\n\
             04/02/2024 Payment received ID: 7XK12 100.00 -3.20 96.80\n\
             04/05/2024 Web purchase 25.00 0.00 25.00\n",
        );
        let rows = PayPalParser.try_parse(&d).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].description, "Payment received");
        assert_eq!(rows[0].amount, "96.80");
        assert_eq!(rows[0].source, "PayPal");
    }

    #[test]
    fn test_legacy_layout_by_filename() {
        let d = doc(
            "paypal_feb.pdf",
            "02/10/2024 Marketplace payout fee 12.00 110.50\nheader junk\n",
        );
        let rows = PayPalParser.try_parse(&d).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "02/10/2024");
        assert_eq!(rows[0].description, "Marketplace payout fee");
        assert_eq!(rows[0].amount, "110.50");
    }

    #[test]
    fn test_no_marker_no_name_does_not_match() {
        let d = doc("other.pdf", "04/02/2024 whatever 1.00 2.00 3.00\n");
        assert!(PayPalParser.try_parse(&d).is_none());
    }
}
