//! Generic fallback: `date description amount` separated by whitespace.
//! Tried last; claims any document and keeps whichever lines fit.

use regex::Regex;
use std::sync::OnceLock;
use tally_core::RawTransaction;

use crate::parsers::StatementParser;
use crate::types::ExtractedDocument;

fn generic_row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<date>\d{4}-\d{2}-\d{2}|\d{2}/\d{2}/\d{2,4})\s+",
            r"(?P<desc>.+?)\s+",
            r"(?P<amount>[$€£]?-?[\d,]+\.\d{2}-?)$"
        ))
        .expect("generic row regex")
    })
}

pub struct GenericParser;

impl StatementParser for GenericParser {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn try_parse(&self, doc: &ExtractedDocument) -> Option<Vec<RawTransaction>> {
        let rows = doc
            .lines
            .iter()
            .filter_map(|l| generic_row_re().captures(l.text.trim()))
            .map(|caps| {
                RawTransaction::new(
                    caps["date"].to_string(),
                    caps["desc"].to_string(),
                    caps["amount"].to_string(),
                    "Generic",
                )
            })
            .collect();
        Some(rows)
    }
}
