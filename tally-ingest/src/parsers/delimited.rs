//! Delimited-text ledgers: `date,description,amount`, one record per line,
//! with an optional header row.

use tally_core::RawTransaction;

use crate::parsers::StatementParser;
use crate::types::{DocumentKind, ExtractedDocument};

pub struct DelimitedParser;

impl StatementParser for DelimitedParser {
    fn name(&self) -> &'static str {
        "delimited"
    }

    fn try_parse(&self, doc: &ExtractedDocument) -> Option<Vec<RawTransaction>> {
        if doc.kind != DocumentKind::Csv {
            return None;
        }

        let text = doc.text();
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_reader(text.as_bytes());

        let mut out = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let Ok(record) = result else { continue };
            let date = record.get(0).unwrap_or("").trim();
            let description = record.get(1).unwrap_or("").trim();
            let amount = record.get(2).unwrap_or("").trim();

            // Header row, if any, leads with a "date" label.
            if i == 0 && date.eq_ignore_ascii_case("date") {
                continue;
            }
            if date.is_empty() || amount.is_empty() {
                continue;
            }
            out.push(RawTransaction::new(date, description, amount, "Generic"));
        }
        Some(out)
    }
}
