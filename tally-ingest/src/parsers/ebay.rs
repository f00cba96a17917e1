//! eBay order-summary parser.
//!
//! Orders are blocks introduced by "Order date:"; the date sits before the
//! first `•` delimiter, the amount on the "Order total:" line with a
//! `US $` prefix, and the remaining block lines form the description.

use tally_core::RawTransaction;

use crate::parsers::StatementParser;
use crate::types::ExtractedDocument;

const ORDER_MARKER: &str = "Order date:";
const TOTAL_MARKER: &str = "Order total:";

pub struct EbayParser;

impl StatementParser for EbayParser {
    fn name(&self) -> &'static str {
        "ebay"
    }

    fn try_parse(&self, doc: &ExtractedDocument) -> Option<Vec<RawTransaction>> {
        let text = doc.text();
        let named = doc.id.to_ascii_lowercase().contains("ebay");
        if !named && !text.contains(ORDER_MARKER) {
            return None;
        }

        let mut out = Vec::new();
        // First split element precedes the first order; skip it.
        for block in text.split(ORDER_MARKER).skip(1) {
            let lines: Vec<&str> = block.lines().collect();
            let Some(first) = lines.first() else { continue };
            let date = first.split('•').next().unwrap_or("").trim().to_string();
            if date.is_empty() {
                continue;
            }

            let total = lines
                .iter()
                .find(|l| l.contains(TOTAL_MARKER))
                .and_then(|l| l.split(TOTAL_MARKER).nth(1))
                .map(|t| t.replace("US $", ""))
                .map(|t| t.split('•').next().unwrap_or("").trim().to_string())
                .unwrap_or_default();

            let description = if lines.len() > 2 {
                lines[2..].join(" ").trim().to_string()
            } else {
                String::new()
            };

            out.push(RawTransaction::new(date, description, format!("${total}"), "eBay"));
        }
        Some(out)
    }
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
    fn test_parses_order_blocks() {
        let d = doc(
            "orders.pdf",
            "Purchase history\n\
             Order date: Mar 02, 2024 • Sold by gadgetshop\n\
             Order number: 11-22333\n\
             USB-C cable 2m\n\
             Order total: US $12.50\n\
             Order date: Mar 05, 2024 • Sold by bookstore\n\
             Order number: 11-22999\n\
             Paperback novel\n\
             Order total: US $8.00\n",
        );
        let rows = EbayParser.try_parse(&d).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "Mar 02, 2024");
        assert_eq!(rows[0].amount, "$12.50");
        assert!(rows[0].description.contains("USB-C cable"));
        assert_eq!(rows[1].source, "eBay");
    }

    #[test]
    fn test_filename_discriminator() {
        let d = doc("ebay_2024.pdf", "nothing relevant\n");
        // Matches by name, yields no rows.
        assert_eq!(EbayParser.try_parse(&d).unwrap().len(), 0);
    }

    #[test]
    fn test_unrelated_document_does_not_match() {
        let d = doc("bank.pdf", "2024-01-01 something 4.00\n");
        assert!(EbayParser.try_parse(&d).is_none());
    }
}
