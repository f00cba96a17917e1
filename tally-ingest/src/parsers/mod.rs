//! Statement parsers, tried in a fixed priority order: specific named
//! formats first, the generic `date description amount` fallback last.

pub mod activity;
pub mod delimited;
pub mod ebay;
pub mod generic;
pub mod paypal;

use tally_core::RawTransaction;

use crate::types::ExtractedDocument;

pub use activity::ActivityParser;
pub use delimited::DelimitedParser;
pub use ebay::EbayParser;
pub use generic::GenericParser;
pub use paypal::PayPalParser;

/// A statement-format matcher. `try_parse` returns `None` when the
/// document's discriminator (filename pattern or content marker) does not
/// match; `Some` with the rows it could extract otherwise. Lines that do not
/// satisfy the format's field contract are skipped, never an error.
pub trait StatementParser {
    fn name(&self) -> &'static str;
    fn try_parse(&self, doc: &ExtractedDocument) -> Option<Vec<RawTransaction>>;
}

/// The fixed priority order.
pub fn default_parsers() -> Vec<Box<dyn StatementParser>> {
    vec![
        Box::new(PayPalParser),
        Box::new(EbayParser),
        Box::new(ActivityParser),
        Box::new(DelimitedParser),
        Box::new(GenericParser),
    ]
}

/// Run the registry against one document; first match wins.
pub fn parse_document(
    parsers: &[Box<dyn StatementParser>],
    doc: &ExtractedDocument,
) -> Option<(&'static str, Vec<RawTransaction>)> {
    parsers
        .iter()
        .find_map(|p| p.try_parse(doc).map(|rows| (p.name(), rows)))
}
