//! Pipeline error kinds.
//!
//! Per-document and per-batch failures are local: callers record a
//! diagnostic and continue. Ledger store failures are fatal to the run:
//! a partial financial write is worse than no write.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Extraction failure. The document is skipped; the run continues.
    #[error("unreadable document {path}: {reason}")]
    DocumentUnreadable { path: String, reason: String },

    /// A parser matched the document but produced no rows.
    #[error("no transactions found in {path}")]
    NoTransactionsFound { path: String },

    /// A classification reply contained zero parseable records.
    #[error("classification reply contained no valid records")]
    ClassificationUnparseable,

    /// A classified record lacks a usable required field.
    #[error("classified record missing required field: {field}")]
    MissingRequiredField { field: &'static str },

    /// The ledger store could not be opened or saved. Aborts the run.
    #[error("ledger store: {0}")]
    LedgerIo(String),

    /// Aggregation requires Income rows and expense rows.
    #[error("insufficient data: aggregation needs both Income and expense rows")]
    InsufficientAggregationData,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Store-level failures abort the run; everything else is local.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::LedgerIo(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_ledger_io_is_fatal() {
        assert!(Error::LedgerIo("disk full".into()).is_fatal());
        assert!(!Error::ClassificationUnparseable.is_fatal());
        assert!(!Error::InsufficientAggregationData.is_fatal());
        assert!(
            !Error::DocumentUnreadable {
                path: "a.pdf".into(),
                reason: "truncated".into()
            }
            .is_fatal()
        );
    }
}
