//! Document extraction: raw bytes to ordered [`RawLine`]s.
//!
//! Unsupported types yield an empty sequence. An unreadable document is a
//! [`tally_core::Error::DocumentUnreadable`]; the caller records it as a
//! diagnostic and moves on; it never aborts the run.

use std::fs;
use std::path::Path;
use tracing::debug;

use tally_core::{Error, Result};

use crate::types::{DocumentKind, ExtractedDocument, RawLine};

const PAGE_BREAK: char = '\u{0C}';

pub fn document_kind(path: &Path) -> DocumentKind {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => DocumentKind::Pdf,
        Some("txt") => DocumentKind::Text,
        Some("csv") => DocumentKind::Csv,
        _ => DocumentKind::Unsupported,
    }
}

/// Extract one document into lines. Page breaks follow the form feeds the
/// PDF text backend emits; plain-text documents are a single page.
pub fn extract_document(path: &Path) -> Result<ExtractedDocument> {
    let id = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let kind = document_kind(path);

    let text = match kind {
        DocumentKind::Unsupported => {
            debug!(doc = %id, "unsupported document type, skipping");
            return Ok(ExtractedDocument::empty(id, kind));
        }
        DocumentKind::Pdf => pdf_extract::extract_text(path).map_err(|e| Error::DocumentUnreadable {
            path: id.clone(),
            reason: e.to_string(),
        })?,
        DocumentKind::Text | DocumentKind::Csv => {
            fs::read_to_string(path).map_err(|e| Error::DocumentUnreadable {
                path: id.clone(),
                reason: e.to_string(),
            })?
        }
    };

    let mut lines = Vec::new();
    for (page, page_text) in text.split(PAGE_BREAK).enumerate() {
        for (line, raw) in page_text.lines().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            lines.push(RawLine {
                doc_id: id.clone(),
                page,
                line,
                text: raw.to_string(),
            });
        }
    }

    Ok(ExtractedDocument { id, kind, lines })
}
