//! tally-ingest: document extraction (PDF/TXT/CSV) and statement-specific
//! parsers producing raw transaction candidates.

pub mod extract;
pub mod parsers;
pub mod types;

pub use extract::{document_kind, extract_document};
pub use parsers::{StatementParser, default_parsers, parse_document};
pub use types::{DocumentKind, ExtractedDocument, RawLine};

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use tally_core::{RawTransaction, RunReport, dedupe};

/// Marker suffix for inputs already ingested in a previous run.
pub const READ_SUFFIX: &str = "-read";

/// Ingest every supported document under `dir`: extract, pick a parser by
/// priority, dedupe per document. Per-document failures are diagnostics;
/// only a missing directory aborts. When `mark_read` is set, successfully
/// ingested files are renamed with the [`READ_SUFFIX`] so a later run skips
/// them.
pub fn ingest_directory(
    dir: &Path,
    mark_read: bool,
    report: &mut RunReport,
) -> Result<Vec<RawTransaction>> {
    if !dir.is_dir() {
        bail!("input directory not found: {}", dir.display());
    }

    let mut paths: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let parsers = default_parsers();
    let mut out = Vec::new();

    for path in paths {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if name.ends_with(READ_SUFFIX) {
            continue;
        }

        let doc = match extract_document(&path) {
            Ok(d) => d,
            Err(e) => {
                warn!(doc = %name, "skipping: {e}");
                report.documents_skipped += 1;
                report.warn(e.to_string());
                continue;
            }
        };
        if doc.kind == DocumentKind::Unsupported {
            continue;
        }
        if doc.is_empty() {
            warn!(doc = %name, "document yielded no text");
            report.documents_skipped += 1;
            report.warn(format!("no transactions found in {name}"));
            continue;
        }

        let Some((parser, rows)) = parse_document(&parsers, &doc) else {
            report.documents_skipped += 1;
            report.warn(format!("no parser matched {name}"));
            continue;
        };

        let rows = dedupe(rows);
        if rows.is_empty() {
            warn!(doc = %name, parser, "matched but found no transactions");
            report.documents_skipped += 1;
            report.warn(format!("no transactions found in {name}"));
            continue;
        }

        info!(doc = %name, parser, rows = rows.len(), "ingested document");
        report.documents_processed += 1;
        report.transactions_extracted += rows.len();
        out.extend(rows);

        if mark_read {
            let read_path = path.with_file_name(format!("{name}{READ_SUFFIX}"));
            if let Err(e) = fs::rename(&path, &read_path) {
                warn!(doc = %name, "could not mark as read: {e}");
                report.warn(format!("could not mark {name} as read: {e}"));
            }
        }
    }

    Ok(out)
}
