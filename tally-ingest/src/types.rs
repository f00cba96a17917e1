use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Text,
    Csv,
    Unsupported,
}

/// A single line of extracted document text. Ephemeral: produced and
/// consumed within ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    pub doc_id: String,
    pub page: usize,
    pub line: usize,
    pub text: String,
}

/// Extractor output for one document: page order preserved, line order
/// within a page as emitted by the text-extraction backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub id: String,
    pub kind: DocumentKind,
    pub lines: Vec<RawLine>,
}

impl ExtractedDocument {
    pub fn empty(id: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            id: id.into(),
            kind,
            lines: Vec::new(),
        }
    }

    /// Full text reassembled for parsers that work on sections rather than
    /// single lines.
    pub fn text(&self) -> String {
        let mut s = String::new();
        for l in &self.lines {
            s.push_str(&l.text);
            s.push('\n');
        }
        s
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
