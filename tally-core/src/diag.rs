//! End-of-run diagnostics. Every skipped document, failed batch, and coerced
//! record is counted here and surfaced to the user, never silently.

use std::fmt;

#[derive(Debug, Default, Clone)]
pub struct RunReport {
    pub documents_processed: usize,
    pub documents_skipped: usize,
    pub transactions_extracted: usize,
    pub batches_sent: usize,
    pub batches_failed: usize,
    pub records_classified: usize,
    pub records_coerced: usize,
    pub records_rejected: usize,
    warnings: Vec<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run summary")?;
        writeln!(
            f,
            "  documents: {} processed, {} skipped",
            self.documents_processed, self.documents_skipped
        )?;
        writeln!(f, "  extracted: {} transactions", self.transactions_extracted)?;
        writeln!(
            f,
            "  batches:   {} sent, {} failed",
            self.batches_sent, self.batches_failed
        )?;
        writeln!(
            f,
            "  records:   {} classified, {} coerced to Uncertain Expenses, {} rejected",
            self.records_classified, self.records_coerced, self.records_rejected
        )?;
        if !self.warnings.is_empty() {
            writeln!(f, "  warnings:")?;
            for w in &self.warnings {
                writeln!(f, "    - {w}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_warnings() {
        let mut r = RunReport::new();
        r.documents_processed = 2;
        r.warn("no transactions found in empty.txt");
        let s = r.to_string();
        assert!(s.contains("2 processed"));
        assert!(s.contains("empty.txt"));
    }

    #[test]
    fn test_default_is_clean() {
        let r = RunReport::new();
        assert!(!r.has_warnings());
        assert_eq!(r.records_rejected, 0);
    }
}
