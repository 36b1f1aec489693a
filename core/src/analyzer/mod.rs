//! The analysis pipeline: five independent line-oriented checkers run in a
//! fixed order over the full document text, and their outputs are
//! concatenated into one deterministic diagnostic list plus the symbol
//! table. Nothing here can fail: arbitrary bytes in, diagnostics out.

use crate::diag::Diagnostic;
use crate::docs::KeywordDocs;
use crate::symbol::SymbolTable;

mod brackets;
mod decls;
mod strings;
mod structure;
mod usage;

// Cap diagnostics volume so a pathological buffer cannot overwhelm the
// editor; mirrors the publishing limit on the server side.
const DEFAULT_MAX_DIAGNOSTICS: usize = 200;

/// Result of one analysis pass: the fresh snapshot for a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    pub diagnostics: Vec<Diagnostic>,
    pub symbols: SymbolTable,
}

/// Heuristic analyzer for Orion source text.
///
/// Holds only the read-only keyword/documentation table; every call to
/// [`Analyzer::analyze`] is a pure function of that table and the text, so
/// repeated passes over identical input produce identical results.
pub struct Analyzer {
    docs: KeywordDocs,
    max_diagnostics: usize,
}

impl Analyzer {
    pub fn new(docs: KeywordDocs) -> Self {
        Self {
            docs,
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
        }
    }

    pub fn with_max_diagnostics(mut self, max: usize) -> Self {
        self.max_diagnostics = max.max(1);
        self
    }

    pub fn docs(&self) -> &KeywordDocs {
        &self.docs
    }

    /// Run one full pass over `text`.
    ///
    /// Checker order is fixed: brackets, strings, declarations (which also
    /// reports duplicates while it owns the table), structural predicates,
    /// and usage last since it needs the completed symbol table.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let lines: Vec<&str> = text.lines().collect();

        let mut diagnostics = brackets::check(&lines);
        diagnostics.extend(strings::check(&lines));

        let (mut symbols, duplicate_diags) = decls::collect(&lines);
        diagnostics.extend(duplicate_diags);

        diagnostics.extend(structure::check(&lines));
        diagnostics.extend(usage::check(&lines, &mut symbols, &self.docs));

        if diagnostics.len() > self.max_diagnostics {
            tracing::debug!(
                total = diagnostics.len(),
                cap = self.max_diagnostics,
                "truncating diagnostics"
            );
            diagnostics.truncate(self.max_diagnostics);
        }

        AnalysisResult { diagnostics, symbols }
    }
}

/// Blank lines and `--` comment lines are invisible to every checker.
pub(crate) fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with("--")
}

/// Character column for a byte offset into `line`.
pub(crate) fn col_at(line: &str, byte_idx: usize) -> u32 {
    line[..byte_idx].chars().count() as u32
}

pub(crate) fn line_width(line: &str) -> u32 {
    line.chars().count() as u32
}
