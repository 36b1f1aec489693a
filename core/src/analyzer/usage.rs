//! Cross-references word tokens against the symbol table, the keyword
//! table, and the fixed reserved words. One flat scope per document; this
//! is a best-effort definedness check, not scope analysis.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{col_at, is_skippable, strings};
use crate::diag::{Diagnostic, DiagnosticCode, LineRange};
use crate::docs::KeywordDocs;
use crate::symbol::{Symbol, SymbolTable};

pub(super) const RESERVED: &[&str] = &["if", "else", "while", "for", "return", "true", "false"];

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern"));

fn is_decl_site(symbol: &Symbol, line: u32, col: u32) -> bool {
    match symbol {
        Symbol::Function(f) => f.line == line && f.name_col == col,
        Symbol::Variable(v) => v.line == line && v.name_col == col,
    }
}

/// Emit `undefined-variable` warnings per line, marking symbols used along
/// the way, then sweep the table for `unused-var` in declaring-line order.
pub(super) fn check(lines: &[&str], symbols: &mut SymbolTable, docs: &KeywordDocs) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    for (line_idx, line) in lines.iter().enumerate() {
        if is_skippable(line) {
            continue;
        }
        let line_no = line_idx as u32;
        let strings = strings::scan_line(line);

        for m in WORD_RE.find_iter(line) {
            let word = m.as_str();
            if word.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let col = col_at(line, m.start());
            if strings.in_string(col) {
                continue;
            }
            if RESERVED.contains(&word) {
                continue;
            }
            // A word directly followed by `(` is a call, not a reference.
            if line[m.end()..].starts_with('(') {
                continue;
            }
            if let Some(symbol) = symbols.get(word) {
                if !is_decl_site(symbol, line_no, col) {
                    symbols.mark_used(word);
                }
                continue;
            }
            if docs.contains(word) {
                continue;
            }
            diags.push(
                Diagnostic::warning(
                    DiagnosticCode::UndefinedVariable,
                    LineRange::new(line_no, col, col + word.chars().count() as u32),
                    format!("'{}' is not defined", word),
                )
                .with_symbol(word),
            );
        }
    }

    let mut unused: Vec<_> = symbols
        .symbols()
        .filter_map(|s| match s {
            Symbol::Variable(v) if !v.used => Some((v.line, v.name_col, v.name.clone())),
            _ => None,
        })
        .collect();
    unused.sort_unstable();
    for (line, col, name) in unused {
        diags.push(
            Diagnostic::warning(
                DiagnosticCode::UnusedVar,
                LineRange::new(line, col, col + name.chars().count() as u32),
                format!("Variable '{}' is never used", name),
            )
            .with_symbol(name),
        );
    }

    diags
}
