//! Bracket balance tracking over `(){}[]`.
//!
//! One stack is carried across the whole document so constructs spanning
//! multiple lines balance correctly. Bracket characters inside string
//! literals are counted too; that is the documented baseline behavior, not
//! an oversight.

use super::is_skippable;
use crate::diag::{Diagnostic, DiagnosticCode, LineRange};

/// An opener waiting for its partner. Lives only for the duration of one
/// pass; anything left on the stack at end-of-document is unclosed.
struct StackEntry {
    open: char,
    expected: char,
    line: u32,
    col: u32,
}

fn closer_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn opener_for(close: char) -> char {
    match close {
        ')' => '(',
        ']' => '[',
        _ => '{',
    }
}

pub(super) fn check(lines: &[&str]) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    let mut stack: Vec<StackEntry> = Vec::new();

    for (line_idx, line) in lines.iter().enumerate() {
        if is_skippable(line) {
            continue;
        }
        for (col, ch) in line.chars().enumerate() {
            if let Some(expected) = closer_for(ch) {
                stack.push(StackEntry {
                    open: ch,
                    expected,
                    line: line_idx as u32,
                    col: col as u32,
                });
            } else if matches!(ch, ')' | ']' | '}') {
                match stack.pop() {
                    None => {
                        diags.push(Diagnostic::error(
                            DiagnosticCode::UnmatchedBracket,
                            LineRange::char_at(line_idx as u32, col as u32),
                            format!("Unexpected \"{}\" - no matching \"{}\"", ch, opener_for(ch)),
                        ));
                    }
                    Some(open) if open.expected != ch => {
                        diags.push(Diagnostic::error(
                            DiagnosticCode::MismatchedBracket,
                            LineRange::char_at(line_idx as u32, col as u32),
                            format!("Expected \"{}\" but found \"{}\"", open.expected, ch),
                        ));
                    }
                    Some(_) => {}
                }
            }
        }
    }

    // Whatever is still open at end-of-document is reported at the opener.
    for entry in stack {
        diags.push(Diagnostic::error(
            DiagnosticCode::UnclosedBracket,
            LineRange::char_at(entry.line, entry.col),
            format!("\"{}\" was never closed", entry.open),
        ));
    }

    diags
}
