//! Line-local structural predicates.
//!
//! Every predicate is independent and may co-fire on the same line; they
//! run in a fixed order so the diagnostic list stays deterministic.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{col_at, is_skippable, line_width};
use crate::diag::{Diagnostic, DiagnosticCode, LineRange};

static INCOMPLETE_FN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^fn\s+(\w+)?\s*\([^)]*$").expect("incomplete fn pattern"));
static BARE_DECL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(let|var|const)\s*$").expect("bare decl pattern"));
static DANGLING_ASSIGN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w+\s*=\s*$").expect("dangling assign pattern"));
static UNNAMED_FN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^fn\s*\(").expect("unnamed fn pattern"));
static TRAILING_OP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+\-*/=<>!&|]+$").expect("trailing op pattern"));
static COMMENT_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[#/;%]+\s*").expect("comment marker pattern"));

const BANNED_TOKENS: &[&str] = &["#", "//", ";", "%", "print(", "console.log", "cout", "printf"];

fn banned_suggestion(token: &str) -> &'static str {
    match token {
        "#" | "//" | ";" | "%" => "Use -- for comments",
        _ => "Use show() instead",
    }
}

pub(super) fn check(lines: &[&str]) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    for (line_idx, line) in lines.iter().enumerate() {
        if is_skippable(line) {
            continue;
        }
        let line_no = line_idx as u32;
        let trimmed = line.trim();
        let full = LineRange::new(line_no, 0, line_width(line));

        if trimmed.starts_with('#')
            || trimmed.starts_with("//")
            || trimmed.starts_with(';')
            || trimmed.starts_with('%')
        {
            let rest = COMMENT_MARKER_RE.replace(trimmed, "");
            diags.push(Diagnostic::error(
                DiagnosticCode::InvalidComment,
                full,
                format!("Only '--' comments are allowed. Use: -- {}", rest),
            ));
        }

        if trimmed == "if" || trimmed == "if {" {
            diags.push(Diagnostic::error(
                DiagnosticCode::IncompleteIf,
                full,
                "Incomplete if - missing condition".to_string(),
            ));
        }
        if trimmed == "while" || trimmed == "while {" {
            diags.push(Diagnostic::error(
                DiagnosticCode::IncompleteWhile,
                full,
                "Incomplete while - missing condition".to_string(),
            ));
        }

        if INCOMPLETE_FN_RE.is_match(trimmed) {
            diags.push(Diagnostic::error(
                DiagnosticCode::IncompleteFunction,
                full,
                "Incomplete function declaration - missing closing parenthesis".to_string(),
            ));
        }
        if BARE_DECL_RE.is_match(trimmed) {
            diags.push(Diagnostic::error(
                DiagnosticCode::IncompleteVariable,
                full,
                "Incomplete variable declaration - missing variable name".to_string(),
            ));
        }
        if DANGLING_ASSIGN_RE.is_match(trimmed) {
            diags.push(Diagnostic::error(
                DiagnosticCode::IncompleteAssignment,
                full,
                "Incomplete assignment - missing value".to_string(),
            ));
        }
        if UNNAMED_FN_RE.is_match(trimmed) {
            diags.push(Diagnostic::error(
                DiagnosticCode::UnnamedFunction,
                full,
                "Function has no name - functions need an identifier".to_string(),
            ));
        }

        if TRAILING_OP_RE.is_match(trimmed) {
            let width = line_width(line);
            diags.push(Diagnostic::error(
                DiagnosticCode::IncompleteOperator,
                LineRange::new(line_no, width.saturating_sub(1), width),
                "Incomplete operator - missing operand".to_string(),
            ));
        }
        if trimmed.matches('=').count() > 1 && !trimmed.contains("==") && !trimmed.contains("!=") {
            diags.push(Diagnostic::error(
                DiagnosticCode::MultipleAssignment,
                full,
                "Multiple assignments on one line are not allowed".to_string(),
            ));
        }

        for token in BANNED_TOKENS {
            if let Some(byte_idx) = line.find(token) {
                let start = col_at(line, byte_idx);
                diags.push(
                    Diagnostic::warning(
                        DiagnosticCode::InvalidSyntax,
                        LineRange::new(line_no, start, start + token.chars().count() as u32),
                        format!("\"{}\" is not valid here. {}", token, banned_suggestion(token)),
                    )
                    .with_symbol(*token),
                );
            }
        }
    }

    diags
}
