//! Quick-fix synthesis. Pure and total: a diagnostic either maps to one
//! concrete edit or to nothing. Shapes that do not match fail closed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diag::{Diagnostic, DiagnosticCode, LineRange};

static DECL_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(?:let|var|const)\s+(.*)$").expect("decl line pattern"));

/// A single textual edit, in the coordinate space of [`LineRange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixEdit {
    ReplaceLine { line: u32, text: String },
    DeleteLine { line: u32 },
    ReplaceRange { range: LineRange, text: String },
}

/// One proposed fix for one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickFix {
    pub title: String,
    pub edit: FixEdit,
}

/// Synthesize at most one fix for `diag`, given the current text of the
/// line the diagnostic is anchored on.
pub fn quick_fix(diag: &Diagnostic, line_text: &str) -> Option<QuickFix> {
    match diag.code {
        DiagnosticCode::DuplicateVar => {
            let name = diag.symbol.as_deref()?;
            let caps = DECL_LINE_RE.captures(line_text)?;
            let indent = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            Some(QuickFix {
                title: format!("Change duplicate declaration of '{}' to assignment", name),
                edit: FixEdit::ReplaceLine {
                    line: diag.range.line,
                    text: format!("{}{}", indent, rest),
                },
            })
        }
        DiagnosticCode::UnusedVar => {
            let name = diag.symbol.as_deref()?;
            Some(QuickFix {
                title: format!("Remove unused variable '{}'", name),
                edit: FixEdit::DeleteLine { line: diag.range.line },
            })
        }
        DiagnosticCode::InvalidSyntax => {
            let replacement = match diag.symbol.as_deref()? {
                "print(" => "show(",
                "console.log" | "cout" | "printf" => "show",
                _ => return None,
            };
            Some(QuickFix {
                title: "Replace with show".to_string(),
                edit: FixEdit::ReplaceRange {
                    range: diag.range,
                    text: replacement.to_string(),
                },
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Severity;

    fn diag(code: DiagnosticCode, range: LineRange, symbol: Option<&str>) -> Diagnostic {
        let mut d = Diagnostic {
            severity: Severity::Error,
            code,
            message: String::new(),
            range,
            category: code.category(),
            symbol: None,
        };
        if let Some(s) = symbol {
            d.symbol = Some(s.to_string());
        }
        d
    }

    #[test]
    fn duplicate_declaration_becomes_assignment() {
        let d = diag(DiagnosticCode::DuplicateVar, LineRange::new(1, 4, 5), Some("x"));
        let fix = quick_fix(&d, "let x = 2").unwrap();
        assert_eq!(
            fix.edit,
            FixEdit::ReplaceLine {
                line: 1,
                text: "x = 2".to_string()
            }
        );
    }

    #[test]
    fn duplicate_fix_keeps_indentation() {
        let d = diag(DiagnosticCode::DuplicateVar, LineRange::new(3, 8, 9), Some("x"));
        let fix = quick_fix(&d, "    var x = 2").unwrap();
        assert_eq!(
            fix.edit,
            FixEdit::ReplaceLine {
                line: 3,
                text: "    x = 2".to_string()
            }
        );
    }

    #[test]
    fn unused_variable_deletes_its_line() {
        let d = diag(DiagnosticCode::UnusedVar, LineRange::new(0, 4, 5), Some("y"));
        let fix = quick_fix(&d, "let y = 5").unwrap();
        assert_eq!(fix.edit, FixEdit::DeleteLine { line: 0 });
    }

    #[test]
    fn print_call_is_rewritten_in_place() {
        let d = diag(DiagnosticCode::InvalidSyntax, LineRange::new(0, 0, 6), Some("print("));
        let fix = quick_fix(&d, "print(x)").unwrap();
        assert_eq!(
            fix.edit,
            FixEdit::ReplaceRange {
                range: LineRange::new(0, 0, 6),
                text: "show(".to_string()
            }
        );
    }

    #[test]
    fn comment_markers_have_no_fix() {
        let d = diag(DiagnosticCode::InvalidSyntax, LineRange::new(0, 0, 1), Some("#"));
        assert!(quick_fix(&d, "# hello").is_none());
    }

    #[test]
    fn non_actionable_codes_and_missing_payloads_fail_closed() {
        let d = diag(DiagnosticCode::UnclosedString, LineRange::new(0, 0, 4), None);
        assert!(quick_fix(&d, "\"abc").is_none());
        let d = diag(DiagnosticCode::DuplicateVar, LineRange::new(0, 4, 5), None);
        assert!(quick_fix(&d, "let x = 2").is_none());
        let d = diag(DiagnosticCode::DuplicateVar, LineRange::new(0, 0, 1), Some("x"));
        assert!(quick_fix(&d, "x = 2").is_none(), "shape mismatch is skipped");
    }
}
