//! Per-line string literal scanning. Orion strings do not span lines, so a
//! quote left open at end-of-line is always an error on that line.

use super::{is_skippable, line_width};
use crate::diag::{Diagnostic, DiagnosticCode, LineRange};

/// String layout of one line: closed literal spans (inclusive columns,
/// quotes included) and the opening column of a trailing unterminated run.
pub(super) struct LineStrings {
    pub regions: Vec<(u32, u32)>,
    pub unterminated: Option<u32>,
}

impl LineStrings {
    pub fn in_string(&self, col: u32) -> bool {
        if let Some(open) = self.unterminated {
            if col >= open {
                return true;
            }
        }
        self.regions.iter().any(|&(s, e)| col >= s && col <= e)
    }
}

/// Single left-to-right scan with escape handling; `\"` and `\'` do not
/// terminate a literal.
pub(super) fn scan_line(line: &str) -> LineStrings {
    let mut regions = Vec::new();
    let mut open: Option<(char, u32)> = None;
    let mut escaped = false;

    for (col, ch) in line.chars().enumerate() {
        match open {
            Some((quote, start)) => {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == quote {
                    regions.push((start, col as u32));
                    open = None;
                }
            }
            None => {
                if ch == '"' || ch == '\'' {
                    open = Some((ch, col as u32));
                    escaped = false;
                }
            }
        }
    }

    LineStrings {
        regions,
        unterminated: open.map(|(_, start)| start),
    }
}

pub(super) fn check(lines: &[&str]) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for (line_idx, line) in lines.iter().enumerate() {
        if is_skippable(line) {
            continue;
        }
        if let Some(open_col) = scan_line(line).unterminated {
            diags.push(Diagnostic::error(
                DiagnosticCode::UnclosedString,
                LineRange::new(line_idx as u32, open_col, line_width(line)),
                "Unterminated string - missing closing quote",
            ));
        }
    }
    diags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Vec<Diagnostic> {
        let lines: Vec<&str> = src.lines().collect();
        check(&lines)
    }

    #[test]
    fn closed_strings_are_fine() {
        assert!(run("let s = \"hello\"").is_empty());
        assert!(run("let s = 'a' + \"b\"").is_empty());
    }

    #[test]
    fn trailing_open_quote_is_flagged_to_end_of_line() {
        let diags = run("show \"hello");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::UnclosedString);
        assert_eq!(diags[0].range, LineRange::new(0, 5, 11));
    }

    #[test]
    fn escaped_quote_does_not_terminate() {
        let diags = run(r#"show "a\"b"#);
        assert_eq!(diags.len(), 1);

        assert!(run(r#"show "a\"b""#).is_empty());
    }

    #[test]
    fn single_quotes_behave_the_same() {
        let diags = run("let c = 'x");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].range.start, 8);
    }

    #[test]
    fn one_diagnostic_per_offending_line() {
        let diags = run("\"a\n'b\nok()");
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].range.line, 0);
        assert_eq!(diags[1].range.line, 1);
    }

    #[test]
    fn region_mask_covers_quotes_and_contents() {
        let scan = scan_line("x \"ab\" y");
        assert!(scan.in_string(2));
        assert!(scan.in_string(4));
        assert!(scan.in_string(5));
        assert!(!scan.in_string(0));
        assert!(!scan.in_string(7));
    }
}
