use serde::Serialize;

/// A range within a single line, in character columns. Orion diagnostics
/// never span lines, so a dedicated type keeps that invariant visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LineRange {
    pub line: u32,
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(line: u32, start: u32, end: u32) -> Self {
        Self { line, start, end }
    }

    /// A one-character range at the given column.
    pub fn char_at(line: u32, col: u32) -> Self {
        Self::new(line, col, col + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Whether a diagnostic is about well-formedness or about meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Syntax,
    Semantic,
}

/// Closed set of machine-readable diagnostic codes. The wire strings are
/// stable: quick fixes and editor clients key off them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    UnmatchedBracket,
    MismatchedBracket,
    UnclosedBracket,
    UnclosedString,
    InvalidComment,
    IncompleteIf,
    IncompleteWhile,
    IncompleteFunction,
    IncompleteVariable,
    IncompleteAssignment,
    UnnamedFunction,
    IncompleteOperator,
    MultipleAssignment,
    InvalidSyntax,
    DuplicateVar,
    UnusedVar,
    UndefinedVariable,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnmatchedBracket => "unmatched-bracket",
            Self::MismatchedBracket => "mismatched-bracket",
            Self::UnclosedBracket => "unclosed-bracket",
            Self::UnclosedString => "unclosed-string",
            Self::InvalidComment => "invalid-comment",
            Self::IncompleteIf => "incomplete-if",
            Self::IncompleteWhile => "incomplete-while",
            Self::IncompleteFunction => "incomplete-function",
            Self::IncompleteVariable => "incomplete-variable",
            Self::IncompleteAssignment => "incomplete-assignment",
            Self::UnnamedFunction => "unnamed-function",
            Self::IncompleteOperator => "incomplete-operator",
            Self::MultipleAssignment => "multiple-assignment",
            Self::InvalidSyntax => "invalid-syntax",
            Self::DuplicateVar => "duplicate-var",
            Self::UnusedVar => "unused-var",
            Self::UndefinedVariable => "undefined-variable",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::DuplicateVar | Self::UnusedVar | Self::UndefinedVariable => Category::Semantic,
            _ => Category::Syntax,
        }
    }
}

/// A structured report of one problem in the source text.
///
/// `symbol` carries the offending identifier (or banned token for
/// `invalid-syntax`) so consumers never have to parse it back out of the
/// rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub range: LineRange,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, range: LineRange, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            range,
            category: code.category(),
            symbol: None,
        }
    }

    pub fn warning(code: DiagnosticCode, range: LineRange, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            range,
            category: code.category(),
            symbol: None,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_strings_are_kebab_case() {
        assert_eq!(DiagnosticCode::UnclosedBracket.as_str(), "unclosed-bracket");
        assert_eq!(DiagnosticCode::DuplicateVar.as_str(), "duplicate-var");
        assert_eq!(DiagnosticCode::InvalidSyntax.as_str(), "invalid-syntax");
    }

    #[test]
    fn categories_split_syntax_from_semantic() {
        assert_eq!(DiagnosticCode::MismatchedBracket.category(), Category::Syntax);
        assert_eq!(DiagnosticCode::UnusedVar.category(), Category::Semantic);
        assert_eq!(DiagnosticCode::UndefinedVariable.category(), Category::Semantic);
    }

    #[test]
    fn builders_set_severity_and_category() {
        let d = Diagnostic::error(DiagnosticCode::UnclosedString, LineRange::new(3, 4, 9), "oops");
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.category, Category::Syntax);
        assert!(d.symbol.is_none());

        let w = Diagnostic::warning(DiagnosticCode::UnusedVar, LineRange::char_at(0, 4), "unused").with_symbol("x");
        assert_eq!(w.severity, Severity::Warning);
        assert_eq!(w.symbol.as_deref(), Some("x"));
        assert_eq!(w.range.end, 5);
    }
}
