//! Heuristic analyzer for the Orion scripting language.
//!
//! Orion is line-oriented, and editors hand us transiently-broken text on
//! every keystroke, so there is deliberately no tokenizer or AST here. The
//! analyzer is a set of total, single-pass line scanners (plus one
//! document-wide bracket stack) that always produce diagnostics and a
//! symbol table, never an error.

pub mod actions;
pub mod analyzer;
pub mod diag;
pub mod docs;
pub mod symbol;

pub use actions::{quick_fix, FixEdit, QuickFix};
pub use analyzer::{AnalysisResult, Analyzer};
pub use diag::{Category, Diagnostic, DiagnosticCode, LineRange, Severity};
pub use docs::{DocEntry, KeywordDocs};
pub use symbol::{FunctionSymbol, Param, Symbol, SymbolTable, VarKeyword, VariableSymbol};
