//! Declaration recognition and symbol table construction.
//!
//! Two shapes are recognized per trimmed line: `fn name(params) [-> ty]`
//! and `let|var|const name [: ty] = expr`, plus the bare implicit
//! assignment `name = expr`. A function header missing its closing
//! parenthesis is left to the structural validator and records no symbol.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{col_at, is_skippable};
use crate::diag::{Diagnostic, DiagnosticCode, LineRange};
use crate::symbol::{FunctionSymbol, Param, Symbol, SymbolTable, VarKeyword, VariableSymbol};

static FN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^fn\s+(\w+)\s*\(([^)]*)\)\s*(?:->\s*(\w+))?").expect("fn pattern"));
static VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(let|var|const)\s+(\w+)\s*(?::\s*(\w+))?\s*=").expect("var pattern"));
static ASSIGN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+)\s*=(?:$|[^=])").expect("assign pattern"));

const DECL_KEYWORDS: &[&str] = &["let", "var", "const", "fn"];

/// Best-effort type from a literal right-hand side; anything non-literal
/// stays untyped.
fn infer_literal_ty(rhs: &str) -> Option<String> {
    let rhs = rhs.trim();
    if rhs.starts_with('"') || rhs.starts_with('\'') {
        return Some("Str".to_string());
    }
    if rhs == "true" || rhs == "false" {
        return Some("Bool".to_string());
    }
    if rhs.parse::<i64>().is_ok() {
        return Some("Int".to_string());
    }
    if rhs.parse::<f64>().is_ok() {
        return Some("Float".to_string());
    }
    None
}

fn parse_params(raw: &str) -> Vec<Param> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| match p.split_once(':') {
            Some((name, ty)) => Param {
                name: name.trim().to_string(),
                ty: Some(ty.trim().to_string()),
            },
            None => Param {
                name: p.to_string(),
                ty: None,
            },
        })
        .collect()
}

/// Build the symbol table for one pass, reporting duplicate declarations
/// along the way. A duplicate never overwrites the existing entry; a bare
/// re-assignment to a known name marks it used instead of re-declaring.
pub(super) fn collect(lines: &[&str]) -> (SymbolTable, Vec<Diagnostic>) {
    let mut table = SymbolTable::new();
    let mut diags = Vec::new();

    for (line_idx, line) in lines.iter().enumerate() {
        if is_skippable(line) {
            continue;
        }
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        let trimmed = trimmed.trim_end();

        if let Some(caps) = FN_RE.captures(trimmed) {
            let name_match = caps.get(1).expect("fn name group");
            let name = name_match.as_str();
            table.insert(Symbol::Function(FunctionSymbol {
                name: name.to_string(),
                params: parse_params(caps.get(2).map(|m| m.as_str()).unwrap_or("")),
                return_ty: caps.get(3).map(|m| m.as_str().to_string()),
                line: line_idx as u32,
                name_col: col_at(line, indent + name_match.start()),
            }));
            continue;
        }

        if let Some(caps) = VAR_RE.captures(trimmed) {
            let keyword = match caps.get(1).map(|m| m.as_str()) {
                Some("var") => VarKeyword::Var,
                Some("const") => VarKeyword::Const,
                _ => VarKeyword::Let,
            };
            let name_match = caps.get(2).expect("var name group");
            let name = name_match.as_str();
            let name_col = col_at(line, indent + name_match.start());

            if table.contains(name) {
                diags.push(
                    Diagnostic::error(
                        DiagnosticCode::DuplicateVar,
                        LineRange::new(line_idx as u32, name_col, name_col + name.chars().count() as u32),
                        format!("'{}' is already declared", name),
                    )
                    .with_symbol(name),
                );
            } else {
                let declared_ty = caps.get(3).map(|m| m.as_str().to_string());
                let ty = declared_ty.or_else(|| infer_literal_ty(&trimmed[caps.get(0).expect("match").end()..]));
                table.insert(Symbol::Variable(VariableSymbol {
                    name: name.to_string(),
                    ty,
                    keyword,
                    used: false,
                    line: line_idx as u32,
                    name_col,
                }));
            }
            continue;
        }

        if let Some(caps) = ASSIGN_RE.captures(trimmed) {
            let name_match = caps.get(1).expect("assign name group");
            let name = name_match.as_str();
            if DECL_KEYWORDS.contains(&name) || super::usage::RESERVED.contains(&name) {
                continue;
            }
            if table.contains(name) {
                // Read/write of an existing binding, not a re-declaration.
                table.mark_used(name);
            } else {
                // Slice after the name, not the full match: the char the
                // pattern consumed past `=` may be multibyte.
                let rest = trimmed[name_match.end()..].trim_start();
                let rhs = rest.strip_prefix('=').unwrap_or(rest);
                table.insert(Symbol::Variable(VariableSymbol {
                    name: name.to_string(),
                    ty: infer_literal_ty(rhs),
                    keyword: VarKeyword::Implicit,
                    used: false,
                    line: line_idx as u32,
                    name_col: col_at(line, indent + name_match.start()),
                }));
            }
        }
    }

    (table, diags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> (SymbolTable, Vec<Diagnostic>) {
        let lines: Vec<&str> = src.lines().collect();
        collect(&lines)
    }

    #[test]
    fn function_declaration_records_signature() {
        let (table, diags) = run("fn area(w: Int, h: Int) -> Int {");
        assert!(diags.is_empty());
        match table.get("area") {
            Some(Symbol::Function(f)) => {
                assert_eq!(f.params.len(), 2);
                assert_eq!(f.params[0].name, "w");
                assert_eq!(f.params[0].ty.as_deref(), Some("Int"));
                assert_eq!(f.return_ty.as_deref(), Some("Int"));
                assert_eq!(f.line, 0);
            }
            other => panic!("expected function symbol, got {:?}", other),
        }
    }

    #[test]
    fn malformed_function_header_records_nothing() {
        let (table, _) = run("fn broken(a, b");
        assert!(table.is_empty());
    }

    #[test]
    fn variable_declaration_with_annotation_and_inference() {
        let (table, _) = run("let name: Str = other\nconst pi = 3.14\nvar n = 7\nlet flag = true");
        match table.get("name") {
            Some(Symbol::Variable(v)) => {
                assert_eq!(v.ty.as_deref(), Some("Str"));
                assert_eq!(v.keyword, VarKeyword::Let);
            }
            other => panic!("unexpected {:?}", other),
        }
        match table.get("pi") {
            Some(Symbol::Variable(v)) => {
                assert_eq!(v.ty.as_deref(), Some("Float"));
                assert_eq!(v.keyword, VarKeyword::Const);
                assert!(!v.keyword.is_mutable());
            }
            other => panic!("unexpected {:?}", other),
        }
        match table.get("n") {
            Some(Symbol::Variable(v)) => assert_eq!(v.ty.as_deref(), Some("Int")),
            other => panic!("unexpected {:?}", other),
        }
        match table.get("flag") {
            Some(Symbol::Variable(v)) => assert_eq!(v.ty.as_deref(), Some("Bool")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn duplicate_declaration_is_flagged_and_not_overwritten() {
        let (table, diags) = run("let x = 1\nlet x = 2");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::DuplicateVar);
        assert_eq!(diags[0].range.line, 1);
        assert_eq!(diags[0].symbol.as_deref(), Some("x"));
        match table.get("x") {
            Some(Symbol::Variable(v)) => assert_eq!(v.line, 0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn implicit_assignment_declares_once_then_marks_used() {
        let (table, diags) = run("total = 10\ntotal = 11");
        assert!(diags.is_empty());
        match table.get("total") {
            Some(Symbol::Variable(v)) => {
                assert_eq!(v.keyword, VarKeyword::Implicit);
                assert_eq!(v.line, 0);
                assert!(v.used, "re-assignment marks the binding used");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn multibyte_rhs_right_after_the_equals_sign() {
        let (table, diags) = run("x =é1\nname = \"café\"");
        assert!(diags.is_empty());
        match table.get("x") {
            Some(Symbol::Variable(v)) => {
                assert_eq!(v.keyword, VarKeyword::Implicit);
                assert_eq!(v.ty, None);
            }
            other => panic!("unexpected {:?}", other),
        }
        match table.get("name") {
            Some(Symbol::Variable(v)) => assert_eq!(v.ty.as_deref(), Some("Str")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn comparison_is_not_an_assignment() {
        let (table, _) = run("x == 5");
        assert!(table.is_empty());
    }

    #[test]
    fn indented_declaration_keeps_real_columns() {
        let (table, _) = run("    let depth = 1");
        match table.get("depth") {
            Some(Symbol::Variable(v)) => assert_eq!(v.name_col, 8),
            other => panic!("unexpected {:?}", other),
        }
    }
}
