use std::collections::btree_map::{self, BTreeMap};

use serde::Serialize;

/// Declaration keyword for a variable, or `Implicit` for a bare `name = expr`
/// assignment that was never declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarKeyword {
    Let,
    Var,
    Const,
    Implicit,
}

impl VarKeyword {
    pub fn is_mutable(&self) -> bool {
        !matches!(self, Self::Const)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Let => "let",
            Self::Var => "var",
            Self::Const => "const",
            Self::Implicit => "let",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSymbol {
    pub name: String,
    pub params: Vec<Param>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_ty: Option<String>,
    /// 0-based declaring line.
    pub line: u32,
    /// Column of the name on the declaring line.
    pub name_col: u32,
}

impl FunctionSymbol {
    /// Render `fn name(a: Int, b) -> Str` for hover and outline details.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| match &p.ty {
                Some(ty) => format!("{}: {}", p.name, ty),
                None => p.name.clone(),
            })
            .collect();
        match &self.return_ty {
            Some(ret) => format!("fn {}({}) -> {}", self.name, params.join(", "), ret),
            None => format!("fn {}({})", self.name, params.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableSymbol {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    pub keyword: VarKeyword,
    pub used: bool,
    /// 0-based declaring line.
    pub line: u32,
    /// Column of the name on the declaring line.
    pub name_col: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Symbol {
    Function(FunctionSymbol),
    Variable(VariableSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Self::Function(f) => &f.name,
            Self::Variable(v) => &v.name,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Self::Function(f) => f.line,
            Self::Variable(v) => v.line,
        }
    }
}

/// Per-document symbol map. Orion's surface syntax has no block scoping, so
/// this is one flat scope: names are unique keys and the last declaration
/// wins for lookup. Re-declarations are the caller's problem to report.
///
/// Backed by a `BTreeMap` so iteration order, and with it every downstream
/// artifact (outline, JSON output), is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SymbolTable {
    map: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.map.get(name)
    }

    pub fn insert(&mut self, symbol: Symbol) {
        self.map.insert(symbol.name().to_string(), symbol);
    }

    /// Flip the `used` flag on a variable. Functions have no liveness flag;
    /// marking one is a no-op.
    pub fn mark_used(&mut self, name: &str) {
        if let Some(Symbol::Variable(var)) = self.map.get_mut(name) {
            var.used = true;
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Symbol> {
        self.map.iter()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.map.values()
    }
}
