use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use ropey::Rope;
use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Url};
use tower_lsp::Client;

use orion_core::{AnalysisResult, Analyzer, KeywordDocs, Symbol};

/// In-memory representation of an open Orion document and its most recent
/// analysis snapshot. The snapshot is replaced wholesale on every pass, so
/// concurrent readers see either the old or the new one, never a torn mix.
#[derive(Debug, Default)]
pub(crate) struct Document {
    pub(crate) content: Rope,
    pub(crate) version: i32,
    pub(crate) analysis: Option<Arc<AnalysisResult>>,
}

/// Primary LSP server state shared across handlers.
pub(crate) struct OrionLanguageServer {
    pub(crate) client: Client,
    pub(crate) documents: Arc<DashMap<Url, Document>>,
    pub(crate) analyzer: Analyzer,
    pub(crate) config: Mutex<super::config::ServerConfig>,
}

// Fixed surface keywords; everything else comes from the docs table.
pub(crate) const RESERVED_WORDS: &[&str] = &["if", "else", "while", "for", "return", "true", "false"];

impl OrionLanguageServer {
    pub(crate) fn new(client: Client) -> Self {
        let docs_path = std::env::var("ORION_DOCS").unwrap_or_else(|_| "docs/docs.json".to_string());
        let docs = KeywordDocs::load(&docs_path);

        Self {
            client,
            documents: Arc::new(DashMap::new()),
            analyzer: Analyzer::new(docs),
            config: Mutex::new(super::config::ServerConfig::default()),
        }
    }

    /// Static completion items: docs-table entries plus the reserved words.
    pub(crate) fn base_completions(&self) -> Vec<CompletionItem> {
        let mut items = Vec::new();

        for name in self.analyzer.docs().names() {
            let entry = self.analyzer.docs().get(name);
            items.push(CompletionItem {
                label: name.to_string(),
                kind: Some(CompletionItemKind::FUNCTION),
                detail: entry.and_then(|e| e.syntax.clone()),
                documentation: None,
                ..Default::default()
            });
        }

        for keyword in RESERVED_WORDS {
            items.push(CompletionItem {
                label: keyword.to_string(),
                kind: Some(CompletionItemKind::KEYWORD),
                detail: Some("Orion keyword".to_string()),
                ..Default::default()
            });
        }

        items
    }

    /// Completion items derived from one document's symbol table.
    pub(crate) fn symbol_completions(&self, analysis: &AnalysisResult) -> Vec<CompletionItem> {
        analysis
            .symbols
            .symbols()
            .map(|symbol| match symbol {
                Symbol::Function(f) => CompletionItem {
                    label: f.name.clone(),
                    kind: Some(CompletionItemKind::FUNCTION),
                    detail: Some(f.signature()),
                    ..Default::default()
                },
                Symbol::Variable(v) => CompletionItem {
                    label: v.name.clone(),
                    kind: Some(CompletionItemKind::VARIABLE),
                    detail: v.ty.clone(),
                    ..Default::default()
                },
            })
            .collect()
    }
}
