use std::sync::Arc;

use tower_lsp::lsp_types::*;

use orion_core::docs::DocParams;
use orion_core::{AnalysisResult, Category, DocEntry, Severity, Symbol};

use super::state::OrionLanguageServer;
use super::text::{to_lsp_range, word_at_position};

impl OrionLanguageServer {
    /// Run one synchronous analysis pass over the document's current text
    /// and store the snapshot. A pass is a single linear scan, so there is
    /// no debounce; the snapshot is only stored if the version is unchanged.
    pub(crate) fn analyze_document(&self, uri: &Url) -> Option<Arc<AnalysisResult>> {
        let (content, version) = {
            let doc = self.documents.get(uri)?;
            (doc.content.to_string(), doc.version)
        };

        let result = Arc::new(self.analyzer.analyze(&content));

        if let Some(mut doc) = self.documents.get_mut(uri) {
            if doc.version == version {
                doc.analysis = Some(result.clone());
            }
        }
        Some(result)
    }

    /// Latest stored snapshot, computing one only when nothing is stored
    /// yet. Pull-diagnostic and read-only requests use this.
    pub(crate) fn stored_analysis(&self, uri: &Url) -> Option<Arc<AnalysisResult>> {
        if let Some(doc) = self.documents.get(uri) {
            if let Some(snapshot) = doc.analysis.clone() {
                return Some(snapshot);
            }
        }
        self.analyze_document(uri)
    }

    pub(crate) async fn publish_diagnostics(&self, uri: Url, version: i32) {
        let Some(analysis) = self.analyze_document(&uri) else {
            return;
        };
        let max = self.config.lock().unwrap().max_diagnostics;
        let diagnostics = to_lsp_diagnostics(&analysis, max);
        self.client.publish_diagnostics(uri, diagnostics, Some(version)).await;
    }

    pub(crate) fn get_hover_info(&self, uri: &Url, position: Position) -> Option<Hover> {
        let (line, analysis) = {
            let doc = self.documents.get(uri)?;
            let line_idx = position.line as usize;
            if line_idx >= doc.content.len_lines() {
                return None;
            }
            (doc.content.line(line_idx).to_string(), doc.analysis.clone())
        };

        let line = line.trim_end_matches(['\n', '\r']);
        let (word, _) = word_at_position(line, position.character as usize)?;

        if let Some(analysis) = analysis {
            if let Some(symbol) = analysis.symbols.get(&word) {
                return Some(markdown_hover(render_symbol_hover(symbol)));
            }
        }
        self.analyzer
            .docs()
            .get(&word)
            .map(|entry| markdown_hover(render_doc_hover(&word, entry)))
    }
}

fn markdown_hover(value: String) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value,
        }),
        range: None,
    }
}

/// Lower core diagnostics to LSP diagnostics, capped at `max`.
pub(crate) fn to_lsp_diagnostics(analysis: &AnalysisResult, max: usize) -> Vec<Diagnostic> {
    analysis
        .diagnostics
        .iter()
        .take(max)
        .map(|d| Diagnostic {
            range: to_lsp_range(d.range),
            severity: Some(match d.severity {
                Severity::Error => DiagnosticSeverity::ERROR,
                Severity::Warning => DiagnosticSeverity::WARNING,
            }),
            code: Some(NumberOrString::String(d.code.as_str().to_string())),
            source: Some(
                match d.category {
                    Category::Syntax => "orion-syntax",
                    Category::Semantic => "orion-semantic",
                }
                .to_string(),
            ),
            message: d.message.clone(),
            ..Default::default()
        })
        .collect()
}

/// Markdown card for a document symbol: signature or typed declaration,
/// mutability, declaring line, and an unused note when relevant.
pub(crate) fn render_symbol_hover(symbol: &Symbol) -> String {
    let mut md = format!("**{}**\n\n", symbol.name());

    match symbol {
        Symbol::Function(f) => {
            md.push_str(&format!("```orion\n{}\n```\n", f.signature()));
            md.push_str(&format!("\nDefined at line {}", f.line + 1));
        }
        Symbol::Variable(v) => {
            match &v.ty {
                Some(ty) => md.push_str(&format!("```orion\n{} {}: {}\n```\n", v.keyword.as_str(), v.name, ty)),
                None => md.push_str(&format!("```orion\n{} {}\n```\n", v.keyword.as_str(), v.name)),
            }
            md.push_str(if v.keyword.is_mutable() {
                "Mutable variable\n"
            } else {
                "Immutable variable\n"
            });
            md.push_str(&format!("\nDefined at line {}", v.line + 1));
            if !v.used {
                md.push_str("\n\nVariable is never used");
            }
        }
    }

    md
}

/// Markdown card for a docs-table entry.
pub(crate) fn render_doc_hover(word: &str, entry: &DocEntry) -> String {
    let mut md = format!("**{}**\n\n", word);

    if let Some(syntax) = &entry.syntax {
        md.push_str(&format!("```orion\n{}\n```\n\n", syntax));
    }
    if let Some(description) = &entry.description {
        md.push_str(&format!("{}\n\n", description));
    }
    match &entry.params {
        Some(DocParams::Map(map)) => {
            md.push_str("**Parameters:**\n");
            for (param, desc) in map {
                md.push_str(&format!("- `{}`: {}\n", param, desc));
            }
            md.push('\n');
        }
        Some(DocParams::List(list)) => {
            md.push_str("**Parameters:**\n");
            for param in list {
                md.push_str(&format!("- `{}`\n", param));
            }
            md.push('\n');
        }
        None => {}
    }
    if let Some(returns) = &entry.returns {
        md.push_str(&format!("**Returns:** {}\n\n", returns));
    }
    if let Some(example) = &entry.example {
        md.push_str(&format!("**Example:**\n```orion\n{}\n```\n", example));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use orion_core::{Analyzer, KeywordDocs};

    fn analysis(src: &str) -> AnalysisResult {
        Analyzer::new(KeywordDocs::from_names(["let", "fn", "show"])).analyze(src)
    }

    #[test]
    fn diagnostics_carry_code_and_source() {
        let result = analysis("# hello");
        let diags = to_lsp_diagnostics(&result, 200);
        assert!(!diags.is_empty());
        assert_eq!(
            diags[0].code,
            Some(NumberOrString::String("invalid-comment".to_string()))
        );
        assert_eq!(diags[0].source.as_deref(), Some("orion-syntax"));
        assert_eq!(diags[0].severity, Some(DiagnosticSeverity::ERROR));
    }

    #[test]
    fn conversion_honors_the_cap() {
        let result = analysis(")))");
        assert_eq!(to_lsp_diagnostics(&result, 2).len(), 2);
    }

    #[test]
    fn function_hover_shows_signature_and_line() {
        let result = analysis("fn area(w: Int, h: Int) -> Int {\n}");
        let md = render_symbol_hover(result.symbols.get("area").unwrap());
        assert!(md.contains("fn area(w: Int, h: Int) -> Int"));
        assert!(md.contains("Defined at line 1"));
    }

    #[test]
    fn unused_variable_hover_carries_the_note() {
        let result = analysis("let y = 5");
        let md = render_symbol_hover(result.symbols.get("y").unwrap());
        assert!(md.contains("let y: Int"));
        assert!(md.contains("Mutable variable"));
        assert!(md.contains("never used"));
    }

    #[test]
    fn doc_hover_renders_every_section() {
        let entry: DocEntry = serde_json::from_str(
            r#"{
                "syntax": "show expr",
                "description": "Print a value",
                "params": { "expr": "value to print" },
                "returns": "nothing",
                "example": "show 42"
            }"#,
        )
        .unwrap();
        let md = render_doc_hover("show", &entry);
        assert!(md.contains("```orion\nshow expr\n```"));
        assert!(md.contains("Print a value"));
        assert!(md.contains("- `expr`: value to print"));
        assert!(md.contains("**Returns:** nothing"));
        assert!(md.contains("**Example:**"));
    }
}
