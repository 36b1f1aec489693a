use std::collections::HashMap;

use ropey::Rope;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;
use tracing::info;

use orion_core::{quick_fix, Symbol, VarKeyword};

use super::analysis::to_lsp_diagnostics;
use super::state::{Document, OrionLanguageServer};
use super::text::{apply_incremental_change_rope, fix_edit_to_text_edit};

#[tower_lsp::async_trait]
impl LanguageServer for OrionLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Orion Language Server initializing, root: {:?}", params.root_uri);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: None,
                    work_done_progress_options: Default::default(),
                    all_commit_characters: None,
                    completion_item: None,
                }),
                document_symbol_provider: Some(OneOf::Left(true)),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                diagnostic_provider: Some(DiagnosticServerCapabilities::Options(DiagnosticOptions {
                    identifier: Some("orion".to_string()),
                    inter_file_dependencies: false,
                    workspace_diagnostics: false,
                    work_done_progress_options: Default::default(),
                })),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "Orion Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("Orion Language Server initialized");
        let _ = self
            .client
            .log_message(MessageType::INFO, "Orion Language Server started")
            .await;
        self.load_config().await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Orion Language Server shutting down");
        Ok(())
    }

    async fn did_change_configuration(&self, _params: DidChangeConfigurationParams) {
        self.load_config().await;

        // The publishing cap may have changed; refresh every open document.
        let open: Vec<(Url, i32)> = self
            .documents
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().version))
            .collect();
        for (uri, version) in open {
            self.publish_diagnostics(uri, version).await;
        }
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        self.documents.insert(
            uri.clone(),
            Document {
                content: Rope::from_str(&params.text_document.text),
                version,
                analysis: None,
            },
        );

        self.publish_diagnostics(uri, version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        {
            let mut entry = self.documents.entry(uri.clone()).or_default();
            entry.version = version;

            if params.content_changes.len() == 1 && params.content_changes[0].range.is_none() {
                let change = params.content_changes.into_iter().next().unwrap();
                entry.content = Rope::from_str(&change.text);
            } else {
                for change in params.content_changes {
                    apply_incremental_change_rope(&mut entry.content, &change);
                }
            }

            entry.analysis = None;
        }

        self.publish_diagnostics(uri, version).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri);
        // Clear anything still displayed for the evicted document.
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        Ok(self.get_hover_info(uri, position))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;

        let mut items = self.base_completions();
        if let Some(analysis) = self.stored_analysis(uri) {
            let known: Vec<String> = items.iter().map(|i| i.label.clone()).collect();
            items.extend(
                self.symbol_completions(&analysis)
                    .into_iter()
                    .filter(|i| !known.contains(&i.label)),
            );
        }

        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn document_symbol(&self, params: DocumentSymbolParams) -> Result<Option<DocumentSymbolResponse>> {
        let uri = &params.text_document.uri;
        let Some(analysis) = self.stored_analysis(uri) else {
            return Ok(None);
        };
        if analysis.symbols.is_empty() {
            return Ok(None);
        }

        let symbols: Vec<DocumentSymbol> = analysis.symbols.symbols().map(outline_symbol).collect();
        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let uri = &params.text_document.uri;
        let Some(analysis) = self.stored_analysis(uri) else {
            return Ok(None);
        };
        let Some(doc) = self.documents.get(uri) else {
            return Ok(None);
        };

        let mut actions: Vec<CodeActionOrCommand> = Vec::new();
        for lsp_diag in &params.context.diagnostics {
            let code = match lsp_diag.code.as_ref() {
                Some(NumberOrString::String(s)) => s.as_str(),
                _ => continue,
            };

            // Recover the structured diagnostic behind the client's copy.
            let Some(core_diag) = find_stored_diagnostic(&analysis, code, &lsp_diag.range) else {
                continue;
            };

            let line_idx = core_diag.range.line as usize;
            if line_idx >= doc.content.len_lines() {
                continue;
            }
            let line_text = doc.content.line(line_idx).to_string();
            let line_text = line_text.trim_end_matches(['\n', '\r']);

            let Some(fix) = quick_fix(core_diag, line_text) else {
                continue;
            };

            let edit = fix_edit_to_text_edit(&doc.content, &fix.edit);
            actions.push(CodeActionOrCommand::CodeAction(CodeAction {
                title: fix.title,
                kind: Some(CodeActionKind::QUICKFIX),
                diagnostics: Some(vec![lsp_diag.clone()]),
                edit: Some(WorkspaceEdit {
                    changes: Some(HashMap::from([(uri.clone(), vec![edit])])),
                    ..Default::default()
                }),
                command: None,
                is_preferred: Some(true),
                disabled: None,
                data: None,
            }));
        }

        if actions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(actions))
        }
    }

    async fn diagnostic(&self, params: DocumentDiagnosticParams) -> Result<DocumentDiagnosticReportResult> {
        let uri = &params.text_document.uri;
        let items = match self.stored_analysis(uri) {
            Some(analysis) => {
                let max = self.config.lock().unwrap().max_diagnostics;
                to_lsp_diagnostics(&analysis, max)
            }
            None => Vec::new(),
        };

        Ok(DocumentDiagnosticReportResult::Report(DocumentDiagnosticReport::Full(
            RelatedFullDocumentDiagnosticReport {
                related_documents: None,
                full_document_diagnostic_report: FullDocumentDiagnosticReport {
                    result_id: None,
                    items,
                },
            },
        )))
    }
}

/// Match a client-echoed diagnostic back to its stored counterpart. The
/// full range participates so two same-code diagnostics sharing a start
/// column cannot be confused.
fn find_stored_diagnostic<'a>(
    analysis: &'a orion_core::AnalysisResult,
    code: &str,
    range: &Range,
) -> Option<&'a orion_core::Diagnostic> {
    analysis.diagnostics.iter().find(|d| {
        d.code.as_str() == code
            && d.range.line == range.start.line
            && d.range.start == range.start.character
            && d.range.end == range.end.character
    })
}

fn outline_symbol(symbol: &Symbol) -> DocumentSymbol {
    let (kind, detail, name_col, name_len) = match symbol {
        Symbol::Function(f) => (
            SymbolKind::FUNCTION,
            Some(f.signature()),
            f.name_col,
            f.name.chars().count() as u32,
        ),
        Symbol::Variable(v) => (
            if v.keyword == VarKeyword::Const {
                SymbolKind::CONSTANT
            } else {
                SymbolKind::VARIABLE
            },
            v.ty.clone(),
            v.name_col,
            v.name.chars().count() as u32,
        ),
    };

    let line = symbol.line();
    let selection_range = Range {
        start: Position::new(line, name_col),
        end: Position::new(line, name_col + name_len),
    };

    DocumentSymbol {
        name: symbol.name().to_string(),
        detail,
        kind,
        tags: None,
        #[allow(deprecated)]
        deprecated: None,
        range: Range {
            start: Position::new(line, 0),
            end: selection_range.end,
        },
        selection_range,
        children: None,
    }
}
