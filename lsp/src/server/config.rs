use serde::Deserialize;
use tower_lsp::lsp_types::ConfigurationItem;

use super::state::OrionLanguageServer;

#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) max_diagnostics: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { max_diagnostics: 200 }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct OrionLspConfigSection {
    #[serde(default)]
    max_diagnostics: Option<usize>,
}

impl OrionLanguageServer {
    pub(crate) async fn load_config(&self) {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some("orion.lsp".to_string()),
        }];

        if let Ok(values) = self.client.configuration(items).await {
            if let Some(val) = values.into_iter().next() {
                if let Ok(cfg) = serde_json::from_value::<OrionLspConfigSection>(val) {
                    let mut guard = self.config.lock().unwrap();
                    if let Some(v) = cfg.max_diagnostics.filter(|v| *v > 0) {
                        guard.max_diagnostics = v;
                    }
                }
            }
        }
    }
}
