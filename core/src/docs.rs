use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

/// Parameter documentation appears in two shapes in docs.json: a map of
/// name -> description, or a bare list of names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DocParams {
    Map(BTreeMap<String, String>),
    List(Vec<String>),
}

/// One keyword/built-in entry from the external documentation table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocEntry {
    #[serde(default)]
    pub syntax: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub params: Option<DocParams>,
    #[serde(default)]
    pub returns: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
}

/// Read-only keyword/documentation table, loaded once at process start.
///
/// The analyzer treats any word absent from both this table and the current
/// symbol table as a candidate undefined reference, so a load failure must
/// degrade to the empty table rather than refusing to run.
#[derive(Debug, Clone, Default)]
pub struct KeywordDocs {
    entries: BTreeMap<String, DocEntry>,
}

impl KeywordDocs {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, DocEntry>>(&raw) {
                Ok(entries) => {
                    tracing::info!(path = %path.display(), keywords = entries.len(), "loaded keyword docs");
                    Self { entries }
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "malformed keyword docs, using empty table");
                    Self::empty()
                }
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "keyword docs unavailable, using empty table");
                Self::empty()
            }
        }
    }

    /// Build a table from known names with empty entries. Handy for tests
    /// and for callers that only need membership checks.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = names.into_iter().map(|n| (n.into(), DocEntry::default())).collect();
        Self { entries }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn get(&self, word: &str) -> Option<&DocEntry> {
        self.entries.get(word)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
