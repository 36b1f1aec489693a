use anyhow::Context;
use std::path::{Component, Path};

use orion_core::{AnalysisResult, Analyzer, KeywordDocs, Severity};

/// `orion-lsp --analyze [--errors-only] <relative path>` runs one analysis
/// pass over a file and prints the result instead of starting the server.
pub(crate) fn try_cli_analyze() -> anyhow::Result<Option<String>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() <= 1 {
        return Ok(None);
    }

    if let Some(i) = args.iter().position(|a| a == "--analyze") {
        let mut path_index = i + 1;
        while path_index < args.len() && args[path_index].starts_with("--") {
            path_index += 1;
        }

        let path = args.get(path_index).cloned().ok_or_else(|| {
            anyhow::anyhow!(
                "Usage: orion-lsp --analyze [--errors-only] <relative-file-path>\n  --analyze <file>     : Full analysis with JSON output\n  --errors-only        : Show only errors in simple format"
            )
        })?;

        let errors_only = args.iter().any(|a| a == "--errors-only");
        let content = read_file_content(&path)?;

        let docs_path = std::env::var("ORION_DOCS").unwrap_or_else(|_| "docs/docs.json".to_string());
        let analyzer = Analyzer::new(KeywordDocs::load(&docs_path));
        let analysis = analyzer.analyze(&content);

        if errors_only {
            return Ok(Some(render_errors(&analysis)));
        }
        return Ok(Some(render_json(&analysis)?));
    }

    Ok(None)
}

pub(crate) fn render_errors(analysis: &AnalysisResult) -> String {
    let errors: Vec<String> = analysis
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .map(|d| {
            format!(
                "Line {}:{}: {}",
                d.range.line + 1,
                d.range.start + 1,
                d.message
            )
        })
        .collect();

    if errors.is_empty() {
        "No errors found".to_string()
    } else {
        errors.join("\n")
    }
}

pub(crate) fn render_json(analysis: &AnalysisResult) -> anyhow::Result<String> {
    let output = serde_json::json!({
        "diagnostics": analysis.diagnostics,
        "symbols": analysis.symbols,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

pub(crate) fn is_safe_path(path: &str) -> bool {
    let path = Path::new(path);

    if path.as_os_str().is_empty() {
        return false;
    }
    if path.is_absolute() {
        return false;
    }
    if path.components().any(|c| c == Component::ParentDir) {
        return false;
    }

    let s = path.to_string_lossy();
    let suspicious = ['\0', '\n', '\r', '\t'];
    if s.chars().any(|c| suspicious.contains(&c)) {
        return false;
    }
    if s.len() >= 2 && s.as_bytes()[1] == b':' {
        return false;
    }
    true
}

pub(crate) fn read_file_content(path: &str) -> anyhow::Result<String> {
    if !is_safe_path(path) {
        return Err(anyhow::anyhow!("Unsafe file path: {}", path));
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file '{}'", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(src: &str) -> AnalysisResult {
        Analyzer::new(KeywordDocs::from_names(["let", "fn", "show"])).analyze(src)
    }

    #[test]
    fn traversal_and_absolute_paths_are_rejected() {
        assert!(is_safe_path("scripts/demo.orion"));
        assert!(!is_safe_path(""));
        assert!(!is_safe_path("/etc/passwd"));
        assert!(!is_safe_path("../secret.orion"));
        assert!(!is_safe_path("a/../../b.orion"));
        assert!(!is_safe_path("C:file.orion"));
        assert!(!is_safe_path("bad\npath.orion"));
    }

    #[test]
    fn unsafe_path_never_reaches_the_filesystem() {
        let err = read_file_content("/etc/passwd").unwrap_err();
        assert!(err.to_string().contains("Unsafe file path"));
    }

    #[test]
    fn error_listing_is_one_based_and_errors_only() {
        let out = render_errors(&analysis("let x = 1\n# bad"));
        assert!(out.starts_with("Line 2:1:"), "got: {out}");
        assert!(!out.contains("never used"), "warnings must be excluded");
    }

    #[test]
    fn clean_input_reports_no_errors() {
        assert_eq!(render_errors(&analysis("let x = 1\nshow x")), "No errors found");
    }

    #[test]
    fn json_output_round_trips() {
        let out = render_json(&analysis("let x = 1")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["diagnostics"].is_array());
        assert!(value["symbols"].is_object());
    }
}
