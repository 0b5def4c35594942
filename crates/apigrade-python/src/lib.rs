use anyhow::{Context, Result};
use regex::Regex;

use apigrade_core::analyzer::SignalExtractor;
use apigrade_core::types::FileSignals;

/// Imports kept per file; the rest are dropped.
pub const MAX_IMPORTS_PER_FILE: usize = 5;

const FRAMEWORK_NEEDLE: &str = "fastapi";
const TEST_PREFIX: &str = "test_";

/// Python/FastAPI extractor working on raw text with regular expressions.
///
/// No parsing happens here, so files with syntax errors still yield signals.
pub struct FastApiExtractor {
    route_patterns: Vec<Regex>,
    def_pattern: Regex,
    class_pattern: Regex,
    import_pattern: Regex,
}

fn route_pattern(receiver: &str) -> Result<Regex> {
    Regex::new(&format!(
        r#"(?i)@{receiver}\.(get|post|put|delete|patch)\s*\(\s*["']([^"']+)["']"#
    ))
    .with_context(|| format!("failed to compile @{receiver} route pattern"))
}

impl FastApiExtractor {
    pub fn new() -> Result<Self> {
        let route_patterns = vec![route_pattern("app")?, route_pattern("router")?];

        let def_pattern =
            Regex::new(r"(?mR)^\s*def\s+\w+").context("failed to compile def pattern")?;
        let class_pattern =
            Regex::new(r"(?mR)^\s*class\s+\w+").context("failed to compile class pattern")?;
        let import_pattern = Regex::new(r"(?mR)^(?:from\s+\S+\s+)?import\s+.+")
            .context("failed to compile import pattern")?;

        Ok(Self {
            route_patterns,
            def_pattern,
            class_pattern,
            import_pattern,
        })
    }

    /// "METHOD PATH" labels in match order, `@app` routes before `@router` routes.
    fn extract_endpoints(&self, content: &str) -> Vec<String> {
        let mut endpoints = Vec::new();
        for pattern in &self.route_patterns {
            for caps in pattern.captures_iter(content) {
                let method = caps[1].to_uppercase();
                let path = &caps[2];
                endpoints.push(format!("{method} {path}"));
            }
        }
        endpoints
    }

    fn extract_imports(&self, content: &str) -> Vec<String> {
        self.import_pattern
            .find_iter(content)
            .take(MAX_IMPORTS_PER_FILE)
            .map(|m| m.as_str().trim_end().to_string())
            .collect()
    }
}

/// Non-blank lines, treating `\n`, `\r\n` and a lone `\r` as line breaks.
fn non_blank_lines(content: &str) -> usize {
    content
        .split(['\n', '\r'])
        .filter(|l| !l.trim().is_empty())
        .count()
}

fn is_test_file(rel_path: &str) -> bool {
    let name = rel_path.rsplit('/').next().unwrap_or(rel_path);
    name.to_lowercase().contains("test") || name.starts_with(TEST_PREFIX)
}

impl SignalExtractor for FastApiExtractor {
    fn language(&self) -> &'static str {
        "python"
    }

    fn framework(&self) -> &'static str {
        "FastAPI"
    }

    fn file_extensions(&self) -> &[&str] {
        &["py"]
    }

    fn extract(&self, rel_path: &str, content: &str) -> FileSignals {
        FileSignals {
            non_blank_lines: non_blank_lines(content),
            functions: self.def_pattern.find_iter(content).count(),
            classes: self.class_pattern.find_iter(content).count(),
            uses_framework: content.to_lowercase().contains(FRAMEWORK_NEEDLE),
            endpoints: self.extract_endpoints(content),
            is_test_file: is_test_file(rel_path),
            imports: self.extract_imports(content),
        }
    }
}
