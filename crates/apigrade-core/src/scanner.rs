use std::path::{Component, Path};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::{DirEntry, WalkDir};

use crate::analyzer::SignalExtractor;
use crate::config::ScannerConfig;
use crate::error::GradeError;
use crate::types::SubmissionAnalysis;

/// Walks a submission tree and aggregates per-file signals.
pub struct Scanner {
    extractor: Box<dyn SignalExtractor>,
    excluded_dirs: Vec<String>,
    exclude: GlobSet,
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, GradeError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| GradeError::InvalidExcludePattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| GradeError::InvalidExcludePattern {
            pattern: patterns.join(", "),
            reason: e.to_string(),
        })
}

/// Path relative to `root`, joined with `/` regardless of platform.
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

impl Scanner {
    pub fn new(
        extractor: Box<dyn SignalExtractor>,
        config: &ScannerConfig,
    ) -> Result<Self, GradeError> {
        Ok(Self {
            extractor,
            excluded_dirs: config.excluded_dirs.clone(),
            exclude: build_globset(&config.exclude_patterns)?,
        })
    }

    pub fn extractor(&self) -> &dyn SignalExtractor {
        self.extractor.as_ref()
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.excluded_dirs.iter().any(|d| d == name))
    }

    fn matches_extension(&self, path: &Path) -> bool {
        let extensions = self.extractor.file_extensions();
        path.extension()
            .is_some_and(|ext| extensions.iter().any(|e| ext == *e))
    }

    /// Scan `root`. A missing root yields an empty analysis.
    pub fn scan(&self, root: &Path) -> SubmissionAnalysis {
        let mut analysis = SubmissionAnalysis::new();

        if !root.is_dir() {
            tracing::warn!(root = %root.display(), "submission directory not found");
            return analysis;
        }

        tracing::info!(
            root = %root.display(),
            language = self.extractor.language(),
            "scanning submission"
        );

        let entries = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded_dir(e))
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!("skipping unreadable entry: {err}");
                    None
                }
            });

        for entry in entries {
            if entry.file_type().is_dir() || !self.matches_extension(entry.path()) {
                continue;
            }

            let rel_path = relative_path(root, entry.path());
            if self.exclude.is_match(&rel_path) {
                tracing::debug!(file = %rel_path, "excluded by pattern");
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            let content = match std::fs::read(entry.path()) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::warn!(file = %rel_path, "failed to read: {e}");
                    analysis.record_read_error(&file_name, &e.to_string());
                    continue;
                }
            };

            let signals = self.extractor.extract(&rel_path, &content);
            tracing::debug!(
                file = %rel_path,
                lines = signals.non_blank_lines,
                endpoints = signals.endpoints.len(),
                "analyzed"
            );
            analysis.absorb(&rel_path, signals);
        }

        tracing::info!(
            files = analysis.files_analyzed.len(),
            errors = analysis.syntax_errors.len(),
            "scan complete"
        );
        analysis
    }
}
