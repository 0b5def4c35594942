use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::json::{format_record, EvaluationRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Report,
    Record,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Report => write!(f, "report"),
            ArtifactKind::Record => write!(f, "record"),
        }
    }
}

/// Failure to persist one output artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to write {kind} to '{}': {source}", .path.display())]
    Write {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize evaluation record: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ArtifactError {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactError::Write { kind, .. } => *kind,
            ArtifactError::Serialize(_) => ArtifactKind::Record,
        }
    }
}

/// Result of writing both artifacts. Each write is attempted independently.
#[derive(Debug, Default)]
pub struct PersistOutcome {
    pub failures: Vec<ArtifactError>,
}

impl PersistOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

fn write_artifact(kind: ArtifactKind, path: &Path, content: &str) -> Result<(), ArtifactError> {
    std::fs::write(path, content).map_err(|source| ArtifactError::Write {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "{kind} saved");
    Ok(())
}

fn write_record(path: &Path, record: &EvaluationRecord<'_>) -> Result<(), ArtifactError> {
    let json = format_record(record)?;
    write_artifact(ArtifactKind::Record, path, &json)
}

/// Write the narrative and the record, overwriting previous runs.
pub fn write_artifacts(
    report_path: &Path,
    report: &str,
    record_path: &Path,
    record: &EvaluationRecord<'_>,
) -> PersistOutcome {
    let mut outcome = PersistOutcome::default();

    let results = [
        write_artifact(ArtifactKind::Report, report_path, report),
        write_record(record_path, record),
    ];
    for result in results {
        if let Err(e) = result {
            tracing::error!("{e}");
            outcome.failures.push(e);
        }
    }

    outcome
}
