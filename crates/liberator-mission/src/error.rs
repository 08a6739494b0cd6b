//! Error types for a mission run.

use std::path::PathBuf;

use thiserror::Error;

use liberator_analyze::AnalyzeError;
use liberator_core::ScanError;

/// Errors that abort a mission.
#[derive(Debug, Error)]
pub enum MissionError {
    /// The source tree could not be walked.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// An analysis could not be set up.
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),

    /// The target directory could not be created.
    #[error("Cannot create target directory {path}: {source}")]
    CreateTarget {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output document could not be serialized.
    #[error("Cannot serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Result alias for mission operations.
pub type MissionResult<T> = Result<T, MissionError>;

/// Serialize `value` as pretty JSON and write it to `path`.
pub(crate) fn write_json<T: serde::Serialize>(
    path: PathBuf,
    what: &'static str,
    value: &T,
) -> MissionResult<PathBuf> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|source| MissionError::Serialize { what, source })?;
    match std::fs::write(&path, json) {
        Ok(()) => Ok(path),
        Err(source) => Err(MissionError::Write { path, source }),
    }
}
