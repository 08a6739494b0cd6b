//! Error types for scanning and hashing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors that stop a walk before it starts.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for the root path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Per-file hashing failure. The file is left out of the index.
#[derive(Debug, Error)]
pub enum HashError {
    /// File disappeared between listing and reading.
    #[error("File vanished: {path}")]
    Vanished { path: PathBuf },

    /// Path exists but is no longer a regular file.
    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// Permission denied reading the file.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Generic read error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::Vanished { path },
            _ => Self::Io { path, source },
        }
    }

    /// Whether the file simply went away.
    pub fn is_vanished(&self) -> bool {
        matches!(self, Self::Vanished { .. })
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Error reading a directory.
    ReadError,
    /// Error reading metadata.
    MetadataError,
    /// Symlink loop detected while following links.
    SymlinkLoop,
    /// Scan root does not exist.
    MissingRoot,
}

/// Non-fatal warning encountered during a walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a permission denied warning.
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Permission denied: {}", path.display()),
            path,
            kind: WarningKind::PermissionDenied,
        }
    }

    /// Create a missing root warning.
    pub fn missing_root(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Source directory does not exist: {}", path.display()),
            path,
            kind: WarningKind::MissingRoot,
        }
    }

    /// Create a read error warning.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Read error: {error}"),
            path,
            kind: WarningKind::ReadError,
        }
    }
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_scan_error_io() {
        let err = ScanError::io(
            "/test/path",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));
    }

    #[test]
    fn test_hash_error_classification() {
        let gone = HashError::io("/a", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(gone.is_vanished());

        let other = HashError::io("/b", io::Error::other("device"));
        assert!(matches!(other, HashError::Io { .. }));
        assert!(other.to_string().contains("/b"));
    }

    #[test]
    fn test_scan_warning_creation() {
        let warning = ScanWarning::missing_root("/nope");
        assert_eq!(warning.kind, WarningKind::MissingRoot);
        assert!(warning.message.contains("/nope"));
    }
}
