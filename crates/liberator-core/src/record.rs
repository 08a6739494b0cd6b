//! File records and content hashes.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// BLAKE3 content hash for duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Result of a successful `stat` on a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStat {
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
}

impl FileStat {
    /// Create a stat result.
    pub fn new(size: u64, modified: SystemTime) -> Self {
        Self { size, modified }
    }

    /// Build from filesystem metadata.
    pub fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        Self {
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(UNIX_EPOCH),
        }
    }

    /// Modification time as fractional seconds since the Unix epoch.
    ///
    /// Times before the epoch come out negative.
    pub fn modified_epoch_secs(&self) -> f64 {
        match self.modified.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs_f64(),
            Err(e) => -e.duration().as_secs_f64(),
        }
    }
}

/// Why a `stat` could not be taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatFailure {
    /// Error kind, rendered as text.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}

impl StatFailure {
    /// Create a failure from a kind and message.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Capture an I/O error.
    pub fn from_io(error: &io::Error) -> Self {
        Self {
            kind: format!("{:?}", error.kind()),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for StatFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A regular file discovered by the tree walker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path to the file.
    pub path: PathBuf,

    /// File name (not full path).
    pub name: CompactString,

    /// Depth below the scan root (direct children are depth 1).
    pub depth: usize,

    /// Stat taken right after discovery.
    pub stat: Result<FileStat, StatFailure>,
}

impl FileRecord {
    /// Create a record for a path with a known stat result.
    pub fn new(
        path: impl Into<PathBuf>,
        depth: usize,
        stat: Result<FileStat, StatFailure>,
    ) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_default();
        Self {
            path,
            name,
            depth,
            stat,
        }
    }

    /// Create a record by stat-ing the path now.
    pub fn probe(path: impl Into<PathBuf>, depth: usize) -> Self {
        let path = path.into();
        let stat = std::fs::metadata(&path)
            .map(|m| FileStat::from_metadata(&m))
            .map_err(|e| StatFailure::from_io(&e));
        Self::new(path, depth, stat)
    }

    /// Get the path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes, if the stat succeeded.
    pub fn size(&self) -> Option<u64> {
        self.stat.as_ref().ok().map(|s| s.size)
    }

    /// Check whether the stat succeeded.
    pub fn has_stat(&self) -> bool {
        self.stat.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_content_hash_hex() {
        let hash = ContentHash::new([0xab; 32]);
        assert_eq!(hash.to_hex().len(), 64);
        assert!(hash.to_hex().starts_with("abab"));
    }

    #[test]
    fn test_record_name_from_path() {
        let record = FileRecord::new(
            "/docs/notes/todo.md",
            2,
            Ok(FileStat::new(12, UNIX_EPOCH)),
        );
        assert_eq!(record.name.as_str(), "todo.md");
        assert_eq!(record.size(), Some(12));
    }

    #[test]
    fn test_record_without_stat() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let failure = StatFailure::from_io(&denied);
        let record = FileRecord::new("/docs/secret.txt", 1, Err(failure));
        assert!(!record.has_stat());
        assert_eq!(record.size(), None);
    }

    #[test]
    fn test_modified_epoch_secs_is_fractional() {
        let stat = FileStat::new(0, UNIX_EPOCH + Duration::from_millis(1500));
        assert!((stat.modified_epoch_secs() - 1.5).abs() < f64::EPSILON);
    }
}
