//! Pre-operation backup manifest.
//!
//! The manifest records every file the mission saw with a usable stat,
//! so a later move step can be checked against the tree as it was.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use liberator_core::{EventLog, FileRecord};

use crate::error::{MissionError, MissionResult, write_json};

/// One file in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Absolute path to the file.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Modification time in fractional seconds since the Unix epoch.
    pub modified: f64,
}

/// Snapshot of the source tree before any operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupManifest {
    /// Compact local time, `YYYYmmdd_HHMMSS`.
    pub timestamp: String,
    /// Directory that was walked.
    pub source_directory: String,
    /// Directory the manifest was written to.
    pub backup_directory: String,
    /// Every file with a usable stat, in discovery order.
    pub files: Vec<ManifestEntry>,
}

impl BackupManifest {
    /// Build a manifest from walked records. Records without a stat are left out.
    pub fn from_records<'a, I>(source: &Path, target: &Path, records: I, timestamp: String) -> Self
    where
        I: IntoIterator<Item = &'a FileRecord>,
    {
        let files = records
            .into_iter()
            .filter_map(|record| {
                let stat = record.stat.as_ref().ok()?;
                Some(ManifestEntry {
                    path: record.path.to_string_lossy().into_owned(),
                    size: stat.size,
                    modified: stat.modified_epoch_secs(),
                })
            })
            .collect();

        Self {
            timestamp,
            source_directory: source.to_string_lossy().into_owned(),
            backup_directory: target.to_string_lossy().into_owned(),
            files,
        }
    }

    /// File name for this manifest.
    pub fn file_name(&self) -> String {
        format!("backup_manifest_{}.json", self.timestamp)
    }
}

/// What the safety net wrote.
#[derive(Debug, Clone)]
pub struct ManifestOutcome {
    /// Where the manifest was written.
    pub path: PathBuf,
    /// The manifest itself.
    pub manifest: BackupManifest,
    /// Log events.
    pub events: EventLog,
}

/// Prepares the target directory and records the manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyNet;

impl SafetyNet {
    /// Create a safety net.
    pub fn new() -> Self {
        Self
    }

    /// Create the target directory and any missing parents.
    pub fn prepare_target(&self, target: &Path) -> MissionResult<()> {
        std::fs::create_dir_all(target).map_err(|source| MissionError::CreateTarget {
            path: target.to_path_buf(),
            source,
        })
    }

    /// Write `backup_manifest_{timestamp}.json` into the target.
    pub fn create_backup_manifest<'a, I>(
        &self,
        source: &Path,
        target: &Path,
        records: I,
    ) -> MissionResult<ManifestOutcome>
    where
        I: IntoIterator<Item = &'a FileRecord>,
    {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let manifest = BackupManifest::from_records(source, target, records, timestamp);
        let path = target.join(manifest.file_name());

        let mut events = EventLog::new();
        events.info(format!("Creating backup manifest: {}", path.display()));

        let path = write_json(path, "backup manifest", &manifest)?;
        events.info(format!("Manifest created with {} files", manifest.files.len()));

        Ok(ManifestOutcome {
            path,
            manifest,
            events,
        })
    }
}
