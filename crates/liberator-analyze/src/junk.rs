//! Junk file detection.
//!
//! A path is junk when any rule matches either its lowercased full path or
//! its lowercased file name.

use std::path::{Path, PathBuf};

use regex::RegexSet;
use serde::{Deserialize, Serialize};

use liberator_core::{EventLog, FileRecord, bytes_to_mib};

use crate::AnalyzeError;

/// Ordered set of junk patterns (regular expressions over lowercase text).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JunkRules {
    /// Patterns, matched unanchored unless they anchor themselves.
    pub patterns: Vec<String>,
}

impl Default for JunkRules {
    fn default() -> Self {
        let patterns = [
            // temp and cache files
            r"\.tmp$",
            r"\.temp$",
            r"\.cache$",
            r"~$",
            // OS metadata
            r"desktop\.ini$",
            r"thumbs\.db$",
            r"\.ds_store$",
            // interpreter caches and compiled artifacts
            r"__pycache__",
            r"\.pyc$",
            r"\.pyo$",
            // dependency and version-control directories
            r"node_modules",
            r"\.git",
            r"\.vscode",
            // logs
            r"\.log$",
            r"error\.log",
            r"debug\.log",
        ];
        Self {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// A file flagged as junk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunkFile {
    /// Path to the file.
    pub path: PathBuf,
    /// Size in bytes, if it could be determined.
    pub size: Option<u64>,
}

/// Results from junk detection.
#[derive(Debug, Clone)]
pub struct JunkReport {
    /// Junk files in discovery order.
    pub files: Vec<JunkFile>,
    /// Combined size of junk files with a known size.
    pub total_size: u64,
    /// Junk files whose size could not be determined.
    pub unknown_size: u64,
    /// Log events.
    pub events: EventLog,
}

impl JunkReport {
    /// Number of junk files.
    pub fn count(&self) -> usize {
        self.files.len()
    }
}

/// Flags disposable files by name.
#[derive(Debug, Clone)]
pub struct JunkDetector {
    patterns: RegexSet,
}

impl JunkDetector {
    /// Compile a rule set.
    pub fn new(rules: &JunkRules) -> Result<Self, AnalyzeError> {
        let patterns = RegexSet::new(&rules.patterns)?;
        Ok(Self { patterns })
    }

    /// Number of compiled patterns.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Check whether a path matches any junk rule.
    pub fn is_junk(&self, path: &Path) -> bool {
        let full = path.to_string_lossy().to_lowercase();
        if self.patterns.is_match(&full) {
            return true;
        }

        path.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .is_some_and(|name| self.patterns.is_match(&name))
    }

    /// Collect every junk file among the records.
    ///
    /// A size that cannot be determined never counts toward `total_size`,
    /// but the file is still listed since membership depends only on its name.
    pub fn find_junk<'a, I>(&self, records: I) -> JunkReport
    where
        I: IntoIterator<Item = &'a FileRecord>,
    {
        let mut events = EventLog::new();
        let mut files = Vec::new();
        let mut total_size: u64 = 0;
        let mut unknown_size: u64 = 0;

        for record in records.into_iter().filter(|r| self.is_junk(&r.path)) {
            let size = match &record.stat {
                Ok(stat) => {
                    total_size += stat.size;
                    Some(stat.size)
                }
                Err(failure) => {
                    unknown_size += 1;
                    events.warn(format!(
                        "Error checking size of {}: {failure}",
                        record.path.display()
                    ));
                    None
                }
            };
            files.push(JunkFile {
                path: record.path.clone(),
                size,
            });
        }

        events.info(format!(
            "Found {} junk files, {:.1} MB total",
            files.len(),
            bytes_to_mib(total_size)
        ));

        JunkReport {
            files,
            total_size,
            unknown_size,
            events,
        }
    }
}
