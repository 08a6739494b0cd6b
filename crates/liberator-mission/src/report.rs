//! The liberation report written at the end of a mission.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use liberator_core::Category;

use crate::agents::Agent;
use crate::error::{MissionResult, write_json};

/// Name of the report file inside the target directory.
pub const REPORT_FILE_NAME: &str = "liberation_report.json";

/// Summary of one mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiberationReport {
    /// ISO-8601 local time the report was built.
    pub timestamp: String,
    /// Source directory as given.
    pub source: String,
    /// Target directory as given.
    pub target: String,
    /// Files hashed successfully.
    pub total_files: u64,
    /// Digests shared by two or more files.
    pub duplicate_sets: usize,
    /// Files above the oversize threshold.
    pub large_files: usize,
    /// Files matching a junk rule.
    pub junk_files: usize,
    /// Size of every measured file, in mebibytes.
    pub total_size_mb: f64,
    /// File count per non-empty category, over the hashed files.
    pub categories: BTreeMap<Category, usize>,
    /// Rendered log lines per agent.
    pub agent_logs: BTreeMap<Agent, Vec<String>>,
}

impl LiberationReport {
    /// Current local time in the report's timestamp format.
    pub fn now_timestamp() -> String {
        Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }

    /// Sum of all category counts.
    pub fn categorized_files(&self) -> usize {
        self.categories.values().sum()
    }

    /// Write the report as pretty JSON into `target`.
    pub fn write_to(&self, target: &Path) -> MissionResult<PathBuf> {
        write_json(target.join(REPORT_FILE_NAME), "liberation report", self)
    }
}
