//! Size accounting and oversized file detection.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use liberator_core::{EventLog, FileRecord, MIB, bytes_to_mib};

/// Default oversize threshold: 100 MiB.
pub const DEFAULT_OVERSIZE_THRESHOLD: u64 = 100 * MIB;

/// Configuration for size analysis.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct SizeConfig {
    /// Files strictly larger than this are oversized.
    #[builder(default = "DEFAULT_OVERSIZE_THRESHOLD")]
    pub oversize_threshold: u64,

    /// Number of oversized files to name in the log.
    #[builder(default = "10")]
    pub top_n: usize,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            oversize_threshold: DEFAULT_OVERSIZE_THRESHOLD,
            top_n: 10,
        }
    }
}

impl SizeConfig {
    /// Create a new config builder.
    pub fn builder() -> SizeConfigBuilder {
        SizeConfigBuilder::default()
    }
}

/// A file above the oversize threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OversizedFile {
    /// Path to the file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
}

/// Results from size analysis.
#[derive(Debug, Clone)]
pub struct SizeReport {
    /// Oversized files, largest first; ties keep discovery order.
    pub oversized: Vec<OversizedFile>,
    /// Sum of every successfully measured file.
    pub total_size: u64,
    /// Files whose size was known.
    pub files_measured: u64,
    /// Files whose stat failed.
    pub errors: u64,
    /// Log events.
    pub events: EventLog,
}

impl SizeReport {
    /// Total size in mebibytes.
    pub fn total_size_mib(&self) -> f64 {
        bytes_to_mib(self.total_size)
    }

    /// Combined size of the oversized files.
    pub fn oversized_bytes(&self) -> u64 {
        self.oversized.iter().map(|f| f.size).sum()
    }
}

/// Accumulates sizes over a set of files.
pub struct SizeAnalyzer {
    config: SizeConfig,
}

impl SizeAnalyzer {
    /// Create a new analyzer with default config.
    pub fn new() -> Self {
        Self {
            config: SizeConfig::default(),
        }
    }

    /// Create a new analyzer with custom config.
    pub fn with_config(config: SizeConfig) -> Self {
        Self { config }
    }

    /// Measure every record.
    pub fn analyze<'a, I>(&self, records: I) -> SizeReport
    where
        I: IntoIterator<Item = &'a FileRecord>,
    {
        let mut events = EventLog::new();
        let mut oversized = Vec::new();
        let mut total_size: u64 = 0;
        let mut files_measured: u64 = 0;
        let mut errors: u64 = 0;

        for record in records {
            match &record.stat {
                Ok(stat) => {
                    total_size += stat.size;
                    files_measured += 1;
                    if stat.size > self.config.oversize_threshold {
                        oversized.push(OversizedFile {
                            path: record.path.clone(),
                            size: stat.size,
                        });
                    }
                }
                Err(failure) => {
                    errors += 1;
                    events.warn(format!(
                        "Error checking size of {}: {failure}",
                        record.path.display()
                    ));
                }
            }
        }

        // Stable, so equal sizes keep discovery order
        oversized.sort_by(|a, b| b.size.cmp(&a.size));

        let threshold_mib = bytes_to_mib(self.config.oversize_threshold);
        events.info(format!(
            "Total: {files_measured} files, {:.1} MB",
            bytes_to_mib(total_size)
        ));
        events.info(format!(
            "Found {} files over {threshold_mib:.0}MB",
            oversized.len()
        ));
        for file in oversized.iter().take(self.config.top_n) {
            let name = file
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            events.info(format!("  {:.1} MB: {name}", bytes_to_mib(file.size)));
        }

        SizeReport {
            oversized,
            total_size,
            files_measured,
            errors,
            events,
        }
    }
}

impl Default for SizeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liberator_core::{FileStat, StatFailure};
    use std::time::UNIX_EPOCH;

    fn record(path: &str, size: u64) -> FileRecord {
        FileRecord::new(path, 1, Ok(FileStat::new(size, UNIX_EPOCH)))
    }

    #[test]
    fn test_sorted_descending_and_stable() {
        let analyzer = SizeAnalyzer::with_config(
            SizeConfig::builder().oversize_threshold(10u64).build().unwrap(),
        );
        let records = [
            record("/a", 20),
            record("/b", 50),
            record("/c", 20),
            record("/d", 10),
            record("/e", 5),
        ];

        let report = analyzer.analyze(&records);
        let order: Vec<_> = report
            .oversized
            .iter()
            .map(|f| f.path.to_str().unwrap())
            .collect();

        assert_eq!(order, ["/b", "/a", "/c"]);
        assert_eq!(report.oversized_bytes(), 90);
        assert_eq!(report.total_size, 105);
        assert_eq!(report.files_measured, 5);
    }

    #[test]
    fn test_stat_failures_excluded() {
        let failed = FileRecord::new(
            "/locked",
            1,
            Err(StatFailure::new("PermissionDenied", "denied")),
        );
        let records = [record("/ok", 7), failed];

        let report = SizeAnalyzer::new().analyze(&records);
        assert_eq!(report.total_size, 7);
        assert_eq!(report.errors, 1);
        assert!(report.oversized.is_empty());
        assert_eq!(report.events.warning_count(), 1);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let records = [
            record("/exact", DEFAULT_OVERSIZE_THRESHOLD),
            record("/over", DEFAULT_OVERSIZE_THRESHOLD + 1),
        ];
        let report = SizeAnalyzer::new().analyze(&records);

        assert_eq!(report.oversized.len(), 1);
        assert_eq!(report.oversized[0].path, PathBuf::from("/over"));
    }
}
