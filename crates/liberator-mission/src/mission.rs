//! The mission coordinator.
//!
//! A mission walks the source tree once and fans the records out to every
//! analysis, then writes a manifest and a report into the target directory.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::info;

use liberator_analyze::{
    ClassificationRules, Classifier, DuplicateConfig, DuplicateHunter, HuntOutcome, JunkDetector,
    JunkReport, JunkRules, Organization, SizeAnalyzer, SizeConfig, SizeReport,
};
use liberator_core::{EventLog, FileRecord, ScanConfig, ScanWarning, bytes_to_mib};
use liberator_scan::TreeWalker;

use crate::agents::{Agent, AgentLogs};
use crate::error::MissionResult;
use crate::manifest::{ManifestOutcome, SafetyNet};
use crate::progress::{DEFAULT_REPORT_EVERY, ProgressReporter};
use crate::report::LiberationReport;

/// Configuration for a mission.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct MissionConfig {
    /// Directory to analyze.
    pub source: PathBuf,

    /// Directory that receives the manifest and report.
    pub target: PathBuf,

    /// Analyze only. No operation moves files, so this only marks the outcome.
    #[builder(default)]
    #[serde(default)]
    pub dry_run: bool,

    /// Follow symbolic links while walking.
    #[builder(default)]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Items between progress lines.
    #[builder(default = "DEFAULT_REPORT_EVERY")]
    #[serde(default = "default_report_every")]
    pub progress_every: u64,

    /// Hashing settings.
    #[builder(default)]
    #[serde(default)]
    pub duplicates: DuplicateConfig,

    /// Oversize threshold and listing length.
    #[builder(default)]
    #[serde(default)]
    pub sizes: SizeConfig,

    /// Category rule tables.
    #[builder(default)]
    #[serde(default)]
    pub classification: ClassificationRules,

    /// Junk patterns.
    #[builder(default)]
    #[serde(default)]
    pub junk: JunkRules,
}

fn default_report_every() -> u64 {
    DEFAULT_REPORT_EVERY
}

impl MissionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        for (field, value) in [("Source", &self.source), ("Target", &self.target)] {
            match value {
                Some(path) if path.as_os_str().is_empty() => {
                    return Err(format!("{field} path cannot be empty"));
                }
                Some(_) => {}
                None => return Err(format!("{field} path is required")),
            }
        }
        Ok(())
    }
}

impl MissionConfig {
    /// Create a new mission config builder.
    pub fn builder() -> MissionConfigBuilder {
        MissionConfigBuilder::default()
    }

    /// Create a config with default rules.
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            dry_run: false,
            follow_symlinks: false,
            progress_every: DEFAULT_REPORT_EVERY,
            duplicates: DuplicateConfig::default(),
            sizes: SizeConfig::default(),
            classification: ClassificationRules::default(),
            junk: JunkRules::default(),
        }
    }

    fn scan_config(&self) -> ScanConfig {
        let mut config = ScanConfig::new(&self.source);
        config.follow_symlinks = self.follow_symlinks;
        config
    }
}

/// Everything a mission found and wrote.
#[derive(Debug, Clone)]
pub struct MissionOutcome {
    /// The report as written.
    pub report: LiberationReport,
    /// Path of `liberation_report.json`.
    pub report_path: PathBuf,
    /// The manifest and where it was written.
    pub manifest: ManifestOutcome,
    /// Entries the walk could not visit.
    pub warnings: Vec<ScanWarning>,
    /// Digest index and hashing failures.
    pub hunt: HuntOutcome,
    /// Hashed files grouped by category.
    pub organization: Organization,
    /// Total size and oversized files.
    pub sizes: SizeReport,
    /// Junk files found.
    pub junk: JunkReport,
    /// Hashing rate over the whole run.
    pub files_per_second: f64,
    /// Whether the mission ran as a dry run.
    pub dry_run: bool,
}

/// Runs every agent over one source tree.
pub struct Mission {
    config: MissionConfig,
    walker: TreeWalker,
    hunter: DuplicateHunter,
    classifier: Classifier,
    sizer: SizeAnalyzer,
    junk: JunkDetector,
    safety_net: SafetyNet,
}

impl Mission {
    /// Set up every agent. Fails if a junk rule does not compile.
    pub fn new(config: MissionConfig) -> MissionResult<Self> {
        let junk = JunkDetector::new(&config.junk)?;
        Ok(Self {
            walker: TreeWalker::new(),
            hunter: DuplicateHunter::with_config(config.duplicates.clone()),
            classifier: Classifier::with_rules(&config.classification),
            sizer: SizeAnalyzer::with_config(config.sizes.clone()),
            junk,
            safety_net: SafetyNet::new(),
            config,
        })
    }

    /// Get the mission config.
    pub fn config(&self) -> &MissionConfig {
        &self.config
    }

    /// Run the three phases: gather, prepare, report.
    pub fn execute(&self) -> MissionResult<MissionOutcome> {
        let source = self.config.source.as_path();
        let target = self.config.target.as_path();
        let mut logs = AgentLogs::new();

        info!(
            source = %source.display(),
            target = %target.display(),
            "liberating documents"
        );

        info!("phase 1: intelligence gathering");
        let gathered = self.gather(source, &mut logs)?;

        info!("phase 2: safety preparations");
        self.safety_net.prepare_target(target)?;
        let mut manifest =
            self.safety_net
                .create_backup_manifest(source, target, &gathered.records)?;
        logs.record(Agent::SafetyNet, std::mem::take(&mut manifest.events));

        info!("phase 3: mission report");
        let report = LiberationReport {
            timestamp: LiberationReport::now_timestamp(),
            source: source.to_string_lossy().into_owned(),
            target: target.to_string_lossy().into_owned(),
            total_files: gathered.hunt.index.files_indexed(),
            duplicate_sets: gathered.hunt.index.duplicate_set_count(),
            large_files: gathered.sizes.oversized.len(),
            junk_files: gathered.junk.count(),
            total_size_mb: bytes_to_mib(gathered.sizes.total_size),
            categories: gathered.organization.counts(),
            agent_logs: logs.lines(),
        };
        let report_path = report.write_to(target)?;
        info!(path = %report_path.display(), "mission report saved");

        Ok(MissionOutcome {
            report,
            report_path,
            manifest,
            warnings: gathered.warnings,
            hunt: gathered.hunt,
            organization: gathered.organization,
            sizes: gathered.sizes,
            junk: gathered.junk,
            files_per_second: gathered.files_per_second,
            dry_run: self.config.dry_run,
        })
    }

    fn gather(&self, source: &Path, logs: &mut AgentLogs) -> MissionResult<Gathered> {
        logs.info(
            Agent::DuplicateHunter,
            format!("Scanning for duplicates in {}", source.display()),
        );
        let listing = self.walker.collect(&self.config.scan_config())?;

        let mut walk_events = EventLog::new();
        for warning in &listing.warnings {
            walk_events.warn(warning.to_string());
        }
        logs.record(Agent::DuplicateHunter, walk_events);

        let total = listing.records.len() as u64;
        let mut reporter = ProgressReporter::new(self.config.progress_every);
        let mut hunt = self.hunter.index_with_progress(&listing.records, |p| {
            reporter.report_progress(p.files_processed, total, "Hashing");
        });
        let files_per_second = reporter.files_per_second();
        logs.record(Agent::DuplicateHunter, std::mem::take(&mut hunt.events));
        logs.record(Agent::ProgressReporter, reporter.into_events());

        logs.info(Agent::FolderOrganizer, "Analyzing file organization patterns...");
        let mut organization = self.classifier.organize(hunt.index.paths());
        logs.record(Agent::FolderOrganizer, std::mem::take(&mut organization.events));

        logs.info(
            Agent::SizeOptimizer,
            format!("Analyzing file sizes in {}", source.display()),
        );
        let mut sizes = self.sizer.analyze(&listing.records);
        logs.record(Agent::SizeOptimizer, std::mem::take(&mut sizes.events));

        logs.info(
            Agent::JunkDetector,
            format!("Scanning for junk files in {}", source.display()),
        );
        let mut junk = self.junk.find_junk(&listing.records);
        logs.record(Agent::JunkDetector, std::mem::take(&mut junk.events));

        Ok(Gathered {
            records: listing.records,
            warnings: listing.warnings,
            hunt,
            organization,
            sizes,
            junk,
            files_per_second,
        })
    }
}

/// Phase one results.
struct Gathered {
    records: Vec<FileRecord>,
    warnings: Vec<ScanWarning>,
    hunt: HuntOutcome,
    organization: Organization,
    sizes: SizeReport,
    junk: JunkReport,
    files_per_second: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_requires_paths() {
        assert!(MissionConfig::builder().source("/src").build().is_err());
        assert!(MissionConfig::builder().source("").target("/dst").build().is_err());

        let config = MissionConfig::builder()
            .source("/src")
            .target("/dst")
            .dry_run(true)
            .build()
            .unwrap();
        assert!(config.dry_run);
        assert_eq!(config.progress_every, DEFAULT_REPORT_EVERY);
        assert_eq!(config.sizes.oversize_threshold, SizeConfig::default().oversize_threshold);
    }

    #[test]
    fn test_invalid_junk_rule_rejected_at_setup() {
        let mut config = MissionConfig::new("/src", "/dst");
        config.junk = JunkRules {
            patterns: vec!["[".to_string()],
        };
        assert!(Mission::new(config).is_err());
    }

    #[test]
    fn test_scan_config_carries_symlink_flag() {
        let mut config = MissionConfig::new("/src", "/dst");
        config.follow_symlinks = true;
        assert!(config.scan_config().follow_symlinks);
    }
}
