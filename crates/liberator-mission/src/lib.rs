//! Mission coordination for liberator.
//!
//! A [`Mission`] runs in three phases:
//!
//! 1. **Intelligence gathering** - walk the source once, hash and index every
//!    file, classify the hashed files, measure sizes and flag junk
//! 2. **Safety preparations** - create the target directory and write a
//!    `backup_manifest_{timestamp}.json`
//! 3. **Report** - write `liberation_report.json` into the target
//!
//! Each agent's events are forwarded to `tracing` as they arrive and kept as
//! `"[HH:MM:SS] Agent-Name: message"` lines in the report.
//!
//! ```rust,no_run
//! use liberator_mission::{Mission, MissionConfig};
//!
//! let config = MissionConfig::new("/home/me/Downloads", "/home/me/Sorted");
//! let outcome = Mission::new(config).unwrap().execute().unwrap();
//! let report = &outcome.report;
//! println!("{} files, {} duplicate sets", report.total_files, report.duplicate_sets);
//! ```

mod agents;
mod error;
mod manifest;
mod mission;
mod progress;
mod report;

pub use agents::{Agent, AgentLogs};
pub use error::{MissionError, MissionResult};
pub use manifest::{BackupManifest, ManifestEntry, ManifestOutcome, SafetyNet};
pub use mission::{Mission, MissionConfig, MissionConfigBuilder, MissionOutcome};
pub use progress::{DEFAULT_REPORT_EVERY, ProgressReporter, ProgressSnapshot};
pub use report::{LiberationReport, REPORT_FILE_NAME};

// Re-export the configs a caller tunes
pub use liberator_analyze::{
    ClassificationRules, DuplicateConfig, JunkRules, SizeConfig, SizeConfigBuilder,
};
pub use liberator_core::Category;
