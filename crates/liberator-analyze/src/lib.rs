//! Analyses over a walked file tree.
//!
//! Every analysis consumes the same [`FileRecord`] sequence and returns a
//! result together with an [`EventLog`] of what it did:
//!
//! - **Duplicate detection** - hash every file with BLAKE3 and group equal digests
//! - **Classification** - sort files into fixed categories by name and extension
//! - **Size analysis** - total size plus files above an oversize threshold
//! - **Junk detection** - temp, cache, OS metadata, VCS and log files
//!
//! ```rust,ignore
//! use liberator_analyze::{Classifier, DuplicateHunter, JunkDetector, JunkRules, SizeAnalyzer};
//! use liberator_scan::{ScanConfig, TreeWalker};
//!
//! let listing = TreeWalker::new().collect(&ScanConfig::new("/path/to/docs")).unwrap();
//!
//! let hunt = DuplicateHunter::new().index(&listing.records);
//! println!("{} duplicate sets", hunt.index.duplicate_set_count());
//!
//! let org = Classifier::new().organize(hunt.index.paths());
//! let sizes = SizeAnalyzer::new().analyze(&listing.records);
//! let junk = JunkDetector::new(&JunkRules::default()).unwrap().find_junk(&listing.records);
//! ```

mod classify;
mod duplicates;
mod hasher;
mod junk;
mod sizes;

use thiserror::Error;

pub use classify::{ClassificationRules, Classifier, Organization};
pub use duplicates::{
    DuplicateConfig, DuplicateConfigBuilder, DuplicateHunter, DuplicateIndex, DuplicateReport,
    DuplicateSet, HashBucket, HashFailure, HashProgress, HuntOutcome,
};
pub use hasher::{ContentHasher, DEFAULT_BUFFER_SIZE};
pub use junk::{JunkDetector, JunkFile, JunkReport, JunkRules};
pub use sizes::{
    DEFAULT_OVERSIZE_THRESHOLD, OversizedFile, SizeAnalyzer, SizeConfig, SizeConfigBuilder,
    SizeReport,
};

// Re-export core types
pub use liberator_core::{Category, ContentHash, EventLog, FileRecord, HashError};

/// Errors raised while setting up an analysis.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// A junk pattern failed to compile.
    #[error("Invalid junk pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
