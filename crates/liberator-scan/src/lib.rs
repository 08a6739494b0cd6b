//! File tree walking for liberator.
//!
//! Every analysis in the pipeline consumes the same traversal. This crate
//! produces it: a lazy, deterministic sequence of regular files under a
//! root, each with a stat taken right after discovery.
//!
//! # Example
//!
//! ```rust,no_run
//! use liberator_scan::{ScanConfig, TreeWalker};
//!
//! let config = ScanConfig::new("/path/to/documents");
//! for item in TreeWalker::new().walk(&config).unwrap() {
//!     match item {
//!         Ok(record) => println!("{} ({:?} bytes)", record.path.display(), record.size()),
//!         Err(warning) => eprintln!("warning: {warning}"),
//!     }
//! }
//! ```
//!
//! Files that vanish between listing and stat are skipped. Files whose stat
//! fails for any other reason are still yielded, carrying the failure, so
//! each analysis can apply its own policy.

mod walker;

pub use walker::{Listing, TreeWalker, Walk};

// Re-export core types for convenience
pub use liberator_core::{
    FileRecord, FileStat, ScanConfig, ScanError, ScanWarning, StatFailure, WarningKind,
};
