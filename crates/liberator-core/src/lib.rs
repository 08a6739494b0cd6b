//! Core types for liberator.
//!
//! This crate provides the data structures shared by the scanner, the
//! analyses and the mission coordinator: file records, content hashes,
//! categories, configuration, error types and per-agent event logs.

mod category;
mod config;
mod error;
mod events;
mod record;

pub use category::Category;
pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{HashError, ScanError, ScanWarning, WarningKind};
pub use events::{EventLevel, EventLog, LogEvent};
pub use record::{ContentHash, FileRecord, FileStat, StatFailure};

/// Number of bytes in one mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// Convert a byte count to mebibytes for display.
pub fn bytes_to_mib(bytes: u64) -> f64 {
    bytes as f64 / MIB as f64
}
