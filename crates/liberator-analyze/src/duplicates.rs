//! Duplicate file detection using content hashing.
//!
//! Every file is hashed in full and folded into a [`DuplicateIndex`], an
//! insertion-ordered map from digest to the paths that share it. Duplicate
//! sets are the buckets holding two or more paths.
//!
//! Files that fail to hash never enter the index. Buckets list paths in
//! discovery order and no member is singled out as the original.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use liberator_core::{ContentHash, EventLog, FileRecord};

use crate::hasher::{ContentHasher, DEFAULT_BUFFER_SIZE};

/// Configuration for duplicate detection.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct DuplicateConfig {
    /// Log a progress event every N successfully hashed files (0 = never).
    #[builder(default = "100")]
    pub progress_interval: u64,

    /// Read buffer size for hashing.
    #[builder(default = "DEFAULT_BUFFER_SIZE")]
    pub buffer_size: usize,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            progress_interval: 100,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl DuplicateConfig {
    /// Create a new config builder.
    pub fn builder() -> DuplicateConfigBuilder {
        DuplicateConfigBuilder::default()
    }
}

/// All paths sharing one digest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashBucket {
    /// Size of the first member, when known.
    pub size: Option<u64>,
    /// Paths in insertion order.
    pub paths: Vec<PathBuf>,
}

/// Mapping from content digest to the paths that produced it.
#[derive(Debug, Clone, Default)]
pub struct DuplicateIndex {
    buckets: IndexMap<ContentHash, HashBucket>,
    files_indexed: u64,
}

impl DuplicateIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a successfully hashed path.
    pub fn insert(&mut self, hash: ContentHash, path: PathBuf, size: Option<u64>) {
        let bucket = self.buckets.entry(hash).or_default();
        if bucket.size.is_none() {
            bucket.size = size;
        }
        bucket.paths.push(path);
        self.files_indexed += 1;
    }

    /// Number of paths in the index.
    pub fn files_indexed(&self) -> u64 {
        self.files_indexed
    }

    /// Number of distinct digests.
    pub fn unique_hashes(&self) -> usize {
        self.buckets.len()
    }

    /// Check if nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Paths sharing a digest.
    pub fn get(&self, hash: &ContentHash) -> Option<&[PathBuf]> {
        self.buckets.get(hash).map(|b| b.paths.as_slice())
    }

    /// Iterate buckets in first-seen order.
    pub fn buckets(&self) -> impl Iterator<Item = (&ContentHash, &HashBucket)> {
        self.buckets.iter()
    }

    /// Iterate every indexed path in bucket order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.buckets
            .values()
            .flat_map(|b| b.paths.iter().map(PathBuf::as_path))
    }

    /// Check whether a path was indexed.
    pub fn contains_path(&self, path: &Path) -> bool {
        self.paths().any(|p| p == path)
    }

    /// Number of buckets with two or more paths.
    pub fn duplicate_set_count(&self) -> usize {
        self.buckets.values().filter(|b| b.paths.len() > 1).count()
    }

    /// Derive the duplicate sets, in first-seen order.
    pub fn duplicate_sets(&self) -> Vec<DuplicateSet> {
        self.buckets
            .iter()
            .filter(|(_, b)| b.paths.len() > 1)
            .map(|(hash, b)| DuplicateSet::new(*hash, b.size.unwrap_or(0), b.paths.clone()))
            .collect()
    }
}

/// A group of duplicate files sharing the same content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateSet {
    /// Content hash shared by all files in this set.
    pub hash: ContentHash,

    /// Size of each file in bytes (0 if unknown).
    pub size: u64,

    /// Paths to all duplicate files, first discovered first.
    pub paths: Vec<PathBuf>,

    /// Wasted space: size * (count - 1).
    pub wasted_bytes: u64,
}

impl DuplicateSet {
    fn new(hash: ContentHash, size: u64, paths: Vec<PathBuf>) -> Self {
        let wasted_bytes = size * (paths.len() as u64).saturating_sub(1);
        Self {
            hash,
            size,
            paths,
            wasted_bytes,
        }
    }

    /// Get the number of duplicate files.
    pub fn count(&self) -> usize {
        self.paths.len()
    }

    /// Check if keeping one file, how many could be deleted.
    pub fn deletable_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}

/// Summary of duplicate analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Duplicate sets, sorted by wasted space descending.
    pub groups: Vec<DuplicateSet>,

    /// Total size of all duplicate files.
    pub total_duplicate_size: u64,

    /// Total wasted space (could be reclaimed).
    pub total_wasted_space: u64,

    /// Number of files successfully hashed.
    pub files_analyzed: u64,

    /// Number of files that have duplicates.
    pub files_with_duplicates: u64,

    /// Number of duplicate sets.
    pub group_count: usize,
}

impl DuplicateReport {
    /// Check if any duplicates were found.
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }
}

/// A file that could not be hashed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashFailure {
    /// Path that failed.
    pub path: PathBuf,
    /// Error message.
    pub message: String,
}

/// Progress information during duplicate detection.
#[derive(Debug, Clone, Default)]
pub struct HashProgress {
    /// Files attempted so far.
    pub files_processed: u64,
    /// Files successfully hashed so far.
    pub files_hashed: u64,
    /// Bytes hashed so far (files of known size only).
    pub bytes_hashed: u64,
    /// Files that failed to hash.
    pub failures: u64,
}

/// Everything one indexing pass produced.
#[derive(Debug, Clone)]
pub struct HuntOutcome {
    /// The digest index.
    pub index: DuplicateIndex,
    /// Files left out because hashing failed.
    pub failures: Vec<HashFailure>,
    /// Files that disappeared before they could be read.
    pub vanished: u64,
    /// Bytes read while hashing (files of known size only).
    pub bytes_hashed: u64,
    /// Log events.
    pub events: EventLog,
}

impl HuntOutcome {
    /// Derive the duplicate sets.
    pub fn duplicate_sets(&self) -> Vec<DuplicateSet> {
        self.index.duplicate_sets()
    }

    /// Build a summary sorted by wasted space.
    pub fn report(&self) -> DuplicateReport {
        let mut groups = self.index.duplicate_sets();
        // Stable, so equal waste keeps first-seen order
        groups.sort_by(|a, b| b.wasted_bytes.cmp(&a.wasted_bytes));

        let total_duplicate_size: u64 = groups.iter().map(|g| g.size * g.paths.len() as u64).sum();
        let total_wasted_space: u64 = groups.iter().map(|g| g.wasted_bytes).sum();
        let files_with_duplicates: u64 = groups.iter().map(|g| g.paths.len() as u64).sum();
        let group_count = groups.len();

        DuplicateReport {
            groups,
            total_duplicate_size,
            total_wasted_space,
            files_analyzed: self.index.files_indexed(),
            files_with_duplicates,
            group_count,
        }
    }
}

/// Duplicate file finder.
pub struct DuplicateHunter {
    config: DuplicateConfig,
    hasher: ContentHasher,
}

impl DuplicateHunter {
    /// Create a new hunter with default config.
    pub fn new() -> Self {
        Self::with_config(DuplicateConfig::default())
    }

    /// Create a new hunter with custom config.
    pub fn with_config(config: DuplicateConfig) -> Self {
        let hasher = ContentHasher::with_buffer_size(config.buffer_size);
        Self { config, hasher }
    }

    /// Index walked files.
    pub fn index<'a, I>(&self, records: I) -> HuntOutcome
    where
        I: IntoIterator<Item = &'a FileRecord>,
    {
        self.index_with_progress(records, |_| {})
    }

    /// Index walked files, calling `progress` after every file attempted.
    pub fn index_with_progress<'a, I, F>(&self, records: I, progress: F) -> HuntOutcome
    where
        I: IntoIterator<Item = &'a FileRecord>,
        F: FnMut(&HashProgress),
    {
        self.run(
            records.into_iter().map(|r| (r.path.as_path(), r.size())),
            progress,
        )
    }

    /// Index bare paths whose sizes are unknown.
    pub fn index_paths<I, P>(&self, paths: I) -> HuntOutcome
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let paths: Vec<P> = paths.into_iter().collect();
        self.run(paths.iter().map(|p| (p.as_ref(), None)), |_| {})
    }

    fn run<'a, I, F>(&self, items: I, mut progress: F) -> HuntOutcome
    where
        I: Iterator<Item = (&'a Path, Option<u64>)>,
        F: FnMut(&HashProgress),
    {
        let mut index = DuplicateIndex::new();
        let mut failures = Vec::new();
        let mut vanished = 0u64;
        let mut events = EventLog::new();
        let mut state = HashProgress::default();

        for (path, size) in items {
            state.files_processed += 1;

            match self.hasher.hash(path) {
                Ok(hash) => {
                    index.insert(hash, path.to_path_buf(), size);
                    state.files_hashed += 1;
                    state.bytes_hashed += size.unwrap_or(0);

                    let interval = self.config.progress_interval;
                    if interval > 0 && state.files_hashed % interval == 0 {
                        events.info(format!("Processed {} files...", state.files_hashed));
                    }
                }
                Err(err) if err.is_vanished() => {
                    debug!(path = %path.display(), "file vanished before hashing");
                    vanished += 1;
                }
                Err(err) => {
                    events.warn(format!("Error hashing {}: {err}", path.display()));
                    state.failures += 1;
                    failures.push(HashFailure {
                        path: path.to_path_buf(),
                        message: err.to_string(),
                    });
                }
            }

            progress(&state);
        }

        events.info(format!(
            "Found {} sets of duplicates from {} files",
            index.duplicate_set_count(),
            index.files_indexed()
        ));

        HuntOutcome {
            index,
            failures,
            vanished,
            bytes_hashed: state.bytes_hashed,
            events,
        }
    }
}

impl Default for DuplicateHunter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_files() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(root.join("file1.txt"), "duplicate content here").unwrap();
        fs::write(root.join("file2.txt"), "duplicate content here").unwrap();
        fs::write(root.join("file3.txt"), "unique content").unwrap();

        fs::create_dir(root.join("subdir")).unwrap();
        fs::write(root.join("subdir/file4.txt"), "duplicate content here").unwrap();

        temp
    }

    #[test]
    fn test_index_groups_identical_files() {
        let temp = create_test_files();
        let root = temp.path();
        let paths = [
            root.join("file1.txt"),
            root.join("file2.txt"),
            root.join("file3.txt"),
            root.join("subdir/file4.txt"),
        ];

        let outcome = DuplicateHunter::new().index_paths(&paths);
        let sets = outcome.duplicate_sets();

        assert_eq!(outcome.index.files_indexed(), 4);
        assert_eq!(outcome.index.unique_hashes(), 2);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].paths, [paths[0].clone(), paths[1].clone(), paths[3].clone()]);
    }

    #[test]
    fn test_failed_paths_never_indexed() {
        let temp = create_test_files();
        let root = temp.path();
        let paths = [root.join("file1.txt"), root.join("subdir"), root.join("missing.txt")];

        let outcome = DuplicateHunter::new().index_paths(&paths);

        assert_eq!(outcome.index.files_indexed(), 1);
        assert!(!outcome.index.contains_path(&root.join("subdir")));
        assert!(!outcome.index.contains_path(&root.join("missing.txt")));
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.vanished, 1);
        assert_eq!(outcome.events.warning_count(), 1);
    }

    #[test]
    fn test_progress_cadence() {
        let temp = TempDir::new().unwrap();
        let paths: Vec<_> = (0..5)
            .map(|i| {
                let p = temp.path().join(format!("f{i}.txt"));
                fs::write(&p, format!("content {i}")).unwrap();
                p
            })
            .collect();

        let hunter = DuplicateHunter::with_config(
            DuplicateConfig::builder().progress_interval(2u64).build().unwrap(),
        );
        let records: Vec<_> = paths.iter().map(|p| FileRecord::probe(p, 1)).collect();

        let mut seen = Vec::new();
        let outcome = hunter.index_with_progress(&records, |p| seen.push(p.files_processed));

        assert_eq!(seen, [1, 2, 3, 4, 5]);
        // "content N" is 9 bytes
        assert_eq!(outcome.bytes_hashed, 45);
        let processed = outcome
            .events
            .events()
            .iter()
            .filter(|e| e.message.starts_with("Processed"))
            .count();
        assert_eq!(processed, 2);
    }

    #[test]
    fn test_wasted_bytes() {
        let mut index = DuplicateIndex::new();
        let hash = ContentHash::new([1; 32]);
        index.insert(hash, PathBuf::from("/a"), Some(100));
        index.insert(hash, PathBuf::from("/b"), Some(100));
        index.insert(hash, PathBuf::from("/c"), Some(100));

        let sets = index.duplicate_sets();
        assert_eq!(sets[0].wasted_bytes, 200);
        assert_eq!(sets[0].deletable_count(), 2);
    }
}
