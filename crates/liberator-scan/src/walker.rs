//! JWalk-based tree walker.
//!
//! Runs jwalk in serial mode with sorted entries, so two walks over an
//! unchanged tree yield files in the same order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::{DirEntry, Parallelism, WalkDir};
use tracing::debug;

use liberator_core::{
    FileRecord, FileStat, ScanConfig, ScanError, ScanWarning, StatFailure, WarningKind,
};

type EntryIter = Box<dyn Iterator<Item = Result<DirEntry<((), ())>, jwalk::Error>>>;

/// Walks a source tree and yields one record per regular file.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeWalker;

impl TreeWalker {
    /// Create a new walker.
    pub fn new() -> Self {
        Self
    }

    /// Start a walk of the configured root.
    ///
    /// A root that does not exist yields a single warning and no files.
    /// A root that exists but cannot be listed fails fast.
    pub fn walk(&self, config: &ScanConfig) -> Result<Walk, ScanError> {
        let root = &config.root;

        let metadata = match fs::metadata(root) {
            Ok(m) => m,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(root = %root.display(), "scan root does not exist");
                return Ok(Walk::missing(root));
            }
            Err(err) => return Err(ScanError::io(root, err)),
        };

        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory { path: root.clone() });
        }

        let root_path = root.canonicalize().map_err(|e| ScanError::io(root, e))?;

        // Probe listing up front so an unreadable root is fatal rather than a warning
        fs::read_dir(&root_path).map_err(|e| ScanError::io(&root_path, e))?;

        let walker = WalkDir::new(&root_path)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(!config.include_hidden)
            .follow_links(config.follow_symlinks)
            .min_depth(1)
            .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX));

        Ok(Walk {
            root: root_path,
            entries: Some(Box::new(walker.into_iter())),
            pending: None,
            files_found: 0,
            warnings_found: 0,
        })
    }

    /// Walk the whole tree and collect the results.
    pub fn collect(&self, config: &ScanConfig) -> Result<Listing, ScanError> {
        let mut walk = self.walk(config)?;
        let root = walk.root().to_path_buf();
        let mut records = Vec::new();
        let mut warnings = Vec::new();

        for item in &mut walk {
            match item {
                Ok(record) => records.push(record),
                Err(warning) => warnings.push(warning),
            }
        }

        Ok(Listing {
            root,
            records,
            warnings,
        })
    }
}

/// Lazy sequence of files under a root.
pub struct Walk {
    root: PathBuf,
    entries: Option<EntryIter>,
    pending: Option<ScanWarning>,
    files_found: u64,
    warnings_found: u64,
}

impl Walk {
    fn missing(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            entries: None,
            pending: Some(ScanWarning::missing_root(root)),
            files_found: 0,
            warnings_found: 0,
        }
    }

    /// Root being walked (canonical when it exists).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files yielded so far.
    pub fn files_found(&self) -> u64 {
        self.files_found
    }

    /// Warnings yielded so far.
    pub fn warnings_found(&self) -> u64 {
        self.warnings_found
    }

    fn warn(&mut self, warning: ScanWarning) -> Option<Result<FileRecord, ScanWarning>> {
        self.warnings_found += 1;
        Some(Err(warning))
    }
}

impl Iterator for Walk {
    type Item = Result<FileRecord, ScanWarning>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(warning) = self.pending.take() {
            return self.warn(warning);
        }

        loop {
            let entry = match self.entries.as_mut()?.next()? {
                Ok(e) => e,
                Err(err) => return self.warn(warning_from_walk_error(&err)),
            };

            // Directories, symlinks (when not followed), sockets and devices
            if !entry.file_type().is_file() {
                if entry.file_type().is_symlink() {
                    debug!(path = %entry.path().display(), "skipping symlink");
                }
                continue;
            }

            let path = entry.path();
            let stat = match entry.metadata() {
                Ok(m) if m.is_file() => Ok(FileStat::from_metadata(&m)),
                Ok(_) => {
                    debug!(path = %path.display(), "entry changed type since listing");
                    continue;
                }
                Err(err) => {
                    if err.io_error().map(|e| e.kind()) == Some(io::ErrorKind::NotFound) {
                        debug!(path = %path.display(), "file vanished before stat");
                        continue;
                    }
                    Err(stat_failure(&err))
                }
            };

            self.files_found += 1;
            return Some(Ok(FileRecord::new(path, entry.depth(), stat)));
        }
    }
}

/// Everything a finished walk produced.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Root that was walked.
    pub root: PathBuf,
    /// Files in discovery order.
    pub records: Vec<FileRecord>,
    /// Non-fatal problems met along the way.
    pub warnings: Vec<ScanWarning>,
}

impl Listing {
    /// Number of files found.
    pub fn file_count(&self) -> usize {
        self.records.len()
    }
}

fn stat_failure(err: &jwalk::Error) -> StatFailure {
    match err.io_error() {
        Some(io_err) => StatFailure::from_io(io_err),
        None => StatFailure::new("Other", err.to_string()),
    }
}

fn warning_from_walk_error(err: &jwalk::Error) -> ScanWarning {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();

    if let Some(ancestor) = err.loop_ancestor() {
        return ScanWarning::new(
            path,
            format!("Symlink loop back to {}", ancestor.display()),
            WarningKind::SymlinkLoop,
        );
    }

    match err.io_error() {
        Some(io_err) if io_err.kind() == io::ErrorKind::PermissionDenied => {
            ScanWarning::permission_denied(path)
        }
        Some(io_err) => ScanWarning::read_error(path, io_err),
        None => ScanWarning::new(path, err.to_string(), WarningKind::ReadError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();

        temp
    }

    #[test]
    fn test_walk_yields_only_files() {
        let temp = create_test_tree();
        let listing = TreeWalker::new().collect(&ScanConfig::new(temp.path())).unwrap();

        assert_eq!(listing.file_count(), 4);
        assert!(listing.warnings.is_empty());
        assert!(listing.records.iter().all(|r| r.path.is_absolute()));
        assert!(listing.records.iter().all(|r| r.has_stat()));
    }

    #[test]
    fn test_walk_order_is_stable() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());
        let walker = TreeWalker::new();

        let paths = || -> Vec<_> {
            walker
                .collect(&config)
                .unwrap()
                .records
                .into_iter()
                .map(|r| r.path)
                .collect()
        };
        assert_eq!(paths(), paths());
    }

    #[test]
    fn test_depth_and_sizes() {
        let temp = create_test_tree();
        let listing = TreeWalker::new().collect(&ScanConfig::new(temp.path())).unwrap();

        let deep = listing
            .records
            .iter()
            .find(|r| r.name.as_str() == "file3.txt")
            .unwrap();
        assert_eq!(deep.depth, 3);
        assert_eq!(deep.size(), Some(4));
    }

    #[test]
    fn test_max_depth() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .max_depth(Some(1))
            .build()
            .unwrap();

        let listing = TreeWalker::new().collect(&config).unwrap();
        assert_eq!(listing.file_count(), 1);
        assert_eq!(listing.records[0].name.as_str(), "file1.txt");
    }

    #[test]
    fn test_missing_root_is_empty_with_warning() {
        let temp = TempDir::new().unwrap();
        let listing = TreeWalker::new()
            .collect(&ScanConfig::new(temp.path().join("nope")))
            .unwrap();

        assert_eq!(listing.file_count(), 0);
        assert_eq!(listing.warnings.len(), 1);
        assert_eq!(listing.warnings[0].kind, WarningKind::MissingRoot);
    }

    #[test]
    fn test_file_root_is_fatal() {
        let temp = create_test_tree();
        let result = TreeWalker::new().walk(&ScanConfig::new(temp.path().join("file1.txt")));
        assert!(matches!(result, Err(ScanError::NotADirectory { .. })));
    }
}
