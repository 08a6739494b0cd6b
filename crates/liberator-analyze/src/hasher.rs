//! Streaming BLAKE3 content hashing.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use blake3::Hasher;

use liberator_core::{ContentHash, HashError};

/// Default read buffer size.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Computes content digests for single files.
#[derive(Debug, Clone)]
pub struct ContentHasher {
    buffer_size: usize,
}

impl ContentHasher {
    /// Create a hasher with the default buffer size.
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Create a hasher that reads in chunks of `buffer_size` bytes.
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Compute the full BLAKE3 hash of a file.
    ///
    /// The path is re-checked right before opening, since the tree may have
    /// changed after it was listed.
    pub fn hash(&self, path: &Path) -> Result<ContentHash, HashError> {
        let metadata = fs::metadata(path).map_err(|e| HashError::io(path, e))?;
        if !metadata.is_file() {
            return Err(HashError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|e| HashError::io(path, e))?;
        self.hash_reader(file).map_err(|e| HashError::io(path, e))
    }

    /// Hash everything a reader yields.
    pub fn hash_reader(&self, mut reader: impl Read) -> io::Result<ContentHash> {
        let mut hasher = Hasher::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(ContentHash::new(*hasher.finalize().as_bytes()))
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}
