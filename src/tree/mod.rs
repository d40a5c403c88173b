mod entry;
mod error;
mod reader;


pub use entry::{FileEntry, FileRef, TreeId};
pub use error::TreeError;
pub use reader::TreeReader;

use crate::security::PathSanitizer;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Default per-file limit (50 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Default arena limit (500 MiB)
pub const DEFAULT_MAX_TOTAL_SIZE: u64 = 500 * 1024 * 1024;

/// Size limits applied while a snapshot is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeLimits {
    pub max_file_size: u64,
    pub max_total_size: u64,
}

impl Default for TreeLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
        }
    }
}

/// Immutable filesystem-tree snapshot with arena-backed file storage
pub struct FileTree {
    id: TreeId,
    /// Single contiguous blob containing all file data
    arena: Vec<u8>,
    /// Rooted paths to arena slices, kept sorted so listings are stable
    index: BTreeMap<String, FileEntry>,
}

/// Mutable builder for constructing a snapshot
pub struct FileTreeBuilder {
    arena: Vec<u8>,
    index: BTreeMap<String, FileEntry>,
    limits: TreeLimits,
}

impl FileTreeBuilder {
    /// Create a new builder with default limits
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            index: BTreeMap::new(),
            limits: TreeLimits::default(),
        }
    }

    /// Set maximum individual file size
    pub fn max_file_size(mut self, size: u64) -> Self {
        self.limits.max_file_size = size;
        self
    }

    /// Set maximum total arena size
    pub fn max_total_size(mut self, size: u64) -> Self {
        self.limits.max_total_size = size;
        self
    }

    /// Replace both limits at once, usually from configuration
    pub fn limits(mut self, limits: TreeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Add a file to the arena.
    ///
    /// Adding the same path twice replaces the index entry; the earlier
    /// bytes stay in the arena and still count against the total limit.
    pub fn add_file(&mut self, raw_path: &str, data: &[u8]) -> Result<(), TreeError> {
        let path = PathSanitizer::sanitize(raw_path)?;

        if data.len() as u64 > self.limits.max_file_size {
            return Err(TreeError::FileTooLarge {
                size: data.len() as u64,
                max: self.limits.max_file_size,
            });
        }

        let new_total = self.arena.len() as u64 + data.len() as u64;
        if new_total > self.limits.max_total_size {
            return Err(TreeError::FileTooLarge {
                size: new_total,
                max: self.limits.max_total_size,
            });
        }

        let offset = self.arena.len();
        self.arena.extend_from_slice(data);

        self.index.insert(
            path.clone(),
            FileEntry {
                offset,
                length: data.len(),
                path,
            },
        );

        Ok(())
    }

    /// Ingest every regular file under `root`, rooted at `root` itself.
    ///
    /// Symlinks are not followed.
    pub fn ingest_dir(mut self, root: impl AsRef<Path>) -> Result<Self, TreeError> {
        let root = root.as_ref();

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|_| TreeError::InvalidPath(entry.path().display().to_string()))?;
            let raw_path = relative.to_str().ok_or_else(|| {
                TreeError::InvalidPath(format!("Invalid UTF-8 in path: {:?}", relative))
            })?;

            let contents = fs::read(entry.path()).map_err(|source| TreeError::Io {
                path: entry.path().to_path_buf(),
                source,
            })?;

            self.add_file(raw_path, &contents)?;
        }

        debug!(root = %root.display(), files = self.index.len(), "ingested directory");
        Ok(self)
    }

    /// Ingest a ZIP archive held in memory
    pub fn ingest_zip(mut self, bytes: &[u8]) -> Result<Self, TreeError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| TreeError::ArchiveParseFailed(e.to_string()))?;

        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| TreeError::ArchiveParseFailed(e.to_string()))?;

            if file.is_dir() {
                continue;
            }

            let raw_path = file.name().to_string();

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)
                .map_err(|e| TreeError::ArchiveParseFailed(e.to_string()))?;

            self.add_file(&raw_path, &contents)?;
        }

        debug!(files = self.index.len(), "ingested zip archive");
        Ok(self)
    }

    /// Build the immutable snapshot, minting its identifier
    pub fn build(self) -> FileTree {
        FileTree {
            id: TreeId::new(),
            arena: self.arena,
            index: self.index,
        }
    }
}

impl Default for FileTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    pub fn id(&self) -> TreeId {
        self.id
    }

    /// Get a file's contents by path (zero-copy)
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entry(path).map(|entry| self.slice(entry))
    }

    /// Get a file's contents by reference; references from other trees miss
    pub fn contents(&self, file: &FileRef) -> Option<&[u8]> {
        if file.tree != self.id {
            return None;
        }
        self.index.get(&file.path).map(|entry| self.slice(entry))
    }

    /// Get metadata for a file without reading contents
    pub fn entry(&self, path: &str) -> Option<&FileEntry> {
        let path = PathSanitizer::sanitize(path).ok()?;
        self.index.get(&path)
    }

    /// List all files in path order
    pub fn list(&self) -> impl Iterator<Item = &FileEntry> {
        self.index.values()
    }

    /// Get the total number of files
    pub fn file_count(&self) -> usize {
        self.index.len()
    }

    /// Get the total arena size in bytes
    pub fn total_size(&self) -> usize {
        self.arena.len()
    }

    /// SHA-256 over every path and its contents, hex encoded.
    ///
    /// Two snapshots with the same files share a fingerprint even though
    /// their identifiers differ.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for entry in self.index.values() {
            hasher.update(entry.path.as_bytes());
            hasher.update([0u8]);
            hasher.update((entry.length as u64).to_le_bytes());
            hasher.update(self.slice(entry));
        }
        hex::encode(hasher.finalize())
    }

    pub(crate) fn file_ref(&self, entry: &FileEntry) -> FileRef {
        FileRef {
            tree: self.id,
            path: entry.path.clone(),
        }
    }

    fn slice(&self, entry: &FileEntry) -> &[u8] {
        &self.arena[entry.offset..entry.offset + entry.length]
    }
}
