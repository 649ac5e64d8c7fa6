//! The indexed record: one file or directory as seen by the indexer.

use std::fs::Metadata;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::hasher::PathHasher;
use crate::key::{FileHash, IdentityKey};

/// Metadata for a single file-system entry.
///
/// Records are immutable once built. The index tree takes them by value
/// and hands out clones, never references into its own storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedRecord {
    path: String,
    size: u64,
    modified_at: SystemTime,
    hash: FileHash,
    is_directory: bool,
}

impl IndexedRecord {
    /// Create a record from already-computed parts.
    pub fn new(
        path: impl Into<String>,
        size: u64,
        modified_at: SystemTime,
        hash: FileHash,
        is_directory: bool,
    ) -> Self {
        Self {
            path: path.into(),
            size,
            modified_at,
            hash,
            is_directory,
        }
    }

    /// Build a record from a path and its stat metadata, hashing the path.
    ///
    /// A platform that cannot report modification times yields the UNIX
    /// epoch rather than failing the whole entry.
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Self {
        Self {
            path: path.to_string_lossy().into_owned(),
            size: if metadata.is_dir() { 0 } else { metadata.len() },
            modified_at: metadata.modified().unwrap_or(UNIX_EPOCH),
            hash: PathHasher::hash_path(path),
            is_directory: metadata.is_dir(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified_at(&self) -> SystemTime {
        self.modified_at
    }

    pub fn hash(&self) -> &FileHash {
        &self.hash
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// The sort/search key: the hash of the full path.
    pub fn identity_key(&self) -> &IdentityKey {
        &self.hash.path_hash
    }

    /// Final path component, or the whole path when there is none.
    pub fn file_name(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }
}
