use std::path::Path;

use crate::key::{FileHash, IdentityKey};

/// Domain-separated BLAKE3 hasher for path identities.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so the hash of a base name can never be mistaken for the
/// hash of a full path with the same bytes.
pub struct PathHasher {
    domain: &'static str,
}

impl PathHasher {
    /// Hasher for base names.
    pub const NAME: Self = Self {
        domain: "pathdex-name-v1",
    };
    /// Hasher for full paths. Its output is the index key.
    pub const PATH: Self = Self {
        domain: "pathdex-path-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> IdentityKey {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        IdentityKey::from_digest(*hasher.finalize().as_bytes())
    }

    /// Compute the name/path digest pair for a path.
    ///
    /// Paths that are not valid UTF-8 are hashed through their lossy
    /// string form, which is also what gets stored in the record.
    pub fn hash_path(path: &Path) -> FileHash {
        let full = path.to_string_lossy();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| full.clone());
        FileHash {
            name_hash: Self::NAME.hash(name.as_bytes()),
            path_hash: Self::PATH.hash(full.as_bytes()),
        }
    }

    /// Identity key of a path without computing the name hash.
    pub fn path_key(path: &Path) -> IdentityKey {
        Self::PATH.hash(path.to_string_lossy().as_bytes())
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}
