use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length in bytes of a digest produced by the path hasher.
pub const DIGEST_LEN: usize = 32;

/// Sort and search key of an indexed record.
///
/// An `IdentityKey` is normally the lowercase hex encoding of a 32-byte
/// BLAKE3 digest, so lexicographic order on the string is the same as the
/// numeric order of the digest. Keys are compared as plain strings, which
/// lets tests and callers build keys from arbitrary text.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Wrap an arbitrary string as a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Create a key from a pre-computed digest.
    pub fn from_digest(digest: [u8; DIGEST_LEN]) -> Self {
        Self(hex::encode(digest))
    }

    /// Parse a full-length hex digest, rejecting anything that is not one.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != DIGEST_LEN {
            return Err(TypeError::InvalidLength {
                expected: DIGEST_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation (first 8 characters).
    pub fn short(&self) -> &str {
        let end = self.0.char_indices().nth(8).map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

impl fmt::Debug for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityKey({})", self.short())
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdentityKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for IdentityKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for IdentityKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The pair of digests computed for a path.
///
/// Only `path_hash` participates in ordering; `name_hash` is carried so
/// that name-keyed derived indexes can be built without rehashing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHash {
    pub name_hash: IdentityKey,
    pub path_hash: IdentityKey,
}

impl FileHash {
    pub fn new(name_hash: impl Into<IdentityKey>, path_hash: impl Into<IdentityKey>) -> Self {
        Self {
            name_hash: name_hash.into(),
            path_hash: path_hash.into(),
        }
    }
}
