//! Directory-walk collaborator.
//!
//! The pipeline never touches `walkdir` directly. It drives a
//! [`DirectoryWalker`] with a visitor, which keeps the error policy in the
//! pipeline and lets tests substitute a scripted walk.

use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use walkdir::WalkDir;

/// What the walker should do after visiting an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkControl {
    Continue,
    /// Do not descend into the directory just visited.
    SkipSubtree,
}

/// The parts of an entry's metadata the pipeline uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryInfo {
    pub size: u64,
    pub modified: SystemTime,
    pub is_dir: bool,
}

impl EntryInfo {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            size: if metadata.is_dir() { 0 } else { metadata.len() },
            modified: metadata.modified().unwrap_or(UNIX_EPOCH),
            is_dir: metadata.is_dir(),
        }
    }

    /// A regular file entry. Handy for scripted walks.
    pub fn file(size: u64) -> Self {
        Self {
            size,
            modified: UNIX_EPOCH,
            is_dir: false,
        }
    }

    pub fn dir() -> Self {
        Self {
            size: 0,
            modified: UNIX_EPOCH,
            is_dir: true,
        }
    }
}

/// A walk failure for one entry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct WalkFailure {
    /// The path that failed, when the walker knows it.
    pub path: Option<PathBuf>,
    pub permission_denied: bool,
    pub message: String,
}

impl WalkFailure {
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("permission denied: {}", path.display()),
            path: Some(path),
            permission_denied: true,
        }
    }

    pub fn other(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            permission_denied: false,
            message: message.into(),
        }
    }
}

impl From<walkdir::Error> for WalkFailure {
    fn from(err: walkdir::Error) -> Self {
        Self {
            path: err.path().map(Path::to_path_buf),
            permission_denied: err
                .io_error()
                .is_some_and(|e| e.kind() == io::ErrorKind::PermissionDenied),
            message: err.to_string(),
        }
    }
}

/// One item handed to a walk visitor.
#[derive(Debug)]
pub enum WalkItem<'a> {
    Entry { path: &'a Path, info: &'a EntryInfo },
    Failure(&'a WalkFailure),
}

/// Something that can enumerate a directory tree.
///
/// A walk visits the root first, then every descendant, and reports
/// per-entry failures through the same visitor instead of aborting.
pub trait DirectoryWalker: Send + Sync {
    fn walk(&self, root: &Path, visit: &mut dyn FnMut(WalkItem<'_>) -> WalkControl);
}

/// File-system walker backed by `walkdir`.
#[derive(Clone, Debug, Default)]
pub struct FsWalker {
    follow_links: bool,
}

impl FsWalker {
    pub fn new(follow_links: bool) -> Self {
        Self { follow_links }
    }
}

impl DirectoryWalker for FsWalker {
    fn walk(&self, root: &Path, visit: &mut dyn FnMut(WalkItem<'_>) -> WalkControl) {
        let mut it = WalkDir::new(root).follow_links(self.follow_links).into_iter();
        while let Some(next) = it.next() {
            // An unreadable directory is reported after its own entry and
            // walkdir never descends into it, so skipping only ever applies
            // to a directory entry that was yielded successfully.
            let skip = match next {
                Ok(entry) => {
                    let control = match entry.metadata() {
                        Ok(metadata) => {
                            let info = EntryInfo::from_metadata(&metadata);
                            visit(WalkItem::Entry {
                                path: entry.path(),
                                info: &info,
                            })
                        }
                        Err(err) => visit(WalkItem::Failure(&WalkFailure::from(err))),
                    };
                    control == WalkControl::SkipSubtree && entry.file_type().is_dir()
                }
                Err(err) => {
                    visit(WalkItem::Failure(&WalkFailure::from(err)));
                    false
                }
            };
            if skip {
                it.skip_current_dir();
            }
        }
    }
}
