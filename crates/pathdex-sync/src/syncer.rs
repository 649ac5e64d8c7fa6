use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pathdex_index::{IndexError, Indexer};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};
use crate::event::ChangeEvent;

/// Counts of changes a syncer has applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub created: u64,
    pub modified: u64,
    pub removed: u64,
    pub failed: u64,
}

/// Applies change notifications to an [`Indexer`].
///
/// - create adds the path, or refreshes it if it is already indexed
/// - write replaces the record for the path
/// - remove evicts the path and anything indexed beneath it
///
/// Changes outside the indexer's root are ignored.
pub struct Syncer {
    indexer: Arc<Indexer>,
    created: AtomicU64,
    modified: AtomicU64,
    removed: AtomicU64,
    failed: AtomicU64,
}

impl Syncer {
    pub fn new(indexer: Arc<Indexer>) -> Self {
        Self {
            indexer,
            created: AtomicU64::new(0),
            modified: AtomicU64::new(0),
            removed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    pub fn indexer(&self) -> &Arc<Indexer> {
        &self.indexer
    }

    /// Apply one change.
    pub fn apply(&self, event: &ChangeEvent) -> SyncResult<()> {
        let path = event.path();
        if !path.starts_with(self.indexer.root()) {
            debug!(path = %path.display(), "ignoring change outside root");
            return Ok(());
        }

        let result = match event {
            ChangeEvent::Created(_) => self.on_created(path),
            ChangeEvent::Modified(_) => self.on_modified(path),
            ChangeEvent::Removed(_) => {
                let removed = self.indexer.remove_file(path);
                debug!(path = %path.display(), removed, "applied removal");
                self.removed.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        };

        result.map_err(|source| {
            self.failed.fetch_add(1, Ordering::Relaxed);
            SyncError::Apply {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Apply a batch, logging failures instead of stopping at the first.
    /// Returns the number of changes that failed.
    pub fn apply_all<'a, I>(&self, events: I) -> usize
    where
        I: IntoIterator<Item = &'a ChangeEvent>,
    {
        let mut failures = 0;
        for event in events {
            if let Err(e) = self.apply(event) {
                warn!(error = %e, "failed to sync change");
                failures += 1;
            }
        }
        failures
    }

    pub fn stats(&self) -> SyncStats {
        SyncStats {
            created: self.created.load(Ordering::Relaxed),
            modified: self.modified.load(Ordering::Relaxed),
            removed: self.removed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    fn on_created(&self, path: &Path) -> Result<(), IndexError> {
        if self.indexer.search_path(path).is_some() {
            self.indexer.update_file(path)?;
        } else {
            self.indexer.add_file(path)?;
        }
        self.created.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn on_modified(&self, path: &Path) -> Result<(), IndexError> {
        match self.indexer.update_file(path) {
            Ok(()) => {
                self.modified.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            // Written then deleted before we got to it.
            Err(IndexError::Stat { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                self.indexer.remove_file(path);
                self.removed.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
