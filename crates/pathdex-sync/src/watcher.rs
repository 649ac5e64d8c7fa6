use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::event::ChangeEvent;
use crate::syncer::Syncer;

/// A running file-system watcher feeding a [`Syncer`].
///
/// Dropping the handle stops the watcher; the worker thread then sees its
/// channel close and exits on its own.
pub struct WatchHandle {
    watcher: Option<RecommendedWatcher>,
    worker: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Stop watching and wait for in-flight changes to be applied.
    pub fn stop(mut self) -> SyncResult<()> {
        self.watcher.take();
        match self.worker.take() {
            Some(worker) => worker
                .join()
                .map_err(|_| SyncError::Thread("watcher worker panicked".into())),
            None => Ok(()),
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.watcher.take();
    }
}

/// Watch the syncer's root recursively and apply every change to it.
///
/// Fails if the platform watcher cannot be created or the root cannot be
/// watched; the caller can carry on without live sync.
pub fn start_watcher(syncer: Arc<Syncer>) -> SyncResult<WatchHandle> {
    let root = syncer.indexer().root().to_path_buf();
    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();

    let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
    watcher.watch(&root, RecursiveMode::Recursive)?;
    info!(root = %root.display(), "file watcher started");

    let worker = thread::Builder::new()
        .name("pathdex-watch".into())
        .spawn(move || run_worker(&syncer, &rx, &root))
        .map_err(|e| SyncError::Thread(e.to_string()))?;

    Ok(WatchHandle {
        watcher: Some(watcher),
        worker: Some(worker),
    })
}

fn run_worker(syncer: &Syncer, rx: &mpsc::Receiver<notify::Result<Event>>, root: &Path) {
    while let Ok(next) = rx.recv() {
        match next {
            Ok(event) => {
                let changes = ChangeEvent::from_notify(&event);
                if !changes.is_empty() {
                    debug!(count = changes.len(), kind = ?event.kind, "applying changes");
                    syncer.apply_all(&changes);
                }
            }
            Err(e) => warn!(error = %e, "file watcher error"),
        }
    }
    info!(root = %root.display(), "file watcher stopped");
}
