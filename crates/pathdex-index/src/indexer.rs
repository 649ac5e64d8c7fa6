use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use pathdex_tree::{BTree, TreeStats};
use pathdex_types::{IdentityKey, IndexedRecord, PathHasher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::IndexerConfig;
use crate::error::{IndexError, IndexResult};
use crate::progress::{percent, IndexEvent, IndexSummary, ProgressReporter};
use crate::size::format_size;
use crate::walk::{DirectoryWalker, FsWalker, WalkControl, WalkFailure, WalkItem};

/// Byte counters guarded together with tree mutation.
#[derive(Debug, Default)]
struct IngestState {
    total_bytes: u64,
    indexed_bytes: u64,
}

/// Owns the index tree for one root directory and keeps it populated.
///
/// Bulk ingestion and ad hoc changes take the same ingest guard, so a
/// record change never interleaves with another writer's counter update.
/// Readers go straight to the tree and only contend on its own lock.
///
/// Every change bumps a generation counter; derived views compare it to
/// decide whether they are out of date.
pub struct Indexer {
    root: PathBuf,
    config: IndexerConfig,
    tree: BTree,
    walker: Arc<dyn DirectoryWalker>,
    ingest: Mutex<IngestState>,
    running: AtomicBool,
    generation: AtomicU64,
}

impl Indexer {
    /// Create an indexer that walks the real file system.
    pub fn new(root: impl Into<PathBuf>, config: IndexerConfig) -> IndexResult<Self> {
        let walker = Arc::new(FsWalker::new(config.follow_links));
        Self::with_walker(root, config, walker)
    }

    /// Create an indexer driven by a custom walker.
    pub fn with_walker(
        root: impl Into<PathBuf>,
        config: IndexerConfig,
        walker: Arc<dyn DirectoryWalker>,
    ) -> IndexResult<Self> {
        config.validate()?;
        let tree = BTree::with_min_degree(config.min_degree)?;
        Ok(Self {
            root: root.into(),
            config,
            tree,
            walker,
            ingest: Mutex::new(IngestState::default()),
            running: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    pub fn tree(&self) -> &BTree {
        &self.tree
    }

    /// Whether a bulk session is currently walking.
    pub fn is_indexing(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Counter bumped by every change made through this indexer.
    ///
    /// Two equal readings mean no record was added, replaced or removed
    /// in between, even when the record count stayed the same.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    // ---------------------------------------------------------------
    // Bulk ingestion
    // ---------------------------------------------------------------

    /// Start populating the index in the background.
    ///
    /// Returns at once. The walk runs on tokio's blocking pool, so this
    /// must be called from within a runtime. Only one session may run per
    /// indexer at a time.
    pub fn start_indexing(self: &Arc<Self>) -> IndexResult<IndexingSession> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(IndexError::SessionInProgress(self.root.clone()));
        }

        let (tx, rx) = mpsc::channel(self.config.channel_capacity);
        let indexer = Arc::clone(self);
        let task = tokio::task::spawn_blocking(move || {
            let summary = indexer.run_session(&tx);
            indexer.running.store(false, Ordering::Release);
            if tx.blocking_send(IndexEvent::Completed(summary.clone())).is_err() {
                debug!("event receiver dropped before completion");
            }
            summary
        });

        Ok(IndexingSession { events: rx, task })
    }

    fn run_session(&self, tx: &mpsc::Sender<IndexEvent>) -> IndexSummary {
        let mut summary = IndexSummary::new(&self.root);
        let total = self.discover_size();
        summary.total_bytes = total;
        *self.ingest.lock() = IngestState {
            total_bytes: total,
            indexed_bytes: 0,
        };

        if total == 0 {
            info!(root = %self.root.display(), "nothing to index");
            return summary;
        }
        info!(
            root = %self.root.display(),
            total = %format_size(total),
            "starting index pass"
        );

        self.index_pass(&mut summary, tx);
        if tx.blocking_send(IndexEvent::Progress(100.0)).is_err() {
            debug!("event receiver dropped");
        }

        info!(
            files = summary.files_indexed,
            indexed = %format_size(summary.indexed_bytes),
            skipped = summary.subtrees_skipped,
            errors = summary.errors,
            "indexing complete"
        );
        summary
    }

    /// First pass: sum the sizes of every non-directory entry.
    fn discover_size(&self) -> u64 {
        let mut total = 0u64;
        self.walker
            .walk(&self.root, &mut |item: WalkItem<'_>| match item {
                WalkItem::Entry { info, .. } => {
                    if !info.is_dir {
                        total = total.saturating_add(info.size);
                    }
                    WalkControl::Continue
                }
                WalkItem::Failure(failure) => Self::on_walk_failure(failure),
            });
        total
    }

    /// Second pass: insert a record per non-directory entry.
    ///
    /// A path already in the tree, from an earlier session or an ad hoc
    /// change that got there first, is replaced rather than duplicated.
    fn index_pass(&self, summary: &mut IndexSummary, tx: &mpsc::Sender<IndexEvent>) {
        let mut reporter =
            ProgressReporter::new(self.config.progress_step, self.config.completion_threshold);
        let mut receiver_gone = false;

        self.walker.walk(&self.root, &mut |item: WalkItem<'_>| match item {
            WalkItem::Entry { path, info } => {
                if info.is_dir {
                    return WalkControl::Continue;
                }
                let record = IndexedRecord::new(
                    path.to_string_lossy(),
                    info.size,
                    info.modified,
                    PathHasher::hash_path(path),
                    false,
                );
                let progress = {
                    let mut state = self.ingest.lock();
                    if self.tree.search(record.identity_key()).is_some() {
                        self.remove_exact(path);
                    }
                    self.tree.insert(record);
                    self.bump_generation();
                    state.indexed_bytes = state.indexed_bytes.saturating_add(info.size);
                    percent(state.indexed_bytes, state.total_bytes)
                };
                summary.files_indexed += 1;
                summary.indexed_bytes = summary.indexed_bytes.saturating_add(info.size);

                if let Some(value) = reporter.observe(progress) {
                    if !receiver_gone && tx.blocking_send(IndexEvent::Progress(value)).is_err() {
                        debug!("event receiver dropped, indexing continues");
                        receiver_gone = true;
                    }
                }
                WalkControl::Continue
            }
            WalkItem::Failure(failure) => {
                summary.errors += 1;
                if failure.permission_denied {
                    summary.subtrees_skipped += 1;
                }
                Self::on_walk_failure(failure)
            }
        });
    }

    fn on_walk_failure(failure: &WalkFailure) -> WalkControl {
        let path = failure
            .path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        if failure.permission_denied {
            warn!(path = %path, "permission denied, skipping directory");
            WalkControl::SkipSubtree
        } else {
            warn!(path = %path, error = %failure, "error walking entry");
            WalkControl::Continue
        }
    }

    // ---------------------------------------------------------------
    // Ad hoc changes
    // ---------------------------------------------------------------

    /// Stat `path` and insert a record for it.
    ///
    /// Directories are not indexed; adding one is a no-op. Adding a path
    /// that is already present leaves both records in the tree, which is
    /// what [`update_file`](Self::update_file) exists to avoid.
    pub fn add_file(&self, path: &Path) -> IndexResult<()> {
        let record = Self::stat_record(path)?;
        if record.is_directory() {
            debug!(path = %path.display(), "not indexing directory");
            return Ok(());
        }
        let _guard = self.ingest.lock();
        self.tree.insert(record);
        self.bump_generation();
        debug!(path = %path.display(), "added file");
        Ok(())
    }

    /// Replace whatever the index holds for `path` with fresh metadata.
    ///
    /// If the path cannot be stat'ed the index is left as it was and the
    /// error is returned.
    pub fn update_file(&self, path: &Path) -> IndexResult<()> {
        let record = Self::stat_record(path)?;
        let _guard = self.ingest.lock();
        let removed = self.remove_exact(path);
        if !record.is_directory() {
            self.tree.insert(record);
        }
        self.bump_generation();
        debug!(path = %path.display(), replaced = removed, "updated file");
        Ok(())
    }

    /// Drop every record for `path`, and for anything beneath it when it
    /// names a directory. Returns how many records were removed.
    pub fn remove_file(&self, path: &Path) -> usize {
        let _guard = self.ingest.lock();
        let mut removed = self.remove_exact(path);
        if removed == 0 {
            let mut beneath = Vec::new();
            let _ = self.tree.for_each(|record| {
                if Path::new(record.path()).starts_with(path) {
                    beneath.push(record.path().to_owned());
                }
                ControlFlow::Continue(())
            });
            for child in beneath {
                removed += self.remove_exact(Path::new(&child));
            }
        }
        if removed > 0 {
            self.bump_generation();
        }
        debug!(path = %path.display(), removed, "removed path");
        removed
    }

    fn remove_exact(&self, path: &Path) -> usize {
        let wanted = path.to_string_lossy();
        self.tree
            .remove_where(&PathHasher::path_key(path), |r| r.path() == wanted)
            .len()
    }

    fn stat_record(path: &Path) -> IndexResult<IndexedRecord> {
        let metadata = fs::metadata(path).map_err(|source| IndexError::Stat {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(IndexedRecord::from_metadata(path, &metadata))
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Find a record by identity key.
    pub fn search(&self, key: &IdentityKey) -> Option<IndexedRecord> {
        self.tree.search(key)
    }

    /// Find the record for a path, resolving hash collisions by path.
    pub fn search_path(&self, path: &Path) -> Option<IndexedRecord> {
        let key = PathHasher::path_key(path);
        let wanted = path.to_string_lossy();
        match self.tree.search(&key) {
            Some(record) if record.path() == wanted => Some(record),
            Some(_) => {
                let mut found = None;
                let _ = self.tree.for_each(|record| {
                    if record.identity_key() == &key && record.path() == wanted {
                        found = Some(record.clone());
                        return ControlFlow::Break(());
                    }
                    ControlFlow::Continue(())
                });
                found
            }
            None => None,
        }
    }

    /// Visit every record in key order; see [`BTree::for_each`].
    pub fn for_each_record<F>(&self, visit: F) -> ControlFlow<()>
    where
        F: FnMut(&IndexedRecord) -> ControlFlow<()>,
    {
        self.tree.for_each(visit)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Approximate in-memory footprint of the index in bytes.
    pub fn estimate_size(&self) -> usize {
        self.tree.estimate_size()
    }

    /// [`estimate_size`](Self::estimate_size) rendered with binary units.
    pub fn index_size(&self) -> String {
        format_size(self.estimate_size() as u64)
    }

    pub fn stats(&self) -> TreeStats {
        self.tree.stats()
    }
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("root", &self.root)
            .field("records", &self.tree.len())
            .field("indexing", &self.is_indexing())
            .finish()
    }
}

/// Handle to a running bulk ingestion.
///
/// Events arrive in order: progress values, then one
/// [`IndexEvent::Completed`], then the stream ends.
#[derive(Debug)]
pub struct IndexingSession {
    events: mpsc::Receiver<IndexEvent>,
    task: JoinHandle<IndexSummary>,
}

impl IndexingSession {
    /// Next event, or `None` once the stream has closed.
    pub async fn next_event(&mut self) -> Option<IndexEvent> {
        self.events.recv().await
    }

    /// Drain the remaining events and wait for the walk to finish.
    pub async fn wait(mut self) -> IndexResult<IndexSummary> {
        while self.events.recv().await.is_some() {}
        self.task
            .await
            .map_err(|e| IndexError::Task(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::EntryInfo;
    use std::time::UNIX_EPOCH;

    /// Replays a fixed list of items, honoring subtree skips by path
    /// prefix the way a real walk would.
    struct ScriptedWalker {
        items: Vec<(PathBuf, Result<EntryInfo, WalkFailure>)>,
    }

    impl DirectoryWalker for ScriptedWalker {
        fn walk(&self, _root: &Path, visit: &mut dyn FnMut(WalkItem<'_>) -> WalkControl) {
            let mut skipped: Option<&Path> = None;
            for (path, item) in &self.items {
                if skipped.is_some_and(|dir| path.starts_with(dir) && path.as_path() != dir) {
                    continue;
                }
                let control = match item {
                    Ok(info) => visit(WalkItem::Entry { path, info }),
                    Err(failure) => visit(WalkItem::Failure(failure)),
                };
                if control == WalkControl::SkipSubtree {
                    skipped = Some(path.as_path());
                }
            }
        }
    }

    fn scripted(items: Vec<(&str, Result<EntryInfo, WalkFailure>)>) -> Arc<Indexer> {
        let walker = ScriptedWalker {
            items: items.into_iter().map(|(p, i)| (PathBuf::from(p), i)).collect(),
        };
        Arc::new(
            Indexer::with_walker("/data", IndexerConfig::default(), Arc::new(walker)).unwrap(),
        )
    }

    async fn collect_events(indexer: &Arc<Indexer>) -> Vec<IndexEvent> {
        let mut session = indexer.start_indexing().unwrap();
        let mut events = Vec::new();
        while let Some(event) = session.next_event().await {
            events.push(event);
        }
        events
    }

    fn progress_values(events: &[IndexEvent]) -> Vec<f64> {
        events
            .iter()
            .filter_map(|e| match e {
                IndexEvent::Progress(p) => Some(*p),
                IndexEvent::Completed(_) => None,
            })
            .collect()
    }

    fn summary_of(events: &[IndexEvent]) -> &IndexSummary {
        match events.last() {
            Some(IndexEvent::Completed(summary)) => summary,
            other => panic!("stream did not end with Completed: {other:?}"),
        }
    }

    #[tokio::test]
    async fn four_equal_files_report_quarters() {
        let indexer = scripted(vec![
            ("/data", Ok(EntryInfo::dir())),
            ("/data/a", Ok(EntryInfo::file(250))),
            ("/data/b", Ok(EntryInfo::file(250))),
            ("/data/c", Ok(EntryInfo::file(250))),
            ("/data/d", Ok(EntryInfo::file(250))),
        ]);
        let events = collect_events(&indexer).await;

        assert_eq!(progress_values(&events), [25.0, 50.0, 75.0, 100.0]);
        let summary = summary_of(&events);
        assert_eq!(summary.files_indexed, 4);
        assert_eq!(summary.total_bytes, 1000);
        assert_eq!(indexer.len(), 4);
        assert!(!indexer.is_indexing());
    }

    #[tokio::test]
    async fn empty_root_completes_without_progress() {
        let indexer = scripted(vec![("/data", Ok(EntryInfo::dir()))]);
        let events = collect_events(&indexer).await;
        assert_eq!(events.len(), 1);
        assert_eq!(summary_of(&events).files_indexed, 0);
        assert!(indexer.is_empty());
    }

    #[tokio::test]
    async fn unreadable_root_completes_promptly() {
        let indexer = scripted(vec![("/data", Err(WalkFailure::permission_denied("/data")))]);
        let events = collect_events(&indexer).await;
        assert!(progress_values(&events).is_empty());
        assert!(matches!(events.as_slice(), [IndexEvent::Completed(_)]));
    }

    #[tokio::test]
    async fn permission_denied_subtree_is_skipped() {
        let indexer = scripted(vec![
            ("/data", Ok(EntryInfo::dir())),
            ("/data/secret", Err(WalkFailure::permission_denied("/data/secret"))),
            ("/data/secret/key", Ok(EntryInfo::file(100))),
            ("/data/open", Ok(EntryInfo::file(100))),
        ]);
        let events = collect_events(&indexer).await;
        let summary = summary_of(&events);

        assert_eq!(summary.files_indexed, 1);
        assert_eq!(summary.subtrees_skipped, 1);
        assert!(indexer.search_path(Path::new("/data/open")).is_some());
        assert!(indexer.search_path(Path::new("/data/secret/key")).is_none());
        assert_eq!(progress_values(&events).last(), Some(&100.0));
    }

    #[tokio::test]
    async fn other_errors_do_not_stop_the_walk() {
        let indexer = scripted(vec![
            ("/data", Ok(EntryInfo::dir())),
            ("/data/a", Ok(EntryInfo::file(10))),
            ("/data/bad", Err(WalkFailure::other("/data/bad", "stale handle"))),
            ("/data/b", Ok(EntryInfo::file(10))),
        ]);
        let summary = indexer.start_indexing().unwrap().wait().await.unwrap();
        assert_eq!(summary.files_indexed, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.subtrees_skipped, 0);
    }

    #[tokio::test]
    async fn many_small_files_are_coalesced() {
        let mut items: Vec<(String, Result<EntryInfo, WalkFailure>)> =
            vec![("/data".to_string(), Ok(EntryInfo::dir()))];
        for i in 0..1000 {
            items.push((format!("/data/f{i:04}"), Ok(EntryInfo::file(1))));
        }
        let indexer = scripted(items.iter().map(|(p, i)| (p.as_str(), i.clone())).collect());
        let events = collect_events(&indexer).await;
        let values = progress_values(&events);

        assert!(values.len() <= 110, "{} progress events", values.len());
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(values.iter().filter(|&&v| v == 100.0).count(), 1);
        assert_eq!(indexer.len(), 1000);
    }

    /// Blocks inside the walk until the test releases the gate.
    struct GatedWalker {
        gate: Arc<Mutex<()>>,
    }

    impl DirectoryWalker for GatedWalker {
        fn walk(&self, _root: &Path, _visit: &mut dyn FnMut(WalkItem<'_>) -> WalkControl) {
            let _open = self.gate.lock();
        }
    }

    #[tokio::test]
    async fn second_session_is_rejected_while_running() {
        let gate = Arc::new(Mutex::new(()));
        let held = gate.lock();
        let walker = GatedWalker {
            gate: Arc::clone(&gate),
        };
        let indexer = Arc::new(
            Indexer::with_walker("/data", IndexerConfig::default(), Arc::new(walker)).unwrap(),
        );

        let session = indexer.start_indexing().unwrap();
        assert!(indexer.is_indexing());
        assert!(matches!(
            indexer.start_indexing(),
            Err(IndexError::SessionInProgress(_))
        ));

        drop(held);
        session.wait().await.unwrap();
        assert!(!indexer.is_indexing());
        assert!(indexer.start_indexing().unwrap().wait().await.is_ok());
    }

    #[test]
    fn add_update_and_remove_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"first").unwrap();

        let indexer = Indexer::new(dir.path(), IndexerConfig::default()).unwrap();
        indexer.add_file(&path).unwrap();
        assert_eq!(indexer.search_path(&path).unwrap().size(), 5);

        fs::write(&path, b"second version").unwrap();
        indexer.update_file(&path).unwrap();
        assert_eq!(indexer.len(), 1);
        assert_eq!(indexer.search_path(&path).unwrap().size(), 14);

        assert_eq!(indexer.remove_file(&path), 1);
        assert!(indexer.search_path(&path).is_none());
        assert_eq!(indexer.remove_file(&path), 0);
    }

    #[tokio::test]
    async fn reindexing_replaces_existing_records() {
        let indexer = scripted(vec![
            ("/data", Ok(EntryInfo::dir())),
            ("/data/a", Ok(EntryInfo::file(250))),
            ("/data/b", Ok(EntryInfo::file(250))),
            ("/data/c", Ok(EntryInfo::file(250))),
            ("/data/d", Ok(EntryInfo::file(250))),
        ]);
        let first = indexer.start_indexing().unwrap().wait().await.unwrap();
        assert_eq!(indexer.len(), 4);

        let second = indexer.start_indexing().unwrap().wait().await.unwrap();
        assert_eq!(first.files_indexed, second.files_indexed);
        assert_eq!(indexer.len(), 4);
        assert!(indexer.search_path(Path::new("/data/c")).is_some());
    }

    #[tokio::test]
    async fn bulk_pass_replaces_a_file_added_ahead_of_it() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.txt", "b.txt", "c.txt"] {
            fs::write(dir.path().join(name), b"contents").unwrap();
        }
        let indexer = Arc::new(Indexer::new(dir.path(), IndexerConfig::default()).unwrap());
        indexer.add_file(&dir.path().join("c.txt")).unwrap();
        indexer.update_file(&dir.path().join("b.txt")).unwrap();

        let summary = indexer.start_indexing().unwrap().wait().await.unwrap();
        assert_eq!(summary.files_indexed, 3);
        assert_eq!(indexer.len(), 3);
    }

    #[test]
    fn generation_moves_on_every_change() {
        let dir = tempfile::tempdir().unwrap();
        let alpha = dir.path().join("alpha.txt");
        let bravo = dir.path().join("bravo.txt");
        fs::write(&alpha, b"a").unwrap();
        fs::write(&bravo, b"b").unwrap();
        let indexer = Indexer::new(dir.path(), IndexerConfig::default()).unwrap();

        let mut seen = indexer.generation();
        indexer.add_file(&alpha).unwrap();
        assert!(indexer.generation() > seen);

        seen = indexer.generation();
        indexer.update_file(&alpha).unwrap();
        assert!(indexer.generation() > seen);

        // A rename keeps the record count but still counts as a change.
        seen = indexer.generation();
        let before = indexer.len();
        indexer.remove_file(&alpha);
        indexer.add_file(&bravo).unwrap();
        assert_eq!(indexer.len(), before);
        assert!(indexer.generation() > seen);

        seen = indexer.generation();
        assert_eq!(indexer.remove_file(&alpha), 0);
        assert_eq!(indexer.generation(), seen);
    }

    #[test]
    fn add_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let indexer = Indexer::new(dir.path(), IndexerConfig::default()).unwrap();
        let err = indexer.add_file(&dir.path().join("ghost")).unwrap_err();
        assert!(matches!(err, IndexError::Stat { .. }));
        assert!(indexer.is_empty());
    }

    #[test]
    fn directories_are_not_added() {
        let dir = tempfile::tempdir().unwrap();
        let indexer = Indexer::new(dir.path(), IndexerConfig::default()).unwrap();
        indexer.add_file(dir.path()).unwrap();
        assert!(indexer.is_empty());
    }

    #[test]
    fn removing_a_directory_drops_its_contents() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let keep = dir.path().join("keep.txt");
        fs::write(&keep, b"k").unwrap();
        for name in ["x", "y"] {
            fs::write(sub.join(name), b"data").unwrap();
        }

        let indexer = Indexer::new(dir.path(), IndexerConfig::default()).unwrap();
        for path in [keep.clone(), sub.join("x"), sub.join("y")] {
            indexer.add_file(&path).unwrap();
        }
        assert_eq!(indexer.remove_file(&sub), 2);
        assert_eq!(indexer.len(), 1);
        assert!(indexer.search_path(&keep).is_some());
    }

    #[test]
    fn search_by_key_and_size_reporting() {
        let indexer = Indexer::with_walker(
            "/data",
            IndexerConfig::default(),
            Arc::new(ScriptedWalker { items: Vec::new() }),
        )
        .unwrap();
        let before = indexer.estimate_size();
        let path = Path::new("/data/x");
        indexer.tree().insert(IndexedRecord::new(
            "/data/x",
            1,
            UNIX_EPOCH,
            PathHasher::hash_path(path),
            false,
        ));
        let key = PathHasher::path_key(path);
        assert_eq!(indexer.search(&key).unwrap().path(), "/data/x");
        assert!(indexer.estimate_size() >= before);
        assert!(indexer.index_size().ends_with('B'));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = IndexerConfig {
            min_degree: 1,
            ..IndexerConfig::default()
        };
        assert!(matches!(
            Indexer::new("/data", config),
            Err(IndexError::InvalidConfig(_))
        ));
    }
}
