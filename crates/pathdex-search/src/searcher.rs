use std::ops::Range;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use pathdex_index::Indexer;
use pathdex_types::IndexedRecord;
use serde::Serialize;
use tracing::debug;

use crate::config::SearchConfig;
use crate::fuzzy;
use crate::names::NameIndex;

/// One name-search hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub record: IndexedRecord,
    /// Base name as stored, with original case.
    pub name: String,
    /// Byte ranges of `name` matched by the query words.
    pub matched: Vec<Range<usize>>,
    pub score: i64,
}

impl SearchResult {
    /// `name` with every matched range wrapped in `open`/`close`.
    pub fn highlighted(&self, open: &str, close: &str) -> String {
        fuzzy::highlight(&self.name, &self.matched, open, close)
    }
}

/// Fuzzy search by file name, plus exact lookup by path.
pub struct Searcher {
    indexer: Arc<Indexer>,
    names: RwLock<NameIndex>,
    /// Indexer generation the name index was built from.
    built_at: AtomicU64,
    config: SearchConfig,
}

impl Searcher {
    /// Build a searcher over the current contents of `indexer`.
    pub fn new(indexer: Arc<Indexer>, config: SearchConfig) -> Self {
        let generation = indexer.generation();
        let names = NameIndex::build(&indexer);
        debug!(names = names.len(), records = names.record_count(), "name index built");
        Self {
            indexer,
            names: RwLock::new(names),
            built_at: AtomicU64::new(generation),
            config,
        }
    }

    /// Rebuild the name index from the indexer.
    pub fn refresh(&self) {
        // Read before the traversal so a change racing the rebuild leaves
        // the index marked stale.
        let generation = self.indexer.generation();
        let names = NameIndex::build(&self.indexer);
        debug!(
            names = names.len(),
            records = names.record_count(),
            generation,
            "name index rebuilt"
        );
        *self.names.write() = names;
        self.built_at.store(generation, Ordering::Release);
    }

    /// Rebuild only if the indexer has changed since the last build.
    pub fn refresh_if_stale(&self) -> bool {
        let stale = self.built_at.load(Ordering::Acquire) != self.indexer.generation();
        if stale {
            self.refresh();
        }
        stale
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Best matches for `query` using the configured limit.
    pub fn search_by_name(&self, query: &str) -> Vec<SearchResult> {
        self.search_by_name_limit(query, self.config.result_limit)
    }

    /// Best matches for `query`, highest score first, at most `limit`.
    ///
    /// Ties keep a stable order by path so repeated searches agree.
    pub fn search_by_name_limit(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let lower = query.to_lowercase();
        let names = self.names.read();

        let mut results: Vec<SearchResult> = names
            .iter()
            .filter_map(|(name, records)| fuzzy::score(&lower, name).map(|s| (s, records)))
            .flat_map(|(score, records)| {
                records.iter().map(move |record| {
                    let name = record.file_name().to_owned();
                    SearchResult {
                        matched: fuzzy::match_ranges(&name, query),
                        record: record.clone(),
                        name,
                        score,
                    }
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.record.path().cmp(b.record.path()))
        });
        results.truncate(limit);
        results
    }

    /// Exact lookup of one path.
    pub fn search_by_path(&self, path: &Path) -> Option<IndexedRecord> {
        self.indexer.search_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathdex_index::IndexerConfig;
    use pathdex_types::PathHasher;
    use std::time::UNIX_EPOCH;

    fn indexer_with(paths: &[&str]) -> Arc<Indexer> {
        let indexer = Indexer::new("/data", IndexerConfig::default()).unwrap();
        for path in paths {
            indexer.tree().insert(IndexedRecord::new(
                *path,
                1,
                UNIX_EPOCH,
                PathHasher::hash_path(Path::new(path)),
                false,
            ));
        }
        Arc::new(indexer)
    }

    #[test]
    fn best_match_comes_first() {
        let searcher = Searcher::new(
            indexer_with(&["/data/my_animation.rs", "/data/src/main.rs", "/data/lib.rs"]),
            SearchConfig::default(),
        );
        let results = searcher.search_by_name("main");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].record.path(), "/data/src/main.rs");
        assert_eq!(results[0].matched, [0..4]);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn search_is_case_insensitive() {
        let searcher = Searcher::new(indexer_with(&["/data/README.md"]), SearchConfig::default());
        let results = searcher.search_by_name("readme");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "README.md");
        assert_eq!(results[0].highlighted("<", ">"), "<README>.md");
    }

    #[test]
    fn same_name_in_two_dirs_yields_both() {
        let searcher = Searcher::new(
            indexer_with(&["/data/a/mod.rs", "/data/b/mod.rs"]),
            SearchConfig::default(),
        );
        let paths: Vec<_> = searcher
            .search_by_name("mod")
            .into_iter()
            .map(|r| r.record.path().to_owned())
            .collect();
        assert_eq!(paths, ["/data/a/mod.rs", "/data/b/mod.rs"]);
    }

    #[test]
    fn limit_is_respected() {
        let paths: Vec<String> = (0..40).map(|i| format!("/data/file{i}.txt")).collect();
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let searcher = Searcher::new(indexer_with(&refs), SearchConfig::default());
        assert_eq!(searcher.search_by_name("file").len(), 15);
        assert_eq!(searcher.search_by_name_limit("file", 3).len(), 3);
    }

    #[test]
    fn no_match_is_empty() {
        let searcher = Searcher::new(indexer_with(&["/data/a.txt"]), SearchConfig::default());
        assert!(searcher.search_by_name("zzz").is_empty());
    }

    #[test]
    fn refresh_picks_up_new_records() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = dir.path().join("new.txt");
        std::fs::write(&fresh, b"n").unwrap();
        let indexer = Arc::new(Indexer::new(dir.path(), IndexerConfig::default()).unwrap());
        let searcher = Searcher::new(Arc::clone(&indexer), SearchConfig::default());

        indexer.add_file(&fresh).unwrap();
        assert!(searcher.search_by_name("new").is_empty());
        assert!(searcher.refresh_if_stale());
        assert_eq!(searcher.search_by_name("new").len(), 1);
        assert!(!searcher.refresh_if_stale());
    }

    #[test]
    fn refresh_follows_a_rename() {
        let dir = tempfile::tempdir().unwrap();
        let alpha = dir.path().join("alpha.txt");
        let bravo = dir.path().join("bravo.txt");
        std::fs::write(&alpha, b"a").unwrap();
        let indexer = Arc::new(Indexer::new(dir.path(), IndexerConfig::default()).unwrap());
        indexer.add_file(&alpha).unwrap();
        let searcher = Searcher::new(Arc::clone(&indexer), SearchConfig::default());

        std::fs::rename(&alpha, &bravo).unwrap();
        indexer.remove_file(&alpha);
        indexer.add_file(&bravo).unwrap();

        assert!(searcher.refresh_if_stale());
        assert_eq!(searcher.search_by_name("bravo").len(), 1);
        assert!(searcher.search_by_name("alpha").is_empty());
    }

    #[test]
    fn refresh_follows_an_update_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"short").unwrap();
        let indexer = Arc::new(Indexer::new(dir.path(), IndexerConfig::default()).unwrap());
        indexer.add_file(&path).unwrap();
        let searcher = Searcher::new(Arc::clone(&indexer), SearchConfig::default());

        std::fs::write(&path, b"a good deal longer").unwrap();
        indexer.update_file(&path).unwrap();

        assert!(searcher.refresh_if_stale());
        assert_eq!(searcher.search_by_name("notes")[0].record.size(), 18);
    }

    #[test]
    fn search_by_path_finds_exact_record() {
        let searcher = Searcher::new(indexer_with(&["/data/x/y.bin"]), SearchConfig::default());
        assert!(searcher.search_by_path(Path::new("/data/x/y.bin")).is_some());
        assert!(searcher.search_by_path(Path::new("/data/x/z.bin")).is_none());
    }

    #[test]
    fn results_serialize() {
        let searcher = Searcher::new(indexer_with(&["/data/a.txt"]), SearchConfig::default());
        let json = serde_json::to_value(searcher.search_by_name("a")).unwrap();
        assert_eq!(json[0]["name"], "a.txt");
        assert_eq!(json[0]["matched"][0]["start"], 0);
    }
}
