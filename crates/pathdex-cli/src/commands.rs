use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use colored::Colorize;
use pathdex_index::{format_size, IndexEvent, IndexSummary, Indexer};
use pathdex_search::{SearchResult, Searcher};
use pathdex_sync::{start_watcher, Syncer};
use pathdex_types::{IdentityKey, IndexedRecord};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::cli::*;
use crate::config::PathdexConfig;
use crate::view;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = PathdexConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Index(args) => cmd_index(args, &config, cli.format).await,
        Command::Lookup(args) => cmd_lookup(args, &config, cli.format).await,
        Command::Search(args) => cmd_search(args, &config, cli.format).await,
        Command::Watch(args) => cmd_watch(args, config).await,
    }
}

async fn cmd_index(
    args: IndexArgs,
    config: &PathdexConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let (indexer, summary) = build_index(&args.root, config, format == OutputFormat::Text).await?;
    let stats = indexer.stats();

    match format {
        OutputFormat::Json => print_json(&json!({
            "summary": summary,
            "index_size_bytes": indexer.estimate_size(),
            "index_size": indexer.index_size(),
            "tree": stats,
            "elapsed_ms": started.elapsed().as_millis() as u64,
        })),
        OutputFormat::Text => {
            println!(
                "{} Indexed {} files ({}) in {:.2?}",
                "✓".green().bold(),
                summary.files_indexed.to_string().bold(),
                format_size(summary.indexed_bytes),
                started.elapsed()
            );
            if summary.subtrees_skipped > 0 || summary.errors > 0 {
                println!(
                    "  {} {} unreadable directories skipped, {} errors",
                    "!".yellow(),
                    summary.subtrees_skipped,
                    summary.errors
                );
            }
            println!("Index size: {}", indexer.index_size().cyan());
            println!(
                "  Tree: {} records, {} nodes, height {}",
                stats.records, stats.nodes, stats.height
            );
            Ok(())
        }
    }
}

async fn cmd_lookup(
    args: LookupArgs,
    config: &PathdexConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (indexer, _) = build_index(&args.root, config, false).await?;

    let found = match (&args.path, &args.key) {
        (Some(path), _) => {
            let path = resolve_under(indexer.root(), path);
            indexer.search_path(&path)
        }
        (None, Some(key)) => {
            let key = IdentityKey::from_hex(key).context("invalid identity key")?;
            indexer.search(&key)
        }
        (None, None) => bail!("either --path or --key is required"),
    };

    match (format, found) {
        (OutputFormat::Json, found) => print_json(&found.as_ref().map(RecordView::from)),
        (OutputFormat::Text, Some(record)) => {
            print_record(&record);
            Ok(())
        }
        (OutputFormat::Text, None) => {
            println!("{}", "Not found.".yellow());
            Ok(())
        }
    }
}

async fn cmd_search(
    args: SearchArgs,
    config: &PathdexConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (indexer, _) = build_index(&args.root, config, false).await?;
    let searcher = Searcher::new(indexer, config.search.clone());
    let limit = args.limit.unwrap_or(searcher.config().result_limit);
    let results = searcher.search_by_name_limit(&args.query, limit);

    match format {
        OutputFormat::Json => print_json(&results),
        OutputFormat::Text => {
            print_results(&results);
            Ok(())
        }
    }
}

async fn cmd_watch(args: WatchArgs, config: PathdexConfig) -> anyhow::Result<()> {
    let (indexer, _) = build_index(&args.root, &config, true).await?;
    println!("\nIndex size: {}", indexer.index_size().cyan());

    let syncer = Arc::new(Syncer::new(Arc::clone(&indexer)));
    let watch = match start_watcher(Arc::clone(&syncer)) {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "failed to start file watcher");
            eprintln!("{} continuing without real-time syncing: {e}", "warning:".yellow());
            None
        }
    };

    println!("\nDirectory structure (one level):");
    match view::one_level(indexer.root()) {
        Ok(lines) => lines.iter().for_each(|line| println!("{line}")),
        Err(e) => println!("Error reading directory {}: {e}", indexer.root().display()),
    }

    let searcher = Searcher::new(Arc::clone(&indexer), config.search);
    tokio::task::spawn_blocking(move || interactive_search(&searcher))
        .await
        .context("search prompt failed")??;

    if let Some(handle) = watch {
        handle.stop()?;
    }
    let stats = syncer.stats();
    tracing::info!(
        created = stats.created,
        modified = stats.modified,
        removed = stats.removed,
        failed = stats.failed,
        "watch session ended"
    );
    Ok(())
}

fn interactive_search(searcher: &Searcher) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\nEnter a file name to search (or 'quit' to exit): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let query = line?;
        let query = query.trim();
        match query {
            "" => continue,
            "quit" | "exit" => return Ok(()),
            _ => {}
        }

        searcher.refresh_if_stale();
        print_results(&searcher.search_by_name(query));
    }
}

/// Canonicalize the root, index it, and show progress on stdout if asked.
async fn build_index(
    root: &Path,
    config: &PathdexConfig,
    show_progress: bool,
) -> anyhow::Result<(Arc<Indexer>, IndexSummary)> {
    let root = root
        .canonicalize()
        .with_context(|| format!("cannot open {}", root.display()))?;
    let indexer = Arc::new(Indexer::new(root, config.index.clone())?);
    let mut session = indexer.start_indexing()?;

    let mut summary = None;
    while let Some(event) = session.next_event().await {
        match event {
            IndexEvent::Progress(pct) if show_progress => {
                print!("\r{:<50}\rIndexing progress: {pct:.2}%", "");
                io::stdout().flush()?;
            }
            IndexEvent::Progress(_) => {}
            IndexEvent::Completed(done) => summary = Some(done),
        }
    }
    if show_progress {
        println!("\n{}", "Indexing complete!".green());
    }

    let summary = match summary {
        Some(summary) => summary,
        None => session.wait().await?,
    };
    Ok((indexer, summary))
}

/// Relative paths are taken relative to the indexed root.
fn resolve_under(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    joined.canonicalize().unwrap_or(joined)
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No files found.");
        return;
    }
    println!("Found {} file(s):", results.len());
    for result in results {
        println!(
            "- {} (Score: {})\n  Full path: {}",
            highlight(result),
            result.score,
            result.record.path()
        );
    }
}

fn highlight(result: &SearchResult) -> String {
    let name = &result.name;
    let mut out = String::new();
    let mut last = 0;
    for range in &result.matched {
        out.push_str(&name[last..range.start]);
        out.push_str(&name[range.clone()].red().bold().to_string());
        last = range.end;
    }
    out.push_str(&name[last..]);
    out
}

fn print_record(record: &IndexedRecord) {
    let view = RecordView::from(record);
    println!("{}", view.path.bold());
    println!("  Size:     {}", format_size(view.size));
    println!("  Modified: {}", view.modified_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Key:      {}", view.key.yellow());
    if view.is_directory {
        println!("  Kind:     {}", "directory".cyan());
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A record shaped for display, with a real timestamp.
#[derive(Debug, Serialize)]
struct RecordView<'a> {
    path: &'a str,
    size: u64,
    modified_at: DateTime<Utc>,
    key: &'a str,
    name_hash: &'a str,
    is_directory: bool,
}

impl<'a> From<&'a IndexedRecord> for RecordView<'a> {
    fn from(record: &'a IndexedRecord) -> Self {
        Self {
            path: record.path(),
            size: record.size(),
            modified_at: DateTime::<Utc>::from(record.modified_at()),
            key: record.identity_key().as_str(),
            name_hash: record.hash().name_hash.as_str(),
            is_directory: record.is_directory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathdex_types::PathHasher;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn record_view_converts_time() {
        let record = IndexedRecord::new(
            "/d/a.txt",
            10,
            UNIX_EPOCH + Duration::from_secs(86_400),
            PathHasher::hash_path(Path::new("/d/a.txt")),
            false,
        );
        let view = RecordView::from(&record);
        assert_eq!(view.modified_at.to_rfc3339(), "1970-01-02T00:00:00+00:00");
        assert_eq!(view.key, PathHasher::path_key(Path::new("/d/a.txt")).as_str());
    }

    #[test]
    fn relative_lookup_paths_join_the_root() {
        let root = Path::new("/definitely/not/here");
        assert_eq!(resolve_under(root, Path::new("a.txt")), root.join("a.txt"));
        assert_eq!(resolve_under(root, Path::new("/x/y")), PathBuf::from("/x/y"));
    }

    #[test]
    fn highlight_keeps_unmatched_text() {
        colored::control::set_override(false);
        let result = SearchResult {
            record: IndexedRecord::new(
                "/d/Main.rs",
                1,
                UNIX_EPOCH,
                PathHasher::hash_path(Path::new("/d/Main.rs")),
                false,
            ),
            name: "Main.rs".into(),
            matched: vec![0..4],
            score: 12,
        };
        assert_eq!(highlight(&result), "Main.rs");
    }

    #[tokio::test]
    async fn build_index_reports_summary() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.txt"), b"12345").unwrap();
        let (indexer, summary) = build_index(dir.path(), &PathdexConfig::default(), false)
            .await
            .unwrap();
        assert_eq!(summary.files_indexed, 1);
        assert_eq!(indexer.len(), 1);
    }

    #[tokio::test]
    async fn build_index_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert!(build_index(&missing, &PathdexConfig::default(), false).await.is_err());
    }
}
