//! # pathdex-index
//!
//! Ingestion pipeline for pathdex. An [`Indexer`] owns the index tree for
//! one root directory and fills it in two passes: a sizing walk that sums
//! the bytes to expect, then an insertion walk that streams coalesced
//! progress to the caller as [`IndexEvent`]s.
//!
//! ## Error policy
//!
//! - An unreadable directory is logged and its subtree skipped.
//! - Any other per-entry failure is logged and the walk continues.
//! - Nothing a walk encounters aborts the session; the stream always ends
//!   with [`IndexEvent::Completed`].
//!
//! Ad hoc changes ([`Indexer::add_file`], [`Indexer::update_file`],
//! [`Indexer::remove_file`]) share the session's write guard and may run
//! while a bulk session is in flight.

pub mod config;
pub mod error;
pub mod indexer;
pub mod progress;
pub mod size;
pub mod walk;

pub use config::IndexerConfig;
pub use error::{IndexError, IndexResult};
pub use indexer::{Indexer, IndexingSession};
pub use progress::{IndexEvent, IndexSummary, ProgressReporter};
pub use size::format_size;
pub use walk::{DirectoryWalker, EntryInfo, FsWalker, WalkControl, WalkFailure, WalkItem};
