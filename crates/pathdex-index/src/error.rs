//! Error types for the index crate.

use std::path::PathBuf;

use pathdex_tree::TreeError;

/// Errors that can occur during index operations.
///
/// Per-entry walk failures are not errors at this level: the pipeline logs
/// them and moves on. These variants cover the calls that act on a single
/// path for a caller who needs to know whether it worked.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Reading metadata for a single path failed.
    #[error("cannot access {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The index tree could not be constructed.
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// A configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A bulk indexing session is already running on this indexer.
    #[error("an indexing session is already running for {}", .0.display())]
    SessionInProgress(PathBuf),

    /// The background indexing task failed to complete.
    #[error("indexing task failed: {0}")]
    Task(String),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
