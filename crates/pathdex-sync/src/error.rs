use std::path::PathBuf;

use pathdex_index::IndexError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("watcher error: {0}")]
    Notify(#[from] notify::Error),

    #[error("cannot apply change to {}: {source}", .path.display())]
    Apply {
        path: PathBuf,
        #[source]
        source: IndexError,
    },

    #[error("watcher thread failed: {0}")]
    Thread(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
