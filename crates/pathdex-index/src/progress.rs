//! Progress events and the coalescing rule that keeps the stream short.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One item on an indexing session's event stream.
///
/// A session emits zero or more `Progress` values, non-decreasing and in
/// `[0, 100]`, then exactly one `Completed`, then closes the stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum IndexEvent {
    Progress(f64),
    Completed(IndexSummary),
}

/// What a finished session did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub root: PathBuf,
    /// Bytes discovered by the sizing pass.
    pub total_bytes: u64,
    /// Bytes of the records actually inserted.
    pub indexed_bytes: u64,
    pub files_indexed: usize,
    /// Directories left out because they could not be read.
    pub subtrees_skipped: usize,
    /// Every failure reported during the insertion pass.
    pub errors: usize,
}

impl IndexSummary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

/// Percentage of `indexed` over `total`, clamped to `[0, 100]`.
pub fn percent(indexed: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (indexed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// Decides which raw progress values are worth sending.
///
/// A value goes out when it has risen by at least `step` since the last
/// one sent, or when it has reached `threshold`. Exactly 100 is always
/// held back: the session sends one terminal 100 itself once the walk
/// ends, so it never appears twice.
#[derive(Clone, Debug)]
pub struct ProgressReporter {
    step: f64,
    threshold: f64,
    last_reported: f64,
}

impl ProgressReporter {
    pub fn new(step: f64, threshold: f64) -> Self {
        Self {
            step,
            threshold,
            last_reported: 0.0,
        }
    }

    /// Feed one raw value; returns it if it should be emitted.
    pub fn observe(&mut self, progress: f64) -> Option<f64> {
        let progress = progress.clamp(0.0, 100.0);
        if progress >= 100.0 || progress < self.last_reported {
            return None;
        }
        if progress - self.last_reported >= self.step || progress >= self.threshold {
            self.last_reported = progress;
            return Some(progress);
        }
        None
    }

    pub fn last_reported(&self) -> f64 {
        self.last_reported
    }
}
