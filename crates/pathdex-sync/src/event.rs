use std::path::{Path, PathBuf};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use serde::{Deserialize, Serialize};

/// A change to one path, as the syncer understands it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ChangeEvent {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
}

impl ChangeEvent {
    pub fn path(&self) -> &Path {
        match self {
            Self::Created(p) | Self::Modified(p) | Self::Removed(p) => p,
        }
    }

    /// Translate a raw watcher event into zero or more changes.
    ///
    /// A rename becomes a removal of the old path and a creation of the
    /// new one. Access events and unclassified events produce nothing.
    pub fn from_notify(event: &Event) -> Vec<Self> {
        let paths = event.paths.iter().cloned();
        match event.kind {
            EventKind::Create(_) => paths.map(Self::Created).collect(),
            EventKind::Remove(_) => paths.map(Self::Removed).collect(),
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                paths.map(Self::Removed).collect()
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                paths.map(Self::Created).collect()
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => match event.paths.as_slice() {
                [from, to] => vec![Self::Removed(from.clone()), Self::Created(to.clone())],
                _ => paths.map(Self::Modified).collect(),
            },
            EventKind::Modify(_) => paths.map(Self::Modified).collect(),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
        }
    }
}
