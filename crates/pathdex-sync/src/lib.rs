//! Live synchronization for pathdex.
//!
//! Turns file-system change notifications into index updates so an index
//! built once stays current.
//!
//! # Key Types
//!
//! - [`ChangeEvent`] -- A change to one path
//! - [`Syncer`] -- Applies changes to an indexer
//! - [`WatchHandle`] -- A running `notify` watcher feeding a syncer

pub mod error;
pub mod event;
pub mod syncer;
pub mod watcher;

pub use error::{SyncError, SyncResult};
pub use event::ChangeEvent;
pub use syncer::{SyncStats, Syncer};
pub use watcher::{start_watcher, WatchHandle};
