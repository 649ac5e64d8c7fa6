//! Name search over a pathdex index.
//!
//! The index is keyed by path hash, which is useless for "find me files
//! called something like X". [`Searcher`] derives a name-keyed view from a
//! full traversal and ranks fuzzy matches against it.

pub mod config;
pub mod fuzzy;
pub mod names;
pub mod searcher;

pub use config::SearchConfig;
pub use names::NameIndex;
pub use searcher::{SearchResult, Searcher};
