//! Concurrent B-tree index for pathdex.
//!
//! This crate implements the ordered structure that every indexed record
//! lives in: a multiway search tree keyed by [`IdentityKey`], the hash of a
//! record's full path.
//!
//! # Types
//!
//! - [`BTree`] -- the tree itself, behind a single whole-tree lock
//! - [`Node`] -- one level of sorted records plus owned children
//! - [`TreeStats`] -- record/node counts and height for reporting
//!
//! # Design Rules
//!
//! 1. Every insert or remove holds the write lock for its full duration,
//!    including any rebalancing it triggers.
//! 2. Every search or traversal holds the read lock for its full duration.
//! 3. Callers never receive references into tree storage outside a
//!    traversal callback; lookups return owned clones.
//! 4. Duplicate keys are allowed and keep their insertion order.
//!
//! [`IdentityKey`]: pathdex_types::IdentityKey

pub mod btree;
pub mod error;
pub mod node;

pub use btree::{BTree, TreeStats, DEFAULT_MIN_DEGREE};
pub use error::{TreeError, TreeResult};
pub use node::Node;
