//! Foundation types for pathdex.
//!
//! This crate provides the value types that flow between the walker and the
//! index tree. Every other pathdex crate depends on
//! `pathdex-types`.
//!
//! # Key Types
//!
//! - [`IndexedRecord`] -- Immutable metadata for one file or directory
//! - [`IdentityKey`] -- Hex digest used as the sort/search key
//! - [`FileHash`] -- Name hash and path hash pair for a record
//! - [`PathHasher`] -- Domain-separated BLAKE3 hasher producing identity keys

pub mod error;
pub mod hasher;
pub mod key;
pub mod record;

pub use error::TypeError;
pub use hasher::PathHasher;
pub use key::{FileHash, IdentityKey};
pub use record::IndexedRecord;
