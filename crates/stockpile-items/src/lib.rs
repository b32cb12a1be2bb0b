//! Item ledger for Stockpile.
//!
//! [`ItemDatabase`] tracks signed integer counts of named items, each item
//! further partitioned by a quality tier. It is seeded from a snapshot (or
//! starts empty), mutated in place, and serialized back on demand; when and
//! where it is persisted is up to the caller.
//!
//! # Snapshot format
//!
//! A JSON object mapping item name to either a record of quality name to
//! count, or (legacy) a bare number meaning that many of quality `"normal"`.
//! Legacy entries are normalized on load and never written back. Zero counts
//! are omitted on save.
//!
//! # Modules
//!
//! - [`error`] — Error types for ledger operations
//! - [`snapshot`] — Persisted shapes: [`StoredCounts`], [`ItemSnapshot`]
//! - [`database`] — The [`ItemDatabase`] ledger itself

pub mod database;
pub mod error;
pub mod snapshot;

pub use database::{Entries, ItemDatabase};
pub use error::{ItemError, ItemResult};
pub use snapshot::{ItemSnapshot, QualityCounts, StoredCounts, DEFAULT_QUALITY};
