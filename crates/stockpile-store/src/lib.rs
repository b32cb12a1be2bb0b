//! Durable JSON map storage for Stockpile.
//!
//! This crate persists keyed collections as flat JSON files in one of two
//! shapes:
//!
//! - **Object mode** ([`ObjectMap`]) -- a top-level object; each property is
//!   one entry.
//! - **Array mode** ([`RecordMap`]) -- a top-level array of self-describing
//!   objects, keyed by their `id` property.
//!
//! # Storage Backends
//!
//! All backends implement [`DurableWrite`] and [`RawRead`]:
//!
//! - [`FsBackend`] -- local filesystem, temp file + atomic rename
//! - [`InMemoryBackend`] -- `HashMap`-based backend for tests and embedding
//!
//! # Design Rules
//!
//! 1. A missing file loads as an empty map; every other failure propagates.
//! 2. Writes replace the whole file atomically and create parent directories.
//! 3. Files are tab-indented and keep insertion order.
//! 4. The store keeps no state between calls; concurrent writers to the same
//!    path must be serialized by the caller.

pub mod codec;
pub mod config;
pub mod error;
pub mod fs;
pub mod map;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use codec::{ObjectMap, RecordKey, RecordMap, ID_FIELD};
pub use config::StoreConfig;
pub use error::{FormatError, StoreError, StoreResult};
pub use fs::FsBackend;
pub use map::{load_array_map, load_object_map, save_array_map, save_object_map, MapStore};
pub use memory::InMemoryBackend;
pub use traits::{DurableWrite, RawRead, StorageBackend};
