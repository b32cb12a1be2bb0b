use std::path::Path;

use async_trait::async_trait;

use crate::error::StoreResult;

/// Atomic, directory-creating file write.
///
/// Implementations must satisfy these invariants:
/// - Missing parent directories are created.
/// - The target is replaced atomically: a reader sees either the previous
///   content or the new content, never a truncated file.
/// - A failed write leaves the previous content in place.
#[async_trait]
pub trait DurableWrite: Send + Sync {
    /// Replace the content of `path` with `contents`.
    async fn write_durable(&self, path: &Path, contents: &[u8]) -> StoreResult<()>;
}

/// Whole-file read that tells "not found" apart from other failures.
#[async_trait]
pub trait RawRead: Send + Sync {
    /// Read the full content of `path`.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    /// Returns `Err` on any other I/O failure.
    async fn read_raw(&self, path: &Path) -> StoreResult<Option<Vec<u8>>>;
}

/// A backend providing both halves of the storage contract.
pub trait StorageBackend: DurableWrite + RawRead {}

impl<T: DurableWrite + RawRead> StorageBackend for T {}
