//! Load/save orchestration over a [`StorageBackend`].
//!
//! A missing file loads as an empty map. That is the only failure recovered
//! here; parse errors, shape errors and every other I/O error propagate.

use std::path::Path;

use tracing::{debug, warn};

use crate::codec::{self, ObjectMap, RecordMap};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::fs::FsBackend;
use crate::traits::StorageBackend;

/// JSON map persistence bound to a storage backend.
///
/// The store holds no map state of its own: every call reads or writes the
/// whole file, and the returned map belongs to the caller. Callers must
/// serialize access to any one path themselves.
#[derive(Debug, Default)]
pub struct MapStore<B> {
    backend: B,
    config: StoreConfig,
}

impl MapStore<FsBackend> {
    /// A store on the local filesystem with the given configuration.
    pub fn on_disk(config: StoreConfig) -> Self {
        Self {
            backend: FsBackend::new(config.clone()),
            config,
        }
    }
}

impl<B: StorageBackend> MapStore<B> {
    pub fn new(backend: B, config: StoreConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load an object-mode file.
    pub async fn load_object_map(&self, path: &Path) -> StoreResult<ObjectMap> {
        let Some(bytes) = self.read(path).await? else {
            return Ok(ObjectMap::new());
        };
        let map =
            codec::decode_object_map(&bytes).map_err(|e| StoreError::format(path, e))?;
        debug!(path = %path.display(), entries = map.len(), "object map loaded");
        Ok(map)
    }

    /// Save an object-mode file, replacing it atomically.
    pub async fn save_object_map(&self, path: &Path, map: &ObjectMap) -> StoreResult<()> {
        let bytes = codec::encode_object_map(map, &self.config.indent)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.backend.write_durable(path, &bytes).await?;
        debug!(path = %path.display(), entries = map.len(), "object map saved");
        Ok(())
    }

    /// Load an array-mode file, keyed by each element's `id`.
    pub async fn load_array_map(&self, path: &Path) -> StoreResult<RecordMap> {
        let Some(bytes) = self.read(path).await? else {
            return Ok(RecordMap::new());
        };
        let map = codec::decode_array_map(&bytes).map_err(|e| StoreError::format(path, e))?;
        debug!(path = %path.display(), entries = map.len(), "array map loaded");
        Ok(map)
    }

    /// Save an array-mode file from the map's values, replacing it atomically.
    ///
    /// Each value is expected to embed its own `id`; consistency with the map
    /// key is not checked.
    pub async fn save_array_map(&self, path: &Path, map: &RecordMap) -> StoreResult<()> {
        let bytes = codec::encode_array_map(map, &self.config.indent)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.backend.write_durable(path, &bytes).await?;
        debug!(path = %path.display(), entries = map.len(), "array map saved");
        Ok(())
    }

    async fn read(&self, path: &Path) -> StoreResult<Option<Vec<u8>>> {
        let bytes = self.backend.read_raw(path).await?;
        if bytes.is_none() {
            warn!(path = %path.display(), "file not found; treating as empty");
        }
        Ok(bytes)
    }
}

/// Load an object-mode file from disk with the default configuration.
pub async fn load_object_map(path: impl AsRef<Path>) -> StoreResult<ObjectMap> {
    MapStore::on_disk(StoreConfig::default())
        .load_object_map(path.as_ref())
        .await
}

/// Save an object-mode file to disk with the default configuration.
pub async fn save_object_map(path: impl AsRef<Path>, map: &ObjectMap) -> StoreResult<()> {
    MapStore::on_disk(StoreConfig::default())
        .save_object_map(path.as_ref(), map)
        .await
}

/// Load an array-mode file from disk with the default configuration.
pub async fn load_array_map(path: impl AsRef<Path>) -> StoreResult<RecordMap> {
    MapStore::on_disk(StoreConfig::default())
        .load_array_map(path.as_ref())
        .await
}

/// Save an array-mode file to disk with the default configuration.
pub async fn save_array_map(path: impl AsRef<Path>, map: &RecordMap) -> StoreResult<()> {
    MapStore::on_disk(StoreConfig::default())
        .save_array_map(path.as_ref(), map)
        .await
}
