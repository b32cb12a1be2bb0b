//! In-memory storage backend for testing and ephemeral use.
//!
//! [`InMemoryBackend`] keeps file contents in a `HashMap` protected by a
//! `RwLock`. Each write swaps the whole entry, so it trivially satisfies the
//! atomic-replace contract. Data is lost when the backend is dropped.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::traits::{DurableWrite, RawRead};

/// An in-memory implementation of [`DurableWrite`] and [`RawRead`].
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    files: RwLock<HashMap<PathBuf, Vec<u8>>>,
}

impl InMemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file directly, bypassing the write path.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> StoreResult<()> {
        let mut files = self.files.write().map_err(poisoned)?;
        files.insert(path.into(), contents.into());
        Ok(())
    }

    /// Current content of a file, if present.
    pub fn contents(&self, path: &Path) -> StoreResult<Option<Vec<u8>>> {
        let files = self.files.read().map_err(poisoned)?;
        Ok(files.get(path).cloned())
    }

    /// Number of files held.
    pub fn len(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> io::Error {
    io::Error::other(format!("lock poisoned: {e}"))
}

#[async_trait]
impl DurableWrite for InMemoryBackend {
    async fn write_durable(&self, path: &Path, contents: &[u8]) -> StoreResult<()> {
        self.insert(path, contents)
    }
}

#[async_trait]
impl RawRead for InMemoryBackend {
    async fn read_raw(&self, path: &Path) -> StoreResult<Option<Vec<u8>>> {
        self.contents(path)
    }
}
