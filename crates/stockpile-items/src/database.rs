//! The [`ItemDatabase`] ledger.
//!
//! Tracks a signed count per `(item, quality)` pair. Absent items and absent
//! qualities read as zero. Counts that return to zero stay resident in memory
//! until the ledger is rebuilt from a snapshot, but are never serialized.

use std::path::Path;

use indexmap::{map, IndexMap};
use serde_json::Value;
use stockpile_store::{MapStore, ObjectMap, StorageBackend};
use tracing::{debug, trace};

use crate::error::{ItemError, ItemResult};
use crate::snapshot::{ItemSnapshot, QualityCounts, StoredCounts};

/// In-memory ledger of item counts partitioned by quality.
///
/// Items and qualities iterate in the order they were first recorded, or in
/// file order for a ledger built from a snapshot. The ledger has no internal
/// locking; callers serialize mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemDatabase {
    items: IndexMap<String, QualityCounts>,
}

impl ItemDatabase {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from a previously serialized snapshot.
    ///
    /// Bare-number entries are migrated to the `"normal"` quality. Fails
    /// without returning a partial ledger if any entry or count is invalid.
    pub fn from_snapshot(snapshot: &ObjectMap) -> ItemResult<Self> {
        let items = snapshot
            .iter()
            .map(|(name, value)| -> ItemResult<(String, QualityCounts)> {
                let counts = StoredCounts::parse(name, value)?.into_qualities();
                Ok((name.clone(), counts))
            })
            .collect::<ItemResult<IndexMap<_, _>>>()?;
        Ok(Self { items })
    }

    /// Like [`from_snapshot`](Self::from_snapshot), for an untyped JSON value.
    pub fn from_value(value: &Value) -> ItemResult<Self> {
        match value {
            Value::Object(snapshot) => Self::from_snapshot(snapshot),
            _ => Err(ItemError::NotAnObject),
        }
    }

    /// Count of `name` at `quality`; zero if either is absent.
    pub fn get_item_count(&self, name: &str, quality: &str) -> i64 {
        self.items
            .get(name)
            .and_then(|counts| counts.get(quality))
            .copied()
            .unwrap_or(0)
    }

    /// Add `count` (which may be negative) to `name` at `quality`.
    ///
    /// Counts have no floor. Fails with [`ItemError::CountOverflow`], leaving
    /// the ledger unchanged, if the result leaves the `i64` range.
    pub fn add_item(&mut self, name: &str, count: i64, quality: &str) -> ItemResult<()> {
        let total = self
            .get_item_count(name, quality)
            .checked_add(count)
            .ok_or_else(|| overflow(name, quality))?;

        self.items
            .entry(name.to_string())
            .or_default()
            .insert(quality.to_string(), total);

        trace!(item = name, quality, delta = count, total, "item count adjusted");
        Ok(())
    }

    /// Subtract `count` from `name` at `quality`.
    ///
    /// Equivalent to `add_item(name, -count, quality)`.
    pub fn remove_item(&mut self, name: &str, count: i64, quality: &str) -> ItemResult<()> {
        let delta = count.checked_neg().ok_or_else(|| overflow(name, quality))?;
        self.add_item(name, delta, quality)
    }

    /// Snapshot of every non-zero count.
    ///
    /// Zero counts are dropped, and so are items left with no non-zero
    /// quality.
    pub fn serialize(&self) -> ItemSnapshot {
        let items = self
            .items
            .iter()
            .filter_map(|(name, counts)| {
                let nonzero: QualityCounts = counts
                    .iter()
                    .filter(|(_, count)| **count != 0)
                    .map(|(quality, count)| (quality.clone(), *count))
                    .collect();
                (!nonzero.is_empty()).then(|| (name.clone(), nonzero))
            })
            .collect();
        ItemSnapshot::new(items)
    }

    /// Object-mode form of [`serialize`](Self::serialize).
    pub fn to_object_map(&self) -> ObjectMap {
        self.serialize().to_object_map()
    }

    /// Raw view of the in-memory state, zero entries included.
    ///
    /// The iterator borrows the ledger, so it cannot outlive a mutation.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            inner: self.items.iter(),
        }
    }

    /// Number of item names resident in memory, including those whose
    /// counts are all zero.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Load a ledger from an object-mode file. A missing file yields an
    /// empty ledger.
    pub async fn load<B: StorageBackend>(store: &MapStore<B>, path: &Path) -> ItemResult<Self> {
        let snapshot = store.load_object_map(path).await?;
        let db = Self::from_snapshot(&snapshot)?;
        debug!(path = %path.display(), items = db.len(), "item ledger loaded");
        Ok(db)
    }

    /// Save the non-zero counts to an object-mode file.
    pub async fn save<B: StorageBackend>(&self, store: &MapStore<B>, path: &Path) -> ItemResult<()> {
        let snapshot = self.to_object_map();
        store.save_object_map(path, &snapshot).await?;
        debug!(path = %path.display(), items = snapshot.len(), "item ledger saved");
        Ok(())
    }
}

fn overflow(name: &str, quality: &str) -> ItemError {
    ItemError::CountOverflow {
        item: name.to_string(),
        quality: quality.to_string(),
    }
}

/// Iterator over `(item name, quality counts)` returned by
/// [`ItemDatabase::entries`].
#[derive(Clone, Debug)]
pub struct Entries<'a> {
    inner: map::Iter<'a, String, QualityCounts>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a str, &'a QualityCounts);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, counts)| (name.as_str(), counts))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}

impl<'a> IntoIterator for &'a ItemDatabase {
    type Item = (&'a str, &'a QualityCounts);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}
