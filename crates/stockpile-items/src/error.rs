//! Error types for item ledger operations.

use stockpile_store::StoreError;
use thiserror::Error;

/// Errors that can occur while building, mutating or persisting a ledger.
#[derive(Debug, Error)]
pub enum ItemError {
    /// The snapshot's top-level value is not a JSON object.
    #[error("item snapshot must be a JSON object")]
    NotAnObject,

    /// An item's value is neither a bare count nor a quality record.
    #[error("invalid entry for item {item}: expected a count or a quality record")]
    InvalidEntry { item: String },

    /// A count is not an integral number.
    #[error("invalid count for item {item} ({quality}): {found}")]
    InvalidCount {
        item: String,
        quality: String,
        found: String,
    },

    /// Applying a delta would leave the signed 64-bit range.
    #[error("count overflow for item {item} ({quality})")]
    CountOverflow { item: String, quality: String },

    /// Loading or saving the snapshot file failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ItemError {
    /// Returns `true` for errors caused by invalid caller or snapshot data,
    /// as opposed to storage failures.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

/// Convenience type alias for ledger operations.
pub type ItemResult<T> = std::result::Result<T, ItemError>;
