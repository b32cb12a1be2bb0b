use std::path::PathBuf;

/// Ways persisted JSON can fail to match the expected on-disk shape.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The file content is not valid JSON.
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Object mode: the top-level value is not a JSON object.
    #[error("expected object")]
    ExpectedObject,

    /// Array mode: the top-level value is not a JSON array.
    #[error("expected array")]
    ExpectedArray,

    /// Array mode: an element of the top-level array is not an object.
    #[error("expected object elements")]
    ExpectedObjectElements { index: usize },

    /// Array mode: an element has no `id` property.
    #[error("missing id")]
    MissingId { index: usize },
}

/// Errors from map store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The file exists but its content does not have the expected shape.
    #[error("invalid format in {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    /// Serialization of an in-memory map failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn format(path: impl Into<PathBuf>, source: FormatError) -> Self {
        Self::Format {
            path: path.into(),
            source,
        }
    }

    /// Returns the shape violation if this is a format error.
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            Self::Format { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
