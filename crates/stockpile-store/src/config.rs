use serde::{Deserialize, Serialize};

/// Configuration shared by the codec and the filesystem backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Indentation unit used when pretty-printing files.
    pub indent: String,
    /// Whether the temporary file is synced to disk before it replaces the
    /// target. Disabling this keeps the rename atomic but not crash-durable.
    pub fsync: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            fsync: true,
        }
    }
}

impl StoreConfig {
    /// A configuration that skips `fsync`, for tests and scratch data.
    pub fn fast() -> Self {
        Self {
            fsync: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_indents_with_tabs() {
        let config = StoreConfig::default();
        assert_eq!(config.indent, "\t");
        assert!(config.fsync);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{"fsync": false}"#).unwrap();
        assert_eq!(config, StoreConfig::fast());
    }
}
