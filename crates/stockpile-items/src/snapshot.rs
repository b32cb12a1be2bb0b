//! Snapshot shapes for the item ledger.
//!
//! On disk an item maps either to a bare number (the legacy single-quality
//! form) or to a record of quality name to count. [`StoredCounts`] resolves
//! that once, at load time; everything after works on [`QualityCounts`].

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use stockpile_store::ObjectMap;

use crate::error::{ItemError, ItemResult};

/// Quality assigned to legacy bare-number entries.
pub const DEFAULT_QUALITY: &str = "normal";

/// Counts for one item, keyed by quality.
pub type QualityCounts = IndexMap<String, i64>;

/// The two accepted shapes of a persisted item entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoredCounts {
    /// A bare number, meaning that many of [`DEFAULT_QUALITY`].
    Legacy(i64),
    /// Quality name to count.
    Qualities(QualityCounts),
}

impl StoredCounts {
    /// Parse the persisted value of `item`.
    pub fn parse(item: &str, value: &Value) -> ItemResult<Self> {
        match value {
            Value::Number(_) => parse_count(item, DEFAULT_QUALITY, value).map(Self::Legacy),
            Value::Object(fields) => fields
                .iter()
                .map(|(quality, count)| -> ItemResult<(String, i64)> {
                    Ok((quality.clone(), parse_count(item, quality, count)?))
                })
                .collect::<ItemResult<QualityCounts>>()
                .map(Self::Qualities),
            _ => Err(ItemError::InvalidEntry {
                item: item.to_string(),
            }),
        }
    }

    /// Normalize to the quality-keyed form.
    pub fn into_qualities(self) -> QualityCounts {
        match self {
            Self::Legacy(count) => QualityCounts::from([(DEFAULT_QUALITY.to_string(), count)]),
            Self::Qualities(counts) => counts,
        }
    }
}

/// Integral JSON numbers only; `5.0` is accepted as 5.
fn parse_count(item: &str, quality: &str, value: &Value) -> ItemResult<i64> {
    if let Some(count) = value.as_i64() {
        return Ok(count);
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(ItemError::InvalidCount {
            item: item.to_string(),
            quality: quality.to_string(),
            found: value.to_string(),
        }),
    }
}

/// Serializable ledger state: item name to non-zero quality counts, in
/// ledger order.
///
/// Always the quality-keyed form; legacy entries are never written back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ItemSnapshot {
    items: IndexMap<String, QualityCounts>,
}

impl ItemSnapshot {
    pub(crate) fn new(items: IndexMap<String, QualityCounts>) -> Self {
        Self { items }
    }

    pub fn contains_item(&self, item: &str) -> bool {
        self.items.contains_key(item)
    }

    /// Iterate items and their quality counts.
    pub fn items(&self) -> impl Iterator<Item = (&str, &QualityCounts)> {
        self.items.iter().map(|(name, counts)| (name.as_str(), counts))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Plain JSON object form, ready for object-mode persistence.
    pub fn to_object_map(&self) -> ObjectMap {
        self.items
            .iter()
            .map(|(name, counts)| {
                let qualities: ObjectMap = counts
                    .iter()
                    .map(|(quality, count)| (quality.clone(), Value::from(*count)))
                    .collect();
                (name.clone(), Value::Object(qualities))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_number_is_legacy() {
        let parsed = StoredCounts::parse("wood", &json!(5)).unwrap();
        assert_eq!(parsed, StoredCounts::Legacy(5));
        assert_eq!(parsed.into_qualities().get("normal"), Some(&5));
    }

    #[test]
    fn record_is_qualities() {
        let parsed = StoredCounts::parse("plate", &json!({"normal": 2, "rare": -1})).unwrap();
        let counts = parsed.into_qualities();
        assert_eq!(counts.get("normal"), Some(&2));
        assert_eq!(counts.get("rare"), Some(&-1));
    }

    #[test]
    fn record_keeps_quality_order() {
        let parsed = StoredCounts::parse("plate", &json!({"rare": 1, "epic": 2, "normal": 3})).unwrap();
        let binding = parsed.into_qualities();
        let qualities: Vec<&str> = binding.keys().map(String::as_str).collect();
        assert_eq!(qualities, ["rare", "epic", "normal"]);
    }

    #[test]
    fn integral_float_is_accepted() {
        let parsed = StoredCounts::parse("wood", &json!(5.0)).unwrap();
        assert_eq!(parsed, StoredCounts::Legacy(5));
    }

    #[test]
    fn fractional_count_is_rejected() {
        let err = StoredCounts::parse("wood", &json!({"normal": 1.5})).unwrap_err();
        assert!(matches!(
            err,
            ItemError::InvalidCount { ref item, ref quality, .. } if item == "wood" && quality == "normal"
        ));
    }

    #[test]
    fn non_numeric_count_is_rejected() {
        let err = StoredCounts::parse("wood", &json!({"normal": "5"})).unwrap_err();
        assert!(matches!(err, ItemError::InvalidCount { .. }));
        assert!(err.to_string().contains("\"5\""));
    }

    #[test]
    fn other_shapes_are_invalid_entries() {
        for value in [json!("5"), json!(null), json!([1]), json!(true)] {
            let err = StoredCounts::parse("wood", &value).unwrap_err();
            assert!(matches!(err, ItemError::InvalidEntry { .. }), "value {value}");
        }
    }

    #[test]
    fn snapshot_object_map_shape() {
        let snapshot = ItemSnapshot::new(IndexMap::from([(
            "gear".to_string(),
            QualityCounts::from([("normal".to_string(), 3)]),
        )]));
        assert_eq!(
            Value::Object(snapshot.to_object_map()),
            json!({"gear": {"normal": 3}})
        );
        assert_eq!(serde_json::to_value(&snapshot).unwrap(), json!({"gear": {"normal": 3}}));
    }
}
