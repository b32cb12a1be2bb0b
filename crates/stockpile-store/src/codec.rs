//! Pure conversion between in-memory maps and their two JSON file shapes.
//!
//! - Object mode: a top-level JSON object, one property per key.
//! - Array mode: a top-level JSON array of objects, each keyed by its own
//!   `id` property.
//!
//! Both shapes are written pretty-printed in insertion order so that files
//! stay readable and diff cleanly. Nothing here touches the filesystem.

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Number, Value};

use crate::error::FormatError;

/// Name of the identity property used by array-mode files.
pub const ID_FIELD: &str = "id";

/// Object-mode map: string keys to arbitrary JSON values, insertion ordered.
pub type ObjectMap = Map<String, Value>;

// ---------------------------------------------------------------------------
// RecordKey
// ---------------------------------------------------------------------------

/// Key of an array-mode record: the value of its `id` property.
///
/// Any JSON value may serve as an id. Numbers compare by numeric value, so
/// `1` and `1.0` name the same record; everything else compares as JSON.
#[derive(Clone, Debug)]
pub struct RecordKey(Value);

impl RecordKey {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// A number reduced to the form used for key comparison.
#[derive(Clone, Copy, PartialEq)]
enum NumericKey {
    Integer(i128),
    Float(f64),
}

impl NumericKey {
    fn of(n: &Number) -> Self {
        if let Some(i) = n.as_i64() {
            return Self::Integer(i128::from(i));
        }
        if let Some(u) = n.as_u64() {
            return Self::Integer(i128::from(u));
        }
        match n.as_f64() {
            // Exact within the i64/u64 range; covers -0.0 as well.
            Some(f) if f.fract() == 0.0 && f >= -(2f64.powi(63)) && f < 2f64.powi(64) => {
                Self::Integer(f as i128)
            }
            Some(f) => Self::Float(f),
            None => Self::Float(f64::NAN),
        }
    }
}

fn key_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => NumericKey::of(x) == NumericKey::of(y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| key_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| key_eq(x, y)))
        }
        _ => a == b,
    }
}

impl PartialEq for RecordKey {
    fn eq(&self, other: &Self) -> bool {
        key_eq(&self.0, &other.0)
    }
}

impl Eq for RecordKey {}

impl Hash for RecordKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::Number(n) => {
                2u8.hash(state);
                // Non-integral floats only hash their tag.
                if let NumericKey::Integer(i) = NumericKey::of(n) {
                    i.hash(state);
                }
            }
            Value::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Value::Array(items) => {
                4u8.hash(state);
                items.len().hash(state);
            }
            Value::Object(fields) => {
                5u8.hash(state);
                fields.len().hash(state);
            }
        }
    }
}

impl From<Value> for RecordKey {
    fn from(id: Value) -> Self {
        Self(id)
    }
}

impl From<&str> for RecordKey {
    fn from(id: &str) -> Self {
        Self(Value::String(id.to_string()))
    }
}

impl From<i64> for RecordKey {
    fn from(id: i64) -> Self {
        Self(Value::from(id))
    }
}

// ---------------------------------------------------------------------------
// RecordMap
// ---------------------------------------------------------------------------

/// Array-mode map: record id to record, insertion ordered.
///
/// Re-inserting an existing key replaces the value but keeps the key's
/// first position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordMap {
    records: IndexMap<RecordKey, Value>,
}

impl RecordMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<RecordKey>, value: Value) -> Option<Value> {
        self.records.insert(key.into(), value)
    }

    /// Look up a record by id.
    pub fn get(&self, key: impl Into<RecordKey>) -> Option<&Value> {
        self.records.get(&key.into())
    }

    pub fn contains_key(&self, key: impl Into<RecordKey>) -> bool {
        self.records.contains_key(&key.into())
    }

    /// Remove a record by id, preserving the order of the rest.
    pub fn remove(&mut self, key: impl Into<RecordKey>) -> Option<Value> {
        self.records.shift_remove(&key.into())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate `(id, record)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.records.iter().map(|(k, v)| (k.as_value(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.records.keys().map(RecordKey::as_value)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.records.values()
    }
}

impl<K: Into<RecordKey>> FromIterator<(K, Value)> for RecordMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Parse object-mode file content.
pub fn decode_object_map(bytes: &[u8]) -> Result<ObjectMap, FormatError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(map) => Ok(map),
        _ => Err(FormatError::ExpectedObject),
    }
}

/// Parse array-mode file content.
///
/// Later elements with a duplicate `id` overwrite earlier ones.
pub fn decode_array_map(bytes: &[u8]) -> Result<RecordMap, FormatError> {
    let Value::Array(elements) = serde_json::from_slice::<Value>(bytes)? else {
        return Err(FormatError::ExpectedArray);
    };

    let mut map = RecordMap::new();
    for (index, element) in elements.into_iter().enumerate() {
        let Some(fields) = element.as_object() else {
            return Err(FormatError::ExpectedObjectElements { index });
        };
        let Some(id) = fields.get(ID_FIELD) else {
            return Err(FormatError::MissingId { index });
        };
        let id = id.clone();
        map.insert(id, element);
    }
    Ok(map)
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Render object-mode file content.
pub fn encode_object_map(map: &ObjectMap, indent: &str) -> Result<Vec<u8>, serde_json::Error> {
    to_pretty_vec(map, indent)
}

/// Render array-mode file content from the map's values.
///
/// Keys are not written; each value is expected to carry its own `id`.
pub fn encode_array_map(map: &RecordMap, indent: &str) -> Result<Vec<u8>, serde_json::Error> {
    let values: Vec<&Value> = map.values().collect();
    to_pretty_vec(&values, indent)
}

fn to_pretty_vec<T: Serialize + ?Sized>(
    value: &T,
    indent: &str,
) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}
