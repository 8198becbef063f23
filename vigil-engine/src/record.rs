//! Record and field value types the engine evaluates.
//!
//! A [`DataRecord`] is a snapshot of one dataset record: a map from field
//! name to a scalar value or a homogeneous collection. Records are immutable
//! for the duration of an evaluation call, which makes evaluating many
//! records concurrently safe without locks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The runtime data types a field value can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Boolean scalar
    Boolean,
    /// Floating-point number
    Number,
    /// UTF-8 string
    Text,
    /// UTC timestamp
    Timestamp,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Boolean => "boolean",
            DataType::Number => "number",
            DataType::Text => "text",
            DataType::Timestamp => "timestamp",
        };
        write!(f, "{name}")
    }
}

/// A single field value within a record.
///
/// Values are either scalars or homogeneous collections of numbers, strings,
/// or timestamps. Collections are what the statistical anomaly detectors
/// operate on; scalars are what most rules validate.
///
/// # Examples
///
/// ```rust
/// use vigil_engine::record::FieldValue;
///
/// let value = FieldValue::Number(42.5);
/// assert_eq!(value.as_number(), Some(42.5));
/// assert!(!value.is_null());
///
/// let list = FieldValue::Numbers(vec![1.0, 2.0, 3.0]);
/// assert_eq!(list.len(), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum FieldValue {
    /// An absent or null value.
    Null,

    /// A boolean scalar.
    Boolean(bool),

    /// A numeric scalar.
    Number(f64),

    /// A string scalar.
    Text(String),

    /// A timestamp scalar.
    Timestamp(DateTime<Utc>),

    /// A homogeneous collection of numbers.
    Numbers(Vec<f64>),

    /// A homogeneous collection of strings.
    Texts(Vec<String>),

    /// A homogeneous collection of timestamps.
    Timestamps(Vec<DateTime<Utc>>),
}

impl FieldValue {
    /// Returns true if the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns true if the value is missing for completeness purposes:
    /// null, a string that is empty after trimming, or an empty collection.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Numbers(v) => v.is_empty(),
            FieldValue::Texts(v) => v.is_empty(),
            FieldValue::Timestamps(v) => v.is_empty(),
            _ => false,
        }
    }

    /// Attempts to get the value as a numeric scalar.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to get the value as a string scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get the value as a timestamp scalar.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Returns the collection length, or `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match self {
            FieldValue::Numbers(v) => Some(v.len()),
            FieldValue::Texts(v) => Some(v.len()),
            FieldValue::Timestamps(v) => Some(v.len()),
            _ => None,
        }
    }

    /// Returns true if the value is an empty collection.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Returns the runtime data type of the value.
    ///
    /// Collections report the type of their elements; `Null` has no type.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            FieldValue::Null => None,
            FieldValue::Boolean(_) => Some(DataType::Boolean),
            FieldValue::Number(_) | FieldValue::Numbers(_) => Some(DataType::Number),
            FieldValue::Text(_) | FieldValue::Texts(_) => Some(DataType::Text),
            FieldValue::Timestamp(_) | FieldValue::Timestamps(_) => Some(DataType::Timestamp),
        }
    }

    /// Returns a canonical string rendering of the value.
    ///
    /// Whole numbers render without a fractional part so that stringified
    /// comparisons against reference data and allowed-value sets behave
    /// predictably.
    pub fn to_string_pretty(&self) -> String {
        match self {
            FieldValue::Null => "null".to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Number(v) => format_number(*v),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Timestamp(ts) => ts.to_rfc3339(),
            FieldValue::Numbers(v) => format!("[{} numbers]", v.len()),
            FieldValue::Texts(v) => format!("[{} strings]", v.len()),
            FieldValue::Timestamps(v) => format!("[{} timestamps]", v.len()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_pretty())
    }
}

/// Renders a number without a trailing `.0` when it is whole.
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{v:.0}")
    } else {
        v.to_string()
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<Vec<f64>> for FieldValue {
    fn from(value: Vec<f64>) -> Self {
        FieldValue::Numbers(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::Texts(value)
    }
}

impl From<Vec<DateTime<Utc>>> for FieldValue {
    fn from(value: Vec<DateTime<Utc>>) -> Self {
        FieldValue::Timestamps(value)
    }
}

/// A dataset record: an ordered map from field name to value.
///
/// Iteration order is the lexicographic field-name order, so detection
/// output is deterministic for a given record regardless of insertion
/// order.
///
/// # Examples
///
/// ```rust
/// use vigil_engine::record::{DataRecord, FieldValue};
///
/// let record = DataRecord::new()
///     .with_field("email", "user@example.com")
///     .with_field("age", 34.0)
///     .with_field("scores", vec![1.0, 2.0, 3.0]);
///
/// assert_eq!(record.len(), 3);
/// assert!(record.get("email").is_some());
/// assert!(record.get("missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl DataRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing any existing value under the same name.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Inserts a field in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns true if the field exists and is neither null nor blank.
    pub fn has_value(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_blank())
    }

    /// Iterates fields in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for DataRecord {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
