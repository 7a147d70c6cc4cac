//! Raw run records and key tuples

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt::Write as _;

/// One raw run outcome: a JSON object keyed by column name.
///
/// Accessors are total: a missing column, a wrong type, or a broken nested
/// path never panics, it yields `None`, `false` or NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunRecord(Map<String, Value>);

impl RunRecord {
    /// Wrap an existing JSON object
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a record from a JSON value, `None` if it is not an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Top-level column value
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Dotted access into nested records, e.g. `time.wall`
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Numeric value at `path`, NaN when missing or non-numeric
    pub fn number_at(&self, path: &str) -> f64 {
        self.get_path(path)
            .and_then(Value::as_f64)
            .unwrap_or(f64::NAN)
    }

    /// Boolean column, false when missing or non-boolean
    pub fn flag(&self, column: &str) -> bool {
        self.get(column).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Canonical textual rendering of a key column; `None` for null/missing
    pub fn key_value(&self, column: &str) -> Option<String> {
        match self.get(column)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Key tuple for `columns`, `None` if any component is null/missing
    pub fn key_tuple(&self, columns: &[String]) -> Option<KeyTuple> {
        columns
            .iter()
            .map(|c| self.key_value(c))
            .collect::<Option<Vec<_>>>()
            .map(KeyTuple)
    }

    /// Column names present on this row
    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl From<Map<String, Value>> for RunRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Ordered tuple of rendered key values, displayed as `(v1, v2, ...)`.
///
/// Commas and backslashes inside a value are escaped with a backslash, so
/// distinct tuples never share a label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyTuple(pub Vec<String>);

impl KeyTuple {
    /// First component, used to count distinct problems
    pub fn head(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Canonical label, same as `Display`; identifies a combo in reports
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for KeyTuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('(')?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            for ch in value.chars() {
                if matches!(ch, ',' | '\\') {
                    f.write_char('\\')?;
                }
                f.write_char(ch)?;
            }
        }
        f.write_char(')')
    }
}

impl Serialize for KeyTuple {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
