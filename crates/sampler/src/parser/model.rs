use std::collections::HashMap;
use bytes::Bytes;
use serde::{Serialize, Deserialize};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// `key<TAB>value` lines (mysql -B / --batch output)
    Batch,
    /// Bordered text table with `|`-delimited columns (interactive client output)
    Tabular,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Batch => "batch",
            Layout::Tabular => "tabular",
        }
    }
}

/// One snapshot's unparsed block, sliced out of the segmenter buffer.
///
/// The marker line that terminated the record is not part of `bytes`.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub layout: Layout,
    pub bytes: Bytes,
}

impl RawRecord {
    pub fn new(layout: Layout, bytes: Bytes) -> Self {
        Self { layout, bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A parsed status snapshot: lowercase variable name → raw value.
///
/// Values are kept as text; interpreting them (counters, gauges, strings)
/// is left to whoever consumes the sample.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample {
    fields: HashMap<String, String>,
}

impl Sample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, lowercasing the key. A repeated key overwrites
    /// the previous value.
    pub fn insert(&mut self, key: &str, value: String) {
        self.fields.insert(key.to_lowercase(), value);
    }

    /// Look up a field. Keys are stored lowercase, so `key` is matched
    /// case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(v) => Some(v.as_str()),
            None => self.fields.get(&key.to_lowercase()).map(String::as_str),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.fields
    }
}

/// Parser output for one record.
#[derive(Debug, Clone, Default)]
pub struct ParsedRecord {
    pub sample: Sample,
    /// Lines skipped because they didn't fit the layout
    pub discarded_lines: usize,
}
