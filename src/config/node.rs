//! Nested configuration tree
//!
//! A `ConfigNode` is plain data: a mapping from keys to either a nested
//! section or a typed value. File I/O lives in [`super::store`].

use cfgdict_codec::{split_section_name, NumericArray, Scalar, Value};
use serde::Serialize;
use serde_json::Value as Json;
use std::collections::btree_map;
use std::collections::BTreeMap;
use tracing::warn;

use super::error::ConfigError;

/// One slot of a section: a subsection or a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Section(ConfigNode),
    Value(Value),
}

impl Entry {
    pub fn as_section(&self) -> Option<&ConfigNode> {
        match self {
            Entry::Section(node) => Some(node),
            Entry::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Entry::Value(value) => Some(value),
            Entry::Section(_) => None,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Entry::Section(_))
    }
}

impl From<ConfigNode> for Entry {
    fn from(node: ConfigNode) -> Self {
        Entry::Section(node)
    }
}

macro_rules! entry_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Entry {
                fn from(value: $ty) -> Self {
                    Entry::Value(value.into())
                }
            }
        )*
    };
}

entry_from_value!(Value, Scalar, NumericArray, Vec<Scalar>, i32, i64, f64, &str, String);

/// Nested mapping of sections and values, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigNode {
    entries: BTreeMap<String, Entry>,
}

impl ConfigNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.get_mut(key)
    }

    /// Value stored directly under `key`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.get(key).and_then(Entry::as_value)
    }

    /// Subsection stored directly under `key`.
    pub fn section(&self, key: &str) -> Option<&ConfigNode> {
        self.get(key).and_then(Entry::as_section)
    }

    /// Insert or overwrite, returning the previous entry.
    pub fn insert(&mut self, key: impl Into<String>, entry: impl Into<Entry>) -> Option<Entry> {
        self.entries.insert(key.into(), entry.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Entry> {
        self.entries.iter()
    }

    /// Shallow update: every entry of `other` overwrites the same key here.
    pub fn update(&mut self, other: ConfigNode) {
        self.entries.extend(other.entries);
    }

    /// Subsection under `key`, created when missing.
    ///
    /// A value already stored under `key` is replaced by an empty section.
    pub fn section_mut(&mut self, key: &str) -> &mut ConfigNode {
        let slot = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Section(ConfigNode::new()));
        loop {
            match slot {
                Entry::Section(node) => return node,
                Entry::Value(_) => {
                    warn!(key, "value replaced by a section of the same name");
                    *slot = Entry::Section(ConfigNode::new());
                }
            }
        }
    }

    /// Walk (and create) nested sections along `path`.
    pub fn walk_mut<S: AsRef<str>>(&mut self, path: &[S]) -> &mut ConfigNode {
        path.iter()
            .fold(self, |node, segment| node.section_mut(segment.as_ref()))
    }

    /// Look up an entry by dotted path, e.g. `"detector.calib.gain"`.
    ///
    /// Segments use the same escaping as section headers, so a key holding
    /// a literal dot is addressed as `calib_|_v2`.
    pub fn get_path(&self, path: &str) -> Option<&Entry> {
        let segments = split_section_name(path);
        let (last, parents) = segments.split_last()?;
        let mut node = self;
        for segment in parents {
            node = node.section(segment)?;
        }
        node.get(last)
    }

    pub fn get_value(&self, path: &str) -> Option<&Value> {
        self.get_path(path).and_then(Entry::as_value)
    }

    pub fn get_section(&self, path: &str) -> Option<&ConfigNode> {
        self.get_path(path).and_then(Entry::as_section)
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get_value(path)?.as_scalar()?.as_i64()
    }

    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get_value(path)?.as_scalar()?.as_f64()
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get_value(path)?.as_scalar()?.as_str()
    }

    pub fn get_list(&self, path: &str) -> Option<&[Scalar]> {
        self.get_value(path)?.as_list()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Build a tree from a JSON object.
    ///
    /// Objects become sections, arrays of scalars become lists, arrays
    /// holding arrays become matrices, booleans become the strings `true`
    /// and `false`. `null` and objects inside arrays are rejected.
    pub fn from_json(json: &Json) -> Result<Self, ConfigError> {
        match json {
            Json::Object(map) => Self::from_json_object(map, ""),
            other => Err(ConfigError::UnsupportedJson {
                path: String::new(),
                reason: format!("expected an object, got {}", json_kind(other)),
            }),
        }
    }

    fn from_json_object(
        map: &serde_json::Map<String, Json>,
        parent: &str,
    ) -> Result<Self, ConfigError> {
        let mut node = ConfigNode::new();
        for (key, json) in map {
            let path = if parent.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", parent, key)
            };
            let entry = match json {
                Json::Object(child) => Entry::Section(Self::from_json_object(child, &path)?),
                other => Entry::Value(json_to_value(other, &path)?),
            };
            node.insert(key.clone(), entry);
        }
        Ok(node)
    }
}

impl<'a> IntoIterator for &'a ConfigNode {
    type Item = (&'a String, &'a Entry);
    type IntoIter = btree_map::Iter<'a, String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for ConfigNode {
    type Item = (String, Entry);
    type IntoIter = btree_map::IntoIter<String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, E: Into<Entry>> FromIterator<(K, E)> for ConfigNode {
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, e)| (k.into(), e.into()))
                .collect(),
        }
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

fn json_to_value(json: &Json, path: &str) -> Result<Value, ConfigError> {
    match json {
        Json::Array(items) => {
            if !items.iter().any(Json::is_array) {
                let list = items
                    .iter()
                    .map(|item| json_to_scalar(item, path))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Value::List(list));
            }
            let rows = items
                .iter()
                .map(|item| match item {
                    Json::Array(row) => row.iter().map(|x| json_to_scalar(x, path)).collect(),
                    scalar => json_to_scalar(scalar, path).map(|s| vec![s]),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Matrix(rows))
        }
        scalar => json_to_scalar(scalar, path).map(Value::Scalar),
    }
}

fn json_to_scalar(json: &Json, path: &str) -> Result<Scalar, ConfigError> {
    match json {
        Json::Number(n) => Ok(match n.as_i64() {
            Some(i) => Scalar::Int(i),
            None => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        Json::String(s) => Ok(Scalar::Str(s.clone())),
        Json::Bool(b) => Ok(Scalar::Str(b.to_string())),
        other => Err(ConfigError::UnsupportedJson {
            path: path.to_string(),
            reason: format!("{} cannot be stored as a scalar", json_kind(other)),
        }),
    }
}
