//! Configuration value model and path lookup.
//!
//! A merged configuration is a tree of [`ConfigValue`]s: scalars, ordered
//! string lists (from `name[]` params), and nested groups. Groups preserve
//! insertion order so the legacy top-level reordering applied after a load
//! (see [`crate::config::merge`]) is observable through iteration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A named, nested mapping of configuration keys.
pub type Group = IndexMap<String, ConfigValue>;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Plain string value from a `Param` element.
    Scalar(String),
    /// Ordered values aggregated from `name[]` params, in document order.
    List(Vec<String>),
    /// Nested mapping from a `Group` element.
    Group(Group),
}

impl ConfigValue {
    /// The scalar content, if this value is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The list content, if this value is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// The group content, if this value is a group.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            ConfigValue::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Total order over values used by the legacy top-level sort.
    ///
    /// Compound values rank above scalars (`Group > List > Scalar`); values
    /// of the same shape compare lexicographically by content, groups as
    /// their key/value pair sequences. Configuration lookups are key-based,
    /// so this order only affects iteration and dump output.
    pub fn legacy_cmp(&self, other: &ConfigValue) -> Ordering {
        fn rank(value: &ConfigValue) -> u8 {
            match value {
                ConfigValue::Scalar(_) => 0,
                ConfigValue::List(_) => 1,
                ConfigValue::Group(_) => 2,
            }
        }

        match (self, other) {
            (ConfigValue::Scalar(a), ConfigValue::Scalar(b)) => a.cmp(b),
            (ConfigValue::List(a), ConfigValue::List(b)) => a.cmp(b),
            (ConfigValue::Group(a), ConfigValue::Group(b)) => {
                for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
                    let by_key = ka.cmp(kb);
                    if by_key != Ordering::Equal {
                        return by_key;
                    }
                    let by_value = va.legacy_cmp(vb);
                    if by_value != Ordering::Equal {
                        return by_value;
                    }
                }
                a.len().cmp(&b.len())
            }
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Scalar(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Scalar(value.to_string())
    }
}

/// The merged configuration tree produced by a load.
///
/// Immutable once built: only lookup-style accessors are public. Serializes
/// as the bare root mapping, so the cache blob is a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigTree {
    root: Group,
}

impl ConfigTree {
    pub(crate) fn new(root: Group) -> Self {
        Self { root }
    }

    /// Look up a value by slash-delimited path.
    ///
    /// Splits `path` on `/` and descends through groups key by key. Returns
    /// `None` as soon as a key is missing or an intermediate value is not a
    /// group. Empty segments (leading/trailing slash) are looked up as
    /// literal keys, not skipped.
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        let mut scope = Some(&self.root);
        let mut current = None;
        for key in path.split('/') {
            let value = scope?.get(key)?;
            scope = value.as_group();
            current = Some(value);
        }
        current
    }

    /// Look up a path expecting a scalar.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    /// Look up a path expecting a list.
    pub fn get_list(&self, path: &str) -> Option<&[String]> {
        self.get(path)?.as_list()
    }

    /// Top-level entries in their stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.root.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Whether the tree has no top-level entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}
