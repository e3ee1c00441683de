//! Free-form attributes carried alongside graph records.
//!
//! `info` on variants and call sets, and `evidence` on calls, are bags of
//! string keys each holding an ordered list of string values. The graph
//! algorithms never look inside them.

use std::collections::btree_map::{self, BTreeMap};
use std::iter::FromIterator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered-key attribute container.
///
/// ```
/// use bio_vargraph::attributes::Attributes;
///
/// let mut info = Attributes::new();
/// info.push("source", "dbSNP");
/// info.push("source", "ClinVar");
/// assert_eq!(info.first("source"), Some("dbSNP"));
/// assert_eq!(info.get("source").map(|v| v.len()), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Attributes {
    entries: BTreeMap<String, Vec<String>>,
}

impl Attributes {
    pub fn new() -> Self {
        Attributes {
            entries: BTreeMap::new(),
        }
    }

    /// Set all values of `key`, returning the values it replaced.
    pub fn insert<K, I, V>(&mut self, key: K, values: I) -> Option<Vec<String>>
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.entries
            .insert(key.into(), values.into_iter().map(Into::into).collect())
    }

    /// Append one value to `key`.
    pub fn push<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.entries
            .entry(key.into())
            .or_insert_with(Vec::new)
            .push(value.into());
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// First value stored under `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.entries.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.push(k, v);
        }
        attrs
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
