//! Discovered schema and the aggregation of access records into it

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Section name -> set of key names a settings module was observed to read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiscoveredSchema {
    sections: BTreeMap<String, BTreeSet<String>>,
}

impl DiscoveredSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single (section, key) pair
    pub fn insert(&mut self, section: impl Into<String>, key: impl Into<String>) {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(key.into());
    }

    pub fn contains_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn keys(&self, section: &str) -> Option<&BTreeSet<String>> {
        self.sections.get(section)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.sections.iter()
    }

    pub fn section_names(&self) -> impl Iterator<Item = &String> {
        self.sections.keys()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of distinct (section, key) pairs
    pub fn key_count(&self) -> usize {
        self.sections.values().map(BTreeSet::len).sum()
    }

    /// Union another schema into this one
    pub fn extend(&mut self, other: DiscoveredSchema) {
        for (section, keys) in other.sections {
            self.sections.entry(section).or_default().extend(keys);
        }
    }
}

impl<S, K> FromIterator<(S, K)> for DiscoveredSchema
where
    S: Into<String>,
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, K)>>(iter: I) -> Self {
        let mut schema = Self::new();
        for (section, key) in iter {
            schema.insert(section, key);
        }
        schema
    }
}

/// Combine untyped and typed access records into one schema.
///
/// Sections present in both are unioned; duplicates collapse.
pub fn merge(untyped: DiscoveredSchema, typed: DiscoveredSchema) -> DiscoveredSchema {
    let mut merged = untyped;
    merged.extend(typed);
    tracing::debug!(
        "Config sections found {:?}",
        merged.section_names().collect::<Vec<_>>()
    );
    merged
}
