//! In-memory representation of the on-disk INI settings file
//!
//! Sections and keys keep the order they were read in, so that a store which
//! is loaded and written back without changes round-trips untouched entries.

use indexmap::IndexMap;
use std::path::Path;

use crate::error::{Result, SkeletonizeError};

mod ini;

pub use ini::{parse, write};

/// Section holding fallback values; never treated as a regular section
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Ordered key -> value mapping of one section
pub type Section = IndexMap<String, String>;

/// Ordered section -> (ordered key -> value) mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedStore {
    sections: IndexMap<String, Section>,
}

impl PersistedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from `path`, or an empty one if the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No existing store at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let text = std::fs::read_to_string(path).map_err(|source| SkeletonizeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = parse(&text, path)?;
        tracing::debug!(
            "Loaded {} section(s) from {}",
            store.sections.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|keys| keys.get(key))
            .map(String::as_str)
    }

    /// Section names in file order, excluding the DEFAULT section
    pub fn section_names(&self) -> impl Iterator<Item = &String> {
        self.sections
            .keys()
            .filter(|name| name.as_str() != DEFAULT_SECTION)
    }

    /// All sections in file order, DEFAULT included
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Section)> {
        self.sections.iter()
    }

    /// Get a section for modification, creating it at the end if missing
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        self.sections.entry(name.to_string()).or_default()
    }

    /// Insert a key, keeping its position if it already exists
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.section_mut(section).insert(key.to_string(), value.into());
    }

    /// Remove a whole section, preserving the order of the rest
    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.sections.shift_remove(name)
    }

    /// Remove one key, preserving the order of the rest
    pub fn remove_key(&mut self, section: &str, key: &str) -> Option<String> {
        self.sections
            .get_mut(section)
            .and_then(|keys| keys.shift_remove(key))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Serialize to INI text
    pub fn to_ini_string(&self) -> String {
        let mut buf = Vec::new();
        let _ = write(self, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub(crate) fn insert_section(&mut self, name: String, section: Section) {
        self.sections.insert(name, section);
    }
}
