//! Reconciliation of a discovered schema against the persisted store

use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::schema::DiscoveredSchema;
use crate::store::PersistedStore;

/// What a reconciliation changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub added_sections: Vec<String>,
    pub added_keys: Vec<(String, String)>,
    /// Store sections the schema no longer mentions, removed or not
    pub stale_sections: Vec<String>,
    pub removed_sections: Vec<String>,
    pub removed_keys: Vec<(String, String)>,
}

impl ReconcileReport {
    pub fn is_unchanged(&self) -> bool {
        self.added_sections.is_empty()
            && self.added_keys.is_empty()
            && self.removed_sections.is_empty()
            && self.removed_keys.is_empty()
    }
}

/// Bring `store` in line with `schema`.
///
/// Keys the schema mentions are added with an empty value when missing and
/// left alone when present. With `remove_missing`, sections and keys the
/// schema does not mention are dropped.
pub fn reconcile(
    schema: &DiscoveredSchema,
    mut store: PersistedStore,
    remove_missing: bool,
) -> (PersistedStore, ReconcileReport) {
    let mut report = ReconcileReport::default();

    let current: Vec<String> = store.section_names().cloned().collect();

    report.stale_sections = current
        .iter()
        .filter(|name| !schema.contains_section(name))
        .cloned()
        .collect();
    if remove_missing {
        for section in &report.stale_sections {
            tracing::debug!("Removing section [{}]", section);
            store.remove_section(section);
        }
        report.removed_sections = report.stale_sections.clone();
    }

    for section in current.iter().filter(|name| schema.contains_section(name)) {
        let wanted = schema.keys(section).cloned().unwrap_or_default();

        if remove_missing {
            let existing: Vec<String> = store
                .section(section)
                .map(|keys| keys.keys().cloned().collect())
                .unwrap_or_default();
            for key in existing.into_iter().filter(|key| !wanted.contains(key)) {
                tracing::debug!("Removing section [{}] name \"{}\"", section, key);
                store.remove_key(section, &key);
                report.removed_keys.push((section.clone(), key));
            }
        }

        let keys = store.section_mut(section);
        for key in wanted {
            if !keys.contains_key(&key) {
                tracing::debug!("Adding section [{}] name \"{}\"", section, key);
                keys.insert(key.clone(), String::new());
                report.added_keys.push((section.clone(), key));
            }
        }
    }

    for (section, wanted) in schema.sections() {
        if current.contains(section) {
            continue;
        }
        // DEFAULT is not listed in `current` but may already exist
        let is_new = !store.contains_section(section);
        if is_new {
            tracing::debug!("Adding section [{}]", section);
        }
        let keys = store.section_mut(section);
        for key in wanted {
            if !keys.contains_key(key) {
                tracing::debug!("Adding section [{}] name \"{}\"", section, key);
                keys.insert(key.clone(), String::new());
                report.added_keys.push((section.clone(), key.clone()));
            }
        }
        if is_new {
            report.added_sections.push(section.clone());
        }
    }

    (store, report)
}

/// Load the store at `ini_file` (empty if absent) and reconcile it
pub fn update_config<P: AsRef<Path>>(
    schema: &DiscoveredSchema,
    ini_file: P,
    remove_missing: bool,
) -> Result<(PersistedStore, ReconcileReport)> {
    let store = PersistedStore::load(ini_file)?;
    Ok(reconcile(schema, store, remove_missing))
}
