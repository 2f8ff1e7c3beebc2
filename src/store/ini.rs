//! INI reader and writer
//!
//! Reads `[section]` headers, `key = value` / `key: value` pairs, full-line
//! `#`/`;` comments and indented continuation lines, including blank lines
//! inside a multi-line value. Option names are case-insensitive and are stored
//! lower-cased. Writes `key = value` with a blank line after every section and
//! multi-line values as tab-indented continuations.

use std::io::Write;
use std::path::Path;

use super::{PersistedStore, Section};
use crate::error::{Result, SkeletonizeError};

/// Parse INI text into a store. `origin` is only used in error messages.
pub fn parse(text: &str, origin: &Path) -> Result<PersistedStore> {
    let mut store = PersistedStore::new();
    let mut current: Option<(String, Section)> = None;
    let mut last_key: Option<String> = None;
    // Blank lines seen inside a multi-line value, kept only if it continues
    let mut pending_blanks = 0usize;

    let error = |line: usize, message: String| SkeletonizeError::Parse {
        path: origin.to_path_buf(),
        line,
        message,
    };

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end_matches('\r');
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if last_key.is_some() {
                pending_blanks += 1;
            }
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            last_key = None;
            pending_blanks = 0;
            continue;
        }

        let indented = line.starts_with(char::is_whitespace);
        if indented {
            if let (Some((_, section)), Some(key)) = (current.as_mut(), last_key.as_ref()) {
                if let Some(value) = section.get_mut(key) {
                    for _ in 0..pending_blanks {
                        value.push('\n');
                    }
                    pending_blanks = 0;
                    value.push('\n');
                    value.push_str(trimmed);
                    continue;
                }
            }
        }
        pending_blanks = 0;

        if trimmed.starts_with('[') {
            // Anything after the closing bracket is ignored
            let Some(close) = trimmed.rfind(']') else {
                return Err(error(line_no, format!("unterminated section header {trimmed:?}")));
            };
            let name = trimmed[1..close].trim();
            if name.is_empty() {
                return Err(error(line_no, "empty section name".to_string()));
            }
            if store.contains_section(name) || current.as_ref().is_some_and(|(n, _)| n == name) {
                return Err(error(line_no, format!("section {name:?} already exists")));
            }
            if let Some((done, section)) = current.take() {
                store.insert_section(done, section);
            }
            current = Some((name.to_string(), Section::new()));
            last_key = None;
            continue;
        }

        let Some((section_name, section)) = current.as_mut() else {
            return Err(error(
                line_no,
                format!("key {trimmed:?} found before any section header"),
            ));
        };

        let (key, value) = match trimmed.find(['=', ':']) {
            Some(at) => (trimmed[..at].trim(), trimmed[at + 1..].trim()),
            None => (trimmed, ""),
        };
        if key.is_empty() {
            return Err(error(line_no, "empty option name".to_string()));
        }
        let key = key.to_lowercase();
        if section.contains_key(&key) {
            return Err(error(
                line_no,
                format!("option {key:?} in section {section_name:?} already exists"),
            ));
        }
        section.insert(key.clone(), value.to_string());
        last_key = Some(key);
    }

    if let Some((name, section)) = current {
        store.insert_section(name, section);
    }
    Ok(store)
}

/// Write the store as INI text
pub fn write<W: Write>(store: &PersistedStore, out: &mut W) -> std::io::Result<()> {
    for (name, section) in store.iter() {
        writeln!(out, "[{name}]")?;
        for (key, value) in section {
            let value = value.replace('\n', "\n\t");
            if value.starts_with('\n') {
                writeln!(out, "{key} ={value}")?;
            } else {
                writeln!(out, "{key} = {value}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
