//! Configuration-read interception
//!
//! A settings module is evaluated against a [`ConfigReader`]. In analysis mode
//! the reader is a [`RecordingReader`], which notes every (section, key) pair
//! requested and hands back a dummy value that survives the module's own type
//! coercion. What the recorder saw becomes the [`DiscoveredSchema`].

use serde::Serialize;
use std::path::Path;

use crate::config::InterceptorSettings;
use crate::error::{Result, SkeletonizeError};
use crate::schema::{self, DiscoveredSchema};

pub mod source;

pub use source::{AccessCall, Accessor, SourceFile};

/// Target type of a typed accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Boolean,
    Integer,
    Float,
}

/// The narrow configuration-reading seam a settings module is evaluated against
pub trait ConfigReader {
    /// Untyped `get(section, key)`
    fn get(&mut self, section: &str, key: &str) -> String;

    /// Typed `getboolean`/`getint`/`getfloat`, returning the raw string to coerce
    fn get_typed(&mut self, section: &str, key: &str, value_type: ValueType) -> String;
}

/// Records every read and returns placeholder values
#[derive(Debug, Default)]
pub struct RecordingReader {
    untyped: DiscoveredSchema,
    typed: DiscoveredSchema,
}

impl RecordingReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn untyped(&self) -> &DiscoveredSchema {
        &self.untyped
    }

    pub fn typed(&self) -> &DiscoveredSchema {
        &self.typed
    }

    /// Combine both record sets into a single schema
    pub fn into_schema(self) -> DiscoveredSchema {
        schema::merge(self.untyped, self.typed)
    }
}

impl ConfigReader for RecordingReader {
    fn get(&mut self, section: &str, key: &str) -> String {
        self.untyped.insert(section, key.to_lowercase());
        "false".to_string()
    }

    fn get_typed(&mut self, section: &str, key: &str, value_type: ValueType) -> String {
        self.typed.insert(section, key.to_lowercase());
        match value_type {
            ValueType::Boolean => "false",
            ValueType::Integer => "1",
            ValueType::Float => "0.1",
        }
        .to_string()
    }
}

/// One read the settings module performed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRecord {
    pub section: String,
    pub key: String,
    pub value_type: Option<ValueType>,
    pub line: usize,
}

/// Evaluate a loaded settings module against `reader`.
///
/// Receivers are the names bound to a config-parser constructor in the source,
/// or the configured fallbacks when there are none, plus any extra receivers.
pub fn evaluate<R: ConfigReader>(
    source: &SourceFile,
    settings: &InterceptorSettings,
    reader: &mut R,
) -> Result<Vec<AccessRecord>> {
    let mut receivers = source.parser_bindings();
    if receivers.is_empty() {
        tracing::debug!(
            "No config parser bindings found, using fallback receivers {:?}",
            settings.fallback_receivers
        );
        receivers = settings.fallback_receivers.clone();
    }
    receivers.extend(settings.extra_receivers.iter().cloned());

    let mut records = Vec::new();
    for call in source.access_calls(&receivers)? {
        let (Some(section), Some(key)) = (call.section, call.key) else {
            tracing::warn!(
                "{}:{}: skipping {}.{:?} call with non-literal section or key",
                source.path().display(),
                call.line,
                call.receiver,
                call.accessor
            );
            continue;
        };

        let (value, value_type) = match call.accessor {
            Accessor::Get => (reader.get(&section, &key), None),
            Accessor::Typed(value_type) => {
                (reader.get_typed(&section, &key, value_type), Some(value_type))
            }
        };

        if let Some(value_type) = value_type {
            coerce(&value, value_type).map_err(|message| SkeletonizeError::Execution {
                path: source.path().to_path_buf(),
                line: call.line,
                message,
            })?;
        }

        tracing::trace!("[{}] {} read at line {}", section, key, call.line);
        records.push(AccessRecord {
            key: key.to_lowercase(),
            section,
            value_type,
            line: call.line,
        });
    }
    Ok(records)
}

/// Load `source_file` and return the schema of everything it reads
pub fn find_configuration<P: AsRef<Path>>(
    source_file: P,
    settings: &InterceptorSettings,
) -> Result<DiscoveredSchema> {
    let source = SourceFile::load(source_file)?;
    let mut reader = RecordingReader::new();
    let records = evaluate(&source, settings, &mut reader)?;
    tracing::debug!(
        "Intercepted {} read(s) in {}",
        records.len(),
        source.path().display()
    );
    Ok(reader.into_schema())
}

/// Apply the coercion the settings module would perform on a typed read
fn coerce(value: &str, value_type: ValueType) -> std::result::Result<(), String> {
    let ok = match value_type {
        ValueType::Boolean => matches!(
            value.to_lowercase().as_str(),
            "1" | "yes" | "true" | "on" | "0" | "no" | "false" | "off"
        ),
        ValueType::Integer => value.trim().parse::<i64>().is_ok(),
        ValueType::Float => value.trim().parse::<f64>().is_ok(),
    };
    if ok {
        Ok(())
    } else {
        Err(format!("value {value:?} is not a valid {value_type:?}"))
    }
}
