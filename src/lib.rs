//! # Skeletonize - keep local settings files in step with the code that reads them
//!
//! Skeletonize reads a settings module, intercepts every INI lookup it makes
//! (`config.get('section', 'key')`, `getboolean`, `getint`, `getfloat`) and
//! then brings a local INI file up to date:
//!
//! - **Discovery**: accessor calls are evaluated against a recording
//!   [`ConfigReader`](interceptor::ConfigReader) that returns placeholder values
//! - **Reconciliation**: missing sections and keys are added with empty values,
//!   existing values are never touched, stale entries are optionally pruned
//! - **Safe writes**: an existing INI file is only replaced when asked to
//!
//! ## Quick Start
//!
//! ```bash
//! # Create local.settings.ini with every key settings.py reads
//! skeletonize settings.py
//!
//! # Add new keys to an existing file and drop ones no longer read
//! skeletonize settings.py -i dev.ini --overwrite --remove_missing
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod persist;
pub mod reconcile;
pub mod schema;
pub mod store;

pub use cli::{Cli, Output};
pub use config::Settings;
pub use error::SkeletonizeError;
pub use interceptor::{ConfigReader, RecordingReader, ValueType, find_configuration};
pub use persist::save_config;
pub use reconcile::{ReconcileReport, reconcile, update_config};
pub use schema::DiscoveredSchema;
pub use store::PersistedStore;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
