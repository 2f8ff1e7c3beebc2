//! Tool settings for skeletonize
//!
//! Settings are layered with figment: embedded defaults, then the repository
//! `skeletonize.toml` (or a custom file), then `SKELETONIZE_` environment
//! variables.

use serde::{Deserialize, Serialize};

mod core;

pub use self::core::SettingsLoader;

/// Fully resolved tool settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub interceptor: InterceptorSettings,

    #[serde(default)]
    pub store: StoreSettings,
}

/// How accessor calls are attributed to config-parser objects
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterceptorSettings {
    /// Receivers used when the source binds no config parser itself
    #[serde(default = "default_fallback_receivers")]
    pub fallback_receivers: Vec<String>,

    /// Receivers always treated as config parsers
    #[serde(default)]
    pub extra_receivers: Vec<String>,
}

fn default_fallback_receivers() -> Vec<String> {
    vec!["config".to_string()]
}

impl Default for InterceptorSettings {
    fn default() -> Self {
        Self {
            fallback_receivers: default_fallback_receivers(),
            extra_receivers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    /// Target INI file when none is given on the command line
    #[serde(default = "default_ini_file")]
    pub default_ini_file: String,
}

fn default_ini_file() -> String {
    "local.settings.ini".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            default_ini_file: default_ini_file(),
        }
    }
}
