use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};

use super::Settings;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Repository-level settings file picked up from the working directory
const REPO_CONFIG: &str = "skeletonize.toml";

pub struct SettingsLoader {
    figment: Figment,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::with_custom_config(None)
    }

    pub fn with_custom_config(custom_config: Option<&str>) -> Self {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        figment = match custom_config {
            Some(custom_path) => figment.merge(Toml::file(custom_path)),
            None => figment.merge(Toml::file(REPO_CONFIG)),
        };

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("SKELETONIZE_").split("__"));

        Self { figment }
    }

    /// Extract the merged settings
    pub fn load(&self) -> Result<Settings> {
        tracing::trace!("CONFIG LOAD: extracting settings");
        self.figment
            .extract()
            .context("Failed to load skeletonize settings")
    }

    /// Get a nested value as JSON, e.g. `store.default_ini_file`
    pub fn get_section(&self, path: &str) -> Result<serde_json::Value> {
        Ok(self.figment.extract_inner(path)?)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InterceptorSettings, StoreSettings};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_load() {
        let settings = SettingsLoader::with_custom_config(Some("non_existent.toml"))
            .load()
            .expect("Should load default config");

        assert_eq!(settings.interceptor, InterceptorSettings::default());
        assert_eq!(settings.store, StoreSettings::default());
    }

    #[test]
    fn test_custom_config_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        fs::write(
            &path,
            r#"
[interceptor]
fallback_receivers = ["cfg", "parser"]

[store]
default_ini_file = "dev.ini"
"#,
        )
        .unwrap();

        let loader = SettingsLoader::with_custom_config(path.to_str());
        let settings = loader.load().unwrap();

        assert_eq!(settings.interceptor.fallback_receivers, vec!["cfg", "parser"]);
        assert!(settings.interceptor.extra_receivers.is_empty());
        assert_eq!(settings.store.default_ini_file, "dev.ini");
        assert_eq!(
            loader.get_section("store.default_ini_file").unwrap(),
            serde_json::json!("dev.ini")
        );
    }

    #[test]
    fn test_malformed_config_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[interceptor]\nfallback_receivers = 3\n").unwrap();

        assert!(SettingsLoader::with_custom_config(path.to_str()).load().is_err());
    }
}
