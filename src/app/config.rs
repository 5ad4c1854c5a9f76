//! Engine configuration loader.
//!
//! Settings come from a YAML file. Every key is optional; missing keys keep their
//! defaults and command-line flags override whatever the file says.
//!
//! # config.yaml Format
//!
//! ```yaml
//! gcloud_binary: /opt/google-cloud-sdk/bin/gcloud
//! service_name: secretmanager.googleapis.com
//! default_days: 14
//! default_limit: 100
//! project: my-project
//! ```
//!
//! # Lookup order
//!
//! 1. the path given with `--config`
//! 2. `$SECRETAUDIT_CONFIG`
//! 3. `config.yaml` in the platform config directory (e.g. `~/.config/secretaudit/`)
//!
//! The first two must exist; the third is optional.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::app::data_plane::audit_logs::filter::MAX_DAYS;
use crate::app::data_plane::audit_logs::{query::SECRET_MANAGER_SERVICE, DEFAULT_DAYS, DEFAULT_LIMIT};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "SECRETAUDIT_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Program used to query Cloud Logging
    pub gcloud_binary: String,

    /// Service name the store-side filter is scoped to
    pub service_name: String,

    /// Day window when `--days` is not given, `1..=MAX_DAYS`
    pub default_days: u32,

    /// Entry limit when `--limit` is not given, at least 1
    pub default_limit: u32,

    /// Project when `--project` is not given
    pub project: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gcloud_binary: "gcloud".to_string(),
            service_name: SECRET_MANAGER_SERVICE.to_string(),
            default_days: DEFAULT_DAYS,
            default_limit: DEFAULT_LIMIT,
            project: None,
        }
    }
}

impl EngineConfig {
    /// Resolve and load the configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::load_from_path(Path::new(&path));
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        debug!(
            "Loaded config from {:?}: gcloud={}, days={}, limit={}, project={:?}",
            path, config.gcloud_binary, config.default_days, config.default_limit, config.project
        );
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        // An empty file deserializes to `null`
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the command line would also reject
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_DAYS).contains(&self.default_days),
            "default_days must be between 1 and {}, got {}",
            MAX_DAYS,
            self.default_days
        );
        ensure!(
            self.default_limit >= 1,
            "default_limit must be at least 1, got {}",
            self.default_limit
        );
        Ok(())
    }

    /// Platform config location, e.g. `~/.config/secretaudit/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "", "secretaudit")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = EngineConfig::from_yaml("default_days: 30\nproject: demo\n").unwrap();

        assert_eq!(config.default_days, 30);
        assert_eq!(config.project.as_deref(), Some("demo"));
        assert_eq!(config.default_limit, DEFAULT_LIMIT);
        assert_eq!(config.gcloud_binary, "gcloud");
        assert_eq!(config.service_name, SECRET_MANAGER_SERVICE);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(EngineConfig::from_yaml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "gcloud_binary: /usr/local/bin/gcloud").unwrap();
        writeln!(file, "default_limit: 200").unwrap();

        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.gcloud_binary, "/usr/local/bin/gcloud");
        assert_eq!(config.default_limit, 200);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(EngineConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let err = EngineConfig::from_yaml("default_limit: 0").unwrap_err();
        assert!(err.to_string().contains("default_limit"));

        assert!(EngineConfig::from_yaml("default_days: 0").is_err());
        assert!(EngineConfig::from_yaml("default_days: 4294967295").is_err());
        assert!(EngineConfig::from_yaml("default_days: 3650\ndefault_limit: 1").is_ok());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(EngineConfig::from_yaml("default_days: [not, a, number]").is_err());
    }
}
