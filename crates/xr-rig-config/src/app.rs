//! Top-level configuration file

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result, RigConfiguration, SimulationConfig};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Complete configuration as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub rig: RigConfiguration,
    pub simulation: SimulationConfig,
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded rig configuration from {}", path.display());
        Ok(config)
    }

    /// Load from an explicit path, else from the default location if it
    /// exists, else fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(default) if default.exists() => Self::load(default),
            _ => {
                tracing::debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write configuration as TOML, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.validate()?;
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Platform configuration path, e.g. `~/.config/xr-rig/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "xr-rig").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IntegrityPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_parse_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [rig]
            use_per_eye_cameras = true
            integrity_policy = "once"

            [simulation]
            fixed_timestep_secs = 0.02
            "#,
        )
        .unwrap();

        assert!(config.rig.use_per_eye_cameras);
        assert!(!config.rig.use_fixed_update_for_tracking);
        assert_eq!(config.rig.integrity_policy, IntegrityPolicy::Once);
        assert_eq!(config.simulation.fixed_timestep_secs, 0.02);
        assert_eq!(config.simulation.max_fixed_steps_per_frame, 4);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = AppConfig::from_toml_str("[simulation]\nfixed_timestep_secs = -1.0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = AppConfig::from_toml_str("[simulation]\nfixed_timestep_secs = 1e-10");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = AppConfig::from_toml_str("[rig]\nintegrity_policy = \"never\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = AppConfig::default();
        config.rig.use_fixed_update_for_tracking = true;
        config.simulation.max_fixed_steps_per_frame = 2;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(AppConfig::load_or_default(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = AppConfig::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
