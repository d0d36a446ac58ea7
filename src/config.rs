//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/curov/curov.toml`
//! 3. Local config: `<dir>/.curov.toml`
//! 4. Environment variables: `CUROV_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Unified configuration for curov.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the adjustment store (default: XDG data dir)
    pub data_dir: PathBuf,
    /// TOML catalog providing formations and units
    pub catalog_file: Option<PathBuf>,
    /// Academic year used when a command omits `--year`
    pub default_year: Option<i32>,
}

/// Raw settings for intermediate parsing; `None` means "not specified".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub catalog_file: Option<PathBuf>,
    pub default_year: Option<i32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_file: None,
            default_year: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "curov")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.curov"))
}

/// Get the XDG config directory for curov.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "curov").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("curov.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".curov.toml")
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input as is when a variable is unset.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Path of the TOML adjustment store.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir
            .join(crate::infrastructure::TomlAdjustmentRepository::FILE_NAME)
    }

    fn expand_paths(&mut self) {
        self.data_dir = expand_path(&self.data_dir);
        self.catalog_file = self.catalog_file.as_deref().map(expand_path);
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            catalog_file: overlay
                .catalog_file
                .clone()
                .or_else(|| self.catalog_file.clone()),
            default_year: overlay.default_year.or(self.default_year),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.curov.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Apply CUROV_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CUROV")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("catalog_file") {
            settings.catalog_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("default_year") {
            let year = val.trim().parse::<i32>().map_err(|e| ApplicationError::Config {
                message: format!("CUROV_DEFAULT_YEAR={val}: {e}"),
            })?;
            settings.default_year = Some(year);
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_tilde_in_data_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/.curov"),
            catalog_file: Some(PathBuf::from("~/catalog.toml")),
            default_year: None,
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.data_dir.starts_with(&home));
        assert!(settings
            .catalog_file
            .as_ref()
            .is_some_and(|p| p.starts_with(&home)));
    }

    #[test]
    fn given_partial_overlay_when_merge_then_keeps_unspecified_values() {
        let base = Settings {
            data_dir: PathBuf::from("/data"),
            catalog_file: Some(PathBuf::from("/catalog.toml")),
            default_year: Some(2020),
        };
        let overlay = RawSettings {
            default_year: Some(2021),
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.data_dir, PathBuf::from("/data"));
        assert_eq!(merged.catalog_file, Some(PathBuf::from("/catalog.toml")));
        assert_eq!(merged.default_year, Some(2021));
    }
}
