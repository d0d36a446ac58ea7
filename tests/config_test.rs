//! Integration tests for Settings config loading with layered precedence.
//!
//! These tests run without a global config (temp directories only), so they
//! exercise defaults, the local `.curov.toml` and `CUROV_*` overrides.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use curriculum_overlay::config::{local_config_path, Settings};

#[test]
fn given_no_local_config_when_loading_then_uses_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load defaults");

    assert!(settings.data_dir.to_string_lossy().contains("curov"));
    assert!(settings.catalog_file.is_none());
}

#[test]
fn given_local_config_when_loading_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
catalog_file = "/srv/catalog/2021.toml"
default_year = 2021
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(
        settings.catalog_file,
        Some(PathBuf::from("/srv/catalog/2021.toml"))
    );
    assert_eq!(settings.default_year, Some(2021));
}

#[test]
fn given_local_config_with_home_relative_path_when_loading_then_path_expanded() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "catalog_file = \"~/catalog.toml\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    let home = std::env::var("HOME").expect("HOME should be set");
    let catalog = settings.catalog_file.expect("catalog_file set");
    assert!(catalog.starts_with(&home));
}

#[test]
fn given_invalid_local_config_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "default_year = \"soon\"\n").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().starts_with("config error"));
    assert!(err.to_string().contains(".curov.toml"));
}

#[test]
fn given_env_var_when_loading_then_env_wins_over_local_config() {
    let dir = TempDir::new().unwrap();
    let env_data_dir = dir.path().join("curov-env-data");
    fs::write(
        local_config_path(dir.path()),
        "data_dir = \"/tmp/curov-local-data\"\n",
    )
    .unwrap();

    std::env::set_var("CUROV_DATA_DIR", &env_data_dir);
    let result = Settings::load(Some(dir.path()));
    std::env::remove_var("CUROV_DATA_DIR");

    let settings = result.expect("load settings");
    assert_eq!(settings.data_dir, env_data_dir);
}

#[test]
fn given_settings_when_store_path_then_inside_data_dir() {
    let settings = Settings {
        data_dir: PathBuf::from("/var/lib/curov"),
        catalog_file: None,
        default_year: None,
    };

    assert_eq!(
        settings.store_path(),
        PathBuf::from("/var/lib/curov/adjustments.toml")
    );
}
