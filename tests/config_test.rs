//! Integration tests for Settings config loading with layered precedence.
//!
//! These tests pass the global config location explicitly, so they never
//! read the real user configuration.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use kdbtree::application::ApplicationError;
use kdbtree::config::Settings;

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn given_no_config_files_when_load_then_returns_defaults() {
    let settings = Settings::load_from(None, None).expect("load settings");
    assert_eq!(settings, Settings::default());
}

#[test]
fn given_global_config_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let global = write_config(
        &dir,
        "kdbtree.toml",
        r#"
[defaults]
group_image = 1
"#,
    );

    let settings = Settings::load_from(Some(&global), None).expect("load settings");

    assert_eq!(settings.defaults.group_image, 1);
    // untouched keys keep their defaults
    assert_eq!(settings.defaults.entry_image, 0);
    assert!(settings.defaults.stamp_times);
    assert!(settings.display.show_entries);
}

#[test]
fn given_global_and_explicit_config_when_load_then_explicit_wins() {
    let dir = TempDir::new().unwrap();
    let global = write_config(
        &dir,
        "global.toml",
        r#"
[defaults]
group_image = 1
stamp_times = false
"#,
    );
    let explicit = write_config(
        &dir,
        "explicit.toml",
        r#"
[defaults]
group_image = 2

[display]
show_entries = false
"#,
    );

    let settings = Settings::load_from(Some(&global), Some(&explicit)).expect("load settings");

    assert_eq!(settings.defaults.group_image, 2);
    assert!(!settings.defaults.stamp_times, "global value survives");
    assert!(!settings.display.show_entries);
}

#[test]
fn given_missing_global_config_when_load_then_ignored() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");
    let settings = Settings::load_from(Some(&missing), None).expect("load settings");
    assert_eq!(settings, Settings::default());
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");
    let err = Settings::load_from(None, Some(&missing)).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_wrong_type_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let bad = write_config(
        &dir,
        "bad.toml",
        r#"
[defaults]
stamp_times = "sometimes"
"#,
    );
    let err = Settings::load_from(None, Some(&bad)).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}
