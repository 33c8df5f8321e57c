//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/kdbtree/kdbtree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `KDBTREE_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::NodeDefaults;

/// Values given to groups and entries created by the tree factories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Icon index for new groups (48 is the KeePass folder icon)
    pub group_image: u32,
    /// Icon index for new entries (0 is the KeePass key icon)
    pub entry_image: u32,
    /// Stamp creation/modification/access time on new nodes
    pub stamp_times: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            group_image: 48,
            entry_image: 0,
            stamp_times: true,
        }
    }
}

/// Output options for the `show` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// List entries below their groups
    pub show_entries: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { show_entries: true }
    }
}

/// Effective settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub defaults: DefaultsConfig,
    pub display: DisplayConfig,
}

/// Get the XDG config directory for kdbtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kdbtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("kdbtree.toml"))
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist when given
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/kdbtree/kdbtree.toml`
    /// 3. `config_file`
    /// 4. Environment variables, e.g. `KDBTREE_DEFAULTS__GROUP_IMAGE=1`
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|path| path.exists());
        Self::load_from(global.as_deref(), config_file)
    }

    /// Load with an explicit global config location (used by `load` and tests).
    pub fn load_from(
        global: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut builder = Config::builder();

        // 1. Start with defaults
        let defaults = Settings::default();
        builder = builder
            .set_default("defaults.group_image", i64::from(defaults.defaults.group_image))
            .map_err(config_err)?
            .set_default("defaults.entry_image", i64::from(defaults.defaults.entry_image))
            .map_err(config_err)?
            .set_default("defaults.stamp_times", defaults.defaults.stamp_times)
            .map_err(config_err)?
            .set_default("display.show_entries", defaults.display.show_entries)
            .map_err(config_err)?;

        // 2. Global config
        if let Some(global_path) = global {
            debug!("global config: {}", global_path.display());
            builder = builder.add_source(File::from(global_path).required(false));
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            debug!("config file: {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        // 4. Environment variables
        builder = builder.add_source(
            Environment::with_prefix("KDBTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        config.try_deserialize().map_err(config_err)
    }

    pub fn node_defaults(&self) -> NodeDefaults {
        NodeDefaults {
            group_image: self.defaults.group_image,
            entry_image: self.defaults.entry_image,
            stamp_times: self.defaults.stamp_times,
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Annotated config file with every key at its default.
    pub fn template() -> String {
        r#"# kdbtree configuration
#
# Locations (by precedence, lowest to highest):
#   $XDG_CONFIG_HOME/kdbtree/kdbtree.toml
#   file given with --config
#   KDBTREE_* environment variables (e.g. KDBTREE_DEFAULTS__GROUP_IMAGE=1)

[defaults]
# Icon index for new groups
group_image = 48
# Icon index for new entries
entry_image = 0
# Stamp creation/modification/access time on new groups and entries
stamp_times = true

[display]
# List entries below their groups in `kdbtree show`
show_entries = true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.defaults.group_image, 48);
        assert_eq!(settings.defaults.entry_image, 0);
        assert!(settings.defaults.stamp_times);
        assert!(settings.display.show_entries);
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let settings = Settings {
            defaults: DefaultsConfig {
                group_image: 3,
                entry_image: 9,
                stamp_times: false,
            },
            display: DisplayConfig {
                show_entries: false,
            },
        };
        let toml = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_node_defaults_mirror_settings() {
        let nd = Settings::default().node_defaults();
        assert_eq!(nd.group_image, 48);
        assert_eq!(nd.entry_image, 0);
        assert!(nd.stamp_times);
    }
}
