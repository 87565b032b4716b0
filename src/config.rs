use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Free-form label for the loaded profile.
    pub profile_name: String,
    pub display: DisplayRules,
    pub filters: FilterSets,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            profile_name: "base".to_string(),
            display: DisplayRules::default(),
            filters: FilterSets::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayRules {
    pub line_numbers: bool,
    /// Print hidden lines too, dimmed and prefixed with `hidden_marker`
    pub show_hidden: bool,
    pub hidden_marker: String,
}

impl Default for DisplayRules {
    fn default() -> Self {
        Self {
            line_numbers: true,
            show_hidden: false,
            hidden_marker: "~".to_string(),
        }
    }
}

/// Tab documents loaded on start-up. Relative paths resolve against the
/// directory of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterSets {
    pub global: Option<PathBuf>,
    pub tab: Option<PathBuf>,
}

pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    let mut config = toml::from_str::<ViewerConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })?;

    if let Some(base) = path.parent() {
        config.filters.global = config.filters.global.map(|p| base.join(p));
        config.filters.tab = config.filters.tab.map(|p| base.join(p));
    }
    Ok(config)
}

pub fn default_config() -> &'static ViewerConfig {
    static DEFAULT_CONFIG: LazyLock<ViewerConfig> = LazyLock::new(ViewerConfig::default);
    &DEFAULT_CONFIG
}
