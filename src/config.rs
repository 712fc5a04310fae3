//! Configuration: layout constants, polling interval and marker labels
//!
//! Every value has a default here; a TOML file only needs the keys it
//! overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StageGraphError};
use crate::layout::{GraphLabels, LayoutConfig};

/// Name of the directory under the user config dir
const CONFIG_DIR_NAME: &str = "stagegraph";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub poll: PollConfig,
    pub labels: GraphLabels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
}

/// Floor for the poll interval; `0` would spin
const MIN_POLL_INTERVAL_MS: u64 = 100;

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(MIN_POLL_INTERVAL_MS))
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing_h: 120.0,
            parallel_spacing_h: 120.0,
            node_spacing_v: 70.0,
            node_radius: 12.0,
            terminal_radius: 7.0,
            curve_radius: 12.0,
            connector_stroke_width: 3.5,
            label_offset_v: 20.0,
            small_label_offset_v: 15.0,
            yp_start: 55.0,
            sequential_stages_label_offset: 80.0,
        }
    }
}

impl Default for GraphLabels {
    fn default() -> Self {
        Self {
            start: "Start".to_string(),
            end: "End".to_string(),
        }
    }
}

impl Config {
    /// Load from `path` if given, else from the user config file if one
    /// exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Config::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| StageGraphError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = toml::from_str(&content).map_err(|e| StageGraphError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

/// `<config dir>/stagegraph/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
}
