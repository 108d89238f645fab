//! Chart configuration: which endpoints to fetch, from where, and how to lay them out.
//!
//! Configuration is a TOML document:
//!
//! ```toml
//! title = "Number of fans added per week"
//! endpoints = ["/fans/total", "/fans/facebook", "/fans/twitter", "/fans/youtube"]
//!
//! [api]
//! artist_id = "fe66302b0aee49cfbd7d248403036def"
//! granularity = "week"
//!
//! [chart]
//! width = 960
//! height = 500
//! axis = "shared"
//! ```
//!
//! The order of `endpoints` is the canonical order of the chart: series and
//! legend entries appear in this order regardless of which request finishes
//! first.

use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::{
    layout::{AxisMode, ChartLayout, Margin},
    providers::semetric_rest::SemetricSettings,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartConfig {
    #[serde(default)]
    pub title: String,
    /// Endpoints in canonical order.
    pub endpoints: Vec<String>,
    pub api: SemetricSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartSettings {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub margin: Margin,
    #[serde(default)]
    pub axis: AxisMode,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
            axis: AxisMode::default(),
        }
    }
}

impl ChartSettings {
    pub fn layout(&self) -> ChartLayout {
        ChartLayout {
            width: self.width,
            height: self.height,
            margin: self.margin,
        }
    }
}

fn default_width() -> f64 {
    ChartLayout::default().width
}

fn default_height() -> f64 {
    ChartLayout::default().height
}

impl ChartConfig {
    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::Invalid("endpoints must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for endpoint in &self.endpoints {
            if endpoint.trim().is_empty() {
                return Err(ConfigError::Invalid("endpoint must not be blank".into()));
            }
            if !seen.insert(endpoint.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate endpoint {endpoint}")));
            }
        }
        if self.api.artist_id.trim().is_empty() {
            return Err(ConfigError::Invalid("api.artist_id must not be blank".into()));
        }
        if !(self.chart.width > 0.0 && self.chart.height > 0.0) {
            return Err(ConfigError::Invalid("chart width and height must be positive".into()));
        }
        Ok(())
    }
}

/// Parses and validates a config from a TOML string.
pub fn parse_config(content: &str) -> Result<ChartConfig, ConfigError> {
    let config: ChartConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Reads, parses and validates the config file at `path`.
pub fn load_config(path: impl AsRef<Path>) -> Result<ChartConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| {
        error!(path = %path.display(), "failed to read config file: {source}");
        ConfigError::Read {
            path: path.display().to_string(),
            source,
        }
    })?;
    parse_config(&content)
}
