//! Processor and renderer settings.
//!
//! Every field has a default, so an empty YAML document (or none at all)
//! yields the standard behavior:
//!
//! ```yaml
//! processor:
//!   entry_policy: first_present     # or reject_ambiguous
//!   write:
//!     on_conflict: reject           # or replace
//!     max_index: 65535
//! render:
//!   max_items: 100
//!   max_depth: 64
//!   default_chart_type: pie
//!   default_zoom: 8
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data_model::WritePolicy;
use crate::enums::{ChartType, EntryPolicy};
use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub processor: ProcessorConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Decodes a YAML document. Blank input gives the defaults.
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(input).map_err(|e| ConfigError::Yaml(e.to_string()))
    }

    /// Reads and decodes a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub entry_policy: EntryPolicy,
    pub write: WritePolicy,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Probe cap for data-bound chart items, drill-downs and map pins.
    pub max_items: usize,
    /// Deepest component nesting that is expanded.
    pub max_depth: usize,
    pub default_chart_type: ChartType,
    /// Used when a map's zoom is absent, zero or not a number.
    pub default_zoom: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_items: 100,
            max_depth: 64,
            default_chart_type: ChartType::Pie,
            default_zoom: 8.0,
        }
    }
}
