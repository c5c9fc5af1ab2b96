//! Closed enumerations used throughout the crate.
//!
//! Component type tags and usage hints are open sets on the wire and are kept
//! as strings; only the enumerations below have a fixed set of variants.

use serde::{Deserialize, Serialize};

/// Chart presentation style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    #[default]
    Pie,
    Doughnut,
    Bar,
    Line,
}

impl ChartType {
    /// Looks up a chart type by its wire name. Matching is case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pie" => Some(ChartType::Pie),
            "doughnut" => Some(ChartType::Doughnut),
            "bar" => Some(ChartType::Bar),
            "line" => Some(ChartType::Line),
            _ => None,
        }
    }
}

/// How a data entry carrying more than one value field is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPolicy {
    /// First present field wins: string, number, map, boolean.
    #[default]
    FirstPresent,
    /// Entries with several value fields are skipped.
    RejectAmbiguous,
}

/// What a write does when a scalar sits where a container is needed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Fail the write with a typed error; the model is left unchanged.
    #[default]
    Reject,
    /// Treat the scalar as absent and replace it with a fresh container.
    Replace,
}
