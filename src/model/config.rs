use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration from datespan.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    /// First day of the calendar week ("sunday", "monday", ...)
    #[serde(default = "default_week_start")]
    pub week_start: String,
    /// Minute spacing of entries in the time list
    #[serde(default = "default_time_step")]
    pub time_step: u32,
    #[serde(default)]
    pub placement: PlacementConfig,
    /// Hex color overrides by theme key, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        PickerConfig {
            week_start: default_week_start(),
            time_step: default_time_step(),
            placement: PlacementConfig::default(),
            colors: HashMap::new(),
        }
    }
}

/// Spacing overrides for anchored placement, in terminal cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Extra room required beyond the popup height before a side is chosen
    #[serde(default = "default_threshold")]
    pub threshold: u16,
    /// Rows between the trigger and the popup
    #[serde(default = "default_gap")]
    pub gap: u16,
    /// Clearance kept from viewport edges when clamping
    #[serde(default = "default_inset")]
    pub inset: u16,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        PlacementConfig {
            threshold: default_threshold(),
            gap: default_gap(),
            inset: default_inset(),
        }
    }
}

fn default_week_start() -> String {
    "sunday".to_string()
}

fn default_time_step() -> u32 {
    30
}

fn default_threshold() -> u16 {
    1
}

fn default_gap() -> u16 {
    0
}

fn default_inset() -> u16 {
    2
}

impl PickerConfig {
    /// Load config from a TOML file. A missing file means defaults.
    pub fn load(path: &Path) -> Result<PickerConfig, ConfigError> {
        if !path.exists() {
            return Ok(PickerConfig::default());
        }
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// The configured week start as a weekday. Unrecognized names fall
    /// back to Sunday.
    pub fn week_start_day(&self) -> Weekday {
        parse_weekday(&self.week_start).unwrap_or(Weekday::Sun)
    }
}

/// Parse a weekday name (full or three-letter, any case)
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.to_ascii_lowercase().as_str() {
        "sunday" | "sun" => Some(Weekday::Sun),
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        _ => None,
    }
}
