//! Application settings.
//!
//! Read from an optional JSON file, then overridden by environment variables:
//! ```json
//! {
//!   "park_name": "PortAventura World",
//!   "default_dataset": "https://example.com/sample-data.csv.gz",
//!   "ride_descriptions": { "Shambhala": "Europe's tallest hypercoaster" }
//! }
//! ```
//! Missing keys fall back to [`AppConfig::default`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

pub const CONFIG_PATH_VAR: &str = "RIDE_BOARD_CONFIG";
pub const PARK_NAME_VAR: &str = "RIDE_BOARD_PARK_NAME";
pub const DEFAULT_DATASET_VAR: &str = "RIDE_BOARD_DEFAULT_DATASET";
pub const LOG_FILE_PATH_VAR: &str = "LOG_FILE_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub park_name: String,
    pub header_title: String,
    pub header_subtitle: String,
    /// Local path or URL of the dataset loaded at start-up.
    pub default_dataset: String,
    pub log_file_path: String,
    /// Short blurb per ride, shown next to its name.
    pub ride_descriptions: HashMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let ride_descriptions = [
            ("Shambhala", "Europe's tallest hypercoaster"),
            ("Furius Baco", "0 to 135 km/h in 3.5 seconds"),
            ("Dragon Khan", "8 inversions of pure adrenaline"),
            ("Stampida", "Dueling wooden roller coaster"),
            ("Hurakan Condor", "100m free fall tower"),
            ("Tutuki Splash", "Volcanic water ride"),
            ("Silver River Flume", "Classic log flume through the Wild West"),
            ("El Diablo - Tren de la Mina", "Family mine train coaster"),
            ("Grand Canyon Rapids", "Wild water rapids adventure"),
            (
                "Street Mission",
                "Interactive dark ride with the Sesame Street gang",
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            park_name: "PortAventura World".to_string(),
            header_title: "Skip the Wait at PortAventura World".to_string(),
            header_subtitle: "Live waiting times".to_string(),
            default_dataset: "sample-data.csv.gz".to_string(),
            log_file_path: "logs/ride_wait_board.log".to_string(),
            ride_descriptions,
        }
    }
}

impl AppConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{path}'"))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid config JSON in '{path}'"))?;
        Ok(config)
    }

    /// Config file named by `RIDE_BOARD_CONFIG` (if set), then environment
    /// overrides.
    pub fn from_env() -> Result<Self> {
        let config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::load(&path)?,
            Err(_) => Self::default(),
        };
        Ok(config.with_overrides(|key| env::var(key).ok()))
    }

    /// Applies overrides looked up by variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup(PARK_NAME_VAR) {
            self.park_name = v;
        }
        if let Some(v) = lookup(DEFAULT_DATASET_VAR) {
            self.default_dataset = v;
        }
        if let Some(v) = lookup(LOG_FILE_PATH_VAR) {
            self.log_file_path = v;
        }
        self
    }

    /// Returns the blurb for `ride`, if one is configured.
    pub fn description(&self, ride: &str) -> Option<&str> {
        self.ride_descriptions.get(ride).map(String::as_str)
    }
}
