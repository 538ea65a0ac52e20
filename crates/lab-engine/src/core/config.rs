use serde::{Deserialize, Serialize};

use crate::core::error::LabError;

/// Host configuration, supplied by the embedding page.
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Surface width in pixels when the container reports none.
    pub surface_width: f32,
    /// Surface height in pixels when the container reports none.
    pub surface_height: f32,
    /// Nominal refresh interval in seconds. Models step with their own fixed dt;
    /// this only bounds the presentational clock of exhibits.
    pub frame_budget: f32,
    /// Seed for presentational randomness (particle jitter).
    pub seed: u64,
    /// DOM id of the element hosting the experiment surface.
    pub container_id: String,
    /// `log` level filter name ("error" .. "trace").
    pub log_level: String,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            surface_width: 800.0,
            surface_height: 400.0,
            frame_budget: 1.0 / 60.0,
            seed: 42,
            container_id: "experiment-container".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl LabConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, LabError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The configured level, falling back to `Info` for unknown names.
    pub fn level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
