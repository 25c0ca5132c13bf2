//! Runtime configuration, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, RuntimeError};

/// Thresholds used by the complexity, accessibility and recommendation checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholds {
    /// More nodes than this is flagged as hard to maintain.
    pub max_nodes: usize,

    /// Connections per node above which the graph is flagged as tangled.
    pub max_average_connections: f64,

    /// Longest start-to-end path, in nodes.
    pub max_path_depth: usize,

    /// Largest acceptable fraction of challenge and combat nodes.
    pub max_encounter_ratio: f64,

    /// Story node fraction below which more narrative is recommended.
    pub min_story_ratio: f64,

    /// Story text longer than this many words is flagged for readability.
    pub max_story_words: usize,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            max_nodes: 100,
            max_average_connections: 3.0,
            max_path_depth: 20,
            max_encounter_ratio: 0.5,
            min_story_ratio: 0.3,
            max_story_words: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub validation: ValidationThresholds,
}

impl RuntimeConfig {
    /// Parse config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| RuntimeError::Config(e.to_string()))
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| RuntimeError::ConfigNotFound(path.display().to_string()))?;
        Self::from_toml_str(&content)
    }
}
