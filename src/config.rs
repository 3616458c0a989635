use anyhow::{Context, Result};
use serde::Deserialize;

use crate::engine::types::AggregationView;
use crate::error::ConfigError;
use crate::scale::{GradeScale, Preset};
use crate::validate::CreditBounds;

/// Largest supported rounding precision for reported values.
pub const MAX_DECIMAL_PLACES: u32 = 8;

/// Everything needed to validate and report on one institution's records.
///
/// Stored as a JSON object on disk; every field is optional:
/// ```json
/// {
///   "scale": { "preset": "standard" },
///   "bounds": { "min_credits": 0.5, "max_credits": 8, "max_name_len": 100 },
///   "decimal_places": 3,
///   "views": [
///     { "name": "overall" },
///     { "name": "science", "filter": { "kind": "category", "value": "science" } },
///     { "name": "last_45", "window_credits": 45 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub scale: ScaleConfig,
    #[serde(default)]
    pub bounds: CreditBounds,
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    #[serde(default = "default_views")]
    pub views: Vec<AggregationView>,
}

fn default_decimal_places() -> u32 {
    3
}

fn default_views() -> Vec<AggregationView> {
    AggregationView::veterinary_defaults("science")
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scale: ScaleConfig::default(),
            bounds: CreditBounds::default(),
            decimal_places: default_decimal_places(),
            views: default_views(),
        }
    }
}

/// Either a bundled preset or an explicit symbol map.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScaleConfig {
    Preset { preset: Preset },
    Custom { grades: GradeScale },
}

impl Default for ScaleConfig {
    fn default() -> Self {
        ScaleConfig::Preset {
            preset: Preset::Standard,
        }
    }
}

impl ScaleConfig {
    pub fn build(&self) -> GradeScale {
        match self {
            ScaleConfig::Preset { preset } => GradeScale::preset(*preset),
            ScaleConfig::Custom { grades } => grades.clone(),
        }
    }
}

impl EngineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid engine config '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(content)?;
        if config.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::InvalidDecimalPlaces {
                got: config.decimal_places,
                max: MAX_DECIMAL_PLACES,
            }
            .into());
        }
        Ok(config)
    }
}
