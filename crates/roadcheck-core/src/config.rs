//! Configuration for roadcheck checks.
//!
//! Load order: `.roadcheck/config.toml` (or an explicit file) → environment variables → defaults.

use crate::error::ConfigError;
use crate::highway::HighwayClass;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level roadcheck configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadcheckConfig {
    pub short_segment: ShortSegmentConfig,
}

/// Settings for the short segment check. Keys keep their dotted names in TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortSegmentConfig {
    /// Disabled checks are skipped by the runner entirely.
    pub enabled: bool,
    /// Edges at least this long are never flagged.
    #[serde(rename = "edge.length.maximum.meters")]
    pub maximum_length_meters: f64,
    /// A node with fewer main edges than this is a low-valence node.
    #[serde(rename = "node.valence.minimum")]
    pub minimum_valence: usize,
    /// Least important highway classification that is still checked.
    /// Kept as text so an unknown value surfaces as a [`ConfigError`].
    #[serde(rename = "highway.priority.minimum")]
    pub minimum_highway_priority: String,
}

impl Default for ShortSegmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            maximum_length_meters: 1.0,
            minimum_valence: 3,
            minimum_highway_priority: HighwayClass::Service.to_string(),
        }
    }
}

impl ShortSegmentConfig {
    /// Parse the configured minimum highway priority.
    pub fn highway_priority(&self) -> Result<HighwayClass, ConfigError> {
        Ok(self.minimum_highway_priority.parse()?)
    }

    /// Only the highway priority can be invalid. A non-positive maximum length
    /// or a zero minimum valence is accepted and simply never flags.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.highway_priority()?;
        Ok(())
    }
}

/// Helper to parse a looked-up variable and apply it to a config field.
fn env_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    target: &mut T,
) {
    if let Some(v) = lookup(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl RoadcheckConfig {
    /// Load config from `.roadcheck/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let config_path = crate::storage::roadcheck_dir(project_root).join("config.toml");
        if config_path.exists() {
            Self::load_file(&config_path)
        } else {
            Self::finish(Self::default())
        }
    }

    /// Load config from an explicit TOML file, with env var overrides.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::finish(config)
    }

    fn finish(mut config: Self) -> Result<Self, ConfigError> {
        config.apply_overrides(&|var| std::env::var(var).ok());
        config.short_segment.validate()?;
        Ok(config)
    }

    /// Apply `ROADCHECK_*` overrides from `lookup`. Unparseable values are ignored.
    pub fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        let short = &mut self.short_segment;
        env_override(
            lookup,
            "ROADCHECK_EDGE_LENGTH_MAXIMUM_METERS",
            &mut short.maximum_length_meters,
        );
        env_override(
            lookup,
            "ROADCHECK_NODE_VALENCE_MINIMUM",
            &mut short.minimum_valence,
        );
        env_override(
            lookup,
            "ROADCHECK_HIGHWAY_PRIORITY_MINIMUM",
            &mut short.minimum_highway_priority,
        );
    }
}
