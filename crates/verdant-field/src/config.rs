//! Field layer configuration.
//!
//! Bundles the engine's frame policy with the effect toggles, loadable from
//! a TOML file with fall-back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};
use verdant_movement::EngineConfig;

/// Errors from loading or saving the field configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("config io failed: {0}")]
    Io(#[from] std::io::Error),

    /// File contents were not valid TOML for this schema
    #[error("config parse failed: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized
    #[error("config serialize failed: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration for the field adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Frame policy handed to the movement engine
    pub engine: EngineConfig,
    /// Fire ground-effect hooks on begin-step
    pub ground_effects: bool,
    /// Seed grass effects for actors spawning in grass
    pub spawn_grass_effects: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldConfig {
    /// Creates the default configuration with effects enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: EngineConfig::default(),
            ground_effects: true,
            spawn_grass_effects: true,
        }
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration, falling back to defaults on any failure.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from_path(path) {
            Ok(config) => {
                info!(path = %path.display(), "field config loaded");
                config
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "field config unavailable, using defaults");
                Self::new()
            }
        }
    }

    /// Saves configuration to a TOML file.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FieldConfig::new();
        assert!(config.ground_effects);
        assert!(config.spawn_grass_effects);
        assert!(config.engine.discard_backlog);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: FieldConfig = toml::from_str(
            r#"
            ground_effects = false

            [engine]
            discard_backlog = false
            rng_seed = 42
            "#,
        )
        .expect("partial config should parse");

        assert!(!config.ground_effects);
        assert!(!config.engine.discard_backlog);
        assert_eq!(config.engine.rng_seed, Some(42));
        // Unspecified fields keep their defaults.
        assert_eq!(config.engine.max_cascade_steps, 10);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = FieldConfig::load_or_default(Path::new("/nonexistent/verdant.toml"));
        assert!(config.ground_effects);
    }

    #[test]
    fn test_roundtrip_serialization() {
        let mut config = FieldConfig::new();
        config.engine.rng_seed = Some(7);
        let text = toml::to_string_pretty(&config).expect("serialize");
        let back: FieldConfig = toml::from_str(&text).expect("reparse");
        assert_eq!(back.engine.rng_seed, Some(7));
    }
}
