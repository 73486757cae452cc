//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading HOS rule sets
//! from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{HosConfig, RulesetConfig, RulesetMetadata, SweepConfig};

/// Loads and provides access to a HOS rule set.
///
/// # Directory Structure
///
/// ```text
/// config/fmcsa_property/
/// ├── ruleset.yaml   # Rule set metadata
/// ├── limits.yaml    # Numeric limits (missing keys use the regulatory defaults)
/// └── sweep.yaml     # Optional background sweep settings
/// ```
///
/// # Example
///
/// ```no_run
/// use hos_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/fmcsa_property").unwrap();
/// println!("Rule set: {}", loader.metadata().name);
/// println!("Driving limit: {}h", loader.limits().max_driving_hours);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: RulesetConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `ruleset.yaml` or `limits.yaml` is missing
    /// - Any file contains invalid YAML
    /// - The limits fail [`HosConfig::validate`] or [`SweepConfig::validate`]
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<RulesetMetadata>(&path.join("ruleset.yaml"))?;
        let limits = Self::load_yaml::<HosConfig>(&path.join("limits.yaml"))?;
        limits.validate()?;

        let sweep_path = path.join("sweep.yaml");
        let sweep = if sweep_path.exists() {
            Self::load_yaml::<SweepConfig>(&sweep_path)?
        } else {
            SweepConfig::default()
        };
        sweep.validate()?;

        debug!(
            ruleset = %metadata.code,
            version = %metadata.version,
            sweep_interval_seconds = sweep.interval_seconds,
            "Loaded HOS rule set"
        );

        Ok(Self {
            config: RulesetConfig::new(metadata, limits, sweep),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying rule set.
    pub fn config(&self) -> &RulesetConfig {
        &self.config
    }

    /// Returns the rule set metadata.
    pub fn metadata(&self) -> &RulesetMetadata {
        self.config.metadata()
    }

    /// Returns the numeric limits.
    pub fn limits(&self) -> &HosConfig {
        self.config.limits()
    }

    /// Returns the sweep settings.
    pub fn sweep(&self) -> &SweepConfig {
        self.config.sweep()
    }
}
