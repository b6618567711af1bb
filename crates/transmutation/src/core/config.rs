//! Configuration loading and management.
//!
//! [`ConverterConfig`] can be built programmatically, loaded from TOML or JSON,
//! or discovered as `transmutation.toml` in the current directory or one of
//! its parents.

use crate::{Result, TransmutationError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name searched for by [`ConverterConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "transmutation.toml";

/// Converter configuration.
///
/// # Example
///
/// ```rust
/// use transmutation::ConverterConfig;
///
/// let config = ConverterConfig {
///     enable_cache: true,
///     cache_size: 500,
///     ..Default::default()
/// };
/// assert!(config.validate_input);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Cache conversion results by content hash.
    #[serde(default)]
    pub enable_cache: bool,

    /// Maximum number of cached results, in `[1, 10000]`.
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    /// Age in milliseconds after which a cached result is treated as absent.
    #[serde(default = "default_cache_max_age_ms")]
    pub cache_max_age_ms: i64,

    /// Validate buffers, formats, paths and options before converting.
    #[serde(default = "default_true")]
    pub validate_input: bool,

    /// Record conversion metrics.
    #[serde(default)]
    pub collect_metrics: bool,

    /// Coalesce concurrent conversions of identical content (cache only).
    #[serde(default = "default_true")]
    pub single_flight: bool,
}

fn default_true() -> bool {
    true
}

fn default_cache_size() -> usize {
    100
}

fn default_cache_max_age_ms() -> i64 {
    3_600_000
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            enable_cache: false,
            cache_size: default_cache_size(),
            cache_max_age_ms: default_cache_max_age_ms(),
            validate_input: true,
            collect_metrics: false,
            single_flight: true,
        }
    }
}

impl ConverterConfig {
    /// Cache max age as a [`Duration`]. Negative values clamp to zero.
    pub fn cache_max_age(&self) -> Duration {
        Duration::from_millis(self.cache_max_age_ms.max(0) as u64)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `TransmutationError::Config` if the file can't be read or is
    /// invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config(path)?;

        toml::from_str(&content).map_err(|e| {
            TransmutationError::config_with_source(format!("Invalid TOML in {}", path.display()), e)
        })
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config(path)?;

        serde_json::from_str(&content).map_err(|e| {
            TransmutationError::config_with_source(format!("Invalid JSON in {}", path.display()), e)
        })
    }

    /// Discover `transmutation.toml` in the current directory or its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let current = std::env::current_dir()?;
        Self::discover_from(current)
    }

    /// Discover `transmutation.toml` starting from `start` and walking up.
    pub fn discover_from(start: impl Into<PathBuf>) -> Result<Option<Self>> {
        let mut current = start.into();

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "Discovered configuration file");
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        TransmutationError::config_with_source(format!("Failed to read config file {}", path.display()), e)
    })
}
