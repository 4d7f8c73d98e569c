//! Crate tunables.
//!
//! Every limit in this crate has a documented default and can be overridden
//! from a TOML file:
//!
//! ```toml
//! observed_device_cap = 200
//! cache_ttl_ms = 2000
//! fix_triggers = false
//! ```
//!
//! Missing keys fall back to the defaults, so a partial file is fine.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunables with the defaults the rest of the crate assumes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Ceiling on devices the transformer learns from.
    pub observed_device_cap: usize,
    /// Staleness bound for a store's cached button map, in milliseconds.
    pub cache_ttl_ms: u64,
    /// Rewrite anomalous trigger values (see [`crate::trigger`]).
    pub fix_triggers: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            observed_device_cap: crate::transformer::DEFAULT_OBSERVED_DEVICE_CAP,
            cache_ttl_ms: crate::store::DEFAULT_CACHE_TTL.as_millis() as u64,
            fix_triggers: false,
        }
    }
}

impl MapperConfig {
    /// Cache TTL as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Parse from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }
}
