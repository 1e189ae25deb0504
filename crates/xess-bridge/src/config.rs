//! Bridge configuration loaded from TOML.
//!
//! ```toml
//! signatures = "signatures.json"
//!
//! [default_motion_scale]
//! x = -1.0
//! y = -1.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::context::Scale;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Hook signature set (JSON)
    pub signatures: Option<PathBuf>,
    /// Motion vector scale for contexts that never set one
    pub default_motion_scale: Scale,
    /// Jitter scale for contexts that never set one
    pub default_jitter_scale: Scale,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_motion_scale: Scale::IDENTITY,
            default_jitter_scale: Scale::IDENTITY,
            signatures: None,
        }
    }
}

impl BridgeConfig {
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config = Self::from_toml(&content)?;
        info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Like [`load`](Self::load), but falls back to defaults when the file is
    /// missing or invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config {}: {}, using defaults",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Builder for BridgeConfig
#[derive(Debug, Clone, Default)]
pub struct BridgeConfigBuilder {
    default_motion_scale: Option<Scale>,
    default_jitter_scale: Option<Scale>,
    signatures: Option<PathBuf>,
}

impl BridgeConfigBuilder {
    pub fn default_motion_scale(mut self, scale: Scale) -> Self {
        self.default_motion_scale = Some(scale);
        self
    }

    pub fn default_jitter_scale(mut self, scale: Scale) -> Self {
        self.default_jitter_scale = Some(scale);
        self
    }

    pub fn signatures<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.signatures = Some(path.into());
        self
    }

    pub fn build(self) -> BridgeConfig {
        let default = BridgeConfig::default();
        BridgeConfig {
            default_motion_scale: self
                .default_motion_scale
                .unwrap_or(default.default_motion_scale),
            default_jitter_scale: self
                .default_jitter_scale
                .unwrap_or(default.default_jitter_scale),
            signatures: self.signatures.or(default.signatures),
        }
    }
}
