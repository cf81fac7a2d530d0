//! Configuration file handling for blur-check.
//!
//! Loads configuration from `~/.config/blur-check/config.toml` or a custom
//! path. The only tunables are the host platform override and the blur
//! truthiness threshold; the session logic itself needs no environment
//! beyond platform detection.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::analysis::BlurConvention;
use crate::platform::HostPlatform;

/// Configuration file structure for blur-check.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlatformConfig {
    /// Override the detected host platform ("android" or "ios").
    pub os: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AnalysisConfig {
    /// Numeric native values above this threshold count as blurry.
    pub blur_threshold: Option<f64>,
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// The truthiness convention to hand to the blur detector.
    pub fn convention(&self) -> BlurConvention {
        match self.analysis.blur_threshold {
            Some(threshold) => BlurConvention::with_threshold(threshold),
            None => BlurConvention::default(),
        }
    }

    /// Platform override from the config file, if any.
    ///
    /// Unknown values are ignored with a warning so a stale config file
    /// cannot take the session down.
    pub fn host_platform(&self) -> Option<HostPlatform> {
        let os = self.platform.os.as_deref()?;
        match HostPlatform::from_str(os) {
            Some(platform) => Some(platform),
            None => {
                log::warn!("ignoring unknown platform '{}' in config", os);
                None
            }
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("blur-check/config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/blur-check/config.toml")
        })
}
