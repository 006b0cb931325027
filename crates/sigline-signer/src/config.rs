//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::primitives::{Gated, Md5Crc32};

/// Signer configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub workers: WorkersConfig,
    pub primitives: PrimitivesConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WorkersConfig {
    /// Threads in the shared worker pool
    pub count: usize,
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            count: sigline_core::default_workers(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PrimitivesConfig {
    /// In-flight digest calls allowed at once (unset = unbounded)
    pub digest_permits: Option<usize>,
    /// In-flight checksum calls allowed at once (unset = unbounded)
    pub checksum_permits: Option<usize>,
    pub digest_delay_ms: u64,
    pub checksum_delay_ms: u64,
}

impl Default for PrimitivesConfig {
    fn default() -> Self {
        // The reference digest tolerates a single caller at a time
        Self {
            digest_permits: Some(1),
            checksum_permits: None,
            digest_delay_ms: 0,
            checksum_delay_ms: 0,
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./sigline.toml (current directory)
    /// 2. ~/.config/sigline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("sigline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "sigline") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.primitives.digest_permits == Some(0) {
            bail!("primitives.digest_permits must be at least 1");
        }
        if self.primitives.checksum_permits == Some(0) {
            bail!("primitives.checksum_permits must be at least 1");
        }
        Ok(())
    }

    /// Stand-in primitives wrapped with the configured gates and latency
    pub fn primitives(&self) -> Gated<Md5Crc32> {
        let p = &self.primitives;
        Gated::new(Md5Crc32)
            .digest_permits(p.digest_permits)
            .checksum_permits(p.checksum_permits)
            .digest_delay(Duration::from_millis(p.digest_delay_ms))
            .checksum_delay(Duration::from_millis(p.checksum_delay_ms))
    }
}
