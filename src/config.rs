// File: src/config.rs
use crate::card::{CardDesign, LayoutDirection};
use crate::error::{CardError, Result};
use crate::persistence::DEFAULT_RETENTION_DAYS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "kiosk.toml";

/// Upper bound on `retention_days`, about ten years.
pub const MAX_RETENTION_DAYS: i64 = 3650;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    pub store_dir: PathBuf,
    pub retention_days: i64,
    /// How often the kiosk sweeps expired cards, in seconds.
    pub sweep_interval_secs: u64,
    pub share_base_url: String,
    pub default_design: CardDesign,
    pub default_layout: LayoutDirection,
    pub sign_size: u32,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("card_store"),
            retention_days: DEFAULT_RETENTION_DAYS,
            sweep_interval_secs: 60 * 60,
            share_base_url: "http://localhost:3000".to_string(),
            default_design: CardDesign::Minimal,
            default_layout: LayoutDirection::Horizontal,
            sign_size: 12,
        }
    }
}

impl KioskConfig {
    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Reads a config file the operator named explicitly. A missing file is
    /// an error rather than a silent switch to defaults.
    pub fn load_required(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CardError::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// `load_required` for an explicit path, `load` of the default path
    /// otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_required(path),
            None => Self::load(Path::new(DEFAULT_CONFIG_PATH)),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_RETENTION_DAYS).contains(&self.retention_days) {
            return Err(CardError::InvalidConfig {
                message: format!(
                    "retention_days must be between 1 and {MAX_RETENTION_DAYS}, got {}",
                    self.retention_days
                ),
            });
        }
        if self.sweep_interval_secs == 0 {
            return Err(CardError::InvalidConfig {
                message: "sweep_interval_secs must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn retention(&self) -> Result<chrono::Duration> {
        self.validate()?;
        chrono::Duration::try_days(self.retention_days).ok_or_else(|| CardError::InvalidConfig {
            message: format!("retention_days out of range: {}", self.retention_days),
        })
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }
}
