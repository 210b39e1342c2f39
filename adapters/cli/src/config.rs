//! Run configuration loaded from TOML and overridden from the command line.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use neon_onslaught_core::WeaponKind;
use serde::Deserialize;
use thiserror::Error;

/// How the autopilot spends coins in the shop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ShopPolicy {
    /// Leave the shop immediately.
    Skip,
    /// Only buy health upgrades.
    Health,
    /// Only buy damage upgrades.
    Damage,
    /// Buy health while hurt, damage otherwise.
    #[default]
    Balanced,
}

/// Autopilot tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AutopilotConfig {
    pub(crate) weapon: WeaponKind,
    pub(crate) shop: ShopPolicy,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            weapon: WeaponKind::AssaultRifle,
            shop: ShopPolicy::default(),
        }
    }
}

/// Everything a headless run needs.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunConfig {
    pub(crate) seed: u64,
    pub(crate) frame_ms: u64,
    pub(crate) max_frames: u64,
    pub(crate) save_file: PathBuf,
    pub(crate) autopilot: AutopilotConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            frame_ms: 16,
            max_frames: 60 * 60 * 30,
            save_file: PathBuf::from("neon-onslaught-save.json"),
            autopilot: AutopilotConfig::default(),
        }
    }
}

/// Values that make a run impossible to simulate.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("frame_ms must be positive")]
    ZeroFrameDuration,
    #[error("max_frames must be positive")]
    ZeroFrameBudget,
}

impl RunConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read run config {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid run config {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse run config toml")?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_ms == 0 {
            return Err(ConfigError::ZeroFrameDuration);
        }
        if self.max_frames == 0 {
            return Err(ConfigError::ZeroFrameBudget);
        }
        Ok(())
    }

    pub(crate) fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}
