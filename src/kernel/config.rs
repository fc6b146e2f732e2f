use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::escalation::DEFAULT_COUNTDOWN_SECS;
use super::time::Millis;
use crate::sensors::classifier::{DEFAULT_COOLDOWN_MS, DEFAULT_IMPACT_THRESHOLD};

pub const CONFIG_ENV: &str = "CRASHGUARD_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// m/s². Magnitudes strictly above this are impacts.
    pub impact_threshold: f64,
    pub cooldown_ms: Millis,
    pub countdown_secs: u32,
    pub countdown_tick_ms: u64,
    /// Play the siren while the confirmation screen is up.
    pub siren_enabled: bool,
    pub queue_capacity: usize,
    /// Where profile and contacts are persisted. In-memory when unset.
    pub store_dir: Option<PathBuf>,
    pub namespace: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            impact_threshold: DEFAULT_IMPACT_THRESHOLD,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            countdown_tick_ms: 1_000,
            siren_enabled: true,
            queue_capacity: 100,
            store_dir: None,
            namespace: "crashguard".to_string(),
        }
    }
}

impl GuardConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GuardConfig = serde_json::from_str(json).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Reads the file named by `CRASHGUARD_CONFIG`, or returns defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.impact_threshold.is_finite() && self.impact_threshold > 0.0) {
            bail!("impact_threshold must be a positive number, got {}", self.impact_threshold);
        }
        if self.cooldown_ms < 0 {
            bail!("cooldown_ms must not be negative");
        }
        if self.countdown_secs == 0 {
            bail!("countdown_secs must be at least 1");
        }
        if self.countdown_tick_ms == 0 {
            bail!("countdown_tick_ms must be at least 1");
        }
        if self.queue_capacity == 0 {
            bail!("queue_capacity must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            GuardConfig::from_json_str(r#"{ "countdown_secs": 30, "siren_enabled": false }"#)
                .expect("valid config");
        assert_eq!(config.countdown_secs, 30);
        assert!(!config.siren_enabled);
        assert_eq!(config.impact_threshold, 25.0);
        assert_eq!(config.cooldown_ms, 2_000);
    }

    #[test]
    fn rejects_zero_countdown() {
        assert!(GuardConfig::from_json_str(r#"{ "countdown_secs": 0 }"#).is_err());
        assert!(GuardConfig::from_json_str(r#"{ "impact_threshold": -1.0 }"#).is_err());
    }
}
