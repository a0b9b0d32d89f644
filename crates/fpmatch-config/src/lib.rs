// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::Path;

use anyhow::{ensure, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Histogram alignment followed by diversity-weighted bit error.
    #[default]
    Score,
    /// Brute-force bitwise cross correlation.
    Correlate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub algorithm: Algorithm,
    /// Offset window in frames; `0` leaves alignment voting unbounded.
    pub max_offset: i32,
    /// Duplicate cutoff, and the early-exit threshold for correlation.
    pub threshold: f32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Score,
            max_offset: 80,
            threshold: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub matching: MatchingConfig,
    pub telemetry: TelemetryConfig,
}

/// Load configuration from defaults, optional TOML file, and environment overrides (prefix: FPMATCH_).
pub fn load(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("FPMATCH_").split("__"));

    let config: AppConfig = figment.extract()?;
    ensure!(
        config.matching.threshold.is_finite(),
        "matching.threshold must be a finite number"
    );
    info!(target: "config", "configuration loaded");
    Ok(config)
}
