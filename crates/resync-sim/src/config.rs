//! Configuration loading for the simulator.
//!
//! Resolution order: built-in defaults (or the DVR preset), then the optional
//! config file, then command-line overrides. Every layer goes through the
//! core's validation, so a bad value in any of them is rejected the same way.

use std::path::Path;

use anyhow::{Context, Result};
use live_resync::{ConfigUpdate, ResyncConfig};
use serde::Deserialize;

use crate::cli::Args;

/// Top-level simulator config loaded from TOML.
#[derive(Debug, Default, Deserialize)]
pub struct SimConfig {
    /// Resync tuning overrides.
    pub resync: Option<ConfigUpdate>,
}

impl SimConfig {
    /// Load configuration from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            std::fs::read_to_string(path).with_context(|| format!("read config {:?}", path))?;
        Self::parse(&raw).with_context(|| format!("parse config {:?}", path))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str::<SimConfig>(raw)?)
    }
}

/// Command-line overrides as a partial update.
pub fn overrides_from_args(args: &Args) -> ConfigUpdate {
    ConfigUpdate {
        resync_threshold_ms: args.resync_threshold_ms,
        retention_window_ms: args.retention_window_ms,
        live_indicator_duration_ms: args.indicator_ms,
    }
}

/// Build the effective configuration from the preset, file and overrides.
pub fn resolve_config(
    dvr: bool,
    file: Option<&SimConfig>,
    overrides: &ConfigUpdate,
) -> Result<ResyncConfig> {
    let mut cfg = if dvr {
        ResyncConfig::dvr()
    } else {
        ResyncConfig::default()
    };
    if let Some(update) = file.and_then(|f| f.resync.as_ref()) {
        cfg = cfg.merged(update).context("apply [resync] from config file")?;
    }
    if !overrides.is_empty() {
        cfg = cfg
            .merged(overrides)
            .context("apply command-line overrides")?;
    }
    Ok(cfg)
}

/// Resolve configuration for the parsed command line.
pub fn config_from_args(args: &Args) -> Result<ResyncConfig> {
    let file = args.config.as_deref().map(SimConfig::load).transpose()?;
    resolve_config(args.dvr, file.as_ref(), &overrides_from_args(args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_preset() {
        let file = SimConfig::parse(
            r#"
            [resync]
            resync_threshold_ms = 600000
            "#,
        )
        .unwrap();
        let cfg = resolve_config(true, Some(&file), &ConfigUpdate::default()).unwrap();
        assert_eq!(cfg.resync_threshold_ms, 600_000);
        assert_eq!(cfg.retention_window_ms, 1_800_000);
    }

    #[test]
    fn command_line_wins_over_file() {
        let file = SimConfig::parse(
            r#"
            [resync]
            live_indicator_duration_ms = 5000
            "#,
        )
        .unwrap();
        let overrides = ConfigUpdate {
            live_indicator_duration_ms: Some(1_000),
            ..ConfigUpdate::default()
        };
        let cfg = resolve_config(false, Some(&file), &overrides).unwrap();
        assert_eq!(cfg.live_indicator_duration_ms, 1_000);
        assert_eq!(cfg.resync_threshold_ms, 120_000);
    }

    #[test]
    fn negative_override_is_rejected() {
        let overrides = ConfigUpdate {
            retention_window_ms: Some(-1),
            ..ConfigUpdate::default()
        };
        let err = resolve_config(false, None, &overrides).unwrap_err();
        assert!(format!("{err:#}").contains("retention_window_ms"));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let file = SimConfig::parse("").unwrap();
        let cfg = resolve_config(false, Some(&file), &ConfigUpdate::default()).unwrap();
        assert_eq!(cfg, ResyncConfig::default());
    }
}
