//! Resync thresholds, retention window and indicator timing, with validated partial updates.

use serde::{Deserialize, Serialize};

use crate::error::{ResyncError, Result};

/// Pause longer than this triggers a live-edge jump (2 minutes).
pub const DEFAULT_RESYNC_THRESHOLD_MS: u64 = 120_000;
/// Threshold used by DVR-style deployments (30 minutes).
pub const DVR_RESYNC_THRESHOLD_MS: u64 = 1_800_000;
/// Segment history retained behind the playhead (30 minutes).
pub const DEFAULT_RETENTION_WINDOW_MS: u64 = 1_800_000;
/// How long the live indicator stays visible after a jump.
pub const DEFAULT_LIVE_INDICATOR_MS: u64 = 3_000;

/// Tuning parameters for pause resync, segment retention and the live indicator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResyncConfig {
    /// Pause duration above which resuming a live source jumps to the live edge.
    pub resync_threshold_ms: u64,
    /// Maximum age of buffered segment records, measured in playback time.
    pub retention_window_ms: u64,
    /// Display time of the transient live indicator.
    pub live_indicator_duration_ms: u64,
}

impl Default for ResyncConfig {
    fn default() -> Self {
        Self {
            resync_threshold_ms: DEFAULT_RESYNC_THRESHOLD_MS,
            retention_window_ms: DEFAULT_RETENTION_WINDOW_MS,
            live_indicator_duration_ms: DEFAULT_LIVE_INDICATOR_MS,
        }
    }
}

impl ResyncConfig {
    /// Preset where the resync threshold matches the 30-minute retention window.
    pub fn dvr() -> Self {
        Self {
            resync_threshold_ms: DVR_RESYNC_THRESHOLD_MS,
            ..Self::default()
        }
    }

    /// Return a copy with `update` applied, or the first invalid field.
    ///
    /// Every field is validated before anything is applied, so a rejected
    /// update never leaves a half-applied configuration behind.
    pub fn merged(&self, update: &ConfigUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(value) = update.resync_threshold_ms {
            next.resync_threshold_ms = positive("resync_threshold_ms", value)?;
        }
        if let Some(value) = update.retention_window_ms {
            next.retention_window_ms = positive("retention_window_ms", value)?;
        }
        if let Some(value) = update.live_indicator_duration_ms {
            next.live_indicator_duration_ms = positive("live_indicator_duration_ms", value)?;
        }
        Ok(next)
    }
}

/// Partial configuration as supplied by the host layer.
///
/// Values are signed so that negative input reaches validation instead of
/// being silently wrapped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    pub resync_threshold_ms: Option<i64>,
    pub retention_window_ms: Option<i64>,
    pub live_indicator_duration_ms: Option<i64>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self.resync_threshold_ms.is_none()
            && self.retention_window_ms.is_none()
            && self.live_indicator_duration_ms.is_none()
    }
}

fn positive(field: &'static str, value: i64) -> Result<u64> {
    if value <= 0 {
        return Err(ResyncError::InvalidConfig { field, value });
    }
    Ok(value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_player() {
        let cfg = ResyncConfig::default();
        assert_eq!(cfg.resync_threshold_ms, 120_000);
        assert_eq!(cfg.retention_window_ms, 1_800_000);
        assert_eq!(cfg.live_indicator_duration_ms, 3_000);
        assert_eq!(ResyncConfig::dvr().resync_threshold_ms, 1_800_000);
    }

    #[test]
    fn merged_applies_only_present_fields() {
        let cfg = ResyncConfig::default();
        let next = cfg
            .merged(&ConfigUpdate {
                retention_window_ms: Some(60_000),
                ..ConfigUpdate::default()
            })
            .unwrap();
        assert_eq!(next.retention_window_ms, 60_000);
        assert_eq!(next.resync_threshold_ms, cfg.resync_threshold_ms);
    }

    #[test]
    fn merged_rejects_zero_and_negative_values() {
        let cfg = ResyncConfig::default();
        let err = cfg
            .merged(&ConfigUpdate {
                resync_threshold_ms: Some(0),
                ..ConfigUpdate::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            ResyncError::InvalidConfig {
                field: "resync_threshold_ms",
                value: 0
            }
        ));

        let err = cfg
            .merged(&ConfigUpdate {
                resync_threshold_ms: Some(5_000),
                live_indicator_duration_ms: Some(-1),
                ..ConfigUpdate::default()
            })
            .unwrap_err();
        assert!(matches!(err, ResyncError::InvalidConfig { value: -1, .. }));
    }

    #[test]
    fn config_deserializes_with_missing_fields() {
        let cfg: ResyncConfig = serde_json::from_str(r#"{"resync_threshold_ms": 5000}"#).unwrap();
        assert_eq!(cfg.resync_threshold_ms, 5_000);
        assert_eq!(cfg.retention_window_ms, DEFAULT_RETENTION_WINDOW_MS);
    }
}
