//! Scenario files: a source description plus a timeline of host actions.

use std::path::Path;

use anyhow::{Context, Result, bail};
use live_resync::{MediaSource, SourceKind};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub source: SourceSpec,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Initial source handed to the simulated media element.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpec {
    pub url: String,
    /// Overrides extension-based classification.
    pub kind: Option<SourceKind>,
    /// End of the seekable range, in seconds.
    #[serde(default)]
    pub duration: f64,
    /// Live edge reported by the streaming library, if already known.
    pub live_edge: Option<f64>,
}

impl SourceSpec {
    pub fn media_source(&self) -> MediaSource {
        media_source(&self.url, self.kind)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Wall-clock time of the step, in ms from scenario start.
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Viewer pauses.
    Pause,
    /// Host pauses as part of a seek.
    SeekPause,
    /// Viewer resumes.
    Play,
    /// Time update carrying one consumed segment.
    Tick {
        position: f64,
        segment: Option<String>,
    },
    /// Time updates at `from..=to` every `step` seconds.
    Ticks { from: f64, to: f64, step: f64 },
    /// Streaming library reports a new live edge (or loses it).
    SetLiveEdge { position: Option<f64> },
    /// The host rejects the next seek command.
    FailNextSeek,
    /// Viewer presses "go live".
    JumpLive,
    /// A new source is loaded.
    Load {
        url: String,
        kind: Option<SourceKind>,
    },
    Ended,
    Error { message: String },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Pause => "pause",
            Action::SeekPause => "seek_pause",
            Action::Play => "play",
            Action::Tick { .. } => "tick",
            Action::Ticks { .. } => "ticks",
            Action::SetLiveEdge { .. } => "set_live_edge",
            Action::FailNextSeek => "fail_next_seek",
            Action::JumpLive => "jump_live",
            Action::Load { .. } => "load",
            Action::Ended => "ended",
            Action::Error { .. } => "error",
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            std::fs::read_to_string(path).with_context(|| format!("read scenario {:?}", path))?;
        Self::parse(&raw).with_context(|| format!("parse scenario {:?}", path))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let scenario = toml::from_str::<Scenario>(raw)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        let mut last = 0;
        for (idx, step) in self.steps.iter().enumerate() {
            if step.at_ms < last {
                bail!(
                    "step {idx} ({}) at {} ms is earlier than the previous step at {last} ms",
                    step.action.name(),
                    step.at_ms
                );
            }
            last = step.at_ms;
            if let Action::Ticks { from, to, step: every } = &step.action {
                if !(every.is_finite() && *every > 0.0) || to < from {
                    bail!("step {idx} (ticks) needs from <= to and a positive step");
                }
            }
        }
        Ok(())
    }
}

/// Build a source from a URL and an optional explicit kind.
pub fn media_source(url: &str, kind: Option<SourceKind>) -> MediaSource {
    match kind {
        Some(SourceKind::File) => MediaSource::file(url),
        Some(kind) => MediaSource {
            kind,
            ..MediaSource::stream(url)
        },
        None => MediaSource::from_url(url),
    }
}

/// Positions produced by a `ticks` step.
pub fn tick_positions(from: f64, to: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = ((to - from) / step).floor() as u64;
    (0..=count).map(move |i| from + step * i as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [source]
        url = "https://cdn.example.com/live/channel/index.m3u8/"
        duration = 3600.0
        live_edge = 500.0

        [[steps]]
        at_ms = 0
        action = "tick"
        position = 10.0

        [[steps]]
        at_ms = 1000
        action = "pause"

        [[steps]]
        at_ms = 122000
        action = "play"

        [[steps]]
        at_ms = 123000
        action = "load"
        url = "clip.mp4"
    "#;

    #[test]
    fn parses_source_and_steps() {
        let scenario = Scenario::parse(SAMPLE).unwrap();
        let source = scenario.source.media_source();
        assert_eq!(source.url, "https://cdn.example.com/live/channel/index.m3u8");
        assert_eq!(source.kind, SourceKind::Hls);
        assert_eq!(scenario.source.live_edge, Some(500.0));
        assert_eq!(scenario.steps.len(), 4);
        assert_eq!(
            scenario.steps[0].action,
            Action::Tick {
                position: 10.0,
                segment: None
            }
        );
        assert_eq!(scenario.steps[2].action, Action::Play);
        assert_eq!(
            scenario.steps[3].action,
            Action::Load {
                url: "clip.mp4".to_string(),
                kind: None
            }
        );
    }

    #[test]
    fn rejects_out_of_order_steps() {
        let raw = r#"
            [source]
            url = "a.m3u8"

            [[steps]]
            at_ms = 5000
            action = "pause"

            [[steps]]
            at_ms = 1000
            action = "play"
        "#;
        let err = Scenario::parse(raw).unwrap_err();
        assert!(err.to_string().contains("earlier than the previous step"));
    }

    #[test]
    fn rejects_non_positive_tick_step() {
        let raw = r#"
            [source]
            url = "a.m3u8"

            [[steps]]
            at_ms = 0
            action = "ticks"
            from = 0.0
            to = 10.0
            step = 0.0
        "#;
        assert!(Scenario::parse(raw).is_err());
    }

    #[test]
    fn explicit_kind_overrides_extension() {
        let source = media_source("https://cdn.example.com/live/channel", Some(SourceKind::Dash));
        assert_eq!(source.kind, SourceKind::Dash);
        let file = media_source("https://cdn.example.com/index.m3u8", Some(SourceKind::File));
        assert!(!file.is_live());
    }

    #[test]
    fn tick_positions_include_both_ends() {
        let positions: Vec<f64> = tick_positions(0.0, 30.0, 10.0).collect();
        assert_eq!(positions, vec![0.0, 10.0, 20.0, 30.0]);
    }
}
