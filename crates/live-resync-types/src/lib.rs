use serde::{Deserialize, Serialize};

/// Kind of media source loaded into a player session.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// HLS playlist (`.m3u8`), played as a live stream.
    Hls,
    /// DASH manifest (`.mpd`), played as a live stream.
    Dash,
    /// Progressive file (MP4 or a local blob picked by the viewer).
    File,
}

impl SourceKind {
    /// `true` for sources that have a moving live edge.
    pub fn is_live(self) -> bool {
        matches!(self, SourceKind::Hls | SourceKind::Dash)
    }

    /// Classify a URL by its path extension, ignoring query and fragment.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let path = path.trim_end_matches('/').to_ascii_lowercase();
        if path.ends_with(".m3u8") {
            SourceKind::Hls
        } else if path.ends_with(".mpd") {
            SourceKind::Dash
        } else {
            SourceKind::File
        }
    }
}

/// A source handed to the host media element.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaSource {
    /// Normalized source URL.
    pub url: String,
    /// Source classification.
    pub kind: SourceKind,
}

impl MediaSource {
    /// Build a source from a URL, classifying it by extension.
    pub fn from_url(url: &str) -> Self {
        let url = normalize_stream_url(url);
        let kind = SourceKind::from_url(&url);
        Self { url, kind }
    }

    /// Build a live stream source. URLs without a recognized manifest
    /// extension are treated as HLS.
    pub fn stream(url: &str) -> Self {
        let url = normalize_stream_url(url);
        let kind = match SourceKind::from_url(&url) {
            SourceKind::Dash => SourceKind::Dash,
            _ => SourceKind::Hls,
        };
        Self { url, kind }
    }

    /// Build a file source (MP4 path or object URL).
    pub fn file(url: &str) -> Self {
        Self {
            url: url.trim().to_string(),
            kind: SourceKind::File,
        }
    }

    pub fn is_live(&self) -> bool {
        self.kind.is_live()
    }
}

/// Trim whitespace and trailing `/` from a stream URL.
///
/// Stream-URL endpoints hand out URLs with a trailing slash which the
/// streaming library does not resolve.
pub fn normalize_stream_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Pause-tracking state of a session.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PauseState {
    /// No pause recorded.
    #[default]
    Playing,
    /// Viewer-initiated pause started at this wall-clock time (ms since epoch).
    Paused { started_at_ms: u64 },
}

/// Result of a live-edge jump issued to the host.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LiveJump {
    /// Position (seconds) the host was asked to seek to.
    pub target_position: f64,
    /// Number of buffered segment records discarded after the seek.
    pub flushed_segments: usize,
    /// Wall-clock time (ms) at which the live indicator hides.
    pub indicator_hide_at_ms: u64,
}

/// What happened when playback resumed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResumeOutcome {
    /// Resume arrived without a recorded pause; nothing was evaluated.
    NoPauseRecorded,
    /// Source is not live; resync never applies.
    NotLive { paused_ms: u64 },
    /// Pause was not longer than the resync threshold.
    WithinThreshold { paused_ms: u64, threshold_ms: u64 },
    /// Resync was due but the host had no live edge yet.
    LiveEdgeUnavailable { paused_ms: u64 },
    /// Player was moved to the live edge.
    Resynced { paused_ms: u64, jump: LiveJump },
}

impl ResumeOutcome {
    /// `true` when a seek to the live edge was issued.
    pub fn resynced(&self) -> bool {
        matches!(self, ResumeOutcome::Resynced { .. })
    }
}

/// Point-in-time view of the resync core, for UI layers and tests.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ResyncStatus {
    /// Currently loaded source, if any.
    pub source: Option<MediaSource>,
    /// Pause-tracking state.
    pub pause: PauseState,
    /// `true` between a recorded pause and the resume-time decision.
    pub resync_pending: bool,
    /// Number of retained segment records.
    pub buffered_segments: usize,
    /// Capture position (seconds) of the oldest retained record.
    pub oldest_position: Option<f64>,
    /// Capture position (seconds) of the newest retained record.
    pub newest_position: Option<f64>,
    /// Span of retained history in milliseconds.
    pub history_ms: u64,
    /// Whether the live indicator is currently shown.
    pub live_indicator_visible: bool,
    /// When the pending indicator timer fires, if one is outstanding.
    pub indicator_hide_at_ms: Option<u64>,
    /// Effective resync threshold.
    pub resync_threshold_ms: u64,
    /// Effective retention window.
    pub retention_window_ms: u64,
}
