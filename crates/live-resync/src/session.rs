//! Host media session abstraction.
//!
//! The core never owns the media element; it reads playback state and issues
//! commands through this trait. Implementations wrap a browser media element,
//! a native player, or the simulator's scripted session.

use live_resync_types::MediaSource;

use crate::error::HostCommandError;

pub trait MediaSession {
    fn is_paused(&self) -> bool;
    /// `true` while the host is in the middle of a seek.
    fn is_seeking(&self) -> bool;
    /// Current playback position in seconds.
    fn current_position(&self) -> f64;
    /// Media duration in seconds; for live sources, the end of the seekable range.
    fn duration(&self) -> f64;
    fn is_live_source(&self) -> bool;
    /// Most recent playable position reported by the streaming library, once known.
    fn live_edge_position(&self) -> Option<f64>;

    fn seek_to(&mut self, position: f64) -> Result<(), HostCommandError>;
    fn play(&mut self) -> Result<(), HostCommandError>;
    fn pause(&mut self) -> Result<(), HostCommandError>;
    fn load_source(&mut self, source: &MediaSource) -> Result<(), HostCommandError>;
}
