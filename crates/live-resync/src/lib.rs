//! Live-edge resync core for a media player front end.
//!
//! Tracks viewer pauses, decides on resume whether a live source should jump
//! back to its live edge, and keeps a time-windowed history of consumed
//! segments that is discarded on every such jump. The host media element is
//! reached only through [`session::MediaSession`].

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod indicator;
pub mod segment_buffer;
pub mod session;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigUpdate, ResyncConfig};
pub use controller::{EventOutcome, ResyncController};
pub use error::{HostCommandError, ResyncError};
pub use events::{SessionEvent, SessionEvents, Subscription};
pub use session::MediaSession;
pub use live_resync_types::{
    LiveJump, MediaSource, PauseState, ResumeOutcome, ResyncStatus, SourceKind,
};
