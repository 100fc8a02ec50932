//! Error types for the resync core.

use thiserror::Error;

/// Result type for resync core operations.
pub type Result<T> = std::result::Result<T, ResyncError>;

/// Failure reported by the host media session for a command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostCommandError {
    /// The host refused or failed to carry out the command.
    #[error("host rejected {command}: {reason}")]
    Rejected {
        command: &'static str,
        reason: String,
    },
    /// No media element is attached.
    #[error("host media session is offline")]
    Offline,
}

impl HostCommandError {
    pub fn rejected(command: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            command,
            reason: reason.into(),
        }
    }
}

/// Error type for resync core operations.
#[derive(Debug, Error)]
pub enum ResyncError {
    /// A configuration value was zero or negative; the previous configuration stays in effect.
    #[error("invalid configuration: {field} must be positive, got {value}")]
    InvalidConfig { field: &'static str, value: i64 },

    /// Neither the live edge nor the media duration gave a finite seek target.
    #[error("no finite seek target (got {target})")]
    NonFiniteSeekTarget { target: f64 },

    /// A host command failed; local state was left as it was before the command.
    #[error(transparent)]
    HostCommand(#[from] HostCommandError),
}
