//! Error types for cadence.

use thiserror::Error;

/// Errors reported to callers of the pacer.
///
/// Audio dispatch failures are deliberately absent: they are logged where
/// they happen and never cross the controller boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PacerError {
    /// Tempo was zero, negative or not a finite number of seconds.
    #[error("invalid tempo: {secs}s (must be a positive duration)")]
    InvalidTempo {
        /// The rejected value, in seconds.
        secs: f64,
    },

    /// Volume outside the 0-100 range.
    #[error("invalid volume: {0} (must be 0-100)")]
    InvalidVolume(u32),

    /// Operation invoked after the controller was shut down.
    #[error("pacer has been shut down")]
    InvalidState,

    /// Text that does not name a control command.
    #[error("unknown control command: {0}")]
    UnknownCommand(String),

    /// Text that does not name a phase.
    #[error("unknown phase: {0}")]
    UnknownPhase(String),
}
