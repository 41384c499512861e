//! Audio cue dispatch abstraction for cadence.
//!
//! This module provides a pluggable port to whatever actually produces
//! sound (an audio engine, a platform player, a mock for testing).
//!
//! # Design
//!
//! The dispatcher trait is async and channel-oriented:
//! - `play()` starts an asset on a channel, superseding what was playing there
//! - `stop()` silences a channel, and is a no-op on a silent channel
//!
//! Calls may complete asynchronously, but an implementation must never
//! reorder calls made in sequence on the same channel. The controller issues
//! every call from a single worker task, in order.
//!
//! # Example
//!
//! ```ignore
//! let dispatcher = MockDispatcher::new();
//! dispatcher.play(Channel::In, "breath-in", 0.8).await?;
//! dispatcher.stop(Channel::In).await?;
//! ```

mod logging;
mod mock;

pub use logging::LoggingDispatcher;
pub use mock::{DispatchCall, MockDispatcher};

use async_trait::async_trait;
use cadence_types::Channel;
use thiserror::Error;

/// Cue dispatch errors.
///
/// These never escape the controller: they are logged and the pacer keeps
/// going.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Playback could not start.
    #[error("playback failed: {0}")]
    PlaybackFailed(String),

    /// Playback could not be stopped.
    #[error("stop failed: {0}")]
    StopFailed(String),

    /// The output device is busy or missing.
    #[error("audio device not available: {0}")]
    DeviceUnavailable(String),
}

/// Port trait for audio cue playback.
///
/// Implementations handle the underlying audio engine.
#[async_trait]
pub trait AudioCueDispatcher: Send + Sync {
    /// Start `asset` on `channel` at `gain` (0.0-1.0).
    ///
    /// Whatever was playing on `channel` is stopped first. Calling this on a
    /// stopped channel is fine.
    async fn play(&self, channel: Channel, asset: &str, gain: f32) -> Result<(), DispatchError>;

    /// Stop whatever is playing on `channel`.
    ///
    /// Idempotent: stopping a silent channel succeeds.
    async fn stop(&self, channel: Channel) -> Result<(), DispatchError>;
}
