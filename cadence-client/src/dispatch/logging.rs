//! Dispatcher that only logs.
//!
//! Used by the CLI, which has no audio engine: each cue shows up as a
//! tracing event instead of a sound.

use super::{AudioCueDispatcher, DispatchError};
use async_trait::async_trait;
use cadence_types::Channel;

/// Dispatcher that reports cues through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDispatcher;

impl LoggingDispatcher {
    /// Create a new logging dispatcher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioCueDispatcher for LoggingDispatcher {
    async fn play(&self, channel: Channel, asset: &str, gain: f32) -> Result<(), DispatchError> {
        tracing::info!("cue [{}] {} (gain {:.2})", channel, asset, gain);
        Ok(())
    }

    async fn stop(&self, channel: Channel) -> Result<(), DispatchError> {
        tracing::debug!("cue [{}] stopped", channel);
        Ok(())
    }
}
