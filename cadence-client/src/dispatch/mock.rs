//! Mock dispatcher for testing.
//!
//! Records every call, tracks what each channel is playing, and can be told
//! to fail or to complete stops slowly.

use super::{AudioCueDispatcher, DispatchError};
use async_trait::async_trait;
use cadence_types::Channel;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A call received by [`MockDispatcher`], in the order it was issued.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchCall {
    /// `play()` was called.
    Play {
        /// Target channel.
        channel: Channel,
        /// Asset identifier.
        asset: String,
        /// Linear gain.
        gain: f32,
    },
    /// `stop()` was called.
    Stop(Channel),
}

/// Mock dispatcher for testing.
///
/// Clones share state, so a test can keep one clone while the controller owns
/// another.
#[derive(Debug, Default)]
pub struct MockDispatcher {
    inner: Arc<Mutex<MockDispatcherInner>>,
}

#[derive(Debug, Default)]
struct MockDispatcherInner {
    calls: Vec<DispatchCall>,
    playing_in: Option<String>,
    playing_out: Option<String>,
    fail_next_play: Option<String>,
    fail_next_stop: Option<String>,
    stop_delay: Option<Duration>,
    device_missing: bool,
}

impl MockDispatcherInner {
    fn slot(&mut self, channel: Channel) -> &mut Option<String> {
        match channel {
            Channel::In => &mut self.playing_in,
            Channel::Out => &mut self.playing_out,
        }
    }
}

impl MockDispatcher {
    /// Create a new mock dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all calls, in issue order.
    pub fn calls(&self) -> Vec<DispatchCall> {
        let inner = self.inner.lock().unwrap();
        inner.calls.clone()
    }

    /// Get the channels of all `play()` calls, in issue order.
    pub fn played_channels(&self) -> Vec<Channel> {
        let inner = self.inner.lock().unwrap();
        inner
            .calls
            .iter()
            .filter_map(|call| match call {
                DispatchCall::Play { channel, .. } => Some(*channel),
                DispatchCall::Stop(_) => None,
            })
            .collect()
    }

    /// Get the asset currently playing on a channel.
    pub fn playing(&self, channel: Channel) -> Option<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.slot(channel).clone()
    }

    /// Check whether a channel is playing.
    pub fn is_playing(&self, channel: Channel) -> bool {
        self.playing(channel).is_some()
    }

    /// Cause the next play() to fail with the given error.
    pub fn fail_next_play(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_play = Some(error.to_string());
    }

    /// Cause the next stop() to fail with the given error.
    pub fn fail_next_stop(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_stop = Some(error.to_string());
    }

    /// Simulate the output device going away (or coming back).
    ///
    /// While unavailable, every call fails with
    /// [`DispatchError::DeviceUnavailable`].
    pub fn set_device_available(&self, available: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.device_missing = !available;
    }

    /// Make every stop() take `delay` before the channel goes silent.
    pub fn set_stop_delay(&self, delay: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.stop_delay = Some(delay);
    }

    /// Clear all state (calls, channels, forced failures).
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockDispatcherInner::default();
    }
}

impl Clone for MockDispatcher {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl AudioCueDispatcher for MockDispatcher {
    async fn play(&self, channel: Channel, asset: &str, gain: f32) -> Result<(), DispatchError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(DispatchCall::Play {
            channel,
            asset: asset.to_string(),
            gain,
        });

        if inner.device_missing {
            return Err(DispatchError::DeviceUnavailable("device busy".to_string()));
        }

        // Check for forced failure
        if let Some(error) = inner.fail_next_play.take() {
            return Err(DispatchError::PlaybackFailed(error));
        }

        *inner.slot(channel) = Some(asset.to_string());
        Ok(())
    }

    async fn stop(&self, channel: Channel) -> Result<(), DispatchError> {
        let delay = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(DispatchCall::Stop(channel));

            if inner.device_missing {
                return Err(DispatchError::DeviceUnavailable("device busy".to_string()));
            }

            // Check for forced failure
            if let Some(error) = inner.fail_next_stop.take() {
                return Err(DispatchError::StopFailed(error));
            }
            inner.stop_delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.lock().unwrap();
        *inner.slot(channel) = None;
        Ok(())
    }
}
