//! Frame loop that drives a [`PacerController`].
//!
//! The loop ticks at a fixed frame rate, measuring the real time between
//! ticks and sampling the latest control command and tempo from `watch`
//! channels. Inputs are level-triggered: the loop passes the current value
//! every frame and the pacer ignores repeats.

use cadence_core::PacerState;
use cadence_types::{ControlCommand, PacerError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::controller::PacerController;

/// Shortest frame interval the loop accepts.
pub const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// Errors from the pacer loop.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The controller rejected an operation.
    #[error("pacer error: {0}")]
    Pacer(#[from] PacerError),

    /// The loop task panicked or was cancelled.
    #[error("pacer loop failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Level-triggered inputs sampled on every frame.
#[derive(Debug, Clone)]
pub struct DriverInputs {
    /// Current control command.
    pub command: watch::Receiver<ControlCommand>,
    /// Current half-cycle duration.
    pub tempo: watch::Receiver<Duration>,
}

/// Handle to a running pacer loop.
#[derive(Debug)]
pub struct PacerLoop {
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<PacerState, PacerError>>,
}

impl PacerLoop {
    /// Stop the loop, shut the controller down and return its final state.
    ///
    /// Returns only after both audio channels have been stopped.
    pub async fn stop(mut self) -> Result<PacerState, DriverError> {
        if let Some(shutdown) = self.shutdown.take() {
            // The loop may already have exited on its own
            let _ = shutdown.send(());
        }
        Ok(self.handle.await??)
    }
}

/// Spawn the frame loop.
///
/// Takes ownership of the controller. A rejected tempo is logged and the
/// frame skipped; the loop keeps running so the driver can correct it.
pub fn spawn_pacer_loop(
    mut controller: PacerController,
    inputs: DriverInputs,
    frame_interval: Duration,
) -> PacerLoop {
    let frame_interval = frame_interval.max(MIN_FRAME_INTERVAL);
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        tracing::info!("Pacer loop started (frame interval: {:?})", frame_interval);

        let mut timer = interval(frame_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_frame = tokio::time::Instant::now();

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                now = timer.tick() => {
                    let elapsed = now.saturating_duration_since(last_frame);
                    last_frame = now;

                    let command = *inputs.command.borrow();
                    let tempo = *inputs.tempo.borrow();
                    match controller.tick(elapsed, tempo, command) {
                        Ok(_) => {}
                        Err(PacerError::InvalidTempo { secs }) => {
                            tracing::warn!("Ignoring frame with invalid tempo {}s", secs);
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        let state = controller.state();
        controller.shutdown().await?;
        tracing::info!("Pacer loop stopped in {}", state.phase);
        Ok::<_, PacerError>(state)
    });

    PacerLoop {
        shutdown: Some(shutdown_tx),
        handle,
    }
}
