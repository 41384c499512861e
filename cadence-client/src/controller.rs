//! PacerController - the single authority over the pacer.
//!
//! This module provides [`PacerController`], which owns the pure state
//! machine and is the only issuer of audio cue calls.
//!
//! # Architecture
//!
//! The controller runs the pure state machine (from cadence-core) on every
//! tick and forwards the resulting cue actions, in order, to a queue drained
//! by a dedicated dispatch worker task:
//!
//! ```text
//! Driver → PacerController::tick → queue → dispatch worker → AudioCueDispatcher
//!                  ↓
//!          cadence-core (pure state machine)
//!                  ↓
//!          watch<PacerState> → render model
//! ```
//!
//! Ticks never wait for audio. A single FIFO worker means no play can
//! overtake a stop issued before it, on either channel. Only [`shutdown`]
//! and [`flush`] wait for the worker.
//!
//! [`shutdown`]: PacerController::shutdown
//! [`flush`]: PacerController::flush
//!
//! # Example
//!
//! ```ignore
//! use cadence_client::{MockDispatcher, PacerConfig, PacerController};
//!
//! let config = PacerConfig::new(Tempo::from_secs_f64(4.0)?);
//! let mut controller = PacerController::new(config, MockDispatcher::new());
//!
//! controller.tick(Duration::ZERO, Duration::from_secs(4), ControlCommand::Repeat)?;
//! controller.shutdown().await?;
//! ```

use cadence_core::{Action, Pacer, PacerEvent, PacerState};
use cadence_types::{AudioCue, Channel, ControlCommand, CueSet, PacerError, Tempo, Volume};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::dispatch::AudioCueDispatcher;

/// Configuration for PacerController.
#[derive(Debug, Clone)]
pub struct PacerConfig {
    /// Initial half-cycle duration.
    pub tempo: Tempo,
    /// Cues dispatched on phase entry.
    pub cues: CueSet,
}

impl PacerConfig {
    /// Create a configuration with the standard cues at full volume.
    pub fn new(tempo: Tempo) -> Self {
        Self {
            tempo,
            cues: CueSet::default(),
        }
    }

    /// Set the cue volume.
    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.cues.volume = volume;
        self
    }

    /// Set the cue assets.
    pub fn with_assets(mut self, breath_in: &str, breath_out: &str) -> Self {
        self.cues = self.cues.with_assets(breath_in, breath_out);
        self
    }
}

/// Work item for the dispatch worker.
#[derive(Debug)]
enum CueCommand {
    Play(AudioCue),
    Stop(Channel),
    /// Acknowledged once everything queued before it has completed.
    Barrier(oneshot::Sender<()>),
}

/// The pacer controller.
///
/// Owns the state machine, publishes state snapshots and feeds the dispatch
/// worker. Must be created inside a tokio runtime.
pub struct PacerController {
    pacer: Pacer,
    queue: Option<mpsc::UnboundedSender<CueCommand>>,
    worker: Option<JoinHandle<()>>,
    state_tx: watch::Sender<PacerState>,
}

impl PacerController {
    /// Create a new controller in the Idle phase.
    ///
    /// Spawns the dispatch worker. No audio is dispatched until a command
    /// starts the pacer.
    pub fn new<D>(config: PacerConfig, dispatcher: D) -> Self
    where
        D: AudioCueDispatcher + 'static,
    {
        let pacer = Pacer::new(config.tempo, config.cues);
        let (queue, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_dispatch_worker(dispatcher, rx));
        let (state_tx, _) = watch::channel(pacer.state());

        tracing::info!("Pacer initialized (tempo: {})", config.tempo);

        Self {
            pacer,
            queue: Some(queue),
            worker: Some(worker),
            state_tx,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> PacerState {
        self.pacer.state()
    }

    /// Subscribe to state snapshots, published after every tick.
    pub fn subscribe(&self) -> watch::Receiver<PacerState> {
        self.state_tx.subscribe()
    }

    /// Check if the controller still accepts ticks.
    pub fn is_running(&self) -> bool {
        self.queue.is_some()
    }

    /// Advance the pacer by one tick.
    ///
    /// Cue actions are queued for the dispatch worker; this never waits for
    /// audio. Returns the new state.
    ///
    /// # Errors
    ///
    /// - [`PacerError::InvalidState`] after [`shutdown`](Self::shutdown)
    /// - [`PacerError::InvalidTempo`] for a zero tempo (state is unchanged)
    pub fn tick(
        &mut self,
        elapsed: Duration,
        tempo: Duration,
        command: ControlCommand,
    ) -> Result<PacerState, PacerError> {
        let Some(queue) = self.queue.as_ref() else {
            return Err(PacerError::InvalidState);
        };

        let actions = self.pacer.tick(elapsed, tempo, command)?;

        for action in actions {
            let work = match action {
                Action::Play(cue) => {
                    tracing::debug!("Dispatching cue {} on [{}]", cue.asset, cue.channel);
                    CueCommand::Play(cue)
                }
                Action::Stop(channel) => CueCommand::Stop(channel),
                Action::Emit(event) => {
                    log_event(&event);
                    continue;
                }
            };
            if queue.send(work).is_err() {
                tracing::error!("Dispatch worker is gone; cue dropped");
            }
        }

        let state = self.pacer.state();
        self.state_tx.send_replace(state);
        Ok(state)
    }

    /// Wait until every cue queued so far has been dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`PacerError::InvalidState`] after shutdown.
    pub async fn flush(&self) -> Result<(), PacerError> {
        let queue = self.queue.as_ref().ok_or(PacerError::InvalidState)?;
        let (ack, done) = oneshot::channel();
        if queue.send(CueCommand::Barrier(ack)).is_err() {
            return Err(PacerError::InvalidState);
        }
        // A dropped barrier means the worker died; nothing is left to wait on
        let _ = done.await;
        Ok(())
    }

    /// Stop both channels, wait for the stops to complete, then retire the
    /// controller.
    ///
    /// Once this returns, no further cue is dispatched and every later
    /// [`tick`](Self::tick) fails with [`PacerError::InvalidState`].
    ///
    /// # Errors
    ///
    /// Returns [`PacerError::InvalidState`] if already shut down.
    pub async fn shutdown(&mut self) -> Result<(), PacerError> {
        let queue = self.queue.take().ok_or(PacerError::InvalidState)?;

        for channel in Channel::BOTH {
            if queue.send(CueCommand::Stop(channel)).is_err() {
                tracing::error!("Dispatch worker is gone; cannot stop [{}]", channel);
            }
        }
        // Closing the queue lets the worker drain and exit
        drop(queue);

        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                tracing::error!("Dispatch worker failed: {}", e);
            }
        }

        tracing::info!("Pacer shut down");
        Ok(())
    }
}

impl Drop for PacerController {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.take() {
            tracing::warn!("Pacer dropped without shutdown; stopping channels in the background");
            for channel in Channel::BOTH {
                let _ = queue.send(CueCommand::Stop(channel));
            }
        }
    }
}

impl std::fmt::Debug for PacerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacerController")
            .field("state", &self.pacer.state())
            .field("running", &self.is_running())
            .finish()
    }
}

/// Drain the cue queue in order, one call at a time.
///
/// Dispatch failures are logged and skipped. The task exits once the
/// controller closes the queue and everything queued has completed.
async fn run_dispatch_worker<D>(dispatcher: D, mut rx: mpsc::UnboundedReceiver<CueCommand>)
where
    D: AudioCueDispatcher,
{
    while let Some(work) = rx.recv().await {
        match work {
            CueCommand::Play(cue) => {
                if let Err(e) = dispatcher
                    .play(cue.channel, &cue.asset, cue.volume.gain())
                    .await
                {
                    tracing::warn!("Cue dispatch failed on [{}]: {}", cue.channel, e);
                }
            }
            CueCommand::Stop(channel) => {
                if let Err(e) = dispatcher.stop(channel).await {
                    tracing::warn!("Cue stop failed on [{}]: {}", channel, e);
                }
            }
            CueCommand::Barrier(ack) => {
                let _ = ack.send(());
            }
        }
    }
    tracing::debug!("Dispatch worker exiting");
}

fn log_event(event: &PacerEvent) {
    match event {
        PacerEvent::PhaseEntered { phase } => tracing::debug!("Entered {}", phase),
        PacerEvent::Resynchronized { tempo } => {
            tracing::info!("Tempo changed to {}; restarting inhale", tempo)
        }
        PacerEvent::Stopped => tracing::info!("Pacer stopped"),
        PacerEvent::BoundariesSkipped { count } => {
            tracing::warn!("Tick spanned {} uncued phase boundaries", count)
        }
    }
}
