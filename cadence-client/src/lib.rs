//! # cadence-client
//!
//! Pacer controller for cadence.
//!
//! This is the library that applications use to run a breathing exercise.
//!
//! ## Features
//!
//! - **Pure State Machine**: Uses cadence-core for side-effect-free phase logic
//! - **Dispatcher Abstraction**: Pluggable audio port (logging, mock)
//! - **Ordered Dispatch**: One FIFO worker issues every cue, so no play
//!   overtakes an earlier stop
//! - **Safe Teardown**: `shutdown` waits until both channels are silent
//!
//! ## Example
//!
//! ```ignore
//! use cadence_client::{spawn_pacer_loop, DriverInputs, LoggingDispatcher, PacerConfig, PacerController};
//!
//! let controller = PacerController::new(PacerConfig::new(tempo), LoggingDispatcher::new());
//! let pacer_loop = spawn_pacer_loop(controller, inputs, Duration::from_millis(33));
//!
//! // ... later
//! let final_state = pacer_loop.stop().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod controller;
pub mod dispatch;
pub mod driver;

pub use controller::{PacerConfig, PacerController};
pub use dispatch::{
    AudioCueDispatcher, DispatchCall, DispatchError, LoggingDispatcher, MockDispatcher,
};
pub use driver::{spawn_pacer_loop, DriverError, DriverInputs, PacerLoop, MIN_FRAME_INTERVAL};
