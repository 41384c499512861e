//! # cadence-types
//!
//! Value types for the cadence breathing pacer.
//!
//! This crate provides the foundational types used across all cadence crates:
//! - [`Tempo`], [`Volume`] - Validated scalar settings
//! - [`Phase`], [`ControlCommand`] - Pacer phase and the external control signal
//! - [`Channel`], [`AudioCue`], [`CueSet`] - Audio cue addressing
//! - [`PacerError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod command;
mod cue;
mod error;
mod tempo;

pub use command::{ControlCommand, Phase};
pub use cue::{AudioCue, Channel, CueSet, BREATH_IN_ASSET, BREATH_OUT_ASSET};
pub use error::PacerError;
pub use tempo::{Tempo, Volume};
