//! # cadence-core
//!
//! Pure logic for cadence (no I/O, instant tests).
//!
//! This crate implements the pacer state machine and the render model
//! without any audio, timer or terminal I/O, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about phase transitions
//!
//! The actual audio dispatch and timing are performed by `cadence-client`,
//! which interprets the actions produced by [`Pacer::tick`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod render;
pub mod state;
pub mod theme;

pub use clock::HalfCycleClock;
pub use render::{display_text, radius, RenderFrame, RADIUS_MAX, RADIUS_MIN};
pub use state::{Action, Motion, Pacer, PacerEvent, PacerState};
pub use theme::Theme;
