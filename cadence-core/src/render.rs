//! Render model: what the presentation layer draws.
//!
//! Pure functions from a [`PacerState`] snapshot to a circle radius and from
//! raw overlay text to display text. Nothing here holds state.

use cadence_types::Phase;
use serde::Serialize;
use std::f64::consts::PI;

use crate::state::PacerState;

/// Radius of the fully exhaled circle.
pub const RADIUS_MIN: f64 = 40.0;

/// Radius of the fully inhaled circle.
pub const RADIUS_MAX: f64 = 72.0;

/// Sinusoidal ease-in-out over `[0, 1]`.
///
/// Monotonic, with `ease(0) == 0` and `ease(1) == 1`.
fn ease_in_out(t: f64) -> f64 {
    0.5 - 0.5 * (PI * t).cos()
}

/// Circle radius for a phase and progress through it.
///
/// Grows from [`RADIUS_MIN`] to [`RADIUS_MAX`] while inhaling and shrinks
/// back while exhaling. Idle and stopped pacers rest at [`RADIUS_MIN`].
/// Progress outside `[0, 1]` (or NaN) is clamped first.
pub fn radius(phase: Phase, progress: f64) -> f64 {
    let t = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let span = RADIUS_MAX - RADIUS_MIN;
    let r = match phase {
        Phase::Inhaling => RADIUS_MIN + span * ease_in_out(t),
        Phase::Exhaling => RADIUS_MAX - span * ease_in_out(t),
        Phase::Idle | Phase::Stopped => RADIUS_MIN,
    };
    r.clamp(RADIUS_MIN, RADIUS_MAX)
}

/// Text shown over the circle.
///
/// A negative integer is shown as its absolute value; any other text
/// (non-numeric, or a non-negative number) is shown verbatim. No input, no
/// text.
pub fn display_text(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    match raw.parse::<i64>() {
        Ok(n) if n < 0 => Some(n.unsigned_abs().to_string()),
        _ => Some(raw.to_string()),
    }
}

/// Everything the presentation layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Phase being shown.
    pub phase: Phase,
    /// Circle radius, in `[RADIUS_MIN, RADIUS_MAX]`.
    pub radius: f64,
    /// Overlay text, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
}

impl RenderFrame {
    /// Build a frame for a phase and progress through it.
    pub fn new(phase: Phase, progress: f64, raw_text: Option<&str>) -> Self {
        Self {
            phase,
            radius: radius(phase, progress),
            display_text: display_text(raw_text),
        }
    }

    /// Build a frame from a state snapshot and the raw overlay text.
    pub fn from_state(state: &PacerState, raw_text: Option<&str>) -> Self {
        Self::new(state.phase, state.progress, raw_text)
    }
}
