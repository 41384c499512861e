//! Half-cycle clock.
//!
//! Tracks elapsed wall time within the current half-cycle and reports how
//! many half-cycle boundaries were crossed. Time is kept as whole nanoseconds
//! so that ticks summing to exactly one tempo land exactly on the boundary;
//! normalized progress is derived on demand. Time is supplied by the caller,
//! so the clock itself never reads a system timer.

use cadence_types::Tempo;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Position within the current half-cycle.
///
/// Elapsed time stays within `[0, tempo]`. It only reaches `tempo` while
/// gliding; cycling wraps it back into `[0, tempo)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HalfCycleClock {
    elapsed: Duration,
}

impl HalfCycleClock {
    /// Create a clock at the start of a half-cycle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time spent in the current half-cycle.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Normalized progress at `tempo`, in `[0.0, 1.0]`.
    pub fn progress(&self, tempo: Tempo) -> f64 {
        tempo.fraction_of(self.elapsed).clamp(0.0, 1.0)
    }

    /// Restart the half-cycle.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Advance by `elapsed` at `tempo`, wrapping on each boundary.
    ///
    /// Returns the number of boundaries crossed. Landing exactly on a
    /// boundary counts as crossing it and leaves the clock at zero.
    pub fn advance(&mut self, elapsed: Duration, tempo: Tempo) -> u64 {
        let total = self.elapsed.as_nanos() + elapsed.as_nanos();
        let span = tempo.as_duration().as_nanos();
        self.elapsed = from_nanos(total % span);
        u64::try_from(total / span).unwrap_or(u64::MAX)
    }

    /// Advance by `elapsed` at `tempo`, stopping at the end of the half-cycle.
    ///
    /// Returns `true` once the end has been reached.
    pub fn glide(&mut self, elapsed: Duration, tempo: Tempo) -> bool {
        let end = tempo.as_duration();
        self.elapsed = self.elapsed.saturating_add(elapsed).min(end);
        self.elapsed >= end
    }

    /// Keep the current progress while the tempo changes from `from` to `to`.
    pub fn retime(&mut self, from: Tempo, to: Tempo) {
        self.elapsed = to.as_duration().mul_f64(self.progress(from));
    }
}

/// Build a duration from nanoseconds below `u64::MAX` seconds.
fn from_nanos(nanos: u128) -> Duration {
    Duration::new((nanos / NANOS_PER_SEC) as u64, (nanos % NANOS_PER_SEC) as u32)
}
