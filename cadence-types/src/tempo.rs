//! Scalar settings for cadence: tempo and cue volume.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::PacerError;

/// Duration of one half-cycle (a single inhale or exhale).
///
/// Always strictly positive. Construct through [`Tempo::new`] or
/// [`Tempo::from_secs_f64`], which reject anything else.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tempo(Duration);

impl Tempo {
    /// Create a tempo from a duration.
    pub fn new(duration: Duration) -> Result<Self, PacerError> {
        if duration.is_zero() {
            return Err(PacerError::InvalidTempo { secs: 0.0 });
        }
        Ok(Self(duration))
    }

    /// Create a tempo from a number of seconds.
    ///
    /// Rejects zero, negative, NaN and infinite values, as well as values too
    /// small to be represented at nanosecond resolution.
    pub fn from_secs_f64(secs: f64) -> Result<Self, PacerError> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(PacerError::InvalidTempo { secs });
        }
        let duration =
            Duration::try_from_secs_f64(secs).map_err(|_| PacerError::InvalidTempo { secs })?;
        Self::new(duration).map_err(|_| PacerError::InvalidTempo { secs })
    }

    /// Get the underlying duration.
    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Get the tempo in fractional seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.0.as_secs_f64()
    }

    /// Fraction of a half-cycle covered by `elapsed`.
    pub fn fraction_of(&self, elapsed: Duration) -> f64 {
        elapsed.as_secs_f64() / self.0.as_secs_f64()
    }
}

impl TryFrom<Duration> for Tempo {
    type Error = PacerError;

    fn try_from(duration: Duration) -> Result<Self, Self::Error> {
        Self::new(duration)
    }
}

impl fmt::Debug for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tempo({:?})", self.0)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0.as_secs_f64())
    }
}

/// Cue volume as an integer percentage (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Volume(u8);

impl Volume {
    /// Maximum volume.
    pub const MAX: Volume = Volume(100);

    /// Silence.
    pub const MUTED: Volume = Volume(0);

    /// Create a volume from a percentage.
    pub fn new(percent: u32) -> Result<Self, PacerError> {
        if percent > 100 {
            return Err(PacerError::InvalidVolume(percent));
        }
        Ok(Self(percent as u8))
    }

    /// Get the percentage value.
    pub fn percent(&self) -> u8 {
        self.0
    }

    /// Convert to the linear gain expected by audio backends (0.0-1.0).
    pub fn gain(&self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::MAX
    }
}

impl TryFrom<u32> for Volume {
    type Error = PacerError;

    fn try_from(percent: u32) -> Result<Self, Self::Error> {
        Self::new(percent)
    }
}

impl From<Volume> for u32 {
    fn from(volume: Volume) -> Self {
        u32::from(volume.0)
    }
}
