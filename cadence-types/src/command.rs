//! Pacer phase and the external control signal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Channel, PacerError};

/// Current half-cycle state of the pacer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Initial state, before any command has been applied.
    #[default]
    Idle,
    /// Breathing in; the circle grows.
    Inhaling,
    /// Breathing out; the circle shrinks.
    Exhaling,
    /// Explicitly stopped. Left only by a start or reset command.
    Stopped,
}

impl Phase {
    /// Check if this is one of the two breathing phases.
    pub fn is_breathing(&self) -> bool {
        matches!(self, Self::Inhaling | Self::Exhaling)
    }

    /// The phase entered when crossing a half-cycle boundary.
    ///
    /// Idle and Stopped have no successor and map to themselves.
    pub fn flipped(self) -> Self {
        match self {
            Self::Inhaling => Self::Exhaling,
            Self::Exhaling => Self::Inhaling,
            other => other,
        }
    }

    /// The audio channel that carries this phase's cue.
    pub fn channel(&self) -> Option<Channel> {
        match self {
            Self::Inhaling => Some(Channel::In),
            Self::Exhaling => Some(Channel::Out),
            Self::Idle | Self::Stopped => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Inhaling => "inhaling",
            Self::Exhaling => "exhaling",
            Self::Stopped => "stopped",
        };
        f.pad(name)
    }
}

impl FromStr for Phase {
    type Err = PacerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "inhaling" | "in" => Ok(Self::Inhaling),
            "exhaling" | "out" => Ok(Self::Exhaling),
            "stopped" => Ok(Self::Stopped),
            _ => Err(PacerError::UnknownPhase(s.to_string())),
        }
    }
}

/// Control signal sampled from the external driver once per tick.
///
/// The signal is level-triggered: the driver keeps reporting the same command
/// while it is in effect, and the pacer ignores a command equal to the one it
/// last applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCommand {
    /// Nothing requested.
    #[default]
    None,
    /// Cycle inhale/exhale continuously.
    Repeat,
    /// Nudge into the inhale phase.
    Forward,
    /// Nudge into the exhale phase.
    Reverse,
    /// Stop and silence both channels.
    Stop,
    /// Stop, then restart cycling from the beginning of an inhale.
    Reset,
}

impl ControlCommand {
    /// All commands, in declaration order.
    pub const ALL: [ControlCommand; 6] = [
        Self::None,
        Self::Repeat,
        Self::Forward,
        Self::Reverse,
        Self::Stop,
        Self::Reset,
    ];

    /// Lowercase name of the command.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Repeat => "repeat",
            Self::Forward => "forward",
            Self::Reverse => "reverse",
            Self::Stop => "stop",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlCommand {
    type Err = PacerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == wanted)
            .ok_or_else(|| PacerError::UnknownCommand(s.to_string()))
    }
}
