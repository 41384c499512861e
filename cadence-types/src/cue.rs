//! Audio cue addressing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Volume;

/// Logical asset played when an inhale begins.
pub const BREATH_IN_ASSET: &str = "breath-in";

/// Logical asset played when an exhale begins.
pub const BREATH_OUT_ASSET: &str = "breath-out";

/// One of the two independent playback channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Carries the inhale cue.
    In,
    /// Carries the exhale cue.
    Out,
}

impl Channel {
    /// Both channels, inhale first.
    pub const BOTH: [Channel; 2] = [Channel::In, Channel::Out];

    /// Stable channel identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }

    /// The opposite channel.
    pub fn other(self) -> Self {
        match self {
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to play an asset on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioCue {
    /// Channel the cue plays on.
    pub channel: Channel,
    /// Asset identifier understood by the dispatcher.
    pub asset: String,
    /// Playback volume.
    pub volume: Volume,
}

/// The pair of cues used by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueSet {
    /// Asset played on the `in` channel.
    pub breath_in: String,
    /// Asset played on the `out` channel.
    pub breath_out: String,
    /// Volume for both cues.
    pub volume: Volume,
}

impl CueSet {
    /// Create a cue set with the standard assets at the given volume.
    pub fn new(volume: Volume) -> Self {
        Self {
            breath_in: BREATH_IN_ASSET.to_string(),
            breath_out: BREATH_OUT_ASSET.to_string(),
            volume,
        }
    }

    /// Set custom asset identifiers.
    pub fn with_assets(mut self, breath_in: &str, breath_out: &str) -> Self {
        self.breath_in = breath_in.to_string();
        self.breath_out = breath_out.to_string();
        self
    }

    /// Build the cue for a channel.
    pub fn cue_for(&self, channel: Channel) -> AudioCue {
        let asset = match channel {
            Channel::In => &self.breath_in,
            Channel::Out => &self.breath_out,
        };
        AudioCue {
            channel,
            asset: asset.clone(),
            volume: self.volume,
        }
    }
}

impl Default for CueSet {
    fn default() -> Self {
        Self::new(Volume::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_ids_are_stable() {
        assert_eq!(Channel::In.to_string(), "in");
        assert_eq!(Channel::Out.to_string(), "out");
        assert_eq!(Channel::In.other(), Channel::Out);
    }

    #[test]
    fn default_cue_set_uses_standard_assets() {
        let cues = CueSet::default();
        let inhale = cues.cue_for(Channel::In);
        assert_eq!(inhale.asset, BREATH_IN_ASSET);
        assert_eq!(inhale.volume, Volume::MAX);
        assert_eq!(cues.cue_for(Channel::Out).asset, BREATH_OUT_ASSET);
    }

    #[test]
    fn custom_assets() {
        let cues = CueSet::new(Volume::new(40).unwrap()).with_assets("chime-up", "chime-down");
        let exhale = cues.cue_for(Channel::Out);
        assert_eq!(exhale.channel, Channel::Out);
        assert_eq!(exhale.asset, "chime-down");
        assert_eq!(exhale.volume.percent(), 40);
    }
}
