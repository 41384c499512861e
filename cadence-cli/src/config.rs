//! Configuration loading for cadence.
//!
//! Configuration is loaded from a TOML file (default: `cadence.toml` in the
//! platform config directory). Every section and field is optional.

use cadence_client::PacerConfig;
use cadence_core::Theme;
use cadence_types::{PacerError, Tempo, Volume};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration for cadence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pacer configuration.
    pub pacer: PacerSection,
    /// Cue assets.
    pub cues: CueSection,
    /// Presentation colors.
    pub theme: Theme,
}

/// Pacer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PacerSection {
    /// Half-cycle duration in seconds (default: 4.0).
    #[serde(default = "default_tempo_secs")]
    pub tempo_secs: f64,
    /// Cue volume, 0-100 (default: 80).
    #[serde(default = "default_volume")]
    pub volume: u32,
    /// Frames per second for the pacer loop (default: 30).
    #[serde(default = "default_frame_rate_hz")]
    pub frame_rate_hz: u32,
}

/// Cue asset configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CueSection {
    /// Asset played when an inhale begins (default: "breath-in").
    #[serde(default = "default_breath_in")]
    pub breath_in: String,
    /// Asset played when an exhale begins (default: "breath-out").
    #[serde(default = "default_breath_out")]
    pub breath_out: String,
}

// Default value functions
fn default_tempo_secs() -> f64 {
    4.0
}

fn default_volume() -> u32 {
    80
}

fn default_frame_rate_hz() -> u32 {
    30
}

fn default_breath_in() -> String {
    cadence_types::BREATH_IN_ASSET.to_string()
}

fn default_breath_out() -> String {
    cadence_types::BREATH_OUT_ASSET.to_string()
}

impl Default for PacerSection {
    fn default() -> Self {
        Self {
            tempo_secs: default_tempo_secs(),
            volume: default_volume(),
            frame_rate_hz: default_frame_rate_hz(),
        }
    }
}

impl Default for CueSection {
    fn default() -> Self {
        Self {
            breath_in: default_breath_in(),
            breath_out: default_breath_out(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. A missing default file yields the default
    /// configuration.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Validate the pacer settings into a controller configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PacerError::InvalidTempo`] or [`PacerError::InvalidVolume`].
    pub fn pacer_config(&self) -> Result<PacerConfig, PacerError> {
        let tempo = Tempo::from_secs_f64(self.pacer.tempo_secs)?;
        let volume = Volume::new(self.pacer.volume)?;
        Ok(PacerConfig::new(tempo)
            .with_volume(volume)
            .with_assets(&self.cues.breath_in, &self.cues.breath_out))
    }

    /// Time between pacer loop frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.pacer.frame_rate_hz.max(1)
    }
}

/// Get the default configuration file path.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "ydun", "cadence")
        .map(|dirs| dirs.config_dir().join("cadence.toml"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
