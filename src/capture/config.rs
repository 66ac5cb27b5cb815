//! Recorder, clustering and camera configuration.
//!
//! Every section has working defaults; a TOML file only needs to name
//! the values it changes.

use crate::clustering::DEFAULT_ITERATIONS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Highest accepted baseline.
pub const MAX_BASELINE: u8 = 127;

/// Default length of one recording session in seconds.
pub const DEFAULT_SESSION_SECONDS: u32 = 18;

/// Supported sampling rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FrameRate {
    /// 30 samples per second.
    Fps30,
    /// 60 samples per second.
    Fps60,
}

impl FrameRate {
    /// Samples per second.
    #[inline]
    pub fn fps(self) -> u32 {
        match self {
            FrameRate::Fps30 => 30,
            FrameRate::Fps60 => 60,
        }
    }

    /// Time between two sampling ticks.
    pub fn tick_period(self) -> Duration {
        Duration::from_millis(1000 / self.fps() as u64)
    }
}

impl TryFrom<u32> for FrameRate {
    type Error = ConfigError;

    fn try_from(fps: u32) -> Result<Self, Self::Error> {
        match fps {
            30 => Ok(FrameRate::Fps30),
            60 => Ok(FrameRate::Fps60),
            other => Err(ConfigError::InvalidFrameRate(other)),
        }
    }
}

impl From<FrameRate> for u32 {
    fn from(rate: FrameRate) -> Self {
        rate.fps()
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} fps", self.fps())
    }
}

/// Configuration for a signal recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Initial sampling rate.
    pub frame_rate: FrameRate,
    /// Initial noise-floor threshold (0-127).
    pub baseline: u8,
    /// Maximum length of one recording.
    pub session_seconds: u32,
    /// Recorded ticks between two render snapshots.
    pub render_gap: u32,
    /// Grace period before a translation produces output.
    pub settle_delay_ms: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::Fps60,
            baseline: 0,
            session_seconds: DEFAULT_SESSION_SECONDS,
            render_gap: 4,
            settle_delay_ms: 4000,
        }
    }
}

impl RecorderConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baseline > MAX_BASELINE {
            return Err(ConfigError::InvalidBaseline(self.baseline));
        }
        if self.session_seconds == 0 {
            return Err(ConfigError::InvalidSessionDuration);
        }
        if self.render_gap == 0 {
            return Err(ConfigError::InvalidRenderGap);
        }
        Ok(())
    }

    /// Buffer length for the given rate at this session duration.
    pub fn buffer_len(&self, frame_rate: FrameRate) -> usize {
        frame_rate.fps() as usize * self.session_seconds as usize
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Clustering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Fixed number of k-means rounds.
    pub iterations: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Synthetic camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Background luminance.
    pub background: u8,
    /// Luminance of the lit signal source.
    pub signal: u8,
    /// Maximum per-pixel sensor noise added to the background.
    pub noise: u8,
    /// Seed for the noise generator.
    pub seed: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 320,
            background: 40,
            signal: 230,
            noise: 8,
            seed: 0x5eed,
        }
    }
}

impl CameraConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    #[error("invalid frame rate {0} (must be 30 or 60 fps)")]
    InvalidFrameRate(u32),
    #[error("invalid baseline {0} (must be 0-127)")]
    InvalidBaseline(u8),
    #[error("session duration must be at least one second")]
    InvalidSessionDuration,
    #[error("render gap must be at least one tick")]
    InvalidRenderGap,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub recorder: RecorderConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.recorder.validate()?;
        config.camera.validate()?;
        Ok(config)
    }
}
