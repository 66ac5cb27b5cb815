//! Camera abstraction for frame capture.
//!
//! Real camera bindings live outside this crate; they only need to
//! implement [`Camera`]. [`BlinkingCamera`] is a synthetic source that
//! films a light keyed on and off by a schedule.

use super::{CameraConfig, LumaFrame};
use crate::morse::{encode_text, keying};
use crate::sampling::target_region;
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for camera implementations.
pub trait Camera {
    /// Opens and initializes the camera with the given configuration.
    fn open(&mut self, config: &CameraConfig) -> Result<(), CameraError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<LumaFrame, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases resources.
    fn close(&mut self);
}

/// Synthetic camera filming a point light at the center of the frame.
///
/// Frame `n` shows the light lit when `schedule[n % schedule.len()]` is
/// true. The background carries uniform sensor noise.
#[derive(Debug)]
pub struct BlinkingCamera {
    schedule: Vec<bool>,
    config: Option<CameraConfig>,
    rng: ChaCha8Rng,
    sequence: u64,
}

impl BlinkingCamera {
    /// Creates a camera following an explicit on/off schedule.
    pub fn new(schedule: Vec<bool>) -> Self {
        Self {
            schedule,
            config: None,
            rng: ChaCha8Rng::seed_from_u64(0),
            sequence: 0,
        }
    }

    /// Creates a camera keying `text` at `unit_frames` frames per Morse
    /// unit, framed by a word gap of darkness on each side.
    pub fn from_text(text: &str, unit_frames: usize) -> Self {
        let dark = vec![false; 7 * unit_frames.max(1)];
        let mut schedule = dark.clone();
        schedule.extend(keying(&encode_text(text), unit_frames));
        schedule.extend(dark);
        Self::new(schedule)
    }

    /// Returns the on/off schedule.
    pub fn schedule(&self) -> &[bool] {
        &self.schedule
    }

    /// Whether the light is lit in frame `sequence` (0-based).
    pub fn is_lit(&self, sequence: u64) -> bool {
        if self.schedule.is_empty() {
            return false;
        }
        self.schedule[(sequence % self.schedule.len() as u64) as usize]
    }
}

impl Camera for BlinkingCamera {
    fn open(&mut self, config: &CameraConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.rng = ChaCha8Rng::seed_from_u64(config.seed);
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!(
            width = config.width,
            height = config.height,
            schedule = self.schedule.len(),
            "BlinkingCamera opened"
        );
        Ok(())
    }

    fn capture(&mut self) -> Result<LumaFrame, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;
        let (width, height) = (config.width as usize, config.height as usize);
        let lit = self.is_lit(self.sequence);

        let noise_span = config.noise as u32 + 1;
        let mut plane: Vec<u8> = (0..width * height)
            .map(|_| {
                let noise = (self.rng.next_u32() % noise_span) as u8;
                config.background.saturating_add(noise)
            })
            .collect();

        if lit {
            let region = target_region(config.width, config.height).ok_or_else(|| {
                CameraError::CaptureFailed(format!(
                    "{}x{} frame is too small to hold the target",
                    config.width, config.height
                ))
            })?;
            for y in region.rows.clone() {
                plane[y * width + region.cols.start..y * width + region.cols.end]
                    .fill(config.signal);
            }
        }

        let frame = LumaFrame::new(plane, config.width, config.height, self.sequence);
        self.sequence += 1;
        Ok(frame)
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("BlinkingCamera closed");
    }
}
