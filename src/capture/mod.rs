//! Camera input, frames and configuration.
//!
//! The camera is only a source of luminance planes; everything after
//! frame delivery happens in [`crate::sampling`] and [`crate::recording`].

mod camera;
mod config;
mod frame;

pub use camera::{BlinkingCamera, Camera, CameraError};
pub use config::{
    CameraConfig, ClusteringConfig, ConfigError, FileConfig, FrameRate, RecorderConfig,
    DEFAULT_SESSION_SECONDS, MAX_BASELINE,
};
pub use frame::LumaFrame;
