//! Optical Morse Decoding Library
//!
//! Decodes Morse code from a blinking light observed through a camera
//! feed. The light's on/off pattern is reduced to one contrast value per
//! sampling tick, recorded for a bounded session, and translated offline.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! capture → sampling → recording → translation → morse
//!                          ↓            ↓
//!                       events    clustering
//! ```
//!
//! # Design Principles
//!
//! - **Speed-agnostic**: run lengths are clustered instead of compared to a
//!   fixed unit duration
//! - **Latest request wins**: superseded translations are never published
//! - **Bounded work**: sessions have a fixed buffer, clustering a fixed
//!   number of rounds
//!
//! # Example
//!
//! ```no_run
//! use optical_morse::{
//!     capture::{BlinkingCamera, Camera, CameraConfig},
//!     sampling::ImageSample,
//!     translation::{SubmitCode, Translator},
//! };
//!
//! let mut camera = BlinkingCamera::from_text("SOS SOS", 4);
//! camera.open(&CameraConfig::default()).unwrap();
//!
//! let mut frames = Vec::new();
//! for _ in 0..camera.schedule().len() {
//!     let frame = camera.capture().unwrap();
//!     frames.push(ImageSample::from_frame(&frame).unwrap().contrast());
//! }
//!
//! let result = Translator::immediate().resolve(SubmitCode(1), &frames, 20);
//! assert_eq!(result.text(), Some("SOS SOS"));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod clustering;
pub mod metrics;
pub mod morse;
pub mod recording;
pub mod sampling;
pub mod translation;

// Re-export commonly used types at crate root
pub use capture::{BlinkingCamera, Camera, FileConfig, FrameRate, LumaFrame, RecorderConfig};
pub use morse::CanonicalSymbol;
pub use recording::{EventSink, RecorderError, RecorderEvent, SignalRecorder};
pub use sampling::ImageSample;
pub use translation::{SubmitCode, TranslationResult, Translator};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
