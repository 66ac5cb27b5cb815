//! Frame sampling.
//!
//! Reduces each raw luminance frame to a single contrast scalar.

mod contrast;

pub use contrast::{target_region, ImageSample, Region, SampleError, SAMPLE_SIZE, TARGET_SIZE};
