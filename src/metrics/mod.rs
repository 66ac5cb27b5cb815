//! Prometheus metrics for the signal recorder.
//!
//! Mirrors [`crate::recording::RecorderStats`] into a Prometheus registry
//! so it can be dumped in text format.
//!
//! # Metrics Exposed
//!
//! ## Sampling
//! - `optical_morse_ticks_sampled_total` - Sampling ticks performed
//! - `optical_morse_frames_recorded_total` - Samples written into a session
//! - `optical_morse_recordings_total` - Sessions started
//! - `optical_morse_last_contrast` - Most recent contrast value
//! - `optical_morse_baseline` - Baseline in effect
//!
//! ## Translation
//! - `optical_morse_translations_submitted_total`
//! - `optical_morse_translations_published_total`
//! - `optical_morse_translations_discarded_total` - Dropped as stale
//! - `optical_morse_translations_successful_total`
//!
//! # Example
//!
//! ```no_run
//! use optical_morse::metrics::{MetricsRegistry, MetricsSnapshot};
//! use optical_morse::recording::RecorderStats;
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! let stats = RecorderStats::default();
//! registry.update(&MetricsSnapshot::from_stats(&stats, 0));
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
