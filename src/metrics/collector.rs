//! Metrics collection and registry.

use crate::recording::RecorderStats;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of recorder state for metrics update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Sampling ticks, recording or not.
    pub ticks_sampled: u64,
    /// Samples written into a session buffer.
    pub frames_recorded: u64,
    /// Sessions started.
    pub recordings: u64,
    pub translations_submitted: u64,
    pub translations_published: u64,
    pub translations_discarded: u64,
    pub translations_successful: u64,
    /// Contrast computed on the most recent tick.
    pub last_contrast: u8,
    /// Baseline currently in effect.
    pub baseline: u8,
}

impl MetricsSnapshot {
    /// Takes a snapshot from the recorder's counters.
    pub fn from_stats(stats: &RecorderStats, baseline: u8) -> Self {
        Self {
            ticks_sampled: stats.ticks_sampled(),
            frames_recorded: stats.frames_recorded(),
            recordings: stats.recordings(),
            translations_submitted: stats.translations_submitted(),
            translations_published: stats.translations_published(),
            translations_discarded: stats.translations_discarded(),
            translations_successful: stats.translations_successful(),
            last_contrast: stats.last_contrast(),
            baseline,
        }
    }
}

/// Prometheus metrics registry for a signal recorder.
pub struct MetricsRegistry {
    registry: Registry,

    // Sampling
    ticks_sampled: IntCounter,
    frames_recorded: IntCounter,
    recordings: IntCounter,
    last_contrast: IntGauge,
    baseline: IntGauge,

    // Translation
    translations_submitted: IntCounter,
    translations_published: IntCounter,
    translations_discarded: IntCounter,
    translations_successful: IntCounter,
}

/// Advances a counter to `target`; counters never go backwards.
fn catch_up(counter: &IntCounter, target: u64) {
    let current = counter.get();
    if target > current {
        counter.inc_by(target - current);
    }
}

impl MetricsRegistry {
    /// Creates a registry with all recorder metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let ticks_sampled = IntCounter::new(
            "optical_morse_ticks_sampled_total",
            "Sampling ticks performed",
        )?;
        let frames_recorded = IntCounter::new(
            "optical_morse_frames_recorded_total",
            "Contrast samples written into a session buffer",
        )?;
        let recordings = IntCounter::new(
            "optical_morse_recordings_total",
            "Recording sessions started",
        )?;
        let last_contrast = IntGauge::new(
            "optical_morse_last_contrast",
            "Contrast computed on the most recent tick",
        )?;
        let baseline = IntGauge::new(
            "optical_morse_baseline",
            "Noise-floor threshold in effect",
        )?;

        let translations_submitted = IntCounter::new(
            "optical_morse_translations_submitted_total",
            "Translations handed to the worker",
        )?;
        let translations_published = IntCounter::new(
            "optical_morse_translations_published_total",
            "Translation results delivered to listeners",
        )?;
        let translations_discarded = IntCounter::new(
            "optical_morse_translations_discarded_total",
            "Translation results dropped as stale",
        )?;
        let translations_successful = IntCounter::new(
            "optical_morse_translations_successful_total",
            "Published translations that produced text",
        )?;

        registry.register(Box::new(ticks_sampled.clone()))?;
        registry.register(Box::new(frames_recorded.clone()))?;
        registry.register(Box::new(recordings.clone()))?;
        registry.register(Box::new(last_contrast.clone()))?;
        registry.register(Box::new(baseline.clone()))?;
        registry.register(Box::new(translations_submitted.clone()))?;
        registry.register(Box::new(translations_published.clone()))?;
        registry.register(Box::new(translations_discarded.clone()))?;
        registry.register(Box::new(translations_successful.clone()))?;

        Ok(Self {
            registry,
            ticks_sampled,
            frames_recorded,
            recordings,
            last_contrast,
            baseline,
            translations_submitted,
            translations_published,
            translations_discarded,
            translations_successful,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        catch_up(&self.ticks_sampled, snapshot.ticks_sampled);
        catch_up(&self.frames_recorded, snapshot.frames_recorded);
        catch_up(&self.recordings, snapshot.recordings);
        self.last_contrast.set(snapshot.last_contrast as i64);
        self.baseline.set(snapshot.baseline as i64);

        catch_up(&self.translations_submitted, snapshot.translations_submitted);
        catch_up(&self.translations_published, snapshot.translations_published);
        catch_up(&self.translations_discarded, snapshot.translations_discarded);
        catch_up(&self.translations_successful, snapshot.translations_successful);
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl std::fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRegistry").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        assert!(MetricsRegistry::new().is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();
        let snapshot = MetricsSnapshot {
            ticks_sampled: 120,
            frames_recorded: 60,
            recordings: 1,
            translations_submitted: 3,
            translations_published: 1,
            translations_discarded: 2,
            translations_successful: 1,
            last_contrast: 42,
            baseline: 7,
        };
        registry.update(&snapshot);

        let output = registry.encode().unwrap();
        assert!(output.contains("optical_morse_ticks_sampled_total 120"));
        assert!(output.contains("optical_morse_translations_discarded_total 2"));
        assert!(output.contains("optical_morse_last_contrast 42"));
        assert!(output.contains("optical_morse_baseline 7"));
    }

    #[test]
    fn test_counters_do_not_go_backwards() {
        let registry = MetricsRegistry::new().unwrap();
        registry.update(&MetricsSnapshot {
            recordings: 4,
            ..Default::default()
        });
        registry.update(&MetricsSnapshot {
            recordings: 2,
            ..Default::default()
        });
        let output = registry.encode().unwrap();
        assert!(output.contains("optical_morse_recordings_total 4"));
    }

    #[test]
    fn test_snapshot_from_stats() {
        let stats = RecorderStats::default();
        let snapshot = MetricsSnapshot::from_stats(&stats, 12);
        assert_eq!(
            snapshot,
            MetricsSnapshot {
                baseline: 12,
                ..Default::default()
            }
        );
    }
}
