//! Running counters kept by the recorder.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated from the sampling and worker threads.
#[derive(Debug, Default)]
pub struct RecorderStats {
    ticks_sampled: AtomicU64,
    frames_recorded: AtomicU64,
    recordings: AtomicU64,
    translations_submitted: AtomicU64,
    translations_published: AtomicU64,
    translations_discarded: AtomicU64,
    translations_successful: AtomicU64,
    last_contrast: AtomicU64,
}

impl RecorderStats {
    pub(crate) fn on_tick(&self, contrast: u8, recorded: bool) {
        self.ticks_sampled.fetch_add(1, Ordering::Relaxed);
        self.last_contrast.store(contrast as u64, Ordering::Relaxed);
        if recorded {
            self.frames_recorded.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn on_recording(&self) {
        self.recordings.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn on_submit(&self) {
        self.translations_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn on_published(&self, success: bool) {
        self.translations_published.fetch_add(1, Ordering::Relaxed);
        if success {
            self.translations_successful.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn on_discarded(&self) {
        self.translations_discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Sampling ticks, recording or not.
    pub fn ticks_sampled(&self) -> u64 {
        self.ticks_sampled.load(Ordering::Relaxed)
    }

    /// Samples written into a session buffer.
    pub fn frames_recorded(&self) -> u64 {
        self.frames_recorded.load(Ordering::Relaxed)
    }

    /// Sessions started.
    pub fn recordings(&self) -> u64 {
        self.recordings.load(Ordering::Relaxed)
    }

    pub fn translations_submitted(&self) -> u64 {
        self.translations_submitted.load(Ordering::Relaxed)
    }

    /// Results handed to the event sink.
    pub fn translations_published(&self) -> u64 {
        self.translations_published.load(Ordering::Relaxed)
    }

    /// Results dropped because a newer request superseded them.
    pub fn translations_discarded(&self) -> u64 {
        self.translations_discarded.load(Ordering::Relaxed)
    }

    pub fn translations_successful(&self) -> u64 {
        self.translations_successful.load(Ordering::Relaxed)
    }

    /// Contrast computed on the most recent tick.
    pub fn last_contrast(&self) -> u8 {
        self.last_contrast.load(Ordering::Relaxed) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = RecorderStats::default();
        stats.on_tick(12, false);
        stats.on_tick(40, true);
        stats.on_published(true);
        stats.on_published(false);
        stats.on_discarded();

        assert_eq!(stats.ticks_sampled(), 2);
        assert_eq!(stats.frames_recorded(), 1);
        assert_eq!(stats.last_contrast(), 40);
        assert_eq!(stats.translations_published(), 2);
        assert_eq!(stats.translations_successful(), 1);
        assert_eq!(stats.translations_discarded(), 1);
    }
}
