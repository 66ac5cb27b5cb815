//! Recorder notifications.
//!
//! Everything the recorder reports goes through one [`EventSink`] as a
//! [`RecorderEvent`], so a UI, a channel or a test log can all listen the
//! same way.

use crate::capture::FrameRate;
use crate::translation::TranslationResult;
use std::sync::{mpsc, Mutex};

/// A notification from the recorder.
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderEvent {
    /// Sampling rate changed while idle.
    FrameRateChanged(FrameRate),
    /// Baseline changed while idle.
    BaselineChanged(u8),
    /// A recording session started.
    RecordStart,
    /// A recording session stopped.
    RecordStop,
    /// A translation was submitted.
    TranslationBegin,
    /// Pending translations were cancelled.
    TranslationCancel,
    /// The latest translation finished.
    TranslationComplete(TranslationResult),
    /// Snapshot of the buffer recorded so far.
    Render(Vec<u8>),
    /// The live graph should be cleared.
    RenderClear,
}

impl RecorderEvent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RecorderEvent::FrameRateChanged(_) => "frame_rate_changed",
            RecorderEvent::BaselineChanged(_) => "baseline_changed",
            RecorderEvent::RecordStart => "record_start",
            RecorderEvent::RecordStop => "record_stop",
            RecorderEvent::TranslationBegin => "translation_begin",
            RecorderEvent::TranslationCancel => "translation_cancel",
            RecorderEvent::TranslationComplete(_) => "translation_complete",
            RecorderEvent::Render(_) => "render",
            RecorderEvent::RenderClear => "render_clear",
        }
    }
}

/// Receiver of recorder events.
///
/// Called from the caller's thread, the sampling thread and the
/// translation worker, so implementations must be thread-safe and should
/// return quickly.
pub trait EventSink: Send + Sync {
    fn notify(&self, event: RecorderEvent);
}

impl<F> EventSink for F
where
    F: Fn(RecorderEvent) + Send + Sync,
{
    fn notify(&self, event: RecorderEvent) {
        self(event)
    }
}

/// Sink forwarding events over a channel.
#[derive(Debug, Clone)]
pub struct ChannelSink(pub mpsc::Sender<RecorderEvent>);

impl ChannelSink {
    /// Creates a sink and the receiver it feeds.
    pub fn channel() -> (Self, mpsc::Receiver<RecorderEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self(tx), rx)
    }
}

impl EventSink for ChannelSink {
    fn notify(&self, event: RecorderEvent) {
        // A dropped receiver just means nobody is listening anymore.
        let _ = self.0.send(event);
    }
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&self, _event: RecorderEvent) {}
}

/// In-memory event log.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<RecorderEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event received so far.
    pub fn events(&self) -> Vec<RecorderEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Event kinds in arrival order, with render snapshots left out.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events()
            .iter()
            .filter(|e| !matches!(e, RecorderEvent::Render(_)))
            .map(RecorderEvent::kind)
            .collect()
    }

    /// Every published translation result.
    pub fn results(&self) -> Vec<TranslationResult> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RecorderEvent::TranslationComplete(result) => Some(result),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}

impl EventSink for EventLog {
    fn notify(&self, event: RecorderEvent) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_event_log_records_in_order() {
        let log = EventLog::new();
        log.notify(RecorderEvent::RecordStart);
        log.notify(RecorderEvent::Render(vec![1, 2]));
        log.notify(RecorderEvent::RecordStop);

        assert_eq!(log.events().len(), 3);
        assert_eq!(log.kinds(), vec!["record_start", "record_stop"]);

        log.clear();
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let count = AtomicUsize::new(0);
        let sink = |_event: RecorderEvent| {
            count.fetch_add(1, Ordering::SeqCst);
        };
        sink.notify(RecorderEvent::RecordStart);
        sink.notify(RecorderEvent::RecordStop);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::channel();
        sink.notify(RecorderEvent::TranslationBegin);
        assert_eq!(rx.recv().unwrap(), RecorderEvent::TranslationBegin);
        drop(rx);
        sink.notify(RecorderEvent::TranslationCancel);
    }
}
