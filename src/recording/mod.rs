//! Recording sessions and background translation.
//!
//! [`SignalRecorder`] owns the whole lifecycle: a sampling thread feeds a
//! fixed-length [`RecordingSession`], and finished sessions are translated
//! on a [`TranslationWorker`]. Results that were superseded while the
//! worker ran are dropped instead of published.

mod events;
mod recorder;
mod session;
mod stats;
mod timer;
mod worker;

pub use events::{ChannelSink, EventLog, EventSink, NullSink, RecorderEvent};
pub use recorder::{RecorderError, SignalRecorder};
pub use session::{RecordingSession, SessionState, TickOutcome};
pub use stats::RecorderStats;
pub use timer::SamplingTimer;
pub use worker::{SubmitCounter, TranslationJob, TranslationWorker};
