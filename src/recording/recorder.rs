//! Threaded signal recorder.
//!
//! Ties the pieces together: frames arrive on the caller's thread, a
//! [`SamplingTimer`] samples the latest one at the configured rate into a
//! [`RecordingSession`], and finished recordings go to a
//! [`TranslationWorker`]. Every state change is reported to an
//! [`EventSink`].
//!
//! Cancellation is optimistic: cancelling advances the submit code, and a
//! finished translation is only published if its code is still current.

use super::events::{EventSink, RecorderEvent};
use super::session::{RecordingSession, TickOutcome};
use super::stats::RecorderStats;
use super::timer::SamplingTimer;
use super::worker::{SubmitCounter, TranslationJob, TranslationWorker};
use crate::capture::{
    ClusteringConfig, ConfigError, FrameRate, LumaFrame, RecorderConfig, MAX_BASELINE,
};
use crate::clustering::KMeans;
use crate::sampling::{ImageSample, SampleError};
use crate::translation::{KMeansNormalizer, Translator};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Errors returned by [`SignalRecorder`] operations.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("recorder used after shutdown")]
    Destroyed,
    #[error("operation not allowed while recording")]
    Busy,
    #[error("baseline {0} out of range (0-127)")]
    InvalidBaseline(u8),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("unusable frame: {0}")]
    Sample(#[from] SampleError),
    #[error("failed to start thread: {0}")]
    Spawn(#[from] std::io::Error),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct State {
    session: RecordingSession,
    frame_rate: FrameRate,
    baseline: u8,
    processing: bool,
    destroyed: bool,
}

impl State {
    fn ensure_alive(&self) -> Result<(), RecorderError> {
        if self.destroyed {
            return Err(RecorderError::Destroyed);
        }
        Ok(())
    }
}

/// State shared with the sampling thread.
struct Inner {
    config: RecorderConfig,
    state: Mutex<State>,
    current_sample: Mutex<ImageSample>,
    submits: Arc<SubmitCounter>,
    sink: Arc<dyn EventSink>,
    stats: Arc<RecorderStats>,
    worker: Mutex<TranslationWorker>,
}

impl Inner {
    fn tick(&self) {
        let contrast = lock(&self.current_sample).contrast();
        let outcome = lock(&self.state).session.record(contrast);
        self.stats.on_tick(contrast, !matches!(outcome, TickOutcome::Ignored));

        match outcome {
            TickOutcome::Ignored | TickOutcome::Recorded => {}
            TickOutcome::Render(snapshot) => self.sink.notify(RecorderEvent::Render(snapshot)),
            TickOutcome::Full => {
                tracing::info!("recording buffer full");
                self.stop_recording();
            }
        }
    }

    fn stop_recording(&self) {
        let (frames, baseline, recorded) = {
            let mut state = lock(&self.state);
            if !state.session.stop() {
                return;
            }
            (
                state.session.frames().to_vec(),
                state.baseline,
                state.session.recorded(),
            )
        };
        tracing::info!(recorded, "recording stopped");
        self.sink.notify(RecorderEvent::RecordStop);
        self.submit(frames, baseline);
    }

    fn submit(&self, frames: Vec<u8>, baseline: u8) {
        let submit_code = self.submits.advance();
        self.sink.notify(RecorderEvent::TranslationBegin);
        self.stats.on_submit();
        tracing::debug!(%submit_code, baseline, frames = frames.len(), "translation submitted");

        let accepted = lock(&self.worker).submit(TranslationJob {
            submit_code,
            frames,
            baseline,
        });
        if !accepted {
            tracing::warn!(%submit_code, "translation worker already shut down");
        }
    }

    fn cancel_translations(&self, notify: bool) {
        let submit_code = self.submits.advance();
        tracing::debug!(%submit_code, "pending translations cancelled");
        if notify {
            self.sink.notify(RecorderEvent::TranslationCancel);
        }
    }
}

/// Records a blinking light and hands complete recordings to the
/// translator.
///
/// All operations fail with [`RecorderError::Destroyed`] after
/// [`SignalRecorder::shutdown`].
pub struct SignalRecorder {
    inner: Arc<Inner>,
    timer: Mutex<Option<SamplingTimer>>,
}

impl SignalRecorder {
    /// Creates a recorder with the default k-means translator.
    pub fn new(config: RecorderConfig, sink: Arc<dyn EventSink>) -> Result<Self, RecorderError> {
        Self::with_clustering(config, &ClusteringConfig::default(), sink)
    }

    /// Creates a recorder whose normalizer runs the given number of
    /// clustering rounds.
    pub fn with_clustering(
        config: RecorderConfig,
        clustering: &ClusteringConfig,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, RecorderError> {
        let normalizer = KMeansNormalizer::new(KMeans::new(clustering.iterations));
        let translator = Translator::new(Box::new(normalizer), config.settle_delay());
        Self::with_translator(config, translator, sink)
    }

    /// Creates a recorder around an explicit translator.
    pub fn with_translator(
        config: RecorderConfig,
        translator: Translator,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, RecorderError> {
        config.validate()?;

        let submits = Arc::new(SubmitCounter::new());
        let stats = Arc::new(RecorderStats::default());

        let worker = {
            let submits = Arc::clone(&submits);
            let stats = Arc::clone(&stats);
            let sink = Arc::clone(&sink);
            TranslationWorker::spawn(translator, move |result| {
                if submits.is_current(result.submit_code()) {
                    stats.on_published(result.is_success());
                    sink.notify(RecorderEvent::TranslationComplete(result));
                } else {
                    stats.on_discarded();
                    tracing::debug!(
                        submit_code = %result.submit_code(),
                        current = %submits.current(),
                        "stale translation discarded"
                    );
                }
            })?
        };

        let capacity = config.buffer_len(config.frame_rate);
        let session = RecordingSession::new(capacity, config.render_gap);
        let state = State {
            session,
            frame_rate: config.frame_rate,
            baseline: config.baseline,
            processing: false,
            destroyed: false,
        };

        tracing::info!(
            frame_rate = config.frame_rate.fps(),
            session_seconds = config.session_seconds,
            baseline = config.baseline,
            "signal recorder created"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                state: Mutex::new(state),
                current_sample: Mutex::new(ImageSample::zeros()),
                submits,
                sink,
                stats,
                worker: Mutex::new(worker),
            }),
            timer: Mutex::new(None),
        })
    }

    fn ensure_alive(&self) -> Result<(), RecorderError> {
        lock(&self.inner.state).ensure_alive()
    }

    /// Starts the sampling timer. No effect if already processing.
    pub fn start_processing(&self) -> Result<(), RecorderError> {
        let frame_rate = {
            let mut state = lock(&self.inner.state);
            state.ensure_alive()?;
            if state.processing {
                return Ok(());
            }
            state.processing = true;
            state.frame_rate
        };
        if let Err(e) = self.start_timer(frame_rate) {
            lock(&self.inner.state).processing = false;
            return Err(e);
        }
        tracing::info!("processing started");
        Ok(())
    }

    /// Stops a running recording, then the sampling timer.
    pub fn stop_processing(&self) -> Result<(), RecorderError> {
        self.ensure_alive()?;
        self.halt_processing();
        Ok(())
    }

    fn halt_processing(&self) {
        if !lock(&self.inner.state).processing {
            return;
        }
        self.inner.stop_recording();
        self.stop_timer();
        lock(&self.inner.state).processing = false;
        tracing::info!("processing stopped");
    }

    fn stop_timer(&self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.stop();
        }
    }

    /// Restarts the sampling timer. Liveness is checked under the timer
    /// lock, which shutdown takes after marking the recorder destroyed.
    fn start_timer(&self, frame_rate: FrameRate) -> Result<(), RecorderError> {
        let mut timer = lock(&self.timer);
        if let Some(old) = timer.take() {
            old.stop();
        }
        self.ensure_alive()?;
        let inner = Arc::clone(&self.inner);
        *timer = Some(SamplingTimer::start(frame_rate.tick_period(), move || {
            inner.tick()
        })?);
        Ok(())
    }

    /// Replaces the current sample with one taken from `frame`.
    ///
    /// Frames delivered while not processing are ignored.
    pub fn deliver_frame(&self, frame: &LumaFrame) -> Result<(), RecorderError> {
        tracing::trace!(
            sequence = frame.sequence(),
            age_us = frame.timestamp().elapsed().as_micros() as u64,
            "frame delivered"
        );
        self.deliver_plane(
            frame.row_stride(),
            frame.pixel_stride(),
            frame.width(),
            frame.height(),
            frame.plane(),
        )
    }

    /// Replaces the current sample with one taken from a raw luminance
    /// plane.
    pub fn deliver_plane(
        &self,
        row_stride: usize,
        pixel_stride: usize,
        width: u32,
        height: u32,
        plane: &[u8],
    ) -> Result<(), RecorderError> {
        {
            let state = lock(&self.inner.state);
            if state.destroyed {
                return Err(RecorderError::Destroyed);
            }
            if !state.processing {
                return Ok(());
            }
        }
        let sample = ImageSample::from_plane(row_stride, pixel_stride, width, height, plane)?;
        *lock(&self.inner.current_sample) = sample;
        Ok(())
    }

    /// Starts a recording session and cancels pending translations.
    /// No effect if already recording.
    pub fn start_recording(&self) -> Result<(), RecorderError> {
        {
            let mut state = lock(&self.inner.state);
            state.ensure_alive()?;
            if !state.session.start() {
                return Ok(());
            }
        }
        self.inner.stats.on_recording();
        self.inner.sink.notify(RecorderEvent::RenderClear);
        self.inner.cancel_translations(true);
        self.inner.sink.notify(RecorderEvent::RecordStart);
        tracing::info!("recording started");
        Ok(())
    }

    /// Stops the running session and submits it for translation.
    /// No effect if not recording.
    pub fn stop_recording(&self) -> Result<(), RecorderError> {
        self.ensure_alive()?;
        self.inner.stop_recording();
        Ok(())
    }

    /// Changes the sampling rate. Refused while recording.
    ///
    /// Reallocates the buffer, invalidates pending translations and
    /// restarts the sampling timer if it is running.
    pub fn set_frame_rate(&self, frame_rate: FrameRate) -> Result<(), RecorderError> {
        let processing = {
            let mut state = lock(&self.inner.state);
            state.ensure_alive()?;
            let capacity = self.inner.config.buffer_len(frame_rate);
            if !state.session.resize(capacity) {
                tracing::warn!(%frame_rate, "frame rate change refused while recording");
                return Err(RecorderError::Busy);
            }
            state.frame_rate = frame_rate;
            state.processing
        };

        self.inner.cancel_translations(true);
        self.inner.sink.notify(RecorderEvent::FrameRateChanged(frame_rate));
        if processing {
            self.start_timer(frame_rate)?;
        }
        tracing::info!(%frame_rate, "frame rate changed");
        Ok(())
    }

    /// Changes the baseline and re-translates the last recording.
    /// Refused while recording.
    pub fn set_baseline(&self, baseline: u8) -> Result<(), RecorderError> {
        let frames = {
            let mut state = lock(&self.inner.state);
            state.ensure_alive()?;
            if baseline > MAX_BASELINE {
                return Err(RecorderError::InvalidBaseline(baseline));
            }
            if state.session.is_recording() {
                tracing::warn!(baseline, "baseline change refused while recording");
                return Err(RecorderError::Busy);
            }
            state.baseline = baseline;
            state.session.frames().to_vec()
        };

        tracing::info!(baseline, "baseline changed");
        self.inner.sink.notify(RecorderEvent::BaselineChanged(baseline));
        self.inner.submit(frames, baseline);
        Ok(())
    }

    /// Suppresses publication of every translation submitted so far.
    pub fn cancel_all_translations(&self) -> Result<(), RecorderError> {
        self.ensure_alive()?;
        self.inner.cancel_translations(true);
        Ok(())
    }

    /// Stops everything and releases the threads. Terminal and
    /// idempotent; every later operation fails with
    /// [`RecorderError::Destroyed`].
    pub fn shutdown(&self) {
        {
            let mut state = lock(&self.inner.state);
            if state.destroyed {
                return;
            }
            state.destroyed = true;
        }
        self.inner.stop_recording();
        self.stop_timer();
        lock(&self.inner.state).processing = false;
        lock(&self.inner.worker).shutdown();
        self.inner.cancel_translations(true);
        tracing::info!("signal recorder shut down");
    }

    pub fn frame_rate(&self) -> FrameRate {
        lock(&self.inner.state).frame_rate
    }

    pub fn baseline(&self) -> u8 {
        lock(&self.inner.state).baseline
    }

    pub fn is_recording(&self) -> bool {
        lock(&self.inner.state).session.is_recording()
    }

    pub fn is_processing(&self) -> bool {
        lock(&self.inner.state).processing
    }

    pub fn is_shut_down(&self) -> bool {
        lock(&self.inner.state).destroyed
    }

    /// Samples recorded in the current or last session.
    pub fn recorded_frames(&self) -> usize {
        lock(&self.inner.state).session.recorded()
    }

    /// Session buffer length at the current frame rate.
    pub fn buffer_len(&self) -> usize {
        lock(&self.inner.state).session.capacity()
    }

    /// Copy of the session buffer.
    pub fn snapshot(&self) -> Vec<u8> {
        lock(&self.inner.state).session.frames().to_vec()
    }

    /// Contrast of the most recently delivered frame.
    pub fn current_contrast(&self) -> u8 {
        lock(&self.inner.current_sample).contrast()
    }

    pub fn stats(&self) -> &RecorderStats {
        &self.inner.stats
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.inner.config
    }
}

impl Drop for SignalRecorder {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for SignalRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.inner.state);
        f.debug_struct("SignalRecorder")
            .field("frame_rate", &state.frame_rate)
            .field("baseline", &state.baseline)
            .field("recording", &state.session.is_recording())
            .field("processing", &state.processing)
            .field("destroyed", &state.destroyed)
            .finish()
    }
}
