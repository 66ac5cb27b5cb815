//! Fixed-rate sampling thread.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Calls a tick closure at a fixed rate on a dedicated thread.
///
/// Ticks are scheduled against absolute deadlines, so a slow tick delays
/// only itself and the schedule does not drift. The first tick fires
/// immediately.
#[derive(Debug)]
pub struct SamplingTimer {
    stop: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl SamplingTimer {
    /// Starts ticking every `period`.
    pub fn start<F>(period: Duration, mut tick: F) -> std::io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("morse-sampler".into())
            .spawn(move || {
                let mut deadline = Instant::now();
                loop {
                    tick();
                    deadline += period;
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        // Explicit stop or the timer handle was dropped.
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        tracing::debug!(period_ms = period.as_millis() as u64, "sampling timer started");
        Ok(Self { stop, handle })
    }

    /// Stops the thread and waits for the tick in progress, if any.
    pub fn stop(self) {
        let _ = self.stop.send(());
        if self.handle.join().is_err() {
            tracing::warn!("sampling timer thread panicked");
        }
        tracing::debug!("sampling timer stopped");
    }
}
