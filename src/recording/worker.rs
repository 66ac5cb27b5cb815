//! Single-slot background translation worker.
//!
//! At most one job waits while another runs; submitting replaces the
//! waiting job, since only the latest request can ever be published.
//! Staleness is decided by comparing submit codes at publish time. A
//! running job is never interrupted.

use crate::translation::{SubmitCode, TranslationResult, Translator};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// Issues submit codes and tracks the current one.
#[derive(Debug, Default)]
pub struct SubmitCounter {
    current: AtomicU64,
}

impl SubmitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidates every earlier code and returns the new current one.
    pub fn advance(&self) -> SubmitCode {
        SubmitCode(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The code a result must carry to be published.
    pub fn current(&self) -> SubmitCode {
        SubmitCode(self.current.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, code: SubmitCode) -> bool {
        self.current() == code
    }
}

/// One translation request.
#[derive(Debug, Clone)]
pub struct TranslationJob {
    pub submit_code: SubmitCode,
    pub frames: Vec<u8>,
    pub baseline: u8,
}

#[derive(Default)]
struct Slot {
    pending: Option<TranslationJob>,
    busy: bool,
    shutdown: bool,
}

#[derive(Default)]
struct Shared {
    slot: Mutex<Slot>,
    ready: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Background thread running [`Translator::resolve`].
pub struct TranslationWorker {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl TranslationWorker {
    /// Spawns the worker. `on_complete` receives every finished result,
    /// stale or not, on the worker thread.
    pub fn spawn<F>(mut translator: Translator, on_complete: F) -> std::io::Result<Self>
    where
        F: Fn(TranslationResult) + Send + 'static,
    {
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);

        let handle = thread::Builder::new()
            .name("morse-translator".into())
            .spawn(move || {
                while let Some(job) = next_job(&worker_shared) {
                    tracing::trace!(submit_code = %job.submit_code, "translation started");
                    let result = translator.resolve(job.submit_code, &job.frames, job.baseline);
                    on_complete(result);

                    let mut slot = worker_shared.lock();
                    slot.busy = false;
                    worker_shared.ready.notify_all();
                }
                tracing::debug!("translation worker exiting");
            })?;

        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    /// Queues a job, replacing any job still waiting.
    ///
    /// Returns false once the worker has been shut down.
    pub fn submit(&self, job: TranslationJob) -> bool {
        let mut slot = self.shared.lock();
        if slot.shutdown {
            return false;
        }
        if let Some(replaced) = slot.pending.replace(job) {
            tracing::debug!(submit_code = %replaced.submit_code, "queued translation superseded");
        }
        self.shared.ready.notify_all();
        true
    }

    /// True while a job is queued or running.
    pub fn is_busy(&self) -> bool {
        let slot = self.shared.lock();
        slot.busy || slot.pending.is_some()
    }

    /// Stops accepting jobs and drops the queued one.
    ///
    /// A job already running finishes in the background; it is not
    /// waited for.
    pub fn shutdown(&mut self) {
        self.shutdown_flag();
        // Detach: a running translation may sit in its settle delay.
        self.handle.take();
    }

    /// Stops accepting jobs, then waits for the running one to finish.
    pub fn shutdown_and_join(&mut self) {
        self.shutdown_flag();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("translation worker panicked");
            }
        }
    }

    fn shutdown_flag(&self) {
        let mut slot = self.shared.lock();
        slot.shutdown = true;
        slot.pending = None;
        self.shared.ready.notify_all();
    }
}

impl Drop for TranslationWorker {
    fn drop(&mut self) {
        self.shutdown_flag();
    }
}

impl std::fmt::Debug for TranslationWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationWorker")
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

/// Blocks until a job is available or the worker is shut down.
fn next_job(shared: &Shared) -> Option<TranslationJob> {
    let mut slot = shared.lock();
    loop {
        if slot.shutdown {
            return None;
        }
        if let Some(job) = slot.pending.take() {
            slot.busy = true;
            return Some(job);
        }
        slot = shared
            .ready
            .wait(slot)
            .unwrap_or_else(PoisonError::into_inner);
    }
}
