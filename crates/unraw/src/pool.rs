//! Fixed-size worker pool draining a bounded job queue.
//!
//! The producer (normally the [`PathWalker`](crate::PathWalker) sink) calls
//! [`WorkerPool::submit`] for every discovered file and then
//! [`WorkerPool::finish`] to close the queue and wait for the workers. Each
//! worker classifies its processor's result into shared atomic counters or
//! the [`ErrorCollector`].

use std::any::Any;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, error, warn};
use unraw_config::{QUEUE_SLOTS_PER_WORKER, resolve_workers};

use crate::cancel::CancellationToken;
use crate::collector::ErrorCollector;
use crate::errors::{AggregateError, TransformError};
use crate::transform::{FileOutcome, FileProcessor};

const POOL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::pool");

/// Counts of files handled successfully by a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    processed: usize,
    rewritten: usize,
}

impl RunSummary {
    /// Creates a summary from its counts.
    #[must_use]
    pub const fn new(processed: usize, rewritten: usize) -> Self {
        Self {
            processed,
            rewritten,
        }
    }

    /// Files that were rewritten or found unchanged.
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.processed
    }

    /// Files that were rewritten.
    #[must_use]
    pub const fn rewritten(&self) -> usize {
        self.rewritten
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rewrote {} file(s); processed {} file(s)",
            self.rewritten, self.processed
        )
    }
}

/// What a drained pool hands back to the caller.
#[derive(Debug)]
pub struct PoolReport {
    summary: RunSummary,
    errors: Option<AggregateError>,
}

impl PoolReport {
    /// Returns the success counters.
    #[must_use]
    pub const fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Returns the per-file failures, if any.
    #[must_use]
    pub const fn errors(&self) -> Option<&AggregateError> {
        self.errors.as_ref()
    }

    /// Splits the report into its counters and failures.
    #[must_use]
    pub fn into_parts(self) -> (RunSummary, Option<AggregateError>) {
        (self.summary, self.errors)
    }
}

#[derive(Debug, Default)]
struct Shared {
    processed: AtomicUsize,
    rewritten: AtomicUsize,
    errors: ErrorCollector,
}

impl Shared {
    fn record(&self, path: PathBuf, outcome: thread::Result<Result<FileOutcome, TransformError>>) {
        match outcome {
            Ok(Ok(FileOutcome::Rewritten { .. })) => {
                self.processed.fetch_add(1, Ordering::SeqCst);
                self.rewritten.fetch_add(1, Ordering::SeqCst);
            }
            Ok(Ok(FileOutcome::Unchanged)) => {
                self.processed.fetch_add(1, Ordering::SeqCst);
            }
            Ok(Ok(FileOutcome::Skipped)) => {
                debug!(target: POOL_TARGET, path = %path.display(), "file skipped");
            }
            Ok(Err(failure)) => {
                error!(target: POOL_TARGET, path = %failure.path().display(), error = %failure, "file failed");
                self.errors.add(failure);
            }
            Err(payload) => {
                let failure = TransformError::Worker {
                    message: panic_message(payload.as_ref()),
                    path,
                };
                error!(target: POOL_TARGET, path = %failure.path().display(), error = %failure, "worker panicked");
                self.errors.add(failure);
            }
        }
    }

    fn summary(&self) -> RunSummary {
        RunSummary::new(
            self.processed.load(Ordering::SeqCst),
            self.rewritten.load(Ordering::SeqCst),
        )
    }
}

/// Pool of worker threads sharing one bounded queue of file paths.
pub struct WorkerPool {
    sender: Sender<PathBuf>,
    handles: Vec<JoinHandle<()>>,
    shared: Arc<Shared>,
}

impl WorkerPool {
    /// Spawns `workers` threads that each run `processor` on queued paths
    /// until the queue closes or `cancel` is observed.
    ///
    /// A count of 0 means one per available CPU, and the count is capped at
    /// [`MAX_WORKERS`](unraw_config::MAX_WORKERS).
    ///
    /// # Errors
    ///
    /// Returns the IO error reported by the OS if a thread cannot be spawned.
    /// Workers started before the failure are shut down first.
    pub fn start(
        workers: usize,
        processor: Arc<dyn FileProcessor>,
        cancel: &CancellationToken,
    ) -> io::Result<Self> {
        let workers = resolve_workers(workers);
        let capacity = workers.saturating_mul(QUEUE_SLOTS_PER_WORKER);
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        let shared = Arc::new(Shared::default());

        let mut handles = Vec::with_capacity(workers);
        for index in 0..workers {
            let worker = Worker {
                receiver: receiver.clone(),
                processor: Arc::clone(&processor),
                cancel: cancel.clone(),
                shared: Arc::clone(&shared),
            };
            let spawned = thread::Builder::new()
                .name(format!("unraw-worker-{index}"))
                .spawn(move || worker.run());
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(spawn_error) => {
                    drop(sender);
                    join_all(handles);
                    return Err(spawn_error);
                }
            }
        }

        debug!(target: POOL_TARGET, workers, "worker pool started");
        Ok(Self {
            sender,
            handles,
            shared,
        })
    }

    /// Returns the number of worker threads.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.handles.len()
    }

    /// Queues `path`, blocking while the queue is full.
    ///
    /// Returns `false` once no worker is left to receive it, which happens
    /// after every worker has observed cancellation.
    pub fn submit(&self, path: PathBuf) -> bool {
        self.sender.send(path).is_ok()
    }

    /// Closes the queue, waits for every worker and returns the results.
    #[must_use]
    pub fn finish(self) -> PoolReport {
        let Self {
            sender,
            handles,
            shared,
        } = self;
        drop(sender);
        join_all(handles);

        PoolReport {
            summary: shared.summary(),
            errors: shared.errors.drain(),
        }
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.handles.len())
            .field("summary", &self.shared.summary())
            .finish_non_exhaustive()
    }
}

struct Worker {
    receiver: Receiver<PathBuf>,
    processor: Arc<dyn FileProcessor>,
    cancel: CancellationToken,
    shared: Arc<Shared>,
}

impl Worker {
    fn run(self) {
        for path in &self.receiver {
            if self.cancel.is_cancelled() {
                debug!(target: POOL_TARGET, "worker stopping on cancellation");
                break;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                self.processor.process(&self.cancel, &path)
            }));
            self.shared.record(path, outcome);
        }
    }
}

fn join_all(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if handle.join().is_err() {
            warn!(target: POOL_TARGET, "worker thread terminated abnormally");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_owned();
    }
    payload
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_else(|| String::from("unknown panic payload"))
}
