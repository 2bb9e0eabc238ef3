//! Deferred, cancelable background analysis.
//!
//! [`AnalysisRunner`] runs one analysis at a time on a worker thread. Every
//! submission bumps a generation counter and cancels the task it replaces;
//! a task publishes its result only if it is still the newest generation
//! when it finishes. Callers keep an [`AnalysisHandle`] to wait for or
//! cancel their own request.
//!
//! ```ignore
//! let runner = AnalysisRunner::new().with_delay(Duration::from_millis(500));
//! let first = runner.submit(window.to_vec(), AnalysisConfig::new(Method::TTide));
//! let second = runner.submit(window.to_vec(), AnalysisConfig::new(Method::Admiralty));
//! assert!(matches!(first.wait(), Err(AnalysisError::Superseded)));
//! let result = second.wait()?;
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::analyze_with_cancel;
use super::config::AnalysisConfig;
use super::error::AnalysisError;
use super::result::HarmonicAnalysisResult;
use crate::series::Observation;

/// Granularity of cancellation checks while a task is deferred.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared cancellation flag, polled by the estimators between constituents.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once cancellation has been requested.
    pub fn check(&self) -> Result<(), AnalysisError> {
        if self.is_cancelled() {
            Err(AnalysisError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Most recently published result.
#[derive(Clone, Debug)]
struct Published {
    generation: u64,
    result: HarmonicAnalysisResult,
}

type Outcome = Result<HarmonicAnalysisResult, AnalysisError>;

#[derive(Debug)]
enum Worker {
    Running(JoinHandle<Outcome>),
    Failed,
}

/// Handle to one submitted analysis.
#[derive(Debug)]
pub struct AnalysisHandle {
    generation: u64,
    cancel: CancelToken,
    worker: Worker,
}

impl AnalysisHandle {
    /// Generation number of this request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cancel this request.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Check if the worker has stopped.
    pub fn is_finished(&self) -> bool {
        match &self.worker {
            Worker::Running(join) => join.is_finished(),
            Worker::Failed => true,
        }
    }

    /// Block until the worker finishes.
    pub fn wait(self) -> Outcome {
        match self.worker {
            Worker::Running(join) => join.join().unwrap_or(Err(AnalysisError::WorkerPanicked)),
            Worker::Failed => Err(AnalysisError::WorkerPanicked),
        }
    }
}

/// State shared between the runner and its workers.
#[derive(Debug, Default)]
struct Shared {
    generation: AtomicU64,
    latest: Mutex<Option<Published>>,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Map a control-flow interruption to the right error for `generation`.
    fn interruption(&self, generation: u64) -> AnalysisError {
        if self.is_current(generation) {
            AnalysisError::Cancelled
        } else {
            AnalysisError::Superseded
        }
    }
}

/// Runs harmonic analyses in the background, newest request wins.
#[derive(Debug, Default)]
pub struct AnalysisRunner {
    delay: Duration,
    shared: Arc<Shared>,
    in_flight: Mutex<Option<CancelToken>>,
}

impl AnalysisRunner {
    /// Runner without deferral.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defer each task by `delay` before it starts computing.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Generation of the newest submission (0 before the first).
    pub fn current_generation(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }

    /// Submit an analysis of `window`, superseding any pending request.
    pub fn submit(&self, window: Vec<Observation>, config: AnalysisConfig) -> AnalysisHandle {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = CancelToken::new();
        if let Some(previous) = lock(&self.in_flight).replace(cancel.clone()) {
            previous.cancel();
        }

        let shared = Arc::clone(&self.shared);
        let token = cancel.clone();
        let delay = self.delay;
        let spawned = thread::Builder::new()
            .name(format!("tide-analysis-{}", generation))
            .spawn(move || run_task(&shared, generation, delay, &window, &config, &token));

        let worker = match spawned {
            Ok(join) => Worker::Running(join),
            Err(e) => {
                warn!(generation, error = %e, "failed to spawn analysis worker");
                Worker::Failed
            }
        };

        AnalysisHandle {
            generation,
            cancel,
            worker,
        }
    }

    /// Cancel the pending request, if any.
    pub fn cancel(&self) {
        if let Some(token) = lock(&self.in_flight).take() {
            token.cancel();
        }
    }

    /// The most recently published result and its generation.
    pub fn latest(&self) -> Option<(u64, HarmonicAnalysisResult)> {
        lock(&self.shared.latest)
            .as_ref()
            .map(|p| (p.generation, p.result.clone()))
    }
}

fn run_task(
    shared: &Shared,
    generation: u64,
    delay: Duration,
    window: &[Observation],
    config: &AnalysisConfig,
    cancel: &CancelToken,
) -> Outcome {
    let deadline = Instant::now() + delay;
    loop {
        if cancel.is_cancelled() {
            return Err(shared.interruption(generation));
        }
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        analyze_with_cancel(window, config, cancel)
    }))
    .unwrap_or(Err(AnalysisError::WorkerPanicked));

    let result = match outcome {
        Ok(result) => result,
        Err(AnalysisError::Cancelled) => return Err(shared.interruption(generation)),
        Err(e) => {
            debug!(generation, error = %e, "analysis failed");
            return Err(e);
        }
    };

    // Check and publish under the lock so an older task cannot overwrite a newer one
    let mut latest = lock(&shared.latest);
    if !shared.is_current(generation) || cancel.is_cancelled() {
        debug!(generation, "discarding result of stale analysis");
        return Err(shared.interruption(generation));
    }
    info!(
        generation,
        method = %result.method,
        constituents = result.constituents.len(),
        "published analysis"
    );
    *latest = Some(Published {
        generation,
        result: result.clone(),
    });
    Ok(result)
}
