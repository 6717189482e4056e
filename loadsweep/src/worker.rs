use crate::target::Target;
use loadsweep_core::{LatencyStats, TargetError, WorkerResult, WorkerStatus};
use std::num::NonZeroU64;
use std::time::Duration;
use tokio::time::Instant;
#[allow(unused)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Upper bound on the samples reserved up front; larger budgets grow as they go.
const SAMPLE_RESERVE: u64 = 4096;

/// Runs a fixed number of sequential operations against one target.
pub struct Worker {
    worker_id: usize,
    operations: NonZeroU64,
    #[cfg_attr(not(feature = "metrics"), allow(unused))]
    label: String,
}

impl Worker {
    pub fn new(worker_id: usize, operations: NonZeroU64, label: &str) -> Self {
        Self {
            worker_id,
            operations,
            label: label.to_string(),
        }
    }

    /// Drive the target to completion, or until it reports a connection error.
    ///
    /// Operation errors are counted as attempted and skipped; they leave no latency sample.
    #[instrument(name = "worker", skip_all, fields(worker_id = self.worker_id))]
    pub async fn run<T: Target>(self, mut target: T) -> WorkerResult {
        let mut samples = Vec::with_capacity(self.operations.get().min(SAMPLE_RESERVE) as usize);
        let mut attempted_ops = 0;
        let mut status = WorkerStatus::Completed;

        let start = Instant::now();
        for op in 0..self.operations.get() {
            attempted_ops += 1;
            match timed(&mut target).await {
                Ok(elapsed) => {
                    trace!("Operation {op} took {elapsed:?}");
                    self.record_success(elapsed);
                    samples.push(elapsed);
                }
                Err((elapsed, err)) if !err.is_fatal() => {
                    warn!("Operation {op} failed after {elapsed:?}: {err}");
                    self.record_error();
                }
                Err((_, err)) => {
                    error!("Aborting after {attempted_ops} operations: {err}");
                    self.record_error();
                    status = WorkerStatus::Aborted;
                    break;
                }
            }
        }
        let total_elapsed = start.elapsed();

        let result = WorkerResult {
            worker_id: self.worker_id,
            status,
            attempted_ops,
            succeeded_ops: samples.len() as u64,
            total_elapsed,
            latency: LatencyStats::from_samples(&samples),
        };
        debug!("{result}");
        result
    }

    fn record_success(&self, _elapsed: Duration) {
        #[cfg(feature = "metrics")]
        {
            use loadsweep_core::{OPERATION_LABELS, TARGET_LABEL};
            metrics::histogram!(OPERATION_LABELS.latency, TARGET_LABEL => self.label.clone())
                .record(_elapsed.as_nanos() as f64);
            metrics::counter!(OPERATION_LABELS.success, TARGET_LABEL => self.label.clone())
                .increment(1);
        }
    }

    fn record_error(&self) {
        #[cfg(feature = "metrics")]
        {
            use loadsweep_core::{OPERATION_LABELS, TARGET_LABEL};
            metrics::counter!(OPERATION_LABELS.error, TARGET_LABEL => self.label.clone())
                .increment(1);
        }
    }
}

/// Execute one operation, bracketed by the monotonic clock.
pub async fn timed<T: Target>(target: &mut T) -> Result<Duration, (Duration, TargetError)> {
    let start = Instant::now();
    let res = target.execute().await;
    let elapsed = start.elapsed();
    match res {
        Ok(()) => Ok(elapsed),
        Err(err) => Err((elapsed, err)),
    }
}

#[cfg(feature = "metrics")]
pub(crate) fn describe_metrics() {
    use loadsweep_core::OPERATION_LABELS;
    metrics::describe_histogram!(
        OPERATION_LABELS.latency,
        metrics::Unit::Nanoseconds,
        "Latency of successful operations"
    );
    metrics::describe_counter!(OPERATION_LABELS.success, "Successful operations");
    metrics::describe_counter!(OPERATION_LABELS.error, "Failed operations");
}
