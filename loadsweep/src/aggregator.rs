//! Merge policy from per-worker results to one summary.
//!
//! Tail latencies are merged conservatively: the aggregate p95 and p99 are the largest
//! per-worker p95 and p99. That is an upper bound on the percentile of the pooled samples,
//! not the pooled percentile itself. Keeping every raw sample around for an exact merge is
//! what this avoids, since memory would then grow with `concurrency * operations`.
//!
//! Every reduction here (sums and maxima) is commutative and associative, so workers can
//! finish in any order.
use loadsweep_core::{AggregateResult, TargetSpec, WorkerResult, WorkerStatus};
use std::time::Duration;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

pub struct ResultAggregator<'a> {
    target: &'a TargetSpec,
    concurrency: usize,
}

impl<'a> ResultAggregator<'a> {
    pub fn new(target: &'a TargetSpec, concurrency: usize) -> Self {
        Self {
            target,
            concurrency,
        }
    }

    /// Reduce `workers` against the run's own wall-clock bracket.
    ///
    /// No results at all is reported as zeros rather than an error, so a configuration where
    /// nothing ran still shows up in the report.
    pub fn aggregate(&self, workers: &[WorkerResult], wall_clock: Duration) -> AggregateResult {
        if workers.is_empty() {
            warn!(
                "No worker results for target {} at concurrency {}.",
                self.target.name, self.concurrency
            );
        }

        let total_ops: u64 = workers.iter().map(|w| w.succeeded_ops).sum();
        let attempted_ops: u64 = workers.iter().map(|w| w.attempted_ops).sum();
        let failed_workers = workers
            .iter()
            .filter(|w| w.status != WorkerStatus::Completed)
            .count();

        // NOTE: Summed in integer nanoseconds so the result is identical for any worker order.
        let weighted_nanos: u128 = workers
            .iter()
            .map(|w| w.latency.mean.as_nanos() * w.succeeded_ops as u128)
            .sum();
        let mean = if total_ops == 0 {
            Duration::ZERO
        } else {
            nanos_to_duration(weighted_nanos / total_ops as u128)
        };

        AggregateResult {
            target: self.target.name.clone(),
            kind: self.target.kind,
            concurrency: self.concurrency,
            total_ops,
            attempted_ops,
            failed_workers,
            wall_clock,
            throughput: throughput(total_ops, wall_clock),
            mean,
            p95: max_of(workers, |w| w.latency.p95),
            p99: max_of(workers, |w| w.latency.p99),
            max: max_of(workers, |w| w.latency.max),
        }
    }
}

/// Operations per second of wall clock; `0.0` for an empty bracket.
pub fn throughput(total_ops: u64, wall_clock: Duration) -> f64 {
    if wall_clock.is_zero() {
        0.
    } else {
        total_ops as f64 / wall_clock.as_secs_f64()
    }
}

fn max_of(workers: &[WorkerResult], field: impl Fn(&WorkerResult) -> Duration) -> Duration {
    workers.iter().map(field).max().unwrap_or_default()
}

fn nanos_to_duration(nanos: u128) -> Duration {
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .unwrap_or(Duration::MAX)
}
