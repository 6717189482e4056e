use crate::stats::as_millis_f64;
use crate::{LatencyStats, TargetKind};
use std::fmt;
use std::time::Duration;

/// How a worker's run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerStatus {
    /// Every operation was attempted.
    Completed,
    /// A connection error stopped the worker early.
    Aborted,
    /// No target could be built; nothing was attempted.
    ConstructionFailed,
    /// The worker task panicked; its partial results are lost.
    Crashed,
}

impl WorkerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerStatus::Completed => "completed",
            WorkerStatus::Aborted => "aborted",
            WorkerStatus::ConstructionFailed => "construction_failed",
            WorkerStatus::Crashed => "crashed",
        }
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one worker. Produced once at the end of its run.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkerResult {
    /// 1-based id within the run.
    pub worker_id: usize,
    pub status: WorkerStatus,
    pub attempted_ops: u64,
    pub succeeded_ops: u64,
    /// The worker's own bracket around its operation loop.
    pub total_elapsed: Duration,
    /// Computed over successful operations only.
    pub latency: LatencyStats,
}

impl WorkerResult {
    /// An all-zero result for a worker that never ran an operation.
    pub fn empty(worker_id: usize, status: WorkerStatus) -> Self {
        Self {
            worker_id,
            status,
            attempted_ops: 0,
            succeeded_ops: 0,
            total_elapsed: Duration::ZERO,
            latency: LatencyStats::default(),
        }
    }

    pub fn failed_ops(&self) -> u64 {
        self.attempted_ops - self.succeeded_ops
    }
}

impl fmt::Display for WorkerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "worker={} status={} ops={}/{} total={:.3?} mean={:.3?} p95={:.3?} p99={:.3?} max={:.3?}",
            self.worker_id,
            self.status,
            self.succeeded_ops,
            self.attempted_ops,
            self.total_elapsed,
            self.latency.mean,
            self.latency.p95,
            self.latency.p99,
            self.latency.max,
        )
    }
}

/// Cross-worker summary for one (target, concurrency) configuration.
///
/// `p95` and `p99` are the maximum of the per-worker percentiles: an upper bound on the
/// pooled percentile, not the pooled percentile itself.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateResult {
    pub target: String,
    pub kind: TargetKind,
    pub concurrency: usize,
    /// Sum of succeeded operations over all workers.
    pub total_ops: u64,
    pub attempted_ops: u64,
    /// Workers that did not complete every operation.
    pub failed_workers: usize,
    /// Bracket taken by the run around dispatch and join.
    pub wall_clock: Duration,
    /// Operations per second of wall clock.
    pub throughput: f64,
    pub mean: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub max: Duration,
}

impl AggregateResult {
    pub fn wall_clock_ms(&self) -> f64 {
        as_millis_f64(self.wall_clock)
    }
}

impl fmt::Display for AggregateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wall = Duration::from_millis(self.wall_clock.as_millis() as u64);
        write!(
            f,
            "target={} kind={} concurrency={} ops={} wall={} throughput={:.2}/s mean={:.3?} p95≈{:.3?} p99≈{:.3?} max={:.3?}",
            self.target,
            self.kind,
            self.concurrency,
            self.total_ops,
            humantime::format_duration(wall),
            self.throughput,
            self.mean,
            self.p95,
            self.p99,
            self.max,
        )
    }
}

/// Everything one run produced: the aggregate row and the per-worker rows, ordered by worker id.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub aggregate: AggregateResult,
    pub workers: Vec<WorkerResult>,
}
