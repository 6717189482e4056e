//! One configuration of a sweep: N workers against one target, joined at a barrier.
use crate::aggregator::ResultAggregator;
use crate::target::TargetFactory;
use crate::worker::Worker;
use futures_util::future::{join_all, BoxFuture};
use loadsweep_core::{RunReport, TargetSpec, WorkerResult, WorkerStatus, WorkloadConfig};
use std::future::IntoFuture;
use std::num::NonZeroU64;
use std::sync::Arc;
use tokio::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};

/// Runs a [`WorkloadConfig`] to completion.
///
/// Every worker gets its own target from the factory and its own task. The run waits for all
/// of them, so a slow worker holds up the report but never affects another worker's numbers.
/// Nothing that goes wrong inside a worker escapes the run; it shows up as a
/// [`WorkerStatus`] in the report instead.
///
/// # Example
/// ```no_run
/// use loadsweep::prelude::*;
/// use std::num::{NonZeroU64, NonZeroUsize};
/// use std::sync::Arc;
///
/// struct Noop;
///
/// impl Target for Noop {
///     async fn execute(&mut self) -> Result<(), TargetError> {
///         Ok(())
///     }
/// }
///
/// struct NoopFactory;
///
/// impl TargetFactory for NoopFactory {
///     type Target = Noop;
///
///     async fn build(&self, _: &TargetSpec, _: usize) -> Result<Noop, ConstructionError> {
///         Ok(Noop)
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let config = WorkloadConfig::new(
///         TargetSpec::new("noop", TargetKind::Simulated),
///         NonZeroUsize::new(8).unwrap(),
///         NonZeroU64::new(100).unwrap(),
///     );
///     let report = WorkloadRun::new(config, Arc::new(NoopFactory)).await;
///     assert_eq!(report.aggregate.total_ops, 800);
/// }
/// ```
pub struct WorkloadRun<F> {
    config: WorkloadConfig,
    factory: Arc<F>,
}

impl<F: TargetFactory> WorkloadRun<F> {
    pub fn new(config: WorkloadConfig, factory: Arc<F>) -> Self {
        Self { config, factory }
    }

    #[instrument(name = "run", skip_all, fields(
        target = %self.config.target.name,
        kind = %self.config.target.kind,
        concurrency = self.config.concurrency.get(),
    ))]
    pub async fn run(self) -> RunReport {
        let WorkloadConfig {
            target,
            concurrency,
            operations,
        } = self.config;
        let target = Arc::new(target);
        info!(
            "Starting {} workers x {} operations against {}",
            concurrency, operations, target.name
        );

        #[cfg(feature = "metrics")]
        crate::worker::describe_metrics();

        let start = Instant::now();
        let handles: Vec<_> = (1..=concurrency.get())
            .map(|worker_id| {
                let factory = self.factory.clone();
                let target = target.clone();
                tokio::spawn(
                    run_worker(factory, target, worker_id, operations).in_current_span(),
                )
            })
            .collect();

        let joined = join_all(handles).await;
        let wall_clock = start.elapsed();

        let mut workers: Vec<WorkerResult> = joined
            .into_iter()
            .enumerate()
            .map(|(idx, res)| {
                let worker_id = idx + 1;
                res.unwrap_or_else(|err| {
                    error!("Worker {worker_id} did not finish: {err}");
                    WorkerResult::empty(worker_id, WorkerStatus::Crashed)
                })
            })
            .collect();
        workers.sort_by_key(|w| w.worker_id);

        let aggregate =
            ResultAggregator::new(&target, concurrency.get()).aggregate(&workers, wall_clock);
        info!("{aggregate}");

        RunReport { aggregate, workers }
    }
}

impl<F: TargetFactory> IntoFuture for WorkloadRun<F> {
    type Output = RunReport;
    type IntoFuture = BoxFuture<'static, RunReport>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.run())
    }
}

async fn run_worker<F: TargetFactory>(
    factory: Arc<F>,
    spec: Arc<TargetSpec>,
    worker_id: usize,
    operations: NonZeroU64,
) -> WorkerResult {
    match factory.build(&spec, worker_id).await {
        Ok(target) => {
            Worker::new(worker_id, operations, &spec.name)
                .run(target)
                .await
        }
        Err(err) => {
            warn!("Worker {worker_id} could not build its target: {err}");
            WorkerResult::empty(worker_id, WorkerStatus::ConstructionFailed)
        }
    }
}
