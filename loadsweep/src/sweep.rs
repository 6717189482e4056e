use crate::report::ReportSink;
use crate::run::WorkloadRun;
use crate::target::TargetFactory;
use loadsweep_core::SweepConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Runs every configuration of a [`SweepConfig`] one after another.
///
/// Runs never overlap, so one configuration's load cannot bleed into the next one's
/// latencies. Each report is handed to the sink as soon as its run finishes.
pub struct Sweep<F> {
    config: SweepConfig,
    factory: Arc<F>,
}

impl<F: TargetFactory> Sweep<F> {
    pub fn new(config: SweepConfig, factory: Arc<F>) -> Self {
        Self { config, factory }
    }

    /// Drive the sweep, stopping at the first sink error.
    #[instrument(name = "sweep", skip_all)]
    pub async fn run<S: ReportSink>(self, mut sink: S) -> Result<(), S::Error> {
        let start = Instant::now();
        let total = self.config.len();
        if total == 0 {
            warn!("Nothing to run: the sweep has no targets or no concurrency levels.");
        }

        for (idx, workload) in self.config.workloads().enumerate() {
            info!(
                "Run {}/{}: {} at concurrency {}",
                idx + 1,
                total,
                workload.target.name,
                workload.concurrency
            );
            let report = WorkloadRun::new(workload, self.factory.clone()).run().await;
            sink.record(&report)?;
        }

        sink.finish()?;
        let elapsed = Duration::from_millis(start.elapsed().as_millis() as u64);
        info!("Sweep complete in {}", humantime::format_duration(elapsed));
        Ok(())
    }
}
