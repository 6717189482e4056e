//! The `loadsweep` command: read a sweep from YAML, run it, write CSV reports.
use anyhow::Context;
use loadsweep::Sweep;
use loadsweep_targets::DefaultTargetFactory;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

pub mod args;
pub mod config;
pub mod logging;
pub mod report;

pub use args::Args;
pub use report::CsvReport;

pub async fn run(args: Args) -> anyhow::Result<()> {
    if let Some(addr) = args.prometheus {
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .with_context(|| format!("Failed to start the Prometheus exporter on {addr}"))?;
        info!("Serving metrics on {addr}");
    }

    let config = config::load(&args)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    info!(
        "Sweeping {} targets x {} concurrency levels, {} operations per worker",
        config.targets.len(),
        config.concurrency.len(),
        config.operations_per_worker
    );

    let report = CsvReport::create(&args.out_dir, &args.summary_file, &args.workers_file)?;
    Sweep::new(config, Arc::new(DefaultTargetFactory))
        .run(report)
        .await
        .context("Failed to write the report")?;
    Ok(())
}
