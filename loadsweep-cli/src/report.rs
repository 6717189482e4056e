//! CSV reports.
//!
//! The column layout is consumed by external plotting scripts and must not change: one
//! summary row per configuration, one row per worker. Latencies are in milliseconds.
use loadsweep::ReportSink;
use loadsweep_core::stats::as_millis_f64;
use loadsweep_core::{AggregateResult, RunReport, WorkerResult};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

pub const SUMMARY_HEADER: [&str; 9] = [
    "DBMS",
    "Threads",
    "TotalQueries",
    "TotalTime(ms)",
    "QPS",
    "AvgLatency(ms)",
    "P95(ms)",
    "P99(ms)",
    "Max(ms)",
];

pub const WORKERS_HEADER: [&str; 9] = [
    "DBMS", "Threads", "ThreadId", "Queries", "TotalMs", "AvgMs", "P95ms", "P99ms", "MaxMs",
];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unable to create `{}`: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    dbms: &'a str,
    threads: usize,
    total_queries: u64,
    total_time_ms: String,
    qps: String,
    avg_latency_ms: String,
    p95_ms: String,
    p99_ms: String,
    max_ms: String,
}

impl<'a> From<&'a AggregateResult> for SummaryRow<'a> {
    fn from(agg: &'a AggregateResult) -> Self {
        Self {
            dbms: &agg.target,
            threads: agg.concurrency,
            total_queries: agg.total_ops,
            total_time_ms: format!("{:.2}", agg.wall_clock_ms()),
            qps: format!("{:.2}", agg.throughput),
            avg_latency_ms: ms(agg.mean),
            p95_ms: ms(agg.p95),
            p99_ms: ms(agg.p99),
            max_ms: ms(agg.max),
        }
    }
}

#[derive(Serialize)]
struct WorkerRow<'a> {
    dbms: &'a str,
    threads: usize,
    thread_id: usize,
    queries: u64,
    total_ms: String,
    avg_ms: String,
    p95_ms: String,
    p99_ms: String,
    max_ms: String,
}

impl<'a> WorkerRow<'a> {
    fn new(agg: &'a AggregateResult, worker: &WorkerResult) -> Self {
        Self {
            dbms: &agg.target,
            threads: agg.concurrency,
            thread_id: worker.worker_id,
            queries: worker.succeeded_ops,
            total_ms: ms(worker.total_elapsed),
            avg_ms: ms(worker.latency.mean),
            p95_ms: ms(worker.latency.p95),
            p99_ms: ms(worker.latency.p99),
            max_ms: ms(worker.latency.max),
        }
    }
}

fn ms(dur: Duration) -> String {
    format!("{:.3}", as_millis_f64(dur))
}

/// Writes the summary and per-worker tables side by side, flushing both after every run.
pub struct CsvReport<W: Write> {
    summary: csv::Writer<W>,
    workers: csv::Writer<W>,
}

impl CsvReport<File> {
    /// Create (or truncate) both files under `dir`, creating `dir` if needed.
    pub fn create(dir: &Path, summary_file: &str, workers_file: &str) -> Result<Self, ReportError> {
        std::fs::create_dir_all(dir).map_err(|source| ReportError::Create {
            path: dir.to_path_buf(),
            source,
        })?;
        let open = |name: &str| {
            let path = dir.join(name);
            File::create(&path).map_err(|source| ReportError::Create { path, source })
        };
        let report = Self::new(open(summary_file)?, open(workers_file)?)?;
        info!(
            "Writing reports to {} and {}",
            dir.join(summary_file).display(),
            dir.join(workers_file).display()
        );
        Ok(report)
    }
}

impl<W: Write> CsvReport<W> {
    pub fn new(summary: W, workers: W) -> Result<Self, ReportError> {
        let mut summary = writer(summary);
        let mut workers = writer(workers);
        summary.write_record(SUMMARY_HEADER)?;
        workers.write_record(WORKERS_HEADER)?;
        summary.flush()?;
        workers.flush()?;
        Ok(Self { summary, workers })
    }

    /// Give back the underlying writers.
    pub fn into_inner(self) -> Result<(W, W), ReportError> {
        let summary = self.summary.into_inner().map_err(into_io)?;
        let workers = self.workers.into_inner().map_err(into_io)?;
        Ok((summary, workers))
    }
}

fn into_io<W>(err: csv::IntoInnerError<W>) -> std::io::Error {
    std::io::Error::new(err.error().kind(), err.error().to_string())
}

fn writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(inner)
}

impl<W: Write> ReportSink for CsvReport<W> {
    type Error = ReportError;

    fn record(&mut self, report: &RunReport) -> Result<(), Self::Error> {
        let agg = &report.aggregate;
        self.summary.serialize(SummaryRow::from(agg))?;
        for worker in &report.workers {
            self.workers.serialize(WorkerRow::new(agg, worker))?;
        }
        self.summary.flush()?;
        self.workers.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        self.summary.flush()?;
        self.workers.flush()?;
        Ok(())
    }
}
