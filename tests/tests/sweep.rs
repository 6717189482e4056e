mod utils;
#[allow(unused)]
use utils::*;

use loadsweep::prelude::*;
use loadsweep_cli::report::{SUMMARY_HEADER, WORKERS_HEADER};
use loadsweep_cli::{Args, CsvReport};
use loadsweep_targets::DefaultTargetFactory;
use std::num::{NonZeroU64, NonZeroUsize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn nz(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn rows(path: &Path) -> Vec<Vec<String>> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect()
}

#[tokio::test]
async fn simulated_and_local_scan_sweep() {
    init();

    let dir = tempfile::tempdir().unwrap();
    let movies = dir.path().join("movies.txt");
    std::fs::write(&movies, MOVIES).unwrap();

    let config = SweepConfig::new(vec![
        TargetSpec::new("Synthetic", TargetKind::Simulated).with_params(TargetParams {
            latency_mean: Some(Duration::from_millis(1)),
            latency_std_dev: Some(Duration::ZERO),
            ..Default::default()
        }),
        TargetSpec::new("File", TargetKind::LocalScan).with_params(TargetParams {
            path: Some(movies),
            ..Default::default()
        }),
    ])
    .concurrency(&[nz(1), nz(4)])
    .operations_per_worker(NonZeroU64::new(10).unwrap());

    let mut reports: Vec<RunReport> = vec![];
    Sweep::new(config, Arc::new(DefaultTargetFactory))
        .run(&mut reports)
        .await
        .unwrap();

    assert_eq!(reports.len(), 4);
    for report in &reports {
        let agg = &report.aggregate;
        assert_eq!(agg.total_ops, 10 * agg.concurrency as u64);
        assert_eq!(agg.failed_workers, 0);
        assert!(agg.throughput > 0.);
        assert!(agg.mean <= agg.max);
        assert!(agg.p95 <= agg.p99 && agg.p99 <= agg.max);
        assert_eq!(report.workers.len(), agg.concurrency);
    }

    let synthetic = &reports[0].aggregate;
    assert_eq!(synthetic.target, "Synthetic");
    assert!(synthetic.mean >= Duration::from_millis(1));
    assert_eq!(reports[2].aggregate.target, "File");
}

#[tokio::test]
async fn local_write_sweep() {
    init();

    let dir = tempfile::tempdir().unwrap();
    let people = dir.path().join("people.txt");
    std::fs::write(&people, "1;Dances To Thunder;Smith\n2;Anna;Jones\n").unwrap();
    let scratch = dir.path().join("scratch");

    let config = SweepConfig::new(vec![
        TargetSpec::new("File", TargetKind::LocalUpdate).with_params(TargetParams {
            path: Some(people.clone()),
            output_dir: Some(scratch.clone()),
            ..Default::default()
        }),
        TargetSpec::new("File", TargetKind::LocalAppend).with_params(TargetParams {
            rows: Some(50),
            output_dir: Some(scratch.clone()),
            ..Default::default()
        }),
    ])
    .concurrency(&[nz(1), nz(4)])
    .operations_per_worker(NonZeroU64::new(5).unwrap());

    let mut reports: Vec<RunReport> = vec![];
    Sweep::new(config, Arc::new(DefaultTargetFactory))
        .run(&mut reports)
        .await
        .unwrap();

    let kinds: Vec<_> = reports.iter().map(|r| r.aggregate.kind).collect();
    assert_eq!(
        kinds,
        [
            TargetKind::LocalUpdate,
            TargetKind::LocalUpdate,
            TargetKind::LocalAppend,
            TargetKind::LocalAppend
        ]
    );
    for report in &reports {
        assert_eq!(report.aggregate.failed_workers, 0);
        assert_eq!(report.aggregate.total_ops, 5 * report.aggregate.concurrency as u64);
    }
    assert_eq!(
        std::fs::read_to_string(&people).unwrap(),
        "1;Dances To Thunder;Smith\n2;Anna;Jones\n"
    );
    assert_eq!(std::fs::read_dir(&scratch).unwrap().count(), 0);
}

#[tokio::test]
async fn broken_target_does_not_stop_the_sweep() {
    init();

    let config = SweepConfig::new(vec![
        TargetSpec::new("Missing", TargetKind::LocalScan).with_params(TargetParams {
            path: Some("/no/such/movies.txt".into()),
            ..Default::default()
        }),
        TargetSpec::new("Synthetic", TargetKind::Simulated).with_params(TargetParams {
            latency_mean: Some(Duration::from_millis(1)),
            latency_std_dev: Some(Duration::ZERO),
            ..Default::default()
        }),
    ])
    .concurrency(&[nz(2)])
    .operations_per_worker(NonZeroU64::new(5).unwrap());

    let mut reports: Vec<RunReport> = vec![];
    Sweep::new(config, Arc::new(DefaultTargetFactory))
        .run(&mut reports)
        .await
        .unwrap();

    let missing = &reports[0];
    assert_eq!(missing.aggregate.total_ops, 0);
    assert_eq!(missing.aggregate.throughput, 0.);
    assert!(missing
        .workers
        .iter()
        .all(|w| w.status == WorkerStatus::ConstructionFailed));

    assert_eq!(reports[1].aggregate.total_ops, 10);
}

#[tokio::test]
async fn csv_reports_on_disk() {
    init();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("result");
    let config = SweepConfig::new(vec![TargetSpec::new("Synthetic", TargetKind::Simulated)
        .with_params(TargetParams {
            latency_mean: Some(Duration::from_millis(1)),
            latency_std_dev: Some(Duration::ZERO),
            ..Default::default()
        })])
    .concurrency(&[nz(1), nz(3)])
    .operations_per_worker(NonZeroU64::new(4).unwrap());

    let report = CsvReport::create(&out, "summary.csv", "workers.csv").unwrap();
    Sweep::new(config, Arc::new(DefaultTargetFactory))
        .run(report)
        .await
        .unwrap();

    let summary = rows(&out.join("summary.csv"));
    assert_eq!(summary[0], SUMMARY_HEADER);
    assert_eq!(summary.len(), 3);
    assert_eq!(summary[1][..3], ["Synthetic", "1", "4"]);
    assert_eq!(summary[2][..3], ["Synthetic", "3", "12"]);

    let workers = rows(&out.join("workers.csv"));
    assert_eq!(workers[0], WORKERS_HEADER);
    assert_eq!(workers.len(), 1 + 1 + 3);
    let ids: Vec<_> = workers[2..].iter().map(|row| row[2].as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
}

#[test]
#[ntest::timeout(30_000)]
fn command_line_end_to_end() {
    init();

    let dir = tempfile::tempdir().unwrap();
    let movies = dir.path().join("movies.txt");
    std::fs::write(&movies, MOVIES).unwrap();
    let config = dir.path().join("sweep.yaml");
    std::fs::write(
        &config,
        format!(
            r#"
operations_per_worker: 100
targets:
  - name: File
    kind: local_scan
    path: {}
    keyword: war
  - name: Synthetic
    kind: simulated
    latency_mean_ms: 1
    latency_std_dev_ms: 0
"#,
            movies.display()
        ),
    )
    .unwrap();

    let out = dir.path().join("out");
    let args = Args {
        config,
        concurrency: vec![nz(2)],
        operations: Some(NonZeroU64::new(3).unwrap()),
        out_dir: out.clone(),
        summary_file: "s.csv".into(),
        workers_file: "w.csv".into(),
        prometheus: None,
    };

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(loadsweep_cli::run(args)).unwrap();

    let summary = rows(&out.join("s.csv"));
    assert_eq!(summary.len(), 3);
    assert_eq!(summary[1][..3], ["File", "2", "6"]);
    assert_eq!(summary[2][..3], ["Synthetic", "2", "6"]);
    assert_eq!(rows(&out.join("w.csv")).len(), 1 + 2 + 2);
}

#[test]
#[ntest::timeout(10_000)]
fn command_line_rejects_empty_sweep() {
    init();

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("sweep.yaml");
    std::fs::write(&config, "targets: []\n").unwrap();

    let args = Args {
        config,
        concurrency: vec![],
        operations: None,
        out_dir: dir.path().join("out"),
        summary_file: "summary.csv".into(),
        workers_file: "workers.csv".into(),
        prometheus: None,
    };

    let rt = tokio::runtime::Runtime::new().unwrap();
    let err = rt.block_on(loadsweep_cli::run(args)).unwrap_err();
    assert!(format!("{err:#}").contains("no targets"));
    assert!(!dir.path().join("out").exists());
}
