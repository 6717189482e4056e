use clap::Parser;
use std::net::SocketAddr;
use std::num::{NonZeroU64, NonZeroUsize};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "loadsweep")]
#[command(version)]
#[command(about = "Sweep targets across concurrency levels and report latency")]
#[command(long_about = None)]
pub struct Args {
    /// YAML file describing the targets to sweep
    #[arg(long = "config")]
    pub config: PathBuf,

    /// Concurrency levels, replacing the ones in the config file (e.g. 1,8,16,32)
    #[arg(short = 'c', long = "concurrency", value_delimiter = ',')]
    pub concurrency: Vec<NonZeroUsize>,

    /// Operations per worker, replacing the one in the config file
    #[arg(short = 'n', long = "operations")]
    pub operations: Option<NonZeroU64>,

    /// Directory the CSV reports are written to
    #[arg(short = 'o', long = "out-dir", default_value = "result")]
    pub out_dir: PathBuf,

    /// Summary report file name, one row per configuration
    #[arg(long = "summary-file", default_value = "summary.csv")]
    pub summary_file: String,

    /// Per-worker report file name, one row per worker
    #[arg(long = "workers-file", default_value = "workers.csv")]
    pub workers_file: String,

    /// Serve Prometheus metrics on this address while the sweep runs
    #[arg(long = "prometheus")]
    pub prometheus: Option<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["loadsweep", "--config", "sweep.yaml"]).unwrap();
        assert_eq!(args.config, PathBuf::from("sweep.yaml"));
        assert!(args.concurrency.is_empty());
        assert_eq!(args.operations, None);
        assert_eq!(args.out_dir, PathBuf::from("result"));
        assert_eq!(args.summary_file, "summary.csv");
        assert_eq!(args.workers_file, "workers.csv");
        assert_eq!(args.prometheus, None);
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "loadsweep",
            "--config",
            "sweep.yaml",
            "-c",
            "1,8,16,32",
            "-n",
            "50",
            "--prometheus",
            "127.0.0.1:9000",
        ])
        .unwrap();
        let levels: Vec<_> = args.concurrency.iter().map(|c| c.get()).collect();
        assert_eq!(levels, vec![1, 8, 16, 32]);
        assert_eq!(args.operations.map(|n| n.get()), Some(50));
        assert!(args.prometheus.is_some());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        assert!(Args::try_parse_from(["loadsweep", "--config", "x.yaml", "-c", "0"]).is_err());
    }

    #[test]
    fn config_is_required() {
        assert!(Args::try_parse_from(["loadsweep"]).is_err());
    }
}
