use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub const DEFAULT_FILTER: &str = "loadsweep=info,loadsweep_targets=info,loadsweep_cli=info";

/// Install the global subscriber. `RUST_LOG` replaces [`DEFAULT_FILTER`] when set.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    FmtSubscriber::builder().with_env_filter(filter).init();
}
