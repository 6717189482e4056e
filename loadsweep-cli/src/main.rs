use clap::Parser;
use loadsweep_cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    loadsweep_cli::logging::init();
    loadsweep_cli::run(args).await
}
