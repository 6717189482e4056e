use std::sync::OnceLock;
use tracing_subscriber::FmtSubscriber;

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        FmtSubscriber::builder()
            .with_env_filter("loadsweep=debug,loadsweep_targets=debug,loadsweep_cli=debug")
            .with_test_writer()
            .init();
    });
}

#[allow(unused)]
pub const MOVIES: &str = "\
1;War Games;1983
2;The War of the Worlds;1953
3;Casablanca;1942
4;Star Wars;1977
5;Heat;1995
";
