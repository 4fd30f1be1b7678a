use brrtmvc::cli::{run_cli, Cli};
use brrtmvc::logging::{init_logging, LogConfig};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging(&LogConfig::from_env())?;
    run_cli(Cli::parse())
}
