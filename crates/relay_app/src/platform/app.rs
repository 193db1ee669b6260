use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use relay_logging::relay_debug;

use super::cli::Cli;
use super::config::RelayConfig;
use super::{jobs, logging};

pub fn run_app() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(cli.log, level, &cli.log_file);
    relay_logging::set_job_label(cli.command.label());

    let config = RelayConfig::load(&cli.config)?;
    relay_debug!(
        "Loaded config from {:?}; state in {:?}",
        cli.config,
        cli.state_dir
    );

    // Jobs run strictly one call at a time; a single-threaded runtime is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("could not start the async runtime")?;

    runtime.block_on(jobs::dispatch(&cli.command, &config, &cli.state_dir))
}
