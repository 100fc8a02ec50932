//! resync-sim: replays scripted player sessions through the live-resync core.
//!
//! A scenario is a source plus a timeline of host actions (pause, play, time
//! updates, live-edge changes, seek failures). Each step advances a manual
//! clock, so pauses of hours replay instantly and deterministically.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use resync_sim::{cli, config, runtime};

fn main() -> Result<()> {
    let args = cli::Args::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,resync_sim=info")
        }))
        .init();

    let resync = config::config_from_args(&args)?;

    match &args.cmd {
        cli::Command::Run { scenario, json } => runtime::run_file(resync, scenario, *json)?,
        cli::Command::Defaults => print!("{}", toml::to_string(&resync)?),
    }

    Ok(())
}
