use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "resync-sim", version)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// TOML config file with a [resync] table
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Start from the 30-minute resync threshold instead of 2 minutes
    #[arg(long, global = true)]
    pub dvr: bool,

    /// Pause length (ms) above which resuming a live source jumps to the live edge
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub resync_threshold_ms: Option<i64>,

    /// Maximum age (ms, playback time) of buffered segment history
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub retention_window_ms: Option<i64>,

    /// How long (ms) the live indicator stays visible after a jump
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub indicator_ms: Option<i64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a scenario file against a simulated media session
    Run {
        /// Path to the scenario TOML
        scenario: PathBuf,

        /// Print one JSON object per report line instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML and exit
    Defaults,
}
