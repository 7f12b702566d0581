use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jadwal", version, author, about = "Prayer-time phase clock for mosque dashboards and TV signage")]
pub struct Cli {
    /// Use this feed file instead of the one in config.toml
    #[arg(long, global = true)]
    pub feed: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's schedule and the current phase
    Times,
    /// Evaluate the phase clock once
    Status {
        /// Evaluate at this local time (HH:MM or HH:MM:SS) instead of now
        #[arg(long)]
        at: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the clock and print every phase change and iqomah beep
    Watch,
    /// Validate a feed file and store it in the local cache
    Import {
        /// Path to a JSON feed
        path: PathBuf,
    },
    /// Local feed cache management
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// List cached feeds
    Show,
    /// Remove all cached feeds
    Clear,
}
