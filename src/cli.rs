use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line interface for the Garuda server dashboard.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "garuda-dashboard",
    author,
    version,
    about = "Monitor and administer a Garuda server"
)]
pub struct Cli {
    /// Optional path to a configuration file (TOML, YAML, JSON).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Named profile to load (e.g. dev, staging, prod).
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Launch without opening the UI.
    #[arg(long)]
    pub headless: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ping the server's health endpoint.
    Ping,
    /// List the configuration files stored on the server.
    Files,
    /// Delete a configuration file, then list what remains.
    Remove { name: String },
    /// Print the download URL of a configuration file.
    DownloadUrl { name: String },
    /// Show the server settings.
    Settings,
    /// Replace the server settings.
    SaveSettings {
        #[arg(long)]
        max_file_size: i64,
        #[arg(long)]
        fetch_time: i64,
    },
}
