//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use crate::config::SourceKind;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Emergency-dispatch alert watcher
///
/// Watches an alert feed, keeps the alerts near a chosen location and
/// announces them.
#[derive(Parser, Debug)]
#[command(name = "geoalert")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "GEOALERT_CONFIG")]
    pub config: Option<String>,

    /// Path to the alert database
    #[arg(long, global = true, env = "GEOALERT_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the alert feed until interrupted
    Watch(WatchArgs),

    /// Show recently stored alerts
    Recent(RecentArgs),

    /// Look up the coordinates of a postcode
    Geocode(GeocodeArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the watch command
#[derive(Parser, Debug, Default)]
pub struct WatchArgs {
    /// Postcode to centre the filter on
    #[arg(long)]
    pub postcode: Option<String>,

    /// House number (optional, refines the postcode lookup)
    #[arg(long, requires = "postcode")]
    pub house_number: Option<String>,

    /// Filter radius in kilometres
    #[arg(short, long)]
    pub radius: Option<f64>,

    /// Filter origin latitude (skips geocoding)
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Filter origin longitude (skips geocoding)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Event source
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,

    /// Feed URL (implies --source feed)
    #[arg(long)]
    pub feed_url: Option<String>,

    /// Coordinator tick interval in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: Option<u64>,

    /// Seconds between source polls
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: Option<u64>,

    /// Do not play a sound for alerts
    #[arg(long)]
    pub no_sound: bool,

    /// Sound file to play for alerts
    #[arg(long)]
    pub sound_file: Option<PathBuf>,
}

/// Arguments for the recent command
#[derive(Parser, Debug)]
pub struct RecentArgs {
    /// Maximum number of alerts to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,

    /// Show all stored alerts
    #[arg(long, conflicts_with = "limit")]
    pub all: bool,
}

/// Arguments for the geocode command
#[derive(Parser, Debug)]
pub struct GeocodeArgs {
    /// Postcode to look up
    pub postcode: String,

    /// House number
    #[arg(long)]
    pub house_number: Option<String>,
}

/// Event source argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceArg {
    /// Synthetic alerts for testing
    Simulated,
    /// HTTP JSON feed
    Feed,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Simulated => SourceKind::Simulated,
            SourceArg::Feed => SourceKind::Feed,
        }
    }
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
