//! Command-line interface.

use crate::format::DateMode;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Terminal client for StockSense AI.
///
/// Search stocks as you type, add them to your watchlist and peek at
/// their details without leaving the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "stocksense")]
#[command(version)]
#[command(
    about = "Terminal client for StockSense AI stock search and watchlist",
    long_about = None
)]
pub struct Args {
    /// Base URL of the StockSense server
    #[arg(short = 'u', long, env = "STOCKSENSE_SERVER")]
    pub server: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "STOCKSENSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Quiet period before a search is sent (e.g. 300ms, 1s)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub debounce: Option<Duration>,

    /// Date style in the header
    #[arg(long, value_parser = parse_date_mode)]
    pub date_format: Option<DateMode>,

    /// Disable the animated background
    #[arg(long)]
    pub no_background: bool,

    /// Cookie header of a logged-in session (required by the watchlist)
    #[arg(long, env = "STOCKSENSE_SESSION", hide_env_values = true)]
    pub session_cookie: Option<String>,

    /// Directory for log files
    #[arg(long, env = "STOCKSENSE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Batch mode: run one search, print the results and exit
    #[arg(short = 'b', long, requires = "query")]
    pub batch: bool,

    /// Query for batch mode
    #[arg(short = 'q', long)]
    pub query: Option<String>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub sample_config: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn parse_date_mode(s: &str) -> Result<DateMode, String> {
    s.parse()
}

impl Args {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
