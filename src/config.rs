//! Configuration file handling with TOML support.

use crate::cli::Args;
use crate::format::DateMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// StockSense server connection
    #[serde(default)]
    pub server: ServerConfig,

    /// Search box behavior
    #[serde(default)]
    pub search: SearchConfig,

    /// Toast settings
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Animated background
    #[serde(default)]
    pub background: BackgroundConfig,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the StockSense web app
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Raw `Cookie` header value for the logged-in session
    #[serde(default)]
    pub session_cookie: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            session_cookie: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a query is sent, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Shortest query (after trimming) that is sent
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    crate::debounce::DEFAULT_WAIT.as_millis() as u64
}
fn default_min_query_len() -> usize {
    crate::search::MIN_QUERY_LEN
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long a toast stays up, in milliseconds
    #[serde(default = "default_toast_delay_ms")]
    pub delay_ms: u64,

    /// Oldest toasts are evicted beyond this many
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_toast_delay_ms(),
            max_visible: default_max_visible(),
        }
    }
}

fn default_toast_delay_ms() -> u64 {
    crate::notify::DEFAULT_DELAY.as_millis() as u64
}
fn default_max_visible() -> usize {
    crate::notify::DEFAULT_MAX_VISIBLE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_particles")]
    pub particles: usize,
    #[serde(default = "default_chart_lines")]
    pub chart_lines: usize,
    #[serde(default = "default_glows")]
    pub glows: usize,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            particles: default_particles(),
            chart_lines: default_chart_lines(),
            glows: default_glows(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_particles() -> usize {
    crate::background::PARTICLE_COUNT
}
fn default_chart_lines() -> usize {
    crate::background::CHART_LINE_COUNT
}
fn default_glows() -> usize {
    crate::background::GLOW_COUNT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Prefix for money amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Date style in the header: short, medium, long, time, datetime
    #[serde(default)]
    pub date_format: DateMode,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            date_format: DateMode::default(),
        }
    }
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from default location or fall back to defaults.
    pub fn load_or_default() -> Self {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to load config: {:#}", e);
                    }
                }
            }
        }
        Config::default()
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("stocksense").join("config.toml"))
    }
}

/// Effective settings after merging config file and command line.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub timeout: u64,
    pub session_cookie: Option<String>,
    pub debounce: Duration,
    pub min_query_len: usize,
    pub toast_delay: Duration,
    pub max_toasts: usize,
    pub background: Option<crate::background::ElementCounts>,
    pub currency_symbol: String,
    pub date_format: DateMode,
}

impl Settings {
    /// Command-line flags win over the config file.
    pub fn resolve(args: &Args, config: &Config) -> Self {
        let background = (config.background.enabled && !args.no_background).then(|| {
            crate::background::ElementCounts {
                particles: config.background.particles,
                chart_lines: config.background.chart_lines,
                glows: config.background.glows,
            }
        });

        Self {
            base_url: args
                .server
                .clone()
                .unwrap_or_else(|| config.server.base_url.clone()),
            timeout: args.timeout.unwrap_or(config.server.timeout),
            session_cookie: args
                .session_cookie
                .clone()
                .or_else(|| config.server.session_cookie.clone()),
            debounce: args
                .debounce
                .unwrap_or(Duration::from_millis(config.search.debounce_ms)),
            min_query_len: config.search.min_query_len.max(1),
            toast_delay: Duration::from_millis(config.notifications.delay_ms),
            max_toasts: config.notifications.max_visible,
            background,
            currency_symbol: config.display.currency_symbol.clone(),
            date_format: args.date_format.unwrap_or(config.display.date_format),
        }
    }
}

/// Generate a sample configuration file content.
pub fn sample_config() -> &'static str {
    r##"# StockSense terminal client configuration

[server]
# Where the StockSense web app runs
base_url = "http://127.0.0.1:5000"
# Request timeout in seconds
timeout = 10
# Cookie header of a logged-in browser session (needed for the watchlist)
# session_cookie = "session=..."

[search]
# Quiet period before a query is sent
debounce_ms = 300
# Shortest query that is sent
min_query_len = 2

[notifications]
# How long a toast stays up
delay_ms = 3000
# Oldest toasts are evicted beyond this many
max_visible = 5

[background]
enabled = true
particles = 100
chart_lines = 8
glows = 3

[display]
currency_symbol = "$"
# short, medium, long, time, datetime
date_format = "medium"
"##
}
