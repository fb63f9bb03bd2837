//! Data models for search results, watchlist requests and notifications.

use serde::{Deserialize, Serialize};

/// One matching instrument returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Ticker symbol (e.g., "AAPL", "RELIANCE.NS")
    pub symbol: String,
    /// Company or instrument name
    pub name: String,
}

impl SearchResult {
    /// Path of the per-symbol detail page.
    pub fn detail_path(&self) -> String {
        format!("/stock/{}", urlencoding::encode(&self.symbol))
    }
}

/// Body of `POST /api/watchlist/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistAddRequest {
    pub symbol: String,
    pub name: String,
}

impl From<&SearchResult> for WatchlistAddRequest {
    fn from(result: &SearchResult) -> Self {
        Self {
            symbol: result.symbol.clone(),
            name: result.name.clone(),
        }
    }
}

/// Reply of `POST /api/watchlist/add`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchlistAddResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply of `GET /api/stock/info`.
///
/// The server sends `"N/A"` for unknown numbers; those become `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StockInfo {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub day_change: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub day_change_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_volume: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub day_high: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub day_low: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fifty_two_week_low: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// `Date` header of the reply, kept as sent.
    #[serde(skip)]
    pub as_of: Option<String>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|v| v.is_finite()))
}

/// Notification severity, mapped to a toast color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Warning => write!(f, "warning"),
            Severity::Danger => write!(f, "danger"),
        }
    }
}

/// Text and severity of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastMessage {
    pub text: String,
    pub severity: Severity,
}

impl ToastMessage {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }
}
