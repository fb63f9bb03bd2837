//! Per-symbol detail panel reached from a result row's link.

use crate::api::StockApi;
use crate::app::AppEvent;
use crate::error::ClientError;
use crate::format::{format_currency, format_date, format_large_number, format_percentage, DateMode};
use crate::models::StockInfo;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    #[default]
    Closed,
    Loading { symbol: String },
    Loaded(Box<StockInfo>),
    Failed { symbol: String, message: String },
}

/// Loads and holds the info shown in the detail panel.
pub struct DetailController<A: StockApi> {
    api: Arc<A>,
    tx: UnboundedSender<AppEvent>,
    seq: u64,
    state: DetailState,
    pending: Option<JoinHandle<()>>,
}

impl<A: StockApi> DetailController<A> {
    pub fn new(api: Arc<A>, tx: UnboundedSender<AppEvent>) -> Self {
        Self {
            api,
            tx,
            seq: 0,
            state: DetailState::Closed,
            pending: None,
        }
    }

    /// Open the panel for `symbol`, replacing any load in progress.
    pub fn open(&mut self, symbol: &str) -> u64 {
        self.abort_pending();
        self.seq += 1;
        self.state = DetailState::Loading {
            symbol: symbol.to_string(),
        };

        let seq = self.seq;
        let symbol = symbol.to_string();
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        debug!(seq, %symbol, "loading detail");
        self.pending = Some(tokio::spawn(async move {
            let outcome = api.stock_info(&symbol).await;
            let _ = tx.send(AppEvent::InfoLoaded {
                seq,
                symbol,
                outcome,
            });
        }));
        seq
    }

    pub fn close(&mut self) {
        self.abort_pending();
        self.seq += 1;
        self.state = DetailState::Closed;
    }

    /// Apply a finished load. Returns `false` for stale replies.
    pub fn apply(
        &mut self,
        seq: u64,
        symbol: String,
        outcome: Result<StockInfo, ClientError>,
    ) -> bool {
        if seq != self.seq {
            debug!(seq, latest = self.seq, %symbol, "dropping stale detail reply");
            return false;
        }
        self.pending = None;
        self.state = match outcome {
            Ok(info) => DetailState::Loaded(Box::new(info)),
            Err(err) => {
                warn!(%symbol, kind = err.kind(), error = %err, "detail load failed");
                let message = match err {
                    ClientError::Rejected(Some(reason)) => reason,
                    other => other.to_string(),
                };
                DetailState::Failed { symbol, message }
            }
        };
        true
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != DetailState::Closed
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<A: StockApi> Drop for DetailController<A> {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

/// Label/value pairs of the panel body, formatted for display.
pub fn info_lines(
    info: &StockInfo,
    currency: &str,
    dates: DateMode,
) -> Vec<(&'static str, String)> {
    let money = |v: Option<f64>| v.map(|v| format_currency(v, currency)).unwrap_or_else(na);
    let big = |v: Option<f64>| v.map(format_large_number).unwrap_or_else(na);
    let range = |lo: Option<f64>, hi: Option<f64>| match (lo, hi) {
        (Some(lo), Some(hi)) => format!(
            "{} - {}",
            format_currency(lo, currency),
            format_currency(hi, currency)
        ),
        _ => na(),
    };

    let change = match (info.day_change, info.day_change_percent) {
        (Some(abs), Some(pct)) => format!(
            "{}{} ({})",
            if abs >= 0.0 { "+" } else { "" },
            format_currency(abs, currency),
            format_percentage(pct)
        ),
        (None, Some(pct)) => format_percentage(pct),
        _ => na(),
    };

    vec![
        ("Price", money(info.price)),
        ("Change", change),
        ("Day range", range(info.day_low, info.day_high)),
        ("52w range", range(info.fifty_two_week_low, info.fifty_two_week_high)),
        (
            "Market cap",
            info.market_cap
                .map(|v| format!("{}{}", currency, format_large_number(v)))
                .unwrap_or_else(na),
        ),
        ("Volume", big(info.volume)),
        ("Avg volume", big(info.avg_volume)),
        (
            "P/E",
            info.pe_ratio.map(|v| format!("{v:.2}")).unwrap_or_else(na),
        ),
        ("Sector", info.sector.clone().unwrap_or_else(na)),
        ("Industry", info.industry.clone().unwrap_or_else(na)),
        (
            "As of",
            info.as_of
                .as_deref()
                .map(|d| format_date(d, dates))
                .unwrap_or_else(na),
        ),
    ]
}

fn na() -> String {
    "N/A".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn apple() -> StockInfo {
        StockInfo {
            symbol: "AAPL".into(),
            name: "Apple Inc.".into(),
            price: Some(189.84),
            day_change: Some(-2.5),
            day_change_percent: Some(-1.3),
            market_cap: Some(2_950_000_000_000.0),
            volume: Some(48_200_000.0),
            ..Default::default()
        }
    }

    async fn next_info(
        rx: &mut UnboundedReceiver<AppEvent>,
    ) -> (u64, String, Result<StockInfo, ClientError>) {
        loop {
            if let Some(AppEvent::InfoLoaded { seq, symbol, outcome }) = rx.recv().await {
                return (seq, symbol, outcome);
            }
        }
    }

    #[tokio::test]
    async fn test_open_loads_info() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut detail = DetailController::new(Arc::new(FakeApi::default().with_info(apple())), tx);

        detail.open("AAPL");
        assert!(matches!(detail.state(), DetailState::Loading { .. }));

        let (seq, symbol, outcome) = next_info(&mut rx).await;
        assert!(detail.apply(seq, symbol, outcome));
        assert_eq!(detail.state(), &DetailState::Loaded(Box::new(apple())));
    }

    #[tokio::test]
    async fn test_unknown_symbol_shows_server_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut detail = DetailController::new(Arc::new(FakeApi::default()), tx);

        detail.open("NOPE");
        let (seq, symbol, outcome) = next_info(&mut rx).await;
        detail.apply(seq, symbol, outcome);

        assert_eq!(
            detail.state(),
            &DetailState::Failed {
                symbol: "NOPE".into(),
                message: "Could not retrieve information for NOPE".into()
            }
        );
    }

    #[tokio::test]
    async fn test_reply_after_close_is_dropped() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut detail = DetailController::new(Arc::new(FakeApi::default()), tx);

        let seq = detail.open("AAPL");
        detail.close();
        assert!(!detail.apply(seq, "AAPL".into(), Ok(apple())));
        assert!(!detail.is_open());
    }

    #[test]
    fn test_info_lines_formatting() {
        let lines = info_lines(&apple(), "$", DateMode::Medium);
        let get = |label: &str| lines.iter().find(|(l, _)| *l == label).unwrap().1.clone();

        assert_eq!(get("Price"), "$189.84");
        assert_eq!(get("Change"), "$-2.50 (-1.30%)");
        assert_eq!(get("Market cap"), "$2950.0B");
        assert_eq!(get("Volume"), "48.2M");
        assert_eq!(get("P/E"), "N/A");
        assert_eq!(get("Day range"), "N/A");
        assert_eq!(get("As of"), "N/A");
    }

    #[test]
    fn test_info_lines_server_date() {
        let info = StockInfo {
            as_of: Some("2024-03-01".into()),
            ..apple()
        };
        let lines = info_lines(&info, "$", DateMode::Short);
        assert!(lines.contains(&("As of", "3/1/2024".to_string())));

        let info = StockInfo {
            as_of: Some("garbage".into()),
            ..apple()
        };
        let lines = info_lines(&info, "$", DateMode::Short);
        assert!(lines.contains(&("As of", "Invalid Date".to_string())));
    }
}
