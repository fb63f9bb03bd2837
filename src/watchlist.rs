//! Add-to-watchlist requests triggered from result rows.

use crate::api::StockApi;
use crate::app::AppEvent;
use crate::error::ClientError;
use crate::models::{Severity, WatchlistAddRequest};
use crate::notify::Notifier;
use crate::search::{AddState, ResultRow, SearchController};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const ADD_ERROR_TEXT: &str = "Error adding to watchlist";

/// Sends watchlist additions and reflects their outcome on the UI.
pub struct WatchlistClient<A: StockApi> {
    api: Arc<A>,
    tx: UnboundedSender<AppEvent>,
    in_flight: Vec<JoinHandle<()>>,
}

impl<A: StockApi> WatchlistClient<A> {
    pub fn new(api: Arc<A>, tx: UnboundedSender<AppEvent>) -> Self {
        Self {
            api,
            tx,
            in_flight: Vec::new(),
        }
    }

    /// Activate the add button of `row`.
    ///
    /// Disabled buttons ignore the activation. Returns whether a request
    /// was sent. Concurrent requests for the same symbol are not merged.
    pub fn add(&mut self, row: &ResultRow) -> bool {
        if !row.control.is_enabled() {
            return false;
        }

        self.in_flight.retain(|h| !h.is_finished());

        let request = WatchlistAddRequest::from(&row.result);
        let control_id = row.control.id;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        info!(symbol = %request.symbol, control_id, "adding to watchlist");

        self.in_flight.push(tokio::spawn(async move {
            let outcome = api.add_to_watchlist(&request).await;
            let _ = tx.send(AppEvent::WatchlistAdded {
                control_id,
                symbol: request.symbol,
                outcome,
            });
        }));
        true
    }

    /// Apply a finished request: mark the button done and toast, or toast
    /// the failure and leave the button clickable.
    pub fn apply(
        &self,
        search: &mut SearchController,
        notifier: &mut Notifier,
        control_id: u64,
        symbol: &str,
        outcome: Result<(), ClientError>,
    ) {
        match outcome {
            Ok(()) => {
                if let Some(row) = search.row_by_control_mut(control_id) {
                    row.control.state = AddState::Done;
                }
                notifier.notify(format!("{symbol} added to watchlist"), Severity::Success);
            }
            Err(err) => {
                warn!(symbol, control_id, kind = err.kind(), error = %err, "watchlist add failed");
                notifier.notify(ADD_ERROR_TEXT, Severity::Danger);
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.in_flight.iter().filter(|h| !h.is_finished()).count()
    }
}

impl<A: StockApi> Drop for WatchlistClient<A> {
    fn drop(&mut self) {
        for handle in self.in_flight.drain(..) {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::models::SearchResult;
    use crate::search::{InputOutcome, MIN_QUERY_LEN};
    use std::time::Duration;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    struct Harness {
        api: Arc<FakeApi>,
        search: SearchController,
        watchlist: WatchlistClient<FakeApi>,
        notifier: Notifier,
        rx: UnboundedReceiver<AppEvent>,
    }

    fn harness(api: FakeApi) -> Harness {
        let api = Arc::new(api);
        let (tx, rx) = mpsc::unbounded_channel();
        let mut search = SearchController::new(
            Arc::clone(&api),
            tx.clone(),
            Duration::from_millis(300),
            MIN_QUERY_LEN,
        );
        let InputOutcome::Scheduled(seq) = search.on_input("nv") else {
            panic!("expected a request");
        };
        let rows = vec![
            SearchResult {
                symbol: "NVDA".into(),
                name: "NVIDIA Corporation".into(),
            },
            SearchResult {
                symbol: "NVO".into(),
                name: "Novo Nordisk".into(),
            },
        ];
        search.apply(seq, "nv", Ok(rows));

        Harness {
            watchlist: WatchlistClient::new(Arc::clone(&api), tx),
            api,
            search,
            notifier: Notifier::default(),
            rx,
        }
    }

    async fn run_add(h: &mut Harness, index: usize) -> bool {
        let row = h.search.rows()[index].clone();
        if !h.watchlist.add(&row) {
            return false;
        }
        loop {
            match h.rx.recv().await {
                Some(AppEvent::WatchlistAdded {
                    control_id,
                    symbol,
                    outcome,
                }) => {
                    h.watchlist
                        .apply(&mut h.search, &mut h.notifier, control_id, &symbol, outcome);
                    return true;
                }
                // the harness' own search request may land here too
                Some(_) => continue,
                None => panic!("channel closed"),
            }
        }
    }

    fn toast_texts(notifier: &Notifier) -> Vec<(String, Severity)> {
        notifier
            .container()
            .map(|c| {
                c.toasts()
                    .map(|t| (t.message.text.clone(), t.message.severity))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_success_disables_button_and_toasts() {
        let mut h = harness(FakeApi::default());

        assert!(run_add(&mut h, 0).await);
        assert_eq!(h.search.rows()[0].control.state, AddState::Done);
        assert_eq!(h.search.rows()[1].control.state, AddState::Idle);
        assert_eq!(
            toast_texts(&h.notifier),
            vec![("NVDA added to watchlist".to_string(), Severity::Success)]
        );

        let sent = h.api.add_calls.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![WatchlistAddRequest {
                symbol: "NVDA".into(),
                name: "NVIDIA Corporation".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_done_button_ignores_further_clicks() {
        let mut h = harness(FakeApi::default());

        assert!(run_add(&mut h, 1).await);
        assert!(!run_add(&mut h, 1).await);
        assert!(!run_add(&mut h, 1).await);
        assert_eq!(h.api.add_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_button_clickable() {
        let mut h = harness(FakeApi::default().rejecting_adds("login required"));

        assert!(run_add(&mut h, 0).await);
        assert_eq!(h.search.rows()[0].control.state, AddState::Idle);
        assert_eq!(
            toast_texts(&h.notifier),
            vec![(ADD_ERROR_TEXT.to_string(), Severity::Danger)]
        );

        // retry is a plain re-click
        assert!(run_add(&mut h, 0).await);
        assert_eq!(h.api.add_calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reply_after_results_replaced_only_toasts() {
        let mut h = harness(FakeApi::default());
        let row = h.search.rows()[0].clone();

        h.search.on_input("x");
        h.watchlist.apply(&mut h.search, &mut h.notifier, row.control.id, "NVDA", Ok(()));

        assert!(h.search.rows().is_empty());
        assert_eq!(toast_texts(&h.notifier).len(), 1);
    }
}
