//! Stock search: query editing, debounced requests and the result list.

use crate::api::StockApi;
use crate::app::AppEvent;
use crate::debounce::Debouncer;
use crate::error::ClientError;
use crate::models::SearchResult;
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Queries shorter than this (after trimming) are not sent.
pub const MIN_QUERY_LEN: usize = 2;

/// Inline message shown when a search fails.
pub const SEARCH_ERROR_TEXT: &str = "Error fetching results";

/// State of a row's add-to-watchlist button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddState {
    #[default]
    Idle,
    /// Added; the button is disabled for the rest of the session.
    Done,
}

/// The add-to-watchlist button embedded in a result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddControl {
    /// Unique across every row ever rendered, so late replies can find
    /// (or fail to find) the button that triggered them.
    pub id: u64,
    pub state: AddState,
}

impl AddControl {
    pub fn is_enabled(&self) -> bool {
        self.state == AddState::Idle
    }
}

/// A rendered search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub result: SearchResult,
    pub link: String,
    pub control: AddControl,
}

/// What the results area currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsView {
    #[default]
    Empty,
    Rows(Vec<ResultRow>),
    Error(String),
}

/// Result of feeding the controller a new query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Query too short: results cleared, nothing sent.
    Skipped,
    /// A request with this sequence number was scheduled.
    Scheduled(u64),
}

/// Owns the query buffer, the results area and the pending request.
///
/// Every scheduled request gets a new sequence number; scheduling aborts
/// the previous one and replies for anything but the latest number are
/// dropped, so the list always reflects the last query typed.
pub struct SearchController {
    query: String,
    seq: u64,
    loading: bool,
    view: ResultsView,
    selected: usize,
    next_control_id: u64,
    min_len: usize,
    debouncer: Debouncer<(u64, String)>,
}

impl SearchController {
    pub fn new<A: StockApi>(
        api: Arc<A>,
        tx: UnboundedSender<AppEvent>,
        debounce: Duration,
        min_len: usize,
    ) -> Self {
        let debouncer = Debouncer::new(debounce, move |(seq, query): (u64, String)| {
            let api = Arc::clone(&api);
            let tx = tx.clone();
            async move {
                let outcome = api.search(&query).await;
                // The receiver is gone only while the app is shutting down.
                let _ = tx.send(AppEvent::SearchCompleted {
                    seq,
                    query,
                    outcome,
                });
            }
            .boxed()
        });

        debug!(wait = ?debouncer.wait(), min_len, "search controller ready");

        Self {
            query: String::new(),
            seq: 0,
            loading: false,
            view: ResultsView::Empty,
            selected: 0,
            next_control_id: 0,
            min_len,
            debouncer,
        }
    }

    /// Handle a change of the query text.
    pub fn on_input(&mut self, text: &str) -> InputOutcome {
        self.query = text.to_string();
        // Any reply still on its way belongs to an older query now.
        self.seq += 1;
        self.selected = 0;
        self.view = ResultsView::Empty;

        let trimmed = text.trim();
        if trimmed.chars().count() < self.min_len {
            self.debouncer.cancel();
            self.loading = false;
            return InputOutcome::Skipped;
        }

        self.loading = true;
        debug!(seq = self.seq, query = trimmed, "search scheduled");
        self.debouncer.call((self.seq, trimmed.to_string()));
        InputOutcome::Scheduled(self.seq)
    }

    pub fn insert_char(&mut self, c: char) -> InputOutcome {
        let mut text = self.query.clone();
        text.push(c);
        self.on_input(&text)
    }

    pub fn backspace(&mut self) -> InputOutcome {
        let mut text = self.query.clone();
        text.pop();
        self.on_input(&text)
    }

    pub fn clear(&mut self) -> InputOutcome {
        self.on_input("")
    }

    /// Apply a finished request. Returns `false` for stale replies.
    pub fn apply(
        &mut self,
        seq: u64,
        query: &str,
        outcome: Result<Vec<SearchResult>, ClientError>,
    ) -> bool {
        if seq != self.seq {
            debug!(seq, latest = self.seq, query, "dropping stale search reply");
            return false;
        }

        self.loading = false;
        self.selected = 0;
        self.view = match outcome {
            Ok(results) => {
                debug!(seq, query, count = results.len(), "rendering results");
                ResultsView::Rows(results.into_iter().map(|r| self.make_row(r)).collect())
            }
            Err(err) => {
                warn!(seq, query, kind = err.kind(), error = %err, "search failed");
                ResultsView::Error(SEARCH_ERROR_TEXT.to_string())
            }
        };
        true
    }

    fn make_row(&mut self, result: SearchResult) -> ResultRow {
        let id = self.next_control_id;
        self.next_control_id += 1;
        ResultRow {
            link: result.detail_path(),
            result,
            control: AddControl {
                id,
                state: AddState::Idle,
            },
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn view(&self) -> &ResultsView {
        &self.view
    }

    pub fn rows(&self) -> &[ResultRow] {
        match &self.view {
            ResultsView::Rows(rows) => rows,
            _ => &[],
        }
    }

    /// Row owning the add button `control_id`, if it is still displayed.
    pub fn row_by_control_mut(&mut self, control_id: u64) -> Option<&mut ResultRow> {
        match &mut self.view {
            ResultsView::Rows(rows) => rows.iter_mut().find(|r| r.control.id == control_id),
            _ => None,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&ResultRow> {
        self.rows().get(self.selected)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.rows().len() {
            self.selected = index;
        }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if self.selected + 1 < self.rows().len() {
            self.selected += 1;
        }
    }
}
