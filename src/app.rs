//! Application state and event dispatch.

use crate::api::StockApi;
use crate::background::{Background, RevealKey, RevealTracker};
use crate::config::Settings;
use crate::detail::DetailController;
use crate::error::ClientError;
use crate::format::{format_datetime, DateMode};
use crate::models::{SearchResult, StockInfo};
use crate::notify::Notifier;
use crate::search::SearchController;
use crate::watchlist::WatchlistClient;
use chrono::Local;
use rand::Rng;
use ratatui::layout::Rect;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info};

/// Completions posted back to the UI task by request tasks.
#[derive(Debug)]
pub enum AppEvent {
    SearchCompleted {
        seq: u64,
        query: String,
        outcome: Result<Vec<SearchResult>, ClientError>,
    },
    WatchlistAdded {
        control_id: u64,
        symbol: String,
        outcome: Result<(), ClientError>,
    },
    InfoLoaded {
        seq: u64,
        symbol: String,
        outcome: Result<StockInfo, ClientError>,
    },
}

/// Which layer receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Search,
    Detail,
}

/// Application state. Everything here is touched only by the UI task.
pub struct App<A: StockApi> {
    pub search: SearchController,
    pub watchlist: WatchlistClient<A>,
    pub detail: DetailController<A>,
    pub notifier: Notifier,
    pub background: Background,
    pub reveals: RevealTracker,
    pub screen: Screen,
    /// Link of the last row navigated to
    pub status: Option<String>,
    pub show_help: bool,
    pub running: bool,
    pub started: Instant,
    pub currency_symbol: String,
    pub date_format: DateMode,
    base_url: String,
    events: UnboundedReceiver<AppEvent>,
}

impl<A: StockApi> App<A> {
    /// Create the application around `api`.
    pub fn new(api: Arc<A>, settings: &Settings) -> Self {
        let (tx, events) = mpsc::unbounded_channel();

        Self {
            search: SearchController::new(
                Arc::clone(&api),
                tx.clone(),
                settings.debounce,
                settings.min_query_len,
            ),
            watchlist: WatchlistClient::new(Arc::clone(&api), tx.clone()),
            detail: DetailController::new(api, tx),
            notifier: Notifier::new(settings.toast_delay, settings.max_toasts),
            background: Background::default(),
            reveals: RevealTracker::default(),
            screen: Screen::Dashboard,
            status: None,
            show_help: false,
            running: true,
            started: Instant::now(),
            currency_symbol: settings.currency_symbol.clone(),
            date_format: settings.date_format,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            events,
        }
    }

    /// Generate the background for `container`; `None` leaves it empty.
    pub fn init_background<R: Rng>(
        &mut self,
        container: Option<Rect>,
        counts: crate::background::ElementCounts,
        rng: &mut R,
    ) {
        self.background = Background::init_with(container, counts, rng);
        debug!(elements = self.background.element_count(), "background ready");
    }

    /// Drain completed requests and advance timers.
    pub fn tick(&mut self, now: Instant) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
        }
        self.notifier.tick(now);
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchCompleted { seq, query, outcome } => {
                if self.search.apply(seq, &query, outcome) {
                    let ids: Vec<u64> = self.search.rows().iter().map(|r| r.control.id).collect();
                    self.reveals.retain_rows(&ids);
                    for id in ids {
                        self.reveals.observe(RevealKey::Row(id));
                    }
                }
            }
            AppEvent::WatchlistAdded {
                control_id,
                symbol,
                outcome,
            } => {
                self.watchlist.apply(
                    &mut self.search,
                    &mut self.notifier,
                    control_id,
                    &symbol,
                    outcome,
                );
            }
            AppEvent::InfoLoaded {
                seq,
                symbol,
                outcome,
            } => {
                self.detail.apply(seq, symbol, outcome);
            }
        }
    }

    /// Feed visibility of reveal targets measured on the last frame.
    pub fn update_reveals(&mut self, visible: &[(RevealKey, f32)], now: Instant) {
        for (key, fraction) in visible {
            self.reveals.on_intersection(*key, *fraction, now);
        }
    }

    pub fn open_search(&mut self) {
        self.screen = Screen::Search;
    }

    pub fn close_search(&mut self) {
        self.screen = Screen::Dashboard;
    }

    /// Activate the add button of result `index`.
    pub fn add_to_watchlist(&mut self, index: usize) -> bool {
        match self.search.rows().get(index) {
            Some(row) => {
                let row = row.clone();
                self.watchlist.add(&row)
            }
            None => false,
        }
    }

    /// Follow the link of result `index` into the detail panel.
    pub fn navigate(&mut self, index: usize) {
        let Some(row) = self.search.rows().get(index) else {
            return;
        };
        let link = format!("{}{}", self.base_url, row.link);
        let symbol = row.result.symbol.clone();
        info!(%link, "opening detail");
        self.search.select(index);
        self.status = Some(link);
        self.detail.open(&symbol);
        self.reveals.observe(RevealKey::Panel("detail"));
        self.screen = Screen::Detail;
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
        self.status = None;
        self.screen = Screen::Search;
    }

    /// Pointer moved to cell `(column, row)` of a `width` x `height` terminal.
    pub fn pointer_moved(&mut self, column: u16, row: u16, width: u16, height: u16) {
        if width == 0 || height == 0 {
            return;
        }
        self.background
            .on_pointer_move(column as f32 / width as f32, row as f32 / height as f32);
    }

    /// Close toast `id`, or the newest one.
    pub fn dismiss_toast(&mut self, id: Option<u64>) -> bool {
        let now = Instant::now();
        match id {
            Some(id) => self.notifier.dismiss(id, now),
            None => self.notifier.dismiss_newest(now),
        }
    }

    /// Today's date in the configured style, for the header.
    pub fn today(&self) -> String {
        format_datetime(&Local::now().naive_local(), self.date_format)
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::background::ElementCounts;
    use crate::search::{AddState, InputOutcome};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn settings() -> Settings {
        Settings {
            base_url: "http://localhost:5000/".into(),
            timeout: 5,
            session_cookie: None,
            debounce: Duration::from_millis(300),
            min_query_len: 2,
            toast_delay: Duration::from_millis(3000),
            max_toasts: 5,
            background: Some(ElementCounts::default()),
            currency_symbol: "$".into(),
            date_format: DateMode::Medium,
        }
    }

    async fn settle(app: &mut App<FakeApi>) {
        tokio::time::sleep(Duration::from_millis(400)).await;
        app.tick(Instant::now());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_add_and_detail_flow() {
        let info = StockInfo {
            symbol: "AMD".into(),
            name: "Advanced Micro Devices".into(),
            price: Some(162.3),
            ..Default::default()
        };
        let api = FakeApi::default()
            .with_results("amd", &[("AMD", "Advanced Micro Devices")])
            .with_info(info.clone());
        let mut app = App::new(Arc::new(api), &settings());

        app.open_search();
        for c in "amd".chars() {
            app.search.insert_char(c);
        }
        settle(&mut app).await;
        assert_eq!(app.search.rows().len(), 1);
        let control = app.search.rows()[0].control.id;
        assert!(app.reveals.is_observed(RevealKey::Row(control)));

        assert!(app.add_to_watchlist(0));
        settle(&mut app).await;
        assert_eq!(app.search.rows()[0].control.state, AddState::Done);
        assert!(!app.add_to_watchlist(0));

        app.navigate(0);
        assert_eq!(app.screen, Screen::Detail);
        assert_eq!(app.status.as_deref(), Some("http://localhost:5000/stock/AMD"));
        settle(&mut app).await;
        assert_eq!(
            app.detail.state(),
            &crate::detail::DetailState::Loaded(Box::new(info))
        );

        app.close_detail();
        assert_eq!(app.screen, Screen::Search);
        assert!(!app.detail.is_open());
    }

    #[tokio::test]
    async fn test_background_disabled_is_empty() {
        let mut app = App::new(Arc::new(FakeApi::default()), &settings());
        app.init_background(None, ElementCounts::default(), &mut StdRng::seed_from_u64(1));
        assert!(app.background.is_empty());
        app.pointer_moved(10, 10, 80, 24);
    }

    #[tokio::test]
    async fn test_pointer_moves_particles() {
        let mut app = App::new(Arc::new(FakeApi::default()), &settings());
        app.init_background(
            Some(Rect::new(0, 0, 80, 24)),
            ElementCounts::default(),
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(app.background.element_count(), 111);

        app.pointer_moved(80, 0, 80, 24);
        assert!(app.background.chart_lines().iter().all(|l| l.translate_x == 10.0));
    }

    #[tokio::test]
    async fn test_reveals_forget_replaced_rows() {
        let mut app = App::new(Arc::new(FakeApi::default()), &settings());
        app.open_search();

        for n in 0..200 {
            let InputOutcome::Scheduled(seq) = app.search.on_input(&format!("q{n}")) else {
                panic!("expected a request");
            };
            let results = (0..10)
                .map(|i| SearchResult {
                    symbol: format!("S{n}-{i}"),
                    name: format!("Company {i}"),
                })
                .collect();
            app.handle_event(AppEvent::SearchCompleted {
                seq,
                query: format!("q{n}"),
                outcome: Ok(results),
            });
            let visible: Vec<_> = app
                .search
                .rows()
                .iter()
                .map(|r| (RevealKey::Row(r.control.id), 1.0))
                .collect();
            app.update_reveals(&visible, Instant::now());
        }

        assert_eq!(app.reveals.len(), 10);
        let current = app.search.rows()[0].control.id;
        assert!(app.reveals.is_animated(RevealKey::Row(current)));
    }

    #[tokio::test]
    async fn test_reveal_updates_only_observed_rows() {
        let mut app = App::new(Arc::new(FakeApi::default()), &settings());
        let now = Instant::now();
        app.reveals.observe(RevealKey::Row(1));

        app.update_reveals(&[(RevealKey::Row(1), 1.0), (RevealKey::Row(2), 1.0)], now);
        assert!(app.reveals.is_animated(RevealKey::Row(1)));
        assert!(!app.reveals.is_animated(RevealKey::Row(2)));
    }
}
