//! StockSense - a terminal client for StockSense AI stock search and watchlist.

mod api;
mod app;
mod background;
mod cli;
mod config;
mod debounce;
mod detail;
mod error;
mod format;
mod logging;
mod models;
mod notify;
mod search;
mod ui;
mod watchlist;

use anyhow::Result;
use api::{StockApi, StockSenseClient};
use app::{App, Screen};
use cli::Args;
use config::{Config, Settings};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    if args.sample_config {
        print!("{}", config::sample_config());
        return Ok(());
    }

    // Load configuration
    let config = if let Some(ref path) = args.config {
        Config::load(path)?
    } else {
        Config::load_or_default()
    };
    let settings = Settings::resolve(&args, &config);

    let log_dir = args.log_dir.clone().unwrap_or_else(logging::default_log_dir);
    let _log_guard = match logging::init(&log_dir, args.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        }
    };
    info!(server = %settings.base_url, "starting stocksense");

    let client = StockSenseClient::new(
        &settings.base_url,
        settings.timeout,
        settings.session_cookie.as_deref(),
    )?;

    // Run in batch mode or interactive mode
    if args.batch {
        let query = args.query.clone().unwrap_or_default();
        run_batch(&client, &settings, &query).await
    } else {
        run_interactive(client, &settings).await
    }
}

/// Run one search and print the results.
async fn run_batch(client: &StockSenseClient, settings: &Settings, query: &str) -> Result<()> {
    let trimmed = query.trim();
    if trimmed.chars().count() < settings.min_query_len {
        println!(
            "Query {:?} is shorter than {} characters; nothing to search.",
            trimmed, settings.min_query_len
        );
        return Ok(());
    }

    match client.search(trimmed).await {
        Ok(results) => {
            ui::render_batch(trimmed, &results, &settings.base_url);
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "batch search failed");
            eprintln!("{}: {}", search::SEARCH_ERROR_TEXT, e);
            std::process::exit(1);
        }
    }
}

/// Run in interactive mode with TUI.
async fn run_interactive(client: StockSenseClient, settings: &Settings) -> Result<()> {
    let mut app = App::new(Arc::new(client), settings);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    if let Some(counts) = settings.background {
        let size = terminal.size()?;
        app.init_background(
            Some(Rect::new(0, 0, size.width, size.height)),
            counts,
            &mut rand::thread_rng(),
        );
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("stocksense exiting");
    result
}

/// Main application loop.
fn run_app<A: StockApi>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<A>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(50);

    loop {
        // Draw UI
        let mut area = Rect::default();
        terminal.draw(|f| {
            area = f.area();
            ui::render(f, app);
        })?;

        let regions = ui::regions(app, area);
        app.update_reveals(&ui::reveal_targets(app, &regions), Instant::now());

        // Handle events with timeout
        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
                Event::Mouse(mouse) => handle_mouse_event(app, &regions, area, mouse),
                _ => {}
            }
        }

        // Check if we should quit
        if app.should_quit() {
            break;
        }

        app.tick(Instant::now());
    }

    Ok(())
}

/// Handle keyboard input.
fn handle_key_event<A: StockApi>(app: &mut App<A>, key: KeyEvent) {
    // Close help overlay on any key
    if app.show_help {
        app.show_help = false;
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    match app.screen {
        Screen::Dashboard => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
            KeyCode::Char('/') | KeyCode::Char('s') => app.open_search(),
            KeyCode::Char('x') => {
                app.dismiss_toast(None);
            }
            KeyCode::Char('h') | KeyCode::Char('?') => app.toggle_help(),
            _ => {}
        },
        Screen::Search => match key.code {
            KeyCode::Esc => app.close_search(),
            KeyCode::Char('a') if ctrl => {
                let selected = app.search.selected();
                app.add_to_watchlist(selected);
            }
            KeyCode::Char('u') if ctrl => {
                app.search.clear();
            }
            KeyCode::Char(c) if !ctrl => {
                app.search.insert_char(c);
            }
            KeyCode::Backspace => {
                app.search.backspace();
            }
            KeyCode::Up => app.search.select_up(),
            KeyCode::Down => app.search.select_down(),
            KeyCode::Enter => {
                let selected = app.search.selected();
                app.navigate(selected);
            }
            _ => {}
        },
        Screen::Detail => match key.code {
            KeyCode::Esc | KeyCode::Backspace => app.close_detail(),
            KeyCode::Char('a') if ctrl => {
                let selected = app.search.selected();
                app.add_to_watchlist(selected);
            }
            KeyCode::Char('x') => {
                app.dismiss_toast(None);
            }
            _ => {}
        },
    }
}

/// Handle mouse input against the layout of the last frame.
fn handle_mouse_event<A: StockApi>(
    app: &mut App<A>,
    regions: &ui::Regions,
    area: Rect,
    mouse: MouseEvent,
) {
    match mouse.kind {
        MouseEventKind::Moved => {
            app.pointer_moved(mouse.column, mouse.row, area.width, area.height)
        }
        MouseEventKind::Down(MouseButton::Left) => {
            match ui::hit_test(regions, mouse.column, mouse.row) {
                Some(ui::Hit::Toast(id)) => {
                    app.dismiss_toast(Some(id));
                }
                // The button sits inside the row; it must not also navigate.
                Some(ui::Hit::AddButton(index)) => {
                    app.search.select(index);
                    app.add_to_watchlist(index);
                }
                Some(ui::Hit::Row(index)) => app.navigate(index),
                None => {}
            }
        }
        MouseEventKind::ScrollUp if app.screen == Screen::Search => app.search.select_up(),
        MouseEventKind::ScrollDown if app.screen == Screen::Search => app.search.select_down(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::format::DateMode;

    fn test_app() -> App<FakeApi> {
        let settings = Settings {
            base_url: "http://localhost:5000".into(),
            timeout: 5,
            session_cookie: None,
            debounce: Duration::from_millis(300),
            min_query_len: 2,
            toast_delay: Duration::from_millis(3000),
            max_toasts: 5,
            background: None,
            currency_symbol: "$".into(),
            date_format: DateMode::Medium,
        };
        App::new(Arc::new(FakeApi::default()), &settings)
    }

    fn press(app: &mut App<FakeApi>, code: KeyCode, modifiers: KeyModifiers) {
        handle_key_event(app, KeyEvent::new(code, modifiers));
    }

    #[tokio::test]
    async fn test_search_keys_edit_query() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'), KeyModifiers::NONE);
        assert_eq!(app.screen, Screen::Search);

        for c in "tsla".chars() {
            press(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        press(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.search.query(), "tsl");
        assert!(app.search.is_loading());

        press(&mut app, KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(app.search.query(), "");
        assert!(!app.search.is_loading());

        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(!app.should_quit());
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(app.should_quit());

        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit());
    }
}
