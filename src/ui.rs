//! Terminal user interface with ratatui.

use crate::api::StockApi;
use crate::app::{App, Screen};
use crate::background::{RevealKey, SpriteKind};
use crate::detail::{info_lines, DetailState};
use crate::format::{format_datetime, DateMode};
use crate::models::{SearchResult, Severity};
use crate::notify::Toast;
use crate::search::{AddState, ResultsView};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;

const TOAST_WIDTH: u16 = 42;
const TOAST_HEIGHT: u16 = 3;
const ROW_HEIGHT: u16 = 2;
const BUTTON_WIDTH: u16 = 5;

/// Colors for the UI.
pub struct UiColors {
    pub accent: Color,
    pub text: (u8, u8, u8),
    pub muted: Color,
    pub border: Color,
    pub selected_bg: Color,
    pub gain: Color,
    pub loss: Color,
    pub header_bg: Color,
}

impl Default for UiColors {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            text: (230, 230, 240),
            muted: Color::DarkGray,
            border: Color::Rgb(70, 80, 110),
            selected_bg: Color::Rgb(40, 40, 60),
            gain: Color::Green,
            loss: Color::Red,
            header_bg: Color::Rgb(20, 24, 40),
        }
    }
}

/// Toast background per severity.
fn severity_rgb(severity: Severity) -> (u8, u8, u8) {
    match severity {
        Severity::Info => (13, 202, 240),
        Severity::Success => (25, 135, 84),
        Severity::Warning => (255, 193, 7),
        Severity::Danger => (220, 53, 69),
    }
}

fn scaled(rgb: (u8, u8, u8), factor: f32) -> Color {
    let f = factor.clamp(0.0, 1.0);
    Color::Rgb(
        (rgb.0 as f32 * f) as u8,
        (rgb.1 as f32 * f) as u8,
        (rgb.2 as f32 * f) as u8,
    )
}

/// A result row on screen and its add button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRegion {
    pub index: usize,
    pub area: Rect,
    pub button: Rect,
}

/// Screen areas for one frame. Rendering, mouse hit-testing and reveal
/// tracking all use the same layout.
#[derive(Debug, Clone, Default)]
pub struct Regions {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
    pub modal: Option<Rect>,
    pub input: Option<Rect>,
    pub loading: Option<Rect>,
    pub results: Option<Rect>,
    pub rows: Vec<RowRegion>,
    pub detail: Option<Rect>,
    pub toasts: Vec<(u64, Rect)>,
}

/// Something clickable under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    AddButton(usize),
    Row(usize),
    Toast(u64),
}

/// Compute the layout of `area` for the current state of `app`.
pub fn regions<A: StockApi>(app: &App<A>, area: Rect) -> Regions {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(area);

    let mut regions = Regions {
        header: chunks[0],
        body: chunks[1],
        footer: chunks[2],
        ..Default::default()
    };

    if app.screen != Screen::Dashboard {
        let modal = centered_rect(70, 80, chunks[1]);
        let inner = inset(modal);
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Input
                Constraint::Length(1), // Loading indicator
                Constraint::Min(0),    // Results
            ])
            .split(inner);

        regions.modal = Some(modal);
        regions.input = Some(parts[0]);
        regions.loading = Some(parts[1]);
        regions.results = Some(parts[2]);
        regions.rows = row_regions(app, parts[2]);
    }

    if app.screen == Screen::Detail && app.detail.is_open() {
        regions.detail = Some(centered_rect(55, 70, chunks[1]));
    }

    regions.toasts = toast_regions(app, chunks[1]);
    regions
}

fn row_regions<A: StockApi>(app: &App<A>, results: Rect) -> Vec<RowRegion> {
    let rows = app.search.rows();
    let capacity = (results.height / ROW_HEIGHT).max(1) as usize;
    let first = (app.search.selected() + 1).saturating_sub(capacity);

    rows.iter()
        .enumerate()
        .skip(first)
        .take_while(|(i, _)| ((i - first) as u16) * ROW_HEIGHT < results.height)
        .map(|(i, _)| {
            let y = results.y + (i - first) as u16 * ROW_HEIGHT;
            let height = ROW_HEIGHT.min(results.bottom() - y);
            let area = Rect::new(results.x, y, results.width, height);
            let button = Rect::new(
                results.right().saturating_sub(BUTTON_WIDTH + 1),
                y,
                BUTTON_WIDTH.min(results.width),
                1,
            );
            RowRegion {
                index: i,
                area,
                button,
            }
        })
        .collect()
}

/// Newest toast at the bottom, older ones stacked above it.
fn toast_regions<A: StockApi>(app: &App<A>, body: Rect) -> Vec<(u64, Rect)> {
    let Some(container) = app.notifier.container() else {
        return Vec::new();
    };
    let width = TOAST_WIDTH.min(body.width);
    let x = body.right().saturating_sub(width + 1);
    let mut bottom = body.bottom();
    let mut out = Vec::new();

    for toast in container.toasts().collect::<Vec<_>>().into_iter().rev() {
        if bottom < body.y + TOAST_HEIGHT {
            break;
        }
        bottom -= TOAST_HEIGHT;
        out.push((toast.id, Rect::new(x, bottom, width, TOAST_HEIGHT)));
    }
    out.reverse();
    out
}

/// What the pointer at `(column, row)` is over. Toasts sit on top.
pub fn hit_test(regions: &Regions, column: u16, row: u16) -> Option<Hit> {
    let inside = |r: &Rect| column >= r.x && column < r.right() && row >= r.y && row < r.bottom();

    if let Some((id, _)) = regions.toasts.iter().find(|(_, r)| inside(r)) {
        return Some(Hit::Toast(*id));
    }
    if regions.detail.is_some() {
        return None;
    }
    for region in &regions.rows {
        if inside(&region.button) {
            return Some(Hit::AddButton(region.index));
        }
        if inside(&region.area) {
            return Some(Hit::Row(region.index));
        }
    }
    None
}

/// Visible fraction of every reveal target in this layout.
pub fn reveal_targets<A: StockApi>(app: &App<A>, regions: &Regions) -> Vec<(RevealKey, f32)> {
    let rows = app.search.rows();
    let mut out: Vec<(RevealKey, f32)> = regions
        .rows
        .iter()
        .filter_map(|r| {
            rows.get(r.index).map(|row| {
                (
                    RevealKey::Row(row.control.id),
                    r.area.height as f32 / ROW_HEIGHT as f32,
                )
            })
        })
        .collect();
    if regions.detail.is_some() {
        out.push((RevealKey::Panel("detail"), 1.0));
    }
    out
}

/// Render the main UI.
pub fn render<A: StockApi>(frame: &mut Frame, app: &App<A>) {
    let colors = UiColors::default();
    let now = Instant::now();
    let regions = regions(app, frame.area());

    render_background(frame, app, regions.body);
    render_header(frame, app, regions.header, &colors);

    if app.screen == Screen::Dashboard {
        render_welcome(frame, regions.body, &colors);
    } else {
        render_search(frame, app, &regions, &colors, now);
    }

    if let Some(area) = regions.detail {
        render_detail(frame, app, area, &colors, now);
    }

    render_toasts(frame, app, &regions, now);
    render_footer(frame, app, regions.footer, &colors);

    if app.show_help {
        render_help_overlay(frame, &colors);
    }
}

fn render_background<A: StockApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    if app.background.is_empty() {
        return;
    }
    let sprites = app.background.sprites(area, app.started.elapsed());
    let buf = frame.buffer_mut();
    for sprite in sprites {
        let color = match sprite.kind {
            SpriteKind::Particle => scaled((200, 210, 255), sprite.intensity),
            SpriteKind::ChartLine => scaled((60, 200, 140), sprite.intensity),
            SpriteKind::Glow => scaled((90, 110, 255), sprite.intensity),
        };
        if let Some(cell) = buf.cell_mut((sprite.x, sprite.y)) {
            cell.set_char(sprite.symbol).set_fg(color);
        }
    }
}

fn render_header<A: StockApi>(frame: &mut Frame, app: &App<A>, area: Rect, colors: &UiColors) {
    let loading = if app.search.is_loading() {
        Span::styled("  searching…", Style::default().fg(Color::Yellow))
    } else if app.watchlist.pending() > 0 {
        Span::styled("  adding…", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("")
    };
    let notifications = match app.notifier.container() {
        Some(container) if !container.is_empty() => Span::styled(
            format!("  [{} new]", container.len()),
            Style::default().fg(colors.accent),
        ),
        _ => Span::raw(""),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "STOCKSENSE AI ",
                Style::default()
                    .fg(colors.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("- {}", app.today())),
            loading,
            notifications,
        ]),
        Line::from(Span::styled(
            "Smart stock insights, one keystroke away",
            Style::default().fg(colors.muted),
        )),
    ];

    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(colors.border)),
    );
    frame.render_widget(header, area);
}

fn render_welcome(frame: &mut Frame, area: Rect, colors: &UiColors) {
    let area = centered_rect(50, 30, area);
    let text = vec![
        Line::from(Span::styled(
            "Welcome to StockSense",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(" to search stocks and build your watchlist"),
        ]),
    ];
    let welcome = Paragraph::new(text)
        .style(Style::default().fg(scaled(colors.text, 1.0)))
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(welcome, area);
}

fn render_search<A: StockApi>(
    frame: &mut Frame,
    app: &App<A>,
    regions: &Regions,
    colors: &UiColors,
    now: Instant,
) {
    let (Some(modal), Some(input), Some(loading), Some(results)) =
        (regions.modal, regions.input, regions.loading, regions.results)
    else {
        return;
    };

    frame.render_widget(Clear, modal);
    frame.render_widget(
        Block::default()
            .title(" Search stocks ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border)),
        modal,
    );

    let query = Paragraph::new(Line::from(vec![
        Span::raw(app.search.query()),
        Span::styled("▏", Style::default().fg(colors.accent)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Symbol or company ")
            .border_style(Style::default().fg(colors.accent)),
    );
    frame.render_widget(query, input);

    if app.search.is_loading() {
        frame.render_widget(
            Paragraph::new(Span::styled(" Loading…", Style::default().fg(Color::Yellow))),
            loading,
        );
    }

    match app.search.view() {
        ResultsView::Empty => {}
        ResultsView::Error(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(colors.muted))
                .alignment(ratatui::layout::Alignment::Center);
            frame.render_widget(
                error,
                Rect::new(results.x, results.y + 1, results.width, 1).intersection(results),
            );
        }
        ResultsView::Rows(rows) => {
            if rows.is_empty() {
                let empty = Paragraph::new("No matches")
                    .style(Style::default().fg(colors.muted))
                    .alignment(ratatui::layout::Alignment::Center);
                frame.render_widget(
                    empty,
                    Rect::new(results.x, results.y, results.width, 1).intersection(results),
                );
            }
            for region in &regions.rows {
                let row = &rows[region.index];
                let reveal = app.reveals.progress(RevealKey::Row(row.control.id), now);
                let selected = region.index == app.search.selected();

                let row_style = if selected {
                    Style::default().bg(colors.selected_bg)
                } else {
                    Style::default()
                };
                let lines = vec![
                    Line::from(Span::styled(
                        row.result.symbol.clone(),
                        Style::default()
                            .fg(scaled(colors.text, 0.3 + 0.7 * reveal))
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        truncate_string(
                            &row.result.name,
                            region.area.width.saturating_sub(8) as usize,
                        ),
                        Style::default().fg(colors.muted),
                    )),
                ];
                frame.render_widget(Paragraph::new(lines).style(row_style), region.area);

                let (label, style) = match row.control.state {
                    AddState::Idle => ("[ + ]", Style::default().fg(colors.accent)),
                    AddState::Done => (
                        "[ ✓ ]",
                        Style::default().fg(Color::Black).bg(colors.gain),
                    ),
                };
                frame.render_widget(Paragraph::new(label).style(style), region.button);
            }
        }
    }
}

fn render_detail<A: StockApi>(
    frame: &mut Frame,
    app: &App<A>,
    area: Rect,
    colors: &UiColors,
    now: Instant,
) {
    let reveal = app.reveals.progress(RevealKey::Panel("detail"), now);
    let border = scaled((70, 80, 110), 0.4 + 0.6 * reveal);

    let (title, body): (String, Vec<Line>) = match app.detail.state() {
        DetailState::Closed => return,
        DetailState::Loading { symbol } => (
            format!(" {} ", symbol),
            vec![Line::from(Span::styled("Loading…", Style::default().fg(Color::Yellow)))],
        ),
        DetailState::Failed { symbol, message } => (
            format!(" {} ", symbol),
            vec![Line::from(Span::styled(message.clone(), Style::default().fg(colors.loss)))],
        ),
        DetailState::Loaded(info) => {
            let change_color = match info.day_change.or(info.day_change_percent) {
                Some(v) if v > 0.0 => colors.gain,
                Some(v) if v < 0.0 => colors.loss,
                _ => scaled(colors.text, 1.0),
            };
            let lines = info_lines(info, &app.currency_symbol, app.date_format)
                .into_iter()
                .map(|(label, value)| {
                    let style = if label == "Change" {
                        Style::default().fg(change_color)
                    } else {
                        Style::default().fg(scaled(colors.text, 1.0))
                    };
                    Line::from(vec![
                        Span::styled(format!("{:<12}", label), Style::default().fg(colors.muted)),
                        Span::styled(value, style),
                    ])
                })
                .collect();
            (format!(" {} · {} ", info.symbol, info.name), lines)
        }
    };

    let panel = Paragraph::new(body)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(panel, area);
}

fn render_toasts<A: StockApi>(frame: &mut Frame, app: &App<A>, regions: &Regions, now: Instant) {
    let Some(container) = app.notifier.container() else {
        return;
    };
    let toasts: Vec<&Toast> = container.toasts().collect();

    for (id, area) in &regions.toasts {
        let Some(toast) = toasts.iter().find(|t| t.id == *id) else {
            continue;
        };
        let opacity = toast.opacity(now);
        let bg = scaled(severity_rgb(toast.message.severity), opacity);
        let fg = scaled((255, 255, 255), opacity);

        let line = Line::from(Span::raw(format!(" {} ", toast.message.text)));
        let widget = Paragraph::new(line)
            .style(Style::default().fg(fg).bg(bg))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title_bottom(Line::from(" × ").right_aligned())
                    .border_style(Style::default().fg(fg).bg(bg)),
            );
        frame.render_widget(Clear, *area);
        frame.render_widget(widget, *area);
    }
}

fn render_footer<A: StockApi>(frame: &mut Frame, app: &App<A>, area: Rect, colors: &UiColors) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let mut spans = match app.screen {
        Screen::Dashboard => vec![
            key(" /"),
            Span::raw(":search "),
            key("x"),
            Span::raw(":dismiss "),
            key("h"),
            Span::raw(":help "),
            key("q"),
            Span::raw(":quit "),
        ],
        Screen::Search => vec![
            key(" ↑↓"),
            Span::raw(":select "),
            key("Enter"),
            Span::raw(":details "),
            key("Ctrl+A"),
            Span::raw(":add to watchlist "),
            key("Esc"),
            Span::raw(":close "),
        ],
        Screen::Detail => vec![
            key(" Ctrl+A"),
            Span::raw(":add to watchlist "),
            key("Esc"),
            Span::raw(":back "),
        ],
    };
    let link = match app.screen {
        Screen::Search => app.search.selected_row().map(|row| row.link.clone()),
        _ => app.status.clone(),
    };
    if let Some(link) = link {
        spans.push(Span::styled(format!("| {}", link), Style::default().fg(colors.muted)));
    }

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.header_bg));
    frame.render_widget(footer, area);
}

fn render_help_overlay(frame: &mut Frame, colors: &UiColors) {
    let area = centered_rect(60, 70, frame.area());

    let help_text = vec![
        Line::from(Span::styled(
            "STOCKSENSE HELP",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Dashboard:"),
        Line::from("  /         Open stock search"),
        Line::from("  x         Dismiss newest notification"),
        Line::from("  h/?       Toggle help"),
        Line::from("  q/Esc     Quit"),
        Line::from(""),
        Line::from("Search:"),
        Line::from("  type      Search by symbol or name"),
        Line::from("  ↑/↓       Move selection"),
        Line::from("  Enter     Open stock details"),
        Line::from("  Ctrl+A    Add selected stock to watchlist"),
        Line::from("  Ctrl+U    Clear query"),
        Line::from("  Esc       Close search"),
        Line::from(""),
        Line::from("Mouse: click [ + ] to add, a row to open it,"),
        Line::from("       a notification to dismiss it"),
        Line::from(""),
        Line::from("Press any key to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

/// Shrink by the width of a full border.
fn inset(r: Rect) -> Rect {
    Rect::new(
        r.x.saturating_add(1),
        r.y.saturating_add(1),
        r.width.saturating_sub(2),
        r.height.saturating_sub(2),
    )
}

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Truncate string to max length.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Render batch mode output (non-interactive).
pub fn render_batch(query: &str, results: &[SearchResult], base_url: &str) {
    println!(
        "\n=== STOCKSENSE {} ===",
        format_datetime(&Local::now().naive_local(), DateMode::DateTime)
    );
    println!("Search: {:?} ({} results)", query, results.len());
    println!("{:<12} {:<40} {}", "SYMBOL", "NAME", "LINK");
    println!("{}", "-".repeat(90));

    for result in results {
        println!(
            "{:<12} {:<40} {}{}",
            result.symbol,
            truncate_string(&result.name, 40),
            base_url.trim_end_matches('/'),
            result.detail_path()
        );
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::config::Settings;
    use crate::search::InputOutcome;
    use std::sync::Arc;
    use std::time::Duration;

    fn app_with_rows(count: usize) -> App<FakeApi> {
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
        let mut app = App::new(Arc::new(FakeApi::default()), &settings);
        app.open_search();
        let InputOutcome::Scheduled(seq) = app.search.on_input("co") else {
            panic!("expected a request");
        };
        let results = (0..count)
            .map(|i| SearchResult {
                symbol: format!("S{i}"),
                name: format!("Company {i}"),
            })
            .collect();
        app.search.apply(seq, "co", Ok(results));
        app
    }

    #[tokio::test]
    async fn test_rows_fit_results_area() {
        let app = app_with_rows(50);
        let area = Rect::new(0, 0, 100, 40);
        let regions = regions(&app, area);
        let results = regions.results.unwrap();

        assert!(!regions.rows.is_empty());
        assert!(regions.rows.len() < 50);
        for (n, row) in regions.rows.iter().enumerate() {
            assert_eq!(row.index, n);
            assert!(row.area.bottom() <= results.bottom());
            assert!(row.button.right() <= results.right());
        }
    }

    #[tokio::test]
    async fn test_rows_follow_selection() {
        let mut app = app_with_rows(50);
        for _ in 0..30 {
            app.search.select_down();
        }
        let regions = regions(&app, Rect::new(0, 0, 100, 40));
        assert!(regions.rows[0].index > 0);
        let selected = regions.rows.iter().find(|r| r.index == 30).unwrap();
        assert_eq!(selected.area.height, ROW_HEIGHT);
    }

    #[tokio::test]
    async fn test_hit_test_button_before_row() {
        let app = app_with_rows(3);
        let regions = regions(&app, Rect::new(0, 0, 100, 40));
        let row = regions.rows[1];

        assert_eq!(hit_test(&regions, row.button.x, row.button.y), Some(Hit::AddButton(1)));
        assert_eq!(hit_test(&regions, row.area.x, row.area.y + 1), Some(Hit::Row(1)));
        assert_eq!(hit_test(&regions, 0, 0), None);
    }

    #[tokio::test]
    async fn test_toasts_stack_bottom_right() {
        let mut app = app_with_rows(0);
        app.notifier.notify("one", Severity::Info);
        app.notifier.notify("two", Severity::Success);

        let area = Rect::new(0, 0, 100, 40);
        let regions = regions(&app, area);
        assert_eq!(regions.toasts.len(), 2);
        let (first_id, first) = regions.toasts[0];
        let (_, second) = regions.toasts[1];
        assert!(first.bottom() <= second.y);
        assert_eq!(second.bottom(), regions.body.bottom());
        assert_eq!(second.right(), area.right() - 1);
        assert_eq!(hit_test(&regions, first.x + 1, first.y + 1), Some(Hit::Toast(first_id)));
    }

    #[tokio::test]
    async fn test_reveal_targets_cover_visible_rows() {
        let app = app_with_rows(4);
        let regions = regions(&app, Rect::new(0, 0, 100, 40));
        let targets = reveal_targets(&app, &regions);
        assert_eq!(targets.len(), 4);
        assert!(targets.iter().all(|(_, fraction)| *fraction == 1.0));
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Apple", 10), "Apple");
        assert_eq!(truncate_string("Alphabet Inc. (Google)", 10), "Alphabe...");
        assert_eq!(truncate_string("Nestlé S.A.", 3), "...");
    }
}
