//! Panel 2: Stocks: filtered, paginated details table.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, Wrap};

use pennydash_core::format;
use pennydash_core::orchestrator::ResourceStatus;

use crate::app::{AppState, MARKET_CAP_BANDS};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    render_header(f, chunks[0], app);

    let details = app.dashboard.orchestrator().details();
    match (details.status(), details.data()) {
        (ResourceStatus::Failed, _) => {
            let msg = details.last_error().map(|e| e.to_string()).unwrap_or_default();
            f.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled("Could not load stock details.", theme::negative())),
                    Line::from(Span::styled(msg, theme::muted())),
                ]),
                chunks[1],
            );
        }
        (_, Some(_)) => render_table(f, chunks[1], app),
        _ => f.render_widget(
            Paragraph::new(Span::styled("Loading stocks...", theme::muted())),
            chunks[1],
        ),
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            format!("Page {} of {}", app.page(), app.page_count()),
            theme::accent(),
        )),
        chunks[2],
    );
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let filter = &app.filter;
    let mut spans = vec![Span::styled(
        format!("{} matching", app.filtered_rows().len()),
        theme::accent(),
    )];
    if !filter.search.trim().is_empty() {
        spans.push(Span::styled(format!("  search: {}", filter.search), theme::neutral()));
    }
    if let Some(sector) = &filter.sector {
        spans.push(Span::styled(format!("  sector: {sector}"), theme::neutral()));
    }
    if let Some(country) = &filter.country {
        spans.push(Span::styled(format!("  country: {country}"), theme::neutral()));
    }
    let band = app.market_cap_band();
    if band != 0 {
        spans.push(Span::styled(
            format!("  cap: {}", MARKET_CAP_BANDS[band].0),
            theme::neutral(),
        ));
    }
    spans.push(Span::styled(
        "  [j/k]move [n/p]page [Enter]detail [/]search [s]ector c[o]untry [m]cap [c]lear",
        theme::muted(),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true }), area);
}

fn render_table(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = app.visible_rows();
    if rows.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No stocks on this page.", theme::muted())),
            area,
        );
        return;
    }

    let header = Row::new(["Ticker", "Name", "Sector", "Price", "Change", "Mkt Cap", "Volume", "Verdict"])
        .style(theme::accent_bold());

    let body: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let change = r.change_pct();
            let row = Row::new(vec![
                Cell::from(r.reddit_ticker.clone()),
                Cell::from(format::truncate(&format::text(r.display_name()), 24)),
                Cell::from(format::truncate(&format::text(r.sector.as_deref()), 18)),
                Cell::from(format::price(r.current_price)),
                Cell::from(Span::styled(format::percent(change), theme::change_style(change))),
                Cell::from(format::money(r.market_cap)),
                Cell::from(format::compact(r.volume)),
                Cell::from(format::truncate(&format::text(r.verdict.as_deref()), 12)),
            ]);
            if i == app.table_cursor {
                row.style(theme::accent().add_modifier(Modifier::REVERSED))
            } else {
                row.style(theme::muted())
            }
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Min(16),
        Constraint::Length(18),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(12),
    ];
    f.render_widget(Table::new(body, widths).header(header), area);
}
