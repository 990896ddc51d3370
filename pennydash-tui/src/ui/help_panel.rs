//! Panel 4: Help: keyboard shortcuts.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use pennydash_core::config::SummaryPolicy;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "1-4", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "r", "Refresh summary and stock details");
    key(&mut lines, "e", "Open error history");
    key(&mut lines, "q", "Quit (closes the detail view first)");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 — Stocks");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "n / p", "Next / previous page");
    key(&mut lines, "Enter", "Open detail view for the ticker");
    key(&mut lines, "/", "Search by ticker or symbol");
    key(&mut lines, "s", "Cycle sector filter");
    key(&mut lines, "o", "Cycle country filter");
    key(&mut lines, "m", "Cycle market-cap band");
    key(&mut lines, "c", "Clear filters");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3 — Trends");
    key(&mut lines, "j / k", "Select ticker");
    lines.push(Line::from(""));

    section(&mut lines, "Detail view");
    key(&mut lines, "Esc / Enter / q", "Close");
    lines.push(Line::from(""));

    let settings = app.dashboard.orchestrator().settings();
    let refresh = match settings.summary_policy {
        SummaryPolicy::Periodic => format!("every {}s", settings.refresh_interval.as_secs()),
        SummaryPolicy::OnMount => "on start and on r".to_string(),
    };
    section(&mut lines, "Session");
    key(&mut lines, "Summary refresh", &refresh);
    key(&mut lines, "Details fetch", &format!("{:?}", settings.fetch_mode));
    key(&mut lines, "Page size", &settings.page_size.to_string());

    f.render_widget(Paragraph::new(lines), area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>18}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
