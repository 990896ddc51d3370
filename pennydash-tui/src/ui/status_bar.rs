//! Bottom status bar: panel hints, fetch state, last status message.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use pennydash_core::orchestrator::ResourceStatus;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let orch = app.dashboard.orchestrator();
    let mut spans: Vec<Span> = vec![Span::styled(
        " 1:Overview 2:Stocks 3:Trends 4:Help",
        theme::muted(),
    )];
    spans.push(Span::raw(" | "));

    let summary = orch.summary();
    let details = orch.details();
    if summary.status() == ResourceStatus::Stale || details.status() == ResourceStatus::Stale {
        spans.push(Span::styled("refresh failed, showing last data ", theme::warning()));
    } else if summary.is_in_flight() || details.is_in_flight() {
        spans.push(Span::styled("refreshing... ", theme::neutral()));
    }
    if let Some(at) = summary.updated_at() {
        spans.push(Span::styled(format!("updated {} ", at.format("%H:%M:%S")), theme::muted()));
    }
    if !orch.is_running() {
        spans.push(Span::styled("polling off ", theme::muted()));
    }

    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::raw("| "));
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
