//! Panel 3: Trends: price history for one ticker from the summary.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};

use pennydash_core::domain::TrendPoint;
use pennydash_core::format;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let tickers = app.trend_tickers();
    let Some(ticker) = app.selected_trend() else {
        render_empty(f, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(14), Constraint::Min(20)])
        .split(area);

    let list: Vec<Line> = tickers
        .iter()
        .map(|t| {
            if *t == ticker {
                Line::from(Span::styled(format!("> {t}"), theme::accent_bold()))
            } else {
                Line::from(Span::styled(format!("  {t}"), theme::muted()))
            }
        })
        .collect();
    f.render_widget(Paragraph::new(list), chunks[0]);

    let series = app
        .summary()
        .and_then(|s| s.trend(&ticker))
        .unwrap_or(&[]);
    render_chart(f, chunks[1], &ticker, series);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("No trend data yet.", theme::muted())),
        Line::from(""),
        Line::from(Span::styled(
            "Trends arrive with the summary; press r to refresh.",
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_chart(f: &mut Frame, area: Rect, ticker: &str, series: &[TrendPoint]) {
    // Points without a price are skipped, not drawn as zero.
    let data: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.current_price.filter(|v| v.is_finite()).map(|v| (i as f64, v)))
        .collect();

    if data.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(format!("{ticker}: no priced points"), theme::muted())),
            area,
        );
        return;
    }

    let min_y = data.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = data.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let padding = ((max_y - min_y).abs() * 0.05).max(0.0001);
    let y_min = (min_y - padding).max(0.0);
    let y_max = max_y + padding;
    let x_max = series.len().saturating_sub(1) as f64;

    let first = series.first().map(|p| short_date(p)).unwrap_or_default();
    let last = series.last().map(|p| short_date(p)).unwrap_or_default();

    let dataset = Dataset::default()
        .name(ticker.to_string())
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(theme::ACCENT))
        .graph_type(GraphType::Line)
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .title(Span::styled("Updated", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![
                    Span::styled(first, theme::muted()),
                    Span::styled(last, theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Price", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format::price(Some(y_min)), theme::muted()),
                    Span::styled(format::price(Some(y_max)), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

fn short_date(point: &TrendPoint) -> String {
    match point.timestamp() {
        Some(ts) => ts.format("%m-%d %H:%M").to_string(),
        None => format::truncate(&point.last_updated, 11),
    }
}
