//! Panel 1: Overview: headline cards, top gainers, sector breakdown.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use pennydash_core::domain::StockSummary;
use pennydash_core::filter::MarketStats;
use pennydash_core::format;
use pennydash_core::orchestrator::ResourceStatus;

use crate::app::AppState;
use crate::theme::{self, Theme};
use crate::ui::widgets::MetricCard;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let summary = app.dashboard.orchestrator().summary();
    match (summary.status(), summary.data()) {
        (ResourceStatus::Failed, _) => {
            let message = summary
                .last_error()
                .map(|e| e.to_string())
                .unwrap_or_default();
            render_error(f, area, &message);
        }
        (_, Some(data)) => render_summary(f, area, app, data),
        _ => render_loading(f, area),
    }
}

fn render_loading(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Loading summary...", theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Could not load the dashboard.", theme::negative())),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme::muted())),
        Line::from(""),
        Line::from(Span::styled(
            "Check that the backend is running, then press r to retry.",
            theme::neutral(),
        )),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_summary(f: &mut Frame, area: Rect, app: &AppState, summary: &StockSummary) {
    let theme = Theme::default();
    let stats = MarketStats::from_rows(app.dashboard.orchestrator().rows());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(rows[0]);

    f.render_widget(
        MetricCard::new("Total Stocks", summary.total_stocks.to_string(), &theme),
        cards[0],
    );
    f.render_widget(
        MetricCard::new("New Today", summary.new_stocks_today.to_string(), &theme)
            .value_color(theme.positive),
        cards[1],
    );
    f.render_widget(
        MetricCard::new("Avg Price", format::price(stats.avg_price), &theme)
            .caption(format!("cap {}", format::money(stats.avg_market_cap))),
        cards[2],
    );
    f.render_widget(
        MetricCard::new("Avg Volume", format::compact(stats.avg_volume), &theme),
        cards[3],
    );
    let (gainer, gainer_pct) = match summary.top_gainers.first() {
        Some(g) => (g.reddit_ticker.clone(), g.change_pct),
        None => match &stats.top_gainer {
            Some((t, pct)) => (t.clone(), Some(*pct)),
            None => (format::PLACEHOLDER.to_string(), None),
        },
    };
    f.render_widget(
        MetricCard::new("Top Gainer", gainer, &theme)
            .value_color(theme.change_color(gainer_pct))
            .caption(format::percent(gainer_pct)),
        cards[4],
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);
    render_gainers(f, bottom[0], summary);
    render_sectors(f, bottom[1], &stats);
}

fn render_gainers(f: &mut Frame, area: Rect, summary: &StockSummary) {
    let mut lines = vec![Line::from(Span::styled("Top Gainers", theme::accent_bold()))];
    if summary.top_gainers.is_empty() {
        lines.push(Line::from(Span::styled("No gainers reported.", theme::muted())));
    }
    for g in &summary.top_gainers {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<8}", format::truncate(&g.reddit_ticker, 8)), theme::accent()),
            Span::styled(format!("{:>12}", format::price(g.current_price)), theme::muted()),
            Span::styled(format!("{:>10}", format::percent(g.change_pct)), theme::change_style(g.change_pct)),
        ]));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn render_sectors(f: &mut Frame, area: Rect, stats: &MarketStats) {
    let mut lines = vec![Line::from(Span::styled(
        format!("Sectors ({} stocks loaded)", stats.count),
        theme::accent_bold(),
    ))];
    let mut counts: Vec<_> = stats.sector_counts.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (sector, n) in counts {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<24}", format::truncate(sector, 24)), theme::muted()),
            Span::styled(format!("{n:>4}"), theme::neutral()),
        ]));
    }
    f.render_widget(Paragraph::new(lines), area);
}
