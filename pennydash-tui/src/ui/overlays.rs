//! Overlay widgets: welcome, stock detail, error history, search.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use pennydash_core::domain::StockDetailRow;
use pennydash_core::format;

use crate::app::AppState;
use crate::theme::{self, Theme};
use crate::ui::centered_rect;

/// First-run welcome overlay.
pub fn render_welcome(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 40, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Welcome to PennyDash ")
        .title_style(theme::accent_bold());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Getting started:", theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled("  1. Overview shows today's headline numbers", theme::muted())),
        Line::from(Span::styled("  2. Press 2 for the stock table, Enter for details", theme::muted())),
        Line::from(Span::styled("  3. Press 3 to browse price trends", theme::muted())),
        Line::from(Span::styled("  4. Press r any time to refresh", theme::muted())),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No errors recorded.", theme::muted())),
            inner,
        );
        return;
    }

    let visible_height = inner.height as usize;
    let start = app.error_scroll;
    let end = (start + visible_height).min(app.error_history.len());

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app.error_history.iter().enumerate().take(end).skip(start) {
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", err.timestamp.format("%H:%M:%S")), theme::muted()),
            Span::styled(format!("[{}] ", err.kind.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));
        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}

pub fn render_search(f: &mut Frame, area: Rect, input: &str) {
    let popup = centered_rect(50, 20, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Search [Enter]apply [Esc]cancel ")
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Ticker or symbol contains:", theme::muted())),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::styled(input, theme::accent_bold()),
            Span::styled("_", theme::accent()),
        ]),
    ];
    f.render_widget(Paragraph::new(text), inner);
}

/// Detail modal for one stock.
pub fn render_detail(f: &mut Frame, area: Rect, row: &StockDetailRow) {
    let theme = Theme::default();
    let popup = centered_rect(80, 85, area);
    f.render_widget(Clear, popup);

    let title = match row.display_name() {
        Some(name) => format!(" {} · {} [Esc]close ", row.reddit_ticker, name),
        None => format!(" {} [Esc]close ", row.reddit_ticker),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(title)
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let change = row.change_pct();
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled("Prices", theme::accent_bold())));
    field(&mut lines, "Symbol", format::text(row.yfinance_symbol.as_deref()));
    field(&mut lines, "Current", format::price(row.current_price));
    field_styled(&mut lines, "Change", format::percent(change), theme::change_style(change));
    field(&mut lines, "Previous close", format::price(row.previous_close));
    field(&mut lines, "Open", format::price(row.open));
    field(
        &mut lines,
        "Day range",
        format!("{} – {}", format::price(row.day_low), format::price(row.day_high)),
    );
    field(&mut lines, "Volume", format::compact(row.volume));
    field(&mut lines, "Market cap", format::money(row.market_cap));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Company", theme::accent_bold())));
    field(&mut lines, "Sector", format::text(row.sector.as_deref()));
    field(&mut lines, "Industry", format::text(row.industry.as_deref()));
    field(&mut lines, "Country", format::text(row.country.as_deref()));
    field(&mut lines, "Currency", format::text(row.currency.as_deref()));
    field(&mut lines, "Employees", format::integer(row.employees));
    field(&mut lines, "Founded", format::integer(row.founded));
    field(&mut lines, "Website", format::text(row.website.as_deref()));
    paragraph(&mut lines, "About", row.about.as_deref());
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Reddit", theme::accent_bold())));
    field(&mut lines, "Score", format::integer(row.score));
    field(&mut lines, "Comments", format::integer(row.num_comments));
    field(&mut lines, "Posted", format::text(row.created_utc.as_deref()));
    field(&mut lines, "Last updated", format::text(row.last_updated.as_deref()));
    paragraph(&mut lines, "Post summary", row.summarized_content.as_deref());
    paragraph(&mut lines, "Comment summary", row.summarized_comments.as_deref());

    let verdict = format::text(row.verdict.as_deref());
    let verdict_style = Style::default()
        .fg(theme.verdict_color(&verdict))
        .add_modifier(Modifier::BOLD);
    field_styled(&mut lines, "Verdict", verdict, verdict_style);

    if let Some(err) = row.error.as_deref().filter(|e| !e.trim().is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("Backend error: {err}"), theme::warning())));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn field(lines: &mut Vec<Line<'static>>, label: &str, value: String) {
    field_styled(lines, label, value, theme::accent());
}

fn field_styled(lines: &mut Vec<Line<'static>>, label: &str, value: String, style: Style) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}: ", label), theme::muted()),
        Span::styled(value, style),
    ]));
}

fn paragraph(lines: &mut Vec<Line<'static>>, label: &str, body: Option<&str>) {
    lines.push(Line::from(Span::styled(format!("  {label}:"), theme::muted())));
    lines.push(Line::from(Span::styled(
        format!("    {}", format::text(body)),
        theme::neutral(),
    )));
}
