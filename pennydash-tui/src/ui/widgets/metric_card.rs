//! Metric card: a bordered box with a label, a large value and an
//! optional caption. Used for the Overview headline numbers.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::theme::Theme;

pub struct MetricCard<'a> {
    label: &'a str,
    value: String,
    value_color: Color,
    caption: Option<String>,
    theme: &'a Theme,
}

impl<'a> MetricCard<'a> {
    pub fn new(label: &'a str, value: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            label,
            value: value.into(),
            value_color: theme.accent,
            caption: None,
            theme,
        }
    }

    pub fn value_color(mut self, color: Color) -> Self {
        self.value_color = color;
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

impl Widget for MetricCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.label))
            .title_alignment(Alignment::Center)
            .title_style(Style::default().fg(self.theme.text_secondary))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.muted));

        let mut lines = vec![Line::from(Span::styled(
            self.value,
            Style::default()
                .fg(self.value_color)
                .add_modifier(Modifier::BOLD),
        ))];
        if let Some(caption) = self.caption {
            lines.push(Line::from(Span::styled(
                caption,
                Style::default()
                    .fg(self.theme.muted)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_label_value_and_caption() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 24, 4);
        let mut buf = Buffer::empty(area);
        MetricCard::new("Total Stocks", "47", &theme)
            .caption("+5 today")
            .render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Total Stocks"));
        assert!(text.contains("47"));
        assert!(text.contains("+5 today"));
    }
}
