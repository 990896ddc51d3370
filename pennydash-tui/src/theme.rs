//! Parrot/neon palette for the PennyDash TUI.
//!
//! # Color Palette
//! - **Accent**: electric cyan (focus, highlights)
//! - **Positive**: neon green (gains)
//! - **Negative**: hot pink (losses, errors)
//! - **Warning**: neon orange (stale data, refresh failures)
//! - **Neutral**: cool purple (secondary info)
//! - **Muted**: steel blue (labels, placeholders)
//!
//! Panels use the free style functions; widgets that take a `&Theme`
//! read the raw colors.

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub const fn parrot_neon() -> Self {
        Self {
            accent: ACCENT,
            positive: POSITIVE,
            negative: NEGATIVE,
            warning: WARNING,
            neutral: NEUTRAL,
            muted: MUTED,
            text_secondary: TEXT_SECONDARY,
        }
    }

    /// Color for a day change; unknown change is muted, not green.
    pub fn change_color(&self, change_pct: Option<f64>) -> Color {
        match change_pct.filter(|v| v.is_finite()) {
            Some(v) if v > 0.0 => self.positive,
            Some(v) if v < 0.0 => self.negative,
            Some(_) => self.neutral,
            None => self.muted,
        }
    }

    /// Color for an LLM verdict string ("buy", "avoid", ...).
    pub fn verdict_color(&self, verdict: &str) -> Color {
        let v = verdict.to_ascii_lowercase();
        if v.contains("buy") || v.contains("bull") {
            self.positive
        } else if v.contains("sell") || v.contains("avoid") || v.contains("bear") {
            self.negative
        } else if v.contains("hold") || v.contains("watch") {
            self.warning
        } else {
            self.text_secondary
        }
    }
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn change_style(change_pct: Option<f64>) -> Style {
    Style::default().fg(Theme::parrot_neon().change_color(change_pct))
}

pub fn panel_border() -> Style {
    accent()
}

pub fn panel_title() -> Style {
    accent_bold()
}
