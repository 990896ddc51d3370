//! Display formatting for nullable fields.
//!
//! Every helper takes an `Option` and returns [`PLACEHOLDER`] for `None`
//! or a non-finite number. Missing data is never shown as zero.

pub const PLACEHOLDER: &str = "—";

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// `$0.4200` below one dollar, `$12.35` otherwise.
pub fn price(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) if v.abs() < 1.0 => format!("${v:.4}"),
        Some(v) => format!("${v:.2}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Signed percentage: `+12.50%`.
pub fn percent(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{v:+.2}%"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Compact magnitude: `1.23B`, `45.6M`, `7.8K`, `950`.
pub fn compact(value: Option<f64>) -> String {
    let Some(v) = finite(value) else {
        return PLACEHOLDER.to_string();
    };
    let abs = v.abs();
    if abs >= 1e12 {
        format!("{:.2}T", v / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}

/// Compact magnitude with a dollar sign.
pub fn money(value: Option<f64>) -> String {
    match finite(value) {
        Some(_) => format!("${}", compact(value)),
        None => PLACEHOLDER.to_string(),
    }
}

/// Whole number, e.g. employee count or founding year.
pub fn integer(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{}", v.round() as i64),
        None => PLACEHOLDER.to_string(),
    }
}

/// Text, with blank strings treated as missing.
pub fn text(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Truncate to `max` characters, marking the cut with a trailing `.`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max == 0 {
        String::new()
    } else {
        let head: String = s.chars().take(max - 1).collect();
        format!("{head}.")
    }
}
