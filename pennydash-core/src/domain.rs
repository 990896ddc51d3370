//! Domain types for the penny-stock API payloads.
//!
//! Wire names follow the backend: top-level envelopes are camelCase
//! (`totalStocks`), row fields are snake_case (`reddit_ticker`). Every
//! financial quantity is nullable: `None` means "unknown", never zero.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Response of `GET /api/pennystocks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockCount {
    pub total_stocks: u64,
}

/// One entry in the summary's top-gainers list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopGainer {
    pub reddit_ticker: String,
    pub current_price: Option<f64>,
    pub change_pct: Option<f64>,
}

/// A single time-stamped price observation in a trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub last_updated: String,
    pub current_price: Option<f64>,
}

impl TrendPoint {
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.last_updated)
    }
}

/// Response of `GET /api/pennystocks/summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub total_stocks: u64,
    pub new_stocks_today: u64,
    pub top_gainers: Vec<TopGainer>,
    pub trends: BTreeMap<String, Vec<TrendPoint>>,
}

impl StockSummary {
    /// Restore chronological order in every trend series.
    ///
    /// Series that are already ordered are left untouched. Otherwise the
    /// series is stably sorted by parsed timestamp; points whose timestamp
    /// cannot be parsed go last, ordered by their raw text.
    pub fn canonicalize(&mut self) {
        for series in self.trends.values_mut() {
            if !is_chronological(series) {
                series.sort_by(compare_points);
            }
        }
    }

    /// Trend series for a ticker, if the backend sent one.
    pub fn trend(&self, ticker: &str) -> Option<&[TrendPoint]> {
        self.trends.get(ticker).map(|s| s.as_slice())
    }

    pub fn trend_tickers(&self) -> Vec<&str> {
        self.trends.keys().map(|k| k.as_str()).collect()
    }
}

fn compare_points(a: &TrendPoint, b: &TrendPoint) -> Ordering {
    match (a.timestamp(), b.timestamp()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.last_updated.cmp(&b.last_updated),
    }
}

fn is_chronological(series: &[TrendPoint]) -> bool {
    series
        .windows(2)
        .all(|w| compare_points(&w[0], &w[1]) != Ordering::Greater)
}

/// Parse the timestamp formats the backend is known to emit.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// One tracked stock, as returned by the details endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockDetailRow {
    pub row_id: i64,
    pub reddit_ticker: String,

    pub yfinance_symbol: Option<String>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub website: Option<String>,
    pub about: Option<String>,

    pub market_cap: Option<f64>,
    pub employees: Option<f64>,
    pub founded: Option<f64>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub open: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub volume: Option<f64>,

    pub score: Option<f64>,
    pub num_comments: Option<f64>,
    pub content: Option<String>,
    pub created_utc: Option<String>,
    pub error: Option<String>,
    pub last_updated: Option<String>,

    pub summarized_content: Option<String>,
    pub summarized_comments: Option<String>,
    pub verdict: Option<String>,
}

impl StockDetailRow {
    /// A row with only its identity fields set.
    pub fn new(row_id: i64, reddit_ticker: impl Into<String>) -> Self {
        Self {
            row_id,
            reddit_ticker: reddit_ticker.into(),
            yfinance_symbol: None,
            long_name: None,
            short_name: None,
            sector: None,
            industry: None,
            country: None,
            currency: None,
            website: None,
            about: None,
            market_cap: None,
            employees: None,
            founded: None,
            current_price: None,
            previous_close: None,
            open: None,
            day_high: None,
            day_low: None,
            volume: None,
            score: None,
            num_comments: None,
            content: None,
            created_utc: None,
            error: None,
            last_updated: None,
            summarized_content: None,
            summarized_comments: None,
            verdict: None,
        }
    }

    /// Percent change from previous close. `None` unless both prices are
    /// known and the previous close is non-zero.
    pub fn change_pct(&self) -> Option<f64> {
        let current = self.current_price?;
        let prev = self.previous_close?;
        if prev == 0.0 || !prev.is_finite() || !current.is_finite() {
            return None;
        }
        Some((current - prev) / prev * 100.0)
    }

    /// Best available display name: long name, then short name.
    pub fn display_name(&self) -> Option<&str> {
        self.long_name
            .as_deref()
            .or(self.short_name.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Response of `GET /api/pennystocks/details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailsPage {
    #[serde(rename = "totalStocks")]
    pub total_stocks: u64,
    #[serde(rename = "data")]
    pub rows: Vec<StockDetailRow>,
}
