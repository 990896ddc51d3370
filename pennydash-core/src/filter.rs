//! Row filtering and aggregate market stats over fetched detail rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::StockDetailRow;

/// Filters applied to the details table before pagination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowFilter {
    /// Case-insensitive substring of the ticker or yfinance symbol.
    pub search: String,
    pub sector: Option<String>,
    pub country: Option<String>,
    /// Inclusive market-cap bounds. Rows with no known market cap never
    /// pass a bound.
    pub min_market_cap: Option<f64>,
    pub max_market_cap: Option<f64>,
}

impl RowFilter {
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.sector.is_none()
            && self.country.is_none()
            && self.min_market_cap.is_none()
            && self.max_market_cap.is_none()
    }

    fn market_cap_in_range(&self, row: &StockDetailRow) -> bool {
        if self.min_market_cap.is_none() && self.max_market_cap.is_none() {
            return true;
        }
        let Some(cap) = row.market_cap.filter(|v| v.is_finite()) else {
            return false;
        };
        self.min_market_cap.map_or(true, |min| cap >= min)
            && self.max_market_cap.map_or(true, |max| cap <= max)
    }

    pub fn matches(&self, row: &StockDetailRow) -> bool {
        if let Some(sector) = &self.sector {
            if row.sector.as_deref() != Some(sector.as_str()) {
                return false;
            }
        }
        if let Some(country) = &self.country {
            if row.country.as_deref() != Some(country.as_str()) {
                return false;
            }
        }
        if !self.market_cap_in_range(row) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        row.reddit_ticker.to_lowercase().contains(&needle)
            || row
                .yfinance_symbol
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
    }

    /// Matching rows, in their original order.
    pub fn apply<'a>(&self, rows: &'a [StockDetailRow]) -> Vec<&'a StockDetailRow> {
        rows.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Distinct non-empty sectors, sorted.
pub fn sectors(rows: &[StockDetailRow]) -> Vec<String> {
    distinct(rows, |r| r.sector.as_deref())
}

/// Distinct non-empty countries, sorted.
pub fn countries(rows: &[StockDetailRow]) -> Vec<String> {
    distinct(rows, |r| r.country.as_deref())
}

fn distinct<'a>(
    rows: &'a [StockDetailRow],
    field: impl Fn(&'a StockDetailRow) -> Option<&'a str>,
) -> Vec<String> {
    let mut out: Vec<String> = rows
        .iter()
        .filter_map(field)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Aggregates over a set of rows. Averages only count known values.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketStats {
    pub count: usize,
    pub avg_price: Option<f64>,
    pub avg_market_cap: Option<f64>,
    pub avg_volume: Option<f64>,
    /// Ticker and percent change of the best `change_pct`.
    pub top_gainer: Option<(String, f64)>,
    pub sector_counts: BTreeMap<String, usize>,
}

impl MarketStats {
    pub fn from_rows(rows: &[StockDetailRow]) -> Self {
        let mut top_gainer: Option<(String, f64)> = None;
        let mut sector_counts = BTreeMap::new();

        for row in rows {
            if let Some(pct) = row.change_pct() {
                if top_gainer.as_ref().map_or(true, |(_, best)| pct > *best) {
                    top_gainer = Some((row.reddit_ticker.clone(), pct));
                }
            }
            if let Some(sector) = row.sector.as_deref().filter(|s| !s.trim().is_empty()) {
                *sector_counts.entry(sector.to_string()).or_insert(0) += 1;
            }
        }

        Self {
            count: rows.len(),
            avg_price: mean(rows.iter().map(|r| r.current_price)),
            avg_market_cap: mean(rows.iter().map(|r| r.market_cap)),
            avg_volume: mean(rows.iter().map(|r| r.volume)),
            top_gainer,
            sector_counts,
        }
    }
}

fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
