//! Detail-overlay selection, keyed by ticker.
//!
//! Selection is independent of pagination: selecting does not move the
//! page, and paging does not clear the selection.

use crate::domain::StockDetailRow;

/// First row whose ticker matches exactly.
pub fn select_by_ticker<'a>(rows: &'a [StockDetailRow], ticker: &str) -> Option<&'a StockDetailRow> {
    rows.iter().find(|r| r.reddit_ticker == ticker)
}

/// State of the detail overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailOverlay {
    #[default]
    Closed,
    Open(Box<StockDetailRow>),
}

impl DetailOverlay {
    /// Open (or replace) the overlay with the row for `ticker`.
    ///
    /// Returns `false` and leaves the state untouched when the ticker is
    /// not among `rows`.
    pub fn select(&mut self, rows: &[StockDetailRow], ticker: &str) -> bool {
        match select_by_ticker(rows, ticker) {
            Some(row) => {
                *self = DetailOverlay::Open(Box::new(row.clone()));
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        *self = DetailOverlay::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DetailOverlay::Open(_))
    }

    pub fn selected(&self) -> Option<&StockDetailRow> {
        match self {
            DetailOverlay::Open(row) => Some(row),
            DetailOverlay::Closed => None,
        }
    }
}
