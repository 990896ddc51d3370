//! Application state: single-owner, main-thread only.
//!
//! All view state lives here. Fetched data lives in the orchestrator owned
//! by the [`Dashboard`]; the worker thread talks to it through channels.

use std::collections::VecDeque;
use std::time::Instant;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use pennydash_core::api::ErrorKind;
use pennydash_core::domain::{StockDetailRow, StockSummary};
use pennydash_core::filter::{self, RowFilter};
use pennydash_core::orchestrator::{Applied, ResourceKind};
use pennydash_core::paginate::page_count;
use pennydash_core::selection::DetailOverlay;

use crate::session::Dashboard;

const ERROR_HISTORY_CAP: usize = 50;

/// Market-cap bands cycled on the Stocks panel: label, min, max.
pub const MARKET_CAP_BANDS: [(&str, Option<f64>, Option<f64>); 5] = [
    ("all", None, None),
    ("under $10M", None, Some(10e6)),
    ("$10M-$100M", Some(10e6), Some(100e6)),
    ("$100M-$1B", Some(100e6), Some(1e9)),
    ("over $1B", Some(1e9), None),
];

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Overview,
    Stocks,
    Trends,
    Help,
}

impl Panel {
    const COUNT: usize = 4;

    pub fn index(self) -> usize {
        match self {
            Panel::Overview => 0,
            Panel::Stocks => 1,
            Panel::Trends => 2,
            Panel::Help => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Overview),
            1 => Some(Panel::Stocks),
            2 => Some(Panel::Trends),
            3 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Overview => "Overview",
            Panel::Stocks => "Stocks",
            Panel::Trends => "Trends",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Overview)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT).unwrap_or(Panel::Overview)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An entry in the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub kind: ErrorKind,
    pub message: String,
    pub context: String,
}

/// Which overlay (if any) is shown on top. The detail modal is tracked
/// separately in [`AppState::detail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    ErrorHistory,
    Search,
}

/// Top-level application state.
pub struct AppState {
    pub active_panel: Panel,
    pub running: bool,

    pub dashboard: Dashboard,

    // Stocks panel
    pub filter: RowFilter,
    /// Cursor within the visible page.
    pub table_cursor: usize,

    // Trends panel
    pub trend_cursor: usize,

    // Cross-cutting
    pub overlay: Overlay,
    pub detail: DetailOverlay,
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub search_input: String,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            active_panel: Panel::Overview,
            running: true,
            dashboard,
            filter: RowFilter::default(),
            table_cursor: 0,
            trend_cursor: 0,
            overlay: Overlay::None,
            detail: DetailOverlay::Closed,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            search_input: String::new(),
        }
    }

    pub fn summary(&self) -> Option<&StockSummary> {
        self.dashboard.orchestrator().summary().data()
    }

    /// Loaded rows after the active filter.
    pub fn filtered_rows(&self) -> Vec<&StockDetailRow> {
        self.filter.apply(self.dashboard.orchestrator().rows())
    }

    /// Filtered rows on the current page.
    pub fn visible_rows(&self) -> Vec<&StockDetailRow> {
        let rows = self.filtered_rows();
        self.dashboard.orchestrator().page().window(&rows).to_vec()
    }

    pub fn page(&self) -> usize {
        self.dashboard.orchestrator().page().page()
    }

    pub fn page_count(&self) -> usize {
        let size = self.dashboard.orchestrator().page().page_size();
        page_count(self.filtered_rows().len(), size)
    }

    /// Ticker under the table cursor.
    pub fn cursor_ticker(&self) -> Option<String> {
        self.visible_rows()
            .get(self.table_cursor)
            .map(|r| r.reddit_ticker.clone())
    }

    pub fn move_cursor_down(&mut self) {
        let len = self.visible_rows().len();
        if self.table_cursor + 1 < len {
            self.table_cursor += 1;
        }
    }

    pub fn move_cursor_up(&mut self) {
        self.table_cursor = self.table_cursor.saturating_sub(1);
    }

    /// Next page, but only while there are filtered rows beyond this one.
    pub fn next_page(&mut self) {
        let len = self.filtered_rows().len();
        if self.dashboard.orchestrator().page().has_next(len) {
            self.dashboard.next_page();
            self.table_cursor = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page() > 1 {
            self.dashboard.prev_page();
            self.table_cursor = 0;
        }
    }

    /// Open the detail overlay for `ticker`. Unknown tickers leave it as is.
    pub fn open_detail(&mut self, ticker: &str) -> bool {
        let rows = self.dashboard.orchestrator().rows();
        let found = self.detail.select(rows, ticker);
        if !found {
            self.set_warning(format!("No details loaded for {ticker}"));
        }
        found
    }

    pub fn open_detail_at_cursor(&mut self) {
        if let Some(ticker) = self.cursor_ticker() {
            self.open_detail(&ticker);
        }
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
    }

    pub fn set_search(&mut self, search: String) {
        self.filter.search = search;
        self.reset_page();
    }

    /// Cycle the sector filter: none, then each known sector in order.
    pub fn cycle_sector(&mut self) {
        let sectors = filter::sectors(self.dashboard.orchestrator().rows());
        self.filter.sector = next_choice(&sectors, self.filter.sector.as_deref());
        match &self.filter.sector {
            Some(s) => self.set_status(format!("Sector: {s}")),
            None => self.set_status("Sector: all"),
        }
        self.reset_page();
    }

    /// Cycle the country filter the same way as the sector filter.
    pub fn cycle_country(&mut self) {
        let countries = filter::countries(self.dashboard.orchestrator().rows());
        self.filter.country = next_choice(&countries, self.filter.country.as_deref());
        match &self.filter.country {
            Some(c) => self.set_status(format!("Country: {c}")),
            None => self.set_status("Country: all"),
        }
        self.reset_page();
    }

    /// Index into [`MARKET_CAP_BANDS`] matching the current bounds.
    pub fn market_cap_band(&self) -> usize {
        MARKET_CAP_BANDS
            .iter()
            .position(|(_, min, max)| {
                *min == self.filter.min_market_cap && *max == self.filter.max_market_cap
            })
            .unwrap_or(0)
    }

    pub fn cycle_market_cap(&mut self) {
        let next = (self.market_cap_band() + 1) % MARKET_CAP_BANDS.len();
        let (label, min, max) = MARKET_CAP_BANDS[next];
        self.filter.min_market_cap = min;
        self.filter.max_market_cap = max;
        self.set_status(format!("Market cap: {label}"));
        self.reset_page();
    }

    pub fn clear_filters(&mut self) {
        self.filter = RowFilter::default();
        self.reset_page();
        self.set_status("Filters cleared");
    }

    pub fn refresh(&mut self, now: Instant) {
        self.dashboard.refresh(now);
        self.set_status("Refreshing...");
    }

    /// Tickers with a trend series, in display order.
    pub fn trend_tickers(&self) -> Vec<String> {
        self.summary()
            .map(|s| s.trend_tickers().into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    pub fn selected_trend(&self) -> Option<String> {
        let tickers = self.trend_tickers();
        if tickers.is_empty() {
            return None;
        }
        tickers.get(self.trend_cursor.min(tickers.len() - 1)).cloned()
    }

    /// React to one applied worker response.
    pub fn handle_applied(&mut self, applied: Applied) {
        match applied {
            Applied::Updated(ResourceKind::Summary) => {
                let n = self.trend_tickers().len();
                self.trend_cursor = self.trend_cursor.min(n.saturating_sub(1));
            }
            Applied::Updated(ResourceKind::Details) => {
                let len = self.visible_rows().len();
                self.table_cursor = self.table_cursor.min(len.saturating_sub(1));
                let total = self.dashboard.orchestrator().rows().len();
                self.set_status(format!("Loaded {total} stocks"));
            }
            Applied::Failed(kind, error) => {
                self.push_error(error.kind(), error.to_string(), kind.label().to_string());
            }
            Applied::Stale(_) => {}
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, kind: ErrorKind, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            kind,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    fn reset_page(&mut self) {
        self.dashboard.first_page();
        self.table_cursor = 0;
    }
}

/// The option after `current`, wrapping through `None` ("all").
fn next_choice(options: &[String], current: Option<&str>) -> Option<String> {
    match current {
        None => options.first().cloned(),
        Some(current) => options
            .iter()
            .position(|o| o == current)
            .and_then(|i| options.get(i + 1))
            .cloned(),
    }
}
