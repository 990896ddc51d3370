//! PennyDash TUI: terminal dashboard for the penny-stock backend.
//!
//! Panels:
//! 1. Overview: headline cards, top gainers, sector mix
//! 2. Stocks: filtered, paginated details table with a detail modal
//! 3. Trends: per-ticker price history chart
//! 4. Help: keyboard shortcuts

pub mod app;
pub mod input;
pub mod logging;
pub mod persistence;
pub mod session;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::AppState;
pub use session::Dashboard;
pub use theme::Theme;

#[cfg(test)]
mod test_helpers;
