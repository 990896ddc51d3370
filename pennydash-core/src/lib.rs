//! PennyDash Core: client-side data layer for the penny-stock dashboard.
//!
//! - Domain types for the backend's summary and details payloads
//! - `PennyApi` trait with a blocking HTTP implementation
//! - Fetch orchestrator: polling, refresh coalescing, stale-response guard
//! - Pagination and detail-selection state
//! - Row filtering, market stats, and placeholder-aware formatting
//! - TOML configuration

pub mod api;
pub mod config;
pub mod domain;
pub mod filter;
pub mod format;
pub mod orchestrator;
pub mod paginate;
pub mod selection;

pub use api::{ApiError, ErrorKind, HttpPennyApi, PennyApi};
pub use config::{ConfigError, DashConfig, DetailsFetchMode, SummaryPolicy};
pub use domain::{DetailsPage, StockCount, StockDetailRow, StockSummary, TopGainer, TrendPoint};
pub use orchestrator::{
    Applied, FetchKind, FetchOutcome, FetchPayload, FetchRequest, Orchestrator,
    OrchestratorSettings, RequestId, Resource, ResourceKind, ResourceStatus,
};
pub use paginate::{next_page, page_count, paginate, prev_page, PageState};
pub use selection::{select_by_ticker, DetailOverlay};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types that cross the worker channel are Send.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<FetchRequest>();
        require_send::<FetchOutcome>();
        require_sync::<FetchOutcome>();
        require_send::<ApiError>();
        require_send::<std::sync::Arc<dyn PennyApi>>();
        require_sync::<HttpPennyApi>();
    }
}
