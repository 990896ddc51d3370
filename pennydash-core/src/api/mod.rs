//! API client trait and structured error types.
//!
//! The `PennyApi` trait abstracts over the backend so the worker can hold an
//! `Arc<dyn PennyApi>` and tests can swap in a mock.

pub mod http;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DetailsPage, StockCount, StockSummary};

pub use http::HttpPennyApi;

pub const COUNT_PATH: &str = "/api/pennystocks";
pub const SUMMARY_PATH: &str = "/api/pennystocks/summary";
pub const DETAILS_PATH: &str = "/api/pennystocks/details";

/// Failure of a single API call.
///
/// Designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error on {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    #[error("HTTP {status} from {endpoint}")]
    Http { endpoint: String, status: u16 },

    #[error("unexpected response from {endpoint}: {message}")]
    Parse { endpoint: String, message: String },
}

/// Coarse error class, used for labels and error history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Http,
    Parse,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Network => "NET",
            ErrorKind::Http => "HTTP",
            ErrorKind::Parse => "PARSE",
        }
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network { .. } => ErrorKind::Network,
            ApiError::Http { .. } => ErrorKind::Http,
            ApiError::Parse { .. } => ErrorKind::Parse,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Network { endpoint, .. }
            | ApiError::Http { endpoint, .. }
            | ApiError::Parse { endpoint, .. } => endpoint,
        }
    }
}

/// Read-only client for the penny-stock backend.
pub trait PennyApi: Send + Sync {
    /// `GET /api/pennystocks`
    fn fetch_count(&self) -> Result<StockCount, ApiError>;

    /// `GET /api/pennystocks/summary`
    fn fetch_summary(&self) -> Result<StockSummary, ApiError>;

    /// `GET /api/pennystocks/details`. `limit` is only sent when present;
    /// `include_comments` is always sent.
    fn fetch_details(
        &self,
        limit: Option<u32>,
        include_comments: bool,
    ) -> Result<DetailsPage, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_endpoint() {
        let err = ApiError::Http {
            endpoint: SUMMARY_PATH.into(),
            status: 500,
        };
        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(err.endpoint(), SUMMARY_PATH);
        assert_eq!(err.to_string(), "HTTP 500 from /api/pennystocks/summary");
    }

    #[test]
    fn labels() {
        assert_eq!(ErrorKind::Network.label(), "NET");
        assert_eq!(ErrorKind::Parse.label(), "PARSE");
    }
}
