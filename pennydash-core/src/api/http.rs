//! HTTP implementation of `PennyApi` over `reqwest::blocking`.
//!
//! No retries: a transport failure, a non-2xx status, or a body that does
//! not decode into the expected shape is a hard failure for that call.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{ApiError, PennyApi, COUNT_PATH, DETAILS_PATH, SUMMARY_PATH};
use crate::domain::{DetailsPage, StockCount, StockSummary};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Backend client bound to one base URL.
pub struct HttpPennyApi {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpPennyApi {
    /// Build a client. `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(concat!("pennydash/", env!("CARGO_PKG_VERSION")));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().map_err(|e| ApiError::Network {
            endpoint: base_url.clone(),
            message: format!("failed to build HTTP client: {e}"),
        })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` with `query` and decode the JSON body into `T`.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        log::debug!("GET {url} {query:?}");

        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| network_error(path, &e))?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("GET {path} returned HTTP {status}");
            return Err(ApiError::Http {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(|e| network_error(path, &e))?;
        decode(path, &body)
    }
}

fn network_error(path: &str, e: &reqwest::Error) -> ApiError {
    log::warn!("GET {path} failed: {e}");
    ApiError::Network {
        endpoint: path.to_string(),
        message: e.to_string(),
    }
}

/// Decode a response body, mapping failures to `ApiError::Parse`.
pub fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        log::warn!("failed to decode {endpoint}: {e}");
        ApiError::Parse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        }
    })
}

/// Query parameters for the details endpoint. A zero limit counts as absent.
pub fn details_query(limit: Option<u32>, include_comments: bool) -> Vec<(&'static str, String)> {
    let mut query = Vec::with_capacity(2);
    if let Some(limit) = limit.filter(|l| *l > 0) {
        query.push(("limit", limit.to_string()));
    }
    query.push(("include_comments", include_comments.to_string()));
    query
}

impl PennyApi for HttpPennyApi {
    fn fetch_count(&self) -> Result<StockCount, ApiError> {
        self.get_json(COUNT_PATH, &[])
    }

    fn fetch_summary(&self) -> Result<StockSummary, ApiError> {
        let mut summary: StockSummary = self.get_json(SUMMARY_PATH, &[])?;
        summary.canonicalize();
        Ok(summary)
    }

    fn fetch_details(
        &self,
        limit: Option<u32>,
        include_comments: bool,
    ) -> Result<DetailsPage, ApiError> {
        self.get_json(DETAILS_PATH, &details_query(limit, include_comments))
    }
}
