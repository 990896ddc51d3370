//! Fetch orchestration: decides which requests to issue and whether a
//! response still applies.
//!
//! The orchestrator never performs I/O. It hands out [`FetchRequest`]s,
//! which the caller executes (on a worker thread in the TUI, inline in the
//! CLI), and takes back [`FetchOutcome`]s through [`Orchestrator::apply`].
//! Time is injected as `Instant` so polling is deterministic under test.
//!
//! Guarantees:
//! - at most one in-flight summary request; further refreshes coalesce
//! - a details response is applied only if it answers the latest details
//!   request, so a slow response for an old page cannot overwrite a newer one
//! - failures keep the previous data and record the error

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::api::{ApiError, PennyApi, DETAILS_PATH, SUMMARY_PATH};
use crate::config::{DashConfig, DetailsFetchMode, SummaryPolicy};
use crate::domain::{DetailsPage, StockDetailRow, StockSummary};
use crate::paginate::PageState;

/// Monotonic id of an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// Which resource a request or response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Summary,
    Details,
}

impl ResourceKind {
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Summary => "summary",
            ResourceKind::Details => "details",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    Summary,
    Details {
        /// Page this request was issued for (always 1 in fetch-once mode).
        page: usize,
        limit: Option<u32>,
        include_comments: bool,
    },
}

/// A request the caller must execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: RequestId,
    pub kind: FetchKind,
}

impl FetchRequest {
    pub fn resource(&self) -> ResourceKind {
        match self.kind {
            FetchKind::Summary => ResourceKind::Summary,
            FetchKind::Details { .. } => ResourceKind::Details,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self.kind {
            FetchKind::Summary => SUMMARY_PATH,
            FetchKind::Details { .. } => DETAILS_PATH,
        }
    }

    /// An outcome for a request that could not be executed at all.
    pub fn unsent(&self, message: impl Into<String>) -> FetchOutcome {
        FetchOutcome {
            id: self.id,
            resource: self.resource(),
            result: Err(ApiError::Network {
                endpoint: self.endpoint().to_string(),
                message: message.into(),
            }),
        }
    }

    /// Run the request against `api`. Blocks for the duration of the call.
    pub fn execute(&self, api: &dyn PennyApi) -> FetchOutcome {
        let result = match &self.kind {
            FetchKind::Summary => api.fetch_summary().map(FetchPayload::Summary),
            FetchKind::Details {
                limit,
                include_comments,
                ..
            } => api
                .fetch_details(*limit, *include_comments)
                .map(FetchPayload::Details),
        };
        FetchOutcome {
            id: self.id,
            resource: self.resource(),
            result,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchPayload {
    Summary(StockSummary),
    Details(DetailsPage),
}

/// The result of an executed request.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub id: RequestId,
    pub resource: ResourceKind,
    pub result: Result<FetchPayload, ApiError>,
}

/// What `apply` did with an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Updated(ResourceKind),
    Failed(ResourceKind, ApiError),
    /// Superseded by a newer request; ignored.
    Stale(ResourceKind),
}

/// Observable state of one fetched resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    /// Never requested.
    Idle,
    /// First fetch in flight, nothing to show yet.
    Loading,
    Ready,
    /// Data shown, newer fetch in flight.
    Refreshing,
    /// Data shown, last refresh failed.
    Stale,
    /// No data, last fetch failed.
    Failed,
}

/// Data plus request bookkeeping for one endpoint.
#[derive(Debug, Clone)]
pub struct Resource<T> {
    data: Option<T>,
    latest: Option<RequestId>,
    in_flight: bool,
    last_error: Option<ApiError>,
    updated_at: Option<DateTime<Local>>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            data: None,
            latest: None,
            in_flight: false,
            last_error: None,
            updated_at: None,
        }
    }
}

impl<T> Resource<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    pub fn status(&self) -> ResourceStatus {
        match (self.data.is_some(), self.in_flight, self.last_error.is_some()) {
            (false, true, _) => ResourceStatus::Loading,
            (true, true, _) => ResourceStatus::Refreshing,
            (true, false, true) => ResourceStatus::Stale,
            (true, false, false) => ResourceStatus::Ready,
            (false, false, true) => ResourceStatus::Failed,
            (false, false, false) => ResourceStatus::Idle,
        }
    }

    fn issue(&mut self, id: RequestId) {
        self.latest = Some(id);
        self.in_flight = true;
    }

    fn is_latest(&self, id: RequestId) -> bool {
        self.latest == Some(id)
    }

    fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.in_flight = false;
        self.last_error = None;
        self.updated_at = Some(Local::now());
    }

    fn fail(&mut self, error: ApiError) {
        self.in_flight = false;
        self.last_error = Some(error);
    }
}

/// Orchestrator knobs, usually taken from [`DashConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorSettings {
    pub refresh_interval: Duration,
    pub summary_policy: SummaryPolicy,
    pub fetch_mode: DetailsFetchMode,
    pub page_size: usize,
    pub limit: Option<u32>,
    pub include_comments: bool,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&DashConfig::default())
    }
}

impl OrchestratorSettings {
    pub fn from_config(config: &DashConfig) -> Self {
        Self {
            refresh_interval: config.refresh.interval(),
            summary_policy: config.refresh.summary_policy,
            fetch_mode: config.details.fetch_mode,
            page_size: config.details.page_size,
            limit: config.details.limit(),
            include_comments: config.details.include_comments,
        }
    }
}

/// Owned fetch/poll state for one dashboard view.
#[derive(Debug)]
pub struct Orchestrator {
    settings: OrchestratorSettings,
    next_id: u64,
    summary: Resource<StockSummary>,
    details: Resource<DetailsPage>,
    /// Page of the latest details request.
    details_page: Option<usize>,
    page: PageState,
    running: bool,
    next_poll: Option<Instant>,
}

impl Orchestrator {
    pub fn new(settings: OrchestratorSettings) -> Self {
        let page = PageState::new(settings.page_size);
        Self {
            settings,
            next_id: 0,
            summary: Resource::default(),
            details: Resource::default(),
            details_page: None,
            page,
            running: false,
            next_poll: None,
        }
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    pub fn summary(&self) -> &Resource<StockSummary> {
        &self.summary
    }

    pub fn details(&self) -> &Resource<DetailsPage> {
        &self.details
    }

    /// All loaded detail rows (empty before the first success).
    pub fn rows(&self) -> &[StockDetailRow] {
        self.details.data().map(|d| d.rows.as_slice()).unwrap_or(&[])
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn next_poll(&self) -> Option<Instant> {
        self.next_poll
    }

    /// Mount: fetch summary and details, arm the poll timer.
    pub fn start(&mut self, now: Instant) -> Vec<FetchRequest> {
        self.running = true;
        self.arm(now);
        log::info!(
            "orchestrator started (policy {:?}, interval {:?}, details {:?})",
            self.settings.summary_policy,
            self.settings.refresh_interval,
            self.settings.fetch_mode
        );
        self.summary_request()
            .into_iter()
            .chain(self.details_request())
            .collect()
    }

    /// Teardown: disarm the poll timer. Later ticks do nothing.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("orchestrator stopped");
        }
        self.running = false;
        self.next_poll = None;
    }

    /// Advance the poll timer. Returns a summary request when one is due
    /// and none is already in flight.
    pub fn tick(&mut self, now: Instant) -> Option<FetchRequest> {
        let due = self.next_poll.filter(|at| *at <= now)?;
        if !self.running {
            return None;
        }
        log::debug!("poll due (scheduled {:?} ago)", now.saturating_duration_since(due));
        self.arm(now);
        self.summary_request()
    }

    /// Manual refresh of both resources; re-arms the poll timer.
    pub fn refresh(&mut self, now: Instant) -> Vec<FetchRequest> {
        if self.running {
            self.arm(now);
        }
        self.summary_request()
            .into_iter()
            .chain(self.details_request())
            .collect()
    }

    /// Refresh only the summary, coalescing with an in-flight request.
    pub fn refresh_summary(&mut self) -> Option<FetchRequest> {
        self.summary_request()
    }

    /// Move to `page`. In per-page mode a details request is issued when
    /// the page actually changes.
    pub fn set_page(&mut self, page: usize) -> Option<FetchRequest> {
        self.move_page(|p| p.set_page(page))
    }

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        self.move_page(PageState::next)
    }

    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        self.move_page(PageState::prev)
    }

    /// Back to page 1, e.g. after the row filter changes.
    pub fn first_page(&mut self) -> Option<FetchRequest> {
        self.move_page(PageState::reset)
    }

    /// Apply an executed request's outcome.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Applied {
        let kind = outcome.resource;
        let latest = match kind {
            ResourceKind::Summary => self.summary.is_latest(outcome.id),
            ResourceKind::Details => self.details.is_latest(outcome.id),
        };
        if !latest {
            log::debug!("discarding stale {} response {:?}", kind.label(), outcome.id);
            return Applied::Stale(kind);
        }

        match outcome.result {
            Ok(FetchPayload::Summary(summary)) => {
                self.summary.succeed(summary);
                Applied::Updated(ResourceKind::Summary)
            }
            Ok(FetchPayload::Details(details)) => {
                self.details.succeed(details);
                Applied::Updated(ResourceKind::Details)
            }
            Err(error) => {
                log::warn!("{} fetch failed: {error}", kind.label());
                match kind {
                    ResourceKind::Summary => self.summary.fail(error.clone()),
                    ResourceKind::Details => self.details.fail(error.clone()),
                }
                Applied::Failed(kind, error)
            }
        }
    }

    fn arm(&mut self, now: Instant) {
        self.next_poll = match self.settings.summary_policy {
            // An interval past the clock's range means no poll is ever due.
            SummaryPolicy::Periodic => now.checked_add(self.settings.refresh_interval),
            SummaryPolicy::OnMount => None,
        };
    }

    fn move_page(&mut self, step: impl FnOnce(&mut PageState)) -> Option<FetchRequest> {
        let before = self.page.page();
        step(&mut self.page);
        if self.page.page() == before {
            return None;
        }
        match self.settings.fetch_mode {
            DetailsFetchMode::Once => None,
            DetailsFetchMode::PerPage => self.details_request(),
        }
    }

    fn allocate_id(&mut self) -> RequestId {
        self.next_id += 1;
        RequestId(self.next_id)
    }

    fn summary_request(&mut self) -> Option<FetchRequest> {
        if self.summary.is_in_flight() {
            log::debug!("summary refresh coalesced with in-flight request");
            return None;
        }
        let id = self.allocate_id();
        self.summary.issue(id);
        Some(FetchRequest {
            id,
            kind: FetchKind::Summary,
        })
    }

    fn details_request(&mut self) -> Option<FetchRequest> {
        let page = match self.settings.fetch_mode {
            DetailsFetchMode::Once => 1,
            DetailsFetchMode::PerPage => self.page.page(),
        };
        if self.details.is_in_flight() && self.details_page == Some(page) {
            log::debug!("details refresh for page {page} coalesced");
            return None;
        }
        let id = self.allocate_id();
        self.details.issue(id);
        self.details_page = Some(page);
        Some(FetchRequest {
            id,
            kind: FetchKind::Details {
                page,
                limit: self.settings.limit,
                include_comments: self.settings.include_comments,
            },
        })
    }
}
