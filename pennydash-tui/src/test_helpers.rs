//! Test helpers: an in-memory API and a fully loaded `AppState`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pennydash_core::api::{ApiError, PennyApi, COUNT_PATH, DETAILS_PATH, SUMMARY_PATH};
use pennydash_core::domain::{
    DetailsPage, StockCount, StockDetailRow, StockSummary, TopGainer, TrendPoint,
};
use pennydash_core::orchestrator::{OrchestratorSettings, ResourceStatus};

use crate::app::AppState;
use crate::session::Dashboard;

const SECTORS: [&str; 3] = ["Energy", "Healthcare", "Technology"];

/// `n` rows `T000..`, sectors assigned round-robin, countries alternating,
/// market cap `1M + i * 1M`.
pub fn fixture_rows(n: usize) -> Vec<StockDetailRow> {
    (0..n)
        .map(|i| {
            let mut row = StockDetailRow::new(i as i64, format!("T{i:03}"));
            row.sector = Some(SECTORS[i % SECTORS.len()].to_string());
            row.current_price = Some(0.5 + i as f64 / 100.0);
            row.previous_close = Some(0.5);
            row.country = Some(if i % 2 == 0 { "Canada" } else { "United States" }.to_string());
            row.market_cap = Some(1e6 + i as f64 * 1e6);
            row.volume = Some(1_000.0 * (i + 1) as f64);
            row
        })
        .collect()
}

pub fn fixture_summary(n: usize) -> StockSummary {
    let mut trends = BTreeMap::new();
    for ticker in ["T000", "T001"] {
        trends.insert(
            ticker.to_string(),
            vec![
                TrendPoint {
                    last_updated: "2024-05-01 10:00:00".into(),
                    current_price: Some(0.4),
                },
                TrendPoint {
                    last_updated: "2024-05-02 10:00:00".into(),
                    current_price: Some(0.5),
                },
            ],
        );
    }
    StockSummary {
        total_stocks: n as u64,
        new_stocks_today: 2,
        top_gainers: vec![TopGainer {
            reddit_ticker: "T001".into(),
            current_price: Some(0.51),
            change_pct: Some(2.0),
        }],
        trends,
    }
}

/// In-memory backend. `set_down(true)` makes every call answer HTTP 500;
/// `delay` holds each call before it answers.
pub struct FixtureApi {
    rows: usize,
    delay: Duration,
    down: AtomicBool,
}

impl FixtureApi {
    pub fn new(rows: usize) -> Arc<Self> {
        Self::with_delay(rows, Duration::ZERO)
    }

    pub fn with_delay(rows: usize, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            rows,
            delay,
            down: AtomicBool::new(false),
        })
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn answer<T>(&self, endpoint: &str, ok: impl FnOnce() -> T) -> Result<T, ApiError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.down.load(Ordering::SeqCst) {
            return Err(ApiError::Http {
                endpoint: endpoint.to_string(),
                status: 500,
            });
        }
        Ok(ok())
    }
}

impl PennyApi for FixtureApi {
    fn fetch_count(&self) -> Result<StockCount, ApiError> {
        self.answer(COUNT_PATH, || StockCount {
            total_stocks: self.rows as u64,
        })
    }

    fn fetch_summary(&self) -> Result<StockSummary, ApiError> {
        self.answer(SUMMARY_PATH, || fixture_summary(self.rows))
    }

    fn fetch_details(&self, _: Option<u32>, _: bool) -> Result<DetailsPage, ApiError> {
        self.answer(DETAILS_PATH, || DetailsPage {
            total_stocks: self.rows as u64,
            rows: fixture_rows(self.rows),
        })
    }
}

/// A started `AppState` over `api`. Mount fetches may still be running.
pub fn started_app(api: Arc<FixtureApi>) -> AppState {
    let dashboard = Dashboard::spawn(api, OrchestratorSettings::default()).expect("spawn worker");
    let mut app = AppState::new(dashboard);
    app.dashboard.start(Instant::now());
    app
}

/// Apply worker responses until nothing is in flight.
pub fn settle(app: &mut AppState) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        for applied in app.dashboard.poll_responses() {
            app.handle_applied(applied);
        }
        let orch = app.dashboard.orchestrator();
        if !orch.summary().is_in_flight() && !orch.details().is_in_flight() {
            return;
        }
        assert!(Instant::now() < deadline, "fetches did not complete");
        thread::sleep(Duration::from_millis(5));
    }
}

/// An `AppState` whose mount fetches have completed against `FixtureApi`.
pub fn loaded_app(rows: usize) -> AppState {
    let mut app = started_app(FixtureApi::new(rows));
    settle(&mut app);
    let orch = app.dashboard.orchestrator();
    assert_eq!(orch.summary().status(), ResourceStatus::Ready);
    assert_eq!(orch.details().status(), ResourceStatus::Ready);
    app
}
