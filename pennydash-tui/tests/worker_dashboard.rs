//! Dashboard + worker against a mock API with controllable latency.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pennydash_core::api::{ApiError, PennyApi};
use pennydash_core::config::DetailsFetchMode;
use pennydash_core::domain::{DetailsPage, StockCount, StockDetailRow, StockSummary};
use pennydash_core::orchestrator::{Applied, OrchestratorSettings, ResourceKind};
use pennydash_tui::Dashboard;

/// Details call #2 is slow and answers "P2"; call #3 is fast and answers "P1".
#[derive(Default)]
struct LatencyApi {
    summary_calls: AtomicUsize,
    details_calls: AtomicUsize,
}

impl PennyApi for LatencyApi {
    fn fetch_count(&self) -> Result<StockCount, ApiError> {
        Ok(StockCount { total_stocks: 1 })
    }

    fn fetch_summary(&self) -> Result<StockSummary, ApiError> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        // Long enough for back-to-back refreshes to overlap.
        thread::sleep(Duration::from_millis(100));
        Ok(StockSummary {
            total_stocks: 1,
            new_stocks_today: 0,
            top_gainers: vec![],
            trends: Default::default(),
        })
    }

    fn fetch_details(&self, _: Option<u32>, _: bool) -> Result<DetailsPage, ApiError> {
        let call = self.details_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let ticker = match call {
            1 => "MOUNT",
            2 => {
                thread::sleep(Duration::from_millis(300));
                "P2"
            }
            _ => "P1",
        };
        Ok(DetailsPage {
            total_stocks: 1,
            rows: vec![StockDetailRow::new(call as i64, ticker)],
        })
    }
}

fn wait_until(dash: &mut Dashboard, mut done: impl FnMut(&Dashboard) -> bool) -> Vec<Applied> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut applied = Vec::new();
    while !done(dash) {
        assert!(Instant::now() < deadline, "timed out");
        applied.extend(dash.poll_responses());
        thread::sleep(Duration::from_millis(5));
    }
    applied
}

#[test]
fn slow_old_page_response_is_discarded() {
    let api = Arc::new(LatencyApi::default());
    let settings = OrchestratorSettings {
        fetch_mode: DetailsFetchMode::PerPage,
        ..Default::default()
    };
    let mut dash = Dashboard::spawn(api.clone(), settings).unwrap();
    dash.start(Instant::now());
    wait_until(&mut dash, |d| d.orchestrator().rows().len() == 1);

    dash.set_page(2);
    // Wait until the slow page 2 call has actually started.
    while api.details_calls.load(Ordering::SeqCst) < 2 {
        thread::sleep(Duration::from_millis(2));
    }
    dash.set_page(1);

    let mut applied = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    while !applied.contains(&Applied::Stale(ResourceKind::Details)) {
        assert!(Instant::now() < deadline, "slow response never arrived");
        applied.extend(dash.poll_responses());
        thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(dash.orchestrator().page().page(), 1);
    assert_eq!(dash.orchestrator().rows()[0].reddit_ticker, "P1");
}

#[test]
fn double_refresh_fetches_summary_once() {
    let api = Arc::new(LatencyApi::default());
    let mut dash = Dashboard::spawn(api.clone(), OrchestratorSettings::default()).unwrap();
    dash.start(Instant::now());
    wait_until(&mut dash, |d| d.orchestrator().summary().data().is_some());

    let now = Instant::now();
    dash.refresh(now);
    dash.refresh(now);
    wait_until(&mut dash, |d| !d.orchestrator().summary().is_in_flight());

    assert_eq!(api.summary_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn drop_stops_polling_and_joins_worker() {
    let api = Arc::new(LatencyApi::default());
    let mut dash = Dashboard::spawn(api.clone(), OrchestratorSettings::default()).unwrap();
    dash.start(Instant::now());
    dash.stop();
    assert!(!dash.orchestrator().is_running());
    assert!(dash.orchestrator().next_poll().is_none());
    // Stopping twice is harmless; drop stops again.
    dash.stop();
    drop(dash);
}

#[test]
fn refresh_after_stop_fails_instead_of_sticking_in_flight() {
    let api = Arc::new(LatencyApi::default());
    let mut dash = Dashboard::spawn(api.clone(), OrchestratorSettings::default()).unwrap();
    dash.start(Instant::now());
    wait_until(&mut dash, |d| {
        !d.orchestrator().summary().is_in_flight() && !d.orchestrator().details().is_in_flight()
    });
    dash.stop();

    for _ in 0..2 {
        dash.refresh(Instant::now());
        let applied = dash.poll_responses();
        assert_eq!(applied.len(), 2);
        assert!(applied
            .iter()
            .all(|a| matches!(a, Applied::Failed(_, ApiError::Network { .. }))));
        assert!(!dash.orchestrator().summary().is_in_flight());
        assert!(!dash.orchestrator().details().is_in_flight());
    }
    assert_eq!(api.summary_calls.load(Ordering::SeqCst), 1);
}
