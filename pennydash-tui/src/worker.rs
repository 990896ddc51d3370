//! Background fetch worker: all network I/O runs off the UI thread.
//!
//! Communication with the UI thread is via `mpsc` channels. The worker
//! loop hands each request to a short-lived fetch thread, so responses
//! may come back in any order; the orchestrator's stale guard sorts that
//! out on the UI side.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use pennydash_core::api::PennyApi;
use pennydash_core::orchestrator::{FetchOutcome, FetchRequest};

/// Commands sent from the UI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Fetch(FetchRequest),
    Shutdown,
}

/// Responses sent from the worker back to the UI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    Fetched(FetchOutcome),
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    api: Arc<dyn PennyApi>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("pennydash-worker".into())
        .spawn(move || worker_loop(rx, tx, api))
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>, api: Arc<dyn PennyApi>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Fetch(request)) => dispatch(request, &tx, &api),
        }
    }
    log::debug!("worker loop exited");
}

fn dispatch(request: FetchRequest, tx: &Sender<WorkerResponse>, api: &Arc<dyn PennyApi>) {
    let name = format!("pennydash-fetch-{}", request.id.0);
    let thread_tx = tx.clone();
    let thread_api = Arc::clone(api);
    let fallback = request.clone();
    let spawned = thread::Builder::new().name(name).spawn(move || {
        let outcome = request.execute(thread_api.as_ref());
        // The UI may already be gone; nothing to do then.
        let _ = thread_tx.send(WorkerResponse::Fetched(outcome));
    });
    if let Err(e) = spawned {
        // Run inline so the request still completes and clears in-flight state.
        log::error!("failed to spawn fetch thread, fetching inline: {e}");
        let _ = tx.send(WorkerResponse::Fetched(fallback.execute(api.as_ref())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pennydash_core::api::ApiError;
    use pennydash_core::domain::{DetailsPage, StockCount, StockSummary};
    use pennydash_core::orchestrator::{FetchKind, RequestId};
    use std::sync::mpsc;
    use std::time::Duration;

    struct DownApi;

    impl PennyApi for DownApi {
        fn fetch_count(&self) -> Result<StockCount, ApiError> {
            Err(down())
        }
        fn fetch_summary(&self) -> Result<StockSummary, ApiError> {
            Err(down())
        }
        fn fetch_details(&self, _: Option<u32>, _: bool) -> Result<DetailsPage, ApiError> {
            Err(down())
        }
    }

    fn down() -> ApiError {
        ApiError::Network {
            endpoint: "/api/pennystocks/summary".into(),
            message: "connection refused".into(),
        }
    }

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();

        let handle = spawn_worker(cmd_rx, resp_tx, Arc::new(DownApi)).unwrap();
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn worker_exits_when_ui_drops_sender() {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle = spawn_worker(cmd_rx, resp_tx, Arc::new(DownApi)).unwrap();
        drop(cmd_tx);
        handle.join().unwrap();
    }

    #[test]
    fn failures_come_back_as_outcomes() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(cmd_rx, resp_tx, Arc::new(DownApi)).unwrap();

        cmd_tx
            .send(WorkerCommand::Fetch(FetchRequest {
                id: RequestId(7),
                kind: FetchKind::Summary,
            }))
            .unwrap();
        let WorkerResponse::Fetched(outcome) = resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.id, RequestId(7));
        assert!(outcome.result.is_err());

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
