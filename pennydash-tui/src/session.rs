//! Dashboard session: owns the orchestrator and the fetch worker.
//!
//! `Dashboard` is the scoped owner of the polling resource: creating it
//! spawns the worker, `start` arms the poll timer, and `stop` (or drop)
//! disarms the timer and joins the worker.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use pennydash_core::api::PennyApi;
use pennydash_core::orchestrator::{Applied, FetchRequest, Orchestrator, OrchestratorSettings};

use crate::worker::{self, WorkerCommand, WorkerResponse};

pub struct Dashboard {
    orchestrator: Orchestrator,
    worker_tx: Sender<WorkerCommand>,
    worker_rx: Receiver<WorkerResponse>,
    worker: Option<JoinHandle<()>>,
    /// Failures for requests the worker never received.
    undelivered: Vec<Applied>,
}

impl Dashboard {
    /// Spawn the worker. Nothing is fetched until [`Dashboard::start`].
    pub fn spawn(api: Arc<dyn PennyApi>, settings: OrchestratorSettings) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = worker::spawn_worker(cmd_rx, resp_tx, api)?;
        Ok(Self {
            orchestrator: Orchestrator::new(settings),
            worker_tx: cmd_tx,
            worker_rx: resp_rx,
            worker: Some(handle),
            undelivered: Vec::new(),
        })
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Mount: initial fetches plus the poll timer.
    pub fn start(&mut self, now: Instant) {
        let requests = self.orchestrator.start(now);
        self.dispatch_all(requests);
    }

    /// Disarm the timer and shut the worker down. Idempotent.
    pub fn stop(&mut self) {
        self.orchestrator.stop();
        if let Some(handle) = self.worker.take() {
            let _ = self.worker_tx.send(WorkerCommand::Shutdown);
            if handle.join().is_err() {
                log::error!("fetch worker panicked");
            }
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(req) = self.orchestrator.tick(now) {
            self.dispatch(req);
        }
    }

    pub fn refresh(&mut self, now: Instant) {
        let requests = self.orchestrator.refresh(now);
        self.dispatch_all(requests);
    }

    pub fn set_page(&mut self, page: usize) {
        if let Some(req) = self.orchestrator.set_page(page) {
            self.dispatch(req);
        }
    }

    pub fn next_page(&mut self) {
        if let Some(req) = self.orchestrator.next_page() {
            self.dispatch(req);
        }
    }

    pub fn prev_page(&mut self) {
        if let Some(req) = self.orchestrator.prev_page() {
            self.dispatch(req);
        }
    }

    pub fn first_page(&mut self) {
        if let Some(req) = self.orchestrator.first_page() {
            self.dispatch(req);
        }
    }

    /// Drain worker responses (non-blocking) into the orchestrator.
    pub fn poll_responses(&mut self) -> Vec<Applied> {
        let mut applied = std::mem::take(&mut self.undelivered);
        while let Ok(WorkerResponse::Fetched(outcome)) = self.worker_rx.try_recv() {
            applied.push(self.orchestrator.apply(outcome));
        }
        applied
    }

    fn dispatch_all(&mut self, requests: Vec<FetchRequest>) {
        for req in requests {
            self.dispatch(req);
        }
    }

    fn dispatch(&mut self, req: FetchRequest) {
        log::debug!("dispatch {:?} {:?}", req.id, req.kind);
        if let Err(mpsc::SendError(WorkerCommand::Fetch(req))) =
            self.worker_tx.send(WorkerCommand::Fetch(req))
        {
            // Fail the request so it does not stay in flight forever.
            log::warn!("fetch worker is gone; failing request {:?}", req.id);
            let applied = self.orchestrator.apply(req.unsent("fetch worker is not running"));
            self.undelivered.push(applied);
        }
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.stop();
    }
}
