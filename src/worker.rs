//! Background search worker.
//!
//! A worker owns a copy of the criteria and a local attempt counter, runs
//! a tight generate-and-test loop on its own thread and talks to the
//! coordinator only through [`WorkerMessage`]s. After `restart_quota`
//! attempts it asks to be replaced and exits, which bounds whatever the
//! key generator accumulates per thread.

use crate::address::{KeyGenerator, KeyPair};
use crate::criteria::SearchCriteria;
use crate::error::KeygenError;
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Identifies one worker instance; replacements get a fresh id
pub type WorkerId = u64;

/// Events a worker reports to its coordinator
#[derive(Debug)]
pub enum WorkerEvent {
    /// A keypair satisfied the criteria, the search goes on
    Match(KeyPair),
    /// Attempts made since the previous progress event
    Progress(u64),
    /// Restart quota reached, the worker has stopped and wants a replacement
    Restart,
    /// The key generator failed, the worker has stopped
    Failed(KeygenError),
}

#[derive(Debug)]
pub struct WorkerMessage {
    pub worker: WorkerId,
    pub event: WorkerEvent,
}

/// Attempt counts that drive progress reporting and self-recycling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerQuotas {
    pub progress: u64,
    pub restart: u64,
}

/// Handle to a running worker thread
pub struct SearchWorker {
    id: WorkerId,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SearchWorker {
    /// Spawn a worker thread bound to `criteria`
    pub fn spawn(
        id: WorkerId,
        criteria: SearchCriteria,
        generator: Arc<dyn KeyGenerator>,
        quotas: WorkerQuotas,
        events: Sender<WorkerMessage>,
    ) -> std::io::Result<Self> {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = cancel.clone();

        let handle = thread::Builder::new()
            .name(format!("vanity-worker-{}", id))
            .spawn(move || {
                let outbox = Outbox { id, events, cancel: flag };
                search_loop(&criteria, generator.as_ref(), quotas, &outbox);
            })?;

        Ok(Self {
            id,
            cancel,
            handle: Some(handle),
        })
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Hard stop: raise the cancellation flag and detach from the thread
    /// without waiting. Whatever keypair is in flight is dropped unreported.
    pub fn cancel(mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.handle.take();
    }

    /// Wait for a worker that has already left its loop (after `Restart`
    /// or `Failed`), so its replacement never overlaps with it.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!(target: "worker", "Worker {} panicked", self.id);
            }
        }
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// Sending side of a worker, silenced once cancelled
struct Outbox {
    id: WorkerId,
    events: Sender<WorkerMessage>,
    cancel: Arc<AtomicBool>,
}

impl Outbox {
    #[inline]
    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Deliver an event; false means the worker must stop
    fn emit(&self, event: WorkerEvent) -> bool {
        if self.cancelled() {
            return false;
        }
        self.events
            .send(WorkerMessage { worker: self.id, event })
            .is_ok()
    }
}

fn search_loop(
    criteria: &SearchCriteria,
    generator: &dyn KeyGenerator,
    quotas: WorkerQuotas,
    outbox: &Outbox,
) {
    log::debug!(target: "worker", "Worker {} searching for {}", outbox.id, criteria.pattern_description());

    let mut count = 0u64;
    let mut unreported = 0u64;

    loop {
        if outbox.cancelled() {
            return;
        }

        let pair = match generator.generate_keypair() {
            Ok(pair) => pair,
            Err(err) => {
                log::debug!(target: "worker", "Worker {} generator failed: {}", outbox.id, err);
                outbox.emit(WorkerEvent::Failed(err));
                return;
            }
        };
        count += 1;
        unreported += 1;

        if criteria.matches(pair.address()) && !outbox.emit(WorkerEvent::Match(pair)) {
            return;
        }

        if unreported == quotas.progress {
            if !outbox.emit(WorkerEvent::Progress(unreported)) {
                return;
            }
            unreported = 0;
        }

        if count >= quotas.restart {
            // Flush the tail so the session total has no gap at the boundary
            if unreported > 0 && !outbox.emit(WorkerEvent::Progress(unreported)) {
                return;
            }
            log::debug!(target: "worker", "Worker {} reached {} attempts, restarting", outbox.id, count);
            outbox.emit(WorkerEvent::Restart);
            return;
        }
    }
}
