//! Session lifecycle, aggregation and worker supervision.
//!
//! The coordinator lives on the controlling thread. It spawns workers, pumps
//! their events through [`SearchCoordinator::poll`] and is the only place
//! where session totals and matches are mutated.

use crate::address::{Ed25519Generator, KeyGenerator, KeyPair};
use crate::config::SearchConfig;
use crate::criteria::SearchCriteria;
use crate::error::{Result, SearchError};
use crate::stats::ProgressStats;
use crate::worker::{SearchWorker, WorkerEvent, WorkerId, WorkerMessage, WorkerQuotas};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use num_bigint::BigUint;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Stopped,
    Running,
}

/// What a call to `poll` applied
#[derive(Debug, Clone, Default)]
pub struct PollSummary {
    /// Keypairs found during this poll, oldest first. Handed out in full even
    /// when the match capacity evicts some of them from
    /// [`SearchCoordinator::matches`].
    pub matches: Vec<KeyPair>,
    /// Attempts added to the session total
    pub attempts: u64,
    pub restarts: usize,
}

impl PollSummary {
    /// Nothing was applied
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.attempts == 0 && self.restarts == 0
    }
}

/// Channel and worker slots of a running session
struct ActiveSession {
    criteria: SearchCriteria,
    events_tx: Sender<WorkerMessage>,
    events_rx: Receiver<WorkerMessage>,
    workers: Vec<SearchWorker>,
}

pub struct SearchCoordinator {
    config: SearchConfig,
    generator: Arc<dyn KeyGenerator>,
    status: SessionStatus,
    session: Option<ActiveSession>,
    last_criteria: Option<SearchCriteria>,
    matches: VecDeque<KeyPair>,
    stats: ProgressStats,
    rate_baseline: Instant,
    restarts: u64,
    next_worker_id: WorkerId,
}

impl SearchCoordinator {
    /// Coordinator using the default Sui Ed25519 key generator
    pub fn new(config: SearchConfig) -> Result<Self> {
        Self::with_generator(config, Arc::new(Ed25519Generator))
    }

    pub fn with_generator(config: SearchConfig, generator: Arc<dyn KeyGenerator>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            generator,
            status: SessionStatus::Stopped,
            session: None,
            last_criteria: None,
            matches: VecDeque::new(),
            stats: ProgressStats::new(),
            rate_baseline: Instant::now(),
            restarts: 0,
            next_worker_id: 0,
        })
    }

    /// Validate raw prefix/suffix and start a search for them
    pub fn start_search(&mut self, prefix: &str, suffix: &str) -> Result<bool> {
        let criteria = SearchCriteria::new(prefix, suffix)?;
        self.start(criteria)
    }

    /// Start a session. Returns `Ok(false)` without touching anything when a
    /// session is already running.
    pub fn start(&mut self, criteria: SearchCriteria) -> Result<bool> {
        if self.status == SessionStatus::Running {
            log::warn!(target: "coordinator", "Search already running");
            return Ok(false);
        }

        log::debug!(
            target: "coordinator",
            "Starting {} worker(s) for {}",
            self.config.workers,
            criteria.pattern_description()
        );

        let (events_tx, events_rx) = unbounded();
        let mut session = ActiveSession {
            criteria,
            events_tx,
            events_rx,
            workers: Vec::with_capacity(self.config.workers),
        };

        for _ in 0..self.config.workers {
            match self.spawn_worker(&session) {
                Ok(worker) => session.workers.push(worker),
                Err(err) => {
                    for worker in session.workers.drain(..) {
                        worker.cancel();
                    }
                    return Err(err);
                }
            }
        }

        self.last_criteria = Some(session.criteria.clone());
        self.session = Some(session);
        self.status = SessionStatus::Running;
        self.rate_baseline = Instant::now();
        Ok(true)
    }

    /// Stop the session immediately. Returns `false` when already stopped.
    ///
    /// Workers are cancelled, not drained, and the session channel is dropped
    /// so nothing they still produce is ever observed.
    pub fn stop(&mut self) -> bool {
        if self.status == SessionStatus::Stopped {
            log::warn!(target: "coordinator", "Search already stopped");
            return false;
        }

        log::debug!(target: "coordinator", "Stopping search");
        if let Some(session) = self.session.take() {
            for worker in session.workers {
                worker.cancel();
            }
        }
        self.status = SessionStatus::Stopped;
        true
    }

    /// Apply every event that is already waiting, without blocking
    pub fn poll(&mut self) -> Result<PollSummary> {
        let mut summary = PollSummary::default();
        loop {
            let msg = match self.session.as_ref().map(|s| s.events_rx.try_recv()) {
                Some(Ok(msg)) => msg,
                _ => return Ok(summary),
            };
            self.handle_message(msg, &mut summary)?;
        }
    }

    /// Wait up to `timeout` for the first event, then apply everything
    /// waiting. Returns immediately when stopped.
    pub fn poll_timeout(&mut self, timeout: Duration) -> Result<PollSummary> {
        let first = match &self.session {
            Some(session) => session.events_rx.recv_timeout(timeout),
            None => return Ok(PollSummary::default()),
        };

        match first {
            Ok(msg) => {
                let mut summary = PollSummary::default();
                self.handle_message(msg, &mut summary)?;
                let rest = self.poll()?;
                summary.matches.extend(rest.matches);
                summary.attempts += rest.attempts;
                summary.restarts += rest.restarts;
                Ok(summary)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                Ok(PollSummary::default())
            }
        }
    }

    fn handle_message(&mut self, msg: WorkerMessage, summary: &mut PollSummary) -> Result<()> {
        let Some(slot) = self.slot_of(msg.worker) else {
            // Leftover from a worker that was already replaced
            return Ok(());
        };

        match msg.event {
            WorkerEvent::Match(pair) => {
                summary.matches.push(pair.clone());
                self.on_match(pair);
            }
            WorkerEvent::Progress(delta) => {
                self.on_progress(delta);
                summary.attempts += delta;
            }
            WorkerEvent::Restart => {
                self.on_restart_request(slot)?;
                summary.restarts += 1;
            }
            WorkerEvent::Failed(err) => {
                log::error!(target: "coordinator", "Worker {} failed: {}", msg.worker, err);
                self.stop();
                return Err(SearchError::Generation(err));
            }
        }
        Ok(())
    }

    fn on_match(&mut self, pair: KeyPair) {
        log::info!(target: "coordinator", "Match found: {}", pair.address());
        self.matches.push_front(pair);
        if let Some(cap) = self.config.max_matches {
            if self.matches.len() > cap {
                log::debug!(target: "coordinator", "Match capacity {} reached, dropping oldest", cap);
                self.matches.truncate(cap);
            }
        }
    }

    fn on_progress(&mut self, delta: u64) {
        let now = Instant::now();
        self.stats.record(delta, now.duration_since(self.rate_baseline));
        self.rate_baseline = now;
    }

    /// Replace the worker in `slot`. Status and counters are untouched.
    fn on_restart_request(&mut self, slot: usize) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        let id = self.next_worker_id;
        self.next_worker_id += 1;
        let quotas = WorkerQuotas {
            progress: self.config.progress_quota,
            restart: self.config.restart_quota,
        };

        let finished = session.workers.remove(slot);
        log::debug!(target: "coordinator", "Restarting worker {} as {}", finished.id(), id);
        finished.join();

        let replacement = SearchWorker::spawn(
            id,
            session.criteria.clone(),
            self.generator.clone(),
            quotas,
            session.events_tx.clone(),
        );

        match replacement {
            Ok(worker) => {
                session.workers.insert(slot, worker);
                self.restarts += 1;
                Ok(())
            }
            Err(err) => {
                log::error!(target: "coordinator", "Could not respawn worker: {}", err);
                self.stop();
                Err(SearchError::Spawn(err))
            }
        }
    }

    fn spawn_worker(&mut self, session: &ActiveSession) -> Result<SearchWorker> {
        let id = self.next_worker_id;
        self.next_worker_id += 1;

        let quotas = WorkerQuotas {
            progress: self.config.progress_quota,
            restart: self.config.restart_quota,
        };
        let worker = SearchWorker::spawn(
            id,
            session.criteria.clone(),
            self.generator.clone(),
            quotas,
            session.events_tx.clone(),
        )?;
        Ok(worker)
    }

    fn slot_of(&self, id: WorkerId) -> Option<usize> {
        self.session
            .as_ref()?
            .workers
            .iter()
            .position(|w| w.id() == id)
    }

    /// Forget all matches and statistics. Only allowed while stopped.
    pub fn clear_results(&mut self) -> bool {
        if self.status == SessionStatus::Running {
            log::warn!(target: "coordinator", "Cannot clear results while running");
            return false;
        }
        self.matches.clear();
        self.stats = ProgressStats::new();
        self.restarts = 0;
        true
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    /// Matches found so far, most recent first
    pub fn matches(&self) -> &VecDeque<KeyPair> {
        &self.matches
    }

    pub fn stats(&self) -> ProgressStats {
        self.stats
    }

    /// Number of quota restarts performed
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Criteria of the current or most recent session
    pub fn criteria(&self) -> Option<&SearchCriteria> {
        self.last_criteria.as_ref()
    }

    /// Search space of the current criteria, see [`SearchCriteria::combinations`]
    pub fn combinations(&self) -> Option<BigUint> {
        self.last_criteria.as_ref().map(SearchCriteria::combinations)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        if self.status == SessionStatus::Running {
            self.stop();
        }
    }
}
