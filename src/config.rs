use crate::error::{Result, SearchError};

/// Attempts between two progress events of a worker.
pub const DEFAULT_PROGRESS_QUOTA: u64 = 100;

/// Attempts after which a worker asks to be replaced.
pub const DEFAULT_RESTART_QUOTA: u64 = 5000;

/// Tuning knobs for a search session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Concurrent workers per session
    pub workers: usize,
    pub progress_quota: u64,
    pub restart_quota: u64,
    /// Keep only the newest N matches (None = unbounded)
    pub max_matches: Option<usize>,
}

impl SearchConfig {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    pub fn with_quotas(mut self, progress_quota: u64, restart_quota: u64) -> Self {
        self.progress_quota = progress_quota;
        self.restart_quota = restart_quota;
        self
    }

    pub fn with_max_matches(mut self, max_matches: Option<usize>) -> Self {
        self.max_matches = max_matches;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(SearchError::Config("at least one worker is required".to_string()));
        }
        if self.progress_quota == 0 {
            return Err(SearchError::Config("progress quota must be positive".to_string()));
        }
        if self.restart_quota < self.progress_quota {
            return Err(SearchError::Config(format!(
                "restart quota ({}) must not be smaller than the progress quota ({})",
                self.restart_quota, self.progress_quota
            )));
        }
        if self.max_matches == Some(0) {
            return Err(SearchError::Config("match capacity must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            progress_quota: DEFAULT_PROGRESS_QUOTA,
            restart_quota: DEFAULT_RESTART_QUOTA,
            max_matches: None,
        }
    }
}
