//! Sui vanity address generator
//!
//! This library searches for Ed25519 keypairs whose Sui address starts
//! and/or ends with chosen hex digits. A coordinator on the calling thread
//! supervises background workers that recycle themselves after a fixed
//! number of attempts.

pub mod address;
pub mod config;
pub mod coordinator;
pub mod criteria;
pub mod difficulty;
pub mod error;
pub mod stats;
pub mod worker;

pub use address::{public_key_to_sui_address, Ed25519Generator, KeyGenerator, KeyPair};
pub use config::{SearchConfig, DEFAULT_PROGRESS_QUOTA, DEFAULT_RESTART_QUOTA};
pub use coordinator::{PollSummary, SearchCoordinator, SessionStatus};
pub use criteria::SearchCriteria;
pub use difficulty::{combinations, estimate_time, format_difficulty, format_duration};
pub use error::{CriteriaError, KeygenError, Result, SearchError};
pub use stats::{format_number, format_running_time, format_speed, ProgressStats};
pub use worker::{SearchWorker, WorkerEvent, WorkerId, WorkerMessage, WorkerQuotas};
