//! Session bookkeeping and the persistence collaborator seams
//!
//! Counters accumulate in the sim state; this module owns the end-of-run
//! hand-off. The recorder latches finalization so exactly one summary per
//! session reaches the sink, and the personal best is written only when a
//! run actually beats it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::SessionStats;

/// Error returned by persistence collaborators
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("persistence sink unavailable: {0}")]
    Unavailable(String),
    #[error("persistence sink rejected the summary: {0}")]
    Rejected(String),
}

/// End-of-session summary handed to the persistence sink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub duration_seconds: f32,
    pub final_score: u64,
    pub collectibles_collected: u32,
    /// Unix timestamp (ms) when the session ended
    pub timestamp_ms: f64,
}

/// Accepts one summary per session, fire-and-forget
pub trait ScoreSink {
    fn submit(&mut self, summary: &SessionSummary) -> Result<(), PersistError>;
}

/// Single-integer personal-best surface
pub trait BestScoreStore {
    fn best(&mut self) -> Option<u64>;
    fn set_best(&mut self, score: u64) -> Result<(), PersistError>;
}

/// Builds the end-of-run summary, at most once per session
#[derive(Debug, Default)]
pub struct SessionRecorder {
    finalized: bool,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arm for a new session
    pub fn reset(&mut self) {
        self.finalized = false;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Latch the end of a session into a summary
    ///
    /// Later calls return None until `reset`, so a duplicate game-over signal
    /// cannot reach the sink twice.
    pub fn finalize(&mut self, stats: &SessionStats) -> Option<SessionSummary> {
        if self.finalized {
            return None;
        }
        self.finalized = true;
        Some(SessionSummary {
            duration_seconds: stats.elapsed_seconds,
            final_score: stats.score,
            collectibles_collected: stats.collectibles_collected,
            timestamp_ms: now_ms(),
        })
    }
}

/// Update the personal best if the run beat it; true means a new record
///
/// A failed write is logged and swallowed: the record still counts for the
/// caller, and the store can catch up next session.
pub fn update_best(store: &mut dyn BestScoreStore, score: u64) -> bool {
    let best = store.best().unwrap_or(0);
    if score <= best {
        return false;
    }
    match store.set_best(score) {
        Ok(()) => log::info!("New best score: {} (was {})", score, best),
        Err(e) => log::warn!("Best score not saved: {}", e),
    }
    true
}

/// In-memory sink for tests and the demo binary
#[derive(Debug, Default)]
pub struct MemoryScoreSink {
    pub submitted: Vec<SessionSummary>,
}

impl ScoreSink for MemoryScoreSink {
    fn submit(&mut self, summary: &SessionSummary) -> Result<(), PersistError> {
        self.submitted.push(*summary);
        Ok(())
    }
}

/// In-memory best-score store for tests and the demo binary
#[derive(Debug, Default)]
pub struct MemoryBestScore {
    best: Option<u64>,
}

impl BestScoreStore for MemoryBestScore {
    fn best(&mut self) -> Option<u64> {
        self.best
    }

    fn set_best(&mut self, score: u64) -> Result<(), PersistError> {
        self.best = Some(score);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

/// Hosts without a system clock stamp summaries themselves
#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    0.0
}
