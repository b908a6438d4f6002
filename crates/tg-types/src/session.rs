//! Training session data: one hyperparameter configuration and its results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::condition::StopCondition;

/// One reporting interval's statistics, keyed by metric name.
pub type StatsSnapshot = HashMap<String, f64>;

/// The unit of work handed to the external training driver: a single
/// hyperparameter configuration plus its identity, stop conditions, and
/// accumulated per-interval results.
///
/// Created by the configuration generator, dispatched exactly once (which
/// stamps `uid` with its 0-based dispatch order), mutated in place by the
/// driver while the session runs, and finally handed back for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    /// Parameter name to value, keys unique.
    pub hyperparameters: HashMap<String, f64>,

    /// Human-readable label embedding the batch index and parameter values.
    /// Unique within a batch.
    pub description: String,

    /// Conditions under which the driver should end this session.
    pub stop_conditions: Vec<StopCondition>,

    /// 0-based dispatch order within the current batch. `None` until the
    /// session is dispatched; assigned exactly once.
    pub uid: Option<usize>,

    /// Set by the external driver on completion. Zero means success.
    pub exit_status: Option<i32>,

    /// Statistics snapshots, one per reporting interval. Append-only.
    pub result: Vec<StatsSnapshot>,

    pub created_at: DateTime<Utc>,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl TrainingData {
    pub fn new(
        hyperparameters: HashMap<String, f64>,
        description: impl Into<String>,
        stop_conditions: Vec<StopCondition>,
    ) -> Self {
        Self {
            hyperparameters,
            description: description.into(),
            stop_conditions,
            uid: None,
            exit_status: None,
            result: Vec::new(),
            created_at: Utc::now(),
            dispatched_at: None,
            finished_at: None,
        }
    }

    /// Stamp the dispatch identity. Called by the dispatcher, once.
    pub fn mark_dispatched(&mut self, uid: usize) {
        debug_assert!(self.uid.is_none(), "uid assigned twice");
        self.uid = Some(uid);
        self.dispatched_at = Some(Utc::now());
    }

    /// Append one interval's statistics.
    pub fn push_result(&mut self, stats: StatsSnapshot) {
        self.result.push(stats);
    }

    /// Finalize the session with the driver's exit status.
    pub fn finish(&mut self, exit_status: i32) {
        self.exit_status = Some(exit_status);
        self.finished_at = Some(Utc::now());
    }

    /// The most recently appended stats snapshot, if any.
    pub fn last_stats(&self) -> Option<&StatsSnapshot> {
        self.result.last()
    }

    pub fn succeeded(&self) -> bool {
        self.exit_status == Some(0)
    }
}
