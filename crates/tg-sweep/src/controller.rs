//! Batch controller: owns the sweep lifecycle.
//!
//! The controller fills the dispatch queue from the configured grid, signals
//! the external driver to start consuming, collects reported results, and on
//! batch completion either rolls into the next batch or finishes the sweep.

use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use tg_types::{StopCondition, TrainingData};

use crate::dispatch::SessionDispatcher;
use crate::grid::{generate_batch, ParameterGrid, SweepPlan};
use crate::report::ResultReporter;

/// Unique sweep-run identifier.
pub type SweepId = Uuid;

/// Top-level configuration for a sweep run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub id: SweepId,
    pub name: String,

    /// The parameter grid enumerated each batch.
    pub grid: ParameterGrid,

    /// How many batches to run. Defaults to the three-batch demonstration
    /// plan.
    pub plan: SweepPlan,

    /// Stop conditions attached to every configuration in every batch.
    pub stop_conditions: Vec<StopCondition>,

    pub created_at: DateTime<Utc>,
}

impl SweepConfig {
    pub fn new(name: impl Into<String>, grid: ParameterGrid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            grid,
            plan: SweepPlan::default(),
            stop_conditions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_plan(mut self, plan: SweepPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn with_stop_conditions(mut self, conditions: Vec<StopCondition>) -> Self {
        self.stop_conditions = conditions;
        self
    }

    pub fn max_batches(&self) -> usize {
        self.plan.max_batches()
    }
}

/// Notification sent to the external driver once a batch's queue is fully
/// populated and dispatch may begin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStart {
    pub sweep_id: SweepId,
    pub batch_index: usize,
    /// Number of sessions queued for this batch.
    pub sessions: usize,
}

/// Lifecycle state of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepState {
    /// Filling the dispatch queue for the current batch.
    Generating,
    /// Queue populated; waiting for the driver to finish the batch.
    AwaitingBatch,
    /// All batches done. The controller is inert from here on.
    Done,
}

/// Drives the batch lifecycle for one sweep instance.
///
/// The external driver interacts through three calls, strictly serialized
/// from its side: [`SweepController::next_training_data`] to pull work,
/// [`SweepController::report_session_result`] per finished session, and
/// [`SweepController::report_batch_complete`] once every queued session has
/// been reported. Start notifications go out on the channel supplied at
/// construction time.
pub struct SweepController {
    config: SweepConfig,
    state: SweepState,
    batch_index: usize,
    dispatcher: SessionDispatcher,
    reporter: ResultReporter,
    /// Finished sessions of the current batch, kept only for the
    /// end-of-batch summary.
    completed: Vec<TrainingData>,
    start_tx: Sender<BatchStart>,
}

impl SweepController {
    pub fn new(config: SweepConfig, start_tx: Sender<BatchStart>) -> Self {
        Self {
            config,
            state: SweepState::Generating,
            batch_index: 0,
            dispatcher: SessionDispatcher::new(),
            reporter: ResultReporter::new(),
            completed: Vec::new(),
            start_tx,
        }
    }

    /// Generate batch 0 and signal the driver to begin. Called once at
    /// start-up by the driver runner.
    pub fn initialize(&mut self) {
        if self.state != SweepState::Generating {
            return;
        }
        self.begin_batch();
    }

    /// Pull the next session for the current batch. `None` once the batch
    /// queue is exhausted or the sweep is done.
    pub fn next_training_data(&mut self) -> Option<TrainingData> {
        if self.state != SweepState::AwaitingBatch {
            return None;
        }
        self.dispatcher.next()
    }

    /// Record one finished session. The session is logged and retained for
    /// the end-of-batch summary, then dropped when the batch closes.
    pub fn report_session_result(&mut self, data: TrainingData) {
        self.reporter.on_session_complete(&data);
        self.completed.push(data);
    }

    /// Close the current batch: log its summary, then either generate the
    /// next batch or finish the sweep. Calls after the sweep is done have no
    /// effect.
    pub fn report_batch_complete(&mut self) {
        if self.state == SweepState::Done {
            return;
        }
        self.reporter.on_batch_complete(self.batch_index, &self.completed);
        self.completed.clear();

        if self.batch_index + 1 < self.config.max_batches() {
            self.batch_index += 1;
            self.begin_batch();
        } else {
            self.state = SweepState::Done;
            self.reporter.on_sweep_complete();
        }
    }

    fn begin_batch(&mut self) {
        self.state = SweepState::Generating;
        info!(
            sweep = %self.config.name,
            batch = self.batch_index,
            "Creating training data for batch"
        );
        self.dispatcher.reset();
        self.dispatcher.extend(generate_batch(
            &self.config.grid,
            self.batch_index,
            &self.config.stop_conditions,
        ));

        let start = BatchStart {
            sweep_id: self.config.id,
            batch_index: self.batch_index,
            sessions: self.dispatcher.remaining(),
        };
        info!(batch = start.batch_index, sessions = start.sessions, "Starting batch");
        // Best-effort send; a dropped receiver only loses the notification.
        let _ = self.start_tx.try_send(start);
        self.state = SweepState::AwaitingBatch;
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    /// 0-based index of the batch currently being generated or awaited.
    pub fn batch_index(&self) -> usize {
        self.batch_index
    }

    /// Sessions dispatched so far in the current batch.
    pub fn sessions_dispatched(&self) -> usize {
        self.dispatcher.issued()
    }
}
