//! # tg-sweep
//!
//! Sweep generation and session dispatch orchestration for TuneGrid.
//!
//! Provides parameter-grid enumeration, a pull-based session dispatcher for
//! a single external training driver, per-session and per-batch result
//! reporting, and the batch controller that sequences one grid sweep after
//! another until the configured batch count is reached.

mod controller;
mod dispatch;
mod grid;
mod report;

pub use controller::{BatchStart, SweepConfig, SweepController, SweepState};
pub use dispatch::SessionDispatcher;
pub use grid::{generate_batch, GridAxis, ParameterGrid, SweepPlan};
pub use report::ResultReporter;
