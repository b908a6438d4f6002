//! The classic batch demo: one 3x3 grid (beta x gamma) swept three times,
//! with a synthetic in-process driver standing in for the external trainer.
//!
//! Run with: `cargo run -p tg-sweep --example grid_demo`

use tg_sweep::{ParameterGrid, SweepConfig, SweepController, SweepPlan, SweepState};
use tg_types::{StatsSnapshot, StopCondition, TuneResult};
use tracing_subscriber::EnvFilter;

fn main() -> TuneResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let grid = ParameterGrid::new()
        .axis("beta", vec![1e-4, 1e-3, 1e-2])
        .axis("gamma", vec![0.8, 0.9, 0.995]);
    grid.validate()?;

    let config = SweepConfig::new("grid_demo", grid)
        .with_plan(SweepPlan::BatchedGrid { batches: 3 })
        .with_stop_conditions(vec![StopCondition::parse("episode_length", "> 40")?]);

    let (start_tx, start_rx) = crossbeam_channel::unbounded();
    let mut controller = SweepController::new(config, start_tx);
    controller.initialize();

    // Synthetic driver: consume start events, run each queued session for a
    // few fake reporting intervals, then report the batch as complete.
    while let Ok(start) = start_rx.try_recv() {
        tracing::info!(batch = start.batch_index, sessions = start.sessions, "Driver picked up batch");

        while let Some(mut data) = controller.next_training_data() {
            let uid = data.uid.unwrap_or_default();
            for interval in 1..=3 {
                let mut stats = StatsSnapshot::new();
                stats.insert("episode_length".to_string(), 20.0 * interval as f64 + uid as f64);
                stats.insert("reward".to_string(), data.hyperparameters["gamma"] * interval as f64);
                data.push_result(stats);
                let stopped = data
                    .stop_conditions
                    .iter()
                    .any(|c| data.last_stats().map(|s| c.is_met(s)).unwrap_or(false));
                if stopped {
                    break;
                }
            }
            data.finish(0);
            controller.report_session_result(data);
        }
        controller.report_batch_complete();
    }

    assert_eq!(controller.state(), SweepState::Done);
    Ok(())
}
