//! Session and batch result reporting.
//!
//! Purely observational: formats summaries and emits them as `tracing`
//! events. No sweep state is read or mutated here.

use tracing::{info, warn};

use tg_types::TrainingData;

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultReporter;

impl ResultReporter {
    pub fn new() -> Self {
        Self
    }

    /// Log a finished session: identity, exit status, and the most recent
    /// stats snapshot if the session reported any.
    pub fn on_session_complete(&self, data: &TrainingData) {
        info!(
            uid = ?data.uid,
            exit = ?data.exit_status,
            descr = %data.description,
            "Training session finished"
        );
        if let Some(stats) = data.last_stats() {
            // Sorted keys keep the summary stable across runs.
            let mut keys: Vec<&String> = stats.keys().collect();
            keys.sort();
            let mut summary = String::from("Last stats summary:");
            for key in keys {
                summary.push_str(&format!("\n\t{key}: \t{}", stats[key]));
            }
            info!("{summary}");
        }
    }

    /// Log completion of a whole batch.
    pub fn on_batch_complete(&self, batch_index: usize, sessions: &[TrainingData]) {
        let failed = sessions.iter().filter(|s| !s.succeeded()).count();
        info!(
            batch = batch_index,
            sessions = sessions.len(),
            failed,
            "Batch completed"
        );
        if failed > 0 {
            warn!(batch = batch_index, failed, "Batch finished with failed sessions");
        }
    }

    /// Log final completion of the sweep.
    pub fn on_sweep_complete(&self) {
        info!("All training sessions completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tg_types::StatsSnapshot;

    fn finished_session(snapshots: &[(&str, f64)]) -> TrainingData {
        let mut data = TrainingData::new(HashMap::new(), "#0_x_1", Vec::new());
        data.mark_dispatched(0);
        for (key, value) in snapshots {
            let mut stats = StatsSnapshot::new();
            stats.insert(key.to_string(), *value);
            data.push_result(stats);
        }
        data.finish(0);
        data
    }

    #[test]
    fn result_log_is_never_reordered_or_truncated() {
        let data = finished_session(&[("reward", 1.0), ("reward", 2.0), ("reward", 3.0)]);
        assert_eq!(data.result.len(), 3);
        assert_eq!(data.last_stats(), data.result.last());
        assert_eq!(data.last_stats().unwrap()["reward"], 3.0);
    }

    #[test]
    fn reporting_does_not_mutate_the_session() {
        let reporter = ResultReporter::new();
        let data = finished_session(&[("episode_length", 41.0)]);
        let before = data.clone();
        reporter.on_session_complete(&data);
        reporter.on_batch_complete(0, std::slice::from_ref(&data));
        reporter.on_sweep_complete();
        assert_eq!(data, before);
    }

    #[test]
    fn sessions_without_results_still_report() {
        let reporter = ResultReporter::new();
        let mut data = TrainingData::new(HashMap::new(), "#0_x_1", Vec::new());
        data.mark_dispatched(0);
        data.finish(1);
        assert!(data.last_stats().is_none());
        // Must not panic on an empty result log.
        reporter.on_session_complete(&data);
    }
}
