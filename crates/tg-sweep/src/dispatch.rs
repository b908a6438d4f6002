//! Pull-based session dispatch for a single external consumer.

use std::collections::VecDeque;

use tg_types::TrainingData;

/// Hands generated training data to the external driver one session at a
/// time, stamping each item's `uid` with its 0-based dispatch order.
///
/// The protocol is strictly pull-based and single-consumer: the driver calls
/// [`SessionDispatcher::next`] whenever it is ready for a new session, and
/// serializes those calls itself. The surrounding system is sequential, so
/// no locking happens here.
#[derive(Debug, Default)]
pub struct SessionDispatcher {
    pending: VecDeque<TrainingData>,
    issued: usize,
}

impl SessionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append generated items in order.
    pub fn extend(&mut self, items: Vec<TrainingData>) {
        self.pending.extend(items);
    }

    /// The next undispatched session, with `uid` assigned, or `None` once
    /// the queue is exhausted. Exhaustion is normal control flow, not an
    /// error, and repeated calls keep returning `None`.
    pub fn next(&mut self) -> Option<TrainingData> {
        let mut data = self.pending.pop_front()?;
        data.mark_dispatched(self.issued);
        self.issued += 1;
        Some(data)
    }

    /// Number of sessions handed out so far — equals the next uid.
    pub fn issued(&self) -> usize {
        self.issued
    }

    /// Sessions still awaiting dispatch.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Drop any undispatched work and zero the counter for a new batch.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.issued = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{generate_batch, ParameterGrid};

    fn dispatcher_with(n: usize) -> SessionDispatcher {
        let grid = ParameterGrid::new().axis("x", (0..n).map(|i| i as f64).collect());
        let mut d = SessionDispatcher::new();
        d.extend(generate_batch(&grid, 0, &[]));
        d
    }

    #[test]
    fn uids_follow_dispatch_order() {
        let mut d = dispatcher_with(5);
        for expected in 0..5 {
            let data = d.next().unwrap();
            assert_eq!(data.uid, Some(expected));
        }
        assert_eq!(d.issued(), 5);
    }

    #[test]
    fn exhaustion_is_idempotent() {
        let mut d = dispatcher_with(2);
        assert!(d.next().is_some());
        assert!(d.next().is_some());
        assert!(d.next().is_none());
        assert!(d.next().is_none());
        assert_eq!(d.issued(), 2);
    }

    #[test]
    fn empty_queue_yields_nothing() {
        let mut d = SessionDispatcher::new();
        assert!(d.next().is_none());
        assert_eq!(d.issued(), 0);
    }

    #[test]
    fn reset_clears_queue_and_counter() {
        let mut d = dispatcher_with(3);
        d.next();
        d.reset();
        assert_eq!(d.issued(), 0);
        assert_eq!(d.remaining(), 0);
        assert!(d.next().is_none());

        // A fresh batch restarts uids at zero.
        let grid = ParameterGrid::new().axis("x", vec![7.0]);
        d.extend(generate_batch(&grid, 1, &[]));
        assert_eq!(d.next().unwrap().uid, Some(0));
    }

    #[test]
    fn items_come_out_in_generation_order() {
        let mut d = dispatcher_with(4);
        let mut values = Vec::new();
        while let Some(data) = d.next() {
            values.push(data.hyperparameters["x"]);
        }
        assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0]);
    }
}
