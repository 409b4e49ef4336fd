//! Progress callbacks.
//!
//! An observer is invoked synchronously after every globally improving tabu
//! move and after every restart. It gets a shared view of the problem state
//! and cannot steer the search.

use crate::state::SearchState;

/// Call site of a progress notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProgressEvent {
    /// A tabu move beat the best energy of the current run and the embedded
    /// local search has settled.
    Improvement,
    /// Restart number `index` (0-based) has finished its tabu run;
    /// `best_energy` is the best energy recorded by the driver so far.
    Restart { index: usize, best_energy: f64 },
}

pub trait ProgressObserver {
    fn on_progress(&mut self, event: ProgressEvent, state: &SearchState<'_>);
}

/// Closures work as observers directly.
impl<F> ProgressObserver for F
where
    F: FnMut(ProgressEvent, &SearchState<'_>),
{
    #[inline]
    fn on_progress(&mut self, event: ProgressEvent, state: &SearchState<'_>) {
        self(event, state)
    }
}

/// Observer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    #[inline]
    fn on_progress(&mut self, _event: ProgressEvent, _state: &SearchState<'_>) {}
}

/// Emits one `tracing` event per notification: improvements at `trace`,
/// restarts at `debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_progress(&mut self, event: ProgressEvent, state: &SearchState<'_>) {
        let stats = state.stats();
        match event {
            ProgressEvent::Improvement => tracing::trace!(
                energy = state.energy(),
                iterations = stats.iterations,
                "improvement"
            ),
            ProgressEvent::Restart { index, best_energy } => tracing::debug!(
                restart = index,
                energy = state.energy(),
                best_energy,
                iterations = stats.iterations,
                evaluations = stats.evaluations,
                "restart finished"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bqp::Bqp;
    use bitvec::prelude::*;

    struct Counter {
        improvements: usize,
        restarts:     Vec<usize>,
    }

    impl ProgressObserver for Counter {
        fn on_progress(&mut self, event: ProgressEvent, _state: &SearchState<'_>) {
            match event {
                ProgressEvent::Improvement => self.improvements += 1,
                ProgressEvent::Restart { index, .. } => self.restarts.push(index),
            }
        }
    }

    #[test]
    fn dispatches_by_event() {
        let bqp = Bqp::new(vec![vec![-1.0]]).unwrap();
        let state = SearchState::new(&bqp, bits![1]);

        let mut c = Counter { improvements: 0, restarts: Vec::new() };
        c.on_progress(ProgressEvent::Improvement, &state);
        c.on_progress(ProgressEvent::Restart { index: 0, best_energy: -1.0 }, &state);
        c.on_progress(ProgressEvent::Restart { index: 1, best_energy: -1.0 }, &state);
        assert_eq!(c.improvements, 1);
        assert_eq!(c.restarts, vec![0, 1]);

        // must not panic without a subscriber
        TracingObserver.on_progress(ProgressEvent::Restart { index: 0, best_energy: -1.0 }, &state);
        NoProgress.on_progress(ProgressEvent::Improvement, &state);
    }
}
