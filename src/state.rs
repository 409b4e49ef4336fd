//! Problem state shared by every search phase: the current best-of-run
//! solution and the run counters.
//!
//! A phase receives `&mut SearchState` for the duration of its call and
//! keeps nothing afterwards. Observers only ever see `&SearchState`.

use crate::{bqp::Bqp, solution::Solution};
use bitvec::slice::BitSlice;

/// Monotonic run counters, only reset at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidate evaluations charged to the iteration budget, including the
    /// scans of embedded local searches.
    pub iterations:  u64,
    /// Outer passes of the tabu loop.
    pub passes:      u64,
    /// Delta look-ups (n per tabu pass, one per local-search check).
    pub evaluations: u64,
    /// Tabu-search runs started, the first run included.
    pub restarts:    u64,
}

#[derive(Clone, Debug)]
pub struct SearchState<'q> {
    current: Solution<'q>,
    stats:   SearchStats,
}

impl<'q> SearchState<'q> {
    /// # Panics
    ///
    /// If `initial.len() != bqp.n()`.
    pub fn new(bqp: &'q Bqp, initial: &BitSlice) -> Self {
        Self {
            current: Solution::from_bits(bqp, initial),
            stats:   SearchStats::default(),
        }
    }

    #[inline] pub fn bqp(&self) -> &'q Bqp             { self.current.bqp() }
    #[inline] pub fn solution(&self) -> &Solution<'q>  { &self.current }
    #[inline] pub fn bits(&self) -> &BitSlice          { self.current.bits() }
    #[inline] pub fn energy(&self) -> f64              { self.current.energy() }
    #[inline] pub fn stats(&self) -> &SearchStats      { &self.stats }

    #[inline]
    pub(crate) fn solution_mut(&mut self) -> &mut Solution<'q> {
        &mut self.current
    }

    #[inline]
    pub(crate) fn stats_mut(&mut self) -> &mut SearchStats {
        &mut self.stats
    }

    /// Both halves at once, for phases that mutate the solution and count.
    #[inline]
    pub(crate) fn split_mut(&mut self) -> (&mut Solution<'q>, &mut SearchStats) {
        (&mut self.current, &mut self.stats)
    }
}
