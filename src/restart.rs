// src/restart.rs
//! Multi-start tabu search (Palubeckis MST2).
//! Implements:
//!  1) A long first run (horizon Z1) from the caller's starting point.
//!  2) Restarts: C matrix, weighted variable selection, steepest ascent,
//!     perturbation of the last run's result.
//!  3) A shorter tabu run (horizon Z2) after every perturbation.
//!  4) Global stopping rules: restart count, wall clock, energy threshold.

use crate::{
    bqp::Bqp,
    construct::from_values,
    diversify::Diversifier,
    error::Result,
    observer::{NoProgress, ProgressEvent, ProgressObserver},
    params::Params,
    search::{RunLimits, tabu_search},
    state::{SearchState, SearchStats},
};
use bitvec::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// Best solution of a finished search.
#[derive(Clone, Debug)]
pub struct TabuSearch {
    solution: BitVec,
    energy:   f64,
    stats:    SearchStats,
}

impl TabuSearch {
    /// Validate `q`, `initial` and `params`, then search.
    pub fn new(q: Vec<Vec<f64>>, initial: &[u8], params: &Params) -> Result<Self> {
        Self::with_observer(q, initial, params, &mut NoProgress)
    }

    pub fn with_observer<O>(
        q: Vec<Vec<f64>>,
        initial: &[u8],
        params: &Params,
        observer: &mut O,
    ) -> Result<Self>
    where
        O: ProgressObserver + ?Sized,
    {
        let bqp = Bqp::new(q)?;
        Self::solve(&bqp, initial, params, observer)
    }

    /// Search an already validated problem; `bqp` can be shared between
    /// concurrent searches.
    pub fn solve<O>(bqp: &Bqp, initial: &[u8], params: &Params, observer: &mut O) -> Result<Self>
    where
        O: ProgressObserver + ?Sized,
    {
        params.validate(bqp.n())?;
        let start = from_values(initial, bqp.n())?;
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        Ok(multi_start_tabu_search(bqp, &start, params, &mut rng, observer))
    }

    #[inline] pub fn best_energy(&self) -> f64        { self.energy }
    #[inline] pub fn best_bits(&self) -> &BitSlice    { &self.solution }
    #[inline] pub fn stats(&self) -> &SearchStats     { &self.stats }

    /// Tabu runs performed, the first run included.
    #[inline] pub fn num_restarts(&self) -> u64       { self.stats.restarts }

    /// Best assignment as 0/1 bytes.
    pub fn best_solution(&self) -> Vec<u8> {
        self.solution.iter().by_vals().map(u8::from).collect()
    }
}

/// Run the full multi-start search from `initial` with a caller-owned
/// generator. Parameters are assumed valid; [`TabuSearch::solve`] checks
/// them and the starting point.
///
/// # Panics
///
/// If `initial.len() != bqp.n()`.
#[tracing::instrument(level = "debug", name = "Multi-start Tabu Search", skip_all, fields(n = bqp.n()))]
pub fn multi_start_tabu_search<R, O>(
    bqp: &Bqp,
    initial: &BitSlice,
    params: &Params,
    rng: &mut R,
    observer: &mut O,
) -> TabuSearch
where
    R: Rng + ?Sized,
    O: ProgressObserver + ?Sized,
{
    let started = Instant::now();
    let deadline = params.timeout.map(|t| started + t);
    let n = bqp.n();
    let (z1, z2) = params.z_coeffs(n);
    let tenure = params.resolved_tenure(n);
    let limits = |z: u64| RunLimits {
        tenure,
        max_iterations: params.max_iterations(z, n),
        deadline,
        energy_threshold: params.energy_threshold,
    };
    tracing::debug!(tenure, z1, z2, max_coeff = bqp.max_abs_coeff(), "starting");

    // 1) first, long run
    let mut state = SearchState::new(bqp, initial);
    tabu_search(&mut state, &limits(z1), rng, observer);
    let mut best = state.solution().clone();

    // 2) restarts
    if n > 0 {
        let count = params.num_selection(n);
        let mut diversifier = Diversifier::new(n);

        for restart in 0..params.num_restarts {
            if deadline.is_some_and(|d| Instant::now() >= d)
                || best.energy() <= params.energy_threshold
            {
                break;
            }

            let current = state.solution_mut();
            diversifier.perturb(bqp, current.bits_mut(), count, params.lambda, rng);
            current.refresh();

            tabu_search(&mut state, &limits(z2), rng, observer);

            if best.energy() > state.energy() {
                best.assign_from(state.solution());
            }
            tracing::debug!(
                restart,
                energy = state.energy(),
                best_energy = best.energy(),
                "restart finished"
            );
            observer.on_progress(
                ProgressEvent::Restart { index: restart, best_energy: best.energy() },
                &state,
            );
        }
    }

    let stats = *state.stats();
    tracing::info!(
        energy = best.energy(),
        restarts = stats.restarts,
        iterations = stats.iterations,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "tabu search finished"
    );

    TabuSearch {
        solution: best.bits().to_bitvec(),
        energy:   best.energy(),
        stats,
    }
}

/*────────────────── tests ──────────────────*/
