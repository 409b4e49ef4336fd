//! One tabu-search run over single-bit flips.
//!
//! Every pass scans the non-tabu variables in index order:
//! - the first candidate that beats the best energy of the run is taken at
//!   once and the scan stops;
//! - otherwise the cheapest candidate is taken, uniformly at random among
//!   exact ties, even when it makes the energy worse.
//!
//! A run-best move is followed by a [`steepest_descent`] from the new point.
//! The budget is counted in examined candidates, not in moves, and the
//! descent's scans are charged to it as well.

use crate::{
    bqp::Bqp,
    delta::DeltaVector,
    local_search::steepest_descent,
    observer::{ProgressEvent, ProgressObserver},
    state::SearchState,
    tabu::TabuList,
};
use bitvec::prelude::*;
use rand::Rng;
use std::time::Instant;

/// Stopping rules and tenure of a single run.
#[derive(Clone, Copy, Debug)]
pub struct RunLimits {
    pub tenure:           usize,
    /// Candidate evaluations allowed in this run.
    pub max_iterations:   u64,
    pub deadline:         Option<Instant>,
    pub energy_threshold: f64,
}

impl RunLimits {
    #[inline]
    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Move picked by one scan.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Move {
    /// Beats the run best; triggers the local search.
    Global { k: usize, cost: f64 },
    Local { k: usize, cost: f64 },
}

/// Scan the non-tabu candidates once. Returns the move and the number of
/// candidates examined.
fn scan<R>(
    delta: &DeltaVector,
    tabu: &TabuList,
    prev_cost: f64,
    best_energy: f64,
    ties: &mut Vec<usize>,
    rng: &mut R,
) -> (Option<Move>, u64)
where
    R: Rng + ?Sized,
{
    let mut examined = 0u64;
    let mut local_min = f64::MAX;
    ties.clear();

    for k in 0..delta.len() {
        if tabu.is_tabu(k) {
            continue;
        }
        examined += 1;
        let cost = prev_cost + delta[k];
        if cost < best_energy {
            return (Some(Move::Global { k, cost }), examined);
        }
        if cost < local_min {
            local_min = cost;
            ties.clear();
            ties.push(k);
        } else if cost == local_min {
            ties.push(k);
        }
    }

    let k = match ties.len() {
        0 => return (None, examined),
        1 => ties[0],
        t => ties[rng.gen_range(0..t)],
    };
    (Some(Move::Local { k, cost: local_min }), examined)
}

/// Run tabu search from the solution currently held by `state`.
///
/// On return `state` holds the best solution of this run and its energy.
pub fn tabu_search<R, O>(
    state: &mut SearchState<'_>,
    limits: &RunLimits,
    rng: &mut R,
    observer: &mut O,
) -> f64
where
    R: Rng + ?Sized,
    O: ProgressObserver + ?Sized,
{
    let bqp: &Bqp = state.bqp();
    let n = bqp.n();
    state.stats_mut().restarts += 1;
    if n == 0 {
        return state.energy();
    }

    let mut tabu = TabuList::new(n, limits.tenure);
    let mut working: BitVec = state.bits().to_bitvec();
    let mut delta = DeltaVector::new(bqp, &working);
    let mut ties: Vec<usize> = Vec::with_capacity(n);
    let mut prev_cost = state.energy();
    let mut iter = 0u64;

    while iter < limits.max_iterations
        && !limits.expired()
        && state.energy() > limits.energy_threshold
    {
        let (mv, examined) = scan(&delta, &tabu, prev_cost, state.energy(), &mut ties, rng);
        iter += examined;
        {
            let stats = state.stats_mut();
            stats.passes += 1;
            stats.evaluations += n as u64;
            stats.iterations += examined;
        }

        tabu.step();
        let Some(mv) = mv else {
            continue; // every variable is tabu
        };

        let (k, cost) = match mv {
            Move::Global { k, cost } | Move::Local { k, cost } => (k, cost),
        };
        let flipped = !working[k];
        working.set(k, flipped);
        prev_cost = cost;
        delta.flip_update_upper(bqp, &working, k);
        tabu.forbid(k);

        if let Move::Global { .. } = mv {
            let (sol, stats) = state.split_mut();
            sol.assign(&working, cost);
            let descended = steepest_descent(sol, &mut delta, stats);
            stats.iterations += descended;
            iter += descended;

            working.copy_from_bitslice(sol.bits());
            prev_cost = sol.energy();

            tracing::trace!(energy = prev_cost, iter, "tabu: new best of run");
            observer.on_progress(ProgressEvent::Improvement, state);
        }
    }

    state.energy()
}

/*────────────────── tests ──────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoProgress;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Pins the closure signature to the higher-ranked observer bound.
    fn observe<F>(f: F) -> F
    where
        F: FnMut(ProgressEvent, &SearchState<'_>),
    {
        f
    }

    fn limits(tenure: usize, max_iterations: u64) -> RunLimits {
        RunLimits {
            tenure,
            max_iterations,
            deadline: None,
            energy_threshold: f64::NEG_INFINITY,
        }
    }

    #[test]
    fn single_variable_converges_to_zero() {
        let bqp = Bqp::new(vec![vec![5.0]]).unwrap();
        for start in [bits![0], bits![1]] {
            let mut state = SearchState::new(&bqp, start);
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            let e = tabu_search(&mut state, &limits(0, 1_000), &mut rng, &mut NoProgress);
            assert_eq!(e, 0.0);
            assert!(!state.bits()[0]);
        }
    }

    #[test]
    fn budget_counts_examined_candidates() {
        let bqp = Bqp::new(vec![
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0],
        ])
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        // tenure 0: every pass examines all four variables
        let mut state = SearchState::new(&bqp, bits![0, 0, 0, 0]);
        tabu_search(&mut state, &limits(0, 40), &mut rng, &mut NoProgress);
        assert_eq!(state.stats().passes, 10);
        assert_eq!(state.stats().iterations, 40);
        assert_eq!(state.stats().evaluations, 40);
        assert_eq!(state.stats().restarts, 1);

        // tenure 1: the last flipped variable is skipped after the first pass
        let mut state = SearchState::new(&bqp, bits![0, 0, 0, 0]);
        tabu_search(&mut state, &limits(1, 40), &mut rng, &mut NoProgress);
        assert_eq!(state.stats().passes, 13);
        assert_eq!(state.stats().iterations, 40);

        // the start was optimal all along
        assert_eq!(state.energy(), 0.0);
        assert!(state.bits().not_any());
    }

    #[test]
    fn result_energy_matches_recomputation() {
        let q = vec![
            vec![-1.0, 2.0, 1.0],
            vec![2.0, -3.0, -4.5],
            vec![1.0, -4.5, 3.25],
        ];
        let bqp = Bqp::new(q).unwrap();
        let mut state = SearchState::new(&bqp, bits![0, 0, 1]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let e = tabu_search(&mut state, &limits(1, 5_000), &mut rng, &mut NoProgress);
        approx::assert_relative_eq!(e, state.solution().exact_energy());
        // optimum of this instance is x = (0, 1, 1)
        approx::assert_relative_eq!(e, -8.75);
    }

    #[test]
    fn first_global_improvement_wins() {
        // both flips beat the start; the larger gain sits at the higher index
        let bqp = Bqp::new(vec![vec![-1.0, 0.0], vec![0.0, -5.0]]).unwrap();
        let zero = bits![0, 0];
        let delta = DeltaVector::new(&bqp, zero);
        let tabu = TabuList::new(2, 0);
        let mut ties = Vec::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let (mv, examined) = scan(&delta, &tabu, 0.0, 0.0, &mut ties, &mut rng);
        assert_eq!(mv, Some(Move::Global { k: 0, cost: -1.0 }));
        assert_eq!(examined, 1);

        // the descent after the move still reaches the optimum
        let mut state = SearchState::new(&bqp, zero);
        tabu_search(&mut state, &limits(0, 1), &mut rng, &mut NoProgress);
        assert_eq!(state.bits(), bits![1, 1]);
        assert_eq!(state.energy(), -6.0);
    }

    #[test]
    fn all_tabu_passes_are_skipped() {
        // tenure 5 on a single variable: after each flip five passes find
        // no candidate, so they count as passes but not as iterations
        let bqp = Bqp::new(vec![vec![5.0]]).unwrap();
        let mut state = SearchState::new(&bqp, bits![0]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        tabu_search(&mut state, &limits(5, 3), &mut rng, &mut NoProgress);

        assert_eq!(state.stats().iterations, 3);
        assert_eq!(state.stats().passes, 13);
        assert_eq!(state.energy(), 0.0);
        assert!(!state.bits()[0]);
    }

    #[test]
    fn ties_are_broken_by_the_seed() {
        let n = 4;
        let bqp = Bqp::new(vec![vec![0.0; n]; n]).unwrap();
        let delta = DeltaVector::new(&bqp, &bitvec![0; n]);
        let tabu = TabuList::new(n, 0);
        let mut ties = Vec::new();

        let mut pick = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match scan(&delta, &tabu, 0.0, 0.0, &mut ties, &mut rng) {
                (Some(Move::Local { k, cost }), 4) => {
                    assert_eq!(cost, 0.0);
                    k
                }
                other => panic!("expected a local move over 4 ties, got {other:?}"),
            }
        };

        let picks: Vec<usize> = (0..32).map(&mut pick).collect();
        let again: Vec<usize> = (0..32).map(&mut pick).collect();
        assert_eq!(picks, again);
        assert!(picks.iter().any(|&k| k != picks[0]));
    }

    #[test]
    fn improvements_reach_the_observer() {
        let bqp = Bqp::new(vec![
            vec![-1.0, 2.0, 1.0],
            vec![2.0, -3.0, -4.5],
            vec![1.0, -4.5, 3.25],
        ])
        .unwrap();
        let mut state = SearchState::new(&bqp, bits![0, 0, 1]);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let mut improvements = 0;
        let mut last = f64::INFINITY;
        let mut obs = observe(|event, state: &SearchState<'_>| {
            assert_eq!(event, ProgressEvent::Improvement);
            approx::assert_relative_eq!(state.energy(), state.bqp().objective(state.bits()));
            assert!(state.energy() < last);
            last = state.energy();
            improvements += 1;
        });
        tabu_search(&mut state, &limits(1, 5_000), &mut rng, &mut obs);

        assert!(improvements >= 1);
        assert_eq!(last, -8.75);
        assert_eq!(state.energy(), -8.75);
    }

    #[test]
    fn threshold_already_met_skips_the_run() {
        let bqp = Bqp::new(vec![vec![-2.0]]).unwrap();
        let mut state = SearchState::new(&bqp, bits![1]);
        let mut l = limits(0, 1_000);
        l.energy_threshold = -1.0;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        tabu_search(&mut state, &l, &mut rng, &mut NoProgress);
        assert_eq!(state.stats().passes, 0);
        assert_eq!(state.energy(), -2.0);
    }

    #[test]
    fn expired_deadline_stops_before_first_pass() {
        let bqp = Bqp::new(vec![vec![1.0]]).unwrap();
        let mut state = SearchState::new(&bqp, bits![1]);
        let mut l = limits(0, 1_000);
        l.deadline = Some(Instant::now());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        tabu_search(&mut state, &l, &mut rng, &mut NoProgress);
        assert_eq!(state.stats().passes, 0);
        assert_eq!(state.energy(), 1.0);
    }

    #[test]
    fn empty_problem_is_a_no_op() {
        let bqp = Bqp::new(Vec::new()).unwrap();
        let mut state = SearchState::new(&bqp, BitSlice::empty());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(tabu_search(&mut state, &limits(0, 10), &mut rng, &mut NoProgress), 0.0);
        assert_eq!(state.stats().restarts, 1);
    }
}
