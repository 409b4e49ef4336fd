//! Intensification: steepest multi-flip descent to a 1-flip local minimum.
//!
//! Each pass scans all variables in index order and flips *every* variable
//! whose delta is negative at the moment it is examined (first improvement
//! within the pass). Passes repeat until one of them flips nothing, at which
//! point no single flip can lower the energy any further.

use crate::{
    bqp::Bqp,
    delta::DeltaVector,
    solution::Solution,
    state::SearchStats,
};
use bitvec::slice::BitSlice;

/// Descend from `solution` using the valid delta vector `delta`.
///
/// Mutates both in place and returns the number of variables examined,
/// which the caller charges to its iteration budget.
pub fn steepest_descent(
    solution: &mut Solution<'_>,
    delta: &mut DeltaVector,
    stats: &mut SearchStats,
) -> u64 {
    descend(solution, delta, None, stats)
}

/// Like [`steepest_descent`] but variables set in `restricted` never flip.
pub fn restricted_steepest_descent(
    solution: &mut Solution<'_>,
    delta: &mut DeltaVector,
    restricted: &BitSlice,
    stats: &mut SearchStats,
) -> u64 {
    assert_eq!(restricted.len(), solution.len());
    descend(solution, delta, Some(restricted), stats)
}

fn descend(
    solution: &mut Solution<'_>,
    delta: &mut DeltaVector,
    restricted: Option<&BitSlice>,
    stats: &mut SearchStats,
) -> u64 {
    let n = solution.len();
    let mut examined = 0u64;
    loop {
        let mut improved = false;
        for i in 0..n {
            examined += 1;
            stats.evaluations += 1;
            if restricted.is_some_and(|r| r[i]) {
                continue;
            }
            let d = delta[i];
            if d < 0.0 {
                improved = true;
                solution.apply_flip(i, d);
                delta.flip_update(solution.bqp(), solution.bits(), i);
            }
        }
        if !improved {
            return examined;
        }
    }
}

/// Run a full descent from `starting`, computing the deltas from scratch.
///
/// # Panics
///
/// If `starting.len() != bqp.n()`.
pub fn local_search<'q>(bqp: &'q Bqp, starting: &BitSlice) -> Solution<'q> {
    let mut sol = Solution::from_bits(bqp, starting);
    let mut delta = DeltaVector::new(bqp, starting);
    steepest_descent(&mut sol, &mut delta, &mut SearchStats::default());
    sol
}

/// [`local_search`] that keeps the variables in `restricted` fixed.
///
/// # Panics
///
/// If `starting` or `restricted` is not of length `bqp.n()`.
pub fn restricted_local_search<'q>(
    bqp: &'q Bqp,
    starting: &BitSlice,
    restricted: &BitSlice,
) -> Solution<'q> {
    let mut sol = Solution::from_bits(bqp, starting);
    let mut delta = DeltaVector::new(bqp, starting);
    restricted_steepest_descent(&mut sol, &mut delta, restricted, &mut SearchStats::default());
    sol
}

/*────────────────── tests ──────────────────*/
