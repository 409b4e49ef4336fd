//! Coefficient matrix of a binary quadratic program, min xᵀQx over x ∈ {0,1}ⁿ.
//!
//! The matrix is validated as square and symmetric on ingestion and then
//! folded into upper-triangular form, so every off-diagonal pair is stored
//! once in `q[i][j]`, i < j. The free functions of the objective engine sum
//! both halves of every pair, so they give the same answer on a folded and on
//! an unfolded symmetric matrix.

use crate::error::{Result, TabuError};
use bitvec::prelude::*;

/*───────────────────────── objective engine ─────────────────────────*/

/// Fold `q[j][i]` into `q[i][j]` for every i < j and zero the lower triangle.
///
/// Idempotent: a second pass only adds the zeros left behind by the first.
pub fn to_upper_triangular(q: &mut [Vec<f64>]) {
    let n = q.len();
    for i in 0..n {
        for j in i + 1..n {
            q[i][j] += q[j][i];
            q[j][i] = 0.0;
        }
    }
}

/// Change in objective if bit `flipped` of `solution` were flipped.
pub fn change_in_objective(q: &[Vec<f64>], solution: &BitSlice, flipped: usize) -> f64 {
    let row = &q[flipped];
    let mut change = row[flipped];
    for i in solution.iter_ones() {
        if i != flipped {
            change += row[i] + q[i][flipped];
        }
    }
    // turning the bit off removes what turning it on would add
    if solution[flipped] { -change } else { change }
}

/// Objective value of `solution`, built by turning on its set bits one at a
/// time from the all-zero vector. O(n²).
pub fn objective(q: &[Vec<f64>], solution: &BitSlice) -> f64 {
    let mut partial = bitvec![0; q.len()];
    let mut cost = 0.0;
    for i in solution.iter_ones().rev() {
        cost += change_in_objective(q, &partial, i);
        partial.set(i, true);
    }
    cost
}

/// Objective of `solution` given the known objective `old_cost` of `old`.
/// Only the bits that differ are visited.
pub fn objective_incremental(
    q: &[Vec<f64>],
    solution: &BitSlice,
    old: &BitSlice,
    old_cost: f64,
) -> f64 {
    let mut walk = old.to_bitvec();
    let mut cost = old_cost;
    for i in (0..q.len()).rev() {
        if solution[i] != walk[i] {
            cost += change_in_objective(q, &walk, i);
            walk.set(i, solution[i]);
        }
    }
    cost
}

/*───────────────────────── problem instance ─────────────────────────*/

/// Validated, upper-triangular BQP instance. Never mutated after
/// construction, so it can be shared read-only between searches.
#[derive(Clone, Debug, PartialEq)]
pub struct Bqp {
    q: Vec<Vec<f64>>,
}

impl Bqp {
    /// Validate a symmetric matrix and reduce it to upper-triangular form.
    pub fn new(mut q: Vec<Vec<f64>>) -> Result<Self> {
        Self::validate(&q)?;
        to_upper_triangular(&mut q);
        Ok(Self { q })
    }

    /// Square, finite and symmetric (`q[i][j] == q[j][i]` exactly).
    pub fn validate(q: &[Vec<f64>]) -> Result<()> {
        let n = q.len();
        for (row, r) in q.iter().enumerate() {
            if r.len() != n {
                return Err(TabuError::NotSquare { row, len: r.len(), n });
            }
        }
        for i in 0..n {
            for j in i..n {
                if !q[i][j].is_finite() {
                    return Err(TabuError::NonFinite { i, j });
                }
                if q[i][j] != q[j][i] {
                    return Err(TabuError::Asymmetric { i, j });
                }
            }
        }
        Ok(())
    }

    /*────────── getters ──────────*/

    /// Number of variables.
    #[inline] pub fn n(&self) -> usize { self.q.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.q.is_empty() }

    /// Stored coefficient; zero below the diagonal.
    #[inline] pub fn coeff(&self, i: usize, j: usize) -> f64 { self.q[i][j] }

    /// `q[i][j] + q[j][i]`, the full interaction of two variables.
    #[inline]
    pub fn coupling(&self, i: usize, j: usize) -> f64 {
        self.q[i][j] + self.q[j][i]
    }

    /// Row-major view of the reduced matrix.
    #[inline] pub fn matrix(&self) -> &[Vec<f64>] { &self.q }

    /// Largest |Q[i][j]|; 0 for an empty problem.
    pub fn max_abs_coeff(&self) -> f64 {
        self.q
            .iter()
            .flat_map(|row| row.iter())
            .fold(0.0_f64, |m, &v| m.max(v.abs()))
    }

    /*────────── objective ──────────*/

    #[inline]
    pub fn objective(&self, solution: &BitSlice) -> f64 {
        objective(&self.q, solution)
    }

    #[inline]
    pub fn change_in_objective(&self, solution: &BitSlice, flipped: usize) -> f64 {
        change_in_objective(&self.q, solution, flipped)
    }
}

/*────────────────── unit tests ──────────────────*/
