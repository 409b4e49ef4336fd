//! Diversification between tabu runs (Palubeckis-style multi-start).
//!
//! 1. Build the interaction matrix C from the current solution.
//! 2. Sample a subset of "free" variables without replacement, weighted by
//!    the diagonal estimates of C.
//! 3. Assign the free variables by steepest ascent over C.
//! 4. Flip every free variable the ascent set to 1.
//!
//! All buffers are sized once in [`Diversifier::new`] and reused across
//! restarts.

use crate::bqp::Bqp;
use bitvec::prelude::*;
use rand::Rng;

#[derive(Clone, Debug)]
pub struct Diversifier {
    c:        Vec<Vec<f64>>,
    /// Running diagonal estimate per unselected variable.
    d:        Vec<f64>,
    e:        Vec<f64>,
    prob:     Vec<f64>,
    picked:   BitVec,
    /// Free variables in selection order.
    selected: Vec<usize>,
    h1:       Vec<f64>,
    h2:       Vec<f64>,
    visited:  BitVec,
    ascent:   BitVec,
}

impl Diversifier {
    pub fn new(n: usize) -> Self {
        Self {
            c:        vec![vec![0.0; n]; n],
            d:        vec![0.0; n],
            e:        vec![0.0; n],
            prob:     vec![0.0; n],
            picked:   bitvec![0; n],
            selected: Vec::with_capacity(n),
            h1:       vec![0.0; n],
            h2:       vec![0.0; n],
            visited:  bitvec![0; n],
            ascent:   bitvec![0; n],
        }
    }

    /*────────── views ──────────*/

    #[inline] pub fn c(&self) -> &[Vec<f64>]     { &self.c }
    #[inline] pub fn selected(&self) -> &[usize] { &self.selected }
    /// Partial assignment of the last ascent; zero outside the selection.
    #[inline] pub fn ascent(&self) -> &BitSlice  { &self.ascent }

    /*────────── step 1: C matrix ──────────*/

    /// `C[i][j] = ∓Q[i][j]` (minus when x_i == x_j), symmetric; the diagonal
    /// is `-Q[i][i] - Σ_{j>i, x_j=1} Q[i][j]`, negated again when x_i = 1.
    pub fn compute_c(&mut self, bqp: &Bqp, solution: &BitSlice) {
        let n = bqp.n();
        let c = &mut self.c;
        for i in 0..n {
            let xi = solution[i];
            let mut diag = -bqp.coeff(i, i);
            for j in i + 1..n {
                let qij = bqp.coeff(i, j);
                if solution[j] {
                    diag -= qij;
                }
                let cij = if xi == solution[j] { -qij } else { qij };
                c[i][j] = cij;
                c[j][i] = cij;
            }
            c[i][i] = if xi { -diag } else { diag };
        }
    }

    /*────────── step 2: weighted selection ──────────*/

    /// Draw `count` distinct variables. Each draw weights the unselected
    /// variables by their current estimate `d` scaled between the minimum and
    /// maximum estimate, then folds the interaction with the drawn variable
    /// into every remaining estimate.
    pub fn select_variables<R>(&mut self, count: usize, lambda: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let Self { c, d, e, prob, picked, selected, .. } = self;
        let n = c.len();
        let count = count.min(n);

        for (i, di) in d.iter_mut().enumerate() {
            *di = c[i][i];
        }
        picked.fill(false);
        selected.clear();

        for _ in 0..count {
            let mut dmin = f64::MAX;
            let mut dmax = -f64::MAX;
            for i in picked.iter_zeros() {
                dmax = dmax.max(d[i]);
                dmin = dmin.min(d[i]);
            }

            for i in picked.iter_zeros() {
                e[i] = if dmin == dmax {
                    1.0
                } else if d[i] <= 0.0 && dmin < 0.0 {
                    1.0 - d[i] / dmin
                } else if d[i] == dmin && dmin == 0.0 {
                    0.0
                } else {
                    1.0 + lambda * (d[i] / dmax)
                };
            }

            let mut sum = 0.0;
            for i in picked.iter_zeros() {
                sum += e[i];
                prob[i] = sum;
            }
            if sum == 0.0 {
                // degenerate weights: uniform over the unselected variables
                for (rank, i) in picked.iter_zeros().enumerate() {
                    prob[i] = (rank + 1) as f64;
                    sum = prob[i];
                }
            }

            let u: f64 = rng.gen_range(0.0..1.0);
            let mut chosen = None;
            let mut last = 0;
            for i in picked.iter_zeros() {
                last = i;
                if u <= prob[i] / sum {
                    chosen = Some(i);
                    break;
                }
            }
            // rounding can leave the last cumulative share just below 1
            let chosen = chosen.unwrap_or(last);

            selected.push(chosen);
            picked.set(chosen, true);
            for i in picked.iter_zeros() {
                d[i] += c[i][chosen];
            }
        }
    }

    /*────────── step 3: steepest ascent ──────────*/

    /// Assign the selected variables one at a time. Each step takes the
    /// unvisited variable with the largest `(|2·h1 + h2|, |h1|)` pair, in
    /// lexicographic order, earliest in selection order on exact ties.
    /// Variables outside the selection stay 0.
    pub fn steepest_ascent(&mut self) {
        let Self { c, selected, h1, h2, visited, ascent, .. } = self;
        ascent.fill(false);
        visited.fill(false);

        for &i in selected.iter() {
            h1[i] = c[i][i];
            h2[i] = selected.iter().filter(|&&j| j != i).map(|&j| c[i][j]).sum();
        }

        for _ in 0..selected.len() {
            let mut v1 = -f64::MAX;
            let mut v2 = -f64::MAX;
            let mut best: Option<(usize, bool)> = None;

            for &i in selected.iter() {
                if visited[i] {
                    continue;
                }
                let mut q1 = 2.0 * h1[i] + h2[i];
                let mut q2 = h1[i];
                let one = q1 > 0.0 || (q1 == 0.0 && q2 >= 0.0);
                if !one {
                    q1 = -q1;
                    q2 = -q2;
                }
                if q1 > v1 || (q1 == v1 && q2 > v2) {
                    v1 = q1;
                    v2 = q2;
                    best = Some((i, one));
                }
            }

            // only non-finite scores leave nothing to pick
            let Some((j, one)) = best else { break };
            ascent.set(j, one);
            visited.set(j, true);

            for &i in selected.iter() {
                if visited[i] {
                    continue;
                }
                h2[i] -= c[i][j];
                if one {
                    h1[i] += c[i][j];
                }
            }
        }
    }

    /*────────── all steps ──────────*/

    /// Perturb `solution` in place. The caller recomputes its energy.
    pub fn perturb<R>(
        &mut self,
        bqp: &Bqp,
        solution: &mut BitSlice,
        count: usize,
        lambda: f64,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        self.compute_c(bqp, solution);
        self.select_variables(count, lambda, rng);
        self.steepest_ascent();
        for &i in &self.selected {
            if self.ascent[i] {
                let flipped = !solution[i];
                solution.set(i, flipped);
            }
        }
    }
}

/*────────────────── tests ──────────────────*/
