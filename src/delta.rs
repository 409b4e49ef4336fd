//! Change-in-objective vector: entry k is the energy delta of flipping bit k
//! of the *current* solution.
//!
//! After bit k flips, entry k is negated and every other entry j moves by
//! ±Q(j,k): plus when x_j and the new x_k differ, minus otherwise.

use crate::bqp::Bqp;
use bitvec::slice::BitSlice;
use std::ops::Index;

#[derive(Clone, Debug, PartialEq)]
pub struct DeltaVector {
    values: Vec<f64>,
}

impl DeltaVector {
    /// Fresh deltas for `bits`. O(n²).
    pub fn new(bqp: &Bqp, bits: &BitSlice) -> Self {
        let mut d = Self { values: vec![0.0; bqp.n()] };
        d.recompute(bqp, bits);
        d
    }

    /// Recompute every entry in place, reusing the allocation.
    pub fn recompute(&mut self, bqp: &Bqp, bits: &BitSlice) {
        for (k, v) in self.values.iter_mut().enumerate() {
            *v = bqp.change_in_objective(bits, k);
        }
    }

    #[inline] pub fn len(&self) -> usize        { self.values.len() }
    #[inline] pub fn is_empty(&self) -> bool    { self.values.is_empty() }
    #[inline] pub fn as_slice(&self) -> &[f64]  { &self.values }

    /// Bit `k` has just flipped in `bits`; update with the full coupling
    /// `Q[k][j] + Q[j][k]` of every pair.
    pub fn flip_update(&mut self, bqp: &Bqp, bits: &BitSlice, k: usize) {
        self.values[k] = -self.values[k];
        let xk = bits[k];
        for (j, v) in self.values.iter_mut().enumerate() {
            if j == k {
                continue;
            }
            let change = bqp.coupling(k, j);
            *v += if bits[j] != xk { change } else { -change };
        }
    }

    /// Same as [`Self::flip_update`] but reads only the stored upper entry of
    /// each pair and skips zero couplings. Requires a reduced matrix.
    pub fn flip_update_upper(&mut self, bqp: &Bqp, bits: &BitSlice, k: usize) {
        let xk = bits[k];
        let n = self.values.len();
        for j in 0..k {
            let change = bqp.coeff(j, k);
            if change != 0.0 {
                self.values[j] += if bits[j] != xk { change } else { -change };
            }
        }
        for j in k + 1..n {
            let change = bqp.coeff(k, j);
            if change != 0.0 {
                self.values[j] += if bits[j] != xk { change } else { -change };
            }
        }
        self.values[k] = -self.values[k];
    }
}

impl Index<usize> for DeltaVector {
    type Output = f64;

    #[inline]
    fn index(&self, k: usize) -> &f64 {
        &self.values[k]
    }
}
