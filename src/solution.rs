//! Candidate solution: a binary vector x with its cached energy xᵀQx.
//!
//! • O(1) access to the energy.
//! • O(n) per single flip (one delta evaluation).
//! • Works together with [`Bqp`] and [`DeltaVector`](crate::delta::DeltaVector).

use crate::bqp::Bqp;
use bitvec::prelude::*;

/// Binary assignment bound to a single [`Bqp`].
#[derive(Clone, Debug)]
pub struct Solution<'q> {
    bqp:    &'q Bqp,
    bits:   BitVec,
    energy: f64,
}

/*───────────────────────── impl ─────────────────────────*/

impl<'q> Solution<'q> {
    /* constructors */

    /// All-zero solution, energy 0.
    pub fn new(bqp: &'q Bqp) -> Self {
        Self { bqp, bits: bitvec![0; bqp.n()], energy: 0.0 }
    }

    /// Build from a bitset; computes the energy from scratch.
    ///
    /// # Panics
    ///
    /// If `bits.len() != bqp.n()`. Use [`crate::construct::from_values`] to
    /// validate caller input first.
    pub fn from_bits(bqp: &'q Bqp, bits: &BitSlice) -> Self {
        assert_eq!(bits.len(), bqp.n());
        let energy = bqp.objective(bits);
        Self { bqp, bits: bits.to_bitvec(), energy }
    }

    /* queries */

    #[inline] pub fn len(&self) -> usize        { self.bits.len() }
    #[inline] pub fn is_empty(&self) -> bool    { self.bits.is_empty() }
    #[inline] pub fn energy(&self) -> f64       { self.energy }
    #[inline] pub fn bits(&self) -> &BitSlice   { &self.bits }
    #[inline] pub fn bqp(&self) -> &'q Bqp      { self.bqp }

    /// Assignment as 0/1 bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bits.iter().by_vals().map(u8::from).collect()
    }

    /// Energy recomputed from scratch, ignoring the cache.
    pub fn exact_energy(&self) -> f64 {
        self.bqp.objective(&self.bits)
    }

    /* mutators */

    /// Flip bit *v* using an already known `delta`.
    #[inline]
    pub(crate) fn apply_flip(&mut self, v: usize, delta: f64) {
        let old = self.bits[v];
        self.bits.set(v, !old);
        self.energy += delta;
    }

    /// Overwrite bits and energy without recomputation.
    pub(crate) fn assign(&mut self, bits: &BitSlice, energy: f64) {
        self.bits.copy_from_bitslice(bits);
        self.energy = energy;
    }

    /// Overwrite from another solution of the same problem.
    pub(crate) fn assign_from(&mut self, other: &Solution<'_>) {
        self.assign(&other.bits, other.energy);
    }

    /// Direct access to the bits; the caller must [`Self::refresh`] afterwards.
    pub(crate) fn bits_mut(&mut self) -> &mut BitSlice {
        &mut self.bits
    }

    /// Recompute the cached energy from scratch.
    pub fn refresh(&mut self) -> f64 {
        self.energy = self.exact_energy();
        self.energy
    }
}

/*───────────────────────── tests ─────────────────────────*/
