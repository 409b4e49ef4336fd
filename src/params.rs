// src/params.rs
//! Parameter bundle for the multi-start tabu search.
//!
//! We fix:
//! - `min_iterations` = 500 000 (floor of the per-run candidate budget)
//! - `alpha`          = 0.4     (fraction of variables freed per restart)
//! - `lambda`         = 5000    (sharpness of the selection weights)
//!
//! The horizon coefficients Z1/Z2 depend on the problem size and are only
//! overridden when `z1_coeff` / `z2_coeff` are set.

use crate::error::{Result, TabuError};
use std::time::Duration;

/// Problems up to this size use the small horizon coefficients.
const SMALL_PROBLEM: usize = 500;

/// All tunable controls for one search.
#[derive(Clone, Debug)]
pub struct Params {
    /// Iterations a flipped variable stays tabu. 0 selects
    /// `min(20, floor(n/4))`.
    pub tenure:           usize,

    /// Wall-clock budget for the whole search; `None` disables it.
    pub timeout:          Option<Duration>,

    /// Maximum number of diversification restarts after the first run.
    pub num_restarts:     usize,

    /// Seed of the search-owned generator.
    pub seed:             u64,

    /// Stop as soon as the energy reaches or falls below this value.
    pub energy_threshold: f64,

    /// Each run examines at least this many candidates.
    pub min_iterations:   u64,

    /// Horizon coefficient of the first run (Z1).
    pub z1_coeff:         Option<u64>,

    /// Horizon coefficient of every restart run (Z2).
    pub z2_coeff:         Option<u64>,

    /// Fraction of variables selected for steepest ascent.
    pub alpha:            f64,

    /// Scaling of the selection weights.
    pub lambda:           f64,

    /// Lower bound on the number of selected variables.
    pub min_selection:    usize,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            tenure:           0,
            timeout:          Some(Duration::from_millis(20)),
            num_restarts:     1_000_000,
            seed:             0,
            energy_threshold: f64::NEG_INFINITY,
            min_iterations:   500_000,
            z1_coeff:         None,
            z2_coeff:         None,
            alpha:            0.4,
            lambda:           5000.0,
            min_selection:    10,
        }
    }
}

impl Params {
    /// Negative values mean "no time limit".
    pub fn timeout_from_millis(millis: i64) -> Option<Duration> {
        u64::try_from(millis).ok().map(Duration::from_millis)
    }

    /// Default tenure for `n` variables.
    #[inline]
    pub fn default_tenure(n: usize) -> usize {
        20.min(n / 4)
    }

    /// Tenure actually used on a problem of size `n`.
    #[inline]
    pub fn resolved_tenure(&self, n: usize) -> usize {
        if self.tenure > 0 { self.tenure } else { Self::default_tenure(n) }
    }

    /// (Z1, Z2) for a problem of size `n`.
    pub fn z_coeffs(&self, n: usize) -> (u64, u64) {
        let (z1, z2) = if n <= SMALL_PROBLEM { (10_000, 2_500) } else { (25_000, 10_000) };
        (self.z1_coeff.unwrap_or(z1), self.z2_coeff.unwrap_or(z2))
    }

    /// Candidate budget of one run: `max(min_iterations, z · n)`.
    #[inline]
    pub fn max_iterations(&self, z_coeff: u64, n: usize) -> u64 {
        self.min_iterations.max(z_coeff.saturating_mul(n as u64))
    }

    /// Number of variables freed per restart, `clamp(max(10, alpha·n), ≤ n)`.
    pub fn num_selection(&self, n: usize) -> usize {
        let scaled = (self.alpha * n as f64) as usize;
        self.min_selection.max(scaled).min(n)
    }

    /// Check the parameters against a problem of size `n`: the tenure range,
    /// and `alpha`/`lambda` finite and non-negative.
    pub fn validate(&self, n: usize) -> Result<()> {
        let max = n.saturating_sub(1);
        if self.tenure > max {
            return Err(TabuError::TenureOutOfRange { tenure: self.tenure, max });
        }
        for (name, value) in [("alpha", self.alpha), ("lambda", self.lambda)] {
            if !value.is_finite() || value < 0.0 {
                return Err(TabuError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}
