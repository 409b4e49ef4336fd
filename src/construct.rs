//! Constructors for a starting assignment.
//!
//! • `zero_solution`
//! • `random_solution`
//! • `from_values` – validate caller-supplied 0/1 values
//!
//! All functions return a plain [`BitVec`] of length n.

use crate::error::{Result, TabuError};
use bitvec::prelude::*;
use rand::Rng;

/*───────────────────────────────────────────────────────────*/
/*  Zero / random                                            */
/*───────────────────────────────────────────────────────────*/

pub fn zero_solution(n: usize) -> BitVec {
    bitvec![0; n]
}

/// Every bit independently 1 with probability ½.
pub fn random_solution<R>(n: usize, rng: &mut R) -> BitVec
where
    R: Rng + ?Sized,
{
    (0..n).map(|_| rng.gen_bool(0.5)).collect()
}

/*───────────────────────────────────────────────────────────*/
/*  Caller-supplied                                          */
/*───────────────────────────────────────────────────────────*/

/// Check length and that every entry is 0 or 1.
pub fn from_values<T>(values: &[T], n: usize) -> Result<BitVec>
where
    T: Copy + Into<i64>,
{
    if values.len() != n {
        return Err(TabuError::SolutionLength { expected: n, found: values.len() });
    }
    values
        .iter()
        .enumerate()
        .map(|(index, &v)| {
            let value: i64 = v.into();
            match value {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(TabuError::NonBinary { index, value }),
            }
        })
        .collect()
}

/*──────────────────────── tests ───────────────────────────*/
