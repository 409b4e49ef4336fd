//! Exact minimisation by Gray-code enumeration.
//!
//! Consecutive Gray codes differ in one bit, so every one of the 2ⁿ
//! assignments costs a single delta evaluation. Only practical for small n;
//! the tabu search uses it as a reference in tests.

use crate::{
    bqp::Bqp,
    construct::zero_solution,
    error::{Result, TabuError},
    solution::Solution,
};

/// Largest problem accepted by [`exhaustive_search`].
pub const MAX_EXHAUSTIVE_VARS: usize = 30;

/// Global minimum of `bqp`. On ties the assignment enumerated last wins.
pub fn exhaustive_search(bqp: &Bqp) -> Result<Solution<'_>> {
    let n = bqp.n();
    if n > MAX_EXHAUSTIVE_VARS {
        return Err(TabuError::TooLarge { n, max: MAX_EXHAUSTIVE_VARS });
    }

    let mut best = Solution::new(bqp);
    let mut walk = zero_solution(n);
    let mut cost = 0.0;

    for num in 1u64..(1u64 << n) {
        // gray(num) ^ gray(num - 1) is the lowest set bit of num
        let bit = num.trailing_zeros() as usize;
        cost += bqp.change_in_objective(&walk, bit);
        let flipped = !walk[bit];
        walk.set(bit, flipped);

        if best.energy() >= cost {
            best.assign(&walk, cost);
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_known_optimum() {
        let bqp = Bqp::new(vec![
            vec![-1.0, 2.0, 1.0],
            vec![2.0, -3.0, -4.5],
            vec![1.0, -4.5, 3.25],
        ])
        .unwrap();
        let best = exhaustive_search(&bqp).unwrap();
        assert_eq!(best.to_vec(), vec![0, 1, 1]);
        assert_eq!(best.energy(), -8.75);
    }

    #[test]
    fn visits_every_assignment() {
        // diagonal-only problem: optimum sets exactly the negative biases
        let bqp = Bqp::new(vec![
            vec![-1.0, 0.0, 0.0, 0.0],
            vec![0.0, 2.0, 0.0, 0.0],
            vec![0.0, 0.0, -3.0, 0.0],
            vec![0.0, 0.0, 0.0, 4.0],
        ])
        .unwrap();
        let best = exhaustive_search(&bqp).unwrap();
        assert_eq!(best.to_vec(), vec![1, 0, 1, 0]);
        assert_eq!(best.energy(), -4.0);
    }

    #[test]
    fn refuses_large_problems() {
        let n = MAX_EXHAUSTIVE_VARS + 1;
        let bqp = Bqp::new(vec![vec![0.0; n]; n]).unwrap();
        assert_eq!(
            exhaustive_search(&bqp).err(),
            Some(TabuError::TooLarge { n, max: MAX_EXHAUSTIVE_VARS })
        );
    }

    #[test]
    fn empty_problem() {
        let bqp = Bqp::new(Vec::new()).unwrap();
        assert_eq!(exhaustive_search(&bqp).unwrap().energy(), 0.0);
    }
}
