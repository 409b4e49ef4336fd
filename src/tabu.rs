//! Tabu list as per-variable countdowns.
//!
//! A flipped variable is forbidden for `tenure` iterations. Every iteration
//! decrements all nonzero counters by one, whether or not a flip happened.

#[derive(Clone, Debug)]
pub struct TabuList {
    remaining: Vec<usize>,
    tenure:    usize,
}

impl TabuList {
    /*────────── constructor ──────────*/

    pub fn new(n: usize, tenure: usize) -> Self {
        Self { remaining: vec![0; n], tenure }
    }

    /*────────── queries ──────────*/

    #[inline] pub fn is_tabu(&self, v: usize) -> bool {
        self.remaining[v] != 0
    }

    /*────────── iteration control ──────────*/

    /// One iteration has passed.
    pub fn step(&mut self) {
        for r in self.remaining.iter_mut().filter(|r| **r > 0) {
            *r -= 1;
        }
    }

    /// *v* was just flipped.
    #[inline] pub fn forbid(&mut self, v: usize) {
        self.remaining[v] = self.tenure;
    }
}

/*──────────── unit tests ────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tabu_logic() {
        let mut t = TabuList::new(3, 2);

        assert!(!t.is_tabu(1));
        t.forbid(1);
        assert!(t.is_tabu(1));
        assert!(!t.is_tabu(0) && !t.is_tabu(2));

        t.step();
        assert!(t.is_tabu(1)); // one iteration left
        t.step();
        assert!(!t.is_tabu(1)); // expired

        t.step(); // floored at zero
        assert!(!t.is_tabu(1));
        t.forbid(1);
        assert!(t.is_tabu(1));
    }

    #[test]
    fn zero_tenure_never_forbids() {
        let mut t = TabuList::new(2, 0);
        t.forbid(0);
        assert!(!t.is_tabu(0));
    }
}
