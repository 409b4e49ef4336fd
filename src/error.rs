//! Invalid-configuration errors.
//!
//! Everything here is raised before a search starts. Once a search is
//! running it always terminates with *some* valid solution.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TabuError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TabuError {
    /// Row `row` has `len` entries instead of `n`.
    #[error("Q must be a square matrix: row {row} has {len} entries, expected {n}")]
    NotSquare { row: usize, len: usize, n: usize },

    #[error("Q must be symmetric: Q[{i}][{j}] != Q[{j}][{i}]")]
    Asymmetric { i: usize, j: usize },

    #[error("Q[{i}][{j}] is not a finite number")]
    NonFinite { i: usize, j: usize },

    #[error("length of the initial solution ({found}) doesn't match the size of Q ({expected})")]
    SolutionLength { expected: usize, found: usize },

    #[error("initial solution entry {index} is {value}, expected 0 or 1")]
    NonBinary { index: usize, value: i64 },

    #[error("tenure {tenure} must be in the range [0, {max}]")]
    TenureOutOfRange { tenure: usize, max: usize },

    /// A diversification constant is negative or not finite.
    #[error("{name} must be a finite, non-negative number, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Exhaustive enumeration refused for a problem this large.
    #[error("{n} variables is too many for exhaustive search (max {max})")]
    TooLarge { n: usize, max: usize },
}
