//! BQP – multi-start tabu search kernel (+ optional PyO3 bindings).
//!
//! Minimises xᵀQx over binary vectors x with single-bit-flip tabu search,
//! steepest-descent intensification and C-matrix diversification between
//! runs.

/*───────── internal modules ─────────*/
pub mod error;
pub mod params;
pub mod bqp;
pub mod solution;
pub mod state;
pub mod delta;
pub mod tabu;
pub mod local_search;
pub mod search;
pub mod diversify;
pub mod restart;
pub mod observer;
pub mod construct;
pub mod exhaustive;

#[cfg(feature = "python")]
mod python;

/*───────── re-exports for Rust users ─────────*/
pub use bqp::{Bqp, change_in_objective, objective, objective_incremental, to_upper_triangular};
pub use delta::DeltaVector;
pub use error::{Result, TabuError};
pub use exhaustive::exhaustive_search;
pub use local_search::{local_search, restricted_local_search};
pub use observer::{NoProgress, ProgressEvent, ProgressObserver, TracingObserver};
pub use params::Params;
pub use restart::{TabuSearch, multi_start_tabu_search};
pub use search::{RunLimits, tabu_search};
pub use solution::Solution;
pub use state::{SearchState, SearchStats};
