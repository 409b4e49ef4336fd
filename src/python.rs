//! PyO3 bindings, built with the `python` feature.

use crate::{
    bqp::Bqp,
    construct::random_solution,
    error::TabuError,
    observer::NoProgress,
    params::Params,
    restart::TabuSearch,
};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3::wrap_pyfunction;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

impl From<TabuError> for PyErr {
    fn from(err: TabuError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/*======================================================================
│  Python functions
└=====================================================================*/

/// Multi-start tabu search; returns `(solution, energy, restarts)`.
///
/// `init_solution=None` starts from a random assignment drawn from `seed`.
/// A negative `timeout` (milliseconds) disables the wall-clock limit.
#[pyfunction]
#[pyo3(
    name = "tabu_search",
    signature = (q, init_solution = None, tenure = 0, timeout = 20, num_restarts = 1_000_000, seed = 0, energy_threshold = f64::NEG_INFINITY),
    text_signature = "(q, init_solution=None, tenure=0, timeout=20, num_restarts=1000000, seed=0, energy_threshold=-inf)"
)]
#[allow(clippy::too_many_arguments)]
fn tabu_search_py(
    py: Python<'_>,
    q: Vec<Vec<f64>>,
    init_solution: Option<Vec<u8>>,
    tenure: usize,
    timeout: i64,
    num_restarts: usize,
    seed: u64,
    energy_threshold: f64,
) -> PyResult<(Vec<u8>, f64, u64)> {
    let bqp = Bqp::new(q)?;
    let params = Params {
        tenure,
        timeout: Params::timeout_from_millis(timeout),
        num_restarts,
        seed,
        energy_threshold,
        ..Params::default()
    };
    let initial = match init_solution {
        Some(values) => values,
        None => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            random_solution(bqp.n(), &mut rng)
                .iter()
                .by_vals()
                .map(u8::from)
                .collect()
        }
    };

    let result =
        py.allow_threads(|| TabuSearch::solve(&bqp, &initial, &params, &mut NoProgress))?;
    Ok((result.best_solution(), result.best_energy(), result.num_restarts()))
}

/// Energy xᵀQx of a 0/1 assignment.
#[pyfunction]
#[pyo3(name = "energy", text_signature = "(q, solution)")]
fn energy_py(q: Vec<Vec<f64>>, solution: Vec<u8>) -> PyResult<f64> {
    let bqp = Bqp::new(q)?;
    let bits = crate::construct::from_values(&solution, bqp.n())?;
    Ok(bqp.objective(&bits))
}

/*======================================================================
│  PyO3 module-init
└=====================================================================*/

/// ***Important***: name `_native` must match `pyproject.toml -> module-name`.
#[pymodule]
fn _native(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(tabu_search_py, m)?)?;
    m.add_function(wrap_pyfunction!(energy_py, m)?)?;
    Ok(())
}
