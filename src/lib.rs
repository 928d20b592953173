//! rust_ddm — drift-diffusion decision models with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes simulation, likelihood, and validation routines to Python via the
//! `_rust_ddm` extension module when the `python-bindings` feature is
//! enabled.
//!
//! Key behaviors
//! -------------
//! - Re-export the core modules as the public crate surface:
//!   - `ddm`: trial data, parameters, options, and the DDM / aDDM models.
//!   - `likelihood`: the parallel likelihood engine and likelihood tables.
//!   - `inference`: the grid posterior.
//!   - `estimation`: validation and fitting drivers.
//!   - `optimization`: the bounded Nelder–Mead minimizer.
//!   - `telemetry`: opt-in `tracing` subscriber.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_rust_ddm` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion, and error mapping.
//! - Errors from core Rust code are converted to `ValueError` at the PyO3
//!   boundary.
//!
//! Conventions
//! -----------
//! - Python choices use the signed encoding (`+1` left, `-1` right) and RTs
//!   are integer milliseconds.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration tests under `tests/`.

pub mod ddm;
pub mod estimation;
pub mod inference;
pub mod likelihood;
pub mod optimization;
pub mod telemetry;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{
    prelude::*,
    types::{PyDict, PyList},
};

#[cfg(feature = "python-bindings")]
use rand::{SeedableRng, rngs::StdRng};

#[cfg(feature = "python-bindings")]
use crate::{
    ddm::{
        core::{DDMParams, ModelOpts},
        models::{DDM, DecisionModel},
    },
    estimation::{ValidationConfig, ddm_validation as run_ddm_validation, simulate_conditions},
    likelihood::LikelihoodEngine,
    utils::{extract_f64_vec, extract_trials, report_to_dict, trials_to_list},
};

/// DDM — Python-facing wrapper for the base drift-diffusion model.
///
/// Constructed from Python via `DDM(d, sigma)` with default process,
/// simulation, and likelihood options.
///
/// Methods
/// -------
/// - `simulate(value_left, value_right, n, seed=42)`: list of
///   `(value_left, value_right, choice, rt_ms)` tuples.
/// - `likelihood(values_left, values_right, choices, rts, workers=None)`:
///   per-trial likelihoods in input order.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "DDM", module = "rust_ddm.models")]
pub struct PyDDM {
    inner: DDM,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyDDM {
    #[new]
    #[pyo3(text_signature = "(d, sigma)")]
    pub fn new(d: f64, sigma: f64) -> PyResult<Self> {
        let inner = DDM::new(DDMParams::new(d, sigma)?, ModelOpts::default())?;
        Ok(PyDDM { inner })
    }

    #[getter]
    pub fn d(&self) -> f64 {
        self.inner.params().d
    }

    #[getter]
    pub fn sigma(&self) -> f64 {
        self.inner.params().sigma
    }

    #[pyo3(
        signature = (value_left, value_right, n, seed = 42),
        text_signature = "(self, value_left, value_right, n, /, seed=42)"
    )]
    pub fn simulate<'py>(
        &self, py: Python<'py>, value_left: f64, value_right: f64, n: usize, seed: u64,
    ) -> PyResult<Bound<'py, PyList>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let trials = simulate_conditions(&self.inner, &[(value_left, value_right)], n, &mut rng)?;
        trials_to_list(py, &trials)
    }

    #[pyo3(
        signature = (values_left, values_right, choices, rts, workers = None),
        text_signature = "(self, values_left, values_right, choices, rts, /, workers=None)"
    )]
    pub fn likelihood<'py>(
        &self, py: Python<'py>, values_left: &Bound<'py, PyAny>, values_right: &Bound<'py, PyAny>,
        choices: &Bound<'py, PyAny>, rts: &Bound<'py, PyAny>, workers: Option<usize>,
    ) -> PyResult<Vec<f64>> {
        let trials = extract_trials(py, values_left, values_right, choices, rts)?;
        let engine = LikelihoodEngine::new(workers.unwrap_or_else(rayon::current_num_threads))?;
        Ok(engine.parallel_compute_likelihoods(&trials, &self.inner)?)
    }

    fn __repr__(&self) -> String {
        format!("DDM({})", self.inner.key())
    }
}

/// Run a DDM recovery and return the report as a dict.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (d, sigma, range_d, range_sigma, trials_per_condition = 800, workers = None, seed = 42),
    text_signature = "(d, sigma, range_d, range_sigma, /, trials_per_condition=800, workers=None, seed=42)"
)]
#[allow(clippy::too_many_arguments)]
pub fn ddm_validation<'py>(
    py: Python<'py>, d: f64, sigma: f64, range_d: &Bound<'py, PyAny>,
    range_sigma: &Bound<'py, PyAny>, trials_per_condition: usize, workers: Option<usize>,
    seed: u64,
) -> PyResult<Bound<'py, PyDict>> {
    let range_d = extract_f64_vec(py, range_d)?;
    let range_sigma = extract_f64_vec(py, range_sigma)?;
    let defaults = ValidationConfig::default();
    let cfg = ValidationConfig {
        trials_per_condition,
        workers: workers.unwrap_or(defaults.workers),
        seed,
        ..defaults
    };
    let report = py.allow_threads(|| run_ddm_validation(d, sigma, &range_d, &range_sigma, &cfg))?;
    report_to_dict(py, &report)
}

/// Install a `tracing` subscriber; returns `False` if one already exists.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (directive = "info"))]
pub fn init_logging(directive: &str) -> bool {
    telemetry::try_init_tracing(directive)
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_ddm<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let models_mod = PyModule::new(_py, "models")?;
    let estimation_mod = PyModule::new(_py, "estimation")?;
    models(_py, m, &models_mod)?;
    estimation(_py, m, &estimation_mod)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_ddm.models", models_mod)?;
    _py.import("sys")?.getattr("modules")?.set_item("rust_ddm.estimation", estimation_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn models<'py>(_py: Python, rust_ddm: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<PyDDM>()?;
    rust_ddm.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn estimation<'py>(
    _py: Python, rust_ddm: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ddm_validation, m)?)?;
    rust_ddm.add_submodule(m)?;
    Ok(())
}
