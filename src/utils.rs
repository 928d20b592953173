//! utils — conversion helpers for the PyO3 boundary.
//!
//! Everything here is compiled only with the `python-bindings` feature and
//! turns Python array-likes into the crate's validated Rust types.
#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::{PyAny, PyDict, PyList},
};

#[cfg(feature = "python-bindings")]
use crate::{
    ddm::core::{Choice, TrialRecord},
    estimation::ValidationReport,
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Contiguous read-only `f64` view of a numpy array, pandas Series, or
/// sequence of floats.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy an array-like of floats into a `Vec<f64>`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vec<'py>(py: Python<'py>, raw_data: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("expected a contiguous 1-D float64 array"))?;
    Ok(slice.to_vec())
}

/// Build trial records from parallel columns.
///
/// `choices` use the signed encoding (`+1` left, `-1` right); `rts_ms` are
/// non-negative integer milliseconds.
#[cfg(feature = "python-bindings")]
pub fn extract_trials<'py>(
    py: Python<'py>, values_left: &Bound<'py, PyAny>, values_right: &Bound<'py, PyAny>,
    choices: &Bound<'py, PyAny>, rts_ms: &Bound<'py, PyAny>,
) -> PyResult<Vec<TrialRecord>> {
    let values_left = extract_f64_vec(py, values_left)?;
    let values_right = extract_f64_vec(py, values_right)?;
    let choices: Vec<i64> = choices
        .extract()
        .map_err(|_| PyTypeError::new_err("choices must be a sequence of integers"))?;
    let rts_ms: Vec<u64> = rts_ms
        .extract()
        .map_err(|_| PyTypeError::new_err("rts must be a sequence of non-negative integers"))?;

    let n = values_left.len();
    if values_right.len() != n || choices.len() != n || rts_ms.len() != n {
        return Err(PyValueError::new_err(format!(
            "column lengths differ: values_left={n}, values_right={}, choices={}, rts={}",
            values_right.len(),
            choices.len(),
            rts_ms.len()
        )));
    }

    let mut trials = Vec::with_capacity(n);
    for i in 0..n {
        let choice = Choice::from_signed(choices[i])?;
        trials.push(TrialRecord::new(values_left[i], values_right[i], choice, rts_ms[i])?);
    }
    Ok(trials)
}

/// Render a [`ValidationReport`] as a plain Python dict.
///
/// Keys: `truth`, `n_trials`, `posterior` (model string → probability),
/// `posterior_sum`, `map_model`, `map_probability`, `updated`, `skipped`.
#[cfg(feature = "python-bindings")]
pub fn report_to_dict<'py>(
    py: Python<'py>, report: &ValidationReport,
) -> PyResult<Bound<'py, PyDict>> {
    let out = PyDict::new(py);
    let posterior = PyDict::new(py);
    for p in &report.posteriors {
        posterior.set_item(p.model.to_string(), p.probability)?;
    }
    out.set_item("truth", report.truth.to_string())?;
    out.set_item("n_trials", report.n_trials)?;
    out.set_item("posterior", posterior)?;
    out.set_item("posterior_sum", report.posterior_sum)?;
    out.set_item("map_model", report.map_model.to_string())?;
    out.set_item("map_probability", report.map_probability)?;
    out.set_item("updated", report.summary.updated)?;
    out.set_item("skipped", report.summary.skipped)?;
    Ok(out)
}

/// Render trials as a list of `(value_left, value_right, choice, rt_ms)`.
#[cfg(feature = "python-bindings")]
pub fn trials_to_list<'py>(py: Python<'py>, trials: &[TrialRecord]) -> PyResult<Bound<'py, PyList>> {
    let rows: Vec<(f64, f64, i64, u64)> = trials
        .iter()
        .map(|t| (t.value_left, t.value_right, t.choice.signed(), t.rt_ms))
        .collect();
    PyList::new(py, rows)
}
