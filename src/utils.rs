//! Conversion helpers for the PyO3 binding surface.
//!
//! Everything in this module is gated behind the `python-bindings` feature
//! and exists to turn Python objects (numpy arrays, pandas Series,
//! sequences, option strings) into validated core types. Native Rust code
//! should construct [`GasXModel`](crate::gas::models::gasx::GasXModel)
//! directly.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    gas::{
        core::{families::GasFamily, options::{GasOptions, SimOptions}, shape::GasShape},
        errors::GasError,
        models::gasx::GasXModel,
    },
    optimization::loglik_optimizer::traits::{LineSearcher, MLEOptions, Tolerances},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1, PyReadonlyArray2,
};

/// Coerce a Python object into a contiguous 1-D `f64` numpy view.
///
/// Accepts `numpy.ndarray`, anything exposing `to_numpy` (pandas Series),
/// or a plain sequence of floats (copied once).
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
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Coerce a Python object into an owned 2-D `f64` matrix.
///
/// Accepts `numpy.ndarray`, anything exposing `to_numpy` (pandas
/// DataFrame), or a sequence of float sequences with equal row lengths.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(
    _py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or sequence of float64 rows",
        )
    })?;
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(PyValueError::new_err("design rows must all have the same length"));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|e| PyValueError::new_err(format!("invalid design matrix shape: {e}")))
}

/// Build a [`GasXModel`] from Python-friendly arguments.
#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
pub fn build_gasx_model<'py>(
    py: Python<'py>, y: &Bound<'py, PyAny>, x: &Bound<'py, PyAny>, names: Option<Vec<String>>,
    ar: Option<usize>, sc: Option<usize>, integ: Option<usize>, family: Option<&str>,
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, n_sims: Option<usize>,
    seed: Option<u64>,
) -> PyResult<GasXModel> {
    let y_arr = extract_f64_array(py, y)?;
    let y_slice = y_arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("y must be a 1-D contiguous float64 array or sequence"))?;
    let y_vec = Array1::from(y_slice.to_vec());
    let x_mat = extract_f64_matrix(py, x)?;

    let ar_val = ar.unwrap_or(1);
    let sc_val = sc.unwrap_or(1);
    let integ_val = integ.unwrap_or(0);
    let shape = GasShape::new(ar_val, sc_val, integ_val, y_vec.len())?;

    let fam = extract_family(family)?;
    let mle_opts = extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem)?;
    let sim_opts = extract_sim_opts(n_sims, seed)?;
    let options = GasOptions::new(Some(mle_opts), Some(sim_opts));

    let col_names = names.unwrap_or_default();
    let model = GasXModel::new(y_vec, x_mat, col_names, shape, fam, options)?;
    Ok(model)
}

#[cfg(feature = "python-bindings")]
pub fn extract_family(family: Option<&str>) -> PyResult<GasFamily> {
    let family_str = family.unwrap_or("normal").to_lowercase();
    match family_str.as_str() {
        "normal" | "gaussian" => Ok(GasFamily::Normal),
        "t" | "studentt" | "student_t" => Ok(GasFamily::StudentT),
        "skewt" | "skew_t" => Ok(GasFamily::SkewT),
        "exponential" => Ok(GasFamily::Exponential),
        "poisson" => Ok(GasFamily::Poisson),
        other => Err(PyValueError::new_err(format!(
            "invalid family {:?} (expected 'normal', 't', 'skewt', 'exponential', or 'poisson')",
            other
        ))),
    }
}

#[cfg(feature = "python-bindings")]
fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<MLEOptions> {
    use std::str::FromStr;

    // Fall back to the crate defaults when no stopping rule is requested.
    if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        let mut opts = MLEOptions::default();
        if let Some(name) = line_searcher {
            opts.line_searcher = LineSearcher::from_str(name).map_err(GasError::from)?;
        }
        opts.lbfgs_mem = lbfgs_mem;
        return Ok(opts);
    }

    // Tolerances::new -> OptResult<Tolerances> -> GasError -> PyErr
    let tols = Tolerances::new(tol_grad, tol_cost, max_iter).map_err(GasError::from)?;

    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name).map_err(GasError::from)?,
        None => LineSearcher::MoreThuente,
    };

    let opts = MLEOptions::new(tols, ls, lbfgs_mem).map_err(GasError::from)?;
    Ok(opts)
}

#[cfg(feature = "python-bindings")]
fn extract_sim_opts(n_sims: Option<usize>, seed: Option<u64>) -> PyResult<SimOptions> {
    let defaults = SimOptions::default();
    let sims = SimOptions::new(n_sims.unwrap_or(defaults.n_sims), seed.unwrap_or(defaults.seed))?;
    Ok(sims)
}
