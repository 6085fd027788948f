//! score_driven — score-driven (GAS) time-series models with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the GAS-X estimation and forecasting stack to Python via the
//! `_score_driven` extension module. When the `python-bindings` feature is
//! enabled, this module defines the Python-facing classes and submodules
//! used by the `score_driven` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`gas` and `optimization`) as the
//!   public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_score_driven` Python extension.
//! - Create and register the `gas_models` Python submodule under
//!   `score_driven` so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules; this
//!   file performs only FFI glue, input validation, and error mapping.
//! - When `python-bindings` is enabled, the Python-visible types mirror the
//!   invariants and signatures of their Rust counterparts (e.g.
//!   [`GasXModel`]).
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_score_driven.gas_models` and are
//!   typically wrapped by thin pure-Python facades in the top-level
//!   `score_driven` package.
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should usually depend directly on the inner modules
//!   and can ignore the PyO3 items guarded by the `python-bindings` feature.
//! - The Python packaging layer imports the `_score_driven` module defined
//!   here and wraps its classes in user-facing Python APIs.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules
//!   and by the Rust integration tests under `tests/`.
//! - Smoke tests for the PyO3 bindings verify that classes can be
//!   constructed, fitted, and queried from Python.

pub mod gas;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

#[cfg(feature = "python-bindings")]
use pyo3::types::PyAny;

#[cfg(feature = "python-bindings")]
use crate::{
    gas::{errors::GasError, models::gasx::GasXModel},
    optimization::loglik_optimizer::traits::OptimOutcome,
    utils::{build_gasx_model, extract_f64_matrix},
};

/// GASX — Python-facing wrapper for GAS-X score-driven models.
///
/// Purpose
/// -------
/// Expose the [`GasXModel`] API to Python callers while preserving the core
/// Rust invariants and error handling.
///
/// Key behaviors
/// -------------
/// - Build a [`GasXModel`] with a chosen observation family, lag orders,
///   and optimizer/simulation options from Python-friendly arguments.
/// - Provide `fit`, `predict`, `predict_intervals`, and
///   `predict_in_sample` methods that convert Python arrays into core
///   types and delegate to the Rust implementation.
/// - Expose fitted diagnostics (`latent_values`, `fitted_values`,
///   `residuals`, `results`) via methods and property getters.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `GASX(y, x, names=None, ar=1, sc=1, integ=0, family='normal', ...)`:
/// - `y`: 1-D array-like of observations.
/// - `x`: 2-D array-like of regressors, one row per observation.
/// - `names`: optional list of column labels for `x`.
/// - `ar`, `sc`, `integ`: lag orders for θ and score terms and the
///   differencing order.
/// - `family`: observation family name (`'normal'`, `'t'`, `'skewt'`,
///   `'exponential'`, `'poisson'`).
/// - `tol_grad`, `tol_cost`, `max_iter`, `line_searcher`, `lbfgs_mem`:
///   optimizer configuration used to build `MLEOptions`.
/// - `n_sims`, `seed`: Monte-Carlo settings for interval forecasts.
///
/// Notes
/// -----
/// - Native Rust callers should work with [`GasXModel`] directly; this type
///   exists solely for the PyO3 binding surface.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "score_driven.gas_models", unsendable)]
pub struct GASX {
    /// Underlying Rust GasXModel.
    pub inner: GasXModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl GASX {
    #[new]
    #[pyo3(
        signature = (
            y,
            x,
            names = None,
            ar = None,
            sc = None,
            integ = None,
            family = None,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            n_sims = None,
            seed = None,
        ),
        text_signature = "(y, x, /, names=None, ar=1, sc=1, integ=0, family='normal', \
                          tol_grad=None, tol_cost=None, max_iter=None, line_searcher=None, \
                          lbfgs_mem=None, n_sims=None, seed=None)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn gasx<'py>(
        py: Python<'py>, y: &Bound<'py, PyAny>, x: &Bound<'py, PyAny>, names: Option<Vec<String>>,
        ar: Option<usize>, sc: Option<usize>, integ: Option<usize>, family: Option<&str>,
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>, n_sims: Option<usize>,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let inner = build_gasx_model(
            py,
            y,
            x,
            names,
            ar,
            sc,
            integ,
            family,
            tol_grad,
            tol_cost,
            max_iter,
            line_searcher,
            lbfgs_mem,
            n_sims,
            seed,
        )?;
        Ok(GASX { inner })
    }

    /// Fit the model by maximum likelihood.
    pub fn fit(&mut self) -> PyResult<()> {
        self.inner.fit()?;
        Ok(())
    }

    /// Mean forecast `horizon` steps ahead using out-of-sample regressors.
    #[pyo3(text_signature = "(self, horizon, x_oos, /)")]
    pub fn predict<'py>(
        &self, py: Python<'py>, horizon: usize, x_oos: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let x_mat = extract_f64_matrix(py, x_oos)?;
        let means = self.inner.predict(horizon, x_mat.view())?;
        Ok(means.to_vec())
    }

    /// Mean forecast plus simulation-based interval bands.
    ///
    /// Returns a triple `(means, percentiles, bands)` where `bands[i][t]`
    /// is the offset of `percentiles[i]` from the mean at forecast step
    /// `t - 1` (column 0 is all zeros, anchoring the bands at the last
    /// in-sample point).
    #[pyo3(text_signature = "(self, horizon, x_oos, /)")]
    pub fn predict_intervals<'py>(
        &self, py: Python<'py>, horizon: usize, x_oos: &Bound<'py, PyAny>,
    ) -> PyResult<(Vec<f64>, Vec<f64>, Vec<Vec<f64>>)> {
        let x_mat = extract_f64_matrix(py, x_oos)?;
        let (means, bands) = self.inner.predict_intervals(horizon, x_mat.view())?;

        let (nrows, _ncols) = bands.bands.dim();
        let mut rows = Vec::with_capacity(nrows);
        for i in 0..nrows {
            rows.push(bands.bands.row(i).to_vec());
        }
        Ok((means.to_vec(), bands.percentiles.clone(), rows))
    }

    /// Rolling one-step-ahead predictions over the last `horizon`
    /// in-sample observations.
    #[pyo3(
        signature = (horizon, fit_once = true),
        text_signature = "(self, horizon, /, fit_once=True)"
    )]
    pub fn predict_in_sample(&self, horizon: usize, fit_once: bool) -> PyResult<Vec<f64>> {
        let preds = self.inner.predict_in_sample(horizon, fit_once)?;
        Ok(preds.to_vec())
    }

    /// Constrained estimates paired with their latent names.
    pub fn latent_values(&self) -> PyResult<Vec<(String, f64)>> {
        Ok(self.inner.latent_values()?)
    }

    /// In-sample fitted observation means.
    pub fn fitted_values(&self) -> PyResult<Vec<f64>> {
        Ok(self.inner.fitted_values()?.to_vec())
    }

    /// In-sample residuals (observations minus fitted values).
    pub fn residuals(&self) -> PyResult<Vec<f64>> {
        Ok(self.inner.residuals()?.to_vec())
    }

    #[getter]
    pub fn results(&self) -> PyResult<GasXOptimOutcome> {
        match &self.inner.results {
            Some(outcome) => Ok(GasXOptimOutcome { inner: outcome.clone() }),
            None => Err(GasError::NotEstimated.into()),
        }
    }
}

/// GasXOptimOutcome — optimization outcome for a GAS-X model exposed to
/// Python.
///
/// Holds the raw-space optimum `theta_hat` and scalar diagnostics (best
/// log-likelihood, convergence flag, status string, iteration count,
/// gradient norm, function-evaluation counters). Instances are constructed
/// internally by the `GASX.results` getter.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "score_driven.gas_models")]
pub struct GasXOptimOutcome {
    /// Underlying Rust OptimOutcome.
    pub inner: OptimOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl GasXOptimOutcome {
    #[getter]
    pub fn theta_hat(&self) -> Vec<f64> {
        self.inner.theta_hat.to_vec()
    }

    #[getter]
    pub fn value(&self) -> f64 {
        self.inner.value
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.clone()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[getter]
    pub fn grad_norm(&self) -> Option<f64> {
        self.inner.grad_norm
    }

    #[getter]
    pub fn fn_evals(&self) -> Vec<(String, u64)> {
        self.inner.fn_evals.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }
}

/// _score_driven — PyO3 module initializer for the Python extension.
///
/// Defines the `_score_driven` Python module, creates the `gas_models`
/// submodule, and registers it in `sys.modules` so dotted imports work.
/// Invoked automatically by Python on import; not called by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _score_driven<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let gas_models_mod = PyModule::new(_py, "gas_models")?;
    gas_models(_py, m, &gas_models_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("score_driven.gas_models", gas_models_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn gas_models<'py>(
    _py: Python, score_driven: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<GASX>()?;
    m.add_class::<GasXOptimOutcome>()?;
    score_driven.add_submodule(m)?;
    Ok(())
}
