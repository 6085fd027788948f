//! Errors for GAS-X score-driven models (data validation, model shape checks,
//! estimation state, and forecasting preconditions).
//!
//! This module defines the model error type, [`GasError`], used across the
//! Rust core and, when the `python-bindings` feature is enabled, converted to
//! `PyErr` at the FFI boundary.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Observations and design entries must be **finite**; the design matrix
//!   must have one row per observation.
//! - Forecasting requires a fitted model and an out-of-sample design matrix
//!   whose shape matches `(horizon, k)`.
//! - Optimizer/backend failures are normalized to
//!   [`GasError::OptimizationFailed`] with a human-readable status.
#[cfg(feature = "python-bindings")]
use pyo3::exceptions::PyValueError;
#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;
use statrs::StatsError;

use crate::optimization::errors::OptError;

/// Crate-wide result alias for GAS-X operations that may produce [`GasError`].
pub type GasResult<T> = Result<T, GasError>;

/// Unified error type for GAS-X modeling.
///
/// Covers input/data validation, model-shape checks, estimation state,
/// forecasting preconditions, and wrapped optimizer/distribution failures.
#[derive(Debug, Clone, PartialEq)]
pub enum GasError {
    // ---- Input/data validation ----
    /// Series is empty.
    EmptySeries,

    /// A data point is NaN/±inf.
    NonFiniteData { index: usize, value: f64 },

    /// A design-matrix entry is NaN/±inf.
    NonFiniteDesign { row: usize, col: usize, value: f64 },

    /// Design matrix row count differs from the series length.
    DesignRowMismatch { y_len: usize, x_rows: usize },

    /// Design matrix has no columns (at minimum an intercept is required).
    EmptyDesign,

    /// Not enough observations for the requested lag/differencing orders.
    InsufficientObservations { needed: usize, actual: usize },

    // ---- Model shape and latent variables ----
    /// A lag or differencing order is inconsistent with the sample.
    InvalidModelShape { param: usize, reason: &'static str },

    /// Raw latent vector length does not match the model's latent table.
    LatentLengthMismatch { expected: usize, actual: usize },

    /// Raw latent values must be finite.
    NonFiniteLatent { index: usize, value: f64 },

    // ---- Estimation / optimizer ----
    /// Optimizer failed; includes a human-readable status/reason.
    OptimizationFailed { status: String },

    /// Model hasn't been estimated yet.
    NotEstimated,

    // ---- Forecasting ----
    /// Forecast horizon must be at least one step.
    InvalidHorizon { horizon: usize },

    /// Out-of-sample design shape does not match `(horizon, k)`.
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    /// Simulation count must be at least one trajectory.
    InvalidSimCount { n_sims: usize },

    // ---- Distribution families ----
    /// A family parameter left its admissible domain.
    InvalidFamilyParam { name: &'static str, value: f64 },

    /// Wrapper for statrs distribution-construction failures.
    DistributionError { text: String },

    /// ---- Fallback ----
    UnknownError,
}

impl std::error::Error for GasError {}

impl std::fmt::Display for GasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            GasError::EmptySeries => {
                write!(f, "Input series is empty.")
            }
            GasError::NonFiniteData { index, value } => {
                write!(f, "Data point at index {index} is non-finite: {value}")
            }
            GasError::NonFiniteDesign { row, col, value } => {
                write!(f, "Design entry at ({row}, {col}) is non-finite: {value}")
            }
            GasError::DesignRowMismatch { y_len, x_rows } => {
                write!(
                    f,
                    "Design matrix has {x_rows} rows but the series has {y_len} observations."
                )
            }
            GasError::EmptyDesign => {
                write!(f, "Design matrix must have at least one column (the intercept).")
            }
            GasError::InsufficientObservations { needed, actual } => {
                write!(
                    f,
                    "At least {needed} observations are required for the requested lags and differencing; got {actual}."
                )
            }
            // ---- Model shape and latent variables ----
            GasError::InvalidModelShape { param, reason } => {
                write!(f, "Invalid model shape parameter {param}: {reason}")
            }
            GasError::LatentLengthMismatch { expected, actual } => {
                write!(f, "Latent vector length mismatch: expected {expected}, got {actual}")
            }
            GasError::NonFiniteLatent { index, value } => {
                write!(f, "Latent value at index {index} must be finite; got {value}")
            }
            // ---- Estimation / optimizer ----
            GasError::OptimizationFailed { status } => {
                write!(f, "Optimizer failed with status: {status}")
            }
            GasError::NotEstimated => {
                write!(f, "Model hasn't been estimated yet.")
            }
            // ---- Forecasting ----
            GasError::InvalidHorizon { horizon } => {
                write!(f, "Forecast horizon must be >= 1; got {horizon}")
            }
            GasError::ShapeMismatch { expected_rows, expected_cols, actual_rows, actual_cols } => {
                write!(
                    f,
                    "Out-of-sample design shape mismatch: expected ({expected_rows}, {expected_cols}), got ({actual_rows}, {actual_cols})"
                )
            }
            GasError::InvalidSimCount { n_sims } => {
                write!(f, "Simulation count must be >= 1; got {n_sims}")
            }
            // ---- Distribution families ----
            GasError::InvalidFamilyParam { name, value } => {
                write!(f, "Family parameter '{name}' is out of domain: {value}")
            }
            GasError::DistributionError { text } => {
                write!(f, "Distribution error: {text}")
            }
            GasError::UnknownError => {
                write!(f, "An unknown error occurred in the model.")
            }
        }
    }
}

/// Convert a [`GasError`] into a Python `ValueError` with the error message.
///
/// This is used at the Rust↔Python boundary to surface domain errors cleanly.
#[cfg(feature = "python-bindings")]
impl std::convert::From<GasError> for PyErr {
    fn from(err: GasError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<StatsError> for GasError {
    fn from(err: StatsError) -> GasError {
        GasError::DistributionError { text: err.to_string() }
    }
}

impl From<OptError> for GasError {
    fn from(err: OptError) -> GasError {
        GasError::OptimizationFailed { status: err.to_string() }
    }
}
