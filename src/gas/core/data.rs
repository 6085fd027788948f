//! Observed-data containers for GAS-X models.
//!
//! Purpose
//! -------
//! Provide a validated container pairing an observed series with its exogenous
//! design matrix, plus the differencing/trimming bookkeeping the score filter
//! relies on. This module centralizes input validation so downstream code can
//! assume clean, aligned inputs.
//!
//! Key behaviors
//! -------------
//! - [`GasData`] enforces basic invariants (non-empty, finite series and
//!   design, matching row counts, at least one design column).
//! - Differencing (`integ` times) and lag trimming (`max(ar, sc)` leading
//!   observations) are applied once at construction; the filter and the
//!   likelihood operate on the precomputed trimmed views.
//! - Design rows are trimmed from index `integ + max_lag` so each retained
//!   row lines up with its trimmed target observation.
//!
//! Invariants & assumptions
//! ------------------------
//! - `y.len() == x.nrows()` and every entry of both is finite.
//! - `x.ncols() >= 1`; the first column is conventionally the intercept, but
//!   that is the caller's contract (formula front-ends are out of scope).
//! - The trimmed target has length `y.len() - integ - max_lag`, which
//!   [`GasShape::new`] guarantees is at least two.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; the trimmed series stores the oldest retained
//!   observation at index 0.
//! - No calendar indexing is performed here; forecast frames continue the
//!   trimmed positional index.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path, each rejection branch, differencing
//!   arithmetic, and row/target alignment of the trimmed design.
use crate::gas::{
    core::shape::GasShape,
    errors::{GasError, GasResult},
};
use ndarray::{Array1, Array2, s};

/// `GasData` — validated series + design matrix with trim bookkeeping.
///
/// Purpose
/// -------
/// Hold the raw observed series `y`, the raw design matrix `x`, and the
/// derived arrays the filter consumes: the differenced series, the trimmed
/// target, and the row-aligned trimmed design.
///
/// Fields
/// ------
/// - `y`: raw observations (length n, finite).
/// - `x`: raw design matrix (n × k, finite, k ≥ 1).
/// - `names`: one label per design column, used for latent naming.
/// - `diff_y`: `y` differenced `integ` times (length n − integ).
/// - `target`: `diff_y[max_lag..]` — the series the likelihood scores.
/// - `design`: `x` rows from `integ + max_lag` on — aligned with `target`.
///
/// Invariants
/// ----------
/// - `target.len() == design.nrows() >= 2`.
/// - All stored arrays are finite.
#[derive(Debug, Clone, PartialEq)]
pub struct GasData {
    /// Raw observed series (finite).
    pub y: Array1<f64>,
    /// Raw design matrix, one row per observation (finite).
    pub x: Array2<f64>,
    /// Column labels for the design matrix.
    pub names: Vec<String>,
    /// Series after `integ` rounds of differencing.
    pub diff_y: Array1<f64>,
    /// Trimmed target the filter and likelihood operate on.
    pub target: Array1<f64>,
    /// Design rows aligned with `target`.
    pub design: Array2<f64>,
}

impl GasData {
    /// Construct a validated [`GasData`] from raw inputs.
    ///
    /// Parameters
    /// ----------
    /// - `y`: raw series; must be non-empty and finite.
    /// - `x`: design matrix with `y.len()` rows and at least one column.
    /// - `names`: one label per design column (padded with `x{i}` when
    ///   shorter; extras are ignored).
    /// - `shape`: validated model order; supplies `integ` and `max_lag` for
    ///   the trim arithmetic.
    ///
    /// Errors
    /// ------
    /// - [`GasError::EmptySeries`] when `y` is empty.
    /// - [`GasError::NonFiniteData`] / [`GasError::NonFiniteDesign`] on the
    ///   first non-finite entry found.
    /// - [`GasError::DesignRowMismatch`] when row counts differ.
    /// - [`GasError::EmptyDesign`] when `x` has no columns.
    /// - [`GasError::InsufficientObservations`] when differencing and lag
    ///   trimming would leave fewer than two observations.
    pub fn new(
        y: Array1<f64>, x: Array2<f64>, names: Vec<String>, shape: &GasShape,
    ) -> GasResult<Self> {
        if y.is_empty() {
            return Err(GasError::EmptySeries);
        }
        for (index, &value) in y.iter().enumerate() {
            if !value.is_finite() {
                return Err(GasError::NonFiniteData { index, value });
            }
        }
        if x.nrows() != y.len() {
            return Err(GasError::DesignRowMismatch { y_len: y.len(), x_rows: x.nrows() });
        }
        if x.ncols() == 0 {
            return Err(GasError::EmptyDesign);
        }
        for ((row, col), &value) in x.indexed_iter() {
            if !value.is_finite() {
                return Err(GasError::NonFiniteDesign { row, col, value });
            }
        }
        let offset = shape.integ + shape.max_lag();
        if y.len() < offset + 2 {
            return Err(GasError::InsufficientObservations { needed: offset + 2, actual: y.len() });
        }

        let diff_y = difference(&y, shape.integ);
        let target = diff_y.slice(s![shape.max_lag()..]).to_owned();
        let design = x.slice(s![offset.., ..]).to_owned();

        let mut names = names;
        for i in names.len()..x.ncols() {
            names.push(format!("x{i}"));
        }
        names.truncate(x.ncols());

        Ok(GasData { y, x, names, diff_y, target, design })
    }

    /// Number of design columns (regression coefficients).
    pub fn k(&self) -> usize {
        self.x.ncols()
    }

    /// Length of the trimmed target.
    pub fn n_effective(&self) -> usize {
        self.target.len()
    }

    /// Build a new [`GasData`] over the first `len` raw observations.
    ///
    /// Used by rolling in-sample backtests; revalidates through [`Self::new`]
    /// so the truncated sample still satisfies the shape requirements.
    pub fn truncate(&self, len: usize, shape: &GasShape) -> GasResult<Self> {
        if len > self.y.len() {
            return Err(GasError::InsufficientObservations { needed: len, actual: self.y.len() });
        }
        GasData::new(
            self.y.slice(s![..len]).to_owned(),
            self.x.slice(s![..len, ..]).to_owned(),
            self.names.clone(),
            shape,
        )
    }
}

/// Difference a series `order` times (first differences, applied repeatedly).
fn difference(y: &Array1<f64>, order: usize) -> Array1<f64> {
    let mut out = y.clone();
    for _ in 0..order {
        let next: Array1<f64> =
            Array1::from_iter(out.windows(2).into_iter().map(|w| w[1] - w[0]));
        out = next;
    }
    out
}
