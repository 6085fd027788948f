//! Model order (ar, sc, integ) for GAS-X models.
//!
//! In the GAS convention:
//! - `ar`: number of **autoregressive lags** on the latent predictor θ.
//! - `sc`: number of **score lags** (lagged score-update terms).
//! - `integ`: how many times the observed series is differenced before
//!   filtering.
//!
//! Unlike ARMA-style recursions there is no requirement that `ar` or `sc`
//! be positive: a pure-regression model (`ar = sc = 0`) is well defined.
use crate::gas::errors::{GasError, GasResult};

/// Order of a GAS-X model.
///
/// - `ar`: lags of the latent predictor θ.
/// - `sc`: lags of the score-update terms.
/// - `integ`: differencing order applied to the raw series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasShape {
    pub ar: usize,
    pub sc: usize,
    pub integ: usize,
}

impl GasShape {
    /// Construct a [`GasShape`] and validate it against the sample size `n`.
    ///
    /// # Invariants
    /// - `integ + max(ar, sc)` rows are consumed by differencing and lag
    ///   trimming; at least two observations must remain so the filter has
    ///   something to fit.
    ///
    /// # Errors
    /// - [`GasError::InsufficientObservations`] if the trimmed sample would
    ///   hold fewer than two observations.
    pub fn new(ar: usize, sc: usize, integ: usize, n: usize) -> GasResult<Self> {
        let consumed = integ + ar.max(sc);
        if n < consumed + 2 {
            return Err(GasError::InsufficientObservations { needed: consumed + 2, actual: n });
        }
        Ok(GasShape { ar, sc, integ })
    }

    /// The largest dynamic lag, `max(ar, sc)`.
    pub fn max_lag(&self) -> usize {
        self.ar.max(self.sc)
    }
}
