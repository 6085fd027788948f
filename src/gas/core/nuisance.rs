//! Resolution of trailing nuisance parameters from the constrained latent
//! vector.
//!
//! A GAS-X latent vector is laid out as
//! `[ar lags | score lags | betas | nuisance...]` with the family's nuisance
//! parameters always occupying the **trailing** positions. This module peels
//! them off by position, which keeps the filter and likelihood independent of
//! the number of regressors or lags.
use crate::gas::core::families::GasFamily;
use ndarray::ArrayView1;

/// Constrained nuisance parameters of a family, resolved for one evaluation.
///
/// Fields left unused by a family hold neutral values: `scale = 0`,
/// `shape = 0`, `skewness = 1`. Scores and densities must never read a field
/// the family's capability flags say it does not have.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NuisanceParams {
    pub scale: f64,
    pub shape: f64,
    pub skewness: f64,
}

impl NuisanceParams {
    /// Peel the family's nuisance parameters off the tail of `parm`.
    ///
    /// Positional convention:
    /// - no scale: `(scale, shape) = (0, 0)`;
    /// - scale without shape: scale is the **last** entry;
    /// - scale and shape: scale is **second-to-last**, shape is **last**;
    /// - skewness, when present, sits **third-from-last**; otherwise it
    ///   defaults to the symmetric value `1`.
    ///
    /// `parm` is the full constrained latent vector; callers guarantee its
    /// length matches the model's latent table, so the tail indexing here
    /// never underflows.
    pub fn resolve(family: &GasFamily, parm: ArrayView1<f64>) -> Self {
        let n = parm.len();
        let (scale, shape) = if !family.has_scale() {
            (0.0, 0.0)
        } else if !family.has_shape() {
            (parm[n - 1], 0.0)
        } else {
            (parm[n - 2], parm[n - 1])
        };
        let skewness = if family.has_skewness() { parm[n - 3] } else { 1.0 };
        NuisanceParams { scale, shape, skewness }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests pin the trailing-position convention for every capability
    // combination. Score/density behavior of the resolved values is covered
    // by the family tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Scale-only families read the last entry as scale and leave shape and
    // skewness at their neutral values.
    //
    // Given
    // -----
    // - A Normal model vector ending in 2.5.
    //
    // Expect
    // ------
    // - scale = 2.5, shape = 0, skewness = 1.
    fn scale_only_family_reads_last_entry() {
        let parm = array![0.4, -0.1, 2.5];
        let n = NuisanceParams::resolve(&GasFamily::Normal, parm.view());
        assert_eq!(n, NuisanceParams { scale: 2.5, shape: 0.0, skewness: 1.0 });
    }

    #[test]
    // Purpose
    // -------
    // Scale-and-shape families read (second-to-last, last).
    //
    // Given
    // -----
    // - A Student-t vector ending in [1.5, 6.0].
    //
    // Expect
    // ------
    // - scale = 1.5, shape = 6.0.
    fn scale_and_shape_read_trailing_pair() {
        let parm = array![0.4, 0.2, 1.5, 6.0];
        let n = NuisanceParams::resolve(&GasFamily::StudentT, parm.view());
        assert_eq!(n, NuisanceParams { scale: 1.5, shape: 6.0, skewness: 1.0 });
    }

    #[test]
    // Purpose
    // -------
    // Skewed families additionally read skewness third-from-last.
    //
    // Given
    // -----
    // - A skew-t vector ending in [0.8, 1.5, 6.0].
    //
    // Expect
    // ------
    // - skewness = 0.8, scale = 1.5, shape = 6.0.
    fn skewness_sits_third_from_last() {
        let parm = array![0.4, 0.8, 1.5, 6.0];
        let n = NuisanceParams::resolve(&GasFamily::SkewT, parm.view());
        assert_eq!(n, NuisanceParams { scale: 1.5, shape: 6.0, skewness: 0.8 });
    }

    #[test]
    // Purpose
    // -------
    // Families without a scale ignore the tail entirely.
    //
    // Given
    // -----
    // - A Poisson vector whose tail holds regression betas, not nuisance.
    //
    // Expect
    // ------
    // - All neutral values.
    fn no_scale_family_ignores_tail() {
        let parm = array![0.4, 0.2, -1.3];
        let n = NuisanceParams::resolve(&GasFamily::Poisson, parm.view());
        assert_eq!(n, NuisanceParams { scale: 0.0, shape: 0.0, skewness: 1.0 });
    }
}
