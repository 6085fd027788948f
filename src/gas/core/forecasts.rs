//! Out-of-sample forecasting for GAS-X models.
//!
//! Purpose
//! -------
//! Roll the score-driven recursion beyond the sample, either as a
//! deterministic mean path or as Monte-Carlo observation trajectories, and
//! summarize the trajectories into prediction-interval bands.
//!
//! Key behaviors
//! -------------
//! - The mean path extends θ with the fitted coefficients, holds future
//!   scores at [`FORECAST_SCORE`], and maps each new θ through the family
//!   link (reciprocal for rate-parameterized families). Skewed families get
//!   the mode-to-mean location adjustment added so the path is a genuine
//!   conditional mean.
//! - Simulated paths draw each future observation from the family at the
//!   linked θ and resample each future score uniformly from the in-sample
//!   scores, so score uncertainty propagates through the lag structure.
//! - Trajectories are independent and run in parallel; each one derives its
//!   RNG from the base seed and its own index, so results are reproducible
//!   for a fixed seed and simulation count regardless of thread scheduling.
//!
//! Conventions
//! -----------
//! - `x_oos` has one row per forecast step; its row count is the horizon.
//! - Lag windows are reversed tails (newest → oldest), truncated against the
//!   available history exactly like the in-sample filter.
use crate::gas::{
    core::{families::GasFamily, nuisance::NuisanceParams, shape::GasShape},
    errors::GasResult,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

/// Value future score terms are held at on the deterministic mean path.
pub const FORECAST_SCORE: f64 = 0.0;

/// Percentiles (in percent) at which interval bands are reported.
pub const BAND_PERCENTILES: [f64; 19] = [
    5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0,
    80.0, 85.0, 90.0, 95.0,
];

/// Roll the recursion forward deterministically and return the conditional
/// mean of each future observation.
///
/// `theta_in` and `scores_in` are the fitted in-sample paths; `parm` is the
/// constrained latent vector. The returned array has one entry per row of
/// `x_oos`.
pub fn mean_forecast(
    family: &GasFamily, shape: &GasShape, parm: ArrayView1<f64>, theta_in: ArrayView1<f64>,
    scores_in: ArrayView1<f64>, x_oos: ArrayView2<f64>,
) -> Array1<f64> {
    let horizon = x_oos.nrows();
    let nuisance = NuisanceParams::resolve(family, parm);
    let skew_shift = family.skew_location_adjustment(&nuisance);

    let mut theta_ext = extend(theta_in, horizon);
    let mut scores_ext = extend(scores_in, horizon);
    let mut means = Array1::<f64>::zeros(horizon);

    let n = theta_in.len();
    for step in 0..horizon {
        let t = n + step;
        let new_theta = step_theta(shape, parm, &theta_ext, &scores_ext, x_oos.row(step), t);
        theta_ext[t] = new_theta;
        scores_ext[t] = FORECAST_SCORE;

        let driven = family.link(new_theta);
        means[step] = if family.uses_reciprocal_link() { 1.0 / driven } else { driven } + skew_shift;
    }
    means
}

/// Simulate `n_sims` observation trajectories over the forecast horizon.
///
/// Each trajectory re-runs the recursion with its own RNG seeded from
/// `seed` plus the trajectory index, draws observations from the family at
/// the linked θ, and resamples future scores uniformly from `scores_in`.
/// Returns an `(n_sims, horizon)` matrix of simulated observations.
///
/// # Errors
/// - Propagates family sampling failures (degenerate nuisance values).
pub fn sim_forecast(
    family: &GasFamily, shape: &GasShape, parm: ArrayView1<f64>, theta_in: ArrayView1<f64>,
    scores_in: ArrayView1<f64>, x_oos: ArrayView2<f64>, n_sims: usize, seed: u64,
) -> GasResult<Array2<f64>> {
    let horizon = x_oos.nrows();
    let nuisance = NuisanceParams::resolve(family, parm);
    let n = theta_in.len();

    let rows: Vec<GasResult<Array1<f64>>> = (0..n_sims)
        .into_par_iter()
        .map(|trajectory| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(trajectory as u64));
            let mut theta_ext = extend(theta_in, horizon);
            let mut scores_ext = extend(scores_in, horizon);
            let mut path = Array1::<f64>::zeros(horizon);

            for step in 0..horizon {
                let t = n + step;
                let new_theta =
                    step_theta(shape, parm, &theta_ext, &scores_ext, x_oos.row(step), t);
                theta_ext[t] = new_theta;
                scores_ext[t] = scores_in[rng.gen_range(0..n)];
                path[step] = family.draw(family.link(new_theta), &nuisance, &mut rng)?;
            }
            Ok(path)
        })
        .collect();

    let mut sims = Array2::<f64>::zeros((n_sims, horizon));
    for (trajectory, row) in rows.into_iter().enumerate() {
        sims.row_mut(trajectory).assign(&row?);
    }
    Ok(sims)
}

/// Interval bands derived from simulated trajectories.
///
/// `bands` has one row per entry of [`BAND_PERCENTILES`] and `horizon + 1`
/// columns: column 0 is always zero (the bands attach to the last observed
/// value in plots), and column `t + 1` holds the percentile of the simulated
/// step-`t` observations minus the mean forecast at that step.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalBands {
    pub percentiles: Vec<f64>,
    pub bands: Array2<f64>,
}

/// Reduce a simulation matrix to percentile offsets around the mean path.
pub fn summarize_intervals(sims: ArrayView2<f64>, means: ArrayView1<f64>) -> IntervalBands {
    let horizon = means.len();
    let mut bands = Array2::<f64>::zeros((BAND_PERCENTILES.len(), horizon + 1));
    let mut column = vec![0.0; sims.nrows()];

    for t in 0..horizon {
        for (i, v) in sims.column(t).iter().enumerate() {
            column[i] = *v;
        }
        column.sort_by(|a, b| a.partial_cmp(b).expect("simulated values are finite"));
        for (row, &pct) in BAND_PERCENTILES.iter().enumerate() {
            bands[[row, t + 1]] = percentile_sorted(&column, pct) - means[t];
        }
    }
    IntervalBands { percentiles: BAND_PERCENTILES.to_vec(), bands }
}

/// One forward step of the recursion over extended buffers.
///
/// `t` indexes into the extended buffers; lag windows truncate against the
/// available history so short samples degrade to zero-seeded lags, matching
/// the in-sample filter.
fn step_theta(
    shape: &GasShape, parm: ArrayView1<f64>, theta_ext: &Array1<f64>, scores_ext: &Array1<f64>,
    x_row: ArrayView1<f64>, t: usize,
) -> f64 {
    let ar = shape.ar;
    let sc = shape.sc;
    let k = x_row.len();
    let k_ar = ar.min(t);
    let k_sc = sc.min(t);

    let theta_tail_rev = theta_ext.slice(s![t - k_ar..t; -1]);
    let score_tail_rev = scores_ext.slice(s![t - k_sc..t; -1]);

    x_row.dot(&parm.slice(s![ar + sc..ar + sc + k]))
        + parm.slice(s![0..k_ar]).dot(&theta_tail_rev)
        + parm.slice(s![ar..ar + k_sc]).dot(&score_tail_rev)
}

/// Copy an in-sample path into a zero-padded buffer with room for the
/// forecast horizon.
fn extend(in_sample: ArrayView1<f64>, horizon: usize) -> Array1<f64> {
    let mut ext = Array1::<f64>::zeros(in_sample.len() + horizon);
    ext.slice_mut(s![..in_sample.len()]).assign(&in_sample);
    ext
}

/// Percentile of a sorted slice with linear interpolation between ranks.
fn percentile_sorted(sorted: &[f64], pct: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = pct / 100.0 * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let frac = rank - lo as f64;
    if lo + 1 >= n {
        sorted[n - 1]
    } else {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Mean-path behavior under degenerate dynamics (pure regression) and
    //   with a single AR lag, including the reciprocal-link mapping.
    // - Reproducibility and shape of the simulation matrix.
    // - The percentile helper and the band layout (leading zero column).
    //
    // They intentionally DO NOT cover estimation; fitted-parameter quality
    // is exercised by the model-level and integration tests.
    // -------------------------------------------------------------------------

    fn intercept_rows(h: usize) -> Array2<f64> {
        Array2::from_elem((h, 1), 1.0)
    }

    #[test]
    // Purpose
    // -------
    // With ar = sc = 0 the mean forecast is the linked regression value at
    // every step.
    //
    // Given
    // -----
    // - Normal family, β = 0.7, intercept-only out-of-sample design, h = 4.
    //
    // Expect
    // ------
    // - Every forecast equals 0.7.
    fn mean_forecast_constant_under_pure_regression() {
        // Arrange
        let shape = GasShape { ar: 0, sc: 0, integ: 0 };
        let parm = array![0.7, 1.0];
        let theta_in = array![0.7, 0.7];
        let scores_in = array![0.1, -0.2];

        // Act
        let means = mean_forecast(
            &GasFamily::Normal,
            &shape,
            parm.view(),
            theta_in.view(),
            scores_in.view(),
            intercept_rows(4).view(),
        );

        // Assert
        assert_eq!(means.len(), 4);
        for &m in means.iter() {
            assert!((m - 0.7).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // With one AR lag the mean path follows θ_{T+s} = β + φ θ_{T+s−1},
    // seeded from the last in-sample θ, with future scores held at zero.
    //
    // Given
    // -----
    // - φ = 0.5, κ = 0.3, β = 1, last in-sample θ = 2.
    //
    // Expect
    // ------
    // - Step 1: 1 + 0.5·2 + 0.3·s_T; step 2: 1 + 0.5·θ̂_1 (score term gone).
    fn mean_forecast_rolls_ar_lag_with_zero_scores() {
        // Arrange
        let shape = GasShape { ar: 1, sc: 1, integ: 0 };
        let parm = array![0.5, 0.3, 1.0, 1.0];
        let theta_in = array![1.5, 2.0];
        let scores_in = array![0.0, 0.4];

        // Act
        let means = mean_forecast(
            &GasFamily::Normal,
            &shape,
            parm.view(),
            theta_in.view(),
            scores_in.view(),
            intercept_rows(2).view(),
        );

        // Assert
        let step_1 = 1.0 + 0.5 * 2.0 + 0.3 * 0.4;
        let step_2 = 1.0 + 0.5 * step_1 + 0.3 * FORECAST_SCORE;
        assert!((means[0] - step_1).abs() < 1e-12);
        assert!((means[1] - step_2).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Rate-parameterized families report the observation mean, i.e. the
    // reciprocal of the linked θ.
    //
    // Given
    // -----
    // - Exponential family, pure regression with β = ln 4 (rate 4).
    //
    // Expect
    // ------
    // - Mean forecast 1/4 at every step.
    fn mean_forecast_uses_reciprocal_for_rate_families() {
        let shape = GasShape { ar: 0, sc: 0, integ: 0 };
        let beta = 4.0_f64.ln();
        let parm = array![beta];
        let theta_in = array![beta, beta];
        let scores_in = array![0.0, 0.0];
        let means = mean_forecast(
            &GasFamily::Exponential,
            &shape,
            parm.view(),
            theta_in.view(),
            scores_in.view(),
            intercept_rows(3).view(),
        );
        for &m in means.iter() {
            assert!((m - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // The simulation matrix has shape (n_sims, horizon), holds only finite
    // values, and is reproducible for a fixed seed.
    fn sim_forecast_shape_and_reproducibility() {
        // Arrange
        let shape = GasShape { ar: 1, sc: 1, integ: 0 };
        let parm = array![0.4, 0.2, 0.5, 1.0];
        let theta_in = array![0.6, 0.8, 0.9];
        let scores_in = array![0.1, -0.3, 0.2];
        let x_oos = intercept_rows(5);

        // Act
        let run = || {
            sim_forecast(
                &GasFamily::Normal,
                &shape,
                parm.view(),
                theta_in.view(),
                scores_in.view(),
                x_oos.view(),
                64,
                99,
            )
            .expect("simulation should succeed")
        };
        let a = run();
        let b = run();

        // Assert
        assert_eq!(a.dim(), (64, 5));
        assert!(a.iter().all(|v| v.is_finite()));
        assert_eq!(a, b);
    }

    #[test]
    // Purpose
    // -------
    // The Monte-Carlo trajectory mean tracks the deterministic mean path.
    //
    // Given
    // -----
    // - Normal family with (1, 1) dynamics, observation scale 0.5, and an
    //   in-sample score pool centered at zero (so resampled score terms are
    //   mean-zero, like the zeros the deterministic path uses).
    //
    // Expect
    // ------
    // - The per-step average over 4000 trajectories stays within 0.05 of the
    //   deterministic forecast at every horizon step.
    fn sim_forecast_mean_tracks_deterministic_path() {
        // Arrange
        let shape = GasShape { ar: 1, sc: 1, integ: 0 };
        let parm = array![0.4, 0.2, 0.5, 0.5];
        let theta_in = array![0.6, 0.8, 0.9, 1.0];
        let scores_in = array![0.2, -0.2, 0.1, -0.1];
        let x_oos = intercept_rows(4);

        // Act
        let means = mean_forecast(
            &GasFamily::Normal,
            &shape,
            parm.view(),
            theta_in.view(),
            scores_in.view(),
            x_oos.view(),
        );
        let sims = sim_forecast(
            &GasFamily::Normal,
            &shape,
            parm.view(),
            theta_in.view(),
            scores_in.view(),
            x_oos.view(),
            4000,
            31,
        )
        .expect("simulation should succeed");

        // Assert
        for step in 0..4 {
            let mc_mean = sims.column(step).mean().expect("non-empty column");
            assert!(
                (mc_mean - means[step]).abs() < 0.05,
                "step {step}: MC mean {mc_mean} vs deterministic {}",
                means[step]
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // percentile_sorted follows the linear-interpolation convention:
    // the 50th percentile of [1, 2, 3, 4] is 2.5 and extremes clamp to the
    // endpoints.
    fn percentile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile_sorted(&sorted, 50.0) - 2.5).abs() < 1e-12);
        assert!((percentile_sorted(&sorted, 0.0) - 1.0).abs() < 1e-12);
        assert!((percentile_sorted(&sorted, 100.0) - 4.0).abs() < 1e-12);
        assert!((percentile_sorted(&sorted, 25.0) - 1.75).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Band rows lead with a zero column and hold percentile offsets around
    // the mean path; the median row of a symmetric cloud sits near zero.
    fn summarize_intervals_layout_and_median() {
        // Arrange: degenerate cloud where every trajectory equals the mean.
        let sims = Array2::from_elem((10, 3), 2.0);
        let means = array![2.0, 2.0, 2.0];

        // Act
        let out = summarize_intervals(sims.view(), means.view());

        // Assert
        assert_eq!(out.bands.dim(), (BAND_PERCENTILES.len(), 4));
        for row in 0..BAND_PERCENTILES.len() {
            assert_eq!(out.bands[[row, 0]], 0.0);
            for t in 1..4 {
                assert!(out.bands[[row, t]].abs() < 1e-12);
            }
        }
        assert_eq!(out.percentiles.len(), 19);
    }
}
