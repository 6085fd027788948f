//! Integration tests for GAS-X score-driven models.
//!
//! Purpose
//! -------
//! - Validate the end-to-end GAS-X pipeline: from validated data, through
//!   model construction and MLE fitting, to fitted values, residuals, and
//!   mean/interval/rolling forecasts.
//! - Exercise realistic configurations (lag orders, observation families,
//!   optimizer settings) rather than toy edge cases only.
//!
//! Coverage
//! --------
//! - `gas::core`:
//!   - `GasData` construction against a validated `GasShape`.
//!   - Latent-table layout `[AR | SC | betas | nuisance...]` across
//!     families.
//! - `gas::models::gasx::GasXModel`:
//!   - Construction, fitting, fitted values, residuals, and all three
//!     prediction surfaces.
//! - `optimization::loglik_optimizer`:
//!   - Use of L-BFGS + line search via `MLEOptions` and `Tolerances`.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of low-level building blocks (the filter
//!   recursion, score formulas, softplus transforms) — these are covered
//!   by unit tests.
//! - Python bindings and user-facing API wrappers — those are expected to
//!   be tested at a higher integration or system level.
//! - Exhaustive stress testing over extreme sample sizes and parameter
//!   grids — those belong in targeted performance and property tests.
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng, distributions::Distribution, rngs::StdRng};
use statrs::distribution::Normal;
use score_driven::{
    gas::{
        core::{
            families::GasFamily,
            options::{GasOptions, SimOptions},
            shape::GasShape,
        },
        errors::GasError,
        models::gasx::GasXModel,
    },
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
};

/// Purpose
/// -------
/// Simulate an autoregressive series with two exogenous drivers,
/// returning `(y, x)` where `x` carries an intercept column plus the two
/// regressors.
///
/// Data-generating process
/// -----------------------
/// - `y_t = 0.9 · y_{t-1} + 0.1 · x1_t − 0.3 · x2_t + ε_t` with
///   `ε_t ~ N(0, 0.25)`.
/// - `x1_t` is a slow sinusoid, `x2_t` is standard normal noise, both
///   generated from the same seeded RNG so tests are reproducible.
///
/// Returns
/// -------
/// - `y`: length-`n` observation vector.
/// - `x`: `(n, 3)` design matrix with columns `[1, x1, x2]`.
fn simulate_arx(n: usize, seed: u64) -> (Array1<f64>, Array2<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.5).expect("valid normal parameters");

    let mut y = Array1::<f64>::zeros(n);
    let mut x = Array2::<f64>::zeros((n, 3));
    let mut prev = 0.0;
    for t in 0..n {
        let x1 = (t as f64 / 12.0).sin();
        let x2: f64 = noise.sample(&mut rng);
        x[[t, 0]] = 1.0;
        x[[t, 1]] = x1;
        x[[t, 2]] = x2;
        let eps: f64 = noise.sample(&mut rng);
        let value = 0.9 * prev + 0.1 * x1 - 0.3 * x2 + eps;
        y[t] = value;
        prev = value;
    }
    (y, x)
}

/// Column labels matching the `simulate_arx` design.
fn design_names() -> Vec<String> {
    vec!["Constant".to_string(), "x1".to_string(), "x2".to_string()]
}

/// Purpose
/// -------
/// Provide a stable baseline `GasOptions` configuration for integration
/// tests that should reflect "typical" user settings.
///
/// Configuration
/// -------------
/// - Optimizer tolerances (`Tolerances`):
///   - `tol_grad = Some(1e-5)`, `tol_cost = None`, `max_iter = Some(200)`.
/// - Optimizer (`MLEOptions`):
///   - Line search: `LineSearcher::MoreThuente`, default L-BFGS memory.
/// - Simulation (`SimOptions`):
///   - A reduced trajectory count (500) with a fixed seed, to keep the
///     interval-forecast tests fast while staying statistically stable.
fn default_gas_options() -> GasOptions {
    let tols = Tolerances::new(Some(1e-5), None, Some(200))
        .expect("Tolerances::new should accept positive tolerances");
    let mle_opts = MLEOptions::new(tols, LineSearcher::MoreThuente, None)
        .expect("MLEOptions::new should succeed with reasonable tolerances");
    let sim = SimOptions::new(500, 7).expect("SimOptions::new should accept a positive count");
    GasOptions::new(Some(mle_opts), Some(sim))
}

/// Purpose
/// -------
/// Wire together simulated data, shape validation, model construction,
/// and MLE fitting into a single step for integration tests.
///
/// Returns
/// -------
/// - `(model, x)` where `model` is a fitted `GasXModel` over the
///   simulated sample and `x` is the full design matrix (useful for
///   slicing out-of-sample regressor rows).
fn fit_normal_gasx(ar: usize, sc: usize, n: usize, seed: u64) -> (GasXModel, Array2<f64>) {
    let (y, x) = simulate_arx(n, seed);
    let shape = GasShape::new(ar, sc, 0, n).expect("GasShape::new should accept small lag orders");
    let mut model = GasXModel::new(
        y,
        x.clone(),
        design_names(),
        shape,
        GasFamily::Normal,
        default_gas_options(),
    )
    .expect("GasXModel::new should succeed on simulated data");
    model.fit().expect("fit should succeed on a well-behaved Normal sample");
    (model, x)
}

#[test]
// Purpose
// -------
// Ensure the full Normal GAS-X pipeline runs end to end: fitting
// converges, the latent table has the expected layout, fitted values and
// residuals are finite and aligned, and mean forecasts are finite.
//
// Given
// -----
// - A simulated ARX series with `n = 250` and three design columns.
// - Shape (ar, sc) = (1, 1) and the Normal family.
//
// Expect
// ------
// - `fit` succeeds and the optimizer reports a finite best value.
// - Latent count is `ar + sc + k + 1 = 6` with the documented ordering.
// - Fitted values and residuals have length `n_effective` and are finite.
// - A 5-step mean forecast is finite.
fn normal_gasx_pipeline_fits_and_forecasts() {
    let n = 250;
    let horizon = 5;
    let (model, x) = fit_normal_gasx(1, 1, n, 42);

    let results = model.results.as_ref().expect("results populated by fit");
    assert!(results.value.is_finite());
    assert!(results.iterations > 0);

    let latents = model.latent_values().expect("latent values after fit");
    assert_eq!(latents.len(), 6);
    assert_eq!(latents[0].0, "AR(1)");
    assert_eq!(latents[1].0, "SC(1)");
    assert_eq!(latents[2].0, "Beta Constant");
    assert_eq!(latents[5].0, "Normal scale");
    // The scale passed through softplus must be strictly positive.
    assert!(latents[5].1 > 0.0);

    let fitted = model.fitted_values().expect("fitted values after fit");
    let resid = model.residuals().expect("residuals after fit");
    assert_eq!(fitted.len(), model.data.n_effective());
    assert_eq!(resid.len(), fitted.len());
    assert!(fitted.iter().chain(resid.iter()).all(|v| v.is_finite()));

    // Reuse the tail of the design as stand-in out-of-sample regressors.
    let x_oos = x.slice(ndarray::s![n - horizon.., ..]).to_owned();
    let means = model.predict(horizon, x_oos.view()).expect("mean forecast after fit");
    assert_eq!(means.len(), horizon);
    assert!(means.iter().all(|v| v.is_finite()));
}

#[test]
// Purpose
// -------
// Check that maximum likelihood recovers the data-generating dynamics:
// the AR(1) latent should land near the true persistence and the `x1`
// coefficient near its true loading, within a wide tolerance that leaves
// room for sampling noise and score-term absorption.
//
// Given
// -----
// - The simulated ARX series (`n = 250`, true AR 0.9, true x1 loading
//   0.1, true x2 loading −0.3) and a fitted Normal (1, 1) model.
//
// Expect
// ------
// - `AR(1)` within 0.2 of 0.9.
// - `Beta x1` within 0.2 of 0.1.
// - `Beta x2` estimated with the correct (negative) sign.
fn fitted_latents_recover_generating_dynamics() {
    let n = 250;
    let (model, _x) = fit_normal_gasx(1, 1, n, 42);
    let latents = model.latent_values().expect("latent values after fit");

    let ar_1 = latents[0].1;
    let beta_x1 = latents[3].1;
    let beta_x2 = latents[4].1;
    assert_eq!(latents[0].0, "AR(1)");
    assert_eq!(latents[3].0, "Beta x1");
    assert_eq!(latents[4].0, "Beta x2");

    assert!((ar_1 - 0.9).abs() < 0.2, "AR(1) estimate {ar_1} too far from 0.9");
    assert!((beta_x1 - 0.1).abs() < 0.2, "x1 loading {beta_x1} too far from 0.1");
    assert!(beta_x2 < 0.0, "x2 loading {beta_x2} should be negative");
}

#[test]
// Purpose
// -------
// Verify the simulation-based interval forecast: band matrix shape, the
// zero anchor column, finiteness, and monotonicity of the percentile
// offsets at each step.
//
// Given
// -----
// - A fitted Normal GAS-X model with (ar, sc) = (1, 1) on `n = 250`.
// - Horizon `h = 4` with design rows reused as out-of-sample regressors.
//
// Expect
// ------
// - `predict_intervals` returns the same mean path as `predict`.
// - The band matrix has shape `(19, h + 1)` with an all-zero first
//   column.
// - Within each later column, offsets are non-decreasing from the 5th to
//   the 95th percentile.
fn interval_forecast_bands_are_anchored_and_ordered() {
    let n = 250;
    let horizon = 4;
    let (model, x) = fit_normal_gasx(1, 1, n, 99);
    let x_oos = x.slice(ndarray::s![n - horizon.., ..]).to_owned();

    let means = model.predict(horizon, x_oos.view()).expect("mean forecast");
    let (interval_means, bands) =
        model.predict_intervals(horizon, x_oos.view()).expect("interval forecast");

    assert_eq!(interval_means, means);
    assert_eq!(bands.percentiles.len(), 19);
    assert_eq!(bands.bands.dim(), (19, horizon + 1));
    assert!(bands.bands.column(0).iter().all(|&v| v == 0.0));
    assert!(bands.bands.iter().all(|v| v.is_finite()));

    for t in 1..=horizon {
        let col = bands.bands.column(t);
        for i in 1..col.len() {
            assert!(
                col[i] >= col[i - 1],
                "percentile offsets must be non-decreasing within a step"
            );
        }
    }
}

#[test]
// Purpose
// -------
// Exercise the rolling in-sample prediction path, both re-fitting per
// step and with the single-fit shortcut.
//
// Given
// -----
// - A simulated ARX series with `n = 220` and (ar, sc) = (1, 1).
// - A rolling window of `h = 3` held-back observations.
//
// Expect
// ------
// - Both `fit_once = true` and `fit_once = false` produce length-`h`
//   vectors of finite predictions.
fn rolling_predictions_cover_heldback_tail() {
    let n = 220;
    let horizon = 3;
    let (model, _x) = fit_normal_gasx(1, 1, n, 7);

    let cached = model.predict_in_sample(horizon, true).expect("rolling predictions (single fit)");
    assert_eq!(cached.len(), horizon);
    assert!(cached.iter().all(|v| v.is_finite()));

    let refit = model.predict_in_sample(horizon, false).expect("rolling predictions (re-fit)");
    assert_eq!(refit.len(), horizon);
    assert!(refit.iter().all(|v| v.is_finite()));
}

#[test]
// Purpose
// -------
// Smoke-test the count-data path: a Poisson GAS-X model fits on
// synthetic counts and produces strictly positive fitted means and
// forecasts (the exp link drives the intensity).
//
// Given
// -----
// - Counts with a weekly-style cycle plus seeded noise, `n = 180`.
// - Shape (ar, sc) = (1, 1) and the Poisson family.
//
// Expect
// ------
// - `fit` succeeds; fitted values and a 5-step forecast are finite and
//   strictly positive.
fn poisson_gasx_fits_count_data() {
    let n = 180;
    let horizon = 5;
    let mut rng = StdRng::seed_from_u64(13);
    let y = Array1::from_iter((0..n).map(|t| {
        let level = 3.0 + 2.0 * ((t % 7) as f64 / 6.0);
        (level + rng.gen_range(0..3) as f64).round()
    }));
    let mut x = Array2::<f64>::zeros((n, 2));
    x.column_mut(0).fill(1.0);
    for t in 0..n {
        x[[t, 1]] = ((t % 7) as f64 / 6.0) - 0.5;
    }

    let shape = GasShape::new(1, 1, 0, n).expect("valid shape");
    let mut model = GasXModel::new(
        y,
        x.clone(),
        vec!["Constant".to_string(), "dow".to_string()],
        shape,
        GasFamily::Poisson,
        default_gas_options(),
    )
    .expect("Poisson model construction should succeed");
    model.fit().expect("Poisson fit should succeed on cyclical counts");

    let fitted = model.fitted_values().expect("fitted intensities");
    assert!(fitted.iter().all(|v| v.is_finite() && *v > 0.0));

    let x_oos = x.slice(ndarray::s![n - horizon.., ..]).to_owned();
    let means = model.predict(horizon, x_oos.view()).expect("Poisson forecast");
    assert!(means.iter().all(|v| v.is_finite() && *v > 0.0));
}

#[test]
// Purpose
// -------
// Smoke-test the heavy-tailed path: a Student-t GAS-X model fits the
// same ARX sample and reports a positive scale and degrees of freedom.
//
// Given
// -----
// - The simulated ARX series with `n = 250`.
// - Shape (ar, sc) = (1, 1) and the Student-t family.
//
// Expect
// ------
// - `fit` succeeds; the trailing two latents (scale then degrees of
//   freedom) are strictly positive after the softplus mapping.
fn student_t_gasx_reports_positive_nuisance() {
    let n = 250;
    let (y, x) = simulate_arx(n, 314);
    let shape = GasShape::new(1, 1, 0, n).expect("valid shape");
    let mut model = GasXModel::new(
        y,
        x,
        design_names(),
        shape,
        GasFamily::StudentT,
        default_gas_options(),
    )
    .expect("Student-t model construction should succeed");
    model.fit().expect("Student-t fit should succeed");

    let latents = model.latent_values().expect("latent values after fit");
    // [AR | SC | 3 betas | scale | df]
    assert_eq!(latents.len(), 7);
    let scale = latents[5].1;
    let df = latents[6].1;
    assert!(scale > 0.0);
    assert!(df > 0.0);
}

#[test]
// Purpose
// -------
// Confirm the guard rails around prediction: unfitted models refuse to
// forecast, and fitted models reject mis-shaped out-of-sample designs
// and zero horizons.
//
// Given
// -----
// - An unfitted and a fitted Normal GAS-X model on the same sample.
//
// Expect
// ------
// - `predict` on the unfitted model returns `GasError::NotEstimated`.
// - `predict` with a wrong column count returns
//   `GasError::ShapeMismatch` carrying the expected and actual
//   dimensions.
// - A zero horizon returns `GasError::InvalidHorizon`.
fn prediction_guards_reject_bad_inputs() {
    let n = 200;
    let (y, x) = simulate_arx(n, 5);
    let shape = GasShape::new(1, 1, 0, n).expect("valid shape");
    let unfitted = GasXModel::new(
        y,
        x,
        design_names(),
        shape,
        GasFamily::Normal,
        default_gas_options(),
    )
    .expect("model construction should succeed");

    let x_oos = Array2::<f64>::ones((3, 3));
    assert_eq!(unfitted.predict(3, x_oos.view()).unwrap_err(), GasError::NotEstimated);

    let (fitted, _x) = fit_normal_gasx(1, 1, n, 5);
    let bad_cols = Array2::<f64>::ones((3, 2));
    assert_eq!(
        fitted.predict(3, bad_cols.view()).unwrap_err(),
        GasError::ShapeMismatch {
            expected_rows: 3,
            expected_cols: 3,
            actual_rows: 3,
            actual_cols: 2
        }
    );
    let empty = Array2::<f64>::ones((0, 3));
    assert_eq!(
        fitted.predict(0, empty.view()).unwrap_err(),
        GasError::InvalidHorizon { horizon: 0 }
    );
}
