//! GAS-X model: latent table, likelihood, estimation, and forecasting.
//!
//! This module wires a GAS-X specification to the `LogLikelihood` trait. The
//! optimizer works in unconstrained raw space; the model's latent table maps
//! raw values into each parameter's domain (identity for dynamics and betas,
//! softplus for scales, degrees of freedom, and skewness), so no bound
//! handling leaks into the optimizer.
//!
//! Key ideas:
//! - The latent vector is laid out `[AR | SC | betas | nuisance...]`; the
//!   family's capability flags fix how many trailing nuisance entries exist.
//! - Likelihood evaluation is a fresh filtering pass over the trimmed
//!   sample; nothing is cached between evaluations, so a `&self` model can
//!   be evaluated from several threads at once.
//! - Regions where the likelihood is non-finite are reported to the
//!   optimizer as a large negative value rather than as an error, so line
//!   searches back off instead of aborting the fit.
use crate::{
    gas::{
        core::{
            data::GasData,
            families::GasFamily,
            forecasts::{IntervalBands, mean_forecast, sim_forecast, summarize_intervals},
            latent::{LatentVariable, Transform, constrain},
            nuisance::NuisanceParams,
            options::GasOptions,
            recursion::{FilterOutput, run_filter},
            shape::GasShape,
        },
        errors::{GasError, GasResult},
    },
    optimization::{
        errors::OptResult,
        loglik_optimizer::{LogLikelihood, OptimOutcome, Theta, maximize},
    },
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};

/// Log-likelihood value reported to the optimizer when the true value is
/// non-finite at the evaluated point.
const LOGLIK_FLOOR: f64 = -1e10;

/// Score-driven GAS-X model with exogenous regressors.
///
/// Owns its validated data, the latent-variable table derived from the shape
/// and family, and (after `fit`) the optimization outcome plus the
/// constrained parameter estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct GasXModel {
    /// Model order (AR lags, score lags, differencing).
    pub shape: GasShape,
    /// Observation family.
    pub family: GasFamily,
    /// Estimation and simulation options.
    pub options: GasOptions,
    /// Validated, trimmed data.
    pub data: GasData,
    /// Latent-variable table, ordered `[AR | SC | betas | nuisance...]`.
    pub latents: Vec<LatentVariable>,
    /// Fit results (populated after `fit`).
    pub results: Option<OptimOutcome>,
    /// Constrained parameter estimates (populated after `fit`).
    pub fitted_params: Option<Array1<f64>>,
}

impl GasXModel {
    /// Construct a GAS-X model, validating the data against the shape and
    /// building the latent table.
    ///
    /// `names` labels the design columns (padded with placeholders when
    /// shorter than the column count). The first beta's starting value is
    /// seeded from the mean of the differenced series through the family's
    /// mean transform; everything else starts at its neutral value.
    ///
    /// # Errors
    /// - Propagates every [`GasData::new`] validation failure.
    pub fn new(
        y: Array1<f64>, x: Array2<f64>, names: Vec<String>, shape: GasShape, family: GasFamily,
        options: GasOptions,
    ) -> GasResult<GasXModel> {
        let data = GasData::new(y, x, names, &shape)?;
        let latents = build_latents(&family, &shape, &data);
        Ok(GasXModel {
            shape,
            family,
            options,
            data,
            latents,
            results: None,
            fitted_params: None,
        })
    }

    /// Raw-space starting vector for the optimizer, read off the latent
    /// table.
    pub fn starting_values(&self) -> Array1<f64> {
        self.latents.iter().map(|lv| lv.start).collect()
    }

    /// Run the filter at a raw latent vector and return the θ and score
    /// paths.
    ///
    /// # Errors
    /// - [`GasError::LatentLengthMismatch`] / [`GasError::NonFiniteLatent`]
    ///   from constraining `raw`.
    pub fn evaluate(&self, raw: ArrayView1<f64>) -> GasResult<FilterOutput> {
        let parm = constrain(&self.latents, raw)?;
        Ok(run_filter(
            &self.family,
            &self.shape,
            self.data.target.view(),
            self.data.design.view(),
            parm.view(),
        ))
    }

    /// Negative log-likelihood at a raw latent vector.
    pub fn neg_loglik(&self, raw: ArrayView1<f64>) -> GasResult<f64> {
        let parm = constrain(&self.latents, raw)?;
        let out = run_filter(
            &self.family,
            &self.shape,
            self.data.target.view(),
            self.data.design.view(),
            parm.view(),
        );
        let nuisance = NuisanceParams::resolve(&self.family, parm.view());
        self.family.neg_loglikelihood(self.data.target.view(), out.theta.view(), &nuisance)
    }

    /// Fit by maximum likelihood and cache the outcome.
    ///
    /// Runs L-BFGS from [`GasXModel::starting_values`], stores the optimizer
    /// outcome in `self.results`, maps the raw optimum through the latent
    /// transforms into `self.fitted_params`, and writes each constrained
    /// estimate back into its latent-table row.
    ///
    /// # Errors
    /// - [`GasError::OptimizationFailed`] when the optimizer reports an
    ///   error (invalid starting point, line-search breakdown).
    pub fn fit(&mut self) -> GasResult<()> {
        let theta0 = self.starting_values();
        self.results = Some(maximize(self, theta0, &self.data, &self.options.mle_opts)?);
        let raw_hat = self
            .results
            .as_ref()
            .expect("stored on the previous line")
            .theta_hat
            .clone();
        let constrained = constrain(&self.latents, raw_hat.view())?;
        for (lv, &value) in self.latents.iter_mut().zip(constrained.iter()) {
            lv.value = Some(value);
        }
        self.fitted_params = Some(constrained);
        Ok(())
    }

    /// Constrained estimates paired with their latent names.
    ///
    /// # Errors
    /// - [`GasError::NotEstimated`] before `fit`.
    pub fn latent_values(&self) -> GasResult<Vec<(String, f64)>> {
        let parm = self.fitted_params.as_ref().ok_or(GasError::NotEstimated)?;
        Ok(self
            .latents
            .iter()
            .zip(parm.iter())
            .map(|(lv, &v)| (lv.name.clone(), v))
            .collect())
    }

    /// θ and score paths at the fitted parameters.
    pub fn fitted_filter(&self) -> GasResult<FilterOutput> {
        let parm = self.fitted_params.as_ref().ok_or(GasError::NotEstimated)?;
        Ok(run_filter(
            &self.family,
            &self.shape,
            self.data.target.view(),
            self.data.design.view(),
            parm.view(),
        ))
    }

    /// In-sample fitted observation means: the linked θ path, with the
    /// reciprocal applied for rate-parameterized families and the skew
    /// location shift added for skewed ones.
    pub fn fitted_values(&self) -> GasResult<Array1<f64>> {
        let parm = self.fitted_params.as_ref().ok_or(GasError::NotEstimated)?;
        let out = self.fitted_filter()?;
        let nuisance = NuisanceParams::resolve(&self.family, parm.view());
        let shift = self.family.skew_location_adjustment(&nuisance);
        Ok(out.theta.mapv(|th| {
            let driven = self.family.link(th);
            (if self.family.uses_reciprocal_link() { 1.0 / driven } else { driven }) + shift
        }))
    }

    /// In-sample residuals: trimmed observations minus fitted values.
    pub fn residuals(&self) -> GasResult<Array1<f64>> {
        let fitted = self.fitted_values()?;
        Ok(&self.data.target - &fitted)
    }

    /// Mean forecast `horizon` steps ahead using out-of-sample regressors.
    ///
    /// `x_oos` must have shape `(horizon, k)` with `k` the design column
    /// count.
    ///
    /// # Errors
    /// - [`GasError::NotEstimated`] before `fit`.
    /// - [`GasError::InvalidHorizon`] for a zero horizon.
    /// - [`GasError::ShapeMismatch`] when `x_oos` disagrees with
    ///   `(horizon, k)`.
    pub fn predict(&self, horizon: usize, x_oos: ArrayView2<f64>) -> GasResult<Array1<f64>> {
        let parm = self.fitted_params.as_ref().ok_or(GasError::NotEstimated)?;
        self.validate_oos(horizon, x_oos)?;
        let out = self.fitted_filter()?;
        Ok(mean_forecast(
            &self.family,
            &self.shape,
            parm.view(),
            out.theta.view(),
            out.scores.view(),
            x_oos,
        ))
    }

    /// Mean forecast plus simulation-based interval bands.
    ///
    /// Runs `options.sim.n_sims` Monte-Carlo trajectories and reduces them
    /// to percentile offsets around the mean path.
    pub fn predict_intervals(
        &self, horizon: usize, x_oos: ArrayView2<f64>,
    ) -> GasResult<(Array1<f64>, IntervalBands)> {
        let parm = self.fitted_params.as_ref().ok_or(GasError::NotEstimated)?;
        self.validate_oos(horizon, x_oos)?;
        let out = self.fitted_filter()?;
        let means = mean_forecast(
            &self.family,
            &self.shape,
            parm.view(),
            out.theta.view(),
            out.scores.view(),
            x_oos,
        );
        let sims = sim_forecast(
            &self.family,
            &self.shape,
            parm.view(),
            out.theta.view(),
            out.scores.view(),
            x_oos,
            self.options.sim.n_sims,
            self.options.sim.seed,
        )?;
        let bands = summarize_intervals(sims.view(), means.view());
        Ok((means, bands))
    }

    /// Rolling one-step-ahead predictions over the last `horizon` in-sample
    /// observations.
    ///
    /// For each step the model is re-estimated (or, with `fit_once`, fitted
    /// only on the first truncated sample and re-used) on data up to that
    /// point, and the next observation is predicted using its actual
    /// regressor row. Useful for out-of-sample evaluation without holding
    /// data back manually.
    ///
    /// # Errors
    /// - [`GasError::InvalidHorizon`] for a zero horizon.
    /// - [`GasError::InsufficientObservations`] when truncation leaves too
    ///   short a sample for the model order.
    pub fn predict_in_sample(&self, horizon: usize, fit_once: bool) -> GasResult<Array1<f64>> {
        if horizon == 0 {
            return Err(GasError::InvalidHorizon { horizon });
        }
        let n_raw = self.data.y.len();
        if horizon >= n_raw {
            return Err(GasError::InvalidHorizon { horizon });
        }
        let mut predictions = Array1::<f64>::zeros(horizon);
        let mut cached_raw: Option<Array1<f64>> = None;

        for step in 0..horizon {
            let len = n_raw - horizon + step;
            let sub_data = self.data.truncate(len, &self.shape)?;
            let raw_hat = match (&cached_raw, fit_once) {
                (Some(raw), true) => raw.clone(),
                _ => {
                    let mut sub_model = self.with_data(sub_data.clone());
                    sub_model.fit()?;
                    let raw = sub_model
                        .results
                        .as_ref()
                        .expect("populated by fit")
                        .theta_hat
                        .clone();
                    cached_raw = Some(raw.clone());
                    raw
                }
            };
            let parm = constrain(&self.latents, raw_hat.view())?;
            let out = run_filter(
                &self.family,
                &self.shape,
                sub_data.target.view(),
                sub_data.design.view(),
                parm.view(),
            );
            let x_next = self.data.x.slice(s![len..len + 1, ..]);
            let means = mean_forecast(
                &self.family,
                &self.shape,
                parm.view(),
                out.theta.view(),
                out.scores.view(),
                x_next,
            );
            predictions[step] = means[0];
        }
        Ok(predictions)
    }

    /// Clone of this model's configuration over a different data set, with
    /// a fresh latent table (starting values depend on the sample).
    fn with_data(&self, data: GasData) -> GasXModel {
        let latents = build_latents(&self.family, &self.shape, &data);
        GasXModel {
            shape: self.shape,
            family: self.family,
            options: self.options.clone(),
            data,
            latents,
            results: None,
            fitted_params: None,
        }
    }

    fn validate_oos(&self, horizon: usize, x_oos: ArrayView2<f64>) -> GasResult<()> {
        if horizon == 0 {
            return Err(GasError::InvalidHorizon { horizon });
        }
        let k = self.data.k();
        if x_oos.nrows() != horizon || x_oos.ncols() != k {
            return Err(GasError::ShapeMismatch {
                expected_rows: horizon,
                expected_cols: k,
                actual_rows: x_oos.nrows(),
                actual_cols: x_oos.ncols(),
            });
        }
        Ok(())
    }
}

/// Build the latent table `[AR | SC | betas | nuisance...]` for a family,
/// shape, and sample.
///
/// The first beta (by convention the intercept column) starts at the mean of
/// the differenced series pushed through the family's mean transform; a
/// non-finite seed (for example a log of a non-positive mean) falls back to
/// zero. Dynamics and remaining betas start at zero.
fn build_latents(family: &GasFamily, shape: &GasShape, data: &GasData) -> Vec<LatentVariable> {
    let mut latents = Vec::with_capacity(shape.ar + shape.sc + data.k() + 3);
    for j in 1..=shape.ar {
        latents.push(LatentVariable::new(format!("AR({j})"), Transform::Identity, 0.0));
    }
    for i in 1..=shape.sc {
        latents.push(LatentVariable::new(format!("SC({i})"), Transform::Identity, 0.0));
    }
    let sample_mean = data.diff_y.mean().expect("non-empty by GasData::new");
    for (col, name) in data.names.iter().enumerate() {
        let start = if col == 0 {
            let seeded = family.mean_transform(sample_mean);
            if seeded.is_finite() { seeded } else { 0.0 }
        } else {
            0.0
        };
        latents.push(LatentVariable::new(format!("Beta {name}"), Transform::Identity, start));
    }
    for (name, transform, start) in family.nuisance_latents() {
        latents.push(LatentVariable::new(name, transform, start));
    }
    latents
}

impl LogLikelihood for GasXModel {
    type Data = GasData;

    /// Log-likelihood at raw vector `θ`.
    ///
    /// Constrains `θ` through the latent table, runs the filter, and sums
    /// the family log-density. A non-finite value (overflowing exp link,
    /// degenerate nuisance region) is reported as [`LOGLIK_FLOOR`] so the
    /// line search treats the region as bad instead of aborting.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let parm = constrain(&self.latents, theta.view())?;
        let out = run_filter(
            &self.family,
            &self.shape,
            data.target.view(),
            data.design.view(),
            parm.view(),
        );
        let nuisance = NuisanceParams::resolve(&self.family, parm.view());
        let ll = match self.family.neg_loglikelihood(
            data.target.view(),
            out.theta.view(),
            &nuisance,
        ) {
            Ok(nll) => -nll,
            Err(_) => LOGLIK_FLOOR,
        };
        Ok(if ll.is_finite() { ll } else { LOGLIK_FLOOR })
    }

    /// Validate a raw vector: length must match the latent table and every
    /// entry must be finite.
    fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
        constrain(&self.latents, theta.view())?;
        Ok(())
    }
}
