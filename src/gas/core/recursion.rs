//! Score-driven filter recursion for GAS-X models.
//!
//! Implements the in-sample filtering pass that produces the latent predictor
//! path θ and the score-update series feeding it.
//!
//! ## Model convention
//! `θ_t = x_tᵀ β + Σ_{j=1..ar} φ_j θ_{t−j} + Σ_{i=1..sc} κ_i s_{t−i}`
//! with `s_t = score(y_t, link(θ_t))` from the observation family.
//!
//! ## Seeding
//! Pre-sample θ and score lags are zero, so early steps simply use truncated
//! lag windows (`min(t, ar)` and `min(t, sc)` terms).
//!
//! ## Ordering assumptions
//! θ and score buffers store the newest element at the end; lag windows are
//! taken as reversed tails (newest → oldest) so they align with the
//! coefficient vectors `[φ₁, …, φ_ar]` and `[κ₁, …, κ_sc]`.
use crate::gas::core::{families::GasFamily, nuisance::NuisanceParams, shape::GasShape};
use ndarray::{Array1, ArrayView1, ArrayView2, s};

/// Output of one filtering pass: the latent predictor path and the scores
/// that drove it. Both have the trimmed sample length.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutput {
    pub theta: Array1<f64>,
    pub scores: Array1<f64>,
}

/// Run the score-driven recursion over the trimmed sample.
///
/// `parm` is the **constrained** latent vector laid out as
/// `[φ₁..φ_ar | κ₁..κ_sc | β₁..β_k | nuisance...]`; `target` and `design`
/// are the trimmed observations and regressors, row-aligned.
///
/// Freshly allocates its output buffers, so a `&self` model can evaluate the
/// likelihood concurrently from several optimizer or simulation threads.
pub fn run_filter(
    family: &GasFamily, shape: &GasShape, target: ArrayView1<f64>, design: ArrayView2<f64>,
    parm: ArrayView1<f64>,
) -> FilterOutput {
    let n = target.len();
    let ar = shape.ar;
    let sc = shape.sc;
    let k = design.ncols();

    let ar_coeffs = parm.slice(s![0..ar]);
    let sc_coeffs = parm.slice(s![ar..ar + sc]);
    let betas = parm.slice(s![ar + sc..ar + sc + k]);
    let nuisance = NuisanceParams::resolve(family, parm);

    let mut theta = Array1::<f64>::zeros(n);
    let mut scores = Array1::<f64>::zeros(n);

    for t in 0..n {
        // truncated lag windows; pre-sample lags are zero
        let k_ar = ar.min(t);
        let k_sc = sc.min(t);

        let theta_tail_rev = theta.slice(s![t - k_ar..t; -1]);
        let score_tail_rev = scores.slice(s![t - k_sc..t; -1]);

        let new_theta = design.row(t).dot(&betas)
            + ar_coeffs.slice(s![0..k_ar]).dot(&theta_tail_rev)
            + sc_coeffs.slice(s![0..k_sc]).dot(&score_tail_rev);

        theta[t] = new_theta;
        scores[t] = family.score(target[t], family.link(new_theta), &nuisance);
    }

    FilterOutput { theta, scores }
}
