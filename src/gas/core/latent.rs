//! Latent-variable table for GAS-X models.
//!
//! The optimizer works in an unconstrained raw space; each latent variable
//! carries a [`Transform`] mapping raw values into its admissible domain.
//! Positive-domain latents (scales, degrees of freedom, skewness) use a
//! numerically safe softplus so the optimizer never has to respect a bound
//! itself.
use crate::{
    gas::errors::{GasError, GasResult},
    optimization::numerical_stability::transformations::{safe_softplus, safe_softplus_inv},
};
use ndarray::{Array1, ArrayView1};

/// Mapping between the optimizer's raw space and a latent's domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Unconstrained latent; raw and constrained values coincide.
    Identity,
    /// Strictly positive latent, constrained through softplus.
    Positive,
}

impl Transform {
    /// Raw → constrained.
    pub fn apply(&self, raw: f64) -> f64 {
        match self {
            Transform::Identity => raw,
            Transform::Positive => safe_softplus(raw),
        }
    }

    /// Constrained → raw. Inverse of [`Transform::apply`] on the latent's
    /// domain.
    pub fn inverse(&self, constrained: f64) -> f64 {
        match self {
            Transform::Identity => constrained,
            Transform::Positive => safe_softplus_inv(constrained),
        }
    }
}

/// One row of a model's latent table.
///
/// `start` is the raw-space starting value handed to the optimizer; `value`
/// holds the constrained estimate once the model has been fitted.
#[derive(Debug, Clone, PartialEq)]
pub struct LatentVariable {
    pub name: String,
    pub transform: Transform,
    pub start: f64,
    pub value: Option<f64>,
}

impl LatentVariable {
    /// Build a latent from its name, transform, and **constrained** starting
    /// value. The raw start is derived through the inverse transform.
    pub fn new(name: String, transform: Transform, start_constrained: f64) -> Self {
        LatentVariable { name, transform, start: transform.inverse(start_constrained), value: None }
    }
}

/// Map a raw latent vector through the table's transforms.
///
/// # Errors
/// - [`GasError::LatentLengthMismatch`] if `raw` and the table disagree.
/// - [`GasError::NonFiniteLatent`] on NaN/±inf raw entries.
pub fn constrain(latents: &[LatentVariable], raw: ArrayView1<f64>) -> GasResult<Array1<f64>> {
    if raw.len() != latents.len() {
        return Err(GasError::LatentLengthMismatch {
            expected: latents.len(),
            actual: raw.len(),
        });
    }
    if let Some((index, &value)) = raw.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(GasError::NonFiniteLatent { index, value });
    }
    Ok(raw
        .iter()
        .zip(latents.iter())
        .map(|(&r, lv)| lv.transform.apply(r))
        .collect())
}
