//! numerical_stability — numerically robust scalar transformations.
//!
//! Purpose
//! -------
//! Collect numerically stable scalar transforms used to map between the
//! optimizer's unconstrained space and strictly positive model parameters
//! (scales, degrees of freedom, skewness). Centralizing the guarded
//! implementations here lets the latent-variable and optimizer layers
//! assume well-conditioned `f64` arithmetic.
//!
//! Key behaviors
//! -------------
//! - Provide a stable softplus and its inverse for mapping unconstrained
//!   reals into strictly positive parameters without overflow/underflow.
//!
//! Invariants & assumptions
//! ------------------------
//! - All transforms assume finite `f64` inputs; domain and shape validation
//!   is enforced in the model and optimizer layers, not here.
//! - This module never logs, performs I/O, or touches global state; it is
//!   pure numerical helpers suitable for tight inner loops.
//!
//! Downstream usage
//! ----------------
//! - The latent-variable table uses these transforms to keep
//!   positive-domain parameters positive while L-BFGS explores ℝⁿ freely.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{safe_softplus, safe_softplus_inv};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{safe_softplus, safe_softplus_inv};
}
