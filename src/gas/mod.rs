//! gas — score-driven (GAS-X) time-series stack: core numerics, models, and
//! errors.
//!
//! Purpose
//! -------
//! Provide a cohesive GAS-X layer bundling data and family primitives, the
//! score-driven filter, model-level fitting / forecasting, and shared error
//! types under a single namespace. This is the main entry point for
//! score-driven models in the crate, and the surface Python bindings depend
//! on.
//!
//! Key behaviors
//! -------------
//! - Collect the numerical and structural building blocks in [`core`]:
//!   validated data containers, model orders, observation families, latent
//!   tables, the filter recursion, and forecasting routines.
//! - Expose the user-facing model API in [`models`] via [`GasXModel`]:
//!   MLE in unconstrained latent space, in-sample evaluation, mean and
//!   simulation-based forecasting, and rolling in-sample prediction.
//! - Centralize GAS-specific errors in [`errors`] (`GasError` and the
//!   `GasResult` alias) so callers see a uniform error surface.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; series store the oldest observation first.
//! - Optimization runs in unconstrained raw space; the latent table's
//!   transforms map raw values into each parameter's domain.
//! - The stack performs no I/O and no logging of its own; optimizer progress
//!   logging is opt-in through the `obs_slog` feature at the optimization
//!   layer.
//!
//! Downstream usage
//! ----------------
//! - Typical end-to-end flow:
//!   1. Build a [`GasShape`] against the raw sample length.
//!   2. Construct [`GasData`] from the series and design matrix.
//!   3. Pick a [`GasFamily`] and assemble [`GasOptions`].
//!   4. Create a [`GasXModel`], call `fit`, then `predict` /
//!      `predict_intervals` / `predict_in_sample`.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    GasData, GasFamily, GasOptions, GasShape, IntervalBands, LatentVariable, SimOptions,
    Transform,
};

pub use self::errors::{GasError, GasResult};

pub use self::models::GasXModel;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::{
        GasData, GasError, GasFamily, GasOptions, GasResult, GasShape, GasXModel, IntervalBands,
        LatentVariable, SimOptions, Transform,
    };
}
