//! core — shared GAS-X data, families, and score-driven recursions.
//!
//! Purpose
//! -------
//! Collect the building blocks for score-driven (GAS-X) time-series models:
//! data containers, model orders, observation families, latent-variable
//! tables, nuisance resolution, the in-sample filter, and out-of-sample
//! forecasting. The model layer and Python bindings build on top of these
//! primitives.
//!
//! Key behaviors
//! -------------
//! - Define model configuration types ([`GasShape`], [`GasOptions`],
//!   [`SimOptions`]) and the validated data container ([`GasData`]) that
//!   applies differencing and lag trimming once at construction.
//! - Encapsulate observation densities in [`GasFamily`]: links, scores,
//!   negative log-likelihoods, and samplers, with capability flags driving
//!   the trailing nuisance layout resolved by [`NuisanceParams`].
//! - Implement the score-driven recursion ([`run_filter`]) and the
//!   forecasting pass ([`mean_forecast`], [`sim_forecast`],
//!   [`summarize_intervals`]).
//! - Map the optimizer's raw space into latent domains via [`Transform`]
//!   and the [`LatentVariable`] table.
//!
//! Invariants & assumptions
//! ------------------------
//! - Observations and design entries stored in [`GasData`] are finite and
//!   row-aligned; the trimmed sample holds at least two observations.
//! - The constrained latent vector is laid out as
//!   `[ar lags | score lags | betas | nuisance...]`; nuisance parameters are
//!   resolved strictly by trailing position.
//! - Pre-sample θ and score lags are zero; early filter steps use truncated
//!   lag windows rather than special seeding policies.
//! - This module performs no I/O; error conditions are surfaced as
//!   [`GasResult`](crate::gas::errors::GasResult), panics are reserved for
//!   logic bugs such as slicing with an unvalidated latent vector.
//!
//! Downstream usage
//! ----------------
//! - Build a [`GasShape`] and [`GasData`], pick a [`GasFamily`], then
//!   construct a `GasXModel` from `gas::models` and fit / forecast through
//!   its methods; most callers never touch the recursion directly.

pub mod data;
pub mod families;
pub mod forecasts;
pub mod latent;
pub mod nuisance;
pub mod options;
pub mod recursion;
pub mod shape;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::GasData;
pub use self::families::GasFamily;
pub use self::forecasts::{
    BAND_PERCENTILES, FORECAST_SCORE, IntervalBands, mean_forecast, sim_forecast,
    summarize_intervals,
};
pub use self::latent::{LatentVariable, Transform, constrain};
pub use self::nuisance::NuisanceParams;
pub use self::options::{DEFAULT_N_SIMS, DEFAULT_SIM_SEED, GasOptions, SimOptions};
pub use self::recursion::{FilterOutput, run_filter};
pub use self::shape::GasShape;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use score_driven::gas::core::prelude::*;
//
// to import the main GAS-X core surface in a single line.

pub mod prelude {
    pub use super::data::GasData;
    pub use super::families::GasFamily;
    pub use super::forecasts::{IntervalBands, mean_forecast, sim_forecast, summarize_intervals};
    pub use super::latent::{LatentVariable, Transform};
    pub use super::nuisance::NuisanceParams;
    pub use super::options::{GasOptions, SimOptions};
    pub use super::recursion::{FilterOutput, run_filter};
    pub use super::shape::GasShape;
}
