//! models — user-facing GAS-X model API.
//!
//! Purpose
//! -------
//! Wire the core primitives (data, families, filter, forecasts) into the
//! estimable [`GasXModel`]: latent-table construction, MLE in unconstrained
//! space through the crate's optimizer layer, and the prediction surface
//! (mean forecasts, simulation intervals, rolling in-sample prediction).

pub mod gasx;

pub use self::gasx::GasXModel;
