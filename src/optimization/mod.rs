//! optimization — MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for model fitting, combining an
//! Argmin-backed log-likelihood optimizer, numerically stable parameter
//! transforms, and a single error/result surface. Callers implement a
//! log-likelihood, choose tolerances, and obtain fitted parameters and
//! diagnostics without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)`
//!   (`loglik_optimizer`), including configuration of solvers and stopping
//!   criteria.
//! - Supply shared numerical primitives (`numerical_stability`) for mapping
//!   unconstrained parameters into positive model space without overflow.
//! - Normalize configuration issues, numerical failures, model errors, and
//!   backend solver errors into a single enum (`errors::OptError`) with a
//!   common result alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained parameter space `θ` and assume
//!   that inputs are finite once validation has passed; invalid states are
//!   reported as `OptError`, not panics.
//! - Log-likelihood implementations are expected to treat domain violations
//!   (e.g., non-positive scales, invalid shape parameters) as recoverable
//!   errors surfaced through the optimization layer.
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize a log-likelihood `ℓ(θ)` by minimizing
//!   an internal cost `c(θ) = -ℓ(θ)`; user-facing APIs and outcomes are
//!   expressed in terms of `ℓ`.
//! - Parameters and gradients are represented using `ndarray`-based aliases
//!   (`Theta`, `Grad`); any mapping between unconstrained θ-space and
//!   structured model parameters (lag coefficients, scales, shapes) is
//!   handled by the model layer with `numerical_stability` helpers.
//! - Public optimization entrypoints that can fail return `OptResult<T>`;
//!   callers never see raw Argmin errors or model-specific error enums.
//! - This module and its submodules avoid I/O; optional progress output is
//!   gated behind the `obs_slog` feature and off by default.
//!
//! Downstream usage
//! ----------------
//! - Model code implements `LogLikelihood` for its types and calls
//!   `maximize` with a parameter guess, data payload, and `MLEOptions` to
//!   obtain an `OptimOutcome` (via `loglik_optimizer`).
//! - Score-driven model code uses `numerical_stability` for the softplus
//!   mapping between unconstrained latents and positive parameters.
//! - Front-ends typically import the curated surface via
//!   `optimization::prelude::*`, which forwards the submodule preludes and
//!   the core error types.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns:
//!   - `loglik_optimizer`: solver wiring, tolerance handling, and basic
//!     MLE behavior on toy models.
//!   - `numerical_stability`: agreement with naïve formulas on safe grids
//!     and well-behaved tails.
//! - Higher-level integration tests exercise end-to-end MLE workflows,
//!   verifying that configuration mistakes, numerical problems, and backend
//!   failures all surface as sensible `OptError` values and that successful
//!   runs produce stable `OptimOutcome`s.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use score_driven::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
