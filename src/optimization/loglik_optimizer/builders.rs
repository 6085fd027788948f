//! loglik_optimizer::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the L-BFGS solvers used by the
//! log-likelihood optimizer. These helpers hide Argmin's generic wiring and
//! apply crate-level options (tolerances, memory size) so that higher-level
//! code can request a configured solver without touching Argmin-specific
//! types.
//!
//! Conventions
//! -----------
//! - The builders do **not** set an initial parameter vector (`theta0`) or
//!   `max_iters`; those are runtime concerns applied by the runner
//!   (`run_lbfgs`).
//! - The L-BFGS memory (`m`) is either provided via `opts.lbfgs_mem` or
//!   defaults to [`DEFAULT_LBFGS_MEM`].
//! - Errors are always reported via [`OptResult`]; raw
//!   `argmin::core::Error` values never leak across module boundaries.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// Construct L-BFGS with a Hager–Zhang line search, applying any
/// tolerances from `opts`.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
///   tolerance setting.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with a More–Thuente line search, applying any
/// tolerances from `opts`.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
///   tolerance setting.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional tolerances from `opts` to an L-BFGS solver, regardless of
/// line-search type.
///
/// When a tolerance is `None`, the corresponding `with_tolerance_*` method
/// is not called and Argmin's defaults remain in effect.
///
/// # Errors
/// - `OptError` when `with_tolerance_grad` or `with_tolerance_cost`
///   rejects a tolerance.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::{LineSearcher, MLEOptions, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Basic construction of L-BFGS solvers with both line searches.
    // - Propagation of `lbfgs_mem` (Some vs None) into the builder paths.
    // - Application of gradient and cost tolerances via `configure_lbfgs`.
    //
    // They intentionally DO NOT cover end-to-end executor behavior, which
    // is exercised through `maximize` by the model integration tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Builders succeed with the crate default L-BFGS memory when
    // `opts.lbfgs_mem` is `None`.
    //
    // Given
    // -----
    // - Valid `Tolerances` and `lbfgs_mem = None`.
    //
    // Expect
    // ------
    // - Both builders return `Ok(_)`.
    fn builders_use_default_memory_when_none() {
        // Arrange
        let tols =
            Tolerances::new(Some(1e-6), Some(1e-8), Some(50)).expect("Tolerances should be valid");
        let hz = MLEOptions::new(tols, LineSearcher::HagerZhang, None)
            .expect("MLEOptions should be valid");
        let mt = MLEOptions::new(tols, LineSearcher::MoreThuente, None)
            .expect("MLEOptions should be valid");

        // Act / Assert
        assert!(build_optimizer_hager_zhang(&hz).is_ok());
        assert!(build_optimizer_more_thuente(&mt).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Builders accept an explicit L-BFGS memory value.
    //
    // Given
    // -----
    // - Valid `Tolerances` and `lbfgs_mem = Some(11)`.
    //
    // Expect
    // ------
    // - Both builders return `Ok(_)`.
    fn builders_respect_explicit_memory() {
        // Arrange
        let tols = Tolerances::new(Some(1e-6), None, Some(25)).expect("Tolerances should be valid");
        let hz = MLEOptions::new(tols, LineSearcher::HagerZhang, Some(11))
            .expect("MLEOptions should be valid");
        let mt = MLEOptions::new(tols, LineSearcher::MoreThuente, Some(9))
            .expect("MLEOptions should be valid");

        // Act / Assert
        assert!(build_optimizer_hager_zhang(&hz).is_ok());
        assert!(build_optimizer_more_thuente(&mt).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `configure_lbfgs` applies tolerances without error when both are
    // present and valid, and succeeds when both are absent (Argmin
    // defaults remain in effect).
    fn configure_lbfgs_handles_present_and_absent_tolerances() {
        // Arrange
        let full = Tolerances::new(Some(1e-6), Some(1e-8), Some(100))
            .expect("Tolerances should be valid");
        let sparse = Tolerances::new(None, None, Some(50)).expect("Tolerances should be valid");
        let with_tols = MLEOptions::new(full, LineSearcher::HagerZhang, Some(DEFAULT_LBFGS_MEM))
            .expect("MLEOptions should be valid");
        let without_tols = MLEOptions::new(sparse, LineSearcher::MoreThuente, None)
            .expect("MLEOptions should be valid");

        // Act
        let configured_full =
            configure_lbfgs(LBFGS::new(HagerZhangLS::new(), DEFAULT_LBFGS_MEM), &with_tols);
        let configured_sparse =
            configure_lbfgs(LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM), &without_tols);

        // Assert
        assert!(configured_full.is_ok());
        assert!(configured_sparse.is_ok());
    }
}
