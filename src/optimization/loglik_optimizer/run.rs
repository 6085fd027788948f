//! Shared executor that runs an `argmin` solver on a wrapped
//! log-likelihood problem and normalizes the final state into an
//! [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Execute a configured solver against a log-likelihood problem.
///
/// This runner is shared by both line-search variants. It seeds the
/// iteration state with `theta0` (consumed), applies `opts.tols.max_iter`
/// when present, attaches a terminal observer when `opts.verbose` and the
/// `obs_slog` feature are both active, then runs the solver and converts
/// its state into an [`OptimOutcome`]. The best cost is negated back into
/// a log-likelihood value on the way out.
///
/// # Type Parameters
/// - `F`: the model implementing [`LogLikelihood`].
/// - `S`: any `argmin` solver whose problem is `ArgMinAdapter<'a, F>` and
///   whose `IterState` matches the crate aliases `Theta`/`Grad` with `f64`
///   floats. In practice this is L-BFGS from
///   [`build_optimizer_hager_zhang`](crate::optimization::loglik_optimizer::builders::build_optimizer_hager_zhang)
///   or
///   [`build_optimizer_more_thuente`](crate::optimization::loglik_optimizer::builders::build_optimizer_more_thuente).
///
/// # Errors
/// - Propagates `argmin` runtime errors (solver, observer, line-search
///   failures) via `From<argmin::core::Error>`.
/// - Propagates validation errors raised by [`OptimOutcome::new`] when the
///   solver produced no parameter vector or a non-finite best value.
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}

// ---- Helper Methods ----

/// One-shot pre-iteration log line: ℓ(θ₀) and, when computable, ||grad||.
#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let grad_norm = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: ell(theta0) = {:.6}{}",
        ll0,
        grad_norm.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
