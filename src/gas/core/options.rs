//! User-facing configuration for GAS-X estimation and forecasting.
//!
//! [`GasOptions`] bundles the optimizer settings with the simulation
//! settings so model constructors take a single options argument; both
//! halves fall back to defaults when omitted.
use crate::{
    gas::errors::{GasError, GasResult},
    optimization::loglik_optimizer::MLEOptions,
};

/// Default number of Monte-Carlo trajectories for interval forecasts.
pub const DEFAULT_N_SIMS: usize = 15_000;

/// Default base seed for simulation forecasting.
pub const DEFAULT_SIM_SEED: u64 = 42;

/// Simulation-forecast settings.
///
/// `seed` is a base value; each trajectory offsets it by its own index so
/// runs are reproducible for a fixed `(seed, n_sims)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimOptions {
    pub n_sims: usize,
    pub seed: u64,
}

impl SimOptions {
    /// Validated constructor.
    ///
    /// # Errors
    /// - [`GasError::InvalidSimCount`] when `n_sims` is zero.
    pub fn new(n_sims: usize, seed: u64) -> GasResult<Self> {
        if n_sims == 0 {
            return Err(GasError::InvalidSimCount { n_sims });
        }
        Ok(SimOptions { n_sims, seed })
    }
}

impl Default for SimOptions {
    fn default() -> Self {
        SimOptions { n_sims: DEFAULT_N_SIMS, seed: DEFAULT_SIM_SEED }
    }
}

/// Bundled estimation and forecasting options for a GAS-X model.
#[derive(Debug, Clone, PartialEq)]
pub struct GasOptions {
    /// Optimizer configuration (tolerances, line searcher, L-BFGS memory).
    pub mle_opts: MLEOptions,
    /// Monte-Carlo forecast configuration.
    pub sim: SimOptions,
}

impl GasOptions {
    /// Assemble options, substituting defaults for omitted halves.
    pub fn new(mle_options: Option<MLEOptions>, sim: Option<SimOptions>) -> Self {
        GasOptions {
            mle_opts: mle_options.unwrap_or_default(),
            sim: sim.unwrap_or_default(),
        }
    }
}

impl Default for GasOptions {
    fn default() -> Self {
        GasOptions::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Omitted halves fall back to the documented defaults.
    fn defaults_fill_omitted_halves() {
        let opts = GasOptions::new(None, None);
        assert_eq!(opts.sim.n_sims, DEFAULT_N_SIMS);
        assert_eq!(opts.sim.seed, DEFAULT_SIM_SEED);
    }

    #[test]
    // Purpose
    // -------
    // A zero trajectory count is rejected up front rather than surfacing as
    // an empty simulation matrix later.
    fn zero_sim_count_is_rejected() {
        let err = SimOptions::new(0, 7).unwrap_err();
        assert_eq!(err, GasError::InvalidSimCount { n_sims: 0 });
    }
}
