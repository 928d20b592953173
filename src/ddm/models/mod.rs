//! models — simulators and likelihoods for the DDM and the aDDM.
//!
//! Purpose
//! -------
//! Implement the two decision models on top of `ddm::core`: the base
//! drift-diffusion model ([`DDM`]) and the attentional variant ([`ADDM`]),
//! both exposed through the [`DecisionModel`] trait so drivers and the
//! likelihood engine can treat them uniformly.
//!
//! Key behaviors
//! -------------
//! - Simulate trials by stepping a Gaussian random walk until it crosses
//!   `±barrier`, reporting the side and the elapsed time.
//! - Score trials with the probability transfer algorithm in [`pta`],
//!   caching one transition kernel per distinct drift mean.
//! - Report non-terminating simulations as errors instead of truncating.
//!
//! Invariants & assumptions
//! ------------------------
//! - Models are immutable after construction and `Send + Sync`.
//! - Likelihoods are probabilities in `[0, 1]`; zero is a valid result.
//!
//! Downstream usage
//! ----------------
//! - `likelihood::LikelihoodEngine` maps `trial_likelihood` over batches.
//! - `estimation` drivers call `simulate_trial` with a seeded RNG and build
//!   grids of models keyed by [`DecisionModel::key`].
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each model; cross-model checks (aDDM with
//!   `theta = 1` matching the DDM) live in `addm`.

pub mod addm;
pub mod ddm;
pub mod pta;
pub mod traits;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::addm::ADDM;
pub use self::ddm::DDM;
pub use self::traits::DecisionModel;

pub mod prelude {
    pub use super::addm::ADDM;
    pub use super::ddm::DDM;
    pub use super::traits::DecisionModel;
}
