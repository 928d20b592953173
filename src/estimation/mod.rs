//! estimation — drivers that tie models, likelihoods, and inference together.
//!
//! Purpose
//! -------
//! Provide the two end-to-end workflows of the crate:
//! - **Validation** ([`validation`]): simulate from a known model, score the
//!   batch under a candidate grid, and check that the posterior recovers the
//!   truth.
//! - **Fitting** ([`fitting`]): minimize a subsampled negative
//!   log-likelihood over observed subjects inside a parameter box.
//!
//! Key behaviors
//! -------------
//! - [`grid`] builds row-major Cartesian grids of DDM / aDDM models and
//!   rejects empty or duplicate grids.
//! - Both drivers take a serde/TOML-loadable config with documented
//!   defaults and log progress through `tracing`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every source of randomness is a seeded `StdRng`; equal configs give
//!   equal results regardless of the worker count.
//!
//! Downstream usage
//! ----------------
//! - The Python bindings expose `ddm_validation` and the fitting objective.
//! - Integration tests in `tests/` run both workflows end to end.

pub mod fitting;
pub mod grid;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::fitting::{
    FamilyModel, FitConfig, FitReport, FittingData, ModelFamily, NllObjective, Parity, fit,
};
pub use self::grid::{addm_grid, ddm_grid};
pub use self::validation::{
    ModelPosterior, ValidationConfig, ValidationReport, addm_validation, ddm_validation,
    run_validation, simulate_conditions,
};

pub mod prelude {
    pub use super::fitting::{FitConfig, FitReport, FittingData, ModelFamily, NllObjective, fit};
    pub use super::validation::{ValidationConfig, ValidationReport, run_validation};
}
