//! nll_optimizer — bounded, derivative-free minimizer on top of argmin.
//!
//! Purpose
//! -------
//! Provide a small, argmin-backed layer for **minimizing** an objective such
//! as a negative log-likelihood inside a box. Callers implement
//! [`Objective`] and invoke [`minimize`] to run Nelder–Mead from a starting
//! point.
//!
//! Key behaviors
//! -------------
//! - Convert a user objective into an argmin `CostFunction` via
//!   [`adapter::ArgMinAdapter`], which projects parameters into the box and
//!   penalises the distance outside it.
//! - Build the initial simplex from the starting point and box widths
//!   ([`builders`]), run the solver ([`run::run_nelder_mead`]), and
//!   normalize the result into an [`OptimOutcome`].
//! - Centralize configuration ([`NMOptions`], [`Bounds`]) and validation
//!   ([`validation`]) so downstream code can assume sane, finite inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - The objective is only ever evaluated inside the box.
//! - No gradients are required; objectives may be noisy or piecewise
//!   constant (e.g. subsampled likelihoods with zero-likelihood trials
//!   dropped).
//! - Errors bubble up as [`OptResult<T>`](crate::optimization::errors::OptResult);
//!   this module never intentionally panics.
//!
//! Downstream usage
//! ----------------
//! - `estimation::fitting` implements [`Objective`] for its NLL objective
//!   and calls [`minimize`] from `fit`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover projection and penalty wiring ([`adapter`]), simplex
//!   geometry ([`builders`]), option and outcome invariants ([`traits`]),
//!   and end-to-end runs on toy bowls ([`api`]).

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{Bounds, NMOptions, Objective, OptimOutcome};
pub use self::types::{Cost, FnEvalMap, Theta};

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{Bounds, NMOptions, Objective, OptimOutcome};
    pub use super::types::{Cost, Theta};
}
