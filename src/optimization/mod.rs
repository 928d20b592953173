//! optimization — bounded minimizer and unified error surface.
//!
//! Purpose
//! -------
//! Provide the local search used to fit model parameters: an argmin-backed
//! Nelder–Mead minimizer with box constraints, plus a single error/result
//! surface. Callers implement an objective, choose options, and obtain
//! fitted parameters and diagnostics without touching solver details.
//!
//! Key behaviors
//! -------------
//! - Expose [`minimize`] over any [`Objective`] (`nll_optimizer`).
//! - Normalize configuration issues, numerical failures, backend solver
//!   errors, and model errors into [`OptError`] with the alias
//!   [`OptResult<T>`].
//!
//! Conventions
//! -----------
//! - Objectives are minimized directly; the fitting layer supplies a
//!   negative log-likelihood.
//! - Parameters are `ndarray` vectors (`Theta`) in model space.
//! - This module does no logging; the estimation layer reports progress.
//!
//! Downstream usage
//! ----------------
//! - `estimation::fitting::fit` wires the NLL objective into [`minimize`].
//! - Front-ends typically import `optimization::prelude::*`.

pub mod errors;
pub mod nll_optimizer;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{OptError, OptResult};
pub use self::nll_optimizer::{Bounds, NMOptions, Objective, OptimOutcome, minimize};

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::nll_optimizer::prelude::*;
}
