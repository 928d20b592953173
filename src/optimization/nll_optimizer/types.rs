//! nll_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and the solver alias used by the bounded
//! minimizer so the rest of the optimizer stays agnostic to `ndarray` and
//! argmin generics.
//!
//! Conventions
//! -----------
//! - `Theta` is the parameter vector in model space (e.g. `(d, theta, mu)`);
//!   there is no unconstrained reparameterisation, box constraints are
//!   handled by the adapter.
//! - `Cost` is the value being minimized, a negative log-likelihood for the
//!   fitting objective.
use argmin::solver::neldermead::NelderMead;
use ndarray::Array1;
use std::collections::HashMap;

/// Parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Scalar objective value being minimized.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Nelder–Mead simplex solver over this crate's numeric types.
pub type NelderMeadSolver = NelderMead<Theta, Cost>;

/// Default initial simplex step as a fraction of each coordinate's box width.
pub const DEFAULT_SIMPLEX_FRACTION: f64 = 0.05;

/// Default stopping tolerance on the standard deviation of simplex costs.
pub const DEFAULT_SD_TOLERANCE: f64 = 1e-3;

/// Default iteration cap.
pub const DEFAULT_MAX_ITER: usize = 200;

/// Weight of the quadratic penalty on width-normalised distance outside the box.
pub const PENALTY_WEIGHT: f64 = 1e4;
