//! High-level entry point for minimizing a user-provided `Objective` inside
//! a box.
//!
//! This validates and projects the starting point, builds a Nelder–Mead
//! simplex around it, wraps the objective in an `ArgMinAdapter` (projection
//! plus quadratic penalty), and delegates the run to `run_nelder_mead`.
use crate::optimization::{
    errors::OptResult,
    nll_optimizer::{
        adapter::ArgMinAdapter,
        builders::build_nelder_mead,
        run::run_nelder_mead,
        traits::{Bounds, NMOptions, Objective, OptimOutcome},
        types::Theta,
        validation::{validate_theta, validate_value},
    },
};

/// Minimize `f(θ)` subject to `θ ∈ bounds` with Nelder–Mead.
///
/// # Behavior
/// - Validates `x0` (length and finiteness), projects it into the box, and
///   calls `f.check` on the projected point.
/// - Builds the initial simplex (see `builders`) and runs the solver.
/// - Projects the best vertex into the box and re-evaluates `f` there, so
///   `value` is the objective at the reported `theta_hat` (no penalty).
///
/// # Errors
/// - Propagates option and parameter validation errors.
/// - Propagates any error from `f.check` or `f.value`.
/// - Propagates argmin runtime errors.
///
/// # Example
/// ```no_run
/// use ndarray::{Array1, array};
/// use rust_ddm::optimization::{
///     errors::OptResult,
///     nll_optimizer::{Bounds, NMOptions, Objective, minimize},
/// };
///
/// struct Bowl;
/// impl Objective for Bowl {
///     fn value(&self, theta: &Array1<f64>) -> OptResult<f64> {
///         Ok(theta.mapv(|x| (x - 0.3).powi(2)).sum())
///     }
///     fn check(&self, _: &Array1<f64>) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let bounds = Bounds::from_pairs(&[(0.0, 1.0), (0.0, 1.0)])?;
/// let out = minimize(&Bowl, array![0.9, 0.1], &bounds, &NMOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), rust_ddm::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: Objective>(
    f: &F, x0: Theta, bounds: &Bounds, opts: &NMOptions,
) -> OptResult<OptimOutcome> {
    opts.validate()?;
    validate_theta(&x0, bounds.len())?;
    let x0 = bounds.project(&x0);
    f.check(&x0)?;

    let solver = build_nelder_mead(&x0, bounds, opts)?;
    let problem = ArgMinAdapter::new(f, bounds);
    let mut outcome = run_nelder_mead(problem, solver, opts)?;

    outcome.theta_hat = bounds.project(&outcome.theta_hat);
    outcome.value = f.value(&outcome.theta_hat)?;
    validate_value(outcome.value)?;
    Ok(outcome)
}
