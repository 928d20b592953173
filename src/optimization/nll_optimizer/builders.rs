//! nll_optimizer::builders — Nelder–Mead solver construction.
//!
//! Purpose
//! -------
//! Build the initial simplex around a starting point and wire the stopping
//! tolerance from [`NMOptions`] into argmin's `NelderMead`, so the runner
//! receives a fully configured solver.
//!
//! Key behaviors
//! -------------
//! - The simplex has `n + 1` vertices: `x0` and, for each coordinate `i`,
//!   `x0 + step_i · e_i` with `step_i = simplex_fraction · width_i`. If
//!   that vertex would leave the box, the step is taken downward instead.
//! - Zero-width coordinates still get a non-degenerate vertex; the adapter
//!   penalty keeps the search on the fixed value.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x0` lies inside the bounds (the API projects it first).
//! - Options were validated; argmin re-checks the tolerance and its error
//!   is surfaced as an [`OptError`](crate::optimization::errors::OptError).
use crate::optimization::{
    errors::OptResult,
    nll_optimizer::{
        traits::{Bounds, NMOptions},
        types::{NelderMeadSolver, Theta},
    },
};

/// Initial simplex vertices around `x0`.
pub fn initial_simplex(x0: &Theta, bounds: &Bounds, fraction: f64) -> Vec<Theta> {
    let mut simplex = Vec::with_capacity(x0.len() + 1);
    simplex.push(x0.clone());
    for i in 0..x0.len() {
        let width = bounds.width(i);
        let step = if width > 0.0 { fraction * width } else { fraction };
        let mut vertex = x0.clone();
        vertex[i] = if x0[i] + step <= bounds.upper()[i] || width == 0.0 {
            x0[i] + step
        } else {
            x0[i] - step
        };
        simplex.push(vertex);
    }
    simplex
}

/// build_nelder_mead — construct a Nelder–Mead solver around `x0`.
///
/// # Errors
/// `OptError` (via `From<argmin::core::Error>`) if argmin rejects the
/// simplex or the tolerance.
pub fn build_nelder_mead(x0: &Theta, bounds: &Bounds, opts: &NMOptions) -> OptResult<NelderMeadSolver> {
    let simplex = initial_simplex(x0, bounds, opts.simplex_fraction);
    let solver = NelderMeadSolver::new(simplex).with_sd_tolerance(opts.sd_tolerance)?;
    Ok(solver)
}
