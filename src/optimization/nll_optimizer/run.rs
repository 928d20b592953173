//! Execution helper that runs Nelder–Mead on a bounded problem and returns a
//! crate-friendly [`OptimOutcome`].
use argmin::core::{Executor, State};

use crate::optimization::{
    errors::OptResult,
    nll_optimizer::{
        adapter::ArgMinAdapter,
        traits::{NMOptions, Objective, OptimOutcome},
        types::NelderMeadSolver,
    },
};

/// Run a configured Nelder–Mead solver on `problem`.
///
/// The simplex already carries the starting point, so only the iteration cap
/// is applied to the executor state. The reported `theta_hat` is the raw
/// best vertex; the API layer projects it into the bounds.
///
/// # Errors
/// - Propagates any `argmin` runtime error, including objective failures
///   raised inside the cost function, via `From<argmin::core::Error>`.
/// - Propagates validation errors from [`OptimOutcome::new`].
pub fn run_nelder_mead<F: Objective>(
    problem: ArgMinAdapter<'_, F>, solver: NelderMeadSolver, opts: &NMOptions,
) -> OptResult<OptimOutcome> {
    let max_iter = opts.max_iter as u64;
    let optimizer = Executor::new(problem, solver).configure(|state| state.max_iters(max_iter));

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    OptimOutcome::new(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
    )
}
