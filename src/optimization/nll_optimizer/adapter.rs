//! Adapter that exposes a user `Objective` as a bounded `argmin` problem.
//!
//! Nelder–Mead is unconstrained, so the adapter evaluates the objective at
//! the projection of `θ` into the box and adds a quadratic penalty on the
//! width-normalised distance outside it:
//! `c(θ) = f(P(θ)) + PENALTY_WEIGHT · Σ ((θ_i − P(θ)_i) / width_i)²`.
//! Inside the box `c = f`; outside, `c` grows with the violation so the
//! simplex is pushed back without the objective ever seeing an
//! out-of-bounds parameter.
use crate::optimization::{
    errors::OptError,
    nll_optimizer::{
        traits::{Bounds, Objective},
        types::{Cost, PENALTY_WEIGHT, Theta},
    },
};
use argmin::core::{CostFunction, Error};

/// Bridges a user [`Objective`] and its [`Bounds`] to `argmin`'s
/// `CostFunction`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
    pub bounds: &'a Bounds,
}

impl<'a, F: Objective> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the penalised cost.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the user's `value` via `?`.
    /// - Returns `NonFiniteCost` if the value is not finite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let projected = self.bounds.project(theta);
        let output = self.f.value(&projected)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(output + PENALTY_WEIGHT * self.bounds.excess_sq(theta))
    }
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, bounds: &'a Bounds) -> Self {
        Self { f, bounds }
    }
}
