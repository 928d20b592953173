//! Shared interface for decision models.
//!
//! [`DecisionModel`] is the seam between the model layer and everything that
//! consumes it: the validation driver simulates through it, the likelihood
//! engine scores through it, and grids are built from its keys.
use rand::Rng;

use crate::ddm::{
    core::{ModelOpts, ModelKey, TrialRecord},
    errors::DDMResult,
};

/// A parameterised two-boundary evidence accumulation model.
///
/// Implementors are immutable once constructed and must be `Send + Sync` so
/// one instance can be shared across likelihood workers.
///
/// Required:
/// - `key`: structural identity of the parameter tuple.
/// - `opts`: process, simulation, and likelihood options.
/// - `simulate_trial`: draw one trial for a pair of stimulus values.
/// - `trial_likelihood`: probability of an observed trial, in `[0, 1]`.
pub trait DecisionModel: Send + Sync {
    fn key(&self) -> ModelKey;

    fn opts(&self) -> &ModelOpts;

    /// Simulate one trial.
    ///
    /// # Errors
    /// `SimulationNonTermination` when no barrier is reached within
    /// `opts().sim.max_steps` steps, plus model-specific setup errors.
    fn simulate_trial<R: Rng + ?Sized>(
        &self, value_left: f64, value_right: f64, rng: &mut R,
    ) -> DDMResult<TrialRecord>;

    /// Likelihood of `trial` under this model.
    ///
    /// Zero is a legitimate outcome and never an error.
    ///
    /// # Errors
    /// Non-finite stimulus values, missing data the model needs, or
    /// non-finite intermediate values.
    fn trial_likelihood(&self, trial: &TrialRecord) -> DDMResult<f64>;
}
