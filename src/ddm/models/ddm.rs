//! DDM — the base drift-diffusion model.
//!
//! Purpose
//! -------
//! Simulate and score two-alternative decisions under a constant-drift
//! diffusion: each `time_step_ms` step adds `N(d · (vL − vR), sigma)` to the
//! evidence until it reaches `±barrier`.
//!
//! Key behaviors
//! -------------
//! - [`DDM::simulate_trial`] walks the process from `initial_value`; the
//!   first `non_decision_ms / time_step_ms` steps carry zero drift. Upper
//!   crossings are `Choice::Left`, lower crossings `Choice::Right`, and the
//!   reaction time is `steps · time_step_ms`.
//! - [`DDM::trial_likelihood`] runs the probability transfer algorithm for
//!   `rt_ms / time_step_ms` steps with the same drift schedule and returns
//!   the first-passage probability through the chosen barrier on the last
//!   step.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters and options were validated at construction; the state grid
//!   is built once and shared by every likelihood call.
//! - Simulation and likelihood use the same step convention, so a simulated
//!   trial's reaction time is always scored at the step it was produced.
//!
//! Testing notes
//! -------------
//! - Unit tests cover non-termination, the direction of choices under strong
//!   drift, likelihood bounds, and the zero-step edge case.
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::ddm::{
    core::{Choice, DDMParams, ModelKey, ModelOpts, StateGrid, TrialRecord},
    errors::{DDMError, DDMResult},
    models::{
        pta::{Segment, first_passage_probability},
        traits::DecisionModel,
    },
};

/// DDM — drift-diffusion model with validated parameters and options.
#[derive(Debug, Clone, PartialEq)]
pub struct DDM {
    params: DDMParams,
    opts: ModelOpts,
    grid: StateGrid,
}

impl DDM {
    /// Build a model from validated parameters and options.
    ///
    /// # Errors
    /// Any validation failure of `opts` (see [`ModelOpts::validate`]).
    pub fn new(params: DDMParams, opts: ModelOpts) -> DDMResult<Self> {
        opts.validate()?;
        let grid = StateGrid::new(opts.process.barrier, opts.likelihood.approx_state_step)?;
        Ok(Self { params, opts, grid })
    }

    /// Build a model with default options from raw `(d, sigma)`.
    ///
    /// # Errors
    /// `InvalidParameter` if `(d, sigma)` are out of domain.
    pub fn with_defaults(d: f64, sigma: f64) -> DDMResult<Self> {
        Self::new(DDMParams::new(d, sigma)?, ModelOpts::default())
    }

    pub fn params(&self) -> &DDMParams {
        &self.params
    }

    fn segments(&self, value_left: f64, value_right: f64, total_steps: usize) -> [Segment; 2] {
        let ndt = self.opts.process.non_decision_steps().min(total_steps);
        [
            Segment::new(0.0, ndt),
            Segment::new(self.params.drift(value_left, value_right), total_steps - ndt),
        ]
    }
}

impl DecisionModel for DDM {
    fn key(&self) -> ModelKey {
        self.params.key()
    }

    fn opts(&self) -> &ModelOpts {
        &self.opts
    }

    fn simulate_trial<R: Rng + ?Sized>(
        &self, value_left: f64, value_right: f64, rng: &mut R,
    ) -> DDMResult<TrialRecord> {
        let process = &self.opts.process;
        let noise = Normal::new(0.0, self.params.sigma)?;
        let drift = self.params.drift(value_left, value_right);
        let ndt = process.non_decision_steps();
        let mut rdv = process.initial_value;

        for step in 1..=self.opts.sim.max_steps {
            let mean = if step <= ndt { 0.0 } else { drift };
            rdv += mean + noise.sample(rng);
            let choice = if rdv >= process.barrier {
                Choice::Left
            } else if rdv <= -process.barrier {
                Choice::Right
            } else {
                continue;
            };
            return TrialRecord::new(value_left, value_right, choice, step as u64 * process.time_step_ms);
        }
        Err(DDMError::SimulationNonTermination {
            value_left,
            value_right,
            max_steps: self.opts.sim.max_steps,
        })
    }

    fn trial_likelihood(&self, trial: &TrialRecord) -> DDMResult<f64> {
        trial.check_values()?;
        let total_steps = self.opts.process.steps_for(trial.rt_ms);
        first_passage_probability(
            &self.grid,
            self.params.sigma,
            self.opts.process.initial_value,
            self.segments(trial.value_left, trial.value_right, total_steps),
            trial.choice,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddm::core::{ProcessOpts, SimOpts};
    use rand::{SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Simulation: choice direction, RT granularity, non-termination.
    // - Likelihood: bounds, zero-step trials, and preference for the data
    //   generating model over a distant one.
    //
    // They intentionally DO NOT cover:
    // - Batch/parallel evaluation, tested in `likelihood::engine`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure strong positive drift mostly yields left choices with RTs on
    // the step grid.
    //
    // Given
    // -----
    // - d = 0.05, sigma = 0.05, values (1, 0), 200 simulated trials.
    //
    // Expect
    // ------
    // - At least 95% left choices; every RT is a positive multiple of 10 ms.
    fn strong_drift_chooses_left() {
        // Arrange
        let model = DDM::with_defaults(0.05, 0.05).expect("valid model");
        let mut rng = StdRng::seed_from_u64(42);

        // Act
        let trials: Vec<_> = (0..200)
            .map(|_| model.simulate_trial(1.0, 0.0, &mut rng).expect("terminates"))
            .collect();

        // Assert
        let left = trials.iter().filter(|t| t.choice == Choice::Left).count();
        assert!(left >= 190, "left choices = {left}");
        assert!(trials.iter().all(|t| t.rt_ms > 0 && t.rt_ms % 10 == 0));
    }

    #[test]
    // Purpose
    // -------
    // Verify that a tiny step budget reports non-termination with context.
    //
    // Given
    // -----
    // - d = 0, sigma = 0.001 (barrier practically unreachable), 50 steps.
    //
    // Expect
    // ------
    // - `SimulationNonTermination { max_steps: 50, .. }` carrying the values.
    fn exhausted_budget_reports_non_termination() {
        // Arrange
        let opts = ModelOpts::new(
            ProcessOpts::default(),
            SimOpts::new(50, None).expect("valid sim opts"),
            Default::default(),
        )
        .expect("valid options");
        let model = DDM::new(DDMParams::new(0.0, 0.001).expect("valid params"), opts)
            .expect("valid model");
        let mut rng = StdRng::seed_from_u64(1);

        // Act
        let err = model.simulate_trial(2.0, 3.0, &mut rng).expect_err("cannot terminate");

        // Assert
        assert_eq!(
            err,
            DDMError::SimulationNonTermination { value_left: 2.0, value_right: 3.0, max_steps: 50 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Check likelihood bounds on simulated data.
    //
    // Given
    // -----
    // - 50 trials simulated under d = 0.005, sigma = 0.07 for (0.5, 0.5).
    //
    // Expect
    // ------
    // - Every likelihood lies in [0, 1] and is finite.
    fn likelihoods_are_probabilities() {
        // Arrange
        let model = DDM::with_defaults(0.005, 0.07).expect("valid model");
        let mut rng = StdRng::seed_from_u64(3);

        // Act / Assert
        for _ in 0..50 {
            let trial = model.simulate_trial(0.5, 0.5, &mut rng).expect("terminates");
            let lik = model.trial_likelihood(&trial).expect("finite likelihood");
            assert!(lik.is_finite());
            assert!((0.0..=1.0).contains(&lik));
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure an RT shorter than one step has likelihood exactly 0.
    //
    // Given
    // -----
    // - A trial with `rt_ms = 5` and 10 ms steps.
    //
    // Expect
    // ------
    // - `trial_likelihood` returns `Ok(0.0)`.
    fn sub_step_rt_has_zero_likelihood() {
        // Arrange
        let model = DDM::with_defaults(0.005, 0.07).expect("valid model");
        let trial = TrialRecord::new(1.0, 0.0, Choice::Left, 5).expect("valid trial");

        // Act
        let lik = model.trial_likelihood(&trial).expect("no error");

        // Assert
        assert_eq!(lik, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify that a trial with public fields set to NaN fails cleanly.
    //
    // Given
    // -----
    // - A trial whose `value_left` was overwritten with NaN.
    //
    // Expect
    // ------
    // - `NonFiniteValue { name: "value_left", .. }`.
    fn nan_values_fail_likelihood() {
        // Arrange
        let model = DDM::with_defaults(0.005, 0.07).expect("valid model");
        let mut trial = TrialRecord::new(1.0, 0.0, Choice::Left, 500).expect("valid trial");
        trial.value_left = f64::NAN;

        // Act
        let err = model.trial_likelihood(&trial).expect_err("NaN value");

        // Assert
        assert!(matches!(err, DDMError::NonFiniteValue { name: "value_left", .. }));
    }

    #[test]
    // Purpose
    // -------
    // Check that non-decision time delays simulated decisions.
    //
    // Given
    // -----
    // - d = 0.2, sigma = 0.01 with 300 ms non-decision time.
    //
    // Expect
    // ------
    // - Every RT exceeds 300 ms, and a trial at exactly 300 ms is impossible
    //   under the likelihood (zero-drift steps cannot reach the barrier).
    fn non_decision_time_delays_responses() {
        // Arrange
        let opts = ModelOpts::new(
            ProcessOpts::new(10, 1.0, 300, 0.0).expect("valid process"),
            SimOpts::default(),
            Default::default(),
        )
        .expect("valid options");
        let model = DDM::new(DDMParams::new(0.2, 0.01).expect("valid params"), opts)
            .expect("valid model");
        let mut rng = StdRng::seed_from_u64(9);
        let early = TrialRecord::new(1.0, 0.0, Choice::Left, 300).expect("valid trial");

        // Act
        let rts: Vec<u64> = (0..20)
            .map(|_| model.simulate_trial(1.0, 0.0, &mut rng).expect("terminates").rt_ms)
            .collect();
        let lik = model.trial_likelihood(&early).expect("finite");

        // Assert
        assert!(rts.iter().all(|&rt| rt > 300));
        assert!(lik < 1e-12);
    }
}
