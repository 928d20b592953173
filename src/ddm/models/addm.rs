//! ADDM — the attentional drift-diffusion model.
//!
//! Purpose
//! -------
//! Simulate and score decisions whose drift depends on the currently
//! fixated item: `d · (vL − θ vR)` while looking left, `d · (θ vL − vR)`
//! while looking right, and zero during blank periods (latency and
//! transitions between fixations).
//!
//! Key behaviors
//! -------------
//! - [`ADDM::simulate_trial`] samples a schedule from the configured
//!   [`FixationDistribution`]: a blank latency, a first fixation whose side
//!   is drawn with `prob_left_first`, then alternating fixations separated
//!   by blank transitions. The recorded schedule holds the time actually
//!   spent in each entry (the last one cut at the decision), so durations
//!   sum to the reaction time.
//! - [`ADDM::trial_likelihood`] propagates mass through the observed
//!   schedule, `duration / time_step_ms` steps per entry, and reads the
//!   first-passage probability at the final step.
//!
//! Invariants & assumptions
//! ------------------------
//! - The schedule, not `rt_ms`, defines the time axis of the likelihood.
//! - `non_decision_ms` is not applied: blank entries already carry zero
//!   drift.
//! - Simulated entries last at least one step, so generation always makes
//!   progress toward the step budget.
//!
//! Testing notes
//! -------------
//! - Unit tests cover schedule consistency of simulated trials, the missing
//!   fixation errors, reduction to the DDM when `theta = 1`, and the effect
//!   of attention on the likelihood.
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::ddm::{
    core::{
        ADDMParams, Choice, FixationDistribution, FixationItem, FixationSchedule, ModelKey,
        ModelOpts, StateGrid, TrialRecord,
    },
    errors::{DDMError, DDMResult},
    models::{
        pta::{Segment, first_passage_probability},
        traits::DecisionModel,
    },
};

/// ADDM — attentional drift-diffusion model.
#[derive(Debug, Clone, PartialEq)]
pub struct ADDM {
    params: ADDMParams,
    opts: ModelOpts,
    grid: StateGrid,
}

impl ADDM {
    /// Build a model from validated parameters and options.
    ///
    /// `opts.sim.fixations` is only required for simulation; likelihood-only
    /// models (e.g. inside a fitting objective) may leave it empty.
    ///
    /// # Errors
    /// Any validation failure of `opts`.
    pub fn new(params: ADDMParams, opts: ModelOpts) -> DDMResult<Self> {
        opts.validate()?;
        let grid = StateGrid::new(opts.process.barrier, opts.likelihood.approx_state_step)?;
        Ok(Self { params, opts, grid })
    }

    pub fn params(&self) -> &ADDMParams {
        &self.params
    }

    fn mean_for(&self, item: FixationItem, value_left: f64, value_right: f64) -> f64 {
        match item {
            FixationItem::Blank => 0.0,
            FixationItem::Left => self.params.drift_left(value_left, value_right),
            FixationItem::Right => self.params.drift_right(value_left, value_right),
        }
    }

    fn fixation_distribution(&self) -> DDMResult<&FixationDistribution> {
        self.opts.sim.fixations.as_ref().ok_or(DDMError::MissingFixationDistribution)
    }
}

/// Evidence walk shared by all entries of one simulated schedule.
struct Walk<'a> {
    rdv: f64,
    steps: usize,
    barrier: f64,
    max_steps: usize,
    noise: &'a Normal<f64>,
}

impl Walk<'_> {
    /// Advance up to `steps` steps with drift `mean`; returns the steps
    /// taken and the choice if a barrier was crossed.
    fn run<R: Rng + ?Sized>(
        &mut self, mean: f64, steps: usize, rng: &mut R,
    ) -> Option<(usize, Option<Choice>)> {
        for taken in 1..=steps {
            if self.steps >= self.max_steps {
                return None;
            }
            self.steps += 1;
            self.rdv += mean + self.noise.sample(rng);
            if self.rdv >= self.barrier {
                return Some((taken, Some(Choice::Left)));
            }
            if self.rdv <= -self.barrier {
                return Some((taken, Some(Choice::Right)));
            }
        }
        Some((steps, None))
    }
}

impl DecisionModel for ADDM {
    fn key(&self) -> ModelKey {
        self.params.key()
    }

    fn opts(&self) -> &ModelOpts {
        &self.opts
    }

    fn simulate_trial<R: Rng + ?Sized>(
        &self, value_left: f64, value_right: f64, rng: &mut R,
    ) -> DDMResult<TrialRecord> {
        let dist = self.fixation_distribution()?;
        let process = &self.opts.process;
        let ts = process.time_step_ms;
        let noise = Normal::new(0.0, self.params.sigma)?;
        let non_termination = DDMError::SimulationNonTermination {
            value_left,
            value_right,
            max_steps: self.opts.sim.max_steps,
        };
        let mut walk = Walk {
            rdv: process.initial_value,
            steps: 0,
            barrier: process.barrier,
            max_steps: self.opts.sim.max_steps,
            noise: &noise,
        };
        let mut items = Vec::new();
        let mut durations = Vec::new();

        // Blank latency; skipped when shorter than one step.
        let latency_steps = process.steps_for(dist.sample_latency(rng)?);
        let mut decided = None;
        if latency_steps > 0 {
            let (taken, choice) =
                walk.run(0.0, latency_steps, rng).ok_or_else(|| non_termination.clone())?;
            items.push(FixationItem::Blank);
            durations.push(taken as u64 * ts);
            decided = choice;
        }

        let mut item = dist.sample_first_item(rng);
        let mut fix_number = 0usize;
        while decided.is_none() {
            let fix_steps = process.steps_for(dist.sample_fixation(fix_number, rng)?).max(1);
            let mean = self.mean_for(item, value_left, value_right);
            let (taken, choice) =
                walk.run(mean, fix_steps, rng).ok_or_else(|| non_termination.clone())?;
            items.push(item);
            durations.push(taken as u64 * ts);
            decided = choice;
            if decided.is_some() {
                break;
            }
            fix_number += 1;

            let transition_steps = process.steps_for(dist.sample_transition(rng)?);
            if transition_steps > 0 {
                let (taken, choice) =
                    walk.run(0.0, transition_steps, rng).ok_or_else(|| non_termination.clone())?;
                items.push(FixationItem::Blank);
                durations.push(taken as u64 * ts);
                decided = choice;
            }
            item = item.other();
        }

        let choice = decided.ok_or(non_termination)?;
        let schedule = FixationSchedule::new(items, durations)?;
        let rt_ms = schedule.total_ms();
        TrialRecord::with_fixations(value_left, value_right, choice, rt_ms, schedule)
    }

    fn trial_likelihood(&self, trial: &TrialRecord) -> DDMResult<f64> {
        trial.check_values()?;
        let schedule = trial.fixations.as_ref().ok_or(DDMError::MissingFixations)?;
        let process = &self.opts.process;
        let segments = schedule.iter().map(|(item, dur)| {
            Segment::new(self.mean_for(item, trial.value_left, trial.value_right), process.steps_for(dur))
        });
        first_passage_probability(
            &self.grid,
            self.params.sigma,
            process.initial_value,
            segments,
            trial.choice,
        )
    }
}
