//! ddm::core::options — process, simulation, and likelihood configuration.
//!
//! Purpose
//! -------
//! Collect the numerical knobs shared by the simulator and the probability
//! transfer likelihood in one place, so that a model simulates and scores
//! trials under the same time step, barrier, and starting point.
//!
//! Key behaviors
//! -------------
//! - [`ProcessOpts`] describes the evidence process itself: time step,
//!   barrier height, non-decision time, and starting value.
//! - [`SimOpts`] adds simulation-only settings: the step budget and the
//!   fixation distribution used by attentional simulation.
//! - [`LikelihoodOpts`] adds likelihood-only settings: the approximate
//!   spacing of the discretised evidence grid.
//! - [`ModelOpts`] bundles the three and is what model constructors accept.
//!
//! Invariants & assumptions
//! ------------------------
//! - `time_step_ms ≥ 1`, `barrier > 0`, `approx_state_step > 0`,
//!   `max_steps ≥ 1`, and `|initial_value| < barrier` after
//!   [`ModelOpts::validate`].
//! - Non-decision time is expressed in milliseconds and converted to whole
//!   time steps by integer division.
//!
//! Conventions
//! -----------
//! - All option types derive `serde::{Serialize, Deserialize}` with field
//!   defaults, so a partial TOML table fills in the documented defaults.
//!
//! Testing notes
//! -------------
//! - Unit tests check documented defaults, validation failures, and that a
//!   partial TOML table deserialises with defaults filled in.
use serde::{Deserialize, Serialize};

use crate::ddm::{
    core::{fixations::FixationDistribution, states::state_count, validation::positive_option},
    errors::{DDMError, DDMResult},
};

/// Default simulation and likelihood time step (ms).
pub const DEFAULT_TIME_STEP_MS: u64 = 10;
/// Default barrier height.
pub const DEFAULT_BARRIER: f64 = 1.0;
/// Default approximate spacing of the likelihood state grid.
pub const DEFAULT_APPROX_STATE_STEP: f64 = 0.1;
/// Default simulation step budget.
pub const DEFAULT_MAX_STEPS: usize = 100_000;

fn default_time_step_ms() -> u64 {
    DEFAULT_TIME_STEP_MS
}

fn default_barrier() -> f64 {
    DEFAULT_BARRIER
}

fn default_approx_state_step() -> f64 {
    DEFAULT_APPROX_STATE_STEP
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

/// ProcessOpts — shape of the evidence accumulation process.
///
/// Fields
/// ------
/// - `time_step_ms`: duration of one accumulation step (default 10 ms).
/// - `barrier`: symmetric decision boundary `±barrier` (default 1.0).
/// - `non_decision_ms`: leading period during which the drift is zero and
///   only noise accumulates (default 0).
/// - `initial_value`: starting evidence (default 0.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessOpts {
    #[serde(default = "default_time_step_ms")]
    pub time_step_ms: u64,
    #[serde(default = "default_barrier")]
    pub barrier: f64,
    #[serde(default)]
    pub non_decision_ms: u64,
    #[serde(default)]
    pub initial_value: f64,
}

impl ProcessOpts {
    /// Build validated process options.
    ///
    /// # Errors
    /// - [`DDMError::InvalidOption`] if `time_step_ms == 0`, `barrier` is not
    ///   strictly positive and finite, or `initial_value` is non-finite or
    ///   not strictly inside `(-barrier, barrier)`.
    pub fn new(
        time_step_ms: u64, barrier: f64, non_decision_ms: u64, initial_value: f64,
    ) -> DDMResult<Self> {
        let opts = Self { time_step_ms, barrier, non_decision_ms, initial_value };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> DDMResult<()> {
        if self.time_step_ms == 0 {
            return Err(DDMError::InvalidOption {
                name: "time_step_ms",
                value: 0.0,
                reason: "must be at least 1 ms",
            });
        }
        positive_option("barrier", self.barrier)?;
        if !self.initial_value.is_finite() || self.initial_value.abs() >= self.barrier {
            return Err(DDMError::InvalidOption {
                name: "initial_value",
                value: self.initial_value,
                reason: "must lie strictly between the barriers",
            });
        }
        Ok(())
    }

    /// Whole time steps covered by `duration_ms`.
    #[inline]
    pub fn steps_for(&self, duration_ms: u64) -> usize {
        (duration_ms / self.time_step_ms) as usize
    }

    /// Whole time steps of non-decision time.
    #[inline]
    pub fn non_decision_steps(&self) -> usize {
        self.steps_for(self.non_decision_ms)
    }
}

impl Default for ProcessOpts {
    fn default() -> Self {
        Self {
            time_step_ms: DEFAULT_TIME_STEP_MS,
            barrier: DEFAULT_BARRIER,
            non_decision_ms: 0,
            initial_value: 0.0,
        }
    }
}

/// SimOpts — simulation-only settings.
///
/// Fields
/// ------
/// - `max_steps`: step budget before a trial is declared non-terminating.
/// - `fixations`: distribution used to sample fixation schedules for the
///   attentional model; ignored by the base DDM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimOpts {
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default)]
    pub fixations: Option<FixationDistribution>,
}

impl SimOpts {
    pub fn new(max_steps: usize, fixations: Option<FixationDistribution>) -> DDMResult<Self> {
        let opts = Self { max_steps, fixations };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> DDMResult<()> {
        if self.max_steps == 0 {
            return Err(DDMError::InvalidOption {
                name: "max_steps",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if let Some(dist) = &self.fixations {
            dist.validate()?;
        }
        Ok(())
    }
}

impl Default for SimOpts {
    fn default() -> Self {
        Self { max_steps: DEFAULT_MAX_STEPS, fixations: None }
    }
}

/// LikelihoodOpts — discretisation of the evidence grid.
///
/// Fields
/// ------
/// - `approx_state_step`: target spacing between grid states; the actual
///   spacing is adjusted so the grid is symmetric and fills
///   `(-barrier, barrier)` exactly (default 0.1). Together with the
///   barrier it must give at most `MAX_STATES` states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodOpts {
    #[serde(default = "default_approx_state_step")]
    pub approx_state_step: f64,
}

impl LikelihoodOpts {
    pub fn new(approx_state_step: f64) -> DDMResult<Self> {
        positive_option("approx_state_step", approx_state_step)?;
        Ok(Self { approx_state_step })
    }
}

impl Default for LikelihoodOpts {
    fn default() -> Self {
        Self { approx_state_step: DEFAULT_APPROX_STATE_STEP }
    }
}

/// ModelOpts — everything a model needs besides its parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOpts {
    #[serde(default)]
    pub process: ProcessOpts,
    #[serde(default)]
    pub sim: SimOpts,
    #[serde(default)]
    pub likelihood: LikelihoodOpts,
}

impl ModelOpts {
    pub fn new(process: ProcessOpts, sim: SimOpts, likelihood: LikelihoodOpts) -> DDMResult<Self> {
        let opts = Self { process, sim, likelihood };
        opts.validate()?;
        Ok(opts)
    }

    /// Validate all three components; used after deserialisation.
    pub fn validate(&self) -> DDMResult<()> {
        self.process.validate()?;
        self.sim.validate()?;
        state_count(self.process.barrier, self.likelihood.approx_state_step)?;
        Ok(())
    }

    /// Replace the fixation distribution used for attentional simulation.
    pub fn with_fixations(mut self, fixations: FixationDistribution) -> Self {
        self.sim.fixations = Some(fixations);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Documented defaults.
    // - Validation of process and simulation options.
    // - Partial TOML tables filling in defaults.
    //
    // They intentionally DO NOT cover:
    // - Fixation distribution validation, tested in `fixations`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure defaults match the documented values.
    //
    // Given
    // -----
    // - `ModelOpts::default()`.
    //
    // Expect
    // ------
    // - 10 ms steps, barrier 1, state step 0.1, 100 000 step budget, no
    //   fixation distribution, and the defaults validate.
    fn defaults_match_documentation() {
        // Act
        let opts = ModelOpts::default();

        // Assert
        assert_eq!(opts.process.time_step_ms, 10);
        assert_eq!(opts.process.barrier, 1.0);
        assert_eq!(opts.process.non_decision_ms, 0);
        assert_eq!(opts.likelihood.approx_state_step, 0.1);
        assert_eq!(opts.sim.max_steps, 100_000);
        assert!(opts.sim.fixations.is_none());
        assert!(opts.validate().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Ensure option validation rejects grids above the state cap, so model
    // constructors return an error instead of panicking.
    //
    // Given
    // -----
    // - Default options with `approx_state_step = 1e-300`, then 1e-4.
    //
    // Expect
    // ------
    // - `ModelOpts::validate` and `DDM::new` return `InvalidOption` for
    //   `approx_state_step`.
    fn state_grid_cap_is_enforced() {
        // Arrange
        let tiny = ModelOpts {
            likelihood: LikelihoodOpts { approx_state_step: 1e-300 },
            ..ModelOpts::default()
        };
        let fine = ModelOpts {
            likelihood: LikelihoodOpts { approx_state_step: 1e-4 },
            ..ModelOpts::default()
        };
        let params = crate::ddm::core::DDMParams::new(0.005, 0.07).expect("valid params");

        // Act
        let validated = tiny.validate().expect_err("grid above the cap");
        let built = crate::ddm::models::DDM::new(params, fine).expect_err("grid above the cap");

        // Assert
        assert!(matches!(validated, DDMError::InvalidOption { name: "approx_state_step", .. }));
        assert!(matches!(built, DDMError::InvalidOption { name: "approx_state_step", .. }));
    }

    #[test]
    // Purpose
    // -------
    // Check rejection of degenerate process options.
    //
    // Given
    // -----
    // - A zero time step, a negative barrier, and a start on the barrier.
    //
    // Expect
    // ------
    // - Each is rejected with `InvalidOption` naming the field.
    fn process_options_are_validated() {
        // Act
        let zero_step = ProcessOpts::new(0, 1.0, 0, 0.0).expect_err("zero step");
        let bad_barrier = ProcessOpts::new(10, -1.0, 0, 0.0).expect_err("negative barrier");
        let on_barrier = ProcessOpts::new(10, 1.0, 0, 1.0).expect_err("start on barrier");

        // Assert
        assert!(matches!(zero_step, DDMError::InvalidOption { name: "time_step_ms", .. }));
        assert!(matches!(bad_barrier, DDMError::InvalidOption { name: "barrier", .. }));
        assert!(matches!(on_barrier, DDMError::InvalidOption { name: "initial_value", .. }));
    }

    #[test]
    // Purpose
    // -------
    // Verify step conversion uses integer division.
    //
    // Given
    // -----
    // - 10 ms steps with a 255 ms non-decision time.
    //
    // Expect
    // ------
    // - 25 non-decision steps; 9 ms maps to 0 steps.
    fn step_conversion_truncates() {
        // Arrange
        let opts = ProcessOpts::new(10, 1.0, 255, 0.0).expect("valid options");

        // Assert
        assert_eq!(opts.non_decision_steps(), 25);
        assert_eq!(opts.steps_for(9), 0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a partial TOML table fills the remaining fields with defaults.
    //
    // Given
    // -----
    // - A document overriding only `process.barrier` and `sim.max_steps`.
    //
    // Expect
    // ------
    // - Overridden fields take the new values; everything else is default.
    fn partial_toml_uses_defaults() {
        // Arrange
        let doc = "[process]\nbarrier = 2.0\n\n[sim]\nmax_steps = 500\n";

        // Act
        let opts: ModelOpts = toml::from_str(doc).expect("document parses");

        // Assert
        assert_eq!(opts.process.barrier, 2.0);
        assert_eq!(opts.process.time_step_ms, 10);
        assert_eq!(opts.sim.max_steps, 500);
        assert_eq!(opts.likelihood, LikelihoodOpts::default());
    }
}
