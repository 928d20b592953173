//! estimation::validation — parameter recovery on synthetic data.
//!
//! Purpose
//! -------
//! Check that the likelihood and posterior machinery can recover a known
//! model: simulate trials from a ground-truth model, score them under every
//! model of a candidate grid, fold the likelihoods into a posterior, and
//! report where the posterior mass ends up.
//!
//! Key behaviors
//! -------------
//! - [`ValidationConfig`] holds the run settings (trials per condition,
//!   worker count, seed, conditions, zero threshold, model options) and can
//!   be loaded from TOML.
//! - [`simulate_conditions`] generates `trials_per_condition` trials for each
//!   condition in order. A failing trial is logged with its condition and
//!   trial index and propagated as [`DDMError::SimulationFailed`]; no
//!   placeholder trial is substituted.
//! - [`run_validation`] builds the likelihood table on a
//!   [`LikelihoodEngine`], folds it into a uniform
//!   [`PosteriorDistribution`], and returns a serialisable
//!   [`ValidationReport`].
//! - [`ddm_validation`] / [`addm_validation`] build the truth model and the
//!   Cartesian grid from raw parameter ranges.
//!
//! Invariants & assumptions
//! ------------------------
//! - Simulation is sequential from one seeded `StdRng`, so a config fully
//!   determines the trial batch.
//! - The report lists the posterior in grid order.
//!
//! Testing notes
//! -------------
//! - Unit tests use small batches; the full 800-trials-per-condition recovery
//!   run lives in `tests/validation_recovery.rs`.
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    ddm::{
        core::{ADDMParams, DDMParams, ModelKey, ModelOpts, TrialRecord, validation::non_negative_param},
        errors::{DDMError, DDMResult},
        models::{ADDM, DDM, DecisionModel},
    },
    estimation::grid::{addm_grid, ddm_grid},
    inference::{FoldSummary, PosteriorDistribution},
    likelihood::LikelihoodEngine,
};

pub const DEFAULT_TRIALS_PER_CONDITION: usize = 800;
pub const DEFAULT_SEED: u64 = 42;

fn default_trials_per_condition() -> usize {
    DEFAULT_TRIALS_PER_CONDITION
}

fn default_workers() -> usize {
    rayon::current_num_threads().max(1)
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_conditions() -> Vec<(f64, f64)> {
    vec![(1.0, 0.0), (0.0, 1.0), (0.5, 0.5)]
}

/// ValidationConfig — settings for one recovery run.
///
/// Fields
/// ------
/// - `trials_per_condition`: simulated trials per `(valueLeft, valueRight)`
///   pair (default 800).
/// - `workers`: likelihood worker threads (default: rayon's thread count).
/// - `seed`: seed for the simulation RNG (default 42).
/// - `conditions`: ordered stimulus pairs (default `[(1,0), (0,1), (0.5,0.5)]`).
/// - `zero_threshold`: posterior skip threshold (default exact zero).
/// - `model`: options shared by the truth model and every grid model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_trials_per_condition")]
    pub trials_per_condition: usize,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_conditions")]
    pub conditions: Vec<(f64, f64)>,
    #[serde(default)]
    pub zero_threshold: f64,
    #[serde(default)]
    pub model: ModelOpts,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            trials_per_condition: DEFAULT_TRIALS_PER_CONDITION,
            workers: default_workers(),
            seed: DEFAULT_SEED,
            conditions: default_conditions(),
            zero_threshold: 0.0,
            model: ModelOpts::default(),
        }
    }
}

impl ValidationConfig {
    /// Parse and validate a TOML document; missing keys take their defaults.
    ///
    /// # Errors
    /// - [`DDMError::Config`] for malformed TOML.
    /// - Any error from [`ValidationConfig::validate`].
    pub fn from_toml_str(s: &str) -> DDMResult<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// - [`DDMError::InvalidOption`] if `trials_per_condition == 0`.
    /// - [`DDMError::InvalidWorkerCount`] if `workers == 0`.
    /// - [`DDMError::EmptyConditions`] / [`DDMError::NonFiniteValue`] for
    ///   bad conditions.
    /// - [`DDMError::InvalidParameter`] for a negative zero threshold.
    /// - Any [`ModelOpts::validate`] failure.
    pub fn validate(&self) -> DDMResult<()> {
        if self.trials_per_condition == 0 {
            return Err(DDMError::InvalidOption {
                name: "trials_per_condition",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if self.workers == 0 {
            return Err(DDMError::InvalidWorkerCount { workers: 0 });
        }
        if self.conditions.is_empty() {
            return Err(DDMError::EmptyConditions);
        }
        for &(value_left, value_right) in &self.conditions {
            if !value_left.is_finite() {
                return Err(DDMError::NonFiniteValue { name: "value_left", value: value_left });
            }
            if !value_right.is_finite() {
                return Err(DDMError::NonFiniteValue { name: "value_right", value: value_right });
            }
        }
        non_negative_param("zero_threshold", self.zero_threshold)?;
        self.model.validate()
    }
}

/// Posterior probability of one grid model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelPosterior {
    pub model: ModelKey,
    pub probability: f64,
}

/// ValidationReport — outcome of one recovery run.
///
/// Fields
/// ------
/// - `truth`: key of the generating model.
/// - `n_trials`: simulated batch size.
/// - `posteriors`: per-model posterior in grid order.
/// - `posterior_sum`: Σ posterior (1 up to rounding).
/// - `map_model` / `map_probability`: arg-max of the posterior.
/// - `summary`: applied and skipped trial counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub truth: ModelKey,
    pub n_trials: usize,
    pub posteriors: Vec<ModelPosterior>,
    pub posterior_sum: f64,
    pub map_model: ModelKey,
    pub map_probability: f64,
    pub summary: FoldSummary,
}

impl ValidationReport {
    pub fn posterior(&self, key: &ModelKey) -> Option<f64> {
        self.posteriors.iter().find(|p| p.model == *key).map(|p| p.probability)
    }

    /// `true` if the MAP model is the generating model.
    pub fn recovered(&self) -> bool {
        self.map_model == self.truth
    }
}

/// Simulate `n` trials per condition from `truth`, conditions in order.
///
/// # Errors
/// [`DDMError::SimulationFailed`] for the first trial that fails, carrying
/// the condition index, trial index within the condition, and stimulus
/// values.
pub fn simulate_conditions<M, R>(
    truth: &M, conditions: &[(f64, f64)], n: usize, rng: &mut R,
) -> DDMResult<Vec<TrialRecord>>
where
    M: DecisionModel,
    R: Rng + ?Sized,
{
    let mut trials = Vec::with_capacity(conditions.len() * n);
    for (condition_index, &(value_left, value_right)) in conditions.iter().enumerate() {
        for trial_index in 0..n {
            let trial = truth.simulate_trial(value_left, value_right, rng).map_err(|source| {
                error!(
                    model = %truth.key(),
                    condition_index,
                    trial_index,
                    value_left,
                    value_right,
                    error = %source,
                    "simulation failed"
                );
                DDMError::SimulationFailed {
                    condition_index,
                    trial_index,
                    value_left,
                    value_right,
                    source: Box::new(source),
                }
            })?;
            trials.push(trial);
        }
    }
    Ok(trials)
}

/// Run one recovery: simulate from `truth`, score under `grid`, fold.
///
/// # Errors
/// - Any [`ValidationConfig::validate`] failure.
/// - [`DDMError::EmptyGrid`] / [`DDMError::DuplicateModel`] for a bad grid.
/// - [`DDMError::SimulationFailed`] or
///   [`DDMError::LikelihoodComputationFailure`] from the pipeline.
pub fn run_validation<T, M>(truth: &T, grid: &[M], cfg: &ValidationConfig) -> DDMResult<ValidationReport>
where
    T: DecisionModel,
    M: DecisionModel,
{
    cfg.validate()?;
    let keys: Vec<ModelKey> = grid.iter().map(DecisionModel::key).collect();
    let mut posterior =
        PosteriorDistribution::uniform(keys)?.with_zero_threshold(cfg.zero_threshold)?;
    info!(
        truth = %truth.key(),
        grid = grid.len(),
        conditions = cfg.conditions.len(),
        trials_per_condition = cfg.trials_per_condition,
        workers = cfg.workers,
        seed = cfg.seed,
        "starting validation run"
    );

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let trials = simulate_conditions(truth, &cfg.conditions, cfg.trials_per_condition, &mut rng)?;

    let engine = LikelihoodEngine::new(cfg.workers)?;
    let table = engine.likelihood_table(&trials, grid)?;
    let summary = posterior.fold(&table)?;

    let posteriors: Vec<ModelPosterior> = posterior
        .iter()
        .map(|(model, probability)| {
            info!(%model, probability, "posterior");
            ModelPosterior { model, probability }
        })
        .collect();
    let (map_model, map_probability) = posterior.map_estimate();
    info!(
        %map_model,
        map_probability,
        updated = summary.updated,
        skipped = summary.skipped,
        "validation run finished"
    );

    Ok(ValidationReport {
        truth: truth.key(),
        n_trials: trials.len(),
        posteriors,
        posterior_sum: posterior.total(),
        map_model,
        map_probability,
        summary,
    })
}

/// DDM recovery over `range_d × range_sigma` with truth `(d, sigma)`.
///
/// # Errors
/// As [`run_validation`], plus parameter validation of the truth and grid.
pub fn ddm_validation(
    d: f64, sigma: f64, range_d: &[f64], range_sigma: &[f64], cfg: &ValidationConfig,
) -> DDMResult<ValidationReport> {
    let truth = DDM::new(DDMParams::new(d, sigma)?, cfg.model.clone())?;
    let grid = ddm_grid(range_d, range_sigma, &cfg.model)?;
    run_validation(&truth, &grid, cfg)
}

/// aDDM recovery over `range_d × range_sigma × range_theta` with truth
/// `(d, sigma, theta)`. `cfg.model.sim.fixations` must be set.
///
/// # Errors
/// As [`run_validation`]; [`DDMError::MissingFixationDistribution`] is
/// reported through [`DDMError::SimulationFailed`] when no fixation
/// distribution is configured.
pub fn addm_validation(
    truth: (f64, f64, f64), range_d: &[f64], range_sigma: &[f64], range_theta: &[f64],
    cfg: &ValidationConfig,
) -> DDMResult<ValidationReport> {
    let (d, sigma, theta) = truth;
    let truth = ADDM::new(ADDMParams::new(d, sigma, theta)?, cfg.model.clone())?;
    let grid = addm_grid(range_d, range_sigma, range_theta, &cfg.model)?;
    run_validation(&truth, &grid, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddm::core::FixationDistribution;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - TOML loading and config validation.
    // - Simulation ordering and failure context.
    // - A small DDM recovery run and report invariants.
    // - An aDDM run with a parametric fixation distribution.
    //
    // They intentionally DO NOT cover:
    // - The full-size recovery run (see tests/validation_recovery.rs).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify partial TOML configs fall back to defaults.
    //
    // Given
    // -----
    // - A document setting `trials_per_condition`, `workers`, and two
    //   conditions.
    //
    // Expect
    // ------
    // - Those fields set; seed 42 and zero threshold 0.0 by default.
    fn config_from_partial_toml() {
        // Arrange
        let doc = r#"
            trials_per_condition = 50
            workers = 2
            conditions = [[1.0, 0.0], [0.25, 0.75]]
        "#;

        // Act
        let cfg = ValidationConfig::from_toml_str(doc).expect("valid config");

        // Assert
        assert_eq!(cfg.trials_per_condition, 50);
        assert_eq!(cfg.workers, 2);
        assert_eq!(cfg.conditions, vec![(1.0, 0.0), (0.25, 0.75)]);
        assert_eq!(cfg.seed, DEFAULT_SEED);
        assert_eq!(cfg.zero_threshold, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure invalid configs are rejected.
    //
    // Given
    // -----
    // - Empty conditions; zero workers; malformed TOML.
    //
    // Expect
    // ------
    // - `EmptyConditions`, `InvalidWorkerCount`, `Config`.
    fn config_guards() {
        // Assert
        assert_eq!(
            ValidationConfig::from_toml_str("conditions = []"),
            Err(DDMError::EmptyConditions)
        );
        assert_eq!(
            ValidationConfig::from_toml_str("workers = 0"),
            Err(DDMError::InvalidWorkerCount { workers: 0 })
        );
        assert!(matches!(
            ValidationConfig::from_toml_str("workers = ["),
            Err(DDMError::Config { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Check that simulation failures carry condition context.
    //
    // Given
    // -----
    // - An aDDM truth without a fixation distribution and two conditions.
    //
    // Expect
    // ------
    // - `SimulationFailed { condition_index: 0, trial_index: 0, .. }`
    //   wrapping `MissingFixationDistribution`.
    fn simulation_failures_carry_context() {
        // Arrange
        let truth = ADDM::new(ADDMParams::new(0.005, 0.07, 0.5).expect("valid"), ModelOpts::default())
            .expect("valid model");
        let mut rng = StdRng::seed_from_u64(1);

        // Act
        let err = simulate_conditions(&truth, &[(1.0, 0.0), (0.0, 1.0)], 3, &mut rng)
            .expect_err("no fixation distribution");

        // Assert
        match err {
            DDMError::SimulationFailed { condition_index, trial_index, value_left, source, .. } => {
                assert_eq!((condition_index, trial_index), (0, 0));
                assert_eq!(value_left, 1.0);
                assert_eq!(*source, DDMError::MissingFixationDistribution);
            }
            other => panic!("expected SimulationFailed, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Run a small DDM recovery and check report invariants.
    //
    // Given
    // -----
    // - Truth (0.005, 0.07), grid {truth, (0.05, 0.5)}, 100 trials per
    //   condition, 2 workers.
    //
    // Expect
    // ------
    // - 300 trials; posterior sums to 1; MAP is the truth.
    fn small_ddm_recovery() {
        // Arrange
        let cfg = ValidationConfig { trials_per_condition: 100, workers: 2, ..Default::default() };
        let truth = DDM::with_defaults(0.005, 0.07).expect("valid model");
        let grid = vec![
            DDM::with_defaults(0.005, 0.07).expect("valid model"),
            DDM::with_defaults(0.05, 0.5).expect("valid model"),
        ];

        // Act
        let report = run_validation(&truth, &grid, &cfg).expect("run ok");

        // Assert
        assert_eq!(report.n_trials, 300);
        assert_eq!(report.summary.total(), 300);
        assert!((report.posterior_sum - 1.0).abs() < 1e-9);
        assert!(report.recovered());
        assert!(report.posterior(&truth.key()).expect("present") > 0.9);
    }

    #[test]
    // Purpose
    // -------
    // Exercise the aDDM path end to end on a tiny grid.
    //
    // Given
    // -----
    // - Parametric fixations, truth (0.005, 0.07, 0.5), grid over
    //   `theta ∈ {0.5, 1.0}`, 30 trials per condition.
    //
    // Expect
    // ------
    // - A two-entry report whose posterior sums to 1.
    fn small_addm_run() {
        // Arrange
        let fixations = FixationDistribution::parametric(0.5, 200, 50, 3.0, 100.0)
            .expect("valid distribution");
        let cfg = ValidationConfig {
            trials_per_condition: 30,
            workers: 2,
            model: ModelOpts::default().with_fixations(fixations),
            ..Default::default()
        };

        // Act
        let report =
            addm_validation((0.005, 0.07, 0.5), &[0.005], &[0.07], &[0.5, 1.0], &cfg).expect("run ok");

        // Assert
        assert_eq!(report.posteriors.len(), 2);
        assert!((report.posterior_sum - 1.0).abs() < 1e-9);
        assert_eq!(report.truth, ModelKey::addm(0.005, 0.07, 0.5));
    }
}
