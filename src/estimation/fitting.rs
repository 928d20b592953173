//! estimation::fitting — subsampled negative log-likelihood and its fit.
//!
//! Purpose
//! -------
//! Provide the objective used to fit model parameters to observed data: per
//! subject, draw a uniform subsample of trial ids, sum `ln(likelihood)` over
//! the trials with nonzero likelihood, negate, and sum across subjects.
//! [`fit`] minimizes that objective inside a box with the crate's
//! Nelder–Mead runner.
//!
//! Key behaviors
//! -------------
//! - [`FittingData`] holds `subject id → trial id → TrialRecord` in ordered
//!   maps, so iteration order (and therefore summation order) is fixed.
//! - [`NllObjective`] owns the data, the [`FitConfig`], and a
//!   [`LikelihoodEngine`]; it is built once and evaluated many times.
//! - [`NllObjective::nll_with_rng`] draws from a caller-supplied RNG;
//!   [`NllObjective::nll`] reseeds `StdRng` from `config.seed` on every call,
//!   so equal inputs give bit-identical values.
//! - An optional [`Parity`] filter keeps only odd or even trial ids. It is
//!   applied after subsampling, so fewer than `trials_per_subject` trials
//!   may be scored.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every subject has at least `trials_per_subject` trials; this is checked
//!   at construction and again per draw.
//! - Zero likelihoods are skipped, not errors. Any likelihood failure fails
//!   the evaluation.
//!
//! Conventions
//! -----------
//! - [`ModelFamily::Addm`] parameters are `(d, theta, mu)` with
//!   `sigma = mu · d`; [`ModelFamily::Ddm`] parameters are `(d, sigma)`.
use rand::{Rng, SeedableRng, rngs::StdRng, seq::index::sample};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::{
    ddm::{
        core::{ADDMParams, DDMParams, ModelKey, ModelOpts, TrialRecord},
        errors::{DDMError, DDMResult},
        models::{ADDM, DDM, DecisionModel},
    },
    likelihood::LikelihoodEngine,
    optimization::{
        errors::{OptError, OptResult},
        nll_optimizer::{
            Bounds, NMOptions, Objective, OptimOutcome, Theta, minimize,
            validation::validate_theta,
        },
    },
};

pub const DEFAULT_TRIALS_PER_SUBJECT: usize = 200;

/// Starting point `(d, theta, mu)` for aDDM fits.
pub const DEFAULT_ADDM_X0: [f64; 3] = [0.0002, 0.5, 200.0];

/// Box `[(d), (theta), (mu)]` for aDDM fits.
pub const DEFAULT_ADDM_BOUNDS: [(f64, f64); 3] = [(0.00005, 0.01), (0.0, 1.0), (10.0, 1000.0)];

/// Starting point `(d, sigma)` for DDM fits.
pub const DEFAULT_DDM_X0: [f64; 2] = [0.002, 0.05];

/// Box `[(d), (sigma)]` for DDM fits.
pub const DEFAULT_DDM_BOUNDS: [(f64, f64); 2] = [(0.00005, 0.05), (0.005, 1.0)];

/// Trials of one subject keyed by trial id.
pub type SubjectTrials = BTreeMap<u64, TrialRecord>;

/// FittingData — observed trials grouped by subject.
#[derive(Debug, Clone, PartialEq)]
pub struct FittingData {
    subjects: BTreeMap<String, SubjectTrials>,
}

impl FittingData {
    /// # Errors
    /// - [`DDMError::NoSubjects`] if the map is empty.
    /// - [`DDMError::EmptySubject`] for a subject without trials.
    pub fn new(subjects: BTreeMap<String, SubjectTrials>) -> DDMResult<Self> {
        if subjects.is_empty() {
            return Err(DDMError::NoSubjects);
        }
        if let Some((subject, _)) = subjects.iter().find(|(_, trials)| trials.is_empty()) {
            return Err(DDMError::EmptySubject { subject: subject.clone() });
        }
        Ok(Self { subjects })
    }

    /// Group `(subject, trial id, trial)` records. A repeated
    /// `(subject, trial id)` keeps the last record.
    pub fn from_records<I, S>(records: I) -> DDMResult<Self>
    where
        I: IntoIterator<Item = (S, u64, TrialRecord)>,
        S: Into<String>,
    {
        let mut subjects: BTreeMap<String, SubjectTrials> = BTreeMap::new();
        for (subject, trial_id, trial) in records {
            subjects.entry(subject.into()).or_default().insert(trial_id, trial);
        }
        Self::new(subjects)
    }

    pub fn n_subjects(&self) -> usize {
        self.subjects.len()
    }

    pub fn n_trials(&self) -> usize {
        self.subjects.values().map(BTreeMap::len).sum()
    }

    pub fn subject(&self, id: &str) -> Option<&SubjectTrials> {
        self.subjects.get(id)
    }

    /// Subjects in id order.
    pub fn subjects(&self) -> impl Iterator<Item = (&str, &SubjectTrials)> + '_ {
        self.subjects.iter().map(|(id, trials)| (id.as_str(), trials))
    }
}

/// Which trial ids survive the subsample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    #[default]
    All,
    OddOnly,
    EvenOnly,
}

impl Parity {
    pub fn admits(self, trial_id: u64) -> bool {
        match self {
            Parity::All => true,
            Parity::OddOnly => trial_id % 2 == 1,
            Parity::EvenOnly => trial_id % 2 == 0,
        }
    }
}

/// Model family and parameter layout of the fitting objective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    /// `(d, sigma)`.
    Ddm,
    /// `(d, theta, mu)`.
    #[default]
    Addm,
}

impl ModelFamily {
    pub fn n_params(self) -> usize {
        self.parameter_names().len()
    }

    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            ModelFamily::Ddm => &["d", "sigma"],
            ModelFamily::Addm => &["d", "theta", "mu"],
        }
    }

    pub fn default_x0(self) -> Theta {
        match self {
            ModelFamily::Ddm => Theta::from(DEFAULT_DDM_X0.to_vec()),
            ModelFamily::Addm => Theta::from(DEFAULT_ADDM_X0.to_vec()),
        }
    }

    /// # Errors
    /// Never fails for the built-in boxes; the result type follows
    /// [`Bounds::from_pairs`].
    pub fn default_bounds(self) -> OptResult<Bounds> {
        match self {
            ModelFamily::Ddm => Bounds::from_pairs(&DEFAULT_DDM_BOUNDS),
            ModelFamily::Addm => Bounds::from_pairs(&DEFAULT_ADDM_BOUNDS),
        }
    }
}

/// A model of either family, built from a parameter vector.
#[derive(Debug, Clone, PartialEq)]
pub enum FamilyModel {
    Ddm(DDM),
    Addm(ADDM),
}

impl DecisionModel for FamilyModel {
    fn key(&self) -> ModelKey {
        match self {
            FamilyModel::Ddm(m) => m.key(),
            FamilyModel::Addm(m) => m.key(),
        }
    }

    fn opts(&self) -> &ModelOpts {
        match self {
            FamilyModel::Ddm(m) => m.opts(),
            FamilyModel::Addm(m) => m.opts(),
        }
    }

    fn simulate_trial<R: Rng + ?Sized>(
        &self, value_left: f64, value_right: f64, rng: &mut R,
    ) -> DDMResult<TrialRecord> {
        match self {
            FamilyModel::Ddm(m) => m.simulate_trial(value_left, value_right, rng),
            FamilyModel::Addm(m) => m.simulate_trial(value_left, value_right, rng),
        }
    }

    fn trial_likelihood(&self, trial: &TrialRecord) -> DDMResult<f64> {
        match self {
            FamilyModel::Ddm(m) => m.trial_likelihood(trial),
            FamilyModel::Addm(m) => m.trial_likelihood(trial),
        }
    }
}

fn default_trials_per_subject() -> usize {
    DEFAULT_TRIALS_PER_SUBJECT
}

fn default_seed() -> u64 {
    super::validation::DEFAULT_SEED
}

fn default_workers() -> usize {
    rayon::current_num_threads().max(1)
}

/// FitConfig — settings of the fitting objective.
///
/// Fields
/// ------
/// - `family`: parameter layout (default aDDM `(d, theta, mu)`).
/// - `trials_per_subject`: subsample size per subject (default 200).
/// - `seed`: seed used by [`NllObjective::nll`] (default 42).
/// - `parity`: trial-id filter applied after subsampling (default `All`).
/// - `workers`: likelihood worker threads (default: rayon's thread count).
/// - `model`: options for every model built during the fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    #[serde(default)]
    pub family: ModelFamily,
    #[serde(default = "default_trials_per_subject")]
    pub trials_per_subject: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub parity: Parity,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub model: ModelOpts,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            family: ModelFamily::default(),
            trials_per_subject: DEFAULT_TRIALS_PER_SUBJECT,
            seed: default_seed(),
            parity: Parity::default(),
            workers: default_workers(),
            model: ModelOpts::default(),
        }
    }
}

impl FitConfig {
    /// Parse and validate a TOML document; missing keys take their defaults.
    ///
    /// # Errors
    /// [`DDMError::Config`] for malformed TOML, or any
    /// [`FitConfig::validate`] failure.
    pub fn from_toml_str(s: &str) -> DDMResult<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> DDMResult<()> {
        if self.trials_per_subject == 0 {
            return Err(DDMError::InvalidOption {
                name: "trials_per_subject",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if self.workers == 0 {
            return Err(DDMError::InvalidWorkerCount { workers: 0 });
        }
        self.model.validate()
    }
}

/// NllObjective — subsampled negative log-likelihood over subjects.
#[derive(Debug)]
pub struct NllObjective {
    data: FittingData,
    config: FitConfig,
    engine: LikelihoodEngine,
}

impl NllObjective {
    /// # Errors
    /// - Any [`FitConfig::validate`] failure.
    /// - [`DDMError::InsufficientTrials`] for a subject with fewer than
    ///   `trials_per_subject` trials.
    /// - Worker pool construction errors.
    pub fn new(data: FittingData, config: FitConfig) -> DDMResult<Self> {
        config.validate()?;
        for (subject, trials) in data.subjects() {
            check_subsample(subject, trials.len(), config.trials_per_subject)?;
        }
        let engine = LikelihoodEngine::new(config.workers)?;
        Ok(Self { data, config, engine })
    }

    pub fn data(&self) -> &FittingData {
        &self.data
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    pub fn family(&self) -> ModelFamily {
        self.config.family
    }

    /// Model for parameter vector `x` in the configured family.
    ///
    /// # Errors
    /// - [`DDMError::ParameterLengthMismatch`] for a wrong-length `x`.
    /// - [`DDMError::InvalidParameter`] for out-of-domain values.
    pub fn model_for(&self, x: &[f64]) -> DDMResult<FamilyModel> {
        let family = self.config.family;
        if x.len() != family.n_params() {
            return Err(DDMError::ParameterLengthMismatch {
                expected: family.n_params(),
                found: x.len(),
            });
        }
        let opts = self.config.model.clone();
        match family {
            ModelFamily::Ddm => Ok(FamilyModel::Ddm(DDM::new(DDMParams::new(x[0], x[1])?, opts)?)),
            ModelFamily::Addm => Ok(FamilyModel::Addm(ADDM::new(
                ADDMParams::from_d_theta_mu(x[0], x[1], x[2])?,
                opts,
            )?)),
        }
    }

    /// NLL at `x`, subsampling with `rng`.
    ///
    /// Subjects are visited in id order; per subject the subsample is scored
    /// on the worker pool and the logs of nonzero likelihoods are summed in
    /// subsample order.
    ///
    /// # Errors
    /// - Errors from [`NllObjective::model_for`].
    /// - [`DDMError::InsufficientTrials`] if a subject is too small.
    /// - [`DDMError::LikelihoodComputationFailure`] from the engine.
    pub fn nll_with_rng<R: Rng + ?Sized>(&self, x: &[f64], rng: &mut R) -> DDMResult<f64> {
        let model = self.model_for(x)?;
        let n = self.config.trials_per_subject;
        let mut log_likelihood = 0.0;
        let mut scored = 0usize;
        let mut zeros = 0usize;

        for (subject, trials) in self.data.subjects() {
            check_subsample(subject, trials.len(), n)?;
            let ids: Vec<u64> = trials.keys().copied().collect();
            let selected: Vec<&TrialRecord> = sample(rng, ids.len(), n)
                .into_iter()
                .map(|i| ids[i])
                .filter(|&id| self.config.parity.admits(id))
                .filter_map(|id| trials.get(&id))
                .collect();

            let likelihoods = self.engine.parallel_compute_likelihoods(&selected, &model)?;
            for likelihood in likelihoods {
                if likelihood > 0.0 {
                    log_likelihood += likelihood.ln();
                } else {
                    zeros += 1;
                }
            }
            scored += selected.len();
        }

        let nll = -log_likelihood;
        debug!(model = %model.key(), nll, scored, zeros, "evaluated negative log-likelihood");
        Ok(nll)
    }

    /// NLL at `x` with the RNG reseeded from `config.seed`.
    ///
    /// # Errors
    /// As [`NllObjective::nll_with_rng`].
    pub fn nll(&self, x: &[f64]) -> DDMResult<f64> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.nll_with_rng(x, &mut rng)
    }
}

impl Objective for NllObjective {
    fn value(&self, theta: &Theta) -> OptResult<f64> {
        Ok(self.nll(&theta.to_vec())?)
    }

    fn check(&self, theta: &Theta) -> OptResult<()> {
        validate_theta(theta, self.config.family.n_params())?;
        self.model_for(&theta.to_vec()).map(|_| ()).map_err(OptError::from)
    }
}

fn check_subsample(subject: &str, available: usize, requested: usize) -> DDMResult<()> {
    if requested > available {
        return Err(DDMError::InsufficientTrials {
            subject: subject.to_string(),
            requested,
            available,
        });
    }
    Ok(())
}

/// FitReport — fitted parameters and optimizer diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitReport {
    pub family: ModelFamily,
    pub parameter_names: Vec<String>,
    pub parameters: Vec<f64>,
    pub model: ModelKey,
    pub nll: f64,
    pub outcome: OptimOutcome,
}

/// Minimize `objective` from `x0` inside `bounds`.
///
/// # Errors
/// - `OptError` from option, bound, or starting-point validation.
/// - [`OptError::Model`] wrapping any objective failure.
pub fn fit(
    objective: &NllObjective, x0: Theta, bounds: &Bounds, opts: &NMOptions,
) -> OptResult<FitReport> {
    let family = objective.family();
    info!(
        ?family,
        subjects = objective.data().n_subjects(),
        trials_per_subject = objective.config().trials_per_subject,
        x0 = ?x0.to_vec(),
        "starting fit"
    );
    let outcome = minimize(objective, x0, bounds, opts)?;
    let parameters = outcome.theta_hat.to_vec();
    let model = objective.model_for(&parameters)?.key();
    info!(
        %model,
        nll = outcome.value,
        converged = outcome.converged,
        iterations = outcome.iterations,
        "fit finished"
    );
    Ok(FitReport {
        family,
        parameter_names: family.parameter_names().iter().map(|s| s.to_string()).collect(),
        parameters,
        model,
        nll: outcome.value,
        outcome,
    })
}
