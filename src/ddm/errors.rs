//! ddm::errors — error surface for simulation, likelihoods, and estimation.
//!
//! Purpose
//! -------
//! Provide a single error enum, [`DDMError`], and the result alias
//! [`DDMResult`] used by every layer of the decision-model stack: trial
//! construction, parameter validation, the simulator, the probability
//! transfer likelihood, the parallel likelihood engine, the posterior
//! aggregator, and the estimation drivers.
//!
//! Key behaviors
//! -------------
//! - Carry structured diagnostic context (offending value, condition,
//!   trial index, model key) instead of printed text, so callers can log or
//!   match on failures without string parsing.
//! - Nest the root cause of batch-level failures via boxed `source` fields
//!   ([`DDMError::SimulationFailed`], [`DDMError::LikelihoodComputationFailure`])
//!   so `std::error::Error::source` chains stay intact.
//! - Convert to `PyValueError` at the PyO3 boundary when the
//!   `python-bindings` feature is enabled.
//!
//! Conventions
//! -----------
//! - Trial and condition indices are 0-based and refer to the batch order
//!   the caller supplied.
//! - Degenerate evidence and zero likelihoods are *not* errors; they are
//!   handled locally by the posterior aggregator and the fitting objective.
//!
//! Testing notes
//! -------------
//! - Unit tests check that `Display` messages embed their payloads and that
//!   wrapped errors expose their cause through `source()`.
use thiserror::Error;

use crate::ddm::core::params::ModelKey;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for decision-model operations.
pub type DDMResult<T> = Result<T, DDMError>;

/// DDMError — failures raised by the decision-model stack.
///
/// Variants are grouped by the layer that raises them. Batch-level variants
/// wrap the per-trial cause so the first failing trial can be reported
/// together with the model or condition that triggered it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DDMError {
    // ---- Parameters / options ----
    /// A model parameter is outside its admissible domain.
    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    /// An option field is outside its admissible domain.
    #[error("Invalid option '{name}' = {value}: {reason}")]
    InvalidOption { name: &'static str, value: f64, reason: &'static str },

    /// A fixation distribution is malformed.
    #[error("Invalid fixation distribution: {reason}")]
    InvalidFixationDistribution { reason: &'static str },

    /// Configuration could not be parsed.
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    // ---- Trial records ----
    /// A stimulus value is NaN or infinite.
    #[error("Non-finite trial value '{name}' = {value}")]
    NonFiniteValue { name: &'static str, value: f64 },

    /// A choice code outside the signed or binary encodings.
    #[error("Invalid choice code {code}: expected -1/+1 or 0/1")]
    InvalidChoiceCode { code: i64 },

    /// Fixation items and durations have different lengths.
    #[error("Fixation schedule mismatch: {items} items but {durations} durations")]
    FixationLengthMismatch { items: usize, durations: usize },

    /// The fixation schedule is empty.
    #[error("Fixation schedule must contain at least one fixation")]
    EmptyFixationSchedule,

    /// An attentional likelihood was requested for a trial without fixations.
    #[error("Trial has no fixation schedule; the attentional model requires one")]
    MissingFixations,

    /// Simulating an attentional trial requires a fixation distribution.
    #[error("No fixation distribution configured for attentional simulation")]
    MissingFixationDistribution,

    // ---- Simulation ----
    /// The evidence process did not reach a barrier within the step budget.
    #[error(
        "Simulation did not terminate within {max_steps} steps for values ({value_left}, {value_right})"
    )]
    SimulationNonTermination { value_left: f64, value_right: f64, max_steps: usize },

    /// A simulated trial failed; carries the condition and trial context.
    #[error(
        "Simulation failed for condition {condition_index} ({value_left}, {value_right}), trial {trial_index}: {source}"
    )]
    SimulationFailed {
        condition_index: usize,
        trial_index: usize,
        value_left: f64,
        value_right: f64,
        #[source]
        source: Box<DDMError>,
    },

    /// Sampling from a distribution could not be set up.
    #[error("Distribution error: {reason}")]
    Distribution { reason: String },

    // ---- Likelihood ----
    /// An intermediate or final likelihood is NaN or infinite.
    #[error("Non-finite likelihood {value} at step {step}")]
    NonFiniteLikelihood { value: f64, step: usize },

    /// A per-trial likelihood failed inside a batch; the batch is discarded.
    #[error("Likelihood computation failed for model {model} at trial {trial_index}: {source}")]
    LikelihoodComputationFailure {
        model: ModelKey,
        trial_index: usize,
        #[source]
        source: Box<DDMError>,
    },

    /// The worker pool size must be at least one.
    #[error("Invalid worker count {workers}: must be at least 1")]
    InvalidWorkerCount { workers: usize },

    /// The worker pool could not be built.
    #[error("Thread pool error: {reason}")]
    ThreadPool { reason: String },

    // ---- Likelihood tables / posterior ----
    /// A candidate grid with no models.
    #[error("Model grid must contain at least one model")]
    EmptyGrid,

    /// The same model key appears twice in a grid or table.
    #[error("Duplicate model {model} in grid")]
    DuplicateModel { model: ModelKey },

    /// A likelihood row has the wrong number of trials.
    #[error("Likelihood row for model {model} has {found} trials, expected {expected}")]
    LikelihoodTableMismatch { model: ModelKey, expected: usize, found: usize },

    /// A grid model has no row in the likelihood table.
    #[error("Missing likelihoods for model {model}")]
    MissingLikelihoods { model: ModelKey },

    /// A stored likelihood is negative or non-finite.
    #[error("Invalid likelihood {value} for model {model} at trial {trial_index}")]
    InvalidLikelihood { model: ModelKey, trial_index: usize, value: f64 },

    /// A single-update likelihood is negative or non-finite.
    #[error("Invalid likelihood {value} for model {model}")]
    InvalidLikelihoodValue { model: ModelKey, value: f64 },

    // ---- Estimation ----
    /// Validation mode needs at least one condition.
    #[error("Condition list must not be empty")]
    EmptyConditions,

    /// A subject with no trials in the fitting data.
    #[error("Subject '{subject}' has no trials")]
    EmptySubject { subject: String },

    /// Fitting data holds no subjects.
    #[error("Fitting data contains no subjects")]
    NoSubjects,

    /// The subsample size exceeds a subject's trial count.
    #[error("Subject '{subject}' has {available} trials, cannot draw {requested}")]
    InsufficientTrials { subject: String, requested: usize, available: usize },

    /// The fitting parameter vector has the wrong length.
    #[error("Parameter vector length mismatch: expected {expected}, found {found}")]
    ParameterLengthMismatch { expected: usize, found: usize },
}

impl From<toml::de::Error> for DDMError {
    fn from(err: toml::de::Error) -> Self {
        DDMError::Config { reason: err.to_string() }
    }
}

impl From<statrs::StatsError> for DDMError {
    fn from(err: statrs::StatsError) -> Self {
        DDMError::Distribution { reason: err.to_string() }
    }
}

impl From<rand_distr::NormalError> for DDMError {
    fn from(err: rand_distr::NormalError) -> Self {
        DDMError::Distribution { reason: err.to_string() }
    }
}

impl From<rand_distr::GammaError> for DDMError {
    fn from(err: rand_distr::GammaError) -> Self {
        DDMError::Distribution { reason: err.to_string() }
    }
}

impl From<rayon::ThreadPoolBuildError> for DDMError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        DDMError::ThreadPool { reason: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<DDMError> for PyErr {
    fn from(err: DDMError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
