//! likelihood::engine — single-trial and parallel batch likelihoods.
//!
//! Purpose
//! -------
//! Evaluate trial likelihoods under a [`DecisionModel`], either one at a
//! time or over a whole batch on a fixed-size rayon worker pool, and build
//! [`LikelihoodTable`]s for candidate grids.
//!
//! Key behaviors
//! -------------
//! - [`compute_likelihood`] wraps `DecisionModel::trial_likelihood` and
//!   rejects negative or non-finite results.
//! - [`LikelihoodEngine`] owns a dedicated `rayon::ThreadPool` with
//!   exactly `workers` threads. Batch results are written into a pre-sized
//!   vector at each trial's original index, so output order always matches
//!   input order.
//! - If any trial fails, the whole batch fails with
//!   [`DDMError::LikelihoodComputationFailure`] naming the model key and the
//!   lowest failing trial index; no partial results are returned.
//!
//! Invariants & assumptions
//! ------------------------
//! - Models and trials are shared immutably across workers; there is no
//!   mutable state between trials and no locking.
//! - Parallel and sequential evaluation run the same per-trial code and
//!   therefore agree exactly.
//!
//! Downstream usage
//! ----------------
//! - The validation driver calls [`LikelihoodEngine::likelihood_table`]
//!   once per run; the fitting objective calls
//!   [`LikelihoodEngine::parallel_compute_likelihoods`] per subject.
use rayon::prelude::*;
use std::borrow::Borrow;
use tracing::{debug, error};

use crate::{
    ddm::{
        core::TrialRecord,
        errors::{DDMError, DDMResult},
        models::DecisionModel,
    },
    likelihood::table::LikelihoodTable,
};

/// Likelihood of one trial under `model`, guaranteed finite and ≥ 0.
///
/// # Errors
/// - Any error raised by `model.trial_likelihood`.
/// - [`DDMError::InvalidLikelihoodValue`] naming the model if it returns
///   NaN, ±∞, or a negative value. Batch callers add the trial index.
pub fn compute_likelihood<M: DecisionModel>(trial: &TrialRecord, model: &M) -> DDMResult<f64> {
    let value = model.trial_likelihood(trial)?;
    if !value.is_finite() || value < 0.0 {
        return Err(DDMError::InvalidLikelihoodValue { model: model.key(), value });
    }
    Ok(value)
}

/// Sequential batch evaluation with the same failure semantics as
/// [`LikelihoodEngine::parallel_compute_likelihoods`].
///
/// # Errors
/// [`DDMError::LikelihoodComputationFailure`] for the first failing trial.
pub fn compute_likelihoods<M, T>(trials: &[T], model: &M) -> DDMResult<Vec<f64>>
where
    M: DecisionModel,
    T: Borrow<TrialRecord>,
{
    trials
        .iter()
        .enumerate()
        .map(|(i, trial)| {
            compute_likelihood(trial.borrow(), model).map_err(|e| DDMError::LikelihoodComputationFailure {
                model: model.key(),
                trial_index: i,
                source: Box::new(e),
            })
        })
        .collect()
}

/// LikelihoodEngine — fixed-size worker pool for batch likelihoods.
///
/// Purpose
/// -------
/// Partition a trial batch across `workers` threads and collect results in
/// input order.
///
/// Fields
/// ------
/// - `pool`: dedicated rayon pool; the global pool is never touched.
/// - `workers`: pool size, ≥ 1.
///
/// Notes
/// -----
/// - One engine can be reused across many models and batches; building the
///   pool is the only setup cost.
#[derive(Debug)]
pub struct LikelihoodEngine {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl LikelihoodEngine {
    /// Build an engine with exactly `workers` threads.
    ///
    /// # Errors
    /// - [`DDMError::InvalidWorkerCount`] if `workers == 0`.
    /// - [`DDMError::ThreadPool`] if the pool cannot be created.
    pub fn new(workers: usize) -> DDMResult<Self> {
        if workers == 0 {
            return Err(DDMError::InvalidWorkerCount { workers });
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("ddm-likelihood-{i}"))
            .build()?;
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Likelihoods of every trial under `model`, aligned with `trials`.
    ///
    /// # Errors
    /// [`DDMError::LikelihoodComputationFailure`] carrying the model key, the
    /// lowest failing trial index, and the per-trial cause.
    pub fn parallel_compute_likelihoods<M, T>(&self, trials: &[T], model: &M) -> DDMResult<Vec<f64>>
    where
        M: DecisionModel,
        T: Borrow<TrialRecord> + Sync,
    {
        let mut out = vec![0.0; trials.len()];
        let failure = self.pool.install(|| {
            out.par_iter_mut()
                .zip(trials.par_iter())
                .enumerate()
                .filter_map(|(i, (slot, trial))| match compute_likelihood(trial.borrow(), model) {
                    Ok(value) => {
                        *slot = value;
                        None
                    }
                    Err(e) => Some((i, e)),
                })
                .min_by_key(|(i, _)| *i)
        });

        if let Some((trial_index, source)) = failure {
            let model = model.key();
            error!(%model, trial_index, error = %source, "likelihood computation failed");
            return Err(DDMError::LikelihoodComputationFailure {
                model,
                trial_index,
                source: Box::new(source),
            });
        }
        Ok(out)
    }

    /// Likelihood table of `trials` under every model of `grid`.
    ///
    /// Models are evaluated one at a time, each across the whole pool.
    ///
    /// # Errors
    /// - [`DDMError::EmptyGrid`] / [`DDMError::DuplicateModel`] for a bad grid.
    /// - Any batch failure from [`Self::parallel_compute_likelihoods`].
    pub fn likelihood_table<M, T>(&self, trials: &[T], grid: &[M]) -> DDMResult<LikelihoodTable>
    where
        M: DecisionModel,
        T: Borrow<TrialRecord> + Sync,
    {
        let mut rows = Vec::with_capacity(grid.len());
        for model in grid {
            debug!(model = %model.key(), trials = trials.len(), "computing likelihoods");
            rows.push((model.key(), self.parallel_compute_likelihoods(trials, model)?));
        }
        LikelihoodTable::from_rows(rows)
    }
}
