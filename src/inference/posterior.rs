//! inference::posterior — sequential Bayesian update over a model grid.
//!
//! Purpose
//! -------
//! Maintain a discrete posterior over a fixed grid of candidate models and
//! fold per-trial likelihoods into it one trial at a time.
//!
//! Key behaviors
//! -------------
//! - [`PosteriorDistribution::uniform`] starts every model at `1/|grid|`.
//! - Each update computes `denominator = Σ_m p[m] · L[m]`. If the
//!   denominator is at or below the zero threshold the trial is skipped and
//!   the posterior is left untouched; otherwise `p[m] ← p[m] · L[m] /
//!   denominator`.
//! - [`PosteriorDistribution::fold`] applies [`PosteriorDistribution::update`]
//!   across a [`LikelihoodTable`] in trial order and reports how many trials
//!   were applied or skipped.
//!
//! Invariants & assumptions
//! ------------------------
//! - After every applied update the probabilities sum to 1 up to rounding.
//! - Iteration and arg-max use grid order; ties in
//!   [`PosteriorDistribution::map_estimate`] resolve to the earliest model.
//! - Updates are sequential. The fold is cheap next to the likelihood table
//!   and its order must be fixed for reproducible rounding.
//!
//! Conventions
//! -----------
//! - The default zero threshold is exactly `0.0`: only trials that every
//!   model assigns zero likelihood are skipped.
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::{
    ddm::{
        core::{ModelKey, validation::non_negative_param},
        errors::{DDMError, DDMResult},
    },
    likelihood::LikelihoodTable,
};

/// Denominators at or below this value skip the update.
pub const DEFAULT_ZERO_THRESHOLD: f64 = 0.0;

/// Counts of applied and skipped trials for one fold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FoldSummary {
    pub updated: usize,
    pub skipped: usize,
}

impl FoldSummary {
    pub fn total(&self) -> usize {
        self.updated + self.skipped
    }
}

/// PosteriorDistribution — probabilities over a fixed model grid.
///
/// Fields
/// ------
/// - `keys`: grid in caller order; unique.
/// - `probs`: one probability per key.
/// - `index`: key → position in `keys`.
/// - `zero_threshold`: skip threshold for the update denominator.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorDistribution {
    keys: Vec<ModelKey>,
    probs: Vec<f64>,
    index: HashMap<ModelKey, usize>,
    zero_threshold: f64,
}

impl PosteriorDistribution {
    /// Uniform prior over `keys`.
    ///
    /// # Errors
    /// - [`DDMError::EmptyGrid`] if `keys` is empty.
    /// - [`DDMError::DuplicateModel`] if a key repeats.
    pub fn uniform(keys: Vec<ModelKey>) -> DDMResult<Self> {
        if keys.is_empty() {
            return Err(DDMError::EmptyGrid);
        }
        let mut index = HashMap::with_capacity(keys.len());
        for (i, key) in keys.iter().enumerate() {
            if index.insert(*key, i).is_some() {
                return Err(DDMError::DuplicateModel { model: *key });
            }
        }
        let p = 1.0 / keys.len() as f64;
        Ok(Self { probs: vec![p; keys.len()], keys, index, zero_threshold: DEFAULT_ZERO_THRESHOLD })
    }

    /// Replace the skip threshold.
    ///
    /// # Errors
    /// [`DDMError::InvalidParameter`] if `threshold` is negative or
    /// non-finite.
    pub fn with_zero_threshold(mut self, threshold: f64) -> DDMResult<Self> {
        non_negative_param("zero_threshold", threshold)?;
        self.zero_threshold = threshold;
        Ok(self)
    }

    pub fn zero_threshold(&self) -> f64 {
        self.zero_threshold
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[ModelKey] {
        &self.keys
    }

    pub fn get(&self, key: &ModelKey) -> Option<f64> {
        self.index.get(key).map(|&i| self.probs[i])
    }

    /// `(key, probability)` pairs in grid order.
    pub fn iter(&self) -> impl Iterator<Item = (ModelKey, f64)> + '_ {
        self.keys.iter().copied().zip(self.probs.iter().copied())
    }

    pub fn total(&self) -> f64 {
        self.probs.iter().sum()
    }

    /// Most probable model; the earliest in grid order on ties.
    pub fn map_estimate(&self) -> (ModelKey, f64) {
        let mut best = (self.keys[0], self.probs[0]);
        for (key, p) in self.iter().skip(1) {
            if p > best.1 {
                best = (key, p);
            }
        }
        best
    }

    /// Apply one trial's likelihoods, given per model.
    ///
    /// Returns `true` if the posterior changed and `false` if the trial was
    /// skipped as degenerate evidence.
    ///
    /// # Errors
    /// - [`DDMError::MissingLikelihoods`] if a grid model has no entry.
    /// - [`DDMError::InvalidLikelihoodValue`] for negative or non-finite
    ///   entries.
    pub fn update(&mut self, likelihoods: &HashMap<ModelKey, f64>) -> DDMResult<bool> {
        let mut aligned = Vec::with_capacity(self.keys.len());
        for key in &self.keys {
            let value =
                *likelihoods.get(key).ok_or(DDMError::MissingLikelihoods { model: *key })?;
            if !value.is_finite() || value < 0.0 {
                return Err(DDMError::InvalidLikelihoodValue { model: *key, value });
            }
            aligned.push(value);
        }
        Ok(self.apply(&aligned))
    }

    /// Fold every trial of `table` into the posterior, in trial order.
    ///
    /// # Errors
    /// [`DDMError::MissingLikelihoods`] if a grid model has no row. The
    /// posterior is unchanged on error.
    pub fn fold(&mut self, table: &LikelihoodTable) -> DDMResult<FoldSummary> {
        let rows = self
            .keys
            .iter()
            .map(|key| table.row_index(key).ok_or(DDMError::MissingLikelihoods { model: *key }))
            .collect::<DDMResult<Vec<_>>>()?;

        let values = table.values();
        let mut summary = FoldSummary::default();
        let mut trial = vec![0.0; rows.len()];
        for t in 0..table.n_trials() {
            for (slot, &row) in trial.iter_mut().zip(&rows) {
                *slot = values[[row, t]];
            }
            if self.apply(&trial) {
                summary.updated += 1;
            } else {
                debug!(trial_index = t, "skipping trial with degenerate evidence");
                summary.skipped += 1;
            }
        }
        Ok(summary)
    }

    fn apply(&mut self, likelihoods: &[f64]) -> bool {
        let denominator: f64 = self.probs.iter().zip(likelihoods).map(|(p, l)| p * l).sum();
        if denominator <= self.zero_threshold || !denominator.is_finite() {
            return false;
        }
        for (p, l) in self.probs.iter_mut().zip(likelihoods) {
            *p = *p * l / denominator;
        }
        true
    }
}
