//! likelihood::table — per-model, per-trial likelihood storage.
//!
//! Purpose
//! -------
//! Hold the likelihood of every trial of a batch under every candidate
//! model, aligned index-for-index with the batch, and keyed by
//! [`ModelKey`].
//!
//! Key behaviors
//! -------------
//! - [`LikelihoodTable::from_rows`] validates that the table is non-empty,
//!   that keys are unique, that every row has the batch length, and that
//!   every entry is a finite, non-negative number.
//! - Rows are stored in a dense `models × trials` `Array2<f64>`; a key index
//!   gives O(1) row lookup.
//!
//! Invariants & assumptions
//! ------------------------
//! - Exactly one entry per (model, trial) pair.
//! - Row order is insertion order; consumers look rows up by key and do not
//!   rely on it.
use ndarray::{Array2, ArrayView1, Axis};
use std::collections::HashMap;

use crate::ddm::{
    core::ModelKey,
    errors::{DDMError, DDMResult},
};

/// LikelihoodTable — dense likelihood matrix keyed by model.
#[derive(Debug, Clone, PartialEq)]
pub struct LikelihoodTable {
    keys: Vec<ModelKey>,
    index: HashMap<ModelKey, usize>,
    values: Array2<f64>,
}

impl LikelihoodTable {
    /// Assemble a table from `(key, likelihoods)` rows.
    ///
    /// # Errors
    /// - [`DDMError::EmptyGrid`] if `rows` is empty.
    /// - [`DDMError::DuplicateModel`] if a key repeats.
    /// - [`DDMError::LikelihoodTableMismatch`] if a row length differs from
    ///   the first row.
    /// - [`DDMError::InvalidLikelihood`] for negative or non-finite entries.
    pub fn from_rows(rows: Vec<(ModelKey, Vec<f64>)>) -> DDMResult<Self> {
        let n_trials = rows.first().map(|(_, r)| r.len()).ok_or(DDMError::EmptyGrid)?;
        let mut keys = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());
        let mut values = Array2::zeros((rows.len(), n_trials));

        for (row_idx, (key, row)) in rows.into_iter().enumerate() {
            if index.insert(key, row_idx).is_some() {
                return Err(DDMError::DuplicateModel { model: key });
            }
            if row.len() != n_trials {
                return Err(DDMError::LikelihoodTableMismatch {
                    model: key,
                    expected: n_trials,
                    found: row.len(),
                });
            }
            for (trial_index, &value) in row.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(DDMError::InvalidLikelihood { model: key, trial_index, value });
                }
                values[[row_idx, trial_index]] = value;
            }
            keys.push(key);
        }
        Ok(Self { keys, index, values })
    }

    pub fn n_models(&self) -> usize {
        self.keys.len()
    }

    pub fn n_trials(&self) -> usize {
        self.values.ncols()
    }

    /// Keys in row order.
    pub fn keys(&self) -> &[ModelKey] {
        &self.keys
    }

    pub fn row_index(&self, key: &ModelKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Likelihoods of every trial under `key`.
    pub fn row(&self, key: &ModelKey) -> Option<ArrayView1<'_, f64>> {
        self.row_index(key).map(|i| self.values.index_axis(Axis(0), i))
    }

    pub fn get(&self, key: &ModelKey, trial_index: usize) -> Option<f64> {
        let row = self.row_index(key)?;
        self.values.get((row, trial_index)).copied()
    }

    /// The raw `models × trials` matrix in row order.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}
