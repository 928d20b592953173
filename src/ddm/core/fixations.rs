//! ddm::core::fixations — fixation-duration distributions for aDDM simulation.
//!
//! Purpose
//! -------
//! Describe how an attentional trial's fixation schedule is generated: a
//! blank latency before the first fixation, alternating left/right
//! fixations separated by blank transitions, and per-fixation durations.
//!
//! Key behaviors
//! -------------
//! - [`FixationDistribution::Empirical`] resamples stored durations
//!   uniformly. Fixation durations are bucketed by fixation number; fixations
//!   beyond the last bucket reuse it.
//! - [`FixationDistribution::Parametric`] uses fixed latency and transition
//!   times with gamma-distributed fixation durations.
//! - [`FixationDistribution::from_trials`] estimates an empirical
//!   distribution from observed attentional trials.
//!
//! Invariants & assumptions
//! ------------------------
//! - `prob_left_first ∈ [0, 1]`.
//! - Empirical sample sets are non-empty; gamma parameters are positive and
//!   finite. Both are enforced by [`FixationDistribution::validate`].
//! - Sampled fixation durations are at least 1 ms.
//!
//! Conventions
//! -----------
//! - Durations are in milliseconds.
//! - Fixation numbers are 0-based (the first value fixation is number 0).
//!
//! Testing notes
//! -------------
//! - Unit tests cover validation, bucket reuse for late fixations, and
//!   estimation from a small hand-built set of trials.
use rand::{Rng, seq::SliceRandom};
use rand_distr::{Distribution, Gamma};
use serde::{Deserialize, Serialize};

use crate::ddm::{
    core::trial::{FixationItem, TrialRecord},
    errors::{DDMError, DDMResult},
};

/// FixationDistribution — generator for attentional fixation schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixationDistribution {
    /// Resample observed durations.
    Empirical {
        prob_left_first: f64,
        latencies_ms: Vec<u64>,
        transitions_ms: Vec<u64>,
        /// `fixations_ms[k]` holds durations of the k-th value fixation.
        fixations_ms: Vec<Vec<u64>>,
    },
    /// Fixed blank periods, gamma fixation durations.
    Parametric { prob_left_first: f64, latency_ms: u64, transition_ms: u64, shape: f64, scale: f64 },
}

impl FixationDistribution {
    /// Build a validated empirical distribution.
    ///
    /// # Errors
    /// [`DDMError::InvalidFixationDistribution`] if any sample set is empty or
    /// `prob_left_first ∉ [0, 1]`.
    pub fn empirical(
        prob_left_first: f64, latencies_ms: Vec<u64>, transitions_ms: Vec<u64>,
        fixations_ms: Vec<Vec<u64>>,
    ) -> DDMResult<Self> {
        let dist =
            FixationDistribution::Empirical { prob_left_first, latencies_ms, transitions_ms, fixations_ms };
        dist.validate()?;
        Ok(dist)
    }

    /// Build a validated parametric distribution.
    ///
    /// # Errors
    /// [`DDMError::InvalidFixationDistribution`] if `shape`/`scale` are not
    /// strictly positive and finite or `prob_left_first ∉ [0, 1]`.
    pub fn parametric(
        prob_left_first: f64, latency_ms: u64, transition_ms: u64, shape: f64, scale: f64,
    ) -> DDMResult<Self> {
        let dist = FixationDistribution::Parametric {
            prob_left_first,
            latency_ms,
            transition_ms,
            shape,
            scale,
        };
        dist.validate()?;
        Ok(dist)
    }

    /// Estimate an empirical distribution from observed attentional trials.
    ///
    /// Per trial, blank entries before the first value fixation contribute to
    /// the latency samples, blank entries between value fixations contribute
    /// to the transition samples, and every value fixation except the last
    /// (which is cut short by the decision) contributes to the bucket of its
    /// fixation number, capped at `num_fix_dists - 1`.
    ///
    /// # Errors
    /// - [`DDMError::InvalidOption`] if `num_fix_dists == 0`.
    /// - [`DDMError::InvalidFixationDistribution`] if the trials do not yield
    ///   at least one sample of each kind.
    pub fn from_trials(trials: &[TrialRecord], num_fix_dists: usize) -> DDMResult<Self> {
        if num_fix_dists == 0 {
            return Err(DDMError::InvalidOption {
                name: "num_fix_dists",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        let mut first_left = 0usize;
        let mut first_total = 0usize;
        let mut latencies_ms = Vec::new();
        let mut transitions_ms = Vec::new();
        let mut fixations_ms = vec![Vec::new(); num_fix_dists];

        for schedule in trials.iter().filter_map(|t| t.fixations.as_ref()) {
            let last_value = schedule.items().iter().rposition(|&i| i != FixationItem::Blank);
            let mut seen_value = false;
            let mut latency = 0u64;
            let mut fix_number = 0usize;
            for (pos, (item, dur)) in schedule.iter().enumerate() {
                match item {
                    FixationItem::Blank if !seen_value => latency += dur,
                    FixationItem::Blank => transitions_ms.push(dur),
                    value_item => {
                        if !seen_value {
                            seen_value = true;
                            first_total += 1;
                            if value_item == FixationItem::Left {
                                first_left += 1;
                            }
                            latencies_ms.push(latency);
                        }
                        if Some(pos) != last_value {
                            fixations_ms[fix_number.min(num_fix_dists - 1)].push(dur);
                        }
                        fix_number += 1;
                    }
                }
            }
        }

        if first_total == 0 {
            return Err(DDMError::InvalidFixationDistribution {
                reason: "no trial contains a value fixation",
            });
        }
        // Drop trailing empty buckets so late fixations reuse the last populated one.
        while fixations_ms.last().is_some_and(|b| b.is_empty()) {
            fixations_ms.pop();
        }
        if transitions_ms.is_empty() {
            transitions_ms.push(0);
        }
        let prob_left_first = first_left as f64 / first_total as f64;
        Self::empirical(prob_left_first, latencies_ms, transitions_ms, fixations_ms)
    }

    pub fn validate(&self) -> DDMResult<()> {
        let p = self.prob_left_first();
        if !(0.0..=1.0).contains(&p) {
            return Err(DDMError::InvalidFixationDistribution {
                reason: "prob_left_first must lie in [0, 1]",
            });
        }
        match self {
            FixationDistribution::Empirical { latencies_ms, transitions_ms, fixations_ms, .. } => {
                if latencies_ms.is_empty() {
                    return Err(DDMError::InvalidFixationDistribution {
                        reason: "latency samples must not be empty",
                    });
                }
                if transitions_ms.is_empty() {
                    return Err(DDMError::InvalidFixationDistribution {
                        reason: "transition samples must not be empty",
                    });
                }
                if fixations_ms.is_empty() || fixations_ms.iter().any(|b| b.is_empty()) {
                    return Err(DDMError::InvalidFixationDistribution {
                        reason: "every fixation bucket must hold at least one sample",
                    });
                }
            }
            FixationDistribution::Parametric { shape, scale, .. } => {
                let ok = |v: f64| v.is_finite() && v > 0.0;
                if !ok(*shape) || !ok(*scale) {
                    return Err(DDMError::InvalidFixationDistribution {
                        reason: "gamma shape and scale must be positive and finite",
                    });
                }
            }
        }
        Ok(())
    }

    pub fn prob_left_first(&self) -> f64 {
        match self {
            FixationDistribution::Empirical { prob_left_first, .. }
            | FixationDistribution::Parametric { prob_left_first, .. } => *prob_left_first,
        }
    }

    /// Draw the side of the first value fixation.
    pub fn sample_first_item<R: Rng + ?Sized>(&self, rng: &mut R) -> FixationItem {
        if rng.gen::<f64>() < self.prob_left_first() {
            FixationItem::Left
        } else {
            FixationItem::Right
        }
    }

    /// Draw the blank latency before the first fixation (ms).
    pub fn sample_latency<R: Rng + ?Sized>(&self, rng: &mut R) -> DDMResult<u64> {
        match self {
            FixationDistribution::Empirical { latencies_ms, .. } => pick(latencies_ms, rng),
            FixationDistribution::Parametric { latency_ms, .. } => Ok(*latency_ms),
        }
    }

    /// Draw a blank transition between fixations (ms).
    pub fn sample_transition<R: Rng + ?Sized>(&self, rng: &mut R) -> DDMResult<u64> {
        match self {
            FixationDistribution::Empirical { transitions_ms, .. } => pick(transitions_ms, rng),
            FixationDistribution::Parametric { transition_ms, .. } => Ok(*transition_ms),
        }
    }

    /// Draw the duration of value fixation number `fix_number` (ms, ≥ 1).
    ///
    /// # Errors
    /// [`DDMError::InvalidFixationDistribution`] / [`DDMError::Distribution`]
    /// if the distribution was never validated.
    pub fn sample_fixation<R: Rng + ?Sized>(&self, fix_number: usize, rng: &mut R) -> DDMResult<u64> {
        let raw = match self {
            FixationDistribution::Empirical { fixations_ms, .. } => {
                let bucket = fixations_ms
                    .get(fix_number.min(fixations_ms.len().saturating_sub(1)))
                    .ok_or(DDMError::InvalidFixationDistribution {
                        reason: "every fixation bucket must hold at least one sample",
                    })?;
                pick(bucket, rng)?
            }
            FixationDistribution::Parametric { shape, scale, .. } => {
                let gamma = Gamma::new(*shape, *scale)?;
                gamma.sample(rng).round() as u64
            }
        };
        Ok(raw.max(1))
    }
}

fn pick<R: Rng + ?Sized>(samples: &[u64], rng: &mut R) -> DDMResult<u64> {
    samples.choose(rng).copied().ok_or(DDMError::InvalidFixationDistribution {
        reason: "sample sets must not be empty",
    })
}
