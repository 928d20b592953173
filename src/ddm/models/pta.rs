//! pta — probability transfer over a piecewise-constant drift schedule.
//!
//! Purpose
//! -------
//! Propagate a point mass over the evidence grid through a sequence of
//! segments, each holding a constant drift mean for a whole number of time
//! steps, and read off the probability that the first barrier crossing
//! happens on the final step through the requested barrier.
//!
//! Key behaviors
//! -------------
//! - Kernels are built lazily and cached per distinct drift mean; a DDM
//!   trial needs at most two (non-decision and decision), an aDDM trial at
//!   most three (blank, left, right).
//! - Segments with zero steps are skipped; a schedule with no steps at all
//!   yields likelihood 0.
//! - Each step checks that the crossing masses stay finite, reporting the
//!   step index otherwise.
//!
//! Invariants & assumptions
//! ------------------------
//! - `sigma > 0`; the grid and starting point come from validated options.
//! - The returned value is clamped into `[0, 1]` to absorb rounding.
use ndarray::Array1;

use crate::ddm::{
    core::{Choice, StateGrid, TransitionKernel},
    errors::{DDMError, DDMResult},
};

/// One constant-drift stretch of a trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub mean: f64,
    pub steps: usize,
}

impl Segment {
    pub fn new(mean: f64, steps: usize) -> Self {
        Self { mean, steps }
    }
}

/// Probability that the process started at `initial_value` first crosses
/// the barrier matching `choice` on the last step of `segments`.
///
/// # Errors
/// - [`DDMError::Distribution`] if a kernel cannot be built.
/// - [`DDMError::NonFiniteLikelihood`] if crossing mass becomes non-finite.
pub fn first_passage_probability<I>(
    grid: &StateGrid, sigma: f64, initial_value: f64, segments: I, choice: Choice,
) -> DDMResult<f64>
where
    I: IntoIterator<Item = Segment>,
{
    let mut kernels: Vec<TransitionKernel> = Vec::with_capacity(3);
    let mut mass: Array1<f64> = grid.point_mass(initial_value);
    let mut last: Option<(f64, f64)> = None;
    let mut step = 0usize;

    for segment in segments.into_iter().filter(|s| s.steps > 0) {
        let idx = match kernels.iter().position(|k| k.mean() == segment.mean) {
            Some(idx) => idx,
            None => {
                kernels.push(TransitionKernel::new(grid, segment.mean, sigma)?);
                kernels.len() - 1
            }
        };
        let kernel = &kernels[idx];
        for _ in 0..segment.steps {
            let out = kernel.advance(&mass);
            if !out.up.is_finite() {
                return Err(DDMError::NonFiniteLikelihood { value: out.up, step });
            }
            if !out.down.is_finite() {
                return Err(DDMError::NonFiniteLikelihood { value: out.down, step });
            }
            mass = out.inside;
            last = Some((out.up, out.down));
            step += 1;
        }
    }

    let likelihood = match (last, choice) {
        (None, _) => 0.0,
        (Some((up, _)), Choice::Left) => up,
        (Some((_, down)), Choice::Right) => down,
    };
    Ok(likelihood.clamp(0.0, 1.0))
}
