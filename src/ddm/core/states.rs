//! ddm::core::states — discretised evidence grid and one-step transitions.
//!
//! Purpose
//! -------
//! Provide the numerical building blocks of the probability transfer
//! algorithm: a symmetric grid of evidence states strictly inside the
//! barriers, and a transition kernel that moves probability mass one time
//! step forward under a Gaussian increment `N(mean, sigma)`.
//!
//! Key behaviors
//! -------------
//! - [`StateGrid::new`] places `2·h + 1` states at spacing
//!   `step = barrier / (h + 0.5)` with `h = ceil(barrier / approx_step)`, so
//!   the outermost states sit half a step inside each barrier and one state
//!   sits exactly at 0.
//! - [`TransitionKernel::new`] precomputes the inside-to-inside matrix
//!   `K[i, j] = step · φ(s_i − s_j; mean, sigma)` and the per-state barrier
//!   crossing probabilities `P(s_j + X ≥ barrier)` and
//!   `P(s_j + X ≤ −barrier)`.
//! - [`TransitionKernel::advance`] applies one step and renormalises so that
//!   the mass staying inside plus both crossing masses equals the incoming
//!   mass.
//!
//! Invariants & assumptions
//! ------------------------
//! - `sigma > 0` and `barrier > 0`; callers validate parameters first.
//! - The grid is fixed per model; only kernels depend on the drift mean.
//!
//! Performance
//! -----------
//! - Kernel construction evaluates the density once per grid offset
//!   (`2n − 1` values) rather than once per matrix entry.
//! - One step costs a dense `n × n` matrix-vector product.
//!
//! Testing notes
//! -------------
//! - Unit tests check grid geometry, mass conservation per step, and the
//!   direction of crossing mass under a strong positive drift.
use ndarray::{Array1, Array2};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::ddm::{
    core::validation::positive_option,
    errors::{DDMError, DDMResult},
};

/// Largest admissible number of grid states. Each transition kernel holds a
/// dense `n × n` matrix, so this also bounds kernel memory (about 8 MB).
pub const MAX_STATES: usize = 1001;

/// Number of states for `barrier` with target spacing `approx_state_step`.
///
/// # Errors
/// `InvalidOption` if either argument is not strictly positive and finite,
/// or if the grid would exceed [`MAX_STATES`].
pub fn state_count(barrier: f64, approx_state_step: f64) -> DDMResult<usize> {
    positive_option("barrier", barrier)?;
    positive_option("approx_state_step", approx_state_step)?;
    let too_fine = DDMError::InvalidOption {
        name: "approx_state_step",
        value: approx_state_step,
        reason: "grid would exceed MAX_STATES states",
    };
    let half = (barrier / approx_state_step).ceil();
    if !half.is_finite() || half > ((MAX_STATES - 1) / 2) as f64 {
        return Err(too_fine);
    }
    (half as usize).checked_mul(2).and_then(|n| n.checked_add(1)).ok_or(too_fine)
}

/// StateGrid — evidence states strictly between the barriers.
#[derive(Debug, Clone, PartialEq)]
pub struct StateGrid {
    states: Array1<f64>,
    step: f64,
    barrier: f64,
}

impl StateGrid {
    /// Build the grid for `barrier` with target spacing `approx_state_step`.
    ///
    /// # Errors
    /// As [`state_count`].
    pub fn new(barrier: f64, approx_state_step: f64) -> DDMResult<Self> {
        let n = state_count(barrier, approx_state_step)?;
        let half = n / 2;
        let step = barrier / (half as f64 + 0.5);
        let first = -barrier + step / 2.0;
        let states = Array1::from_shape_fn(n, |i| first + i as f64 * step);
        Ok(Self { states, step, barrier })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn barrier(&self) -> f64 {
        self.barrier
    }

    pub fn states(&self) -> &Array1<f64> {
        &self.states
    }

    /// Index of the state closest to `value`, clamped to the grid.
    pub fn nearest_index(&self, value: f64) -> usize {
        let raw = ((value - self.states[0]) / self.step).round();
        raw.clamp(0.0, (self.len() - 1) as f64) as usize
    }

    /// Point mass at the state closest to `initial_value`.
    pub fn point_mass(&self, initial_value: f64) -> Array1<f64> {
        let mut mass = Array1::zeros(self.len());
        mass[self.nearest_index(initial_value)] = 1.0;
        mass
    }
}

/// Outcome of one transition step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepMass {
    /// Mass still inside the barriers, per state.
    pub inside: Array1<f64>,
    /// Mass crossing the upper barrier during this step.
    pub up: f64,
    /// Mass crossing the lower barrier during this step.
    pub down: f64,
}

/// TransitionKernel — one time step of the discretised diffusion.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionKernel {
    mean: f64,
    inside: Array2<f64>,
    up: Array1<f64>,
    down: Array1<f64>,
}

impl TransitionKernel {
    /// Precompute transitions on `grid` for increments `N(mean, sigma)`.
    ///
    /// # Errors
    /// `Distribution` if `N(mean, sigma)` cannot be formed (non-finite mean
    /// or `sigma ≤ 0`).
    pub fn new(grid: &StateGrid, mean: f64, sigma: f64) -> DDMResult<Self> {
        let normal = Normal::new(mean, sigma)?;
        let n = grid.len();
        let step = grid.step();
        let barrier = grid.barrier();

        // Density by grid offset k = i - j, stored at k + n - 1.
        let by_offset: Vec<f64> = (0..2 * n - 1)
            .map(|k| step * normal.pdf((k as f64 - (n as f64 - 1.0)) * step))
            .collect();
        let inside = Array2::from_shape_fn((n, n), |(i, j)| by_offset[i + n - 1 - j]);
        let up = grid.states().mapv(|s| normal.sf(barrier - s));
        let down = grid.states().mapv(|s| normal.cdf(-barrier - s));
        Ok(Self { mean, inside, up, down })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Move `mass` one step forward.
    ///
    /// The raw discretisation does not conserve mass exactly; the result is
    /// rescaled by `Σ mass / (Σ inside + up + down)` whenever the
    /// denominator is positive.
    pub fn advance(&self, mass: &Array1<f64>) -> StepMass {
        let mut inside = self.inside.dot(mass);
        let mut up = self.up.dot(mass);
        let mut down = self.down.dot(mass);
        let sum_in = mass.sum();
        let sum_out = inside.sum() + up + down;
        if sum_out > 0.0 {
            let ratio = sum_in / sum_out;
            inside.mapv_inplace(|p| p * ratio);
            up *= ratio;
            down *= ratio;
        }
        StepMass { inside, up, down }
    }
}
