//! Public API surface for bounded minimization.
//!
//! - [`Objective`]: trait users implement for the function to minimize.
//! - [`Bounds`]: per-coordinate box constraints.
//! - [`NMOptions`]: Nelder–Mead configuration.
//! - [`OptimOutcome`]: normalized result returned by `minimize`.
use argmin::core::TerminationStatus;
use serde::{Deserialize, Serialize};

use crate::optimization::{
    errors::{OptError, OptResult},
    nll_optimizer::{
        types::{Cost, DEFAULT_MAX_ITER, DEFAULT_SD_TOLERANCE, DEFAULT_SIMPLEX_FRACTION, FnEvalMap, Theta},
        validation::{
            validate_theta_hat, validate_value, verify_max_iter, verify_sd_tolerance,
            verify_simplex_fraction,
        },
    },
};

/// User-implemented objective interface.
///
/// Required:
/// - `value(&Theta) -> OptResult<Cost>`: the quantity to minimize. The
///   optimizer only ever calls it with `θ` inside the bounds.
/// - `check(&Theta) -> OptResult<()>`: validation hook called once on the
///   initial guess before optimization.
pub trait Objective {
    fn value(&self, theta: &Theta) -> OptResult<Cost>;
    fn check(&self, theta: &Theta) -> OptResult<()>;
}

/// Bounds — closed box `[lower_i, upper_i]` for each coordinate.
///
/// Invariants
/// ----------
/// - `lower.len() == upper.len() ≥ 1`.
/// - Every bound is finite and `lower_i ≤ upper_i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// # Errors
    /// - [`OptError::ThetaLengthMismatch`] if the vectors differ in length
    ///   or are empty.
    /// - [`OptError::InvalidBounds`] for non-finite bounds or `lower > upper`.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> OptResult<Self> {
        if lower.len() != upper.len() || lower.is_empty() {
            return Err(OptError::ThetaLengthMismatch {
                expected: lower.len().max(1),
                actual: upper.len(),
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(&upper).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(OptError::InvalidBounds {
                    index,
                    lower: lo,
                    upper: hi,
                    reason: "Bounds must be finite.",
                });
            }
            if lo > hi {
                return Err(OptError::InvalidBounds {
                    index,
                    lower: lo,
                    upper: hi,
                    reason: "Lower bound exceeds upper bound.",
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Build from `(lower, upper)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> OptResult<Self> {
        let (lower, upper) = pairs.iter().copied().unzip();
        Self::new(lower, upper)
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn width(&self, index: usize) -> f64 {
        self.upper[index] - self.lower[index]
    }

    pub fn contains(&self, theta: &Theta) -> bool {
        theta.iter().zip(self.lower.iter().zip(&self.upper)).all(|(x, (lo, hi))| lo <= x && x <= hi)
    }

    /// Clamp every coordinate into the box.
    pub fn project(&self, theta: &Theta) -> Theta {
        let mut out = theta.clone();
        for (x, (lo, hi)) in out.iter_mut().zip(self.lower.iter().zip(&self.upper)) {
            *x = x.clamp(*lo, *hi);
        }
        out
    }

    /// Squared distance outside the box, each coordinate scaled by its width
    /// (degenerate widths count as 1).
    pub fn excess_sq(&self, theta: &Theta) -> f64 {
        theta
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let outside = x - x.clamp(self.lower[i], self.upper[i]);
                let width = self.width(i);
                let scale = if width > 0.0 { width } else { 1.0 };
                (outside / scale).powi(2)
            })
            .sum()
    }
}

/// NMOptions — Nelder–Mead configuration.
///
/// - `sd_tolerance`: stop when the standard deviation of the simplex costs
///   falls below this value (default `1e-3`).
/// - `max_iter`: hard cap on iterations (default 200).
/// - `simplex_fraction`: initial simplex step per coordinate as a fraction
///   of the box width (default 0.05).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NMOptions {
    #[serde(default = "default_sd_tolerance")]
    pub sd_tolerance: f64,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_simplex_fraction")]
    pub simplex_fraction: f64,
}

fn default_sd_tolerance() -> f64 {
    DEFAULT_SD_TOLERANCE
}

fn default_max_iter() -> usize {
    DEFAULT_MAX_ITER
}

fn default_simplex_fraction() -> f64 {
    DEFAULT_SIMPLEX_FRACTION
}

impl NMOptions {
    /// # Errors
    /// Propagates the option guards in `validation`.
    pub fn new(sd_tolerance: f64, max_iter: usize, simplex_fraction: f64) -> OptResult<Self> {
        let opts = Self { sd_tolerance, max_iter, simplex_fraction };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> OptResult<()> {
        verify_sd_tolerance(self.sd_tolerance)?;
        verify_max_iter(self.max_iter)?;
        verify_simplex_fraction(self.simplex_fraction)
    }
}

impl Default for NMOptions {
    fn default() -> Self {
        Self {
            sd_tolerance: DEFAULT_SD_TOLERANCE,
            max_iter: DEFAULT_MAX_ITER,
            simplex_fraction: DEFAULT_SIMPLEX_FRACTION,
        }
    }
}

/// Canonical result returned by `minimize`.
///
/// - `theta_hat`: best parameter vector found, projected into the bounds.
/// - `value`: objective value at `theta_hat`.
/// - `converged`: `true` if the solver reported a terminating status other
///   than `NotTerminated`.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, converged: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let status: String;
        let converged = match converged {
            TerminationStatus::NotTerminated => {
                status = "Not terminated".to_string();
                false
            }
            _ => {
                status = format!("{converged:?}");
                true
            }
        };
        let iterations = iterations as usize;
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals })
    }
}
