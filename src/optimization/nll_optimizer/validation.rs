//! Validation helpers for the bounded minimizer.
//!
//! - **Option checks**: [`verify_sd_tolerance`], [`verify_max_iter`],
//!   [`verify_simplex_fraction`].
//! - **Parameter checks**: [`validate_theta`] enforces the expected length
//!   and finite entries of an input vector.
//! - **Outcome checks**: [`validate_theta_hat`] and [`validate_value`].
//!
//! All helpers return dedicated [`OptError`] variants.
use crate::optimization::{
    errors::{OptError, OptResult},
    nll_optimizer::types::Theta,
};

/// Validate the simplex standard-deviation tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidSdTolerance`] if the value is non-finite or ≤ 0.0.
pub fn verify_sd_tolerance(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidSdTolerance { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidSdTolerance { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// # Errors
/// Returns [`OptError::InvalidMaxIter`] if `max_iter == 0`.
pub fn verify_max_iter(max_iter: usize) -> OptResult<()> {
    if max_iter == 0 {
        return Err(OptError::InvalidMaxIter {
            max_iter,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

/// # Errors
/// Returns [`OptError::InvalidSimplexFraction`] unless `0 < value ≤ 1`.
pub fn verify_simplex_fraction(value: f64) -> OptResult<()> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(OptError::InvalidSimplexFraction {
            value,
            reason: "Fraction of the box width must lie in (0, 1].",
        });
    }
    Ok(())
}

/// Validate an input parameter vector against length and finiteness.
///
/// # Errors
/// - [`OptError::ThetaLengthMismatch`] if `theta.len() != dim`.
/// - [`OptError::InvalidThetaInput`] for the first non-finite entry.
pub fn validate_theta(theta: &Theta, dim: usize) -> OptResult<()> {
    if theta.len() != dim {
        return Err(OptError::ThetaLengthMismatch { expected: dim, actual: theta.len() });
    }
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
