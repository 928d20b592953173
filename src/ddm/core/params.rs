//! ddm::core::params — validated model parameters and their identity keys.
//!
//! Purpose
//! -------
//! Represent the parameter tuples of the two decision models and the
//! hashable value type ([`ModelKey`]) used to index likelihood tables and
//! posterior distributions.
//!
//! Key behaviors
//! -------------
//! - [`DDMParams`] holds `(d, sigma)`; [`ADDMParams`] holds
//!   `(d, sigma, theta)`. Both validate on construction.
//! - [`ADDMParams::from_d_theta_mu`] maps the fitting parameterisation
//!   `(d, theta, mu)` onto `(d, sigma = mu · d, theta)`.
//! - [`ModelKey`] wraps every coordinate in `OrderedFloat<f64>` so keys get
//!   structural `Eq`, `Hash`, and `Ord` without exposing raw float
//!   comparisons to callers.
//!
//! Invariants & assumptions
//! ------------------------
//! - `d` is finite and ≥ 0 (the drift scale multiplies value differences).
//! - `sigma` is finite and > 0 (the per-step noise standard deviation).
//! - `theta ∈ [0, 1]` discounts the unattended item.
//! - Keys are produced only from validated parameters, so they never hold
//!   NaN.
//!
//! Conventions
//! -----------
//! - `Display` renders keys as `DDM(d=…, sigma=…)` or
//!   `aDDM(d=…, sigma=…, theta=…)`; this is the format used in logs and
//!   error messages.
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ddm::{
    core::validation::{non_negative_param, positive_param, unit_interval_param},
    errors::DDMResult,
};

/// ModelKey — structural identity of a candidate model.
///
/// Two models with equal parameter tuples share a key. The variant encodes
/// the model family so a DDM and an aDDM with `theta = 1` never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelKey {
    Ddm { d: OrderedFloat<f64>, sigma: OrderedFloat<f64> },
    Addm { d: OrderedFloat<f64>, sigma: OrderedFloat<f64>, theta: OrderedFloat<f64> },
}

impl ModelKey {
    pub fn ddm(d: f64, sigma: f64) -> Self {
        ModelKey::Ddm { d: OrderedFloat(d), sigma: OrderedFloat(sigma) }
    }

    pub fn addm(d: f64, sigma: f64, theta: f64) -> Self {
        ModelKey::Addm { d: OrderedFloat(d), sigma: OrderedFloat(sigma), theta: OrderedFloat(theta) }
    }

    pub fn d(&self) -> f64 {
        match self {
            ModelKey::Ddm { d, .. } | ModelKey::Addm { d, .. } => d.into_inner(),
        }
    }

    pub fn sigma(&self) -> f64 {
        match self {
            ModelKey::Ddm { sigma, .. } | ModelKey::Addm { sigma, .. } => sigma.into_inner(),
        }
    }

    /// Attention discount, present only for the attentional family.
    pub fn theta(&self) -> Option<f64> {
        match self {
            ModelKey::Ddm { .. } => None,
            ModelKey::Addm { theta, .. } => Some(theta.into_inner()),
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKey::Ddm { d, sigma } => write!(f, "DDM(d={d}, sigma={sigma})"),
            ModelKey::Addm { d, sigma, theta } => {
                write!(f, "aDDM(d={d}, sigma={sigma}, theta={theta})")
            }
        }
    }
}

/// DDMParams — drift scale and noise of the base diffusion model.
///
/// Fields
/// ------
/// - `d`: drift per time step per unit of value difference.
/// - `sigma`: standard deviation of the per-step Gaussian noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DDMParams {
    pub d: f64,
    pub sigma: f64,
}

impl DDMParams {
    /// Build validated DDM parameters.
    ///
    /// # Errors
    /// - [`DDMError::InvalidParameter`](crate::ddm::errors::DDMError::InvalidParameter)
    ///   if `d` is negative or non-finite, or if `sigma` is not strictly
    ///   positive and finite.
    pub fn new(d: f64, sigma: f64) -> DDMResult<Self> {
        let d = non_negative_param("d", d)?;
        let sigma = positive_param("sigma", sigma)?;
        Ok(Self { d, sigma })
    }

    pub fn key(&self) -> ModelKey {
        ModelKey::ddm(self.d, self.sigma)
    }

    /// Mean evidence increment for a pair of stimulus values.
    #[inline]
    pub fn drift(&self, value_left: f64, value_right: f64) -> f64 {
        self.d * (value_left - value_right)
    }
}

/// ADDMParams — attentional drift-diffusion parameters.
///
/// Fields
/// ------
/// - `d`: drift scale.
/// - `sigma`: per-step noise standard deviation.
/// - `theta`: multiplicative discount applied to the unattended item's value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ADDMParams {
    pub d: f64,
    pub sigma: f64,
    pub theta: f64,
}

impl ADDMParams {
    /// Build validated aDDM parameters.
    ///
    /// # Errors
    /// - `InvalidParameter` if `d < 0`, `sigma ≤ 0`, `theta ∉ [0, 1]`, or any
    ///   coordinate is non-finite.
    pub fn new(d: f64, sigma: f64, theta: f64) -> DDMResult<Self> {
        let d = non_negative_param("d", d)?;
        let sigma = positive_param("sigma", sigma)?;
        let theta = unit_interval_param("theta", theta)?;
        Ok(Self { d, sigma, theta })
    }

    /// Build aDDM parameters from the fitting parameterisation `(d, theta, mu)`.
    ///
    /// `mu` is the noise-to-drift ratio, so `sigma = mu · d`.
    ///
    /// # Errors
    /// - `InvalidParameter` if `mu` is not strictly positive, or if the
    ///   resulting triple fails [`ADDMParams::new`] (e.g. `d = 0` gives
    ///   `sigma = 0`).
    pub fn from_d_theta_mu(d: f64, theta: f64, mu: f64) -> DDMResult<Self> {
        let mu = positive_param("mu", mu)?;
        Self::new(d, mu * d, theta)
    }

    pub fn key(&self) -> ModelKey {
        ModelKey::addm(self.d, self.sigma, self.theta)
    }

    /// Mean increment while the left item is fixated.
    #[inline]
    pub fn drift_left(&self, value_left: f64, value_right: f64) -> f64 {
        self.d * (value_left - self.theta * value_right)
    }

    /// Mean increment while the right item is fixated.
    #[inline]
    pub fn drift_right(&self, value_left: f64, value_right: f64) -> f64 {
        self.d * (self.theta * value_left - value_right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddm::errors::DDMError;
    use std::collections::HashMap;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation in `DDMParams::new` / `ADDMParams::new`.
    // - The `(d, theta, mu)` mapping.
    // - Key equality, hashing, and family separation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure keys with equal tuples are interchangeable as map keys.
    //
    // Given
    // -----
    // - Two independently constructed `DDMParams` with the same values.
    //
    // Expect
    // ------
    // - Both keys address the same `HashMap` entry.
    fn equal_parameter_tuples_share_a_key() {
        // Arrange
        let a = DDMParams::new(0.005, 0.07).expect("valid params");
        let b = DDMParams::new(0.005, 0.07).expect("valid params");
        let mut map = HashMap::new();

        // Act
        map.insert(a.key(), 1);
        map.insert(b.key(), 2);

        // Assert
        assert_eq!(map.len(), 1);
        assert_eq!(map[&a.key()], 2);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the model family is part of the identity.
    //
    // Given
    // -----
    // - A DDM key and an aDDM key with the same `(d, sigma)` and `theta = 1`.
    //
    // Expect
    // ------
    // - The keys differ and only the aDDM key reports a `theta`.
    fn families_never_collide() {
        // Arrange
        let ddm = ModelKey::ddm(0.01, 0.1);
        let addm = ModelKey::addm(0.01, 0.1, 1.0);

        // Assert
        assert_ne!(ddm, addm);
        assert_eq!(ddm.theta(), None);
        assert_eq!(addm.theta(), Some(1.0));
        assert_eq!(addm.d(), 0.01);
        assert_eq!(addm.sigma(), 0.1);
    }

    #[test]
    // Purpose
    // -------
    // Check the `(d, theta, mu)` parameterisation.
    //
    // Given
    // -----
    // - `d = 0.0002`, `theta = 0.5`, `mu = 200`.
    //
    // Expect
    // ------
    // - `sigma = 0.04` and `theta` is carried through.
    fn from_d_theta_mu_scales_noise_by_drift() {
        // Act
        let p = ADDMParams::from_d_theta_mu(0.0002, 0.5, 200.0).expect("valid params");

        // Assert
        assert!((p.sigma - 0.04).abs() < 1e-15);
        assert_eq!(p.theta, 0.5);
    }

    #[test]
    // Purpose
    // -------
    // Ensure invalid domains are rejected with the offending field name.
    //
    // Given
    // -----
    // - `sigma = 0`, `theta = 1.5`, and `d = 0` with any `mu`.
    //
    // Expect
    // ------
    // - Each constructor fails with `InvalidParameter` for the right field.
    fn invalid_domains_are_rejected() {
        // Act
        let zero_sigma = DDMParams::new(0.01, 0.0).expect_err("sigma = 0 is invalid");
        let big_theta = ADDMParams::new(0.01, 0.1, 1.5).expect_err("theta > 1 is invalid");
        let zero_d = ADDMParams::from_d_theta_mu(0.0, 0.5, 100.0).expect_err("sigma = 0");

        // Assert
        assert!(matches!(zero_sigma, DDMError::InvalidParameter { name: "sigma", .. }));
        assert!(matches!(big_theta, DDMError::InvalidParameter { name: "theta", .. }));
        assert!(matches!(zero_d, DDMError::InvalidParameter { name: "sigma", .. }));
    }

    #[test]
    // Purpose
    // -------
    // Check the attentional drift formulas at the extremes of `theta`.
    //
    // Given
    // -----
    // - `theta = 1` (no discount) and `theta = 0` (unattended item ignored).
    //
    // Expect
    // ------
    // - With `theta = 1` both fixations give the DDM drift `d (vL - vR)`.
    // - With `theta = 0` only the fixated value contributes.
    fn attentional_drift_matches_theta_extremes() {
        // Arrange
        let full = ADDMParams::new(0.1, 0.5, 1.0).expect("valid params");
        let none = ADDMParams::new(0.1, 0.5, 0.0).expect("valid params");

        // Assert
        assert!((full.drift_left(3.0, 1.0) - 0.2).abs() < 1e-12);
        assert!((full.drift_right(3.0, 1.0) - 0.2).abs() < 1e-12);
        assert!((none.drift_left(3.0, 1.0) - 0.3).abs() < 1e-12);
        assert!((none.drift_right(3.0, 1.0) + 0.1).abs() < 1e-12);
    }
}
