//! ddm::core::validation — scalar guards shared by parameters and options.
//!
//! Small helpers that turn domain checks into [`DDMError`] values so that
//! constructors across `ddm::core` report violations uniformly. Each helper
//! takes the field name it is checking so messages stay precise.
use crate::ddm::errors::{DDMError, DDMResult};

/// Require a finite model parameter.
///
/// # Errors
/// [`DDMError::InvalidParameter`] if `value` is NaN or ±∞.
pub fn finite_param(name: &'static str, value: f64) -> DDMResult<f64> {
    if !value.is_finite() {
        return Err(DDMError::InvalidParameter { name, value, reason: "must be finite" });
    }
    Ok(value)
}

/// Require a finite, non-negative model parameter.
///
/// # Errors
/// [`DDMError::InvalidParameter`] if `value` is non-finite or negative.
pub fn non_negative_param(name: &'static str, value: f64) -> DDMResult<f64> {
    finite_param(name, value)?;
    if value < 0.0 {
        return Err(DDMError::InvalidParameter { name, value, reason: "must be non-negative" });
    }
    Ok(value)
}

/// Require a finite, strictly positive model parameter.
///
/// # Errors
/// [`DDMError::InvalidParameter`] if `value` is non-finite or ≤ 0.
pub fn positive_param(name: &'static str, value: f64) -> DDMResult<f64> {
    finite_param(name, value)?;
    if value <= 0.0 {
        return Err(DDMError::InvalidParameter { name, value, reason: "must be positive" });
    }
    Ok(value)
}

/// Require a model parameter in the closed unit interval.
///
/// # Errors
/// [`DDMError::InvalidParameter`] if `value` is non-finite or outside `[0, 1]`.
pub fn unit_interval_param(name: &'static str, value: f64) -> DDMResult<f64> {
    finite_param(name, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(DDMError::InvalidParameter { name, value, reason: "must lie in [0, 1]" });
    }
    Ok(value)
}

/// Require a finite, strictly positive option value.
///
/// # Errors
/// [`DDMError::InvalidOption`] if `value` is non-finite or ≤ 0.
pub fn positive_option(name: &'static str, value: f64) -> DDMResult<f64> {
    if !value.is_finite() {
        return Err(DDMError::InvalidOption { name, value, reason: "must be finite" });
    }
    if value <= 0.0 {
        return Err(DDMError::InvalidOption { name, value, reason: "must be positive" });
    }
    Ok(value)
}

/// Require a finite stimulus value on a trial.
///
/// # Errors
/// [`DDMError::NonFiniteValue`] if `value` is NaN or ±∞.
pub fn finite_value(name: &'static str, value: f64) -> DDMResult<f64> {
    if !value.is_finite() {
        return Err(DDMError::NonFiniteValue { name, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the accept/reject boundaries of each guard.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check the boundaries of `positive_param` and `non_negative_param`.
    //
    // Given
    // -----
    // - Zero, a negative value, and NaN.
    //
    // Expect
    // ------
    // - Zero is rejected by `positive_param` but accepted by
    //   `non_negative_param`; negatives and NaN are rejected by both.
    fn positivity_guards_respect_boundaries() {
        // Act / Assert
        assert!(positive_param("sigma", 0.0).is_err());
        assert_eq!(non_negative_param("d", 0.0).expect("zero is admissible"), 0.0);
        assert!(non_negative_param("d", -1e-9).is_err());
        assert!(positive_param("sigma", f64::NAN).is_err());
        assert!(non_negative_param("d", f64::NAN).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Ensure the unit-interval guard is closed at both ends.
    //
    // Given
    // -----
    // - 0.0, 1.0, and 1.0 + 1e-12.
    //
    // Expect
    // ------
    // - The endpoints pass; the value just above 1 fails with
    //   `InvalidParameter` naming the field.
    fn unit_interval_is_closed() {
        // Act
        let above = unit_interval_param("theta", 1.0 + 1e-12);

        // Assert
        assert!(unit_interval_param("theta", 0.0).is_ok());
        assert!(unit_interval_param("theta", 1.0).is_ok());
        match above {
            Err(DDMError::InvalidParameter { name, .. }) => assert_eq!(name, "theta"),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that trial values report `NonFiniteValue` rather than a
    // parameter error.
    //
    // Given
    // -----
    // - An infinite left value.
    //
    // Expect
    // ------
    // - `NonFiniteValue { name: "value_left", .. }`.
    fn finite_value_reports_trial_error() {
        // Act
        let err = finite_value("value_left", f64::INFINITY).expect_err("infinity is rejected");

        // Assert
        assert!(matches!(err, DDMError::NonFiniteValue { name: "value_left", .. }));
    }
}
