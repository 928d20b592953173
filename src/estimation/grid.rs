//! estimation::grid — Cartesian candidate grids for model comparison.
//!
//! Builds one model per point of `range_d × range_sigma` (DDM) or
//! `range_d × range_sigma × range_theta` (aDDM), in row-major order with
//! `d` varying slowest. Every model shares the same options. Empty ranges
//! and repeated points are rejected so that keys stay unique.
use std::collections::HashSet;

use crate::ddm::{
    core::{ADDMParams, DDMParams, ModelOpts},
    errors::{DDMError, DDMResult},
    models::{ADDM, DDM, DecisionModel},
};

/// DDM grid over `range_d × range_sigma`.
///
/// # Errors
/// - [`DDMError::EmptyGrid`] if either range is empty.
/// - [`DDMError::InvalidParameter`] for out-of-domain values.
/// - [`DDMError::DuplicateModel`] if a point repeats.
pub fn ddm_grid(range_d: &[f64], range_sigma: &[f64], opts: &ModelOpts) -> DDMResult<Vec<DDM>> {
    let mut grid = Vec::with_capacity(range_d.len() * range_sigma.len());
    for &d in range_d {
        for &sigma in range_sigma {
            grid.push(DDM::new(DDMParams::new(d, sigma)?, opts.clone())?);
        }
    }
    check_unique(grid)
}

/// aDDM grid over `range_d × range_sigma × range_theta`.
///
/// # Errors
/// Same as [`ddm_grid`], with `theta` validated to `[0, 1]`.
pub fn addm_grid(
    range_d: &[f64], range_sigma: &[f64], range_theta: &[f64], opts: &ModelOpts,
) -> DDMResult<Vec<ADDM>> {
    let mut grid = Vec::with_capacity(range_d.len() * range_sigma.len() * range_theta.len());
    for &d in range_d {
        for &sigma in range_sigma {
            for &theta in range_theta {
                grid.push(ADDM::new(ADDMParams::new(d, sigma, theta)?, opts.clone())?);
            }
        }
    }
    check_unique(grid)
}

fn check_unique<M: DecisionModel>(grid: Vec<M>) -> DDMResult<Vec<M>> {
    if grid.is_empty() {
        return Err(DDMError::EmptyGrid);
    }
    let mut seen = HashSet::with_capacity(grid.len());
    for model in &grid {
        if !seen.insert(model.key()) {
            return Err(DDMError::DuplicateModel { model: model.key() });
        }
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddm::core::ModelKey;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover grid ordering and the empty/duplicate guards.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify size and ordering of a DDM grid.
    //
    // Given
    // -----
    // - `d ∈ {0.005, 0.01}`, `sigma ∈ {0.05, 0.07, 0.09}`.
    //
    // Expect
    // ------
    // - Six models; the first two keys vary `sigma` with `d` fixed.
    fn ddm_grid_is_row_major() {
        // Act
        let grid = ddm_grid(&[0.005, 0.01], &[0.05, 0.07, 0.09], &ModelOpts::default())
            .expect("valid grid");

        // Assert
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0].key(), ModelKey::ddm(0.005, 0.05));
        assert_eq!(grid[1].key(), ModelKey::ddm(0.005, 0.07));
        assert_eq!(grid[5].key(), ModelKey::ddm(0.01, 0.09));
    }

    #[test]
    // Purpose
    // -------
    // Ensure the aDDM grid covers theta and rejects bad inputs.
    //
    // Given
    // -----
    // - A 1 × 1 × 3 aDDM grid; an empty theta range; a repeated sigma; an
    //   out-of-range theta.
    //
    // Expect
    // ------
    // - Three models; `EmptyGrid`; `DuplicateModel`; `InvalidParameter`.
    fn addm_grid_guards() {
        // Arrange
        let opts = ModelOpts::default();

        // Act
        let grid = addm_grid(&[0.005], &[0.07], &[0.3, 0.5, 0.7], &opts).expect("valid grid");
        let empty = addm_grid(&[0.005], &[0.07], &[], &opts);
        let dup = addm_grid(&[0.005], &[0.07, 0.07], &[0.5], &opts);
        let bad = addm_grid(&[0.005], &[0.07], &[1.5], &opts);

        // Assert
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[2].key(), ModelKey::addm(0.005, 0.07, 0.7));
        assert!(matches!(empty, Err(DDMError::EmptyGrid)));
        assert!(matches!(dup, Err(DDMError::DuplicateModel { .. })));
        assert!(matches!(bad, Err(DDMError::InvalidParameter { name: "theta", .. })));
    }
}
