//! Integration tests for validation mode (simulate → likelihood → posterior).
//!
//! Purpose
//! -------
//! - Validate the end-to-end recovery pipeline at realistic batch sizes:
//!   synthetic trials from a known model, likelihoods under a candidate
//!   grid on the worker pool, and a sequential posterior fold.
//!
//! Coverage
//! --------
//! - `estimation::validation`: `ddm_validation`, `addm_validation`,
//!   `run_validation`, TOML-driven `ValidationConfig`.
//! - `likelihood::LikelihoodEngine` with several worker counts.
//! - `inference::PosteriorDistribution` normalisation and MAP selection.
//!
//! Exclusions
//! ----------
//! - Unit-level checks of the PTA recursion, grids, and options; those live
//!   next to their modules.
use rust_ddm::{
    ddm::{
        core::{DDMParams, FixationDistribution, ModelKey, ModelOpts},
        models::DDM,
    },
    estimation::{ValidationConfig, addm_validation, ddm_validation, run_validation},
};

const TRUE_D: f64 = 0.005;
const TRUE_SIGMA: f64 = 0.07;

fn ddm(d: f64, sigma: f64) -> DDM {
    DDM::new(DDMParams::new(d, sigma).expect("valid params"), ModelOpts::default())
        .expect("valid model")
}

#[test]
// Purpose
// -------
// Recover the generating DDM against a distant alternative at full size.
//
// Given
// -----
// - Truth (0.005, 0.07); grid {(0.005, 0.07), (0.05, 0.5)}.
// - Conditions (1,0), (0,1), (0.5,0.5); 800 trials per condition; seed 42.
//
// Expect
// ------
// - Posterior of the truth > 0.99 and posterior mass sums to 1.
fn ddm_recovers_truth_against_distant_model() {
    // Arrange
    let truth = ddm(TRUE_D, TRUE_SIGMA);
    let grid = vec![ddm(TRUE_D, TRUE_SIGMA), ddm(0.05, 0.5)];
    let cfg = ValidationConfig { workers: 4, ..ValidationConfig::default() };

    // Act
    let report = run_validation(&truth, &grid, &cfg).expect("validation run should succeed");

    // Assert
    assert_eq!(report.n_trials, 2400);
    let p_truth = report.posterior(&ModelKey::ddm(TRUE_D, TRUE_SIGMA)).expect("truth in grid");
    assert!(p_truth > 0.99, "posterior of truth = {p_truth}");
    assert!((report.posterior_sum - 1.0).abs() < 1e-9);
    assert!(report.recovered());
    assert_eq!(report.summary.total(), 2400);
}

#[test]
// Purpose
// -------
// Recover the truth on a Cartesian 2 × 2 grid built from parameter ranges.
//
// Given
// -----
// - `range_d = [0.005, 0.05]`, `range_sigma = [0.07, 0.5]`, defaults
//   otherwise.
//
// Expect
// ------
// - Four posterior entries in row-major order; MAP is the truth.
fn ddm_validation_on_cartesian_grid() {
    // Arrange
    let cfg = ValidationConfig { workers: 3, ..ValidationConfig::default() };

    // Act
    let report = ddm_validation(TRUE_D, TRUE_SIGMA, &[0.005, 0.05], &[0.07, 0.5], &cfg)
        .expect("validation run should succeed");

    // Assert
    let keys: Vec<ModelKey> = report.posteriors.iter().map(|p| p.model).collect();
    assert_eq!(
        keys,
        vec![
            ModelKey::ddm(0.005, 0.07),
            ModelKey::ddm(0.005, 0.5),
            ModelKey::ddm(0.05, 0.07),
            ModelKey::ddm(0.05, 0.5),
        ]
    );
    assert_eq!(report.map_model, ModelKey::ddm(TRUE_D, TRUE_SIGMA));
    assert!(report.map_probability > 0.99);
}

#[test]
// Purpose
// -------
// Ensure the worker count does not change the result.
//
// Given
// -----
// - The same config with 1 and 4 workers, 100 trials per condition.
//
// Expect
// ------
// - Identical reports.
fn worker_count_does_not_change_report() {
    // Arrange
    let base = ValidationConfig { trials_per_condition: 100, ..ValidationConfig::default() };
    let one = ValidationConfig { workers: 1, ..base.clone() };
    let four = ValidationConfig { workers: 4, ..base };

    // Act
    let a = ddm_validation(TRUE_D, TRUE_SIGMA, &[0.004, 0.005], &[0.07], &one).expect("run ok");
    let b = ddm_validation(TRUE_D, TRUE_SIGMA, &[0.004, 0.005], &[0.07], &four).expect("run ok");

    // Assert
    assert_eq!(a, b);
}

#[test]
// Purpose
// -------
// Drive an aDDM recovery from a TOML config.
//
// Given
// -----
// - TOML with 150 trials per condition, 2 workers, seed 7, and a parametric
//   fixation distribution.
// - Truth (0.005, 0.07, 0.5); grid d ∈ {0.005, 0.05}, sigma 0.07,
//   theta 0.5.
//
// Expect
// ------
// - MAP is the truth; every trial is either applied or skipped.
fn addm_recovery_from_toml() {
    // Arrange
    let mut cfg = ValidationConfig::from_toml_str(
        r#"
        trials_per_condition = 150
        workers = 2
        seed = 7
        "#,
    )
    .expect("valid config");
    let fixations =
        FixationDistribution::parametric(0.5, 200, 50, 3.0, 100.0).expect("valid fixations");
    cfg.model = ModelOpts::default().with_fixations(fixations);

    // Act
    let report = addm_validation((TRUE_D, TRUE_SIGMA, 0.5), &[0.005, 0.05], &[TRUE_SIGMA], &[0.5], &cfg)
        .expect("validation run should succeed");

    // Assert
    assert_eq!(report.truth, ModelKey::addm(TRUE_D, TRUE_SIGMA, 0.5));
    assert!(report.recovered());
    assert_eq!(report.summary.total(), report.n_trials);
    assert!((report.posterior_sum - 1.0).abs() < 1e-9);
}
