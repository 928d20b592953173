//! Integration tests for likelihood batches, posterior updates, and fitting.
//!
//! Purpose
//! -------
//! - Check the cross-module guarantees the drivers rely on: parallel and
//!   sequential likelihoods agree, a single bad trial fails the whole batch,
//!   degenerate trials leave the posterior untouched, and the fitting
//!   objective is deterministic regardless of the worker count.
//! - Run a short aDDM fit on simulated data with fixation schedules.
//!
//! Coverage
//! --------
//! - `likelihood`: `LikelihoodEngine`, `compute_likelihoods`.
//! - `inference::PosteriorDistribution::update`.
//! - `estimation::fitting`: `FittingData`, `NllObjective`, `fit`.
//! - `optimization::nll_optimizer`: `Bounds`, `NMOptions`.
//!
//! Exclusions
//! ----------
//! - Parameter recovery accuracy of the fit; the optimizer budget here is
//!   deliberately small.
use std::collections::HashMap;

use rand::{SeedableRng, rngs::StdRng};
use rust_ddm::{
    ddm::{
        DDMError,
        core::{ADDMParams, Choice, FixationDistribution, ModelKey, ModelOpts, TrialRecord},
        models::{ADDM, DDM, DecisionModel},
    },
    estimation::{FitConfig, FittingData, ModelFamily, NllObjective, fit},
    inference::PosteriorDistribution,
    likelihood::{LikelihoodEngine, compute_likelihoods},
    optimization::{Bounds, NMOptions},
};

/// Purpose
/// -------
/// Simulate `n` DDM trials cycling through four stimulus conditions.
///
/// Returns
/// -------
/// - Trials from `DDM(0.005, 0.07)` with default options, seeded by `seed`.
fn ddm_trials(n: usize, seed: u64) -> Vec<TrialRecord> {
    let model = DDM::with_defaults(0.005, 0.07).expect("valid model");
    let mut rng = StdRng::seed_from_u64(seed);
    let conditions = [(1.0, 0.0), (0.0, 1.0), (0.5, 0.5), (0.25, 0.75)];
    (0..n)
        .map(|i| {
            let (vl, vr) = conditions[i % conditions.len()];
            model.simulate_trial(vl, vr, &mut rng).expect("simulation terminates")
        })
        .collect()
}

/// Purpose
/// -------
/// Simulate aDDM trials with fixation schedules for `subjects` subjects.
///
/// Returns
/// -------
/// - Fitting data keyed `s0, s1, …` with trial ids `0..trials`, and the
///   model options (including the fixation distribution) used.
fn addm_data(subjects: usize, trials: u64) -> (FittingData, ModelOpts) {
    let fixations =
        FixationDistribution::parametric(0.5, 200, 50, 3.0, 100.0).expect("valid fixations");
    let opts = ModelOpts::default().with_fixations(fixations);
    let params = ADDMParams::from_d_theta_mu(0.005, 0.5, 14.0).expect("valid params");
    let model = ADDM::new(params, opts.clone()).expect("valid model");
    let mut rng = StdRng::seed_from_u64(3);
    let conditions = [(1.0, 0.0), (0.0, 1.0), (0.5, 0.5)];
    let mut records = Vec::new();
    for s in 0..subjects {
        for t in 0..trials {
            let (vl, vr) = conditions[t as usize % conditions.len()];
            let trial = model.simulate_trial(vl, vr, &mut rng).expect("simulation terminates");
            records.push((format!("s{s}"), t, trial));
        }
    }
    (FittingData::from_records(records).expect("valid data"), opts)
}

#[test]
// Purpose
// -------
// Ensure parallel and sequential likelihoods agree element-wise.
//
// Given
// -----
// - 120 simulated trials scored by a 4-worker engine and sequentially.
//
// Expect
// ------
// - Identical vectors.
fn parallel_matches_sequential() {
    // Arrange
    let trials = ddm_trials(120, 1);
    let model = DDM::with_defaults(0.004, 0.08).expect("valid model");
    let engine = LikelihoodEngine::new(4).expect("valid engine");

    // Act
    let parallel = engine.parallel_compute_likelihoods(&trials, &model).expect("batch ok");
    let sequential = compute_likelihoods(&trials, &model).expect("batch ok");

    // Assert
    assert_eq!(parallel, sequential);
}

#[test]
// Purpose
// -------
// Verify that one bad trial fails the whole batch with its index.
//
// Given
// -----
// - 50 valid trials with trial 17 given a NaN left value.
//
// Expect
// ------
// - `LikelihoodComputationFailure` naming the model and trial 17, whose
//   source is `NonFiniteValue`.
fn one_bad_trial_fails_the_batch() {
    // Arrange
    let mut trials = ddm_trials(50, 2);
    trials[17].value_left = f64::NAN;
    let model = DDM::with_defaults(0.005, 0.07).expect("valid model");
    let engine = LikelihoodEngine::new(3).expect("valid engine");

    // Act
    let err = engine.parallel_compute_likelihoods(&trials, &model).expect_err("batch fails");

    // Assert
    match err {
        DDMError::LikelihoodComputationFailure { model: key, trial_index, source } => {
            assert_eq!(key, ModelKey::ddm(0.005, 0.07));
            assert_eq!(trial_index, 17);
            assert!(matches!(*source, DDMError::NonFiniteValue { name: "value_left", .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
// Purpose
// -------
// Ensure a trial with zero likelihood under every model is skipped.
//
// Given
// -----
// - A two-model posterior, one informative update, then a trial whose RT
//   is shorter than one time step.
//
// Expect
// ------
// - The degenerate update returns `false` and leaves the posterior
//   unchanged.
fn zero_likelihood_trial_leaves_posterior_unchanged() {
    // Arrange
    let a = DDM::with_defaults(0.005, 0.07).expect("valid model");
    let b = DDM::with_defaults(0.05, 0.5).expect("valid model");
    let mut posterior = PosteriorDistribution::uniform(vec![a.key(), b.key()]).expect("valid");
    let informative = ddm_trials(1, 5).remove(0);
    let degenerate = TrialRecord::new(1.0, 0.0, Choice::Left, 5).expect("valid trial");
    let row = |trial: &TrialRecord| -> HashMap<ModelKey, f64> {
        [&a, &b]
            .iter()
            .map(|m| (m.key(), m.trial_likelihood(trial).expect("likelihood ok")))
            .collect()
    };

    // Act
    let applied = posterior.update(&row(&informative)).expect("update ok");
    let before: Vec<(ModelKey, f64)> = posterior.iter().collect();
    let skipped = posterior.update(&row(&degenerate)).expect("update ok");
    let after: Vec<(ModelKey, f64)> = posterior.iter().collect();

    // Assert
    assert!(applied);
    assert!(!skipped);
    assert_eq!(before, after);
}

#[test]
// Purpose
// -------
// Check that the fitting objective ignores the worker count.
//
// Given
// -----
// - Two aDDM subjects with 45 trials each, subsample 30, workers 1 and 4.
//
// Expect
// ------
// - Bit-identical NLL values at the same parameters.
fn nll_is_independent_of_workers() {
    // Arrange
    let (data, model) = addm_data(2, 45);
    let cfg = FitConfig { trials_per_subject: 30, model, ..FitConfig::default() };
    let one = NllObjective::new(data.clone(), FitConfig { workers: 1, ..cfg.clone() })
        .expect("valid objective");
    let four = NllObjective::new(data, FitConfig { workers: 4, ..cfg }).expect("valid objective");
    let x = [0.005, 0.5, 14.0];

    // Act
    let a = one.nll(&x).expect("nll ok");
    let b = four.nll(&x).expect("nll ok");

    // Assert
    assert_eq!(a, b);
    assert!(a.is_finite() && a > 0.0);
}

#[test]
// Purpose
// -------
// Run a short bounded aDDM fit end to end.
//
// Given
// -----
// - One subject with 40 trials, subsample 40, a narrowed box around the
//   generating parameters, and 10 Nelder–Mead iterations.
//
// Expect
// ------
// - Parameters inside the box, names `(d, theta, mu)`, and a fitted NLL no
//   worse than the NLL at the starting point.
fn short_addm_fit() {
    // Arrange
    let (data, model) = addm_data(1, 40);
    let cfg = FitConfig {
        family: ModelFamily::Addm,
        trials_per_subject: 40,
        workers: 2,
        model,
        ..FitConfig::default()
    };
    let objective = NllObjective::new(data, cfg).expect("valid objective");
    let bounds =
        Bounds::from_pairs(&[(0.001, 0.01), (0.0, 1.0), (5.0, 50.0)]).expect("valid bounds");
    let x0 = ndarray::array![0.004, 0.6, 20.0];
    let nll_x0 = objective.nll(&x0.to_vec()).expect("nll ok");
    let opts = NMOptions::new(1e-3, 10, 0.1).expect("valid options");

    // Act
    let report = fit(&objective, x0, &bounds, &opts).expect("fit ok");

    // Assert
    assert_eq!(report.parameter_names, vec!["d", "theta", "mu"]);
    assert!(bounds.contains(&report.outcome.theta_hat));
    assert!(report.nll <= nll_x0);
    let (d, theta, mu) = (report.parameters[0], report.parameters[1], report.parameters[2]);
    assert_eq!(report.model, ModelKey::addm(d, mu * d, theta));
}
