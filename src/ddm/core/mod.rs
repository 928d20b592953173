//! core — trial records, parameters, options, and the evidence grid.
//!
//! Purpose
//! -------
//! Collect the building blocks shared by the drift-diffusion model and its
//! attentional variant: trial containers, validated parameter tuples and
//! their identity keys, process/simulation/likelihood options, fixation
//! distributions, and the discretised state grid used by the probability
//! transfer likelihood.
//!
//! Key behaviors
//! -------------
//! - Define trial data ([`TrialRecord`], [`Choice`], [`FixationItem`],
//!   [`FixationSchedule`]) with validating constructors.
//! - Define model parameters ([`DDMParams`], [`ADDMParams`]) and the
//!   hashable [`ModelKey`] used to index likelihood tables and posteriors.
//! - Bundle configuration in [`ModelOpts`] ([`ProcessOpts`], [`SimOpts`],
//!   [`LikelihoodOpts`]) and fixation generators in
//!   [`FixationDistribution`].
//! - Provide [`StateGrid`] and [`TransitionKernel`] for one-step mass
//!   propagation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Successfully constructed parameters and options satisfy their domain
//!   constraints; downstream code does not re-validate them.
//! - Trial fields are public; the likelihood layer re-checks finiteness of
//!   stimulus values before use.
//!
//! Conventions
//! -----------
//! - Times are integer milliseconds; one process step is `time_step_ms`.
//! - `Choice::Left` is the upper barrier.
//! - This module performs no logging; errors are reported via
//!   [`DDMResult`](crate::ddm::errors::DDMResult).
//!
//! Downstream usage
//! ----------------
//! - `ddm::models` builds simulators and likelihoods on these types.
//! - Estimation code constructs trials, parameter grids, and options here
//!   and passes them through the model layer.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its constructors and numerical
//!   helpers; end-to-end behavior is covered at the model and estimation
//!   layers.

pub mod fixations;
pub mod options;
pub mod params;
pub mod states;
pub mod trial;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::fixations::FixationDistribution;
pub use self::options::{LikelihoodOpts, ModelOpts, ProcessOpts, SimOpts};
pub use self::params::{ADDMParams, DDMParams, ModelKey};
pub use self::states::{StateGrid, StepMass, TransitionKernel};
pub use self::trial::{Choice, FixationItem, FixationSchedule, TrialRecord};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_ddm::ddm::core::prelude::*;
//
// to import the core surface in a single line.

pub mod prelude {
    pub use super::fixations::FixationDistribution;
    pub use super::options::{LikelihoodOpts, ModelOpts, ProcessOpts, SimOpts};
    pub use super::params::{ADDMParams, DDMParams, ModelKey};
    pub use super::trial::{Choice, FixationItem, FixationSchedule, TrialRecord};
}
