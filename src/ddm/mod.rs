//! ddm — drift-diffusion decision models: data, parameters, and models.
//!
//! Purpose
//! -------
//! Group everything needed to simulate and score two-alternative decisions
//! under the drift-diffusion model and its attentional variant. The
//! likelihood engine, posterior aggregator, and estimation drivers build on
//! this module.
//!
//! Key behaviors
//! -------------
//! - `core`: trial records, parameters and keys, options, fixation
//!   distributions, and the discretised evidence grid.
//! - `models`: the [`DDM`] and [`ADDM`] implementations of
//!   [`DecisionModel`].
//! - `errors`: the shared [`DDMError`] / [`DDMResult`] surface.
//!
//! Conventions
//! -----------
//! - Times are milliseconds, one process step is `time_step_ms`.
//! - `Choice::Left` is the upper barrier.
//!
//! Downstream usage
//! ----------------
//! - Import the curated surface via `ddm::prelude::*`.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    ADDMParams, Choice, DDMParams, FixationDistribution, FixationItem, FixationSchedule,
    LikelihoodOpts, ModelKey, ModelOpts, ProcessOpts, SimOpts, TrialRecord,
};
pub use self::errors::{DDMError, DDMResult};
pub use self::models::{ADDM, DDM, DecisionModel};

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::errors::{DDMError, DDMResult};
    pub use super::models::prelude::*;
}
