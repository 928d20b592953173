//! likelihood — batch likelihood evaluation for decision models.
//!
//! Purpose
//! -------
//! Turn a batch of [`TrialRecord`](crate::ddm::TrialRecord)s and one or more
//! [`DecisionModel`](crate::ddm::DecisionModel)s into per-trial likelihoods,
//! in parallel on a fixed worker pool.
//!
//! Key behaviors
//! -------------
//! - [`engine`]: single-trial wrapper, sequential batch, and the rayon-backed
//!   [`LikelihoodEngine`].
//! - [`table`]: the keyed `models × trials` [`LikelihoodTable`] consumed by
//!   the posterior aggregator.
//!
//! Invariants & assumptions
//! ------------------------
//! - Output order matches input order regardless of scheduling.
//! - A batch either succeeds completely or fails with the model key and
//!   trial index of the failing trial.

pub mod engine;
pub mod table;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::engine::{LikelihoodEngine, compute_likelihood, compute_likelihoods};
pub use self::table::LikelihoodTable;
