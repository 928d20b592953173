//! inference — Bayesian model comparison over a discrete grid.
//!
//! Purpose
//! -------
//! Turn a likelihood table into a posterior over candidate models. This is
//! the "inference" half of validation mode: given synthetic trials from a
//! known model, the posterior should concentrate on that model.
//!
//! Key behaviors
//! -------------
//! - [`PosteriorDistribution`] starts uniform, folds trials sequentially,
//!   skips degenerate trials, and reports the MAP model.
//! - [`FoldSummary`] counts applied and skipped trials.
//!
//! Invariants & assumptions
//! ------------------------
//! - Probabilities stay in `[0, 1]` and sum to 1 after every applied update.
//! - The grid is fixed at construction; likelihoods are looked up by
//!   [`ModelKey`](crate::ddm::ModelKey).
//!
//! Downstream usage
//! ----------------
//! - `estimation::validation` builds one posterior per run and serialises
//!   it into a `ValidationReport`.

pub mod posterior;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::posterior::{DEFAULT_ZERO_THRESHOLD, FoldSummary, PosteriorDistribution};

pub mod prelude {
    pub use super::posterior::{FoldSummary, PosteriorDistribution};
}
