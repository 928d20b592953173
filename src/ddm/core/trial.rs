//! ddm::core::trial — trial records, choices, and fixation schedules.
//!
//! Purpose
//! -------
//! Hold the observable outcome of one two-alternative decision: the two
//! stimulus values, the chosen side, the reaction time, and (for the
//! attentional model) the ordered fixation schedule.
//!
//! Key behaviors
//! -------------
//! - [`Choice`] decodes both the signed (`-1 = left`, `+1 = right`) and
//!   the binary (`0 = left`, `1 = right`) encodings.
//! - [`FixationItem`] decodes item codes (`1 = left`, `2 = right`, any
//!   other non-negative code is a blank period such as a transition or the
//!   initial latency).
//! - [`FixationSchedule::new`] enforces aligned, non-empty item and
//!   duration sequences.
//!
//! Invariants & assumptions
//! ------------------------
//! - Records built through [`TrialRecord::new`] have finite values.
//! - Fields stay public so externally loaded data can be assembled
//!   directly; the likelihood engine re-checks finiteness per trial.
//! - Reaction times and fixation durations are in milliseconds.
//!
//! Conventions
//! -----------
//! - `Choice::Left` corresponds to the upper barrier, i.e. the boundary the
//!   process drifts toward when `value_left > value_right`.
use serde::{Deserialize, Serialize};

use crate::ddm::{
    core::validation::finite_value,
    errors::{DDMError, DDMResult},
};

/// Side chosen on a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    /// Upper barrier.
    Left,
    /// Lower barrier.
    Right,
}

impl Choice {
    /// Decode the signed encoding `-1 = Left`, `+1 = Right`.
    ///
    /// # Errors
    /// [`DDMError::InvalidChoiceCode`] for any other code.
    pub fn from_signed(code: i64) -> DDMResult<Self> {
        match code {
            -1 => Ok(Choice::Left),
            1 => Ok(Choice::Right),
            _ => Err(DDMError::InvalidChoiceCode { code }),
        }
    }

    /// Decode the binary encoding `0 = Left`, `1 = Right`.
    ///
    /// # Errors
    /// [`DDMError::InvalidChoiceCode`] for any other code.
    pub fn from_binary(code: i64) -> DDMResult<Self> {
        match code {
            0 => Ok(Choice::Left),
            1 => Ok(Choice::Right),
            _ => Err(DDMError::InvalidChoiceCode { code }),
        }
    }

    pub fn signed(self) -> i64 {
        match self {
            Choice::Left => -1,
            Choice::Right => 1,
        }
    }
}

/// What the subject looked at during one fixation-schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixationItem {
    /// Latency, transition, or blank screen: no value is attended.
    Blank,
    Left,
    Right,
}

impl FixationItem {
    /// Decode an item code: `1 → Left`, `2 → Right`, anything else → `Blank`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => FixationItem::Left,
            2 => FixationItem::Right,
            _ => FixationItem::Blank,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            FixationItem::Blank => 0,
            FixationItem::Left => 1,
            FixationItem::Right => 2,
        }
    }

    /// The other value item; blanks map to themselves.
    pub fn other(self) -> Self {
        match self {
            FixationItem::Left => FixationItem::Right,
            FixationItem::Right => FixationItem::Left,
            FixationItem::Blank => FixationItem::Blank,
        }
    }
}

/// Ordered fixation items with aligned durations (ms).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixationSchedule {
    items: Vec<FixationItem>,
    durations_ms: Vec<u64>,
}

impl FixationSchedule {
    /// Build a validated schedule.
    ///
    /// # Errors
    /// - [`DDMError::FixationLengthMismatch`] if the sequences differ in length.
    /// - [`DDMError::EmptyFixationSchedule`] if both are empty.
    pub fn new(items: Vec<FixationItem>, durations_ms: Vec<u64>) -> DDMResult<Self> {
        if items.len() != durations_ms.len() {
            return Err(DDMError::FixationLengthMismatch {
                items: items.len(),
                durations: durations_ms.len(),
            });
        }
        if items.is_empty() {
            return Err(DDMError::EmptyFixationSchedule);
        }
        Ok(Self { items, durations_ms })
    }

    /// Build a schedule from raw item codes (see [`FixationItem::from_code`]).
    ///
    /// # Errors
    /// Same as [`FixationSchedule::new`].
    pub fn from_codes(codes: &[i64], durations_ms: Vec<u64>) -> DDMResult<Self> {
        let items = codes.iter().map(|&c| FixationItem::from_code(c)).collect();
        Self::new(items, durations_ms)
    }

    pub fn items(&self) -> &[FixationItem] {
        &self.items
    }

    pub fn durations_ms(&self) -> &[u64] {
        &self.durations_ms
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FixationItem, u64)> + '_ {
        self.items.iter().copied().zip(self.durations_ms.iter().copied())
    }

    /// Sum of all durations in milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.durations_ms.iter().sum()
    }
}

/// TrialRecord — one observed or simulated decision.
///
/// Fields
/// ------
/// - `value_left`, `value_right`: stimulus values.
/// - `choice`: side chosen.
/// - `rt_ms`: reaction time in milliseconds.
/// - `fixations`: fixation schedule for attentional trials; `None` for
///   plain DDM data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub value_left: f64,
    pub value_right: f64,
    pub choice: Choice,
    pub rt_ms: u64,
    pub fixations: Option<FixationSchedule>,
}

impl TrialRecord {
    /// Build a trial without fixations.
    ///
    /// # Errors
    /// [`DDMError::NonFiniteValue`] if either stimulus value is not finite.
    pub fn new(value_left: f64, value_right: f64, choice: Choice, rt_ms: u64) -> DDMResult<Self> {
        finite_value("value_left", value_left)?;
        finite_value("value_right", value_right)?;
        Ok(Self { value_left, value_right, choice, rt_ms, fixations: None })
    }

    /// Build an attentional trial.
    ///
    /// # Errors
    /// [`DDMError::NonFiniteValue`] if either stimulus value is not finite.
    pub fn with_fixations(
        value_left: f64, value_right: f64, choice: Choice, rt_ms: u64, fixations: FixationSchedule,
    ) -> DDMResult<Self> {
        let mut trial = Self::new(value_left, value_right, choice, rt_ms)?;
        trial.fixations = Some(fixations);
        Ok(trial)
    }

    /// Re-check stimulus values; used before likelihood evaluation because
    /// fields are public.
    pub fn check_values(&self) -> DDMResult<()> {
        finite_value("value_left", self.value_left)?;
        finite_value("value_right", self.value_right)?;
        Ok(())
    }
}
