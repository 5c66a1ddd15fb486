use derive_more::IsVariant;
use derive_new::new;
use nalgebra::DMatrix;
use rational_value::RationalValue;
use serde::{Deserialize, Serialize};

/// Outcome of a single [`Tutor::advance`](super::Tutor::advance) call.
///
/// Carries everything a presentation layer needs to narrate the transition
/// without recomputing anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, new)]
pub struct StepResult {
    pub step: Step,
    /// One or more basic variables currently sit at zero. Informational only;
    /// it never changes which transition was taken.
    pub degenerate: bool,
}

#[derive(Debug, Clone, PartialEq, IsVariant, Serialize, Deserialize)]
pub enum Step {
    /// The committed tableau is frozen and iteration is about to begin.
    Ready,
    /// The entering-variable rule picked `column`, the first most negative
    /// objective entry. `ties` lists every column attaining that value.
    PivotColumnSelected {
        column: usize,
        value: RationalValue,
        ties: Vec<usize>,
    },
    /// No strictly negative objective entry remains. Terminal.
    Optimal,
    /// The minimum-ratio test picked `row`. `ratios` covers every constraint
    /// row, including the skipped ones; `ties` lists every row attaining the
    /// minimum ratio.
    PivotRowSelected {
        row: usize,
        pivot: RationalValue,
        ratios: Vec<RatioEntry>,
        ties: Vec<usize>,
    },
    /// The pivot column has no strictly positive constraint entry. Terminal.
    Unbounded,
    /// The pivot row was divided by `divisor`; `skipped` means the pivot
    /// element was already 1 and no division took place.
    RowNormalized {
        row: usize,
        divisor: RationalValue,
        skipped: bool,
        new_row: Vec<RationalValue>,
    },
    /// The row operations that zeroed the pivot column everywhere else. Rows
    /// whose entry was already zero are absent.
    ColumnEliminated { operations: Vec<RowOperation> },
    /// The pivot is complete; `tableau` is the new current tableau.
    NewTableau { tableau: DMatrix<RationalValue> },
    /// The session is terminal; the call was a no-op.
    Finished,
}

/// One constraint row's entry in the minimum-ratio table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, new)]
pub struct RatioEntry {
    pub row: usize,
    pub outcome: RatioOutcome,
}

#[derive(Debug, Clone, PartialEq, IsVariant, Serialize, Deserialize)]
pub enum RatioOutcome {
    /// RHS divided by the pivot-column entry.
    Computed(RationalValue),
    /// Pivot-column entry was zero; the row cannot leave the basis.
    SkippedZero,
    /// Pivot-column entry was negative; the ratio test ignores it.
    SkippedNegative,
}

/// `R_target += multiplier * R_source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, new)]
pub struct RowOperation {
    pub target_row: usize,
    pub multiplier: RationalValue,
    pub source_row: usize,
}

/// Cell coordinates the presentation layer should highlight for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Highlight {
    pub row: Option<usize>,
    pub column: Option<usize>,
}

impl Step {
    pub fn highlight(&self) -> Option<Highlight> {
        match self {
            Step::PivotColumnSelected { column, .. } => {
                Some(Highlight::new(None, Some(*column)))
            }
            Step::PivotRowSelected { row, .. } | Step::RowNormalized { row, .. } => {
                Some(Highlight::new(Some(*row), None))
            }
            _ => None,
        }
    }
}
