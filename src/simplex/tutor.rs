
use derive_more::IsVariant;
use lazy_static::lazy_static;
use nalgebra::DMatrix;
use num_traits::{One, Zero};
use rational_value::RationalValue;

use super::{
    step::{RatioEntry, RatioOutcome, RowOperation, Step, StepResult},
    EditError, SimplexTable,
};

lazy_static! {
    static ref ZERO: RationalValue = RationalValue::zero();
}

/// Tutoring state. Pivot indices live in the variants, so they exist exactly
/// while a pivot is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
enum State {
    Start,
    InspectObjective,
    LocatePivotRow {
        pivot_col: usize,
    },
    NormalizePivotRow {
        pivot_col: usize,
        pivot_row: usize,
    },
    EliminateColumn {
        pivot_col: usize,
        pivot_row: usize,
    },
    PublishTableau,
    Optimal,
    Unbounded,
}

/// One tutoring session: a [`SimplexTable`] plus the state machine that steps
/// it through the Simplex method one pivot sub-step at a time.
///
/// Sessions are strictly sequential and ephemeral; drop the value to cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct Tutor {
    table: SimplexTable,
    state: State,
}

impl Tutor {
    pub fn new(table: SimplexTable) -> Self {
        Self {
            table,
            state: State::Start,
        }
    }

    /// True only before the first `advance` of a session; all edits require it.
    pub fn is_editable(&self) -> bool {
        self.state.is_start()
    }

    /// True once optimality or unboundedness has been detected.
    pub fn is_terminal(&self) -> bool {
        self.state.is_optimal() || self.state.is_unbounded()
    }

    pub fn table(&self) -> &SimplexTable {
        &self.table
    }

    /// Read-only snapshot of the current tableau for rendering.
    pub fn current_tableau(&self) -> &DMatrix<RationalValue> {
        self.table.rows()
    }

    /// Freezes the current tableau as the starting point and resets the state
    /// machine, restarting a finished or in-flight session.
    pub fn commit_initial_tableau(&mut self) {
        self.state = State::Start;
    }

    pub fn set_cell(&mut self, row: usize, column: usize, literal: &str) -> Result<(), EditError> {
        self.guard_editable()?;
        self.table.set_cell(row, column, literal)?;
        Ok(())
    }

    pub fn add_variable(&mut self) -> Result<(), EditError> {
        self.guard_editable()?;
        self.table.add_variable();
        Ok(())
    }

    pub fn remove_variable(&mut self) -> Result<(), EditError> {
        self.guard_editable()?;
        self.table.remove_variable();
        Ok(())
    }

    pub fn add_constraint(&mut self) -> Result<(), EditError> {
        self.guard_editable()?;
        self.table.add_constraint();
        Ok(())
    }

    pub fn remove_constraint(&mut self) -> Result<(), EditError> {
        self.guard_editable()?;
        self.table.remove_constraint();
        Ok(())
    }

    fn guard_editable(&self) -> Result<(), EditError> {
        if self.is_editable() {
            Ok(())
        } else {
            Err(EditError::InvalidEdit)
        }
    }

    /// Performs one state-machine transition and returns its step result.
    /// Never fails: optimality, unboundedness and degeneracy are all result
    /// variants. In a terminal state this is a no-op returning
    /// [`Step::Finished`].
    pub fn advance(&mut self) -> StepResult {
        log::debug!("Tableau:{}", self.table.rows());
        let step = match self.state {
            State::Start => {
                log::info!("Session started");
                self.state = State::InspectObjective;
                Step::Ready
            }
            State::InspectObjective => self.inspect_objective(),
            State::LocatePivotRow { pivot_col } => self.locate_pivot_row(pivot_col),
            State::NormalizePivotRow {
                pivot_col,
                pivot_row,
            } => self.normalize_pivot_row(pivot_col, pivot_row),
            State::EliminateColumn {
                pivot_col,
                pivot_row,
            } => self.eliminate_column(pivot_col, pivot_row),
            State::PublishTableau => {
                log::info!("New tableau published");
                self.state = State::InspectObjective;
                Step::NewTableau {
                    tableau: self.table.rows().clone(),
                }
            }
            State::Optimal | State::Unbounded => Step::Finished,
        };
        StepResult::new(step, self.table.is_degenerate())
    }

    /// Entering-variable rule: first most negative objective entry over the
    /// variable columns, strict `< 0`.
    fn inspect_objective(&mut self) -> Step {
        let objective = self.table.objective_row();
        let mut best: Option<(usize, RationalValue)> = None;
        for c in self.table.variable_columns() {
            let entry = self.table.entry(objective, c);
            if entry >= &*ZERO {
                continue;
            }
            match &best {
                Some((_, min)) if entry >= min => {}
                _ => best = Some((c, entry.clone())),
            }
        }
        match best {
            Some((column, value)) => {
                let ties = self
                    .table
                    .variable_columns()
                    .filter(|&c| self.table.entry(objective, c) == &value)
                    .collect();
                log::info!("Pivot column: {column} (objective entry {value})");
                self.state = State::LocatePivotRow { pivot_col: column };
                Step::PivotColumnSelected {
                    column,
                    value,
                    ties,
                }
            }
            None => {
                log::info!("No negative objective entries; solution is optimal");
                self.state = State::Optimal;
                Step::Optimal
            }
        }
    }

    /// Minimum-ratio test over rows with a strictly positive pivot-column
    /// entry, first occurrence winning ties.
    fn locate_pivot_row(&mut self, pivot_col: usize) -> Step {
        let rhs_col = self.table.rhs_column();
        let mut ratios = Vec::with_capacity(self.table.ineqs());
        let mut best: Option<(usize, RationalValue)> = None;
        for r in 0..self.table.ineqs() {
            let entry = self.table.entry(r, pivot_col);
            let outcome = if entry.is_zero() {
                RatioOutcome::SkippedZero
            } else if entry < &*ZERO {
                RatioOutcome::SkippedNegative
            } else {
                let ratio = self.table.entry(r, rhs_col) / entry;
                match &best {
                    Some((_, min)) if &ratio >= min => {}
                    _ => best = Some((r, ratio.clone())),
                }
                RatioOutcome::Computed(ratio)
            };
            ratios.push(RatioEntry::new(r, outcome));
        }
        match best {
            Some((row, min_ratio)) => {
                let ties = ratios
                    .iter()
                    .filter(|entry| {
                        matches!(&entry.outcome, RatioOutcome::Computed(v) if v == &min_ratio)
                    })
                    .map(|entry| entry.row)
                    .collect();
                let pivot = self.table.entry(row, pivot_col).clone();
                log::info!("Pivot row: {row} (ratio {min_ratio}, pivot element {pivot})");
                self.state = State::NormalizePivotRow {
                    pivot_col,
                    pivot_row: row,
                };
                Step::PivotRowSelected {
                    row,
                    pivot,
                    ratios,
                    ties,
                }
            }
            None => {
                log::info!("No positive entries in the pivot column; problem is unbounded");
                self.state = State::Unbounded;
                Step::Unbounded
            }
        }
    }

    fn normalize_pivot_row(&mut self, pivot_col: usize, pivot_row: usize) -> Step {
        let divisor = self.table.entry(pivot_row, pivot_col).clone();
        let skipped = divisor.is_one();
        if skipped {
            log::info!("Pivot element is already 1; normalization skipped");
        } else {
            log::info!("Dividing row {pivot_row} by {divisor}");
            self.table.divide_row(pivot_row, &divisor);
        }
        let new_row = self.table.row_vec(pivot_row);
        self.state = State::EliminateColumn {
            pivot_col,
            pivot_row,
        };
        Step::RowNormalized {
            row: pivot_row,
            divisor,
            skipped,
            new_row,
        }
    }

    fn eliminate_column(&mut self, pivot_col: usize, pivot_row: usize) -> Step {
        let mut operations = Vec::new();
        for r in (0..self.table.nrows()).filter(|r| *r != pivot_row) {
            let entry = self.table.entry(r, pivot_col).clone();
            if entry.is_zero() {
                continue;
            }
            let multiplier = -entry;
            log::info!("R{r} += {multiplier} * R{pivot_row}");
            self.table.add_scaled_row(r, pivot_row, &multiplier);
            operations.push(RowOperation::new(r, multiplier, pivot_row));
        }
        self.state = State::PublishTableau;
        Step::ColumnEliminated { operations }
    }
}

impl Default for Tutor {
    fn default() -> Self {
        Self::new(SimplexTable::default())
    }
}
