use std::ops::Range;

use nalgebra::DMatrix;
use num_traits::{One, Zero};
use rational_value::{ParseRationalError, RationalValue};
use serde::{Deserialize, Serialize};

/// The exact-rational Simplex tableau together with its problem shape.
///
/// Column layout is `unknowns` decision columns, `ineqs` slack columns, the
/// objective column, then the right-hand side. The last row is always the
/// objective row, so the matrix is `(ineqs + 1) x (unknowns + ineqs + 2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplexTable {
    unknowns: usize,
    ineqs: usize,
    rows: DMatrix<RationalValue>,
}

impl SimplexTable {
    /// Builds the canonical editable starting tableau: coefficient 1 for every
    /// decision variable in every constraint, an identity slack block, RHS 1,
    /// and `-(j + 1)` in the objective row for decision column `j`.
    pub fn new(unknowns: usize, ineqs: usize) -> Self {
        assert!(unknowns >= 1, "at least one decision variable");
        assert!(ineqs >= 1, "at least one constraint");
        let ncols = unknowns + ineqs + 2;
        let rows = DMatrix::from_fn(ineqs + 1, ncols, |r, c| {
            if r < ineqs {
                if c < unknowns || c == unknowns + r || c == ncols - 1 {
                    RationalValue::one()
                } else {
                    RationalValue::zero()
                }
            } else if c < unknowns {
                -RationalValue::from_integer(c as i64 + 1)
            } else if c == ncols - 2 {
                RationalValue::one()
            } else {
                RationalValue::zero()
            }
        });
        Self {
            unknowns,
            ineqs,
            rows,
        }
    }

    pub fn unknowns(&self) -> usize {
        self.unknowns
    }

    pub fn ineqs(&self) -> usize {
        self.ineqs
    }

    pub fn rows(&self) -> &DMatrix<RationalValue> {
        &self.rows
    }

    pub fn row_vec(&self, row: usize) -> Vec<RationalValue> {
        self.rows.row(row).iter().cloned().collect()
    }

    /// Parses `literal` and stores it at `(row, column)`. On a parse error the
    /// prior value is kept. Out-of-bounds indices are a caller bug and panic.
    pub fn set_cell(
        &mut self,
        row: usize,
        column: usize,
        literal: &str,
    ) -> Result<(), ParseRationalError> {
        let value: RationalValue = literal.parse()?;
        self.rows[(row, column)] = value;
        Ok(())
    }

    /// Inserts a decision column between the existing decision variables and
    /// the slack block, coefficient 1 in every row. The objective row gets the
    /// legacy `-(unknowns + 1)` placeholder coefficient.
    pub fn add_variable(&mut self) {
        self.rows = self
            .rows
            .clone()
            .insert_column(self.unknowns, RationalValue::one());
        self.rows[(self.ineqs, self.unknowns)] =
            -RationalValue::from_integer(self.unknowns as i64 + 1);
        self.unknowns += 1;
    }

    /// Removes the last decision column. No-op with a single decision variable.
    pub fn remove_variable(&mut self) {
        if self.unknowns == 1 {
            return;
        }
        self.unknowns -= 1;
        self.rows = self.rows.clone().remove_column(self.unknowns);
    }

    /// Appends a constraint row (all decision coefficients 1, RHS 1) and its
    /// slack column, inserted just before the objective column.
    pub fn add_constraint(&mut self) {
        let slack_col = self.unknowns + self.ineqs;
        let new_row = self.ineqs;
        let mut rows = self
            .rows
            .clone()
            .insert_column(slack_col, RationalValue::zero())
            .insert_row(new_row, RationalValue::zero());
        for c in 0..self.unknowns {
            rows[(new_row, c)] = RationalValue::one();
        }
        rows[(new_row, slack_col)] = RationalValue::one();
        let rhs = rows.ncols() - 1;
        rows[(new_row, rhs)] = RationalValue::one();
        self.rows = rows;
        self.ineqs += 1;
    }

    /// Removes the last constraint row and its slack column. No-op with a
    /// single constraint.
    pub fn remove_constraint(&mut self) {
        if self.ineqs == 1 {
            return;
        }
        self.ineqs -= 1;
        self.rows = self
            .rows
            .clone()
            .remove_row(self.ineqs)
            .remove_column(self.unknowns + self.ineqs);
    }

    pub(crate) fn nrows(&self) -> usize {
        self.ineqs + 1
    }

    pub(crate) fn objective_row(&self) -> usize {
        self.ineqs
    }

    pub(crate) fn rhs_column(&self) -> usize {
        self.unknowns + self.ineqs + 1
    }

    /// Decision and slack columns; the objective and RHS columns are never
    /// pivot candidates.
    pub(crate) fn variable_columns(&self) -> Range<usize> {
        0..self.unknowns + self.ineqs
    }

    pub(crate) fn entry(&self, row: usize, column: usize) -> &RationalValue {
        &self.rows[(row, column)]
    }

    pub(crate) fn divide_row(&mut self, row: usize, divisor: &RationalValue) {
        self.rows.row_mut(row).apply(|el| *el /= divisor);
    }

    /// `R_target += multiplier * R_source`, elementwise.
    pub(crate) fn add_scaled_row(
        &mut self,
        target: usize,
        source: usize,
        multiplier: &RationalValue,
    ) {
        let source_row = self.rows.row(source).into_owned();
        self.rows
            .row_mut(target)
            .zip_apply(&source_row, |el, source_el| {
                *el += &source_el * multiplier
            });
    }

    /// A basic variable is at zero when a constraint row's RHS is zero.
    pub(crate) fn is_degenerate(&self) -> bool {
        let rhs = self.rhs_column();
        (0..self.ineqs).any(|r| self.rows[(r, rhs)].is_zero())
    }
}

impl Default for SimplexTable {
    fn default() -> Self {
        Self::new(2, 2)
    }
}
