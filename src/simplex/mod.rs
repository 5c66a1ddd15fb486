mod step;
mod table;
mod tutor;

pub use step::{Highlight, RatioEntry, RatioOutcome, RowOperation, Step, StepResult};
pub use table::SimplexTable;
pub use tutor::Tutor;

use derive_more::{Display, Error, IsVariant};
use rational_value::ParseRationalError;

/// An edit rejected by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, IsVariant)]
pub enum EditError {
    /// A structural or cell edit arrived while a pivoting session was in
    /// progress. Commit the tableau again to start over, or discard the
    /// session.
    #[display(fmt = "tableau is only editable before the pivoting session starts")]
    InvalidEdit,
    /// The cell literal did not parse; the prior cell value is kept.
    #[display(fmt = "{}", _0)]
    Parse(#[error(source)] ParseRationalError),
}

impl From<ParseRationalError> for EditError {
    fn from(err: ParseRationalError) -> Self {
        Self::Parse(err)
    }
}
