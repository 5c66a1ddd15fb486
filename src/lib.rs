//! Step-by-step Simplex method tutoring engine over exact rational arithmetic.
//!
//! The crate exposes two pieces: [`SimplexTable`], the editable exact-rational
//! tableau with its structural edit operations, and [`Tutor`], the session
//! object that drives one pivot operation at a time and hands back structured
//! step results for a presentation layer to explain.

pub mod simplex;

pub use rational_value::{DivisionByZero, ParseRationalError, RationalValue};
pub use simplex::{
    EditError, Highlight, RatioEntry, RatioOutcome, RowOperation, SimplexTable, Step, StepResult,
    Tutor,
};
