mod rational_value;

pub use rational_value::{DivisionByZero, ParseRationalError, RationalValue};
