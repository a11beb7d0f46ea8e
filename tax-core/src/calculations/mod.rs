//! Tax calculation modules.
//!
//! Validation of raw request input and the marginal bracket accumulator
//! that turns a validated income and a schedule into a [`crate::TaxResult`].

pub mod accumulator;
pub mod common;
pub mod validation;

pub use accumulator::BracketAccumulator;
pub use validation::{Validator, parse_income};
