//! Calculation core for Tally.
//!
//! Three layers, each usable on its own:
//!
//! - [`arithmetic`]: the four binary operations, total except for division
//! - [`dispatch`]: maps an operator token onto an arithmetic operation
//! - [`validation`]: turns two raw text inputs into finite [`Operands`]
//!
//! None of these hold state or touch presentation; they are plain functions
//! over `f64` and `&str`.
//!
//! [`Operands`]: tally_types::Operands

pub mod arithmetic;
pub mod dispatch;
pub mod validation;

pub use arithmetic::{add, divide, multiply, subtract};
pub use dispatch::{dispatch, dispatch_operator, evaluate};
pub use validation::validate;
