//! Foundation types for Tally.
//!
//! This crate provides the vocabulary shared by every other Tally crate: the
//! operator set, validated operands, the immutable log entry record, and the
//! error kinds a single calculation request can end in.
//!
//! # Key Types
//!
//! - [`Operator`]: The fixed set of binary operations and their stable tokens
//! - [`Operands`]: A pair of finite inputs that passed validation
//! - [`LogEntry`]: Immutable record of one successful calculation
//! - [`EntryId`]: Log-unique entry identifier
//! - [`ValidationError`] / [`CalculationError`]: Typed request failures

pub mod entry;
pub mod error;
pub mod operator;

pub use entry::{EntryId, LogEntry};
pub use error::{CalculationError, Field, ValidationError};
pub use operator::{Operands, Operator};

/// Outcome of dispatching one operator over two operands.
///
/// The error side always names the failure kind; callers never have to work
/// out from context whether the operator or the divisor was at fault.
pub type CalculationResult = Result<f64, CalculationError>;
