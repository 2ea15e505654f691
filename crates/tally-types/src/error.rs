use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the two operand input fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    First,
    Second,
}

impl Field {
    /// Element identifier of the field on the presentation surface.
    pub fn input_id(&self) -> &'static str {
        match self {
            Self::First => "val1",
            Self::Second => "val2",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Second => write!(f, "second"),
        }
    }
}

/// Rejection of raw operand input. Only the first violation is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("the {0} operand is empty")]
    EmptyField(Field),

    #[error("the {0} operand is not a finite number")]
    NotFiniteNumber(Field),
}

impl ValidationError {
    /// The field the presentation surface should highlight.
    pub fn field(&self) -> Field {
        match self {
            Self::EmptyField(field) | Self::NotFiniteNumber(field) => *field,
        }
    }
}

/// Failure of an arithmetic dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculationError {
    #[error("division by zero is not allowed")]
    DivisionByZero,

    #[error("invalid operator: {0:?}")]
    InvalidOperator(String),
}
