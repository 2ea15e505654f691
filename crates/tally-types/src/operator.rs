use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalculationError;

/// A binary arithmetic operation.
///
/// Each operator has a stable external token (`"1"`..`"4"`) that identifies it
/// on the presentation surface and in persisted log entries, and a display
/// symbol used when rendering history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// All operators in token order.
    pub const ALL: [Operator; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Stable external token.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Add => "1",
            Self::Subtract => "2",
            Self::Multiply => "3",
            Self::Divide => "4",
        }
    }

    /// Resolve an exact token. Aliases are not accepted here.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.token() == token)
    }

    /// Symbol shown next to the operands in history.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }

    /// Lowercase name, also accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Parses a token, a name, or a symbol (`*`, `x` and `/` are also accepted).
impl FromStr for Operator {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(op) = Self::from_token(trimmed) {
            return Ok(op);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "add" | "+" => Ok(Self::Add),
            "subtract" | "sub" | "-" => Ok(Self::Subtract),
            "multiply" | "mul" | "*" | "x" | "×" => Ok(Self::Multiply),
            "divide" | "div" | "/" | "÷" => Ok(Self::Divide),
            _ => Err(CalculationError::InvalidOperator(s.to_string())),
        }
    }
}

/// Two finite operands that passed input validation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operands {
    pub a: f64,
    pub b: f64,
}

impl Operands {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}
