use std::path::PathBuf;

use tally_log::IdsExhausted;
use tally_types::{CalculationError, ValidationError};
use thiserror::Error;

/// Why a single calculation request ended without a result.
///
/// Both kinds are terminal for the request and are always rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Calculation(#[from] CalculationError),

    #[error(transparent)]
    History(#[from] IdsExhausted),
}

impl RequestError {
    /// Short text for the result area of the presentation surface.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::EmptyField(_)) => "Error: missing input",
            Self::Validation(ValidationError::NotFiniteNumber(_)) => "Error: invalid input",
            Self::Calculation(CalculationError::DivisionByZero) => "Error: division by zero",
            Self::Calculation(CalculationError::InvalidOperator(_)) => "Error: invalid operation",
            Self::History(_) => "Error: history is full",
        }
    }
}

/// Fatal setup errors: the application cannot start.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("store error: {0}")]
    Store(#[from] tally_store::StoreError),
}

pub type AppResult<T> = Result<T, AppError>;
