//! Interaction layer for Tally.
//!
//! Provides the request/response cycle for one calculation and the log
//! actions around it. This is the main entry point for applications embedding
//! Tally: construct an [`Orchestrator`] once with a [`CalculationLog`] and a
//! [`Presentation`] implementation, then feed it user events.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod presentation;

pub use config::TallyConfig;
pub use error::{AppError, AppResult, RequestError};
pub use orchestrator::{Orchestrator, RequestPhase};
pub use presentation::{Presentation, PresentationError, PresentationResult};

// Re-export key types
pub use tally_log::{CalculationLog, IdsExhausted, Outcome, PersistenceError, DEFAULT_STORAGE_KEY};
pub use tally_store::{DurableStore, FileStore, InMemoryStore};
pub use tally_types::{
    CalculationError, CalculationResult, EntryId, Field, LogEntry, Operands, Operator,
    ValidationError,
};
