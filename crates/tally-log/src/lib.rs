//! Persistent calculation log for Tally.
//!
//! This crate owns the history of successful calculations. It provides:
//! - [`CalculationLog`], an ordered, id-keyed sequence of [`LogEntry`] records
//!   that reconciles itself with a [`DurableStore`] after every mutation
//! - [`IdAllocator`], a monotonic id source that never reuses an id
//! - [`Outcome`], the value-plus-warning carrier used to surface persistence
//!   failures without failing the mutation itself
//! - the JSON codec for the persisted layout
//!
//! [`DurableStore`]: tally_store::DurableStore

pub mod codec;
pub mod error;
pub mod ids;
pub mod log;
pub mod outcome;

pub use error::{IdsExhausted, PersistenceError};
pub use ids::IdAllocator;
pub use log::{CalculationLog, DEFAULT_STORAGE_KEY};
pub use outcome::Outcome;

pub use tally_types::{EntryId, LogEntry};
