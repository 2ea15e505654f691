//! The presentation surface boundary.
//!
//! The orchestrator never renders anything itself; it calls into a
//! [`Presentation`] implementation. The surface holds no authoritative copy of
//! the log, only what these calls have projected onto it.

use tally_log::PersistenceError;
use tally_types::{EntryId, Field, LogEntry, Operands};
use thiserror::Error;

use crate::error::RequestError;

/// A presentation call could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentationError {
    /// The element the call writes to does not exist on this surface.
    #[error("presentation target {0:?} is missing")]
    MissingTarget(&'static str),
}

pub type PresentationResult = Result<(), PresentationError>;

/// Consumer of everything the core wants shown to the user.
pub trait Presentation {
    /// Show the result of a calculation or replay.
    fn render(&mut self, result: &Result<f64, RequestError>) -> PresentationResult;

    /// Highlight the input field a validation error refers to.
    fn annotate_field(&mut self, field: Field) -> PresentationResult;

    /// Put `entry` at the top of the history view.
    fn render_log_entry(&mut self, entry: &LogEntry) -> PresentationResult;

    fn remove_log_entry(&mut self, id: EntryId) -> PresentationResult;

    fn clear_log_view(&mut self) -> PresentationResult;

    /// Write operands back into the input fields (the "load" interaction).
    fn fill_inputs(&mut self, operands: Operands) -> PresentationResult;

    /// Tell the user history could not be loaded or saved.
    fn warn(&mut self, warning: &PersistenceError) -> PresentationResult;
}

impl<P: Presentation + ?Sized> Presentation for &mut P {
    fn render(&mut self, result: &Result<f64, RequestError>) -> PresentationResult {
        (**self).render(result)
    }

    fn annotate_field(&mut self, field: Field) -> PresentationResult {
        (**self).annotate_field(field)
    }

    fn render_log_entry(&mut self, entry: &LogEntry) -> PresentationResult {
        (**self).render_log_entry(entry)
    }

    fn remove_log_entry(&mut self, id: EntryId) -> PresentationResult {
        (**self).remove_log_entry(id)
    }

    fn clear_log_view(&mut self) -> PresentationResult {
        (**self).clear_log_view()
    }

    fn fill_inputs(&mut self, operands: Operands) -> PresentationResult {
        (**self).fill_inputs(operands)
    }

    fn warn(&mut self, warning: &PersistenceError) -> PresentationResult {
        (**self).warn(warning)
    }
}
