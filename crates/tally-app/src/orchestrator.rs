use std::fmt;

use tally_calc::{dispatch_operator, validate};
use tally_log::{CalculationLog, Outcome};
use tally_store::DurableStore;
use tally_types::{CalculationResult, EntryId, LogEntry, Operands};
use tracing::{debug, info};

use crate::error::RequestError;
use crate::presentation::{Presentation, PresentationResult};

/// Where a calculation request currently is.
///
/// `Idle -> Validating -> Dispatching -> Succeeded | Rejected -> Idle`, with a
/// validation failure going straight from `Validating` to `Rejected`. Nothing
/// survives from one request to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Validating,
    Dispatching,
    Succeeded,
    Rejected,
}

impl RequestPhase {
    pub fn can_transition_to(self, next: Self) -> bool {
        use RequestPhase::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Dispatching)
                | (Validating, Rejected)
                | (Dispatching, Succeeded)
                | (Dispatching, Rejected)
                | (Succeeded, Idle)
                | (Rejected, Idle)
        )
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Dispatching => "dispatching",
            Self::Succeeded => "succeeded",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Per-request phase tracker.
struct Request {
    phase: RequestPhase,
}

impl Request {
    fn begin() -> Self {
        let mut request = Self {
            phase: RequestPhase::Idle,
        };
        request.advance(RequestPhase::Validating);
        request
    }

    fn advance(&mut self, next: RequestPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal request transition {} -> {}",
            self.phase,
            next
        );
        debug!(from = %self.phase, to = %next, "request phase");
        self.phase = next;
    }

    fn finish(mut self) {
        self.advance(RequestPhase::Idle);
    }
}

/// Wires validation, dispatch, the calculation log and a presentation
/// surface into the request/response cycle.
///
/// Constructed once at startup and held for the life of the process. Every
/// event takes `&mut self`, so one request always runs to completion before
/// the next is accepted.
pub struct Orchestrator<S, P> {
    log: CalculationLog<S>,
    presentation: P,
}

impl<S: DurableStore, P: Presentation> Orchestrator<S, P> {
    pub fn new(log: CalculationLog<S>, presentation: P) -> Self {
        Self { log, presentation }
    }

    /// Load stored history and project it onto the presentation surface.
    ///
    /// Returns the number of entries shown. A load failure is forwarded as a
    /// warning and the session continues with an empty log.
    pub fn start(&mut self) -> usize {
        let (entries, warning) = self.log.load().into_parts();
        if let Some(warning) = warning {
            let shown = self.presentation.warn(&warning);
            self.surface("warn", shown);
        }
        let cleared = self.presentation.clear_log_view();
        self.surface("clear_log_view", cleared);
        for entry in &entries {
            let shown = self.presentation.render_log_entry(entry);
            self.surface("render_log_entry", shown);
        }
        info!(count = entries.len(), "session started");
        entries.len()
    }

    /// Run one calculation request from raw field text and an operator token.
    pub fn calculate(
        &mut self,
        raw_a: &str,
        raw_b: &str,
        token: &str,
    ) -> Result<LogEntry, RequestError> {
        let mut request = Request::begin();

        let operands = match validate(raw_a, raw_b) {
            Ok(operands) => operands,
            Err(e) => {
                request.advance(RequestPhase::Rejected);
                let err = RequestError::from(e);
                self.show_result(&Err(err.clone()));
                let annotated = self.presentation.annotate_field(e.field());
                self.surface("annotate_field", annotated);
                request.finish();
                return Err(err);
            }
        };

        request.advance(RequestPhase::Dispatching);
        let recorded = dispatch_operator(token, operands.a, operands.b)
            .map_err(RequestError::from)
            .and_then(|(operator, value)| -> Result<_, RequestError> {
                let outcome = self.log.add(operands, operator, value)?;
                Ok((value, outcome))
            });
        let (value, outcome) = match recorded {
            Ok(pair) => pair,
            Err(err) => {
                request.advance(RequestPhase::Rejected);
                self.show_result(&Err(err.clone()));
                request.finish();
                return Err(err);
            }
        };

        request.advance(RequestPhase::Succeeded);
        self.show_result(&Ok(value));

        let entry = self.present_outcome(outcome);
        let shown = self.presentation.render_log_entry(&entry);
        self.surface("render_log_entry", shown);

        request.finish();
        Ok(entry)
    }

    /// Put an entry's operands back into the inputs and recompute it.
    ///
    /// The log is not modified. Returns `None` for an unknown id.
    pub fn load(&mut self, id: EntryId) -> Option<CalculationResult> {
        let Some(entry) = self.log.get(id) else {
            debug!(id = id.get(), "load of unknown log entry ignored");
            return None;
        };
        let operands: Operands = entry.operands();
        let result = self.log.replay_for_calculation(entry);

        let filled = self.presentation.fill_inputs(operands);
        self.surface("fill_inputs", filled);
        self.show_result(&result.clone().map_err(RequestError::from));
        Some(result)
    }

    /// Remove one entry from the log and from the view.
    pub fn delete(&mut self, id: EntryId) -> bool {
        let outcome = self.log.delete(id);
        let removed = self.present_outcome(outcome);
        if removed {
            let shown = self.presentation.remove_log_entry(id);
            self.surface("remove_log_entry", shown);
        }
        removed
    }

    /// Erase the whole history, stored record included.
    pub fn clear_all(&mut self) {
        let outcome = self.log.clear();
        self.present_outcome(outcome);
        let cleared = self.presentation.clear_log_view();
        self.surface("clear_log_view", cleared);
    }

    pub fn log(&self) -> &CalculationLog<S> {
        &self.log
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn into_parts(self) -> (CalculationLog<S>, P) {
        (self.log, self.presentation)
    }

    fn show_result(&mut self, result: &Result<f64, RequestError>) {
        if let Err(e) = self.presentation.render(result) {
            match result {
                Ok(value) => info!(%value, error = %e, "result"),
                Err(err) => info!(message = err.user_message(), error = %e, "result"),
            }
        }
    }

    fn present_outcome<T>(&mut self, outcome: Outcome<T>) -> T {
        let (value, warning) = outcome.into_parts();
        if let Some(warning) = warning {
            let shown = self.presentation.warn(&warning);
            self.surface("warn", shown);
        }
        value
    }

    fn surface(&self, call: &'static str, result: PresentationResult) {
        if let Err(e) = result {
            debug!(call, error = %e, "presentation call skipped");
        }
    }
}

impl<S, P> fmt::Debug for Orchestrator<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator").field("log", &self.log).finish()
    }
}
