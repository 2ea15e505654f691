//! Terminal presentation surface.

use std::io::Write;

use colored::Colorize;
use serde_json::json;
use tally_app::{
    EntryId, Field, LogEntry, Operands, PersistenceError, Presentation, PresentationError,
    PresentationResult, RequestError,
};

use crate::cli::OutputFormat;

/// Writes results to `out` and keeps the history view as an in-memory
/// projection (newest first) that commands print on demand.
pub struct ConsolePresentation<W> {
    out: W,
    format: OutputFormat,
    view: Vec<LogEntry>,
}

impl<W: Write> ConsolePresentation<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            view: Vec::new(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// The projected history, newest first.
    pub fn view(&self) -> &[LogEntry] {
        &self.view
    }

    pub fn print_history(&mut self, limit: usize) -> std::io::Result<()> {
        let shown = &self.view[..limit.min(self.view.len())];
        match self.format {
            OutputFormat::Json => {
                writeln!(self.out, "{}", serde_json::to_string(shown)?)?;
            }
            OutputFormat::Text if shown.is_empty() => {
                writeln!(self.out, "No calculations yet.")?;
            }
            OutputFormat::Text => {
                for entry in shown {
                    writeln!(
                        self.out,
                        "{}  {}  {}",
                        format!("{:>5}", entry.id().to_string()).yellow(),
                        entry.time().dimmed(),
                        entry,
                    )?;
                }
            }
        }
        Ok(())
    }

    pub fn message(&mut self, text: &str) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Json => writeln!(self.out, "{}", json!({ "message": text })),
            OutputFormat::Text => writeln!(self.out, "{} {}", "✓".green().bold(), text),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: String) -> PresentationResult {
        writeln!(self.out, "{text}").map_err(|_| PresentationError::MissingTarget("stdout"))
    }
}

impl<W: Write> Presentation for ConsolePresentation<W> {
    fn render(&mut self, result: &Result<f64, RequestError>) -> PresentationResult {
        let text = match (self.format, result) {
            (OutputFormat::Json, Ok(value)) => json!({ "result": value }).to_string(),
            (OutputFormat::Json, Err(e)) => {
                json!({ "error": e.user_message(), "detail": e.to_string() }).to_string()
            }
            (OutputFormat::Text, Ok(value)) => value.to_string().bold().to_string(),
            (OutputFormat::Text, Err(e)) => format!("{} ({e})", e.user_message().red().bold()),
        };
        self.write(text)
    }

    fn annotate_field(&mut self, field: Field) -> PresentationResult {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        self.write(format!("  check the {field} operand ({})", field.input_id()).dimmed().to_string())
    }

    fn render_log_entry(&mut self, entry: &LogEntry) -> PresentationResult {
        self.view.insert(0, entry.clone());
        Ok(())
    }

    fn remove_log_entry(&mut self, id: EntryId) -> PresentationResult {
        self.view.retain(|e| e.id() != id);
        Ok(())
    }

    fn clear_log_view(&mut self) -> PresentationResult {
        self.view.clear();
        Ok(())
    }

    fn fill_inputs(&mut self, operands: Operands) -> PresentationResult {
        let text = match self.format {
            OutputFormat::Json => json!({ "val1": operands.a, "val2": operands.b }).to_string(),
            OutputFormat::Text => format!("val1 = {}, val2 = {}", operands.a, operands.b),
        };
        self.write(text)
    }

    fn warn(&mut self, warning: &PersistenceError) -> PresentationResult {
        // Warnings go to stderr so JSON on stdout stays parseable.
        eprintln!("{} {warning}", "warning:".yellow().bold());
        Ok(())
    }
}
