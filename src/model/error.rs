//! Error types for notiview.
//!
//! Errors are grouped by where they surface:
//!
//! - [`AppError`] - top-level binary failures (input, config, logging, terminal, rows)
//!   - [`InputError`] - reading notification records from a file or stdin
//!   - [`ParseError`] - a single malformed JSONL record (non-fatal, skipped)
//! - [`RowError`] - host list misuse of template handles
//! - [`OpenError`] / [`ActionError`] - asynchronous collaborator failures; these are
//!   routed to the error sink and never interrupt rendering
//!
//! Missing optional data (no keybinding, no source, no progress) is never an error.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::row::TemplateId;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read notification input.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// Configuration file exists but could not be used.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// The host list misused a template handle.
    #[error("Row error: {0}")]
    Row(#[from] RowError),
}

/// Errors encountered when reading notification records.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was attempted.
        path: PathBuf,
    },

    /// No file was given and stdin is a terminal.
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Any other I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A malformed notification record.
///
/// Records are parsed line by line; a bad line is logged and skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line is not valid JSON or does not match the record shape.
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// 1-based line number.
        line: usize,
        /// Parser message.
        message: String,
    },

    /// A field has a value the record cannot hold.
    #[error("Invalid field '{field}' at line {line}: {reason}")]
    InvalidField {
        /// 1-based line number.
        line: usize,
        /// Field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Misuse of a template handle by the host list.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RowError {
    /// The handle was never created by this pool or was already destroyed.
    #[error("Unknown row template {0}")]
    UnknownTemplate(TemplateId),
}

/// Failure of the opener service.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The platform opener could not be launched.
    #[error("Failed to open {target}: {source}")]
    Launch {
        /// The link target.
        target: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The target's scheme is not one the opener handles.
    #[error("Unsupported link target: {0}")]
    UnsupportedTarget(String),
}

/// Failure of the action runner.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The notification the action targets was already closed.
    #[error("Notification already closed")]
    ItemClosed,

    /// The action's handler reported a failure.
    #[error("Action {id} failed: {reason}")]
    Failed {
        /// Action identifier.
        id: String,
        /// Failure description.
        reason: String,
    },
}
